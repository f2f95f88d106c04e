//! Raw shape of a design-token document.
//!
//! Both token schema generations are accepted here: DTCG (`$value`, `$type`,
//! `$description`) and legacy Tokens Studio (`value`, `type`,
//! `description`). Everything downstream works on [`crate::Token`], so the
//! two spellings are collapsed once when the document is flattened.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{expression::Expression, extensions::Extensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    Number,
    Opacity,
    FontFamily,
    FontWeight,
    FontSize,
    LineHeight,
    LetterSpacing,
    Typography,
    Border,
    Shadow,
    #[serde(other)]
    Other,
}
impl TokenType {
    /// Composite types carry an object value instead of a single string.
    pub fn is_composite(&self) -> bool {
        matches!(self, TokenType::Typography | TokenType::Border | TokenType::Shadow)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TokenOrGroup {
    Token(RawToken),
    Group(IndexMap<String, TokenOrGroup>),
    Meta(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub struct RawToken {
    #[serde(alias = "$value")]
    pub value: RawValue,
    #[serde(rename = "type", alias = "$type", default)]
    pub type_: Option<TokenType>,
    #[serde(alias = "$description", default)]
    pub description: Option<String>,
    #[serde(rename = "$extensions", default)]
    pub extensions: Option<Extensions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(Expression),
    Dict(IndexMap<String, Expression>),
    Array(Vec<Expression>),
    List(Vec<IndexMap<String, Expression>>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_schemas() {
        let doc: TokenOrGroup = serde_json::from_str(
            r##"{
                "legacy": { "value": "#ff0000", "type": "color" },
                "dtcg": { "$value": "16px", "$type": "dimension", "$description": "base" }
            }"##,
        )
        .unwrap();
        let TokenOrGroup::Group(group) = doc else {
            panic!("expected a group");
        };
        let TokenOrGroup::Token(legacy) = &group["legacy"] else {
            panic!("expected a token");
        };
        assert_eq!(legacy.type_, Some(TokenType::Color));
        let TokenOrGroup::Token(dtcg) = &group["dtcg"] else {
            panic!("expected a token");
        };
        assert_eq!(dtcg.type_, Some(TokenType::Dimension));
        assert_eq!(dtcg.description.as_deref(), Some("base"));
    }

    #[test]
    fn reads_composite_and_array_values() {
        let doc: TokenOrGroup = serde_json::from_str(
            r#"{
                "body": { "$value": { "fontFamily": "Inter", "fontWeight": 400 }, "$type": "typography" },
                "stack": { "$value": ["Inter", "Arial"], "$type": "fontFamily" },
                "unknown": { "$value": "x", "$type": "asset" },
                "$description": "group metadata"
            }"#,
        )
        .unwrap();
        let TokenOrGroup::Group(group) = doc else {
            panic!("expected a group");
        };
        assert!(matches!(
            &group["body"],
            TokenOrGroup::Token(RawToken { value: RawValue::Dict(_), .. })
        ));
        assert!(matches!(
            &group["stack"],
            TokenOrGroup::Token(RawToken { value: RawValue::Array(_), .. })
        ));
        assert!(matches!(
            &group["unknown"],
            TokenOrGroup::Token(RawToken { type_: Some(TokenType::Other), .. })
        ));
        assert!(matches!(&group["$description"], TokenOrGroup::Meta(_)));
    }
}
