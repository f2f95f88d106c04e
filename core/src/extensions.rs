use csscolorparser::Color;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    expression::Value,
};

/// The `$extensions` object of a token. Unknown vendor keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extensions {
    #[serde(rename = "studio.tokens", default)]
    pub studio_tokens: Option<StudioTokensExtension>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudioTokensExtension {
    #[serde(default)]
    pub modify: Option<StudioTokensModifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StudioTokensModify {
    #[serde(rename = "lighten")]
    Lighten,
    #[serde(rename = "darken")]
    Darken,
    #[serde(rename = "alpha")]
    Alpha,
    #[serde(rename = "mix")]
    Mix,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StudioTokensSpace {
    #[default]
    #[serde(rename = "hsl")]
    Hsl,
    #[serde(rename = "lch")]
    Lch,
    #[serde(rename = "srgb")]
    Srgb,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudioTokensModifier {
    #[serde(rename = "type")]
    pub type_: StudioTokensModify,
    pub value: String,
    #[serde(default)]
    pub space: StudioTokensSpace,
}

impl Extensions {
    /// Applies the color modifier, if any, to an already resolved value.
    pub fn apply(&self, token: &str, base_value: Value) -> Result<Value> {
        match self.studio_tokens.as_ref().and_then(|ext| ext.modify.as_ref()) {
            Some(modifier) => modifier.apply(token, base_value),
            None => Ok(base_value),
        }
    }
}

impl StudioTokensModifier {
    pub fn apply(&self, token: &str, base_value: Value) -> Result<Value> {
        let amount: f64 = self
            .value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidModifierValue {
                token: token.to_string(),
                value: self.value.clone(),
            })?;
        let unsupported = || Error::UnsupportedModifier {
            token: token.to_string(),
            modifier: format!("{:?} in {:?}", self.type_, self.space).to_lowercase(),
        };
        let color = match base_value {
            Value::Color(color) => color,
            Value::Any(value) => csscolorparser::parse(&value).map_err(|_| unsupported())?,
        };
        let modified = match (self.type_, self.space) {
            (StudioTokensModify::Alpha, _) => {
                Color::new(color.r, color.g, color.b, amount.clamp(0.0, 1.0))
            }
            (StudioTokensModify::Lighten | StudioTokensModify::Darken, StudioTokensSpace::Hsl) => {
                let (h, s, l, a) = color.to_hsla();
                let l2 = match self.type_ {
                    StudioTokensModify::Lighten => l + l * amount,
                    _ => l - l * amount,
                };
                Color::from_hsla(h, s, l2.clamp(0.0, 1.0), a)
            }
            (StudioTokensModify::Lighten | StudioTokensModify::Darken, StudioTokensSpace::Lch) => {
                let (l, c, h, a) = color.to_lch();
                let l2 = match self.type_ {
                    StudioTokensModify::Lighten => l + l * amount,
                    _ => l - l * amount,
                };
                Color::from_lch(l2.clamp(0.0, 100.0), c, h, a)
            }
            _ => return Err(unsupported()),
        };
        Ok(Value::Color(modified))
    }
}
