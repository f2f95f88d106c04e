//! Value transforms applied to tokens before they reach a format.
//!
//! The built-in transforms normalize typography composites for CSS output:
//! font-family quoting and fallback, line-height, letter-spacing and
//! font-size units, and the `textCase` to `textTransform` rename.

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    config::PlatformOptions,
    error::{Error, Result},
    tokens::Token,
    units::{format_fixed, format_number, has_unit, parse_float},
};

pub type Composite = IndexMap<String, String>;

pub trait Transform: Send + Sync {
    /// The name used in platform configs, e.g. `css/typography/lineHeight`.
    fn name(&self) -> &str;

    /// Whether the transform applies to `token`.
    fn matches(&self, token: &Token) -> bool;

    fn transform(&self, token: &mut Token, options: &PlatformOptions);
}

/// A transform over the composite value of typography tokens.
pub struct TypographyTransform {
    name: &'static str,
    apply: fn(&mut Composite, &PlatformOptions),
}
impl TypographyTransform {
    pub fn new(name: &'static str, apply: fn(&mut Composite, &PlatformOptions)) -> Self {
        Self { name, apply }
    }
}
impl Transform for TypographyTransform {
    fn name(&self) -> &str {
        self.name
    }

    fn matches(&self, token: &Token) -> bool {
        token.is_typography()
    }

    fn transform(&self, token: &mut Token, options: &PlatformOptions) {
        match token.value.as_composite_mut() {
            Some(value) => (self.apply)(value, options),
            None => tracing::debug!(token = %token.name, transform = self.name, "skipping non-composite value"),
        }
    }
}

fn non_empty<'a>(value: &'a Composite, key: &str) -> Option<&'a str> {
    value.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn warn_nan(property: &str, input: &str, output: &str) {
    if output.contains("NaN") {
        tracing::warn!(property, input, output, "value is not numeric");
    }
}

/// Quotes multi-word families and appends the fallback family.
pub fn transform_font_family(value: &mut Composite, options: &PlatformOptions) {
    let Some(font_family) = non_empty(value, "fontFamily") else {
        return;
    };
    let families = font_family
        .split(',')
        .map(str::trim)
        .filter(|family| !family.is_empty())
        .map(|family| {
            let quoted = family.starts_with(['"', '\'']);
            if family.contains(' ') && !quoted {
                format!("\"{family}\"")
            } else {
                family.to_string()
            }
        })
        .join(", ");
    let font_family = format!("{families}, {}", options.fallback_font_family());
    value.insert("fontFamily".to_string(), font_family);
}

/// Percentages become ratios, bare numbers get the configured unit or are
/// divided by the font size. Values with a unit are kept.
pub fn transform_line_height(value: &mut Composite, options: &PlatformOptions) {
    let Some(line_height) = non_empty(value, "lineHeight") else {
        return;
    };
    let normalized = if line_height.ends_with('%') {
        format_fixed(parse_float(line_height) / 100.0, 3)
    } else if has_unit(line_height) {
        return;
    } else if let Some(unit) = &options.line_height_unit {
        format!("{}{unit}", format_number(parse_float(line_height)))
    } else {
        let font_size = value.get("fontSize").map_or(f64::NAN, |size| parse_float(size));
        format_fixed(parse_float(line_height) / font_size, 3)
    };
    warn_nan("lineHeight", line_height, &normalized);
    value.insert("lineHeight".to_string(), normalized);
}

/// Zero stays unitless, bare numbers get the letter-spacing unit.
pub fn transform_letter_spacing(value: &mut Composite, options: &PlatformOptions) {
    let Some(letter_spacing) = non_empty(value, "letterSpacing") else {
        return;
    };
    let amount = parse_float(letter_spacing);
    let normalized = if amount == 0.0 {
        "0".to_string()
    } else if has_unit(letter_spacing) {
        return;
    } else {
        format!("{}{}", format_number(amount), options.letter_spacing_unit())
    };
    warn_nan("letterSpacing", letter_spacing, &normalized);
    value.insert("letterSpacing".to_string(), normalized);
}

/// Unitless font sizes are pixels.
pub fn transform_font_size(value: &mut Composite, _options: &PlatformOptions) {
    let Some(font_size) = non_empty(value, "fontSize") else {
        return;
    };
    if has_unit(font_size) {
        return;
    }
    let size = parse_float(font_size);
    let normalized = if size == 0.0 {
        "0".to_string()
    } else {
        format!("{}px", format_number(size))
    };
    value.insert("fontSize".to_string(), normalized);
}

/// Renames `textCase` to the CSS property name `textTransform`.
pub fn transform_text_case(value: &mut Composite, _options: &PlatformOptions) {
    if non_empty(value, "textCase").is_none() {
        return;
    }
    if let Some(text_case) = value.shift_remove("textCase") {
        value.insert("textTransform".to_string(), text_case);
    }
}

pub struct TransformRegistry {
    transforms: HashMap<String, Box<dyn Transform>>,
    groups: HashMap<String, Vec<String>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        TransformRegistry {
            transforms: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    /// Registers a transform, replacing any with the same name.
    pub fn register<T: Transform + 'static>(&mut self, transform: T) {
        self.transforms
            .insert(transform.name().to_string(), Box::new(transform));
    }

    /// Registers a name that expands to several transforms, in order.
    pub fn register_group(&mut self, name: &str, members: &[&str]) {
        self.groups.insert(
            name.to_string(),
            members.iter().map(|member| member.to_string()).collect(),
        );
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.transforms.get(name).map(|t| t.as_ref())
    }

    /// Expands groups and looks every name up, keeping the configured order.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<&dyn Transform>> {
        let mut resolved: Vec<&dyn Transform> = Vec::new();
        for name in names {
            let members = match self.groups.get(name) {
                Some(members) => members.clone(),
                None => vec![name.clone()],
            };
            for member in members {
                let transform = self
                    .get(&member)
                    .ok_or_else(|| Error::UnknownTransform(member.clone()))?;
                resolved.push(transform);
            }
        }
        Ok(resolved)
    }

    pub fn apply(&self, names: &[String], tokens: &mut [Token], options: &PlatformOptions) -> Result<()> {
        let transforms = self.resolve(names)?;
        for token in tokens.iter_mut() {
            for transform in &transforms {
                if transform.matches(token) {
                    transform.transform(token, options);
                }
            }
        }
        Ok(())
    }

    pub fn list_transforms(&self) -> Vec<String> {
        let mut names: Vec<_> = self.transforms.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TypographyTransform::new("css/typography/fontFamily", transform_font_family));
        registry.register(TypographyTransform::new("css/typography/lineHeight", transform_line_height));
        registry.register(TypographyTransform::new(
            "css/typography/letterSpacing",
            transform_letter_spacing,
        ));
        registry.register(TypographyTransform::new("css/typography/textCase", transform_text_case));
        registry.register(TypographyTransform::new("css/typography/fontSize", transform_font_size));
        registry.register_group(
            "css/typography",
            &[
                "css/typography/fontFamily",
                "css/typography/lineHeight",
                "css/typography/letterSpacing",
                "css/typography/textCase",
                "css/typography/fontSize",
            ],
        );
        registry
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::TokenType, tokens::TokenValue};

    fn composite(entries: &[(&str, &str)]) -> Composite {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn options(line_height_unit: Option<&str>, letter_spacing_unit: Option<&str>) -> PlatformOptions {
        PlatformOptions {
            line_height_unit: line_height_unit.map(str::to_string),
            letter_spacing_unit: letter_spacing_unit.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn font_family_quotes_and_appends_fallback() {
        let mut value = composite(&[("fontFamily", "Inter, Arial")]);
        transform_font_family(&mut value, &options(None, None));
        assert_eq!(value["fontFamily"], "Inter, Arial, sans-serif");

        let mut value = composite(&[("fontFamily", "My Font")]);
        transform_font_family(&mut value, &options(None, None));
        assert_eq!(value["fontFamily"], "\"My Font\", sans-serif");

        let mut value = composite(&[("fontFamily", " Open Sans ,'Helvetica Neue'")]);
        transform_font_family(&mut value, &options(None, None));
        assert_eq!(value["fontFamily"], "\"Open Sans\", 'Helvetica Neue', sans-serif");
    }

    #[test]
    fn font_family_uses_configured_fallback() {
        let mut value = composite(&[("fontFamily", "Georgia")]);
        let options = PlatformOptions {
            fallback_font_family: Some("serif".to_string()),
            ..Default::default()
        };
        transform_font_family(&mut value, &options);
        assert_eq!(value["fontFamily"], "Georgia, serif");
    }

    #[test]
    fn line_height_percentage_becomes_ratio() {
        for (input, expected) in [("150%", "1.500"), ("120%", "1.200"), ("100%", "1.000")] {
            let mut value = composite(&[("lineHeight", input)]);
            transform_line_height(&mut value, &options(Some("px"), None));
            assert_eq!(value["lineHeight"], expected);
        }
    }

    #[test]
    fn line_height_gets_configured_unit() {
        let mut value = composite(&[("fontSize", "16"), ("lineHeight", "24")]);
        transform_line_height(&mut value, &options(Some("px"), None));
        assert_eq!(value["lineHeight"], "24px");
    }

    #[test]
    fn line_height_without_unit_is_divided_by_font_size() {
        let mut value = composite(&[("fontSize", "16"), ("lineHeight", "24")]);
        transform_line_height(&mut value, &options(None, None));
        assert_eq!(value["lineHeight"], "1.500");
    }

    #[test]
    fn line_height_ratio_rounds_halves_up() {
        let mut value = composite(&[("fontSize", "16"), ("lineHeight", "17")]);
        transform_line_height(&mut value, &options(None, None));
        assert_eq!(value["lineHeight"], "1.063");

        let mut value = composite(&[("lineHeight", "106.25%")]);
        transform_line_height(&mut value, &options(None, None));
        assert_eq!(value["lineHeight"], "1.063");

        let mut value = composite(&[("fontSize", "16"), ("lineHeight", "18")]);
        transform_line_height(&mut value, &options(None, None));
        assert_eq!(value["lineHeight"], "1.125");
    }

    #[test]
    fn line_height_keeps_existing_unit_and_propagates_nan() {
        let mut value = composite(&[("lineHeight", "2rem")]);
        transform_line_height(&mut value, &options(Some("px"), None));
        assert_eq!(value["lineHeight"], "2rem");

        let mut value = composite(&[("fontSize", "large"), ("lineHeight", "24")]);
        transform_line_height(&mut value, &options(None, None));
        assert_eq!(value["lineHeight"], "NaN");
    }

    #[test]
    fn letter_spacing_zero_is_unitless() {
        for input in ["0", "0.0", "-0", "0%"] {
            let mut value = composite(&[("letterSpacing", input)]);
            transform_letter_spacing(&mut value, &options(None, Some("em")));
            assert_eq!(value["letterSpacing"], "0", "input {input}");
        }
    }

    #[test]
    fn letter_spacing_gets_unit() {
        let mut value = composite(&[("letterSpacing", "-0.5")]);
        transform_letter_spacing(&mut value, &options(None, None));
        assert_eq!(value["letterSpacing"], "-0.5px");

        let mut value = composite(&[("letterSpacing", "2")]);
        transform_letter_spacing(&mut value, &options(None, Some("em")));
        assert_eq!(value["letterSpacing"], "2em");

        let mut value = composite(&[("letterSpacing", "0.1em")]);
        transform_letter_spacing(&mut value, &options(None, None));
        assert_eq!(value["letterSpacing"], "0.1em");
    }

    #[test]
    fn text_case_is_renamed() {
        let mut value = composite(&[("textCase", "uppercase"), ("fontSize", "12")]);
        transform_text_case(&mut value, &options(None, None));
        assert!(!value.contains_key("textCase"));
        let keys: Vec<_> = value.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["fontSize", "textTransform"]);
        assert_eq!(value["textTransform"], "uppercase");
    }

    #[test]
    fn font_size_defaults_to_pixels() {
        for (input, expected) in [("16", "16px"), ("0", "0"), ("1.25rem", "1.25rem"), ("14.5", "14.5px")] {
            let mut value = composite(&[("fontSize", input)]);
            transform_font_size(&mut value, &options(None, None));
            assert_eq!(value["fontSize"], expected);
        }
    }

    #[test]
    fn absent_fields_pass_through() {
        let original = composite(&[("fontWeight", "700")]);
        let mut value = original.clone();
        let options = options(Some("px"), None);
        transform_font_family(&mut value, &options);
        transform_line_height(&mut value, &options);
        transform_letter_spacing(&mut value, &options);
        transform_text_case(&mut value, &options);
        transform_font_size(&mut value, &options);
        assert_eq!(value, original);
    }

    #[test]
    fn registry_expands_groups_and_filters_tokens() {
        let registry = TransformRegistry::with_defaults();
        let mut tokens = vec![
            Token {
                name: "mobile-body".to_string(),
                path: vec!["mobile".to_string(), "body".to_string()],
                token_type: TokenType::Typography,
                value: TokenValue::Composite(composite(&[
                    ("fontFamily", "Inter"),
                    ("lineHeight", "150%"),
                    ("letterSpacing", "1"),
                ])),
                description: None,
            },
            Token {
                name: "color".to_string(),
                path: vec!["color".to_string()],
                token_type: TokenType::Color,
                value: TokenValue::Single("#ff0000".to_string()),
                description: None,
            },
        ];
        registry
            .apply(&["css/typography".to_string()], &mut tokens, &options(None, None))
            .unwrap();
        let body = tokens[0].value.as_composite().unwrap();
        assert_eq!(body["fontFamily"], "Inter, sans-serif");
        assert_eq!(body["lineHeight"], "1.500");
        assert_eq!(body["letterSpacing"], "1px");
        assert_eq!(tokens[1].value, TokenValue::Single("#ff0000".to_string()));
    }

    #[test]
    fn registry_rejects_unknown_names() {
        let registry = TransformRegistry::with_defaults();
        let err = registry.resolve(&["css/nope".to_string()]).err().unwrap();
        assert!(matches!(err, Error::UnknownTransform(name) if name == "css/nope"));
        assert_eq!(registry.list_transforms().len(), 5);
    }
}
