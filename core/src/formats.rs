//! Output formats. A format turns the transformed tokens of one platform
//! into the text of one output file.

use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    config::PlatformOptions,
    css::{Rule, Stylesheet},
    error::{Error, Result},
    schema::TokenType,
    tokens::{Token, TokenValue},
    transforms::Composite,
    utility::typography_utilities,
};

/// Everything a format gets to see for one output file.
pub struct FormatContext<'a> {
    pub platform: &'a str,
    pub tokens: &'a [Token],
    pub options: &'a PlatformOptions,
}

pub trait Format: Send + Sync {
    /// The name used in file configs, e.g. `css/variables`.
    fn name(&self) -> &str;

    fn format(&self, context: &FormatContext<'_>) -> Result<String>;
}

/// CSS shorthand for a token value, `None` for typography and unknown composites.
pub fn shorthand(token: &Token) -> Option<String> {
    match (&token.value, token.token_type) {
        (TokenValue::Single(value), _) => Some(value.clone()),
        (TokenValue::Composite(value), TokenType::Border) => Some(border(value)),
        (TokenValue::Composite(value), TokenType::Shadow) => Some(shadow(value)),
        (TokenValue::List(layers), TokenType::Shadow) => {
            Some(layers.iter().map(shadow).join(", "))
        }
        _ => None,
    }
}

fn border(value: &Composite) -> String {
    ["width", "style", "color"]
        .iter()
        .filter_map(|key| value.get(*key))
        .join(" ")
}

fn shadow(value: &Composite) -> String {
    let inset = value.get("type").map(String::as_str) == Some("innerShadow")
        || value.get("inset").map(String::as_str) == Some("true");
    let offset_x = value.get("x").or_else(|| value.get("offsetX"));
    let offset_y = value.get("y").or_else(|| value.get("offsetY"));
    let parts = [
        offset_x,
        offset_y,
        value.get("blur"),
        value.get("spread"),
        value.get("color"),
    ];
    let layer = parts.into_iter().flatten().join(" ");
    if inset {
        format!("inset {layer}")
    } else {
        layer
    }
}

fn custom_properties<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Rule {
    let mut root = Rule::new(":root");
    for token in tokens {
        match shorthand(token) {
            Some(value) => root.declare(format!("--{}", token.name), value),
            None => tracing::debug!(token = %token.name, "no custom property for composite value"),
        }
    }
    root
}

/// `:root { --name: value; }` for every token that has a CSS value.
pub struct CssVariables;
impl Format for CssVariables {
    fn name(&self) -> &str {
        "css/variables"
    }

    fn format(&self, context: &FormatContext<'_>) -> Result<String> {
        let mut sheet = Stylesheet::new();
        sheet.rule(custom_properties(
            context.tokens.iter().filter(|token| !token.is_typography()),
        ));
        Ok(sheet.to_css())
    }
}

/// Tailwind v4 entry stylesheet: the `tailwindcss` import, custom
/// properties for plain, border and shadow tokens, then one typography
/// `@utility` per group with breakpoint overrides.
pub struct Tailwind;
impl Format for Tailwind {
    fn name(&self) -> &str {
        "tailwindcss"
    }

    fn format(&self, context: &FormatContext<'_>) -> Result<String> {
        let (composite, plain): (Vec<&Token>, Vec<&Token>) = context
            .tokens
            .iter()
            .partition(|token| token.token_type.is_composite());

        let mut sheet = Stylesheet::new();
        sheet.statement("@import 'tailwindcss'");

        let borders = composite.iter().filter(|t| t.token_type == TokenType::Border);
        let shadows = composite.iter().filter(|t| t.token_type == TokenType::Shadow);
        sheet.rule(custom_properties(
            plain.iter().chain(borders).chain(shadows).copied(),
        ));

        let typography: Vec<Token> = composite
            .iter()
            .filter(|token| token.is_typography())
            .map(|token| (*token).clone())
            .collect();
        sheet.extend(typography_utilities(&typography, &context.options.breakpoints)?);

        tracing::debug!(
            platform = context.platform,
            plain = plain.len(),
            typography = typography.len(),
            "assembled tailwind stylesheet"
        );
        Ok(sheet.to_css())
    }
}

pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Registers a format, replacing any with the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats.insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Format> {
        self.formats.get(name).map(|f| f.as_ref())
    }

    pub fn format(&self, name: &str, context: &FormatContext<'_>) -> Result<String> {
        let format = self
            .get(name)
            .ok_or_else(|| Error::UnknownFormat(name.to_string()))?;
        format.format(context)
    }

    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CssVariables);
        registry.register(Tailwind);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;

    fn token(path: &str, token_type: TokenType, value: TokenValue) -> Token {
        let path: Vec<String> = path.split('.').map(str::to_string).collect();
        Token {
            name: crate::css_name(&path),
            path,
            token_type,
            value,
            description: None,
        }
    }

    fn composite(entries: &[(&str, &str)]) -> Composite {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn tokens() -> Vec<Token> {
        vec![
            token("colors.red", TokenType::Color, TokenValue::Single("#ff0000".to_string())),
            token(
                "border.focus",
                TokenType::Border,
                TokenValue::Composite(composite(&[
                    ("color", "#0000ff"),
                    ("width", "2px"),
                    ("style", "solid"),
                ])),
            ),
            token(
                "shadow.card",
                TokenType::Shadow,
                TokenValue::List(vec![
                    composite(&[("x", "0"), ("y", "1px"), ("blur", "2px"), ("spread", "0"), ("color", "#000000")]),
                    composite(&[
                        ("x", "0"),
                        ("y", "0"),
                        ("blur", "1px"),
                        ("spread", "0"),
                        ("color", "#111111"),
                        ("type", "innerShadow"),
                    ]),
                ]),
            ),
            token(
                "mobile.body",
                TokenType::Typography,
                TokenValue::Composite(composite(&[("fontSize", "14px")])),
            ),
        ]
    }

    fn options() -> PlatformOptions {
        let breakpoints: IndexMap<String, String> = [("mobile", "360px"), ("desktop", "1280px")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlatformOptions {
            breakpoints,
            ..Default::default()
        }
    }

    #[test]
    fn css_variables_skip_typography() {
        let tokens = tokens();
        let options = options();
        let context = FormatContext {
            platform: "css",
            tokens: &tokens,
            options: &options,
        };
        let css = FormatRegistry::with_defaults().format("css/variables", &context).unwrap();
        assert_eq!(
            css,
            ":root {\n\
             \x20   --colors-red: #ff0000;\n\
             \x20   --border-focus: 2px solid #0000ff;\n\
             \x20   --shadow-card: 0 1px 2px 0 #000000, inset 0 0 1px 0 #111111;\n\
             }\n"
        );
    }

    #[test]
    fn tailwind_stylesheet() {
        let tokens = tokens();
        let options = options();
        let context = FormatContext {
            platform: "tailwindcss",
            tokens: &tokens,
            options: &options,
        };
        let css = FormatRegistry::with_defaults().format("tailwindcss", &context).unwrap();
        assert_eq!(
            css,
            "@import 'tailwindcss';\n\
             \n\
             :root {\n\
             \x20   --colors-red: #ff0000;\n\
             \x20   --border-focus: 2px solid #0000ff;\n\
             \x20   --shadow-card: 0 1px 2px 0 #000000, inset 0 0 1px 0 #111111;\n\
             }\n\
             \n\
             @utility typography-body {\n\
             \x20   font-size: 14px;\n\
             }\n"
        );
    }

    #[test]
    fn unknown_format() {
        let options = options();
        let context = FormatContext {
            platform: "css",
            tokens: &[],
            options: &options,
        };
        let err = FormatRegistry::with_defaults().format("scss/map", &context).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(name) if name == "scss/map"));
        assert_eq!(FormatRegistry::with_defaults().list_formats(), vec!["css/variables", "tailwindcss"]);
    }
}
