//! Tailwind `@utility` classes for typography tokens.
//!
//! Typography tokens are authored once per breakpoint (`mobile.heading.h1`,
//! `desktop.heading.h1`, ...). Tokens sharing a path suffix form a group;
//! the group's token at the first configured breakpoint becomes the base
//! declarations and every later breakpoint with a token becomes a nested
//! `@media (min-width: ...)` override:
//!
//! ```text
//! @utility typography-heading-h1 {
//!     font-size: 24px;
//!     @media (min-width: 1024px) {
//!         font-size: 32px;
//!     }
//! }
//! ```

use indexmap::{map::Entry, IndexMap};

use crate::{
    css::Rule,
    css_name, css_property,
    error::{Error, Result},
    tokens::Token,
};

/// Groups typography tokens by their path without the leading breakpoint
/// segment, in first-seen order.
pub fn group_typography<'a>(
    tokens: impl IntoIterator<Item = &'a Token>,
) -> IndexMap<String, Vec<&'a Token>> {
    let mut groups: IndexMap<String, Vec<&'a Token>> = IndexMap::new();
    for token in tokens.into_iter().filter(|token| token.is_typography()) {
        let suffix = token.path.get(1..).unwrap_or_default();
        groups.entry(css_name(suffix)).or_default().push(token);
    }
    groups
}

/// Builds one `@utility` rule from the tokens of a group keyed by breakpoint.
pub fn typography_utility(
    name: &str,
    tokens: &IndexMap<&str, &Token>,
    breakpoints: &IndexMap<String, String>,
) -> Result<Rule> {
    let mut breakpoints = breakpoints.iter();
    let (default_breakpoint, _) = breakpoints.next().ok_or(Error::NoDefaultBreakpoint)?;
    let default_token = tokens.get(default_breakpoint.as_str()).ok_or_else(|| {
        Error::NoDefaultTypographyToken {
            group: name.to_string(),
            breakpoint: default_breakpoint.clone(),
        }
    })?;

    let mut utility = Rule::new(format!("@utility {name}"));
    declare_all(&mut utility, default_token)?;

    for (breakpoint, length) in breakpoints {
        let Some(token) = tokens.get(breakpoint.as_str()) else {
            continue;
        };
        let mut media = Rule::new(format!("@media (min-width: {length})"));
        declare_all(&mut media, token)?;
        utility.nest(media);
    }
    Ok(utility)
}

fn declare_all(rule: &mut Rule, token: &Token) -> Result<()> {
    let value = token
        .value
        .as_composite()
        .ok_or_else(|| Error::InvalidTypography(token.name.clone()))?;
    for (property, value) in value {
        rule.declare(css_property(property), value.clone());
    }
    Ok(())
}

/// All typography utilities of a token set, one per group.
pub fn typography_utilities(
    tokens: &[Token],
    breakpoints: &IndexMap<String, String>,
) -> Result<Vec<Rule>> {
    group_typography(tokens)
        .into_iter()
        .map(|(group, members)| {
            let mut by_breakpoint: IndexMap<&str, &Token> = IndexMap::new();
            for token in members {
                let Some(breakpoint) = token
                    .path
                    .first()
                    .map(String::as_str)
                    .filter(|segment| breakpoints.contains_key(*segment))
                else {
                    tracing::debug!(token = %token.name, "token is not under a configured breakpoint");
                    continue;
                };
                match by_breakpoint.entry(breakpoint) {
                    Entry::Vacant(entry) => {
                        entry.insert(token);
                    }
                    Entry::Occupied(entry) => tracing::warn!(
                        token = %token.name,
                        kept = %entry.get().name,
                        "duplicate typography token for breakpoint, keeping the first"
                    ),
                }
            }
            typography_utility(&format!("typography-{group}"), &by_breakpoint, breakpoints)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{css::Stylesheet, schema::TokenType, tokens::TokenValue};

    fn typography(path: &str, entries: &[(&str, &str)]) -> Token {
        let path: Vec<String> = path.split('.').map(str::to_string).collect();
        Token {
            name: css_name(&path),
            path,
            token_type: TokenType::Typography,
            value: TokenValue::Composite(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            description: None,
        }
    }

    fn breakpoints() -> IndexMap<String, String> {
        [("mobile", "360px"), ("tablet", "768px"), ("desktop", "1280px")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn groups_by_path_suffix() {
        let tokens = vec![
            typography("mobile.heading.h1", &[]),
            typography("desktop.heading.h1", &[]),
            typography("mobile.body", &[]),
        ];
        let groups = group_typography(&tokens);
        let names: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["heading-h1", "body"]);
        assert_eq!(groups["heading-h1"].len(), 2);
    }

    #[test]
    fn skips_breakpoints_without_tokens() {
        let tokens = vec![
            typography("desktop.body", &[("fontSize", "18px")]),
            typography("mobile.body", &[("fontSize", "14px"), ("lineHeight", "1.500")]),
        ];
        let mut sheet = Stylesheet::new();
        sheet.extend(typography_utilities(&tokens, &breakpoints()).unwrap());
        assert_eq!(
            sheet.to_css(),
            "@utility typography-body {\n\
             \x20   font-size: 14px;\n\
             \x20   line-height: 1.500;\n\
             \x20   @media (min-width: 1280px) {\n\
             \x20       font-size: 18px;\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn overrides_follow_breakpoint_order() {
        let tokens = vec![
            typography("desktop.body", &[("fontSize", "18px")]),
            typography("tablet.body", &[("fontSize", "16px")]),
            typography("mobile.body", &[("fontSize", "14px")]),
        ];
        let utilities = typography_utilities(&tokens, &breakpoints()).unwrap();
        let media: Vec<_> = utilities[0]
            .children
            .iter()
            .map(|rule| rule.selector.as_str())
            .collect();
        assert_eq!(
            media,
            vec!["@media (min-width: 768px)", "@media (min-width: 1280px)"]
        );
    }

    #[test]
    fn missing_default_token_fails() {
        let tokens = vec![typography("desktop.caption", &[("fontSize", "12px")])];
        let err = typography_utilities(&tokens, &breakpoints()).unwrap_err();
        assert!(matches!(
            err,
            Error::NoDefaultTypographyToken { ref group, ref breakpoint }
                if group == "typography-caption" && breakpoint == "mobile"
        ));
    }

    #[test]
    fn missing_breakpoints_fail() {
        let tokens = vec![typography("mobile.caption", &[("fontSize", "12px")])];
        let err = typography_utilities(&tokens, &IndexMap::new()).unwrap_err();
        assert!(matches!(err, Error::NoDefaultBreakpoint));
        assert!(typography_utilities(&[], &IndexMap::new()).unwrap().is_empty());
    }

    #[test]
    fn non_composite_typography_fails() {
        let mut token = typography("mobile.caption", &[]);
        token.value = TokenValue::Single("12px".to_string());
        let err = typography_utilities(&[token], &breakpoints()).unwrap_err();
        assert!(matches!(err, Error::InvalidTypography(_)));
    }

    #[test]
    fn root_typography_token_has_no_breakpoint() {
        let mut token = typography("mobile", &[("fontSize", "12px")]);
        token.path.clear();
        token.name.clear();
        let err = typography_utilities(&[token], &breakpoints()).unwrap_err();
        assert!(matches!(
            err,
            Error::NoDefaultTypographyToken { ref group, .. } if group == "typography-"
        ));
    }

    #[test]
    fn colliding_group_names_keep_the_first_token() {
        let tokens = vec![
            typography("mobile.fooBar", &[("fontSize", "12px")]),
            typography("mobile.foo.bar", &[("fontSize", "99px")]),
        ];
        let utilities = typography_utilities(&tokens, &breakpoints()).unwrap();
        assert_eq!(utilities.len(), 1);
        assert_eq!(utilities[0].selector, "@utility typography-foo-bar");
        let mut sheet = Stylesheet::new();
        sheet.extend(utilities);
        assert_eq!(
            sheet.to_css(),
            "@utility typography-foo-bar {\n\
             \x20   font-size: 12px;\n\
             }\n"
        );
    }
}
