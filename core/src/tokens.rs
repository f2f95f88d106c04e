use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    css_name,
    error::{Error, Result},
    expression::{Expression, Value},
    schema::{RawToken, RawValue, TokenOrGroup, TokenType},
};

/// A fully resolved token value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Single(String),
    Composite(IndexMap<String, String>),
    List(Vec<IndexMap<String, String>>),
}
impl TokenValue {
    pub fn as_composite(&self) -> Option<&IndexMap<String, String>> {
        match self {
            TokenValue::Composite(map) => Some(map),
            _ => None,
        }
    }
    pub fn as_composite_mut(&mut self) -> Option<&mut IndexMap<String, String>> {
        match self {
            TokenValue::Composite(map) => Some(map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Kebab-case identifier derived from the path, e.g. `colors-primary-500`.
    pub name: String,
    pub path: Vec<String>,
    pub token_type: TokenType,
    pub value: TokenValue,
    pub description: Option<String>,
}
impl Token {
    pub fn is_typography(&self) -> bool {
        self.token_type == TokenType::Typography
    }
}

/// Every token of a build, flattened and resolved, in document order.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tokens: Vec<Token>,
}
impl Dictionary {
    pub fn from_document(document: &TokenOrGroup) -> Result<Self> {
        let mut entries = IndexMap::new();
        flatten(document, &mut Vec::new(), None, &mut entries)?;
        let mut resolver = Resolver {
            entries: &entries,
            cache: HashMap::new(),
            stack: Vec::new(),
        };
        let tokens = entries
            .iter()
            .map(|(key, entry)| {
                Ok(Token {
                    name: css_name(&entry.path),
                    path: entry.path.clone(),
                    token_type: entry.token_type,
                    value: resolver.resolve(key)?,
                    description: entry.raw.description.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = tokens.len(), "resolved tokens");
        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Looks a token up by its dotted path, e.g. `colors.primary.500`.
    pub fn get(&self, path: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.path.iter().join(".") == path)
    }

    pub fn of_type(&self, token_type: TokenType) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |token| token.token_type == token_type)
    }
}

struct Entry<'a> {
    path: Vec<String>,
    token_type: TokenType,
    raw: &'a RawToken,
}

fn flatten<'a>(
    node: &'a TokenOrGroup,
    path: &mut Vec<String>,
    inherited: Option<TokenType>,
    entries: &mut IndexMap<String, Entry<'a>>,
) -> Result<()> {
    match node {
        TokenOrGroup::Token(raw) => {
            let token_type = raw.type_.or(inherited).unwrap_or(TokenType::Other);
            entries.insert(
                path.join("."),
                Entry {
                    path: path.clone(),
                    token_type,
                    raw,
                },
            );
        }
        TokenOrGroup::Group(group) => {
            if group.contains_key("value") || group.contains_key("$value") {
                return Err(Error::MalformedToken {
                    path: path.join("."),
                    reason: "value could not be read as a token value".to_string(),
                });
            }
            let inherited = match group.get("$type") {
                Some(TokenOrGroup::Meta(meta)) => {
                    serde_json::from_value::<TokenType>(meta.clone()).ok().or(inherited)
                }
                _ => inherited,
            };
            for (key, child) in group {
                if key.starts_with('$') {
                    continue;
                }
                path.push(key.clone());
                flatten(child, path, inherited, entries)?;
                path.pop();
            }
        }
        TokenOrGroup::Meta(meta) => {
            tracing::warn!(path = %path.join("."), %meta, "skipping entry that is neither a token nor a group");
        }
    }
    Ok(())
}

struct Resolver<'a> {
    entries: &'a IndexMap<String, Entry<'a>>,
    cache: HashMap<String, TokenValue>,
    stack: Vec<String>,
}
impl<'a> Resolver<'a> {
    fn resolve(&mut self, key: &str) -> Result<TokenValue> {
        if let Some(value) = self.cache.get(key) {
            return Ok(value.clone());
        }
        if let Some(start) = self.stack.iter().position(|visiting| visiting == key) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(key.to_string());
            return Err(Error::CircularReference(cycle));
        }
        let entries = self.entries;
        let Some(entry) = entries.get(key) else {
            return Err(Error::MalformedToken {
                path: key.to_string(),
                reason: "token does not exist".to_string(),
            });
        };

        self.stack.push(key.to_string());
        let value = self.resolve_raw(key, entry.raw);
        self.stack.pop();

        let value = value?;
        self.cache.insert(key.to_string(), value.clone());
        Ok(value)
    }

    fn resolve_raw(&mut self, key: &str, raw: &RawToken) -> Result<TokenValue> {
        match &raw.value {
            RawValue::Single(expr) => {
                if let Some(target) = self.alias_target(expr) {
                    let value = self.resolve(&target)?;
                    if !matches!(value, TokenValue::Single(_)) {
                        return Ok(value);
                    }
                }
                let value = self.evaluate(key, expr)?;
                let value = match &raw.extensions {
                    Some(extensions) => extensions.apply(key, value)?,
                    None => value,
                };
                Ok(TokenValue::Single(value.to_css()))
            }
            RawValue::Dict(dict) => Ok(TokenValue::Composite(self.resolve_dict(key, dict)?)),
            RawValue::Array(items) => {
                let values = items
                    .iter()
                    .map(|item| self.evaluate(key, item).map(|value| value.to_css()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TokenValue::Single(values.join(", ")))
            }
            RawValue::List(list) => Ok(TokenValue::List(
                list.iter()
                    .map(|dict| self.resolve_dict(key, dict))
                    .collect::<Result<Vec<_>>>()?,
            )),
        }
    }

    fn resolve_dict(
        &mut self,
        key: &str,
        dict: &IndexMap<String, Expression>,
    ) -> Result<IndexMap<String, String>> {
        dict.iter()
            .map(|(field, expr)| Ok((field.clone(), self.evaluate(key, expr)?.to_css())))
            .collect()
    }

    /// Dotted path of the token a whole-value reference points to.
    fn alias_target(&self, expr: &Expression) -> Option<String> {
        let target = expr.as_ref_path()?.join(".");
        self.entries.contains_key(&target).then_some(target)
    }

    fn evaluate(&mut self, key: &str, expr: &Expression) -> Result<Value> {
        expr.evaluate(&mut |path: &[String]| self.lookup(key, path))
    }

    fn lookup(&mut self, key: &str, path: &[String]) -> Result<Value> {
        let reference = path.join(".");
        if !self.entries.contains_key(&reference) {
            return Err(Error::UnresolvedReference {
                token: key.to_string(),
                reference,
            });
        }
        match self.resolve(&reference)? {
            TokenValue::Single(value) => Ok(Value::Any(value)),
            _ => Err(Error::MalformedToken {
                path: key.to_string(),
                reason: format!("composite token `{reference}` cannot be used inside an expression"),
            }),
        }
    }
}
