use std::fmt;

use csscolorparser::Color;
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    error::Result,
    units::{format_number, split_dimension},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Color(Color),
    Any(String),
}
impl Value {
    pub fn to_css(&self) -> String {
        match self {
            Value::Color(val) => val.to_hex_string(),
            Value::Any(val) => val.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Ref(Vec<String>),
    Mul(Box<Expression>, Box<Expression>),
    Div(Box<Expression>, Box<Expression>),
    Template(Vec<Expression>),
    Value(Value),
}
impl Expression {
    pub fn parse(input: &str) -> Result<Expression, String> {
        expr_parser::value(input).map_err(|err| err.to_string())
    }

    /// The reference path when the whole expression is a single `{a.b}`.
    pub fn as_ref_path(&self) -> Option<&[String]> {
        match self {
            Expression::Ref(path) => Some(path),
            _ => None,
        }
    }

    /// Evaluates the expression, asking `lookup` for the value behind each reference.
    pub fn evaluate<F>(&self, lookup: &mut F) -> Result<Value>
    where
        F: FnMut(&[String]) -> Result<Value>,
    {
        match self {
            Expression::Ref(path) => lookup(path),
            Expression::Mul(a, b) => {
                let (a, b) = (a.evaluate(&mut *lookup)?, b.evaluate(&mut *lookup)?);
                Ok(arithmetic(Op::Mul, a, b))
            }
            Expression::Div(a, b) => {
                let (a, b) = (a.evaluate(&mut *lookup)?, b.evaluate(&mut *lookup)?);
                Ok(arithmetic(Op::Div, a, b))
            }
            Expression::Template(parts) => {
                let mut text = String::new();
                for part in parts {
                    text.push_str(&part.evaluate(&mut *lookup)?.to_css());
                }
                Ok(Value::Any(text))
            }
            Expression::Value(value) => Ok(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Mul,
    Div,
}

/// Evaluates math between two dimensions sharing at most one unit, falling
/// back to `calc()` for everything else.
fn arithmetic(op: Op, a: Value, b: Value) -> Value {
    let (a, b) = (a.to_css(), b.to_css());
    let symbol = match op {
        Op::Mul => "*",
        Op::Div => "/",
    };
    let fallback = || Value::Any(format!("calc({a} {symbol} {b})"));
    let (Some((x, unit_a)), Some((y, unit_b))) = (split_dimension(&a), split_dimension(&b)) else {
        return fallback();
    };
    let unit = match (unit_a, unit_b) {
        ("", unit) | (unit, "") => unit,
        _ => return fallback(),
    };
    let result = match op {
        Op::Mul => x * y,
        Op::Div if y == 0.0 => return fallback(),
        Op::Div => x / y,
    };
    let rounded = (result * 10_000.0).round() / 10_000.0;
    Value::Any(format!("{}{unit}", format_number(rounded)))
}

peg::parser! {
  grammar expr_parser() for str {
    rule _ = quiet!{[' ' | '\n' | '\t']*}

    pub(crate) rule value() -> Expression
        = e:expr() ![_] { e }
        / t:template() { t }
        / ![_] { Expression::Value(Value::Any(String::new())) }

    rule expr() -> Expression = _ e:arith() _ { e }

    rule arith() -> Expression = precedence!{
        x:(@) _ "*" _ y:@ { Expression::Mul(Box::new(x), Box::new(y)) }
        x:(@) _ "/" _ y:@ { Expression::Div(Box::new(x), Box::new(y)) }
        --
        r:reference() { r }
        c:color() { c }
        l:literal() { l }
    }

    rule reference() -> Expression
        = "{" v:($((!['}' | '{' | '.'] [_])+) ++ ".") "}" { Expression::Ref(v.iter().map(|x| x.to_string()).collect()) }

    rule color() -> Expression
        = v:$("#" ['a'..='z' | 'A'..='Z' | '0'..='9']+) {?
            csscolorparser::parse(v).map(|c| Expression::Value(Value::Color(c))).or(Err("hex color"))
        }

    rule literal() -> Expression
        = v:$((!['{' | '}' | '*' | '/'] [_])+) { Expression::Value(Value::Any(v.trim().to_string())) }

    rule template() -> Expression
        = parts:(reference() / text())+ {
            match parts.as_slice() {
                [Expression::Value(_)] => parts.into_iter().next().unwrap_or(Expression::Template(Vec::new())),
                _ => Expression::Template(parts),
            }
        }

    rule text() -> Expression
        = v:$((!reference() [_])+) { Expression::Value(Value::Any(v.to_string())) }
  }
}

struct ExpressionVisitor;

impl<'de> Visitor<'de> for ExpressionVisitor {
    type Value = Expression;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a token value string or number")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match Expression::parse(value) {
            Ok(expr) => Ok(expr),
            Err(err) => Err(E::custom(format!("Invalid expression: {}", err))),
        }
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Expression::Value(Value::Any(value.to_string())))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Expression::Value(Value::Any(value.to_string())))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Expression::Value(Value::Any(format_number(value))))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Expression::Value(Value::Any(value.to_string())))
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D>(deserializer: D) -> Result<Expression, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ExpressionVisitor)
    }
}
