//! Minimal CSS object model: statements, rules with declarations and nested
//! rules, serialized with four-space indentation and a blank line between
//! top-level nodes.

use std::fmt::{self, Write};

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub children: Vec<Rule>,
}
impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Rule {
            selector: selector.into(),
            declarations: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn declare(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.push(Declaration {
            property: property.into(),
            value: value.into(),
        });
    }

    pub fn nest(&mut self, rule: Rule) {
        self.children.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.children.is_empty()
    }

    fn write_to(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = INDENT.repeat(depth);
        writeln!(out, "{indent}{} {{", self.selector)?;
        for Declaration { property, value } in &self.declarations {
            writeln!(out, "{indent}{INDENT}{property}: {value};")?;
        }
        for child in &self.children {
            child.write_to(out, depth + 1)?;
        }
        writeln!(out, "{indent}}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A bodiless at-rule such as `@import 'tailwindcss'`.
    Statement(String),
    Rule(Rule),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    nodes: Vec<Node>,
}
impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statement(&mut self, statement: impl Into<String>) {
        self.nodes.push(Node::Statement(statement.into()));
    }

    /// Appends a rule; empty rules are dropped.
    pub fn rule(&mut self, rule: Rule) {
        if !rule.is_empty() {
            self.nodes.push(Node::Rule(rule));
        }
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        for rule in rules {
            self.rule(rule);
        }
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            match node {
                Node::Statement(statement) => writeln!(out, "{statement};")?,
                Node::Rule(rule) => rule.write_to(&mut out, 0)?,
            }
        }
        f.write_str(&out)
    }
}
