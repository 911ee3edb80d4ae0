//! Shape Compiler
//!
//! Lowers an open-ended value [`Record`] into either JSX attributes (component
//! emission) or a TypeScript type literal (route parameter typing).
//!
//! Dispatch is by tag, in priority order:
//! string, number/boolean, expression escape, nested record, pre-built code.
//! `Null` and `List` have no rendering and are dropped without error.

use std::fmt;

use crate::codegen::{property_key, string_literal};
use crate::model::{Expression, ImportRef, Params, Record, Value};

/// `key={value}` on a JSX element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={{{}}}", self.key, self.value)
    }
}

/// Accumulates the imports required by every expression escape it lowers.
#[derive(Debug, Default)]
pub struct ShapeCompiler {
    imports: Vec<ImportRef>,
}

impl ShapeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    fn splice(&mut self, expression: &Expression) -> String {
        if let Some(import) = &expression.import {
            self.imports.push(import.clone());
        }
        expression.value.clone()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ATTRIBUTES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn attributes(&mut self, record: &Record) -> Vec<Attribute> {
        record
            .iter()
            .filter_map(|(key, value)| {
                self.expression(value).map(|value| Attribute {
                    key: key.to_string(),
                    value,
                })
            })
            .collect()
    }

    /// Value expression, or `None` when the value kind is dropped.
    pub fn expression(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(string_literal(s)),
            Value::Number(n) => Some(n.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Expression(expression) => Some(self.splice(expression)),
            Value::Record(record) => Some(self.object(record)),
            Value::Code(code) => Some(code.clone()),
            Value::Null | Value::List(_) => None,
        }
    }

    pub fn object(&mut self, record: &Record) -> String {
        let properties: Vec<String> = record
            .iter()
            .filter_map(|(key, value)| {
                self.expression(value)
                    .map(|value| format!("{}: {}", property_key(key), value))
            })
            .collect();

        if properties.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", properties.join(", "))
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANNOTATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn annotation(&mut self, params: &Params) -> String {
        match params {
            Params::Expression(expression) => self.splice(expression),
            Params::Record(record) => self.type_literal(record),
        }
    }

    fn type_literal(&mut self, record: &Record) -> String {
        let signatures: Vec<String> = record
            .iter()
            .filter_map(|(key, value)| {
                self.type_of(value)
                    .map(|ty| format!("{}: {};", property_key(key), ty))
            })
            .collect();

        if signatures.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", signatures.join(" "))
        }
    }

    fn type_of(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(_) => Some("string".to_string()),
            Value::Number(_) => Some("number".to_string()),
            Value::Boolean(_) => Some("boolean".to_string()),
            Value::Expression(expression) => Some(self.splice(expression)),
            Value::Record(record) => Some(self.type_literal(record)),
            Value::Code(_) | Value::Null | Value::List(_) => None,
        }
    }

    pub fn imports(&self) -> &[ImportRef] {
        &self.imports
    }
}
