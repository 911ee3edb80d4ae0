//! Fixture builders for the raw declarative input.

use serde_json::{json, Value};

use crate::model::Tree;
use crate::normalize::normalize;

pub fn tree(groups: Vec<Value>, navigators: Vec<Value>) -> Value {
    json!({
        "config": { "path": "src/screens" },
        "groups": groups,
        "navigators": navigators,
    })
}

pub fn navigator(name: &str, children: Vec<Value>) -> Value {
    json!({ "_tag": "Navigator", "name": name, "children": children })
}

pub fn root(name: &str, children: Vec<Value>) -> Value {
    with(navigator(name, children), "root", json!(true))
}

pub fn external(name: &str, path: &str) -> Value {
    with(navigator(name, vec![]), "path", json!(path))
}

pub fn group(name: &str, children: Vec<Value>) -> Value {
    json!({ "_tag": "Group", "name": name, "children": children })
}

pub fn screen(name: &str) -> Value {
    json!({ "_tag": "Screen", "name": name })
}

/// Sets `key` on a fixture node.
pub fn with(mut node: Value, key: &str, value: Value) -> Value {
    if let Value::Object(object) = &mut node {
        object.insert(key.to_string(), value);
    }
    node
}

pub fn canonical(groups: Vec<Value>, navigators: Vec<Value>) -> Tree {
    normalize(tree(groups, navigators)).expect("fixture should normalize")
}

/// Parses `source` as TSX and returns the parser diagnostics.
pub fn syntax_errors(source: &str, jsx: bool) -> Vec<String> {
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(jsx);
    let ret = Parser::new(&allocator, source, source_type).parse();
    ret.errors.iter().map(|e| format!("{:?}", e)).collect()
}
