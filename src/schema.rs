//! Raw declarative schema
//!
//! Strict structural shape of the decoded navigation source. Every node is
//! tagged by `_tag`; open-ended `props`/`params` stay untyped JSON until they
//! are decoded into the closed [`Value`] tag set.

use serde::Deserialize;
use serde_json::Map;

use crate::error::DecodeError;
use crate::model::{BuiltinKind, Config, Expression, ImportRef, Params, Record, ScreenKind, Value};

pub type RawObject = Map<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
pub struct RawTree {
    pub config: Config,
    #[serde(default)]
    pub groups: Vec<RawNode>,
    pub navigators: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "_tag")]
pub enum RawNode {
    Navigator(RawNavigator),
    Group(RawGroup),
    Screen(RawScreen),
}

impl RawNode {
    fn tag(&self) -> &'static str {
        match self {
            RawNode::Navigator(_) => "Navigator",
            RawNode::Group(_) => "Group",
            RawNode::Screen(_) => "Screen",
        }
    }

    pub fn into_navigator(self, at: &str) -> Result<RawNavigator, DecodeError> {
        match self {
            RawNode::Navigator(navigator) => Ok(navigator),
            other => Err(unexpected_tag(at, "Navigator", other.tag())),
        }
    }

    pub fn into_group(self, at: &str) -> Result<RawGroup, DecodeError> {
        match self {
            RawNode::Group(group) => Ok(group),
            other => Err(unexpected_tag(at, "Group", other.tag())),
        }
    }

    pub fn into_screen(self, at: &str) -> Result<RawScreen, DecodeError> {
        match self {
            RawNode::Screen(screen) => Ok(screen),
            other => Err(unexpected_tag(at, "Screen", other.tag())),
        }
    }
}

fn unexpected_tag(at: &str, expected: &str, found: &str) -> DecodeError {
    DecodeError::new(format!("{at}: expected {expected}, found {found}"))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawKind {
    Builtin(BuiltinKind),
    Custom(String, String),
}

#[derive(Debug, Deserialize)]
pub struct RawNavigator {
    pub name: String,
    #[serde(default)]
    pub export: Option<bool>,
    #[serde(default)]
    pub root: Option<bool>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<RawKind>,
    #[serde(default)]
    pub props: Option<RawObject>,
    pub children: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
pub struct RawGroup {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub props: Option<RawObject>,
    pub children: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
pub struct RawScreen {
    pub name: String,
    #[serde(default)]
    pub lazy: Option<bool>,
    #[serde(default, rename = "type")]
    pub kind: Option<ScreenKind>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub props: Option<RawObject>,
    #[serde(default)]
    pub params: Option<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawExpression {
    value: String,
    #[serde(default, rename = "use")]
    import: Option<(String, String)>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUE DECODING
// ═══════════════════════════════════════════════════════════════════════════════

fn is_expression(object: &RawObject) -> bool {
    object.get("_tag").and_then(serde_json::Value::as_str) == Some("Expression")
}

pub fn decode_value(value: serde_json::Value) -> Result<Value, DecodeError> {
    Ok(match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Number(n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_json::Value::Object(object) if is_expression(&object) => {
            Value::Expression(decode_expression(object)?)
        }
        serde_json::Value::Object(object) => Value::Record(decode_record(object)?),
    })
}

pub fn decode_record(object: RawObject) -> Result<Record, DecodeError> {
    object
        .into_iter()
        .map(|(key, value)| -> Result<(String, Value), DecodeError> {
            Ok((key, decode_value(value)?))
        })
        .collect()
}

pub fn decode_expression(object: RawObject) -> Result<Expression, DecodeError> {
    let raw: RawExpression = serde_json::from_value(serde_json::Value::Object(object))
        .map_err(|e| DecodeError::new(format!("invalid Expression: {e}")))?;
    Ok(Expression {
        value: raw.value,
        import: raw.import.map(|(symbol, module)| ImportRef::new(symbol, module)),
    })
}

pub fn decode_params(object: RawObject) -> Result<Params, DecodeError> {
    if is_expression(&object) {
        decode_expression(object).map(Params::Expression)
    } else {
        decode_record(object).map(Params::Record)
    }
}

pub fn decode_props(object: Option<RawObject>) -> Result<Option<Record>, DecodeError> {
    object.map(decode_record).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> RawObject {
        match value {
            serde_json::Value::Object(object) => object,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_record_keeps_declaration_order() {
        let record = decode_record(object(json!({ "zeta": 1, "alpha": 2, "mid": 3 }))).unwrap();
        let keys: Vec<&str> = record.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_expression_is_recognised_at_any_depth() {
        let record = decode_record(object(json!({
            "options": {
                "header": { "_tag": "Expression", "value": "Header", "use": ["Header", "./Header"] }
            }
        })))
        .unwrap();

        let Some(Value::Record(options)) = record.get("options") else {
            panic!("options should decode as a record");
        };
        assert_eq!(
            options.get("header"),
            Some(&Value::Expression(Expression {
                value: "Header".to_string(),
                import: Some(ImportRef::new("Header", "./Header")),
            }))
        );
    }

    #[test]
    fn test_malformed_expression_is_a_decode_error() {
        let error = decode_value(json!({ "_tag": "Expression", "value": 42 })).unwrap_err();
        assert!(error.message.contains("invalid Expression"));
    }

    #[test]
    fn test_params_expression_or_record() {
        let params = decode_params(object(json!({ "_tag": "Expression", "value": "Props" })));
        assert!(matches!(params, Ok(Params::Expression(_))));

        let params = decode_params(object(json!({ "id": "string" })));
        assert!(matches!(params, Ok(Params::Record(_))));
    }

    #[test]
    fn test_navigator_kind_builtin_and_custom() {
        let kind: RawKind = serde_json::from_value(json!("bottom-tab")).unwrap();
        assert!(matches!(kind, RawKind::Builtin(BuiltinKind::BottomTab)));

        let kind: RawKind =
            serde_json::from_value(json!(["createDrawerNavigator", "@react-navigation/drawer"]))
                .unwrap();
        assert!(matches!(kind, RawKind::Custom(symbol, _) if symbol == "createDrawerNavigator"));

        assert!(serde_json::from_value::<RawKind>(json!("drawer")).is_err());
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let result: Result<RawNode, _> =
            serde_json::from_value(json!({ "_tag": "Modal", "name": "Sheet" }));
        assert!(result.is_err());
    }
}
