//! Tree Model
//!
//! Canonical, immutable navigation tree produced by the normalizer. Nodes are
//! built once and only read afterwards; parent linkage is a reduced chain of
//! [`ParentLink`]s so a node never points back at its full parent node.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-tree defaults, shared unchanged by every node of the tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub path: String,
    #[serde(default = "default_lazy")]
    pub lazy: bool,
    #[serde(default)]
    pub template: Option<Templates>,
}

fn default_lazy() -> bool {
    true
}

/// File-name pattern to content pattern, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Templates(pub Vec<(String, String)>);

impl Templates {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, content)| (name.as_str(), content.as_str()))
    }
}

impl<'de> Deserialize<'de> for Templates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TemplatesVisitor;

        impl<'de> Visitor<'de> for TemplatesVisitor {
            type Value = Templates;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of file name patterns to content patterns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Templates, A::Error> {
                let mut entries = Vec::new();
                while let Some((name, content)) = map.next_entry::<String, String>()? {
                    entries.push((name, content));
                }
                Ok(Templates(entries))
            }
        }

        deserializer.deserialize_map(TemplatesVisitor)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// A `[symbol, module]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportRef {
    pub symbol: String,
    pub module: String,
}

impl ImportRef {
    pub fn new(symbol: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            module: module.into(),
        }
    }
}

/// Verbatim code fragment embedded in configuration data.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub value: String,
    /// Import the fragment needs in scope.
    pub import: Option<ImportRef>,
}

/// Open-ended prop/param value. The tag set is closed: anything the shape
/// compiler has no rendering for (`Null`, `List`) is dropped there.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    Null,
    List(Vec<Value>),
    Record(Record),
    Expression(Expression),
    /// Already-synthesized source, e.g. `route.routeHomeFeed`. Never decoded from input.
    Code(String),
}

/// Ordered key/value record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, value)| value)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// Route parameters of a screen: a typed record or an opaque type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Record(Record),
    Expression(Expression),
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARENT LINKS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTag {
    Navigator,
    Group,
}

/// Reduced view of an enclosing Navigator or Group, carrying only what naming
/// needs. Links form a chain towards the root, never a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentLink {
    pub tag: LinkTag,
    pub name: String,
    /// Group: declared at the top level. Navigator: an external navigator
    /// referenced as a screen.
    pub reference: bool,
    /// Navigator only.
    pub root: bool,
    pub parent: Option<Arc<ParentLink>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinKind {
    NativeStack,
    BottomTab,
    Stack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigatorKind {
    Builtin(BuiltinKind),
    Custom(ImportRef),
}

impl Default for NavigatorKind {
    fn default() -> Self {
        NavigatorKind::Builtin(BuiltinKind::NativeStack)
    }
}

impl NavigatorKind {
    /// Stack factory and the package exporting it.
    pub fn factory(&self) -> ImportRef {
        match self {
            NavigatorKind::Builtin(BuiltinKind::NativeStack) => ImportRef::new(
                "createNativeStackNavigator",
                "@react-navigation/native-stack",
            ),
            NavigatorKind::Builtin(BuiltinKind::BottomTab) => {
                ImportRef::new("createBottomTabNavigator", "@react-navigation/bottom-tabs")
            }
            NavigatorKind::Builtin(BuiltinKind::Stack) => {
                ImportRef::new("createStackNavigator", "@react-navigation/stack")
            }
            NavigatorKind::Custom(import) => import.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ScreenKind {
    #[default]
    Screen,
    /// A nested navigator standing in as a screen of its parent.
    Navigator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    pub name: String,
    pub export: bool,
    pub root: bool,
    pub path: Option<String>,
    pub kind: NavigatorKind,
    pub props: Option<Record>,
    pub children: Vec<Node>,
    pub parent: Option<Arc<ParentLink>>,
    pub config: Arc<Config>,
}

impl Navigator {
    /// No inline children and a non-empty path: imported, never generated.
    pub fn is_external(&self) -> bool {
        self.external_path().is_some()
    }

    /// Import path of an external navigator.
    pub fn external_path(&self) -> Option<&str> {
        if self.children.is_empty() {
            self.path.as_deref().filter(|path| !path.is_empty())
        } else {
            None
        }
    }

    pub fn link(&self) -> ParentLink {
        ParentLink {
            tag: LinkTag::Navigator,
            name: self.name.clone(),
            reference: false,
            root: self.root,
            parent: self.parent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub path: Option<String>,
    pub props: Option<Record>,
    pub children: Vec<Screen>,
    pub reference: bool,
    pub parent: Option<Arc<ParentLink>>,
    pub config: Arc<Config>,
}

impl Group {
    pub fn link(&self) -> ParentLink {
        ParentLink {
            tag: LinkTag::Group,
            name: self.name.clone(),
            reference: self.reference,
            root: false,
            parent: self.parent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub name: String,
    pub lazy: Option<bool>,
    pub kind: ScreenKind,
    pub path: Option<String>,
    pub props: Option<Record>,
    pub params: Option<Params>,
    pub parent: Arc<ParentLink>,
    pub config: Arc<Config>,
}

impl Screen {
    pub fn is_lazy(&self) -> bool {
        self.lazy.unwrap_or(self.config.lazy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Navigator(Navigator),
    Group(Group),
    Screen(Screen),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Navigator(navigator) => &navigator.name,
            Node::Group(group) => &group.name,
            Node::Screen(screen) => &screen.name,
        }
    }
}

/// Canonical tree of one navigation source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub config: Arc<Config>,
    /// Top-level group declarations.
    pub groups: Vec<Group>,
    pub navigators: Vec<Navigator>,
}
