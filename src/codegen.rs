//! Codegen module
//!
//! Source-text building blocks shared by the emitters: top-level
//! declarations, merged module imports and literal/key quoting. Emitters
//! produce an [`Artifact`]; the writer is the only place that formats and
//! persists it.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::model::ImportRef;

// ═══════════════════════════════════════════════════════════════════════════════
// DECLARATIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `import * as alias from 'module'`
    NamespaceImport { alias: String, module: String },
    /// `import { a, b } from 'module'`
    NamedImport { symbols: Vec<String>, module: String },
    /// `[export] const name = value`
    Const {
        export: bool,
        name: String,
        value: String,
    },
}

impl Declaration {
    pub fn namespace(alias: impl Into<String>, module: impl Into<String>) -> Self {
        Declaration::NamespaceImport {
            alias: alias.into(),
            module: module.into(),
        }
    }

    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration::Const {
            export: false,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn exported(name: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration::Const {
            export: true,
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::NamespaceImport { alias, module } => {
                write!(f, "import * as {} from {};", alias, module_literal(module))
            }
            Declaration::NamedImport { symbols, module } => {
                write!(
                    f,
                    "import {{ {} }} from {};",
                    symbols.join(", "),
                    module_literal(module)
                )
            }
            Declaration::Const {
                export,
                name,
                value,
            } => {
                if *export {
                    write!(f, "export ")?;
                }
                write!(f, "const {} = {};", name, value)
            }
        }
    }
}

/// Renders declarations one per line, in order.
pub fn render(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|declaration| declaration.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Named imports merged per module. Modules keep first-appearance order and
/// a symbol is imported once per module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Imports {
    modules: Vec<(String, Vec<String>)>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, import: &ImportRef) {
        match self
            .modules
            .iter_mut()
            .find(|(module, _)| *module == import.module)
        {
            Some((_, symbols)) => {
                if !symbols.contains(&import.symbol) {
                    symbols.push(import.symbol.clone());
                }
            }
            None => self
                .modules
                .push((import.module.clone(), vec![import.symbol.clone()])),
        }
    }

    pub fn into_declarations(self) -> Vec<Declaration> {
        self.modules
            .into_iter()
            .map(|(module, symbols)| Declaration::NamedImport { symbols, module })
            .collect()
    }
}

impl<'a> Extend<&'a ImportRef> for Imports {
    fn extend<I: IntoIterator<Item = &'a ImportRef>>(&mut self, iter: I) {
        for import in iter {
            self.add(import);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARTIFACTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Dialect an artifact must parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    Tsx,
    Ts,
}

/// Regex replacement applied to the formatted source.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub pattern: &'static Regex,
    pub replacement: &'static str,
}

impl Substitution {
    pub fn apply(&self, source: &str) -> String {
        self.pattern
            .replace_all(source, self.replacement)
            .into_owned()
    }
}

#[derive(Debug, Clone)]
pub enum Payload {
    Source {
        syntax: SourceSyntax,
        declarations: Vec<Declaration>,
        substitution: Option<Substitution>,
    },
    Text(String),
}

/// One generated file, relative to the directory of its navigation source.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: &'static str,
    pub payload: Payload,
}

impl Artifact {
    pub fn source(
        file_name: &'static str,
        syntax: SourceSyntax,
        declarations: Vec<Declaration>,
    ) -> Self {
        Self {
            file_name,
            payload: Payload::Source {
                syntax,
                declarations,
                substitution: None,
            },
        }
    }

    pub fn text(file_name: &'static str, text: String) -> Self {
        Self {
            file_name,
            payload: Payload::Text(text),
        }
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        if let Payload::Source {
            substitution: slot, ..
        } = &mut self.payload
        {
            *slot = Some(substitution);
        }
        self
    }

    /// Unformatted text of the artifact.
    pub fn raw_text(&self) -> String {
        match &self.payload {
            Payload::Source { declarations, .. } => render(declarations),
            Payload::Text(text) => text.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LITERALS
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Double-quoted string literal.
pub fn string_literal(s: &str) -> String {
    format!("\"{}\"", escape_js_string(s))
}

/// Single-quoted literal, as used for module specifiers and route names.
pub fn module_literal(s: &str) -> String {
    format!("'{}'", escape_js_string(s).replace('\'', "\\'"))
}

pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// Object/type literal key: bare when it is an identifier, quoted otherwise.
pub fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        string_literal(key)
    }
}
