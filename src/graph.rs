//! Graph Emitter
//!
//! Emits `navigation.gen.dot`: one box per navigator, group and screen, each
//! with an edge from its parent, inside a fixed circular layout.

use std::sync::Arc;

use crate::codegen::Artifact;
use crate::model::{Navigator, Node, ParentLink, Record, Screen, Value};

pub const FILE_NAME: &str = "navigation.gen.dot";
pub const IMAGE_FILE_NAME: &str = "navigation.gen.svg";

const TEMPLATE: &str = r#"digraph G {
  layout=circo;
  graph [
    nodesep=2.0,
    ranksep=2.0,
    splines="curved",
    overlap=false,
    pad=1.5,
    sep="+2.0,2.0",
    defaultdist=0.1,
    mindist=0.1
  ];
  {{content}}
}"#;

const LINE_BREAK: &str = r#"<br align="left" />"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Navigator,
    Group,
    Screen,
}

impl ElementKind {
    fn label(self) -> &'static str {
        match self {
            ElementKind::Navigator => "Navigator",
            ElementKind::Group => "Group",
            ElementKind::Screen => "Screen",
        }
    }

    fn color(self) -> &'static str {
        match self {
            ElementKind::Navigator => "#FDE33A",
            ElementKind::Group => "#F6ACD8",
            ElementKind::Screen => "#C3EFE0",
        }
    }

    fn weight(self) -> f64 {
        match self {
            ElementKind::Navigator => 10.0,
            ElementKind::Group => 2.0,
            ElementKind::Screen => 0.1,
        }
    }

    fn style(self) -> String {
        format!(
            r#"shape="box", fillcolor="{}", style="filled", fontname="monospace", fontsize="16", margin="0.3,0.2", penwidth="1.5""#,
            self.color()
        )
    }
}

/// One drawable node of the graph.
#[derive(Debug, Clone)]
pub struct GraphElement<'t> {
    pub kind: ElementKind,
    pub name: &'t str,
    pub parent: Option<&'t Arc<ParentLink>>,
    /// Screens only.
    pub path: Option<String>,
    pub props: Option<&'t Record>,
}

impl GraphElement<'_> {
    fn label(&self) -> String {
        let mut entries = Record::new();
        entries.insert(
            self.kind.label(),
            Value::String(format!("<b>{}</b>", self.name)),
        );
        if let Some(path) = &self.path {
            entries.insert("path", Value::String(path.clone()));
        }
        if let Some(props) = self.props {
            entries.insert("props", Value::Record(props.clone()));
        }
        stringify(&entries, 0)
    }

    pub fn render(&self) -> String {
        let label = self.label();
        let style = self.kind.style();
        let weight = self.kind.weight();

        match self.parent {
            Some(parent) => {
                let parent_name = parent.graph_name();
                let id = format!("{}{}", parent_name, self.name);
                format!(
                    "{id} [label=<{label}> {style}, weight={weight}];\n{parent_name} -> {id} [dir=\"forward\"]"
                )
            }
            None => format!(
                "{name} [label=<{label}> {style}];\n{name} [weight={weight}]",
                name = self.name
            ),
        }
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn indent(depth: usize, line: String) -> String {
    format!("{}{}", "&nbsp;".repeat(depth * 2), line)
}

/// HTML-like label lines. Top-level keys are capitalized and nested records
/// are indented by depth.
fn stringify(record: &Record, depth: usize) -> String {
    record
        .iter()
        .filter_map(|(key, value)| {
            let name = if depth == 0 {
                capitalize(key)
            } else {
                key.to_string()
            };

            match value {
                Value::Expression(_) => Some(indent(depth, format!("{name}: <i>Expression</i>"))),
                Value::Record(nested) => Some(format!(
                    "{}{}",
                    indent(depth, format!("{name}:{LINE_BREAK}")),
                    stringify(nested, depth + 1)
                )),
                Value::String(s) => Some(indent(depth, format!("{name}: {s}"))),
                Value::Number(n) => Some(indent(depth, format!("{name}: {n}"))),
                Value::Boolean(b) => Some(indent(depth, format!("{name}: {b}"))),
                Value::Code(_) | Value::Null | Value::List(_) => None,
            }
        })
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

/// Containers are prepended and screens appended as the walk goes.
fn traverse<'t>(children: &'t [Node], mut acc: Vec<GraphElement<'t>>) -> Vec<GraphElement<'t>> {
    for child in children {
        acc = match child {
            Node::Navigator(navigator) => traverse_navigator(navigator, acc),
            Node::Group(group) => {
                acc.insert(
                    0,
                    GraphElement {
                        kind: ElementKind::Group,
                        name: &group.name,
                        parent: group.parent.as_ref(),
                        path: None,
                        props: group.props.as_ref(),
                    },
                );
                group.children.iter().fold(acc, |mut acc, screen| {
                    acc.push(screen_element(screen));
                    acc
                })
            }
            Node::Screen(screen) => {
                acc.push(screen_element(screen));
                acc
            }
        };
    }
    acc
}

fn traverse_navigator<'t>(navigator: &'t Navigator, mut acc: Vec<GraphElement<'t>>) -> Vec<GraphElement<'t>> {
    acc.insert(
        0,
        GraphElement {
            kind: ElementKind::Navigator,
            name: &navigator.name,
            parent: navigator.parent.as_ref(),
            path: None,
            props: navigator.props.as_ref(),
        },
    );
    traverse(&navigator.children, acc)
}

fn screen_element(screen: &Screen) -> GraphElement<'_> {
    GraphElement {
        kind: ElementKind::Screen,
        name: &screen.name,
        parent: Some(&screen.parent),
        path: Some(screen.import_path()),
        props: screen.props.as_ref(),
    }
}

pub fn elements(navigators: &[Navigator]) -> Vec<GraphElement<'_>> {
    navigators
        .iter()
        .fold(Vec::new(), |acc, navigator| traverse_navigator(navigator, acc))
}

pub fn build(navigators: &[Navigator]) -> Artifact {
    let content = elements(navigators)
        .iter()
        .map(GraphElement::render)
        .collect::<Vec<_>>()
        .join("\n  ");

    Artifact::text(FILE_NAME, TEMPLATE.replace("{{content}}", &content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{canonical, group, navigator, root, screen, with};
    use serde_json::json;
    use std::collections::HashSet;

    fn ids(navigators: &[Navigator]) -> Vec<String> {
        elements(navigators)
            .iter()
            .map(|element| match element.parent {
                Some(parent) => format!("{}{}", parent.graph_name(), element.name),
                None => element.name.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_containers_prepended_screens_appended() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    screen("Feed"),
                    group("Tabs", vec![screen("Inbox")]),
                    navigator("Settings", vec![screen("Profile")]),
                ],
            )],
        );
        assert_eq!(
            ids(&tree.navigators),
            vec!["AppSettings", "AppTabs", "App", "AppFeed", "AppTabsInbox", "AppSettingsProfile"]
        );
    }

    #[test]
    fn test_graph_names_are_unique() {
        let tree = canonical(
            vec![group("Shared", vec![screen("Detail")])],
            vec![root(
                "App",
                vec![
                    navigator("Auth", vec![screen("Login")]),
                    navigator("Onboarding", vec![screen("Login")]),
                    navigator("Home", vec![group("Shared", vec![screen("Detail")])]),
                    navigator("Profile", vec![group("Shared", vec![screen("Detail")])]),
                ],
            )],
        );
        let ids = ids(&tree.navigators);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "{ids:?}");
    }

    #[test]
    fn test_node_styles_and_edges() {
        let tree = canonical(
            vec![],
            vec![root("App", vec![navigator("Home", vec![screen("Feed")])])],
        );
        let text = build(&tree.navigators).raw_text();

        assert!(text.starts_with("digraph G {\n  layout=circo;"));
        assert!(text.contains(r##"App [label=<Navigator: <b>App</b>> shape="box", fillcolor="#FDE33A""##));
        assert!(text.contains("App [weight=10]"));
        assert!(text.contains(r#"App -> AppHome [dir="forward"]"#));
        assert!(text.contains(r#"AppHome -> AppHomeFeed [dir="forward"]"#));
        assert!(text.contains(r##"fillcolor="#C3EFE0", style="filled", fontname="monospace", fontsize="16", margin="0.3,0.2", penwidth="1.5", weight=0.1];"##));
    }

    #[test]
    fn test_label_lists_path_and_props() {
        let header = json!({ "_tag": "Expression", "value": "Header" });
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![with(
                    screen("Feed"),
                    "props",
                    json!({ "options": { "title": "Feed", "header": header } }),
                )],
            )],
        );
        let text = build(&tree.navigators).raw_text();

        let br = r#"<br align="left" />"#;
        let expected = format!(
            "Screen: <b>Feed</b>{br}Path: src/screens/Feed{br}Props:{br}&nbsp;&nbsp;options:{br}&nbsp;&nbsp;&nbsp;&nbsp;title: Feed{br}&nbsp;&nbsp;&nbsp;&nbsp;header: <i>Expression</i>"
        );
        assert!(text.contains(&expected), "{text}");
    }
}
