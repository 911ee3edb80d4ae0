//! Flattener
//!
//! Extracts the three lists every emitter folds over from the canonical tree.
//! All entries borrow from the tree, so the result lives exactly as long as it.

use std::collections::HashSet;

use crate::model::{Expression, Navigator, Node, Screen, Tree};
use crate::visitor::{walk_navigators, walk_screen, TreeVisitor};

#[derive(Debug, Clone, PartialEq)]
pub struct Flattened<'t> {
    /// A nested navigator never precedes its own nested navigators.
    pub navigators: Vec<&'t Navigator>,
    /// Deduplicated by (name, parent name), first occurrence wins.
    pub screens: Vec<&'t Screen>,
    /// Traversal order, duplicates kept.
    pub expressions: Vec<&'t Expression>,
}

pub fn flatten(tree: &Tree) -> Flattened<'_> {
    let mut collector = Collector::default();
    walk_navigators(&mut collector, &tree.navigators);

    let mut seen = HashSet::new();
    let screens = collector
        .screens
        .into_iter()
        .filter(|screen| seen.insert((screen.name.as_str(), screen.parent.name.as_str())))
        .collect();

    Flattened {
        navigators: flatten_navigators(tree.navigators.iter().collect()),
        screens,
        expressions: collector.expressions,
    }
}

/// Each navigator lands after its nested navigators, which in turn are placed
/// ahead of everything collected from earlier siblings.
fn flatten_navigators(navigators: Vec<&Navigator>) -> Vec<&Navigator> {
    navigators.into_iter().fold(Vec::new(), |acc, navigator| {
        let nested = navigator
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Navigator(nested) => Some(nested),
                _ => None,
            })
            .collect();

        let mut next = flatten_navigators(nested);
        next.extend(acc);
        next.push(navigator);
        next
    })
}

#[derive(Default)]
struct Collector<'t> {
    screens: Vec<&'t Screen>,
    expressions: Vec<&'t Expression>,
}

impl<'t> TreeVisitor<'t> for Collector<'t> {
    fn visit_screen(&mut self, screen: &'t Screen) {
        self.screens.push(screen);
        walk_screen(self, screen);
    }

    fn visit_expression(&mut self, expression: &'t Expression) {
        self.expressions.push(expression);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{canonical, external, group, navigator, root, screen, with};
    use serde_json::json;

    fn names<'a>(navigators: &[&'a Navigator]) -> Vec<&'a str> {
        navigators.iter().map(|n| n.name.as_str()).collect()
    }

    fn screen_keys<'a>(screens: &[&'a Screen]) -> Vec<(&'a str, &'a str)> {
        screens
            .iter()
            .map(|s| (s.name.as_str(), s.parent.name.as_str()))
            .collect()
    }

    #[test]
    fn test_nested_navigators_come_first() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    navigator("Home", vec![navigator("Feed", vec![screen("List")])]),
                    navigator("Settings", vec![screen("Profile")]),
                ],
            )],
        );

        let flattened = flatten(&tree);
        let order = names(&flattened.navigators);
        assert_eq!(order, vec!["Feed", "Home", "Settings", "App"]);

        let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
        assert!(position("Feed") < position("Home"));
        assert!(position("Home") < position("App"));
    }

    #[test]
    fn test_sibling_top_level_navigators() {
        let tree = canonical(
            vec![],
            vec![
                navigator("Main", vec![navigator("Inner", vec![screen("A")])]),
                navigator("Modal", vec![screen("B")]),
            ],
        );
        assert_eq!(
            names(&flatten(&tree).navigators),
            vec!["Inner", "Main", "Modal"]
        );
    }

    #[test]
    fn test_flatten_is_order_stable() {
        let tree = canonical(
            vec![group("Shared", vec![screen("Detail")])],
            vec![root(
                "App",
                vec![
                    screen("Feed"),
                    group("Shared", vec![screen("Detail")]),
                    navigator("Settings", vec![screen("Profile"), external("Billing", "./billing")]),
                ],
            )],
        );
        assert_eq!(flatten(&tree), flatten(&tree));
    }

    #[test]
    fn test_screens_are_deduplicated_by_name_and_parent_name() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    navigator("Auth", vec![screen("Login")]),
                    navigator("Onboarding", vec![screen("Login")]),
                    navigator("Deep", vec![navigator("Auth", vec![screen("Login")])]),
                ],
            )],
        );

        let flattened = flatten(&tree);
        assert_eq!(
            screen_keys(&flattened.screens),
            vec![("Login", "Auth"), ("Login", "Onboarding")]
        );
    }

    #[test]
    fn test_screens_are_collected_depth_first() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    screen("Feed"),
                    group("Tabs", vec![screen("Inbox"), screen("Outbox")]),
                    navigator("Settings", vec![screen("Profile")]),
                    screen("About"),
                ],
            )],
        );
        assert_eq!(
            screen_keys(&flatten(&tree).screens),
            vec![
                ("Feed", "App"),
                ("Inbox", "Tabs"),
                ("Outbox", "Tabs"),
                ("Profile", "Settings"),
                ("About", "App"),
            ]
        );
    }

    #[test]
    fn test_expressions_keep_duplicates() {
        let header = json!({ "_tag": "Expression", "value": "Header", "use": ["Header", "./Header"] });
        let tree = canonical(
            vec![],
            vec![navigator(
                "App",
                vec![
                    with(screen("A"), "props", json!({ "options": { "header": header.clone() } })),
                    with(screen("B"), "props", json!({ "options": { "header": header } })),
                ],
            )],
        );

        let values: Vec<&str> = flatten(&tree)
            .expressions
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        assert_eq!(values, vec!["Header", "Header"]);
    }
}
