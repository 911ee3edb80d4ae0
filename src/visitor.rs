use crate::model::{Expression, Group, Navigator, Node, Params, Record, Screen, Value};

/// The TreeVisitor trait defines the single authoritative traversal of the canonical tree.
///
/// Rules:
/// 1. Traversal order is declaration order: a node's props, then its params, then its children.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
///
/// The `'t` lifetime lets visitors keep borrows into the tree they walk.
pub trait TreeVisitor<'t> {
    fn visit_navigator(&mut self, navigator: &'t Navigator) {
        walk_navigator(self, navigator);
    }

    fn visit_group(&mut self, group: &'t Group) {
        walk_group(self, group);
    }

    fn visit_screen(&mut self, screen: &'t Screen) {
        walk_screen(self, screen);
    }

    fn visit_node(&mut self, node: &'t Node) {
        walk_node(self, node);
    }

    fn visit_record(&mut self, record: &'t Record) {
        walk_record(self, record);
    }

    fn visit_value(&mut self, value: &'t Value) {
        walk_value(self, value);
    }

    fn visit_expression(&mut self, _expression: &'t Expression) {
        // Leaf node, nothing to walk by default
    }
}

pub fn walk_navigators<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, navigators: &'t [Navigator]) {
    for navigator in navigators {
        visitor.visit_navigator(navigator);
    }
}

pub fn walk_navigator<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, navigator: &'t Navigator) {
    if let Some(props) = &navigator.props {
        visitor.visit_record(props);
    }
    for child in &navigator.children {
        visitor.visit_node(child);
    }
}

pub fn walk_group<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, group: &'t Group) {
    if let Some(props) = &group.props {
        visitor.visit_record(props);
    }
    for screen in &group.children {
        visitor.visit_screen(screen);
    }
}

pub fn walk_screen<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, screen: &'t Screen) {
    if let Some(props) = &screen.props {
        visitor.visit_record(props);
    }
    match &screen.params {
        Some(Params::Record(record)) => visitor.visit_record(record),
        Some(Params::Expression(expression)) => visitor.visit_expression(expression),
        None => {}
    }
}

pub fn walk_node<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, node: &'t Node) {
    match node {
        Node::Navigator(navigator) => visitor.visit_navigator(navigator),
        Node::Group(group) => visitor.visit_group(group),
        Node::Screen(screen) => visitor.visit_screen(screen),
    }
}

pub fn walk_record<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, record: &'t Record) {
    for value in record.values() {
        visitor.visit_value(value);
    }
}

pub fn walk_value<'t, V: TreeVisitor<'t> + ?Sized>(visitor: &mut V, value: &'t Value) {
    match value {
        Value::Record(record) => visitor.visit_record(record),
        Value::List(items) => {
            for item in items {
                visitor.visit_value(item);
            }
        }
        Value::Expression(expression) => visitor.visit_expression(expression),
        Value::String(_) | Value::Number(_) | Value::Boolean(_) | Value::Null | Value::Code(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{canonical, navigator, screen, with};
    use serde_json::json;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl<'t> TreeVisitor<'t> for Trace {
        fn visit_navigator(&mut self, navigator: &'t Navigator) {
            self.0.push(format!("navigator:{}", navigator.name));
            walk_navigator(self, navigator);
        }

        fn visit_screen(&mut self, screen: &'t Screen) {
            self.0.push(format!("screen:{}", screen.name));
            walk_screen(self, screen);
        }

        fn visit_expression(&mut self, expression: &'t Expression) {
            self.0.push(format!("expression:{}", expression.value));
        }
    }

    fn expression(value: &str) -> serde_json::Value {
        json!({ "_tag": "Expression", "value": value })
    }

    #[test]
    fn test_props_before_params_before_children() {
        let feed = with(
            with(screen("Feed"), "params", json!({ "id": expression("Id") })),
            "props",
            json!({ "options": expression("ScreenOptions") }),
        );
        let app = with(
            navigator("App", vec![feed]),
            "props",
            json!({ "screenOptions": expression("NavigatorOptions") }),
        );
        let tree = canonical(vec![], vec![app]);

        let mut trace = Trace::default();
        walk_navigators(&mut trace, &tree.navigators);
        assert_eq!(
            trace.0,
            vec![
                "navigator:App",
                "expression:NavigatorOptions",
                "screen:Feed",
                "expression:ScreenOptions",
                "expression:Id",
            ]
        );
    }
}
