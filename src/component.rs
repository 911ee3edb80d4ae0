//! Component Emitter
//!
//! Emits `navigation.gen.tsx`: one stack constructor and one component per
//! generated navigator, with screens, groups and nested navigators rendered as
//! JSX children of their navigator's stack.

use crate::codegen::{module_literal, Artifact, Declaration, Imports, SourceSyntax};
use crate::flatten::Flattened;
use crate::model::{Group, Navigator, Node, Record, Screen, Value};
use crate::shape::{Attribute, ShapeCompiler};

pub const FILE_NAME: &str = "navigation.gen.tsx";

pub fn build(flattened: &Flattened<'_>) -> Artifact {
    let mut declarations = vec![
        Declaration::namespace("React", "react"),
        Declaration::namespace("route", "./routes.gen"),
    ];
    declarations.extend(imports(flattened).into_declarations());

    let generated: Vec<&Navigator> = flattened
        .navigators
        .iter()
        .copied()
        .filter(|navigator| !navigator.is_external())
        .collect();

    // Stacks must exist before any component that renders them.
    declarations.extend(generated.iter().rev().map(|navigator| stack_declaration(navigator)));
    declarations.extend(generated.iter().map(|navigator| component_declaration(navigator)));

    Artifact::source(FILE_NAME, SourceSyntax::Tsx, declarations)
}

fn imports(flattened: &Flattened<'_>) -> Imports {
    let mut imports = Imports::new();

    for navigator in &flattened.navigators {
        imports.add(&navigator.kind.factory());
    }
    for navigator in &flattened.navigators {
        if let Some(import) = navigator.external_import() {
            imports.add(&import);
        }
    }
    for screen in &flattened.screens {
        if let Some(import) = screen.eager_import() {
            imports.add(&import);
        }
    }
    imports.extend(
        flattened
            .expressions
            .iter()
            .filter_map(|expression| expression.import.as_ref()),
    );

    imports
}

fn stack_declaration(navigator: &Navigator) -> Declaration {
    Declaration::constant(
        navigator.stack_symbol(),
        format!("{}()", navigator.kind.factory().symbol),
    )
}

fn component_declaration(navigator: &Navigator) -> Declaration {
    let body = format!("() => {{\n  return (\n{}\n  );\n}}", navigator_element(navigator));
    Declaration::Const {
        export: navigator.export,
        name: navigator.component_symbol(),
        value: body,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

fn open_tag(name: &str, attributes: &[Attribute]) -> String {
    let mut tag = format!("<{name}");
    for attribute in attributes {
        tag.push(' ');
        tag.push_str(&attribute.to_string());
    }
    tag
}

fn container(name: String, props: Option<&Record>, children: Vec<String>) -> String {
    let attributes = props
        .map(|props| ShapeCompiler::new().attributes(props))
        .unwrap_or_default();

    format!(
        "{}>\n{}\n</{}>",
        open_tag(&name, &attributes),
        children.join("\n"),
        name
    )
}

fn navigator_element(navigator: &Navigator) -> String {
    let children = navigator
        .children
        .iter()
        .map(|child| match child {
            Node::Screen(screen) => screen_element(screen),
            Node::Group(group) => group_element(group),
            Node::Navigator(nested) => screen_element(&navigator.child_screen(nested)),
        })
        .collect();

    container(
        format!("{}.Navigator", navigator.stack_symbol()),
        navigator.props.as_ref(),
        children,
    )
}

fn group_element(group: &Group) -> String {
    container(
        format!("{}.Group", group.stack_symbol()),
        group.props.as_ref(),
        group.children.iter().map(screen_element).collect(),
    )
}

fn screen_element(screen: &Screen) -> String {
    let mut props = screen.props.clone().unwrap_or_default();
    props.insert("name", Value::Code(format!("route.{}", screen.route_symbol())));

    // Null renders nothing, which clears a user prop of the same key.
    if screen.is_lazy() {
        let loader = format!(
            "() => require({}).{}",
            module_literal(&screen.import_path()),
            screen.import_specifier()
        );
        props.insert("getComponent", Value::Code(loader));
        props.insert("component", Value::Null);
    } else {
        props.insert("getComponent", Value::Null);
        props.insert("component", Value::Code(screen.import_specifier()));
    }

    let attributes = ShapeCompiler::new().attributes(&props);
    format!(
        "{} />",
        open_tag(&format!("{}.Screen", screen.stack_symbol()), &attributes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use crate::test_support::{canonical, navigator, root, screen, with};
    use serde_json::json;

    fn emit(tree: &crate::model::Tree) -> String {
        build(&flatten(tree)).raw_text()
    }

    #[test]
    fn test_lazy_and_eager_screens() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    screen("Feed"),
                    with(screen("Login"), "lazy", json!(false)),
                ],
            )],
        );
        let source = emit(&tree);

        assert!(source.contains(
            "<AppStack.Screen name={route.routeFeed} getComponent={() => require('src/screens/Feed').Feed} />"
        ));
        assert!(source.contains("<AppStack.Screen name={route.routeLogin} component={Login} />"));
        assert!(source.contains("import { Login } from 'src/screens/Login';"));
        assert!(!source.contains("import { Feed }"));
    }

    #[test]
    fn test_user_props_keep_their_position() {
        let tree = canonical(
            vec![],
            vec![navigator(
                "App",
                vec![with(
                    screen("Feed"),
                    "props",
                    json!({ "component": "ignored", "options": { "title": "Feed" } }),
                )],
            )],
        );
        let source = emit(&tree);
        assert!(source.contains(
            "<AppStack.Screen options={{ title: \"Feed\" }} name={route.routeAppFeed} getComponent={() => require('src/screens/App/Feed').AppFeed} />"
        ));
    }

    #[test]
    fn test_declaration_order() {
        let tree = canonical(
            vec![],
            vec![with(
                root(
                    "App",
                    vec![navigator("Home", vec![screen("Feed")]), screen("About")],
                ),
                "export",
                json!(true),
            )],
        );
        let source = emit(&tree);

        let position = |needle: &str| source.find(needle).unwrap();
        assert!(position("const AppStack = ") < position("const HomeStack = "));
        assert!(position("const HomeStack = ") < position("const HomeNavigator = "));
        assert!(position("const HomeNavigator = ") < position("export const AppNavigator = "));
        assert!(source.contains("<AppStack.Screen name={route.routeHomeNavigator} component={HomeNavigator} />"));
        assert!(source.contains("<HomeStack.Screen name={route.routeHomeFeed}"));
    }

    #[test]
    fn test_external_navigator_is_only_imported() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    screen("Feed"),
                    crate::test_support::external("Billing", "./external"),
                ],
            )],
        );
        let source = emit(&tree);

        assert!(source.contains("import { BillingNavigator } from './external';"));
        assert!(!source.contains("BillingStack"));
        assert!(!source.contains("const BillingNavigator"));
        assert!(source.contains("<AppStack.Screen name={route.routeBillingNavigator} component={BillingNavigator} />"));
    }

    #[test]
    fn test_imports_are_merged_per_module() {
        let header = json!({ "_tag": "Expression", "value": "Header", "use": ["Header", "./ui"] });
        let footer = json!({ "_tag": "Expression", "value": "Footer", "use": ["Footer", "./ui"] });
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![
                    with(screen("A"), "props", json!({ "header": header.clone() })),
                    with(screen("B"), "props", json!({ "header": header, "footer": footer })),
                    navigator("Nested", vec![screen("C")]),
                ],
            )],
        );
        let source = emit(&tree);

        assert_eq!(
            source
                .matches("import { createNativeStackNavigator } from '@react-navigation/native-stack';")
                .count(),
            1
        );
        assert!(source.contains("import { Header, Footer } from './ui';"));
        assert!(source.starts_with("import * as React from 'react';\nimport * as route from './routes.gen';"));
    }

    #[test]
    fn test_group_renders_under_enclosing_stack() {
        let tree = canonical(
            vec![],
            vec![root(
                "App",
                vec![with(
                    crate::test_support::group("Modals", vec![screen("Share")]),
                    "props",
                    json!({ "screenOptions": { "presentation": "modal" } }),
                )],
            )],
        );
        let source = emit(&tree);
        assert!(source.contains("<AppStack.Group screenOptions={{ presentation: \"modal\" }}>"));
        assert!(source.contains("</AppStack.Group>"));
    }
}
