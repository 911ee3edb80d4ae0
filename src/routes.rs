//! Route Emitter
//!
//! Emits `routes.gen.ts`: route-name constants for nested navigators and
//! screens, and one `to<Screen>` builder per screen producing the nested
//! `{ screen, params }` object a navigate call expects.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::collections::HashSet;

use crate::codegen::{module_literal, Artifact, Declaration, Imports, SourceSyntax, Substitution};
use crate::flatten::Flattened;
use crate::model::{Node, Screen};
use crate::shape::ShapeCompiler;

pub const FILE_NAME: &str = "routes.gen.ts";

lazy_static! {
    static ref NESTED_PARAMS_RE: Regex = Regex::new(r"\n\n(\s+params: \{)").unwrap();
}

pub fn build(flattened: &Flattened<'_>) -> Artifact {
    let mut shapes = ShapeCompiler::new();

    let navigator_routes = flattened.navigators.iter().copied().flat_map(|navigator| {
        navigator.children.iter().filter_map(move |child| match child {
            Node::Navigator(nested) => Some(route_constant(&navigator.child_screen(nested))),
            _ => None,
        })
    });
    let mut body: Vec<Declaration> = navigator_routes.collect();
    body.extend(flattened.screens.iter().map(|screen| route_constant(screen)));
    body.extend(
        flattened
            .screens
            .iter()
            .map(|screen| route_builder(screen, &mut shapes)),
    );

    for name in colliding_constants(&body) {
        warn!("{FILE_NAME}: `{name}` is declared more than once");
    }

    let mut imports = Imports::new();
    imports.extend(shapes.imports());

    let mut declarations = imports.into_declarations();
    declarations.extend(body);

    Artifact::source(FILE_NAME, SourceSyntax::Ts, declarations).with_substitution(Substitution {
        pattern: &NESTED_PARAMS_RE,
        replacement: "\n$1",
    })
}

/// Constant names declared more than once, each reported once.
fn colliding_constants(declarations: &[Declaration]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut collisions = Vec::new();
    for declaration in declarations {
        if let Declaration::Const { name, .. } = declaration {
            if !seen.insert(name.as_str()) && !collisions.contains(&name.as_str()) {
                collisions.push(name.as_str());
            }
        }
    }
    collisions
}

fn route_constant(screen: &Screen) -> Declaration {
    Declaration::exported(screen.route_symbol(), module_literal(&screen.route_literal()))
}

/// What a route object carries under `params`.
enum Nested {
    Nothing,
    /// The builder's own `params` argument.
    Argument,
    Route(String),
}

fn route_object(screen: &str, nested: Nested) -> String {
    let screen = module_literal(screen);
    match nested {
        Nested::Nothing => format!("{{ screen: {screen} }}"),
        Nested::Argument => format!("{{ screen: {screen}, params }}"),
        Nested::Route(inner) => format!("{{ screen: {screen}, params: {inner} }}"),
    }
}

fn route_builder(screen: &Screen, shapes: &mut ShapeCompiler) -> Declaration {
    let mut segments = screen.route_segments();
    if segments.is_empty() {
        segments.push(screen.route_literal());
    }

    let object = segments
        .iter()
        .rev()
        .fold(None::<String>, |inner, segment| {
            let nested = match inner {
                Some(inner) => Nested::Route(inner),
                None if screen.params.is_some() => Nested::Argument,
                None => Nested::Nothing,
            };
            Some(route_object(segment, nested))
        })
        .unwrap_or_default();

    let value = match &screen.params {
        Some(params) => format!(
            "(params: {}) => {{\n  return {} as const;\n}}",
            shapes.annotation(params),
            object
        ),
        None => format!("{object} as const"),
    };

    Declaration::exported(screen.builder_symbol(), value)
}
