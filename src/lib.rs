//! # Navigation Codegen
//!
//! Compiles a declarative navigation tree (navigators, groups and screens,
//! written as jsonnet or JSON) into three generated files next to the source:
//!
//! - `navigation.gen.tsx`: one stack per navigator and one component per stack
//! - `routes.gen.ts`: route-name constants and typed route builders
//! - `navigation.gen.dot`: a Graphviz picture of the tree
//!
//! ## Pipeline
//!
//! 1. **Read**: `.json` is read directly, anything else goes through `jsonnet`
//! 2. **Normalize**: the untyped value is decoded, groups are resolved and
//!    every node is linked to its parent
//! 3. **Flatten**: navigators, unique screens and expressions are collected
//! 4. **Emit**: the component, route and graph emitters run in parallel
//! 5. **Write**: each artifact is formatted and validated, then persisted
//!
//! Names are never stored on nodes. They are derived from the parent-link
//! chain on demand (see [`names`]).

pub mod codegen;
pub mod component;
pub mod discovery;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod model;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod process;
pub mod routes;
pub mod scaffold;
pub mod schema;
pub mod shape;
pub mod visitor;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use error::{DecodeError, NavError, Result};
pub use model::Tree;
pub use normalize::normalize;
pub use pipeline::{run, Context, GenerateOptions, RunSummary};
