//! Compilation pipeline
//!
//! Config Reader -> Normalizer -> Flattener -> {Component, Route, Graph}
//! emitters -> Writer, once per discovered navigation source. Sources compile
//! in parallel under a bound; a failing source never aborts its siblings.

use log::{debug, error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::codegen::Artifact;
use crate::discovery::{find_navigation_files, DEFAULT_FILE_NAMES};
use crate::error::{NavError, Result};
use crate::flatten::{flatten, Flattened};
use crate::graph;
use crate::model::Tree;
use crate::normalize::normalize;
use crate::process::{CommandRunner, ConfigReader, GraphRenderer};
use crate::scaffold::{file_templates, FileTemplate, Prompt, Scaffolder, TerminalPrompt};
use crate::writer::{FileSystem, Formatter, Rendered, WriteOutcome, Writer};
use crate::{component, routes};

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS & CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub root: PathBuf,
    /// Maximum number of sources compiled at once.
    pub jobs: usize,
    /// Run `dot` on the emitted graph.
    pub render_graph: bool,
    /// Offer to create missing per-screen files.
    pub scaffold: bool,
    pub file_names: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            jobs: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            render_graph: true,
            scaffold: true,
            file_names: DEFAULT_FILE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything one invocation shares, built once and passed down explicitly.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub runner: CommandRunner,
    pub formatter: Formatter,
    pub fs: FileSystem,
    pub options: GenerateOptions,
}

impl Context {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn reader(&self) -> ConfigReader {
        ConfigReader::new(self.runner)
    }

    pub fn renderer(&self) -> GraphRenderer {
        GraphRenderer::new(self.runner)
    }

    pub fn writer(&self) -> Writer {
        Writer::new(self.formatter, self.fs)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINGLE SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub written: Vec<(PathBuf, WriteOutcome)>,
    pub templates: Vec<FileTemplate>,
}

/// Directory generated files land in.
pub fn output_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// The three emitters only read the flattened tree, so they run side by side.
pub fn emit(tree: &Tree, flattened: &Flattened<'_>) -> Vec<Artifact> {
    let ((navigation, routes), graph) = rayon::join(
        || {
            rayon::join(
                || component::build(flattened),
                || routes::build(flattened),
            )
        },
        || graph::build(&tree.navigators),
    );
    vec![navigation, routes, graph]
}

/// Normalizes and renders one decoded source entirely in memory.
pub fn compile_tree(
    writer: &Writer,
    source: &Path,
    raw: serde_json::Value,
) -> Result<(Vec<Rendered>, Vec<FileTemplate>)> {
    let tree = normalize(raw).map_err(|e| NavError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;
    let flattened = flatten(&tree);
    debug!(
        "{}: {} navigators, {} screens, {} expressions",
        source.display(),
        flattened.navigators.len(),
        flattened.screens.len(),
        flattened.expressions.len()
    );

    let dir = output_dir(source);
    let rendered = writer.render_all(&dir, &emit(&tree, &flattened))?;
    let templates = file_templates(flattened.screens.iter().copied(), &dir);
    Ok((rendered, templates))
}

fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

pub async fn compile_file(ctx: Arc<Context>, source: PathBuf) -> Result<FileReport> {
    let raw = ctx.reader().read(&source).await?;

    let writer = ctx.writer();
    let task_source = source.clone();
    let (written, templates) = tokio::task::spawn_blocking(move || -> Result<_> {
        let (rendered, templates) = compile_tree(&writer, &task_source, raw)?;
        let written = writer.persist(&rendered)?;
        Ok((written, templates))
    })
    .await
    .map_err(|e| NavError::io(&source, io::Error::new(io::ErrorKind::Other, e)))??;

    info!("NavigationBuilder: done");
    info!("RoutesBuilder: done");

    if ctx.options.render_graph {
        let dir = output_dir(&source);
        let output = dir.join(graph::IMAGE_FILE_NAME);
        ctx.renderer()
            .render(&dir.join(graph::FILE_NAME), &output)
            .await?;
        info!("GraphBuilder: done, file exported to {}", display_relative(&output));
    }

    Ok(FileReport {
        source,
        written,
        templates,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUN
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct RunSummary {
    pub compiled: Vec<FileReport>,
    pub failed: Vec<(PathBuf, NavError)>,
    /// Compilation tasks that panicked.
    pub aborted: usize,
    pub scaffolded: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.aborted == 0
    }
}

/// Compiles every discovered source, at most `jobs` at a time.
pub async fn compile_all(ctx: Arc<Context>, sources: Vec<PathBuf>) -> RunSummary {
    let semaphore = Arc::new(Semaphore::new(ctx.options.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for source in sources {
        let ctx = ctx.clone();
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result = compile_file(ctx, source.clone()).await;
            (source, result)
        });
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(report))) => summary.compiled.push(report),
            Ok((source, Err(e))) => {
                error!("{}: {}", source.display(), e);
                summary.failed.push((source, e));
            }
            Err(e) => {
                error!("Compilation task failed: {}", e);
                summary.aborted += 1;
            }
        }
    }

    summary.compiled.sort_by(|a, b| a.source.cmp(&b.source));
    summary.failed.sort_by(|a, b| a.0.cmp(&b.0));
    summary
}

/// Prompts once per compiled source, one after another.
pub fn scaffold_reports<P: Prompt + ?Sized>(
    ctx: &Context,
    prompt: &P,
    reports: &[FileReport],
) -> (Vec<PathBuf>, Vec<(PathBuf, NavError)>) {
    let scaffolder = Scaffolder {
        prompt,
        formatter: ctx.formatter,
        fs: ctx.fs,
    };

    let mut created = Vec::new();
    let mut failed = Vec::new();
    for report in reports {
        match scaffolder.run(report.templates.clone()) {
            Ok(paths) => created.extend(paths),
            Err(e) => {
                error!("{}: scaffolding failed: {}", report.source.display(), e);
                failed.push((report.source.clone(), e));
            }
        }
    }
    (created, failed)
}

pub async fn run(ctx: Arc<Context>) -> RunSummary {
    let sources = find_navigation_files(&ctx.options.root, &ctx.options.file_names);
    if sources.is_empty() {
        warn!(
            "No navigation sources found under {}",
            ctx.options.root.display()
        );
    }

    let mut summary = compile_all(ctx.clone(), sources).await;

    if ctx.options.scaffold && !summary.compiled.is_empty() {
        let reports = std::mem::take(&mut summary.compiled);
        let task_ctx = ctx.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let outcome = scaffold_reports(&task_ctx, &TerminalPrompt, &reports);
            (reports, outcome)
        })
        .await;

        match joined {
            Ok((reports, (created, failed))) => {
                summary.compiled = reports;
                summary.scaffolded = created;
                summary.failed.extend(failed);
            }
            Err(e) => {
                error!("Scaffolding task failed: {}", e);
                summary.aborted += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{root, screen, tree, with};
    use serde_json::json;

    #[test]
    fn test_output_dir_of_bare_file_name() {
        assert_eq!(output_dir(Path::new("navigation.json")), PathBuf::from("."));
        assert_eq!(
            output_dir(Path::new("app/navigation.json")),
            PathBuf::from("app")
        );
    }

    #[test]
    fn test_emit_produces_three_artifacts() {
        let tree = crate::test_support::canonical(vec![], vec![root("App", vec![screen("Feed")])]);
        let artifacts = emit(&tree, &flatten(&tree));
        let names: Vec<&str> = artifacts.iter().map(|a| a.file_name).collect();
        assert_eq!(
            names,
            vec![component::FILE_NAME, routes::FILE_NAME, graph::FILE_NAME]
        );
    }

    #[test]
    fn test_compile_tree_renders_everything_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("navigation.json");
        let raw = tree(
            vec![],
            vec![root(
                "App",
                vec![with(screen("Feed"), "params", json!({ "id": "string" }))],
            )],
        );

        let (rendered, templates) = compile_tree(&Writer::default(), &source, raw).unwrap();
        assert_eq!(rendered.len(), 3);
        assert!(templates.is_empty());
        assert!(rendered.iter().all(|file| !file.path.exists()));
        assert!(rendered[1].content.contains("toFeed"));
    }

    #[test]
    fn test_decode_failure_names_the_source() {
        let source = PathBuf::from("app/navigation.json");
        let error = compile_tree(&Writer::default(), &source, json!({ "navigators": [] }))
            .unwrap_err();
        match error {
            NavError::Decode { path, .. } => assert_eq!(path, source),
            other => panic!("unexpected error: {other}"),
        }
    }
}
