//! Scaffolding
//!
//! Offers to create the per-screen files described by `config.template` for
//! screens that do not have them yet.

use dialoguer::theme::ColorfulTheme;
use dialoguer::MultiSelect;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{NavError, Result};
use crate::model::Screen;
use crate::writer::{FileSystem, Formatter};

lazy_static! {
    static ref COMPONENT_NAME_RE: Regex = Regex::new(r"\{\{\s*component\.name\s*\}\}").unwrap();
}

/// A file a screen may want, not yet checked against the disk.
#[derive(Debug, Clone, PartialEq)]
pub struct FileTemplate {
    /// Path relative to the navigation source, shown in the prompt.
    pub title: String,
    pub path: PathBuf,
    pub content: String,
}

fn interpolate(pattern: &str, component_name: &str) -> String {
    COMPONENT_NAME_RE
        .replace_all(pattern, regex::NoExpand(component_name))
        .into_owned()
}

/// Renders every template of `screen` into a file below `base_dir`.
pub fn screen_templates(screen: &Screen, base_dir: &Path) -> Vec<FileTemplate> {
    let Some(templates) = &screen.config.template else {
        return Vec::new();
    };

    let component_name = screen.import_specifier();
    let import_path = screen.import_path();

    templates
        .iter()
        .map(|(name, content)| {
            let title = format!("{}/{}", import_path, interpolate(name, &component_name));
            FileTemplate {
                path: base_dir.join(&title),
                title,
                content: interpolate(content, &component_name),
            }
        })
        .collect()
}

pub fn file_templates<'t>(
    screens: impl IntoIterator<Item = &'t Screen>,
    base_dir: &Path,
) -> Vec<FileTemplate> {
    screens
        .into_iter()
        .flat_map(|screen| screen_templates(screen, base_dir))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROMPT
// ═══════════════════════════════════════════════════════════════════════════════

pub trait Prompt {
    /// Indices of the chosen items. An abort is [`NavError::PromptCancelled`].
    fn multi_select(&self, message: &str, items: &[String]) -> Result<Vec<usize>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn multi_select(&self, message: &str, items: &[String]) -> Result<Vec<usize>> {
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(items)
            .max_length(20)
            .interact_opt()
            .map_err(|e| NavError::ExternalTool {
                tool: "prompt".to_string(),
                message: e.to_string(),
            })?
            .ok_or(NavError::PromptCancelled)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCAFFOLD
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Scaffolder<'a, P: Prompt + ?Sized> {
    pub prompt: &'a P,
    pub formatter: Formatter,
    pub fs: FileSystem,
}

impl<P: Prompt + ?Sized> Scaffolder<'_, P> {
    /// Existing paths are never offered, and a cancelled prompt creates nothing.
    pub fn run(&self, templates: Vec<FileTemplate>) -> Result<Vec<PathBuf>> {
        let candidates: Vec<FileTemplate> = templates
            .into_iter()
            .filter(|template| !self.fs.exists(&template.path))
            .collect();

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let titles: Vec<String> = candidates.iter().map(|t| t.title.clone()).collect();
        let selection = match self.prompt.multi_select("Select files to create", &titles) {
            Ok(selection) => selection,
            Err(e) if e.is_recoverable() => {
                info!("Scaffolding cancelled, no files created");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut created = Vec::new();
        for index in selection {
            let Some(template) = candidates.get(index) else {
                continue;
            };
            let content = self
                .formatter
                .format_best_effort(&template.content, &template.path);
            self.fs.write(&template.path, &content)?;
            created.push(template.path.clone());
        }
        Ok(created)
    }
}
