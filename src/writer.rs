//! Writer
//!
//! Formats rendered artifacts and persists them next to their navigation
//! source. Every artifact of a source file is rendered and checked in memory
//! before the first one is written, so a bad artifact leaves no partial output.

use log::debug;
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::SourceType;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::codegen::{Artifact, Payload, SourceSyntax};
use crate::error::{NavError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATTER
// ═══════════════════════════════════════════════════════════════════════════════

/// Re-prints source through the oxc parser and code generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter;

impl Formatter {
    fn source_type(syntax: SourceSyntax) -> SourceType {
        SourceType::default()
            .with_typescript(true)
            .with_module(true)
            .with_jsx(syntax == SourceSyntax::Tsx)
    }

    /// Parser diagnostics are returned verbatim on failure.
    pub fn format(&self, source: &str, syntax: SourceSyntax) -> std::result::Result<String, String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, Self::source_type(syntax)).parse();

        if !ret.errors.is_empty() {
            return Err(ret
                .errors
                .iter()
                .map(|e| format!("{:?}", e))
                .collect::<Vec<_>>()
                .join("\n"));
        }

        Ok(Codegen::new().build(&ret.program).code)
    }

    /// Formats by file extension, falling back to the source unchanged.
    pub fn format_best_effort(&self, source: &str, path: &Path) -> String {
        let syntax = match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") | Some("jsx") => SourceSyntax::Tsx,
            Some("ts") | Some("js") | Some("mts") | Some("cts") => SourceSyntax::Ts,
            _ => return source.to_string(),
        };

        match self.format(source, syntax) {
            Ok(formatted) => formatted,
            Err(diagnostics) => {
                debug!("{}: left unformatted: {}", path.display(), diagnostics);
                source.to_string()
            }
        }
    }

    /// Final text of an artifact. The substitution runs on the formatted output.
    pub fn render(&self, artifact: &Artifact, target: &Path) -> Result<String> {
        match &artifact.payload {
            Payload::Text(text) => Ok(text.clone()),
            Payload::Source {
                syntax,
                substitution,
                ..
            } => {
                let formatted = self
                    .format(&artifact.raw_text(), *syntax)
                    .map_err(|message| NavError::Syntax {
                        path: target.to_path_buf(),
                        message,
                    })?;

                Ok(match substitution {
                    Some(substitution) => substitution.apply(&formatted),
                    None => formatted,
                })
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE SYSTEM
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl FileSystem {
    pub fn compute_hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        format!("{:x}", hasher.finalize())
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    pub fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| NavError::io(path, e))
    }

    /// Writes `content` to a sibling temporary file. `None` when the target
    /// already holds `content`.
    pub fn stage(&self, path: &Path, content: &str) -> Result<Option<Staged>> {
        if let Ok(existing) = fs::read(path) {
            if Self::compute_hash(&existing) == Self::compute_hash(content.as_bytes()) {
                debug!("{}: unchanged, skipped", path.display());
                return Ok(None);
            }
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| NavError::io(parent, e))?;
        }

        let temporary = temporary_path(path);
        let result = fs::File::create(&temporary).and_then(|mut file| {
            file.write_all(content.as_bytes())?;
            file.sync_all()
        });

        if let Err(e) = result {
            fs::remove_file(&temporary).ok();
            return Err(NavError::io(path, e));
        }

        Ok(Some(Staged {
            temporary,
            target: path.to_path_buf(),
        }))
    }

    /// Renames a staged file over its target.
    pub fn commit(&self, staged: &Staged) -> Result<()> {
        fs::rename(&staged.temporary, &staged.target).map_err(|e| {
            staged.discard();
            NavError::io(&staged.target, e)
        })
    }

    pub fn write(&self, path: &Path, content: &str) -> Result<WriteOutcome> {
        match self.stage(path, content)? {
            Some(staged) => {
                self.commit(&staged)?;
                Ok(WriteOutcome::Written)
            }
            None => Ok(WriteOutcome::Unchanged),
        }
    }
}

/// Temporary file waiting to replace its target.
#[derive(Debug)]
pub struct Staged {
    temporary: PathBuf,
    target: PathBuf,
}

impl Staged {
    fn discard(&self) {
        fs::remove_file(&self.temporary).ok();
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// ═══════════════════════════════════════════════════════════════════════════════
// WRITER
// ═══════════════════════════════════════════════════════════════════════════════

/// Artifact ready to persist.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Writer {
    pub formatter: Formatter,
    pub fs: FileSystem,
}

impl Writer {
    pub fn new(formatter: Formatter, fs: FileSystem) -> Self {
        Self { formatter, fs }
    }

    /// Renders all artifacts into `dir`, failing on the first invalid one.
    pub fn render_all(&self, dir: &Path, artifacts: &[Artifact]) -> Result<Vec<Rendered>> {
        artifacts
            .iter()
            .map(|artifact| {
                let path = dir.join(artifact.file_name);
                let content = self.formatter.render(artifact, &path)?;
                Ok(Rendered { path, content })
            })
            .collect()
    }

    /// Stages every file before renaming any, so a failed write leaves all
    /// targets as they were. Only a failing rename can still leave a partial set.
    pub fn persist(&self, rendered: &[Rendered]) -> Result<Vec<(PathBuf, WriteOutcome)>> {
        let mut staged = Vec::with_capacity(rendered.len());
        for file in rendered {
            match self.fs.stage(&file.path, &file.content) {
                Ok(entry) => staged.push((file, entry)),
                Err(e) => {
                    staged.iter().flat_map(|(_, entry)| entry).for_each(Staged::discard);
                    return Err(e);
                }
            }
        }

        let mut outcomes = Vec::with_capacity(staged.len());
        for (index, (file, entry)) in staged.iter().enumerate() {
            let outcome = match entry {
                Some(entry) => {
                    if let Err(e) = self.fs.commit(entry) {
                        staged[index + 1..]
                            .iter()
                            .flat_map(|(_, entry)| entry)
                            .for_each(Staged::discard);
                        return Err(e);
                    }
                    WriteOutcome::Written
                }
                None => WriteOutcome::Unchanged,
            };
            outcomes.push((file.path.clone(), outcome));
        }
        Ok(outcomes)
    }
}
