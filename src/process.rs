//! External processes
//!
//! The only suspension points of a compilation: evaluating a jsonnet source
//! and rendering the graph with Graphviz. Children are killed when the future
//! awaiting them is dropped; there is no timeout and no retry.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use tokio::process::Command;

use crate::error::{DecodeError, NavError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Runs `program` to completion and returns its stdout.
    pub async fn execute<I, S>(&self, program: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => NavError::NotFound {
                    tool: program.to_string(),
                },
                _ => NavError::ExternalTool {
                    tool: program.to_string(),
                    message: e.to_string(),
                },
            })?;

        if !output.status.success() {
            return Err(NavError::ExternalTool {
                tool: program.to_string(),
                message: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG READER
// ═══════════════════════════════════════════════════════════════════════════════

pub const JSONNET: &str = "jsonnet";

/// Decodes a navigation source into an untyped tree. `.json` files are read
/// directly; anything else is evaluated by `jsonnet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigReader {
    runner: CommandRunner,
}

impl ConfigReader {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub async fn read(&self, path: &Path) -> Result<serde_json::Value> {
        let text = if path.extension().and_then(OsStr::to_str) == Some("json") {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| NavError::io(path, e))?
        } else {
            self.runner.execute(JSONNET, [path]).await?
        };

        serde_json::from_str(&text).map_err(|e| NavError::Decode {
            path: path.to_path_buf(),
            source: DecodeError::from(e),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GRAPH RENDERER
// ═══════════════════════════════════════════════════════════════════════════════

pub const DOT: &str = "dot";

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphRenderer {
    runner: CommandRunner,
}

impl GraphRenderer {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    /// `dot -Tsvg <input> -o <output>`
    pub async fn render(&self, input: &Path, output: &Path) -> Result<()> {
        let args: [&OsStr; 4] = [
            OsStr::new("-Tsvg"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ];
        self.runner.execute(DOT, args).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_not_found() {
        let error = CommandRunner
            .execute("navgen-tool-that-does-not-exist", ["--version"])
            .await
            .unwrap_err();
        assert!(
            matches!(&error, NavError::NotFound { tool } if tool == "navgen-tool-that-does-not-exist")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_surfaces_stderr() {
        let error = CommandRunner
            .execute("sh", ["-c", "echo 'bad input' >&2; exit 3"])
            .await
            .unwrap_err();
        match error {
            NavError::ExternalTool { tool, message } => {
                assert_eq!(tool, "sh");
                assert_eq!(message.trim(), "bad input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        let stdout = CommandRunner.execute("sh", ["-c", "printf '{}'"]).await.unwrap();
        assert_eq!(stdout, "{}");
    }

    #[tokio::test]
    async fn test_json_sources_are_read_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigation.json");
        std::fs::write(&path, r#"{ "config": { "path": "src" }, "navigators": [] }"#).unwrap();

        let value = ConfigReader::default().read(&path).await.unwrap();
        assert_eq!(value["config"]["path"], "src");
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navigation.json");
        std::fs::write(&path, "{ nope").unwrap();

        let error = ConfigReader::default().read(&path).await.unwrap_err();
        assert!(matches!(error, NavError::Decode { .. }));
    }
}
