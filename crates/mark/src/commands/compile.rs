//! `mark compile` command implementation.

use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use mark_config::{CliSettings, Config};
use mark_confluence::{ConfluenceClient, Publisher};
use mark_meta::extract_meta;
use mark_renderer::{RenderResult, StorageMacros, compile_markdown, strip_leading_h1};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the compile command.
#[derive(Args)]
pub(crate) struct CompileArgs {
    /// Path to the markdown file.
    file: PathBuf,

    /// Drop the leading H1 heading (overrides config).
    #[arg(long)]
    drop_h1: bool,

    /// Path to configuration file (default: auto-discover mark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Confluence username (overrides config).
    #[arg(short, long, env = "MARK_USERNAME")]
    username: Option<String>,

    /// Confluence password or API token (overrides config).
    #[arg(short, long, env = "MARK_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Confluence base URL (overrides config).
    #[arg(long, env = "MARK_BASE_URL")]
    base_url: Option<String>,
}

impl CompileArgs {
    /// Execute the compile command.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or compilation fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_url: self.base_url,
            username: self.username,
            password: self.password,
            drop_h1: self.drop_h1.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let result = if config.confluence.is_some() {
            let client = ConfluenceClient::from_config(config.require_confluence()?);
            let compiled = Publisher::new(&client)
                .with_drop_h1(config.render.drop_h1)
                .compile(&self.file)?;
            RenderResult {
                storage: compiled.storage,
                warnings: compiled.warnings,
            }
        } else {
            output.warning("Confluence is not configured, relative links are left as they are.");
            compile_offline(&self.file, config.render.drop_h1)?
        };

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.document(&result.storage)?;

        Ok(())
    }
}

/// Compile a document without resolving links.
///
/// Unlike publishing, documents without metadata headers are accepted.
fn compile_offline(path: &Path, drop_h1: bool) -> Result<RenderResult, CliError> {
    let data = std::fs::read(path)?;
    let (meta, body) = extract_meta(&data)?;
    if meta.is_none() {
        debug!(path = %path.display(), "document has no metadata headers");
    }

    let markdown =
        std::str::from_utf8(body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let markdown = if drop_h1 {
        strip_leading_h1(markdown)
    } else {
        markdown.into()
    };

    Ok(compile_markdown(&markdown, &StorageMacros))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_offline_strips_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(
            &path,
            "<!-- Space: DOCS -->\n<!-- Title: Doc -->\n# Doc\nSee [a](a.md).\n",
        )
        .unwrap();

        let result = compile_offline(&path, true).unwrap();

        assert_eq!(result.storage, "<p>See <a href=\"a.md\">a</a>.</p>\n");
    }

    #[test]
    fn test_compile_offline_unmanaged_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.md");
        std::fs::write(&path, "plain text\n").unwrap();

        let result = compile_offline(&path, false).unwrap();

        assert_eq!(result.storage, "<p>plain text</p>\n");
    }

    #[test]
    fn test_compile_offline_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile_offline(&dir.path().join("nope.md"), false).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
