//! `mark publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use mark_config::{CliSettings, Config};
use mark_confluence::{ConfluenceClient, PublishResult, Publisher};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Markdown files to publish.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Drop the leading H1 heading (overrides config).
    #[arg(long)]
    drop_h1: bool,

    /// Compile and print documents without creating or updating pages.
    #[arg(long)]
    dry_run: bool,

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

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// Stops at the first document that fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or a document fails to publish.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            base_url: self.base_url,
            username: self.username,
            password: self.password,
            drop_h1: self.drop_h1.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let client = ConfluenceClient::from_config(config.require_confluence()?);
        let publisher = Publisher::new(&client).with_drop_h1(config.render.drop_h1);

        for file in &self.files {
            if self.dry_run {
                let compiled = publisher.compile(file)?;
                output.highlight(&format!(
                    "[DRY RUN] {} -> {} / {}",
                    file.display(),
                    compiled.meta.space,
                    compiled.meta.title
                ));
                for warning in &compiled.warnings {
                    output.warning(&format!("Warning: {warning}"));
                }
                output.document(&compiled.storage)?;
            } else {
                output.info(&format!("Publishing {}...", file.display()));
                let result = publisher.publish(file)?;
                print_publish_result(&output, &result);
            }
        }

        Ok(())
    }
}

fn print_publish_result(output: &Output, result: &PublishResult) {
    if result.created {
        output.success("Page created successfully!");
    } else {
        output.success("Page updated successfully!");
    }
    output.info(&format!("ID: {}", result.page.id));
    output.info(&format!("Title: {}", result.page.title));
    output.info(&format!("Version: {}", result.page.version.number));
    output.info(&format!("URL: {}", result.url));
}
