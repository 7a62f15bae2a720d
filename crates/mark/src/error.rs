//! CLI error types.

use mark_config::ConfigError;
use mark_confluence::PublishError;
use mark_meta::MetaError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Meta(#[from] MetaError),

    #[error("{0}")]
    Publish(#[from] PublishError),
}
