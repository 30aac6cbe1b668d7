//! CLI error types.

use blogpost_config::ConfigError;
use blogpost_publish::PublishError;
use blogpost_wordpress::WordpressError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Wordpress(#[from] WordpressError),

    #[error("{0}")]
    Validation(String),
}
