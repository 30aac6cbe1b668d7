//! Error types for the publish workflow.

use std::path::PathBuf;

use blogpost_wordpress::WordpressError;

/// Error from publish operations.
///
/// The logical-state variants (`AlreadyPublished`, `MissingCache`,
/// `MissingPostId`, `MissingTitle`, `NoTitleLine`) are user-correctable and
/// carry guidance in their messages.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// `create` on a document that already has a remote id.
    #[error("{} was previously posted (id {id}), use the update command", .document.display())]
    AlreadyPublished {
        /// The source document.
        document: PathBuf,
        /// The cached remote id.
        id: String,
    },

    /// An operation that needs a cache record found none.
    #[error("missing cache file: {} (use the create command first, or pass --post-id)", .0.display())]
    MissingCache(PathBuf),

    /// `delete` without an id from cache or override.
    #[error("no post id: pass --post-id or a document with a cache file")]
    MissingPostId,

    /// Raw-HTML input with no title from `--title` or the cache.
    #[error("no title: HTML input requires --title or a previously cached title")]
    MissingTitle,

    /// Document contains only blank and comment lines.
    #[error("no title found in {}", .0.display())]
    NoTitleLine(PathBuf),

    /// Converter could not be started.
    #[error("failed to run {command}: {source}")]
    ConverterSpawn {
        /// Converter command name.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// Converter exited with a failure status.
    #[error("{command} failed ({status}): {stderr}")]
    Convert {
        /// Converter command name.
        command: String,
        /// Process exit status.
        status: std::process::ExitStatus,
        /// Captured standard error output.
        stderr: String,
    },

    /// Cache file exists but could not be parsed.
    #[error("invalid cache file {}: {source}", .path.display())]
    CacheFormat {
        /// Cache file path.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WordPress API error.
    #[error("{0}")]
    Wordpress(#[from] WordpressError),
}
