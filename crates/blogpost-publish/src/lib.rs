//! Publish workflow for blogpost.
//!
//! [`Publisher`] encapsulates the reconciliation between a local document,
//! its per-document cache record, and the remote blog:
//!
//! 1. Load the cache record stored next to the document
//! 2. Resolve the intended identity (post vs page, remote id)
//! 3. Convert the document to HTML (unless it already is HTML)
//! 4. Collapse line breaks outside `<pre>` blocks
//! 5. Upload referenced media files, rewriting their URLs
//! 6. Create or edit the remote resource and persist the cache
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use blogpost_publish::{AsciidocConverter, PublishOptions, Publisher};
//! use blogpost_wordpress::WordpressClient;
//!
//! let client = WordpressClient::new(
//!     "https://blog.example.com/xmlrpc.php",
//!     "username",
//!     "password",
//!     "0",
//! );
//! let converter = AsciidocConverter::new("asciidoc", "html4");
//! let publisher = Publisher::new(&client, converter, PublishOptions::default());
//!
//! // First publish
//! let outcome = publisher.create(Path::new("article.txt"))?;
//!
//! // Subsequent edits
//! let outcome = publisher.update(Path::new("article.txt"))?;
//! # Ok(())
//! # }
//! ```

mod api;
mod cache;
mod convert;
mod error;
mod media;
mod publisher;
mod sanitize;

pub use api::BlogApi;
pub use cache::{CacheRecord, MediaRecord, Status, cache_path, sha256_hex};
pub use convert::{AsciidocConverter, Doctype};
pub use error::PublishError;
pub use publisher::{PublishOptions, PublishOutcome, Publisher, doc_title};
pub use sanitize::collapse_lines;
