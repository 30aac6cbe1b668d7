//! WordPress XML-RPC integration for blogpost.
//!
//! [`WordpressClient`] is a synchronous client for the WordPress XML-RPC
//! endpoint (metaWeblog.*, wp.* and blogger.* methods) covering the post,
//! page and media-object operations the publisher needs. The wire codec
//! lives in [`xmlrpc`].

mod client;
mod error;
mod types;
pub mod xmlrpc;

pub use client::WordpressClient;
pub use error::WordpressError;
pub use types::{PostContent, PostKind, RemotePost};
