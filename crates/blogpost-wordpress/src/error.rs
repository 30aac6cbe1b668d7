//! Error types for WordPress integration.

/// Error from WordPress XML-RPC operations.
#[derive(Debug, thiserror::Error)]
pub enum WordpressError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Server rejected the call with an XML-RPC fault.
    #[error("server fault {code}: {message}")]
    Fault {
        /// Numeric fault code reported by the server.
        code: i64,
        /// Human-readable fault string.
        message: String,
    },

    /// XML parsing error.
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Response did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}
