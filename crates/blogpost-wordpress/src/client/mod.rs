//! WordPress XML-RPC API client.
//!
//! Provides a sync HTTP client for the WordPress XML-RPC endpoint with
//! username/password authentication passed on each call, the way the
//! metaWeblog and wp method families expect.

mod media;
mod pages;
mod posts;

use std::time::Duration;

use ureq::Agent;

use crate::error::WordpressError;
use crate::xmlrpc::{self, Value};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// WordPress XML-RPC client.
pub struct WordpressClient {
    agent: Agent,
    url: String,
    username: String,
    password: String,
    blog_id: String,
}

impl WordpressClient {
    /// Create a client for an XML-RPC endpoint.
    ///
    /// # Arguments
    /// * `url` - XML-RPC endpoint URL (usually ends in `/xmlrpc.php`)
    /// * `username` - WordPress login name
    /// * `password` - WordPress password
    /// * `blog_id` - Blog id passed on each call (`"0"` for single-blog installs)
    #[must_use]
    pub fn new(url: &str, username: &str, password: &str, blog_id: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: url.to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
            blog_id: blog_id.to_owned(),
        }
    }

    /// Issue one XML-RPC call and parse the response value.
    pub(crate) fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, WordpressError> {
        // The request body carries credentials; log only the method name
        tracing::debug!("calling {method} on {}", self.url);

        let body = xmlrpc::build_request(method, &params);
        let response = self
            .agent
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .send(body.as_bytes())?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WordpressError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let text = body_reader.read_to_string()?;
        xmlrpc::parse_response(&text)
    }

    pub(crate) fn username(&self) -> Value {
        Value::String(self.username.clone())
    }

    pub(crate) fn password(&self) -> Value {
        Value::String(self.password.clone())
    }

    pub(crate) fn blog_id(&self) -> Value {
        Value::String(self.blog_id.clone())
    }
}
