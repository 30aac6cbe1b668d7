//! Page operations (wp.* methods).

use tracing::info;

use super::WordpressClient;
use crate::error::WordpressError;
use crate::types::{PostContent, RemotePost, id_string};
use crate::xmlrpc::Value;

impl WordpressClient {
    /// Fetch a page by id.
    pub fn get_page(&self, page_id: &str) -> Result<RemotePost, WordpressError> {
        info!("getting page {page_id}");

        let value = self.call(
            "wp.getPage",
            vec![
                self.blog_id(),
                Value::String(page_id.to_owned()),
                self.username(),
                self.password(),
            ],
        )?;
        RemotePost::from_value(&value)
    }

    /// Fetch the most recently created page.
    pub fn get_last_page(&self) -> Result<RemotePost, WordpressError> {
        self.get_recent_pages(1)?
            .into_iter()
            .next()
            .ok_or_else(|| WordpressError::InvalidResponse("server has no pages".to_owned()))
    }

    /// Create a new page; returns the server-assigned id.
    pub fn new_page(&self, content: &PostContent, publish: bool) -> Result<String, WordpressError> {
        info!(
            "creating new {} page '{}'",
            if publish { "published" } else { "unpublished" },
            content.title
        );

        let value = self.call(
            "wp.newPage",
            vec![
                self.blog_id(),
                self.username(),
                self.password(),
                content.to_value(),
                Value::Bool(publish),
            ],
        )?;
        id_string(&value)
            .ok_or_else(|| WordpressError::InvalidResponse("newPage returned no id".to_owned()))
    }

    /// Edit an existing page, applying the given publication status.
    pub fn edit_page(
        &self,
        page_id: &str,
        content: &PostContent,
        publish: bool,
    ) -> Result<(), WordpressError> {
        info!("editing page {page_id}");

        self.call(
            "wp.editPage",
            vec![
                self.blog_id(),
                Value::String(page_id.to_owned()),
                self.username(),
                self.password(),
                content.to_value(),
                Value::Bool(publish),
            ],
        )?;
        Ok(())
    }

    /// Delete a page.
    pub fn delete_page(&self, page_id: &str) -> Result<(), WordpressError> {
        info!("deleting page {page_id}");

        self.call(
            "wp.deletePage",
            vec![
                self.blog_id(),
                self.username(),
                self.password(),
                Value::String(page_id.to_owned()),
            ],
        )?;
        Ok(())
    }

    /// Fetch the most recent pages, newest first.
    pub fn get_recent_pages(&self, limit: u32) -> Result<Vec<RemotePost>, WordpressError> {
        info!("listing {limit} recent pages");

        let value = self.call(
            "wp.getPages",
            vec![
                self.blog_id(),
                self.username(),
                self.password(),
                Value::Int(i64::from(limit)),
            ],
        )?;
        match value {
            Value::Array(items) => items.iter().map(RemotePost::from_value).collect(),
            other => Err(WordpressError::InvalidResponse(format!(
                "getPages did not return an array: {other:?}"
            ))),
        }
    }
}
