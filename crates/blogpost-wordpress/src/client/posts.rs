//! Post operations (metaWeblog.* and blogger.deletePost).

use tracing::info;

use super::WordpressClient;
use crate::error::WordpressError;
use crate::types::{PostContent, RemotePost, id_string};
use crate::xmlrpc::Value;

impl WordpressClient {
    /// Fetch a post by id.
    pub fn get_post(&self, post_id: &str) -> Result<RemotePost, WordpressError> {
        info!("getting post {post_id}");

        let value = self.call(
            "metaWeblog.getPost",
            vec![
                Value::String(post_id.to_owned()),
                self.username(),
                self.password(),
            ],
        )?;
        RemotePost::from_value(&value)
    }

    /// Fetch the most recently created post.
    pub fn get_last_post(&self) -> Result<RemotePost, WordpressError> {
        self.get_recent_posts(1)?
            .into_iter()
            .next()
            .ok_or_else(|| WordpressError::InvalidResponse("server has no posts".to_owned()))
    }

    /// Create a new post; returns the server-assigned id.
    pub fn new_post(&self, content: &PostContent, publish: bool) -> Result<String, WordpressError> {
        info!(
            "creating new {} post '{}'",
            if publish { "published" } else { "unpublished" },
            content.title
        );

        let value = self.call(
            "metaWeblog.newPost",
            vec![
                self.blog_id(),
                self.username(),
                self.password(),
                content.to_value(),
                Value::Bool(publish),
            ],
        )?;
        id_string(&value)
            .ok_or_else(|| WordpressError::InvalidResponse("newPost returned no id".to_owned()))
    }

    /// Edit an existing post, applying the given publication status.
    pub fn edit_post(
        &self,
        post_id: &str,
        content: &PostContent,
        publish: bool,
    ) -> Result<(), WordpressError> {
        info!("editing post {post_id}");

        self.call(
            "metaWeblog.editPost",
            vec![
                Value::String(post_id.to_owned()),
                self.username(),
                self.password(),
                content.to_value(),
                Value::Bool(publish),
            ],
        )?;
        Ok(())
    }

    /// Delete a post.
    pub fn delete_post(&self, post_id: &str) -> Result<(), WordpressError> {
        info!("deleting post {post_id}");

        // First blogger API parameter is an unused application key
        self.call(
            "blogger.deletePost",
            vec![
                Value::String(String::new()),
                Value::String(post_id.to_owned()),
                self.username(),
                self.password(),
                Value::Bool(true),
            ],
        )?;
        Ok(())
    }

    /// Fetch the most recent posts, newest first.
    pub fn get_recent_posts(&self, limit: u32) -> Result<Vec<RemotePost>, WordpressError> {
        info!("listing {limit} recent posts");

        let value = self.call(
            "metaWeblog.getRecentPosts",
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
                "getRecentPosts did not return an array: {other:?}"
            ))),
        }
    }
}
