//! Seam between the publisher and the remote API.
//!
//! The publisher talks to the blog through [`BlogApi`] rather than the
//! concrete client, so the whole reconciliation flow can be exercised
//! against a recording mock in tests.

use blogpost_wordpress::{PostContent, PostKind, RemotePost, WordpressClient, WordpressError};

/// The remote operations the publisher needs, dispatched on resource kind.
pub trait BlogApi {
    /// Fetch a post or page by id.
    fn get(&self, kind: PostKind, id: &str) -> Result<RemotePost, WordpressError>;

    /// Fetch the most recently created post or page.
    fn get_last(&self, kind: PostKind) -> Result<RemotePost, WordpressError>;

    /// Create a resource; returns the server-assigned id.
    fn create(
        &self,
        kind: PostKind,
        content: &PostContent,
        publish: bool,
    ) -> Result<String, WordpressError>;

    /// Edit a resource, applying the given publication status.
    fn edit(
        &self,
        kind: PostKind,
        id: &str,
        content: &PostContent,
        publish: bool,
    ) -> Result<(), WordpressError>;

    /// Delete a resource.
    fn delete(&self, kind: PostKind, id: &str) -> Result<(), WordpressError>;

    /// Fetch the most recent resources, newest first.
    fn recent(&self, kind: PostKind, limit: u32) -> Result<Vec<RemotePost>, WordpressError>;

    /// Upload a media file; returns the assigned URL.
    fn upload_media(
        &self,
        name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, WordpressError>;
}

impl BlogApi for WordpressClient {
    fn get(&self, kind: PostKind, id: &str) -> Result<RemotePost, WordpressError> {
        match kind {
            PostKind::Post => self.get_post(id),
            PostKind::Page => self.get_page(id),
        }
    }

    fn get_last(&self, kind: PostKind) -> Result<RemotePost, WordpressError> {
        match kind {
            PostKind::Post => self.get_last_post(),
            PostKind::Page => self.get_last_page(),
        }
    }

    fn create(
        &self,
        kind: PostKind,
        content: &PostContent,
        publish: bool,
    ) -> Result<String, WordpressError> {
        match kind {
            PostKind::Post => self.new_post(content, publish),
            PostKind::Page => self.new_page(content, publish),
        }
    }

    fn edit(
        &self,
        kind: PostKind,
        id: &str,
        content: &PostContent,
        publish: bool,
    ) -> Result<(), WordpressError> {
        match kind {
            PostKind::Post => self.edit_post(id, content, publish),
            PostKind::Page => self.edit_page(id, content, publish),
        }
    }

    fn delete(&self, kind: PostKind, id: &str) -> Result<(), WordpressError> {
        match kind {
            PostKind::Post => self.delete_post(id),
            PostKind::Page => self.delete_page(id),
        }
    }

    fn recent(&self, kind: PostKind, limit: u32) -> Result<Vec<RemotePost>, WordpressError> {
        match kind {
            PostKind::Post => self.get_recent_posts(limit),
            PostKind::Page => self.get_recent_pages(limit),
        }
    }

    fn upload_media(
        &self,
        name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, WordpressError> {
        self.new_media_object(name, content_type, data)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory recording implementation of [`BlogApi`] for tests.

    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    use super::{BlogApi, PostContent, PostKind, RemotePost, WordpressError};

    /// Records every call and keeps created resources in memory.
    #[derive(Default)]
    pub(crate) struct RecordingApi {
        /// Method names, in call order.
        pub(crate) calls: RefCell<Vec<String>>,
        /// Uploaded media names.
        pub(crate) uploads: RefCell<Vec<String>>,
        /// Created/edited resources by id.
        pub(crate) posts: RefCell<BTreeMap<String, RemotePost>>,
        next_id: Cell<u64>,
    }

    impl RecordingApi {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub(crate) fn insert_post(&self, post: RemotePost) {
            self.posts.borrow_mut().insert(post.id.clone(), post);
        }

        fn record(&self, call: &str) {
            self.calls.borrow_mut().push(call.to_owned());
        }
    }

    impl BlogApi for RecordingApi {
        fn get(&self, _kind: PostKind, id: &str) -> Result<RemotePost, WordpressError> {
            self.record("get");
            self.posts
                .borrow()
                .get(id)
                .cloned()
                .ok_or_else(|| WordpressError::Fault {
                    code: 404,
                    message: format!("no such post: {id}"),
                })
        }

        fn get_last(&self, _kind: PostKind) -> Result<RemotePost, WordpressError> {
            self.record("get_last");
            self.posts
                .borrow()
                .values()
                .last()
                .cloned()
                .ok_or_else(|| {
                    WordpressError::InvalidResponse("server has no posts".to_owned())
                })
        }

        fn create(
            &self,
            _kind: PostKind,
            content: &PostContent,
            _publish: bool,
        ) -> Result<String, WordpressError> {
            self.record("create");
            let id = (self.next_id.get() + 1).to_string();
            self.next_id.set(self.next_id.get() + 1);
            self.insert_post(RemotePost {
                id: id.clone(),
                title: content.title.clone(),
                description: content.description.clone(),
                permalink: Some(format!("https://blog.example.com/?p={id}")),
                created_at: Some(1_199_181_600),
            });
            Ok(id)
        }

        fn edit(
            &self,
            _kind: PostKind,
            id: &str,
            content: &PostContent,
            _publish: bool,
        ) -> Result<(), WordpressError> {
            self.record("edit");
            let mut posts = self.posts.borrow_mut();
            let Some(post) = posts.get_mut(id) else {
                return Err(WordpressError::Fault {
                    code: 404,
                    message: format!("no such post: {id}"),
                });
            };
            post.title = content.title.clone();
            post.description = content.description.clone();
            Ok(())
        }

        fn delete(&self, _kind: PostKind, id: &str) -> Result<(), WordpressError> {
            self.record("delete");
            self.posts.borrow_mut().remove(id);
            Ok(())
        }

        fn recent(&self, _kind: PostKind, limit: u32) -> Result<Vec<RemotePost>, WordpressError> {
            self.record("recent");
            let posts = self.posts.borrow();
            Ok(posts.values().rev().take(limit as usize).cloned().collect())
        }

        fn upload_media(
            &self,
            name: &str,
            _content_type: &str,
            _data: &[u8],
        ) -> Result<String, WordpressError> {
            self.record("upload_media");
            self.uploads.borrow_mut().push(name.to_owned());
            Ok(format!("https://blog.example.com/wp-content/uploads/{name}"))
        }
    }
}
