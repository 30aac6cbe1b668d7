//! Media upload (metaWeblog.newMediaObject).

use std::collections::BTreeMap;

use tracing::info;

use super::WordpressClient;
use crate::error::WordpressError;
use crate::xmlrpc::Value;

impl WordpressClient {
    /// Upload a media file; returns the URL assigned by the server.
    ///
    /// WordPress upserts by name: re-uploading the same filename replaces
    /// the stored object.
    pub fn new_media_object(
        &self,
        name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, WordpressError> {
        info!("uploading media object '{name}' ({} bytes)", data.len());

        let mut file = BTreeMap::new();
        file.insert("name".to_owned(), Value::String(name.to_owned()));
        file.insert("type".to_owned(), Value::String(content_type.to_owned()));
        file.insert("bits".to_owned(), Value::Base64(data.to_vec()));

        let value = self.call(
            "metaWeblog.newMediaObject",
            vec![
                self.blog_id(),
                self.username(),
                self.password(),
                Value::Struct(file),
            ],
        )?;
        value
            .get("url")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                WordpressError::InvalidResponse("newMediaObject returned no url".to_owned())
            })
    }
}
