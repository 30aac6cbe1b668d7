//! Publish reconciliation.
//!
//! [`Publisher`] drives one create/update/delete operation for a single
//! document, keeping the per-document cache record and the remote state in
//! step. The flow for create/update:
//!
//! 1. Hash the source document (an unchanged hash is logged, not a skip)
//! 2. Refresh title/creation time from the server for known resources
//! 3. Resolve the title (override, then document, then cache)
//! 4. Convert and sanitize the content, then upload referenced media
//! 5. Create or edit the remote resource
//! 6. Persist the updated cache record
//!
//! Under dry-run every local computation still happens, but nothing is sent
//! to the server and nothing is written to disk.

use std::path::Path;

use time::OffsetDateTime;
use tracing::info;

use blogpost_wordpress::{PostContent, PostKind};

use crate::api::BlogApi;
use crate::cache::{CacheRecord, Status, cache_path, sha256_hex};
use crate::convert::{AsciidocConverter, Doctype};
use crate::error::PublishError;
use crate::media::process_media;
use crate::sanitize::collapse_lines;

/// Options governing one publish operation.
#[derive(Debug, Default)]
pub struct PublishOptions {
    /// Explicit post/page selection; the cached kind applies when `None`.
    pub kind: Option<PostKind>,
    /// Explicit title override.
    pub title: Option<String>,
    /// Explicit publish/unpublish selection; the cached status applies when
    /// `None`, unpublished for a first publish.
    pub status: Option<Status>,
    /// The document is already HTML; skip conversion.
    pub html_input: bool,
    /// Doctype hint passed to the converter.
    pub doctype: Doctype,
    /// Explicit media toggle; the default uploads media for converted
    /// input and skips it for raw HTML.
    pub media: Option<bool>,
    /// Explicit post id override (`.` selects the most recent resource).
    pub post_id: Option<String>,
    /// Compute everything, mutate nothing remote or on disk.
    pub dry_run: bool,
}

/// What a publish operation did (or, under dry-run, would do).
#[derive(Debug)]
pub struct PublishOutcome {
    /// Remote id; `None` only for a dry-run create.
    pub post_id: Option<String>,
    /// Permalink, when known.
    pub url: Option<String>,
    /// Post or page.
    pub kind: PostKind,
    /// Publication status that was applied.
    pub status: Status,
    /// True when the resource was created rather than edited.
    pub created: bool,
    /// True when the source hash matches the previous publish.
    pub unchanged: bool,
    /// Media files uploaded during this run.
    pub media_uploaded: usize,
    /// Non-fatal problems (missing media files).
    pub warnings: Vec<String>,
}

/// Reconciles a local document and its cache record with remote blog state.
pub struct Publisher<'a> {
    api: &'a dyn BlogApi,
    converter: AsciidocConverter,
    options: PublishOptions,
}

impl<'a> Publisher<'a> {
    /// Create a publisher for one operation.
    #[must_use]
    pub fn new(
        api: &'a dyn BlogApi,
        converter: AsciidocConverter,
        options: PublishOptions,
    ) -> Self {
        Self {
            api,
            converter,
            options,
        }
    }

    /// Publish a document for the first time.
    ///
    /// # Errors
    ///
    /// Fails with [`PublishError::AlreadyPublished`] when a cache record
    /// with a remote id already exists.
    pub fn create(&self, document: &Path) -> Result<PublishOutcome, PublishError> {
        let (record, _) = CacheRecord::load_or_default(document)?;
        if let Some(id) = &record.post_id {
            return Err(PublishError::AlreadyPublished {
                document: document.to_path_buf(),
                id: id.clone(),
            });
        }
        self.publish(document, record, None)
    }

    /// Republish a previously published document.
    ///
    /// # Errors
    ///
    /// Fails with [`PublishError::MissingCache`] when the document has no
    /// cached remote id and no `--post-id` override was given.
    pub fn update(&self, document: &Path) -> Result<PublishOutcome, PublishError> {
        let (record, _) = CacheRecord::load_or_default(document)?;
        let Some(id) = self.resolve_id(&record)? else {
            return Err(PublishError::MissingCache(cache_path(document)));
        };
        self.publish(document, record, Some(id))
    }

    /// Delete the remote resource and the local cache file.
    ///
    /// Returns the deleted id. The id comes from the document's cache
    /// record or the `--post-id` override; without either this fails with
    /// [`PublishError::MissingPostId`].
    pub fn delete(&self, document: Option<&Path>) -> Result<String, PublishError> {
        let record = match document {
            Some(document) => CacheRecord::load_or_default(document)?.0,
            None => CacheRecord::default(),
        };
        let kind = self.options.kind.unwrap_or(record.kind);
        let id = self.resolve_id(&record)?.ok_or(PublishError::MissingPostId)?;

        if self.options.dry_run {
            info!("dry run: would delete {kind} {id}");
            return Ok(id);
        }

        self.api.delete(kind, &id)?;
        if let Some(document) = document {
            CacheRecord::remove_if_exists(document)?;
        }
        Ok(id)
    }

    /// Id from the explicit override (resolving `.` to the most recent
    /// resource) or the cache record.
    fn resolve_id(&self, record: &CacheRecord) -> Result<Option<String>, PublishError> {
        let kind = self.options.kind.unwrap_or(record.kind);
        match self.options.post_id.as_deref() {
            Some(".") => Ok(Some(self.api.get_last(kind)?.id)),
            Some(id) => Ok(Some(id.to_owned())),
            None => Ok(record.post_id.clone()),
        }
    }

    fn publish(
        &self,
        document: &Path,
        mut record: CacheRecord,
        post_id: Option<String>,
    ) -> Result<PublishOutcome, PublishError> {
        let kind = self.options.kind.unwrap_or(record.kind);
        let source = std::fs::read_to_string(document)?;

        let checksum = sha256_hex(source.as_bytes());
        let unchanged = record.checksum.as_deref() == Some(checksum.as_str());
        if unchanged {
            info!("{} unchanged since last publish", document.display());
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let mut permalink = record.url.clone();
        if let Some(id) = &post_id {
            // Validates existence and refreshes server-held state; a dry
            // run stays offline and trusts the cache instead
            if !self.options.dry_run {
                let remote = self.api.get(kind, id)?;
                record.title = remote.title;
                if let Some(created_at) = remote.created_at {
                    record.created_at = created_at;
                }
                if remote.permalink.is_some() {
                    permalink = remote.permalink;
                }
            }
            record.updated_at = now;
        } else {
            record.created_at = now;
            record.updated_at = now;
        }

        let title = self.resolve_title(document, &source, &record)?;

        let html = if self.options.html_input {
            source
        } else {
            self.converter.convert(document, self.options.doctype)?
        };
        let mut description = collapse_lines(&html);

        let mut media_uploaded = 0;
        let mut warnings = Vec::new();
        if self.options.media.unwrap_or(!self.options.html_input) {
            let document_dir = document.parent().unwrap_or_else(|| Path::new("."));
            let outcome = process_media(
                &description,
                document_dir,
                &mut record.media,
                self.api,
                self.options.dry_run,
            )?;
            description = outcome.content;
            media_uploaded = outcome.uploaded;
            warnings = outcome.warnings;
        }

        let status = self.options.status.unwrap_or(record.status);
        let content = PostContent {
            title: title.clone(),
            description,
        };
        let created = post_id.is_none();

        let post_id = if let Some(id) = post_id {
            if self.options.dry_run {
                info!("dry run: would edit {kind} {id}");
            } else {
                self.api.edit(kind, &id, &content, status.is_published())?;
            }
            Some(id)
        } else if self.options.dry_run {
            info!("dry run: would create new {status} {kind}");
            None
        } else {
            let id = self.api.create(kind, &content, status.is_published())?;
            // Pick up the permalink and creation time the server assigned
            match self.api.get(kind, &id) {
                Ok(remote) => {
                    permalink = remote.permalink;
                    if let Some(created_at) = remote.created_at {
                        record.created_at = created_at;
                    }
                }
                Err(err) => tracing::warn!("could not fetch created {kind} {id}: {err}"),
            }
            Some(id)
        };

        record.title = title;
        record.status = status;
        record.kind = kind;
        record.checksum = Some(checksum);
        record.url.clone_from(&permalink);
        if let Some(id) = &post_id {
            record.post_id = Some(id.clone());
        }

        if !self.options.dry_run {
            record.store(document)?;
        }

        Ok(PublishOutcome {
            post_id,
            url: permalink,
            kind,
            status,
            created,
            unchanged,
            media_uploaded,
            warnings,
        })
    }

    /// Title precedence: explicit override, then the document's first
    /// content line (non-HTML input only), then the cached title.
    fn resolve_title(
        &self,
        document: &Path,
        source: &str,
        record: &CacheRecord,
    ) -> Result<String, PublishError> {
        if let Some(title) = &self.options.title {
            return Ok(title.clone());
        }
        if !self.options.html_input {
            return doc_title(source)
                .ok_or_else(|| PublishError::NoTitleLine(document.to_path_buf()));
        }
        if record.title.is_empty() {
            return Err(PublishError::MissingTitle);
        }
        Ok(record.title.clone())
    }
}

/// First non-blank, non-comment line of an AsciiDoc document.
///
/// Comment lines start with `//`.
#[must_use]
pub fn doc_title(source: &str) -> Option<String> {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("//"))
        .map(ToOwned::to_owned)
}
