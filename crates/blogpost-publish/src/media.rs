//! Media discovery, upload and URL rewriting.
//!
//! Scans sanitized content for the image references the converter emits,
//! uploads the referenced files, and rewrites their `src` attributes to the
//! URLs the server assigns. Unchanged files (by content hash) reuse their
//! cached URL without a new upload.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::api::BlogApi;
use crate::cache::{MediaRecord, sha256_hex};
use crate::error::PublishError;

/// Image references as the converter emits them.
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img src="([^"]+)""#).expect("invalid img src regex"));

/// Result of a media pass over the content.
#[derive(Debug)]
pub(crate) struct MediaOutcome {
    /// Content with rewritten `src` attributes.
    pub(crate) content: String,
    /// Number of files uploaded during this pass.
    pub(crate) uploaded: usize,
    /// Non-fatal problems (missing files).
    pub(crate) warnings: Vec<String>,
}

/// Upload referenced media files and rewrite their `src` attributes.
///
/// Relative references are resolved against `document_dir`; references with
/// a URL scheme or an absolute path are left alone. A missing file is a
/// warning, not an error: the reference keeps pointing at a previously
/// uploaded copy when one is cached, and is otherwise left unchanged.
/// Under dry-run nothing is uploaded, but checksums are still refreshed so
/// operators can preview behavior.
pub(crate) fn process_media(
    content: &str,
    document_dir: &Path,
    media: &mut BTreeMap<String, MediaRecord>,
    api: &dyn BlogApi,
    dry_run: bool,
) -> Result<MediaOutcome, PublishError> {
    let references: BTreeSet<String> = IMG_SRC
        .captures_iter(content)
        .map(|caps| caps[1].to_owned())
        .filter(|src| !is_remote(src))
        .collect();

    let mut content = content.to_owned();
    let mut uploaded = 0;
    let mut warnings = Vec::new();

    for reference in references {
        let path = document_dir.join(&reference);
        if !path.is_file() {
            warn!("media file not found: {}", path.display());
            warnings.push(format!("media file not found: {}", path.display()));
            if let Some(url) = media.get(&reference).and_then(|r| r.url.clone()) {
                rewrite(&mut content, &reference, &url);
            }
            continue;
        }

        let data = std::fs::read(&path)?;
        let checksum = sha256_hex(&data);
        let record = media.entry(reference.clone()).or_default();

        if record.checksum == checksum && record.url.is_some() {
            debug!("media unchanged, reusing upload: {reference}");
        } else if dry_run {
            record.checksum = checksum;
        } else {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(reference.as_str());
            let content_type = mime_guess::from_path(&path).first_or_octet_stream();
            let url = api.upload_media(name, content_type.essence_str(), &data)?;
            record.checksum = checksum;
            record.url = Some(url);
            uploaded += 1;
        }

        if let Some(url) = record.url.clone() {
            rewrite(&mut content, &reference, &url);
        }
    }

    Ok(MediaOutcome {
        content,
        uploaded,
        warnings,
    })
}

/// References with a scheme or an absolute path are already remote.
fn is_remote(src: &str) -> bool {
    src.contains("://") || src.starts_with('/')
}

/// Point every `src` for `from` at `to`.
fn rewrite(content: &mut String, from: &str, to: &str) {
    let old = format!(r#"src="{from}""#);
    let new = format!(r#"src="{to}""#);
    *content = content.replace(&old, &new);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::RecordingApi;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn run(
        content: &str,
        dir: &Path,
        media: &mut BTreeMap<String, MediaRecord>,
        api: &RecordingApi,
        dry_run: bool,
    ) -> MediaOutcome {
        process_media(content, dir, media, api, dry_run).unwrap()
    }

    #[test]
    fn test_upload_and_rewrite() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("shot.png"), b"png bytes").unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();

        let outcome = run(
            r#"<p>text</p><img src="shot.png">"#,
            tmp.path(),
            &mut media,
            &api,
            false,
        );

        assert_eq!(outcome.uploaded, 1);
        assert_eq!(
            outcome.content,
            r#"<p>text</p><img src="https://blog.example.com/wp-content/uploads/shot.png">"#
        );
        assert_eq!(media["shot.png"].checksum, sha256_hex(b"png bytes"));
        assert_eq!(api.uploads.borrow().as_slice(), ["shot.png"]);
    }

    #[test]
    fn test_unchanged_content_uploads_once_across_runs() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("shot.png"), b"identical").unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();
        let content = r#"<img src="shot.png">"#;

        let first = run(content, tmp.path(), &mut media, &api, false);
        let second = run(content, tmp.path(), &mut media, &api, false);

        assert_eq!(first.uploaded, 1);
        assert_eq!(second.uploaded, 0);
        assert_eq!(api.uploads.borrow().len(), 1);
        // The cached URL is still applied on the second run
        assert!(second.content.contains("wp-content/uploads/shot.png"));
    }

    #[test]
    fn test_changed_content_reuploads() {
        let tmp = TempDir::new().unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();
        let content = r#"<img src="shot.png">"#;

        std::fs::write(tmp.path().join("shot.png"), b"first").unwrap();
        run(content, tmp.path(), &mut media, &api, false);
        std::fs::write(tmp.path().join("shot.png"), b"second").unwrap();
        let outcome = run(content, tmp.path(), &mut media, &api, false);

        assert_eq!(outcome.uploaded, 1);
        assert_eq!(api.uploads.borrow().len(), 2);
        assert_eq!(media["shot.png"].checksum, sha256_hex(b"second"));
    }

    #[test]
    fn test_missing_file_warns_and_keeps_reference() {
        let tmp = TempDir::new().unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();

        let outcome = run(
            r#"<img src="gone.png">"#,
            tmp.path(),
            &mut media,
            &api,
            false,
        );

        assert_eq!(outcome.uploaded, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("gone.png"));
        assert_eq!(outcome.content, r#"<img src="gone.png">"#);
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_missing_file_with_cached_url_rewrites() {
        let tmp = TempDir::new().unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();
        media.insert(
            "gone.png".to_owned(),
            MediaRecord {
                checksum: sha256_hex(b"old"),
                url: Some("https://blog.example.com/wp-content/uploads/gone.png".to_owned()),
            },
        );

        let outcome = run(
            r#"<img src="gone.png">"#,
            tmp.path(),
            &mut media,
            &api,
            false,
        );

        assert_eq!(outcome.uploaded, 0);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.content.contains("wp-content/uploads/gone.png"));
    }

    #[test]
    fn test_remote_references_left_alone() {
        let tmp = TempDir::new().unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();
        let content = r#"<img src="https://elsewhere.example.com/x.png"><img src="/absolute.png">"#;

        let outcome = run(content, tmp.path(), &mut media, &api, false);

        assert_eq!(outcome.uploaded, 0);
        assert_eq!(outcome.content, content);
        assert!(media.is_empty());
    }

    #[test]
    fn test_dry_run_records_checksum_without_upload() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("shot.png"), b"png bytes").unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();

        let outcome = run(
            r#"<img src="shot.png">"#,
            tmp.path(),
            &mut media,
            &api,
            true,
        );

        assert_eq!(outcome.uploaded, 0);
        assert_eq!(api.call_count(), 0);
        assert_eq!(media["shot.png"].checksum, sha256_hex(b"png bytes"));
        assert_eq!(media["shot.png"].url, None);
        // No URL yet, so the reference stays local
        assert_eq!(outcome.content, r#"<img src="shot.png">"#);
    }

    #[test]
    fn test_same_reference_rewritten_everywhere() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("shot.png"), b"png").unwrap();
        let api = RecordingApi::new();
        let mut media = BTreeMap::new();

        let outcome = run(
            r#"<img src="shot.png"> and again <img src="shot.png">"#,
            tmp.path(),
            &mut media,
            &api,
            false,
        );

        assert_eq!(outcome.uploaded, 1);
        assert_eq!(outcome.content.matches("wp-content/uploads/shot.png").count(), 2);
    }
}
