//! `blogpost info` command implementation.
//!
//! Purely local: prints the cached publication state without contacting
//! the server.

use std::path::PathBuf;

use blogpost_publish::CacheRecord;
use clap::Args;

use super::format_timestamp;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the info command.
#[derive(Args)]
pub(crate) struct InfoArgs {
    /// Document whose cached state should be printed.
    document: PathBuf,
}

impl InfoArgs {
    /// Execute the info command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no cache file.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let record = CacheRecord::load(&self.document)?;

        output.info(&format!("Document: {}", self.document.display()));
        match &record.post_id {
            Some(id) => output.info(&format!("ID: {id}")),
            None => output.info("ID: (never published)"),
        }
        output.info(&format!("Title: {}", record.title));
        output.info(&format!("Kind: {}", record.kind));
        output.info(&format!("Status: {}", record.status));
        output.info(&format!("Created: {}", format_timestamp(record.created_at)));
        output.info(&format!("Updated: {}", format_timestamp(record.updated_at)));
        if let Some(url) = &record.url {
            output.info(&format!("URL: {url}"));
        }
        if let Some(checksum) = &record.checksum {
            output.info(&format!("Checksum: {checksum}"));
        }

        if !record.media.is_empty() {
            output.info(&format!("\nMedia ({}):", record.media.len()));
            for (path, media) in &record.media {
                match &media.url {
                    Some(url) => output.bullet(&format!("{path} -> {url}")),
                    None => output.bullet(&format!("{path} (not uploaded)")),
                }
            }
        }
        Ok(())
    }
}
