//! `blogpost reset` command implementation.
//!
//! Purely local: drops the cache record so the document reads as never
//! published. The remote resource, if any, is left alone.

use std::path::PathBuf;

use blogpost_publish::{CacheRecord, PublishError, cache_path};
use clap::Args;

use super::Globals;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the reset command.
#[derive(Args)]
pub(crate) struct ResetArgs {
    /// Document whose cache record should be removed.
    document: PathBuf,
}

impl ResetArgs {
    /// Execute the reset command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no cache file.
    pub(crate) fn execute(self, globals: &Globals) -> Result<(), CliError> {
        let output = Output::new();
        let path = cache_path(&self.document);

        if globals.dry_run {
            if !path.exists() {
                return Err(PublishError::MissingCache(path).into());
            }
            output.highlight("\n[DRY RUN] No changes made.");
            output.info(&format!("Would remove cache file {}.", path.display()));
            return Ok(());
        }

        CacheRecord::remove(&self.document)?;
        output.success(&format!("Removed cache file {}.", path.display()));
        Ok(())
    }
}
