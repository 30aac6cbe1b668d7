//! `blogpost list` command implementation.
//!
//! Bypasses the local cache and queries the server directly.

use blogpost_config::Config;
use blogpost_wordpress::WordpressClient;
use clap::Args;

use super::{Globals, format_timestamp};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// List pages rather than posts.
    #[arg(long)]
    page: bool,

    /// Number of entries to list.
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is incomplete or the server call fails.
    pub(crate) fn execute(self, globals: &Globals) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(globals.conf_file.as_deref())?;
        let wordpress = config.require_wordpress()?;
        let client = WordpressClient::new(
            &wordpress.url,
            &wordpress.username,
            &wordpress.password,
            &wordpress.blog_id,
        );

        let entries = if self.page {
            client.get_recent_pages(self.limit)?
        } else {
            client.get_recent_posts(self.limit)?
        };

        if entries.is_empty() {
            output.info("No entries found.");
            return Ok(());
        }

        for entry in entries {
            let date = entry
                .created_at
                .map_or_else(|| "-".to_owned(), format_timestamp);
            let url = entry.permalink.as_deref().unwrap_or("-");
            output.info(&format!("{}: {date}: {}: {url}", entry.id, entry.title));
        }
        Ok(())
    }
}
