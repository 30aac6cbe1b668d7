//! `blogpost delete` command implementation.

use std::path::PathBuf;

use blogpost_config::Config;
use blogpost_publish::{AsciidocConverter, PublishOptions, Publisher};
use blogpost_wordpress::{PostKind, WordpressClient};
use clap::Args;

use super::Globals;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the delete command.
#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Document whose cached post should be deleted.
    document: Option<PathBuf>,

    /// Remote post id override ("." selects the most recent post).
    #[arg(short = 'i', long)]
    post_id: Option<String>,

    /// The target is a page rather than a post.
    #[arg(long, conflicts_with = "post")]
    page: bool,

    /// The target is a post (overrides a cached page kind).
    #[arg(long)]
    post: bool,
}

impl DeleteArgs {
    /// Execute the delete command.
    ///
    /// # Errors
    ///
    /// Returns an error if no target can be resolved or the remote call fails.
    pub(crate) fn execute(self, globals: &Globals) -> Result<(), CliError> {
        let output = Output::new();

        if self.document.is_none() && self.post_id.is_none() {
            return Err(CliError::Validation(
                "delete needs a DOCUMENT argument or --post-id".to_owned(),
            ));
        }

        let config = Config::load(globals.conf_file.as_deref())?;
        let wordpress = config.require_wordpress()?;
        let client = WordpressClient::new(
            &wordpress.url,
            &wordpress.username,
            &wordpress.password,
            &wordpress.blog_id,
        );
        let converter = AsciidocConverter::from_config(&config.asciidoc);

        let options = PublishOptions {
            kind: self.kind(),
            post_id: self.post_id.clone(),
            dry_run: globals.dry_run,
            ..PublishOptions::default()
        };
        let publisher = Publisher::new(&client, converter, options);
        let id = publisher.delete(self.document.as_deref())?;

        if globals.dry_run {
            output.highlight("\n[DRY RUN] No changes made.");
            output.info(&format!("Would delete id {id}."));
        } else {
            output.success(&format!("Deleted id {id}."));
        }
        Ok(())
    }

    fn kind(&self) -> Option<PostKind> {
        if self.page {
            Some(PostKind::Page)
        } else if self.post {
            Some(PostKind::Post)
        } else {
            None
        }
    }
}
