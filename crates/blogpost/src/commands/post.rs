//! `blogpost create` / `blogpost update` command implementation.
//!
//! The two commands share every option; they differ only in the cache
//! guard the publisher applies.

use std::fmt;
use std::path::PathBuf;

use blogpost_config::Config;
use blogpost_publish::{
    AsciidocConverter, Doctype, PublishOptions, PublishOutcome, Publisher, Status,
};
use blogpost_wordpress::{PostKind, WordpressClient};
use clap::{Args, ValueEnum};

use super::Globals;
use crate::error::CliError;
use crate::output::Output;

/// Which publish guard to apply.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Mode {
    Create,
    Update,
}

/// Arguments shared by the create and update commands.
#[derive(Args)]
pub(crate) struct PostArgs {
    /// Path to the AsciiDoc (or HTML) document.
    document: PathBuf,

    /// Post title (default: first content line of the document).
    #[arg(short, long)]
    title: Option<String>,

    /// DOCUMENT is an HTML file, not AsciiDoc.
    #[arg(long)]
    html: bool,

    /// Set the post status to published.
    #[arg(short, long, conflicts_with = "unpublish")]
    publish: bool,

    /// Set the post status to unpublished (draft).
    #[arg(short = 'U', long)]
    unpublish: bool,

    /// Publish as a page rather than a post.
    #[arg(long, conflicts_with = "post")]
    page: bool,

    /// Publish as a post (overrides a cached page kind).
    #[arg(long)]
    post: bool,

    /// AsciiDoc doctype.
    #[arg(short = 'd', long, value_enum, default_value_t = DoctypeArg::Article)]
    doctype: DoctypeArg,

    /// Upload referenced media files (the default for AsciiDoc input).
    #[arg(long, conflicts_with = "no_media")]
    media: bool,

    /// Do not upload referenced media files.
    #[arg(long)]
    no_media: bool,

    /// Remote post id override ("." selects the most recent post).
    #[arg(short = 'i', long)]
    post_id: Option<String>,
}

/// `--doctype` values.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum DoctypeArg {
    Article,
    Book,
    Manpage,
}

impl DoctypeArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Manpage => "manpage",
        }
    }
}

impl fmt::Display for DoctypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DoctypeArg> for Doctype {
    fn from(arg: DoctypeArg) -> Self {
        match arg {
            DoctypeArg::Article => Self::Article,
            DoctypeArg::Book => Self::Book,
            DoctypeArg::Manpage => Self::Manpage,
        }
    }
}

impl PostArgs {
    /// Execute the create or update command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, conversion or the remote call fails.
    pub(crate) fn execute(self, globals: &Globals, mode: Mode) -> Result<(), CliError> {
        let output = Output::new();

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
            title: self.title.clone(),
            status: self.status(),
            html_input: self.html,
            doctype: self.doctype.into(),
            media: self.media_toggle(),
            post_id: self.post_id.clone(),
            dry_run: globals.dry_run,
        };
        let publisher = Publisher::new(&client, converter, options);

        output.info(&format!("Publishing {}...", self.document.display()));
        let outcome = match mode {
            Mode::Create => publisher.create(&self.document)?,
            Mode::Update => publisher.update(&self.document)?,
        };

        print_outcome(&output, &outcome, globals.dry_run);
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

    fn status(&self) -> Option<Status> {
        if self.publish {
            Some(Status::Published)
        } else if self.unpublish {
            Some(Status::Unpublished)
        } else {
            None
        }
    }

    fn media_toggle(&self) -> Option<bool> {
        if self.media {
            Some(true)
        } else if self.no_media {
            Some(false)
        } else {
            None
        }
    }
}

fn print_outcome(output: &Output, outcome: &PublishOutcome, dry_run: bool) {
    if outcome.unchanged {
        output.info("Document unchanged since last publish.");
    }

    if dry_run {
        output.highlight("\n[DRY RUN] No changes made.");
        output.info(&format!(
            "Would {} this {} with status {}.",
            if outcome.created { "create" } else { "update" },
            outcome.kind,
            outcome.status
        ));
    } else {
        let kind = match outcome.kind {
            PostKind::Post => "Post",
            PostKind::Page => "Page",
        };
        let verb = if outcome.created { "created" } else { "updated" };
        output.success(&format!("\n{kind} {verb} successfully!"));
    }

    if let Some(id) = &outcome.post_id {
        output.info(&format!("ID: {id}"));
    }
    if let Some(url) = &outcome.url {
        output.info(&format!("URL: {url}"));
    }
    output.info(&format!("Status: {}", outcome.status));
    if outcome.media_uploaded > 0 {
        output.info(&format!("Media uploaded: {}", outcome.media_uploaded));
    }

    if !outcome.warnings.is_empty() {
        output.warning(&format!(
            "\nWarning: {} media reference(s) could not be processed:",
            outcome.warnings.len()
        ));
        for warning in &outcome.warnings {
            output.bullet(warning);
        }
    }
}
