//! CLI command implementations.

pub(crate) mod delete;
pub(crate) mod info;
pub(crate) mod list;
pub(crate) mod post;
pub(crate) mod reset;

use std::path::PathBuf;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub(crate) use delete::DeleteArgs;
pub(crate) use info::InfoArgs;
pub(crate) use list::ListArgs;
pub(crate) use post::{Mode, PostArgs};
pub(crate) use reset::ResetArgs;

/// Options shared by every command.
pub(crate) struct Globals {
    /// Explicit configuration file path.
    pub(crate) conf_file: Option<PathBuf>,
    /// Compute everything, mutate nothing remote or on disk.
    pub(crate) dry_run: bool,
}

/// Timestamp layout for terminal output.
static TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Render an epoch timestamp as UTC `YYYY-MM-DD HH:MM`.
pub(crate) fn format_timestamp(seconds: i64) -> String {
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .and_then(|dt| dt.format(TIMESTAMP_FORMAT).ok())
        .unwrap_or_else(|| seconds.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_timestamp() {
        // 2008-01-01T10:00:00Z
        assert_eq!(format_timestamp(1_199_181_600), "2008-01-01 10:00");
    }

    #[test]
    fn test_format_timestamp_out_of_range_falls_back() {
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }
}
