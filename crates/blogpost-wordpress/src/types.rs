//! WordPress wire types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;
use time::macros::format_description;

use crate::error::WordpressError;
use crate::xmlrpc::Value;

/// XML-RPC `dateTime.iso8601` layout, e.g. `20080101T10:00:00`.
static ISO8601_BASIC: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour]:[minute]:[second]");

/// The two remote resource kinds with identical operations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// A chronological blog post (metaWeblog.* methods).
    #[default]
    Post,
    /// A non-chronological page (wp.* methods).
    Page,
}

impl PostKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post or page as returned by the server.
#[derive(Clone, Debug, Default)]
pub struct RemotePost {
    /// Server-assigned id.
    pub id: String,
    /// Title.
    pub title: String,
    /// HTML body.
    pub description: String,
    /// Public URL, when the server reports one.
    pub permalink: Option<String>,
    /// Creation time, seconds since epoch UTC.
    pub created_at: Option<i64>,
}

impl RemotePost {
    /// Build from a response struct.
    ///
    /// metaWeblog posts carry `postid`, wp pages `page_id`; ids may come
    /// back as ints or strings.
    pub(crate) fn from_value(value: &Value) -> Result<Self, WordpressError> {
        let id = ["postid", "post_id", "page_id"]
            .iter()
            .find_map(|key| value.get(key))
            .and_then(id_string)
            .ok_or_else(|| {
                WordpressError::InvalidResponse("post struct has no id member".to_owned())
            })?;

        let title = member_str(value, "title");
        let description = member_str(value, "description");
        let permalink = ["permaLink", "link"]
            .iter()
            .find_map(|key| value.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned);
        let created_at = ["date_created_gmt", "dateCreated"]
            .iter()
            .find_map(|key| value.get(key))
            .and_then(|v| match v {
                Value::DateTime(raw) => parse_datetime(raw),
                _ => None,
            });

        Ok(Self {
            id,
            title,
            description,
            permalink,
            created_at,
        })
    }
}

/// Fields submitted on create/edit.
#[derive(Clone, Debug, Default)]
pub struct PostContent {
    /// Post title.
    pub title: String,
    /// HTML body.
    pub description: String,
}

impl PostContent {
    pub(crate) fn to_value(&self) -> Value {
        let mut members = BTreeMap::new();
        members.insert("title".to_owned(), Value::String(self.title.clone()));
        members.insert(
            "description".to_owned(),
            Value::String(self.description.clone()),
        );
        Value::Struct(members)
    }
}

/// Stringify an id value (servers send both ints and strings).
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

fn member_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Parse the XML-RPC basic ISO-8601 layout, assuming UTC.
fn parse_datetime(raw: &str) -> Option<i64> {
    PrimitiveDateTime::parse(raw.trim(), ISO8601_BASIC)
        .ok()
        .map(|dt| dt.assume_utc().unix_timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post_struct(entries: &[(&str, Value)]) -> Value {
        let mut members = BTreeMap::new();
        for (key, value) in entries {
            members.insert((*key).to_owned(), value.clone());
        }
        Value::Struct(members)
    }

    #[test]
    fn test_from_value_string_id() {
        let value = post_struct(&[
            ("postid", Value::String("42".to_owned())),
            ("title", Value::String("Hello".to_owned())),
            ("permaLink", Value::String("https://blog/?p=42".to_owned())),
        ]);
        let post = RemotePost::from_value(&value).unwrap();
        assert_eq!(post.id, "42");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.permalink.as_deref(), Some("https://blog/?p=42"));
    }

    #[test]
    fn test_from_value_int_page_id() {
        let value = post_struct(&[("page_id", Value::Int(7))]);
        let post = RemotePost::from_value(&value).unwrap();
        assert_eq!(post.id, "7");
        assert_eq!(post.title, "");
        assert_eq!(post.permalink, None);
    }

    #[test]
    fn test_from_value_missing_id_errors() {
        let value = post_struct(&[("title", Value::String("No id".to_owned()))]);
        let err = RemotePost::from_value(&value).unwrap_err();
        assert!(matches!(err, WordpressError::InvalidResponse(_)));
    }

    #[test]
    fn test_from_value_parses_creation_date() {
        let value = post_struct(&[
            ("postid", Value::Int(1)),
            (
                "dateCreated",
                Value::DateTime("20080101T10:00:00".to_owned()),
            ),
        ]);
        let post = RemotePost::from_value(&value).unwrap();
        // 2008-01-01T10:00:00Z
        assert_eq!(post.created_at, Some(1_199_181_600));
    }

    #[test]
    fn test_from_value_prefers_gmt_date() {
        let value = post_struct(&[
            ("postid", Value::Int(1)),
            (
                "dateCreated",
                Value::DateTime("20080101T12:00:00".to_owned()),
            ),
            (
                "date_created_gmt",
                Value::DateTime("20080101T10:00:00".to_owned()),
            ),
        ]);
        let post = RemotePost::from_value(&value).unwrap();
        assert_eq!(post.created_at, Some(1_199_181_600));
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn test_post_content_to_value() {
        let content = PostContent {
            title: "T".to_owned(),
            description: "<p>body</p>".to_owned(),
        };
        let value = content.to_value();
        assert_eq!(value.get("title").unwrap().as_str(), Some("T"));
        assert_eq!(value.get("description").unwrap().as_str(), Some("<p>body</p>"));
    }

    #[test]
    fn test_post_kind_serde_names() {
        assert_eq!(serde_json::to_string(&PostKind::Page).unwrap(), r#""page""#);
    }
}
