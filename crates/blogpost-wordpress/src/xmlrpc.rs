//! Minimal XML-RPC codec for the WordPress API.
//!
//! Requests are hand-built strings (the value model is small); responses are
//! parsed with quick-xml events. Only the value kinds WordPress actually
//! sends are covered: string, int/i4, boolean, double, base64,
//! dateTime.iso8601, struct and array. `<fault>` responses surface as
//! [`WordpressError::Fault`].

use std::collections::BTreeMap;
use std::fmt::Write;
use std::io::BufRead;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::WordpressError;

/// An XML-RPC value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<int>` / `<i4>`.
    Int(i64),
    /// `<boolean>` (wire encoding `0` / `1`).
    Bool(bool),
    /// `<double>`.
    Double(f64),
    /// `<string>`, or a bare `<value>` with no type element.
    String(String),
    /// Raw `<dateTime.iso8601>` text; parsed by the typed layer.
    DateTime(String),
    /// `<base64>`, decoded.
    Base64(Vec<u8>),
    /// `<array>`.
    Array(Vec<Value>),
    /// `<struct>`.
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// Borrow the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content; numeric strings are accepted (servers are sloppy
    /// about whether ids are ints or strings).
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Look up a struct member.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(members) => members.get(name),
            _ => None,
        }
    }

    fn encode_into(&self, out: &mut String) {
        match self {
            Self::Int(i) => {
                let _ = write!(out, "<int>{i}</int>");
            }
            Self::Bool(b) => {
                let _ = write!(out, "<boolean>{}</boolean>", i32::from(*b));
            }
            Self::Double(d) => {
                let _ = write!(out, "<double>{d}</double>");
            }
            Self::String(s) => {
                let _ = write!(out, "<string>{}</string>", escape_xml(s));
            }
            Self::DateTime(s) => {
                let _ = write!(out, "<dateTime.iso8601>{}</dateTime.iso8601>", escape_xml(s));
            }
            Self::Base64(data) => {
                out.push_str("<base64>");
                out.push_str(&BASE64_STANDARD.encode(data));
                out.push_str("</base64>");
            }
            Self::Array(items) => {
                out.push_str("<array><data>");
                for item in items {
                    out.push_str("<value>");
                    item.encode_into(out);
                    out.push_str("</value>");
                }
                out.push_str("</data></array>");
            }
            Self::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    let _ = write!(out, "<member><name>{}</name><value>", escape_xml(name));
                    value.encode_into(out);
                    out.push_str("</value></member>");
                }
                out.push_str("</struct>");
            }
        }
    }
}

/// Build a complete `<methodCall>` document.
#[must_use]
pub fn build_request(method: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(256);
    out.push_str(r#"<?xml version="1.0"?>"#);
    let _ = write!(
        out,
        "<methodCall><methodName>{}</methodName><params>",
        escape_xml(method)
    );
    for param in params {
        out.push_str("<param><value>");
        param.encode_into(&mut out);
        out.push_str("</value></param>");
    }
    out.push_str("</params></methodCall>");
    out
}

/// Parse a `<methodResponse>` document into its single return value.
///
/// # Errors
///
/// Returns [`WordpressError::Fault`] for `<fault>` responses, and parse
/// errors for documents that are not well-formed XML-RPC.
pub fn parse_response(xml: &str) -> Result<Value, WordpressError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut in_fault = false;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"fault" => in_fault = true,
                b"value" => {
                    let value = parse_value(&mut reader)?;
                    if in_fault {
                        return Err(fault_error(&value));
                    }
                    return Ok(value);
                }
                _ => {}
            },
            Event::Eof => {
                return Err(WordpressError::InvalidResponse(
                    "response contains no value".to_owned(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Parse one value; the reader is positioned just past the `<value>` start
/// tag, and is consumed through the matching `</value>`.
fn parse_value<R: BufRead>(reader: &mut Reader<R>) -> Result<Value, WordpressError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut typed: Option<Value> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"string" => {
                    typed = Some(Value::String(read_text(reader, b"string")?));
                }
                name @ (b"int" | b"i4") => {
                    let raw = read_text(reader, name)?;
                    let parsed = raw.trim().parse().map_err(|_| {
                        WordpressError::InvalidResponse(format!("invalid int value: {raw}"))
                    })?;
                    typed = Some(Value::Int(parsed));
                }
                b"boolean" => {
                    let raw = read_text(reader, b"boolean")?;
                    typed = Some(Value::Bool(raw.trim() == "1"));
                }
                b"double" => {
                    let raw = read_text(reader, b"double")?;
                    let parsed = raw.trim().parse().map_err(|_| {
                        WordpressError::InvalidResponse(format!("invalid double value: {raw}"))
                    })?;
                    typed = Some(Value::Double(parsed));
                }
                b"base64" => {
                    let raw = read_text(reader, b"base64")?;
                    let decoded = BASE64_STANDARD
                        .decode(raw.trim().as_bytes())
                        .map_err(|e| {
                            WordpressError::InvalidResponse(format!("invalid base64 value: {e}"))
                        })?;
                    typed = Some(Value::Base64(decoded));
                }
                b"dateTime.iso8601" => {
                    typed = Some(Value::DateTime(read_text(reader, b"dateTime.iso8601")?));
                }
                b"struct" => {
                    typed = Some(parse_struct(reader)?);
                }
                b"array" => {
                    typed = Some(parse_array(reader)?);
                }
                other => {
                    return Err(WordpressError::InvalidResponse(format!(
                        "unexpected element <{}> in value",
                        String::from_utf8_lossy(other)
                    )));
                }
            },
            Event::Empty(e) => {
                // <string/> and <nil/> both read as the empty string
                if matches!(e.name().as_ref(), b"string" | b"nil") {
                    typed = Some(Value::String(String::new()));
                }
            }
            Event::Text(e) => {
                text.push_str(&reader.decoder().decode(&e)?);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::End(e) if e.name().as_ref() == b"value" => {
                return Ok(typed.unwrap_or(Value::String(text)));
            }
            Event::Eof => {
                return Err(WordpressError::InvalidResponse(
                    "unterminated value".to_owned(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Parse `<struct>` members; the start tag has already been consumed.
fn parse_struct<R: BufRead>(reader: &mut Reader<R>) -> Result<Value, WordpressError> {
    let mut buf = Vec::new();
    let mut members = BTreeMap::new();
    let mut name: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"name" => name = Some(read_text(reader, b"name")?),
                b"value" => {
                    let value = parse_value(reader)?;
                    let Some(member) = name.take() else {
                        return Err(WordpressError::InvalidResponse(
                            "struct value without a name".to_owned(),
                        ));
                    };
                    members.insert(member, value);
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"struct" => {
                return Ok(Value::Struct(members));
            }
            Event::Eof => {
                return Err(WordpressError::InvalidResponse(
                    "unterminated struct".to_owned(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Parse `<array>` items; the start tag has already been consumed.
fn parse_array<R: BufRead>(reader: &mut Reader<R>) -> Result<Value, WordpressError> {
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"value" => {
                items.push(parse_value(reader)?);
            }
            Event::End(e) if e.name().as_ref() == b"array" => {
                return Ok(Value::Array(items));
            }
            Event::Eof => {
                return Err(WordpressError::InvalidResponse(
                    "unterminated array".to_owned(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Accumulate text until the matching end tag.
fn read_text<R: BufRead>(reader: &mut Reader<R>, end: &[u8]) -> Result<String, WordpressError> {
    let mut buf = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(e) => {
                text.push_str(&reader.decoder().decode(&e)?);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                text.push_str(&decode_entity(&entity));
            }
            Event::CData(e) => {
                text.push_str(&String::from_utf8_lossy(&e));
            }
            Event::End(e) if e.name().as_ref() == end => {
                return Ok(text);
            }
            Event::Eof => {
                return Err(WordpressError::InvalidResponse(format!(
                    "unterminated <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Turn a parsed `<fault>` struct into an error.
fn fault_error(value: &Value) -> WordpressError {
    let code = value
        .get("faultCode")
        .and_then(Value::as_int)
        .unwrap_or_default();
    let message = value
        .get("faultString")
        .and_then(Value::as_str)
        .unwrap_or("unknown fault")
        .to_owned();
    WordpressError::Fault { code, message }
}

/// Escape XML special characters in text content.
fn escape_xml(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        // Numeric character references
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_request_single_string() {
        let request = build_request("metaWeblog.getPost", &[Value::String("42".to_owned())]);
        assert_eq!(
            request,
            r#"<?xml version="1.0"?><methodCall><methodName>metaWeblog.getPost</methodName><params><param><value><string>42</string></value></param></params></methodCall>"#
        );
    }

    #[test]
    fn test_build_request_escapes_text() {
        let request = build_request("demo", &[Value::String("a < b & c".to_owned())]);
        assert!(request.contains("<string>a &lt; b &amp; c</string>"));
    }

    #[test]
    fn test_build_request_struct_and_bool() {
        let mut members = BTreeMap::new();
        members.insert("title".to_owned(), Value::String("Hello".to_owned()));
        let request = build_request("metaWeblog.newPost", &[Value::Struct(members), Value::Bool(true)]);
        assert!(
            request.contains("<member><name>title</name><value><string>Hello</string></value></member>")
        );
        assert!(request.contains("<boolean>1</boolean>"));
    }

    #[test]
    fn test_build_request_base64() {
        let request = build_request("demo", &[Value::Base64(b"hi".to_vec())]);
        assert!(request.contains("<base64>aGk=</base64>"));
    }

    #[test]
    fn test_parse_string_response() {
        let xml = r"<?xml version='1.0'?>
<methodResponse><params><param><value><string>123</string></value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::String("123".to_owned()));
    }

    #[test]
    fn test_parse_bare_value_is_string() {
        let xml = "<methodResponse><params><param><value>123</value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::String("123".to_owned()));
    }

    #[test]
    fn test_parse_int_response() {
        let xml = "<methodResponse><params><param><value><i4>7</i4></value></param></params></methodResponse>";
        assert_eq!(parse_response(xml).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_parse_struct_response() {
        let xml = r"<methodResponse><params><param><value><struct>
            <member><name>postid</name><value><string>42</string></value></member>
            <member><name>title</name><value><string>Hello</string></value></member>
        </struct></value></param></params></methodResponse>";
        let value = parse_response(xml).unwrap();
        assert_eq!(value.get("postid").unwrap().as_str(), Some("42"));
        assert_eq!(value.get("title").unwrap().as_str(), Some("Hello"));
    }

    #[test]
    fn test_parse_array_of_structs() {
        let xml = r"<methodResponse><params><param><value><array><data>
            <value><struct><member><name>postid</name><value><int>1</int></value></member></struct></value>
            <value><struct><member><name>postid</name><value><int>2</int></value></member></struct></value>
        </data></array></value></param></params></methodResponse>";
        let value = parse_response(xml).unwrap();
        let Value::Array(items) = value else {
            panic!("expected array, got {value:?}");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("postid").unwrap().as_int(), Some(2));
    }

    #[test]
    fn test_parse_datetime_is_raw_text() {
        let xml = "<methodResponse><params><param><value><dateTime.iso8601>20080101T10:00:00</dateTime.iso8601></value></param></params></methodResponse>";
        assert_eq!(
            parse_response(xml).unwrap(),
            Value::DateTime("20080101T10:00:00".to_owned())
        );
    }

    #[test]
    fn test_parse_entities_in_text() {
        let xml = "<methodResponse><params><param><value><string>a &amp; b &lt;c&gt;</string></value></param></params></methodResponse>";
        assert_eq!(
            parse_response(xml).unwrap(),
            Value::String("a & b <c>".to_owned())
        );
    }

    #[test]
    fn test_parse_fault_response() {
        let xml = r"<methodResponse><fault><value><struct>
            <member><name>faultCode</name><value><int>403</int></value></member>
            <member><name>faultString</name><value><string>Incorrect username or password.</string></value></member>
        </struct></value></fault></methodResponse>";
        let err = parse_response(xml).unwrap_err();
        let WordpressError::Fault { code, message } = err else {
            panic!("expected fault, got {err:?}");
        };
        assert_eq!(code, 403);
        assert_eq!(message, "Incorrect username or password.");
    }

    #[test]
    fn test_parse_empty_document_errors() {
        let err = parse_response("<methodResponse></methodResponse>").unwrap_err();
        assert!(matches!(err, WordpressError::InvalidResponse(_)));
    }

    #[test]
    fn test_roundtrip_struct() {
        let mut members = BTreeMap::new();
        members.insert("name".to_owned(), Value::String("img.png".to_owned()));
        members.insert("bits".to_owned(), Value::Base64(vec![1, 2, 3]));
        let original = Value::Struct(members);

        let mut encoded = String::from("<methodResponse><params><param><value>");
        original.encode_into(&mut encoded);
        encoded.push_str("</value></param></params></methodResponse>");

        assert_eq!(parse_response(&encoded).unwrap(), original);
    }

    #[test]
    fn test_as_int_accepts_numeric_strings() {
        assert_eq!(Value::String("42".to_owned()).as_int(), Some(42));
        assert_eq!(Value::String("nope".to_owned()).as_int(), None);
        assert_eq!(Value::Int(7).as_int(), Some(7));
    }
}
