//! External AsciiDoc-to-HTML conversion.
//!
//! The converter runs as a subprocess with its HTML written to stdout;
//! a non-zero exit is fatal and surfaces the captured stderr.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use blogpost_config::AsciidocConfig;

use crate::error::PublishError;

/// Document structural hint passed to the converter.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Doctype {
    /// Standalone article (the default).
    #[default]
    Article,
    /// Multi-part book.
    Book,
    /// UNIX man page.
    Manpage,
}

impl Doctype {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Manpage => "manpage",
        }
    }
}

/// Invokes the external `asciidoc` command.
#[derive(Clone, Debug)]
pub struct AsciidocConverter {
    command: String,
    backend: String,
}

impl AsciidocConverter {
    /// Create a converter with an explicit command and backend.
    #[must_use]
    pub fn new(command: &str, backend: &str) -> Self {
        Self {
            command: command.to_owned(),
            backend: backend.to_owned(),
        }
    }

    /// Create a converter from the `[asciidoc]` configuration section.
    #[must_use]
    pub fn from_config(config: &AsciidocConfig) -> Self {
        Self::new(&config.command, &config.backend)
    }

    /// Convert a document to HTML, capturing converter stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits non-zero;
    /// the captured stderr is included in the error message.
    pub fn convert(&self, document: &Path, doctype: Doctype) -> Result<String, PublishError> {
        tracing::info!(
            "converting {} (doctype {})",
            document.display(),
            doctype.as_str()
        );

        let output = Command::new(&self.command)
            .args(self.args(doctype, document))
            .output()
            .map_err(|source| PublishError::ConverterSpawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PublishError::Convert {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        // Converter warnings land on stderr even on success
        if !output.stderr.is_empty() {
            tracing::warn!(
                "{}: {}",
                self.command,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Argument list for converting `document`.
    fn args(&self, doctype: Doctype, document: &Path) -> Vec<OsString> {
        vec![
            OsString::from("--no-header-footer"),
            OsString::from("--doctype"),
            OsString::from(doctype.as_str()),
            OsString::from("--backend"),
            OsString::from(self.backend.clone()),
            OsString::from("--out-file"),
            OsString::from("-"),
            document.as_os_str().to_owned(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_doctype_names() {
        assert_eq!(Doctype::Article.as_str(), "article");
        assert_eq!(Doctype::Book.as_str(), "book");
        assert_eq!(Doctype::Manpage.as_str(), "manpage");
        assert_eq!(Doctype::default(), Doctype::Article);
    }

    #[test]
    fn test_argument_construction() {
        let converter = AsciidocConverter::new("asciidoc", "html4");
        let args = converter.args(Doctype::Book, Path::new("doc.txt"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "--no-header-footer",
                "--doctype",
                "book",
                "--backend",
                "html4",
                "--out-file",
                "-",
                "doc.txt",
            ]
        );
    }

    #[test]
    fn test_convert_captures_stdout() {
        // `echo` prints its arguments, standing in for a converter
        let converter = AsciidocConverter::new("echo", "html4");
        let html = converter
            .convert(Path::new("doc.txt"), Doctype::Article)
            .unwrap();
        assert!(html.contains("--no-header-footer"));
        assert!(html.contains("doc.txt"));
    }

    #[test]
    fn test_convert_nonzero_exit_is_fatal() {
        let converter = AsciidocConverter::new("false", "html4");
        let err = converter
            .convert(Path::new("doc.txt"), Doctype::Article)
            .unwrap_err();
        assert!(matches!(err, PublishError::Convert { .. }));
    }

    #[test]
    fn test_convert_missing_command_errors() {
        let converter = AsciidocConverter::new("/nonexistent/asciidoc-missing", "html4");
        let err = converter
            .convert(Path::new("doc.txt"), Doctype::Article)
            .unwrap_err();
        assert!(matches!(err, PublishError::ConverterSpawn { .. }));
    }
}
