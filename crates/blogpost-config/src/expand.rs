//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error if unset) and `${VAR:-default}` (fall back to
//! `default` if unset). Anything outside a `${...}` reference is copied
//! verbatim.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` is the configuration field path, used in error messages.
///
/// # Errors
///
/// Returns `ConfigError::EnvVar` if a reference without a default names an
/// unset variable, or if a `${` is never closed.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("unclosed ${{ in \"{value}\""),
            });
        };
        let reference = &after[..end];

        let (name, default) = match reference.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (reference, None),
        };

        match std::env::var(name) {
            Ok(v) => result.push_str(&v),
            Err(_) => match default {
                Some(d) => result.push_str(d),
                None => {
                    return Err(ConfigError::EnvVar {
                        field: field.to_owned(),
                        message: format!("${{{name}}} not set"),
                    });
                }
            },
        }

        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_literal() {
        assert_eq!(expand_env("plain text", "f").unwrap(), "plain text");
    }

    #[test]
    fn test_expand_set_variable() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("EXPAND_TEST_VAR", "value");
        }
        assert_eq!(
            expand_env("pre-${EXPAND_TEST_VAR}-post", "f").unwrap(),
            "pre-value-post"
        );
        unsafe {
            std::env::remove_var("EXPAND_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_unset_with_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("EXPAND_TEST_UNSET");
        }
        assert_eq!(
            expand_env("${EXPAND_TEST_UNSET:-fallback}", "f").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_expand_unset_without_default_errors() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("EXPAND_TEST_UNSET");
        }
        let err = expand_env("${EXPAND_TEST_UNSET}", "my.field").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("my.field"));
    }

    #[test]
    fn test_expand_unclosed_reference_errors() {
        let err = expand_env("${OOPS", "f").unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_expand_multiple_references() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("EXPAND_TEST_A", "a");
            std::env::set_var("EXPAND_TEST_B", "b");
        }
        assert_eq!(
            expand_env("${EXPAND_TEST_A}/${EXPAND_TEST_B}", "f").unwrap(),
            "a/b"
        );
        unsafe {
            std::env::remove_var("EXPAND_TEST_A");
            std::env::remove_var("EXPAND_TEST_B");
        }
    }
}
