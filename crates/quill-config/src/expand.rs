//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key in errors. Bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Variable that is referenced but not set.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_TEST_EXPAND_SET", "https://wiki.example.com");
        }
        let result = expand_env("${QUILL_TEST_EXPAND_SET}/xwiki", "wiki.base_url").unwrap();
        assert_eq!(result, "https://wiki.example.com/xwiki");
        unsafe {
            std::env::remove_var("QUILL_TEST_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_TEST_EXPAND_UNSET");
        }
        let result = expand_env("${QUILL_TEST_EXPAND_UNSET:-/wiki}", "wiki.base_url").unwrap();
        assert_eq!(result, "/wiki");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${QUILL_TEST_EXPAND_MISSING}", "wiki.base_url").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("QUILL_TEST_EXPAND_MISSING"));
        assert!(err.to_string().contains("wiki.base_url"));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("$HOME/x", "field").unwrap(), "$HOME/x");
    }
}
