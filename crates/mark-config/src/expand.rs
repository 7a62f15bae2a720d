//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a string.
///
/// Values without `${` are returned unchanged, bare `$` included. An unset
/// variable without a default is an error naming the config field.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, MissingVar> {
        std::env::var(var).map(Some).map_err(|_| MissingVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

struct MissingVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MARK_EXPAND_USER", "alice");
        }
        let result = expand_env("${MARK_EXPAND_USER}", "confluence.username").unwrap();
        assert_eq!(result, "alice");
        unsafe {
            std::env::remove_var("MARK_EXPAND_USER");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MARK_EXPAND_UNSET");
        }
        let result = expand_env("${MARK_EXPAND_UNSET:-bob}", "confluence.username").unwrap();
        assert_eq!(result, "bob");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MARK_EXPAND_MISSING");
        }
        let err = expand_env("${MARK_EXPAND_MISSING}", "confluence.password").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MARK_EXPAND_MISSING"));
        assert!(err.to_string().contains("confluence.password"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MARK_EXPAND_HOST", "wiki.example.com");
        }
        let result = expand_env("https://${MARK_EXPAND_HOST}/confluence", "url").unwrap();
        assert_eq!(result, "https://wiki.example.com/confluence");
        unsafe {
            std::env::remove_var("MARK_EXPAND_HOST");
        }
    }

    #[test]
    fn test_bare_dollar_untouched() {
        let result = expand_env("pa$$word", "confluence.password").unwrap();
        assert_eq!(result, "pa$$word");
    }
}
