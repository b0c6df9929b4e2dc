//! Build-time configuration gate.

use thiserror::Error;

/// Environment namespace for all configuration keys.
pub const ENV_PREFIX: &str = "FNTRACE_";
/// Key enabling the transform for a compilation unit.
pub const KEY_ENABLED: &str = "ENABLED";
/// Key selecting a tracing filter for expansion diagnostics.
pub const KEY_LOG: &str = "LOG";

/// Configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown configuration key `{0}` (expected FNTRACE_ENABLED or FNTRACE_LOG)")]
    UnknownKey(String),
}

/// Per-compilation-unit instrumentation gate. Default: disabled.
///
/// Read fresh on every macro invocation; different compilation units of
/// the same build may set it independently, so the gate is never cached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gate {
    enabled: bool,
    log_filter: Option<String>,
}

impl Gate {
    /// Create a gate with an explicit enabled flag.
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            log_filter: None,
        }
    }

    /// Whether the instrumenter should run.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Expansion-diagnostics filter, if configured.
    pub fn log_filter(&self) -> Option<&str> {
        self.log_filter.as_deref()
    }

    /// Parse from key/value pairs. Keys outside the `FNTRACE_` namespace
    /// are ignored; namespaced keys other than the known set are a hard
    /// error. The enabled value follows string-boolean convention: only
    /// `"true"` (any ASCII case) enables.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut gate = Self::default();
        for (key, value) in pairs {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                KEY_ENABLED => gate.enabled = value.trim().eq_ignore_ascii_case("true"),
                KEY_LOG => gate.log_filter = Some(value),
                _ => return Err(ConfigError::UnknownKey(key)),
            }
        }
        Ok(gate)
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_pairs(std::env::vars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_disabled() {
        let gate = Gate::from_pairs(pairs(&[])).unwrap();
        assert!(!gate.is_enabled());
    }

    #[test]
    fn test_enabled_true() {
        let gate = Gate::from_pairs(pairs(&[("FNTRACE_ENABLED", "true")])).unwrap();
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_enabled_ignores_ascii_case() {
        let gate = Gate::from_pairs(pairs(&[("FNTRACE_ENABLED", "True")])).unwrap();
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_non_true_is_false() {
        for value in ["false", "1", "yes", "", "enabled"] {
            let gate = Gate::from_pairs(pairs(&[("FNTRACE_ENABLED", value)])).unwrap();
            assert!(!gate.is_enabled(), "value {value:?} should disable");
        }
    }

    #[test]
    fn test_unknown_key_is_hard_error() {
        let err = Gate::from_pairs(pairs(&[("FNTRACE_ENABLE", "true")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownKey("FNTRACE_ENABLE".to_string()));
    }

    #[test]
    fn test_foreign_keys_ignored() {
        let gate = Gate::from_pairs(pairs(&[("PATH", "/usr/bin"), ("FNTRACE_ENABLED", "true")]))
            .unwrap();
        assert!(gate.is_enabled());
    }

    #[test]
    fn test_log_filter_passthrough() {
        let gate = Gate::from_pairs(pairs(&[("FNTRACE_LOG", "debug")])).unwrap();
        assert_eq!(gate.log_filter(), Some("debug"));
        assert!(!gate.is_enabled());
    }
}
