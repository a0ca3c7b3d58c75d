// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flag/environment/default resolution for the launcher shims.
//!
//! Every shim resolves its settings the same way: an explicit command-line
//! flag wins, then the matching environment variable, then the built-in
//! default. This crate centralizes that cascade plus the `KEY=VALUE`
//! parsing used by `--env` options and the environment-overlay builder
//! merged into a launch specification.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::collections::BTreeMap;

/// Errors from resolving or parsing configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that failed to parse.
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name.
        key: String,
        /// The offending value.
        value: String,
        /// Why it failed to parse.
        reason: String,
    },

    /// A `KEY=VALUE` pair was malformed.
    #[error("invalid KEY=VALUE pair: {0:?}")]
    BadPair(String),
}

/// Resolve a string setting: flag first, then the environment variable.
pub fn flag_env(flag: Option<String>, env_key: &str) -> Option<String> {
    flag.or_else(|| std::env::var(env_key).ok().filter(|v| !v.is_empty()))
}

/// Resolve a string setting with a final default.
pub fn flag_env_or(flag: Option<String>, env_key: &str, default: &str) -> String {
    flag_env(flag, env_key).unwrap_or_else(|| default.to_string())
}

/// Resolve a numeric setting (ports, limits) with a final default.
///
/// A flag value bypasses the environment entirely; an environment value
/// that fails to parse is a hard error rather than a silent fallback.
pub fn flag_env_or_parse<T>(flag: Option<T>, env_key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = flag {
        return Ok(value);
    }
    match std::env::var(env_key) {
        Ok(raw) if !raw.is_empty() => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: env_key.to_string(),
            value: raw,
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

/// Returns `true` if the environment variable is set to `"true"` or `"1"`.
pub fn env_truthy(env_key: &str) -> bool {
    matches!(
        std::env::var(env_key).as_deref(),
        Ok("true") | Ok("1")
    )
}

/// Split a `KEY=VALUE` argument into its parts.
///
/// The value may itself contain `=`; only the first one splits. An empty
/// key is rejected.
pub fn parse_key_value(pair: &str) -> Result<(String, String), ConfigError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ConfigError::BadPair(pair.to_string())),
    }
}

/// Ordered builder for the environment overlay applied to a launch spec.
#[derive(Debug, Clone, Default)]
pub struct EnvOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable unconditionally.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Set a variable only when the value is present.
    #[must_use]
    pub fn set_opt(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.vars.insert(key.into(), value.into());
        }
        self
    }

    /// Consume the builder, yielding the overlay map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.vars
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // `std::env::set_var` is unsafe in edition 2024
mod tests {
    use super::*;

    // Env-var names are unique per test: the process environment is shared
    // across the test harness's threads.

    #[test]
    fn flag_wins_over_env() {
        unsafe { std::env::set_var("MLP_CFG_T1", "from-env") };
        let got = flag_env(Some("from-flag".into()), "MLP_CFG_T1");
        assert_eq!(got.as_deref(), Some("from-flag"));
    }

    #[test]
    fn env_wins_over_default() {
        unsafe { std::env::set_var("MLP_CFG_T2", "from-env") };
        assert_eq!(flag_env_or(None, "MLP_CFG_T2", "fallback"), "from-env");
    }

    #[test]
    fn default_when_unset() {
        assert_eq!(flag_env_or(None, "MLP_CFG_T3_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn empty_env_value_is_ignored() {
        unsafe { std::env::set_var("MLP_CFG_T4", "") };
        assert_eq!(flag_env(None, "MLP_CFG_T4"), None);
    }

    #[test]
    fn numeric_env_parses() {
        unsafe { std::env::set_var("MLP_CFG_T5", "13080") };
        let port: u16 = flag_env_or_parse(None, "MLP_CFG_T5", 8080).unwrap();
        assert_eq!(port, 13080);
    }

    #[test]
    fn numeric_flag_bypasses_env() {
        unsafe { std::env::set_var("MLP_CFG_T6", "not-a-number") };
        let port: u16 = flag_env_or_parse(Some(9000), "MLP_CFG_T6", 8080).unwrap();
        assert_eq!(port, 9000);
    }

    #[test]
    fn numeric_env_garbage_is_an_error() {
        unsafe { std::env::set_var("MLP_CFG_T7", "eighty") };
        let err = flag_env_or_parse::<u16>(None, "MLP_CFG_T7", 8080).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("MLP_CFG_T7"));
    }

    #[test]
    fn truthy_values() {
        unsafe { std::env::set_var("MLP_CFG_T8", "true") };
        unsafe { std::env::set_var("MLP_CFG_T9", "1") };
        unsafe { std::env::set_var("MLP_CFG_T10", "yes") };
        assert!(env_truthy("MLP_CFG_T8"));
        assert!(env_truthy("MLP_CFG_T9"));
        assert!(!env_truthy("MLP_CFG_T10"));
        assert!(!env_truthy("MLP_CFG_T11_UNSET"));
    }

    #[test]
    fn key_value_splits_on_first_equals() {
        let (k, v) = parse_key_value("TOKEN=abc=def").unwrap();
        assert_eq!(k, "TOKEN");
        assert_eq!(v, "abc=def");
    }

    #[test]
    fn key_value_rejects_missing_equals_and_empty_key() {
        assert!(parse_key_value("TOKEN").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn overlay_set_and_set_opt() {
        let map = EnvOverlay::new()
            .set("A", "1")
            .set_opt("B", Some("2"))
            .set_opt("C", None::<String>)
            .into_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["A"], "1");
        assert_eq!(map["B"], "2");
    }
}
