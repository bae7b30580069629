//! Engine runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the engine. The core
//! never reads process-wide environment variables itself; the helpers below take the raw
//! `Option<String>` a binary fetched so they can be tested without touching the environment.

use crate::{CalcError, CalcResult};

/// Policy version stamped on audit records when none is configured.
pub const DEFAULT_POLICY_VERSION: &str = "1.0.0";

/// How the QTc calculator treats a formula name it does not recognise.
///
/// Only free-text options follow this policy. Typed enum fields such as `unit` and `gender`
/// are checked during deserialisation and an unknown value is always
/// [`CalcError::UnsupportedOption`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionPolicy {
    /// Substitute Bazett and report a warning in the result.
    #[default]
    Lenient,
    /// Reject the call with [`CalcError::UnsupportedOption`].
    Strict,
}

/// Engine configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    audit_enabled: bool,
    policy_version: String,
    option_policy: OptionPolicy,
}

impl EngineConfig {
    /// Create a new `EngineConfig`.
    pub fn new(
        audit_enabled: bool,
        policy_version: String,
        option_policy: OptionPolicy,
    ) -> CalcResult<Self> {
        let policy_version = policy_version.trim().to_string();
        if policy_version.is_empty() {
            return Err(CalcError::InvalidConfig(
                "policy_version cannot be empty".into(),
            ));
        }

        Ok(Self {
            audit_enabled,
            policy_version,
            option_policy,
        })
    }

    pub fn audit_enabled(&self) -> bool {
        self.audit_enabled
    }

    pub fn policy_version(&self) -> &str {
        &self.policy_version
    }

    pub fn option_policy(&self) -> OptionPolicy {
        self.option_policy
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            audit_enabled: true,
            policy_version: DEFAULT_POLICY_VERSION.to_string(),
            option_policy: OptionPolicy::Lenient,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag from an optional string value.
///
/// `None` or an empty value yields `default`. Accepts `1/0`, `true/false`, `yes/no` and
/// `on/off`, case-insensitively.
pub fn bool_from_env_value(name: &str, value: Option<String>, default: bool) -> CalcResult<bool> {
    let Some(value) = non_empty(value) else {
        return Ok(default);
    };

    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CalcError::InvalidConfig(format!(
            "{name} must be a boolean (true/false), got `{value}`"
        ))),
    }
}

/// Parse the option policy from an optional `*_STRICT_OPTIONS` flag value.
pub fn option_policy_from_env_value(name: &str, value: Option<String>) -> CalcResult<OptionPolicy> {
    let strict = bool_from_env_value(name, value, false)?;
    Ok(if strict {
        OptionPolicy::Strict
    } else {
        OptionPolicy::Lenient
    })
}

/// Parse the audit policy version, falling back to [`DEFAULT_POLICY_VERSION`].
pub fn policy_version_from_env_value(value: Option<String>) -> String {
    non_empty(value).unwrap_or_else(|| DEFAULT_POLICY_VERSION.to_string())
}
