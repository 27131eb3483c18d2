// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Profile loader for [`GovernanceSession`](crate::session::GovernanceSession).
//!
//! Supports two load strategies:
//!
//! 1. **TOML file**: [`load_profile`] reads a file into a
//!    [`GovernanceProfile`].
//! 2. **Environment variables**: [`load_profile_from_env`] reads
//!    `FAGF_`-prefixed variables.
//!
//! Every mandate value is optional.  Whatever is left unset keeps its
//! [`FinancialMandates::mas_default`] value.
//!
//! # File format
//!
//! ```toml
//! [options]
//! enforce_daily_aggregate = true
//! honor_enforcement       = false
//!
//! [mandates]
//! confirmation_threshold = 75.0
//! daily_aggregate_limit  = 300.0
//! rate_limit_per_hour    = 10
//! cooldown_seconds       = 30
//! blocked_categories     = ["Gambling", "Crypto / High Risk"]
//! allowed_methods        = ["PayNow", "Corporate Card"]
//! ```
//!
//! # Environment variables
//!
//! | Variable                       | Type         |
//! |--------------------------------|--------------|
//! | `FAGF_NEW_MERCHANT_AUTH`       | bool         |
//! | `FAGF_CONFIRMATION_THRESHOLD`  | float ≥ 0    |
//! | `FAGF_DAILY_AGGREGATE_LIMIT`   | float ≥ 0    |
//! | `FAGF_RATE_LIMIT_PER_HOUR`     | integer      |
//! | `FAGF_COOLDOWN_SECONDS`        | integer      |
//! | `FAGF_BLOCKED_CATEGORIES`      | comma list   |
//! | `FAGF_ALLOWED_METHODS`         | comma list   |
//! | `FAGF_ENFORCE_DAILY_AGGREGATE` | bool         |
//! | `FAGF_HONOR_ENFORCEMENT`       | bool         |

// "config-loader" implies "std", so std facilities are always available here.
#![cfg(feature = "config-loader")]

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::types::FinancialMandates;

/// Errors that can occur while loading a governance profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The profile file could not be read.
    #[error("failed to read profile \"{path}\": {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The TOML content did not match the profile schema.
    #[error("failed to parse TOML profile: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// A value could not be parsed to its expected type.
    #[error("field \"{field}\": cannot parse \"{value}\": {reason}")]
    ParseField { field: String, value: String, reason: String },
    /// A value parsed but is outside the permitted range.
    #[error("field \"{field}\": value \"{value}\" out of range: {reason}")]
    InvalidRange { field: String, value: String, reason: String },
}

/// Optional replacements for mandate parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandateOverrides {
    pub new_merchant_auth: Option<bool>,
    pub confirmation_threshold: Option<f64>,
    pub daily_aggregate_limit: Option<f64>,
    pub rate_limit_per_hour: Option<u32>,
    pub cooldown_seconds: Option<u64>,
    pub blocked_categories: Option<Vec<String>>,
    pub allowed_methods: Option<Vec<String>>,
}

impl MandateOverrides {
    fn check(&self) -> Result<(), ConfigError> {
        check_amount("confirmation_threshold", self.confirmation_threshold)?;
        check_amount("daily_aggregate_limit", self.daily_aggregate_limit)
    }

    /// Apply every set override on top of `base`.
    pub fn apply(&self, mut base: FinancialMandates) -> FinancialMandates {
        if let Some(enabled) = self.new_merchant_auth {
            base = base.with_new_merchant_auth(enabled);
        }
        if let Some(amount) = self.confirmation_threshold {
            base = base.with_confirmation_threshold(amount);
        }
        if let Some(amount) = self.daily_aggregate_limit {
            base = base.with_daily_aggregate_limit(amount);
        }
        if let Some(count) = self.rate_limit_per_hour {
            base = base.with_rate_limit_per_hour(count);
        }
        if let Some(seconds) = self.cooldown_seconds {
            base = base.with_cooldown_seconds(seconds);
        }
        if let Some(categories) = &self.blocked_categories {
            base = base.with_blocked_categories(categories.iter().cloned());
        }
        if let Some(methods) = &self.allowed_methods {
            base = base.with_allowed_methods(methods.iter().cloned());
        }
        base
    }
}

/// A loaded profile: validator options plus mandate overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceProfile {
    pub options: Config,
    pub mandates: MandateOverrides,
}

impl GovernanceProfile {
    /// The effective mandate set.
    ///
    /// ```rust
    /// use fagf_governance_core::config_loader::{GovernanceProfile, MandateOverrides};
    ///
    /// let profile = GovernanceProfile {
    ///     mandates: MandateOverrides { rate_limit_per_hour: Some(10), ..Default::default() },
    ///     ..Default::default()
    /// };
    /// let mandates = profile.mandates();
    /// assert_eq!(mandates.rate_limit_per_hour.parameter, 10);
    /// assert_eq!(mandates.confirmation_threshold.parameter, 50.0);
    /// ```
    pub fn mandates(&self) -> FinancialMandates {
        self.mandates.apply(FinancialMandates::mas_default())
    }
}

/// Load a [`GovernanceProfile`] from a TOML file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, does not match the
/// schema, or carries a negative or non-finite amount.
///
/// # Example
///
/// ```rust,no_run
/// use fagf_governance_core::config_loader::load_profile;
///
/// let profile = load_profile("/etc/fagf/profile.toml").unwrap();
/// println!("threshold: {}", profile.mandates().confirmation_threshold.parameter);
/// ```
pub fn load_profile(path: impl AsRef<Path>) -> Result<GovernanceProfile, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.display().to_string(),
        source,
    })?;

    let profile: GovernanceProfile = toml::from_str(&content)?;
    profile.mandates.check()?;
    debug!(path = %path.display(), "loaded governance profile");
    Ok(profile)
}

/// Load a [`GovernanceProfile`] from `FAGF_`-prefixed environment variables.
///
/// Unset variables leave the corresponding value at its default.
///
/// # Errors
///
/// [`ConfigError::ParseField`] if a variable is set to an unparsable value,
/// [`ConfigError::InvalidRange`] for a negative or non-finite amount.
pub fn load_profile_from_env() -> Result<GovernanceProfile, ConfigError> {
    let mandates = MandateOverrides {
        new_merchant_auth: read_env_bool("FAGF_NEW_MERCHANT_AUTH")?,
        confirmation_threshold: read_env_parsed("FAGF_CONFIRMATION_THRESHOLD")?,
        daily_aggregate_limit: read_env_parsed("FAGF_DAILY_AGGREGATE_LIMIT")?,
        rate_limit_per_hour: read_env_parsed("FAGF_RATE_LIMIT_PER_HOUR")?,
        cooldown_seconds: read_env_parsed("FAGF_COOLDOWN_SECONDS")?,
        blocked_categories: read_env_list("FAGF_BLOCKED_CATEGORIES"),
        allowed_methods: read_env_list("FAGF_ALLOWED_METHODS"),
    };
    mandates.check().map_err(|err| match err {
        ConfigError::InvalidRange { field, value, reason } => ConfigError::InvalidRange {
            field: env_name(&field),
            value,
            reason,
        },
        other => other,
    })?;

    let defaults = Config::default();
    let options = Config {
        enforce_daily_aggregate: read_env_bool("FAGF_ENFORCE_DAILY_AGGREGATE")?
            .unwrap_or(defaults.enforce_daily_aggregate),
        honor_enforcement: read_env_bool("FAGF_HONOR_ENFORCEMENT")?
            .unwrap_or(defaults.honor_enforcement),
    };

    Ok(GovernanceProfile { options, mandates })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn env_name(field: &str) -> String {
    format!("FAGF_{}", field.to_ascii_uppercase())
}

fn check_amount(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(ConfigError::InvalidRange {
            field: field.to_owned(),
            value: amount.to_string(),
            reason: "must be a finite amount >= 0.0".into(),
        }),
        _ => Ok(()),
    }
}

fn read_env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|source| ConfigError::ParseField {
                field: key.to_owned(),
                value: val.clone(),
                reason: source.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn read_env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            other => Err(ConfigError::ParseField {
                field: key.to_owned(),
                value: other.to_owned(),
                reason: "expected one of: true/false, 1/0, yes/no, on/off".into(),
            }),
        },
        Err(_) => Ok(None),
    }
}

/// Comma-separated list; blank entries are dropped.
fn read_env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|val| {
        val.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect()
    })
}
