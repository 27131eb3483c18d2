// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Validator-level configuration.
//!
//! [`Config`] tunes how the validator interprets a mandate profile, as
//! opposed to the profile's own parameters.  `Config::default()` reproduces
//! the reference evaluation pipeline exactly; both switches are opt-in.

use serde::{Deserialize, Serialize};

/// Options for [`GovernanceValidator`](crate::validator::GovernanceValidator).
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::config::Config;
///
/// let config = Config {
///     enforce_daily_aggregate: true,
///     ..Config::default()
/// };
/// assert!(!config.honor_enforcement);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// When `true`, the `daily_aggregate_limit` mandate is evaluated: history
    /// amounts since the start of the current UTC day plus the proposed
    /// amount must not exceed the limit.  Defaults to `false`, leaving the
    /// mandate as schema-only configuration.
    #[serde(default)]
    pub enforce_daily_aggregate: bool,

    /// When `true`, a firing rule's outcome is taken from its mandate's
    /// `enforcement` field instead of the rule's hard-wired outcome.  The
    /// category restriction stays an unconditional hard block either way.
    /// Defaults to `false`.
    #[serde(default)]
    pub honor_enforcement: bool,
}
