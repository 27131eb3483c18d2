// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Shared data types used across the governance engine.
//!
//! All types implement [`Clone`], [`Debug`], [`serde::Serialize`], and
//! [`serde::Deserialize`].  Field names are `camelCase` on the wire so that
//! envelopes and mandate profiles produced by a TypeScript caller deserialise
//! without a translation layer.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mandate metadata
// ---------------------------------------------------------------------------

/// Informational severity attached to a mandate and surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lower-case label used in reasons and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low    => "low",
            Severity::Medium => "medium",
            Severity::High   => "high",
        }
    }
}

/// The action a mandate declares it takes when it fires.
///
/// By default the validator hard-wires the outcome of every rule and treats
/// this field as descriptive metadata.  It only drives dispatch when
/// [`Config::honor_enforcement`](crate::config::Config::honor_enforcement)
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementAction {
    /// Reject outright; no human override.
    Block,
    /// Escalate to a human (HITL).
    ApprovalRequired,
    /// Record the hit and let the transaction continue.
    ShadowLog,
}

/// Classification of a mandate.  Not used in control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceCategory {
    Authorization,
    SpendingLimit,
    CategoryRestriction,
    Velocity,
}

/// A single governance rule.
///
/// The parameter type `T` is fixed by the slot the mandate occupies in
/// [`FinancialMandates`], so every rule's parameter is statically typed at
/// the point of use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandate<T> {
    /// Stable namespaced identifier (e.g. `fagf-limit-01`).  Unique within
    /// one configuration.
    pub id: String,
    pub category: GovernanceCategory,
    /// The rule's tunable value.
    pub parameter: T,
    pub enforcement: EnforcementAction,
    pub severity: Severity,
    /// The threat this mandate mitigates.
    pub risk_disclosure: String,
    pub description: String,
}

/// The fixed seven-slot mandate configuration.
///
/// Immutable for the duration of one validation call.  Callers may hold
/// several (e.g. a pending draft and the deployed profile); see
/// [`MandateRegistry`](crate::registry::MandateRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMandates {
    /// Require human authorisation for merchants with no accepted history.
    pub new_merchant_auth: Mandate<bool>,
    /// Amounts strictly above this value escalate to a human.
    pub confirmation_threshold: Mandate<f64>,
    /// Daily spending cap.  Only evaluated when
    /// [`Config::enforce_daily_aggregate`](crate::config::Config::enforce_daily_aggregate)
    /// is set.
    pub daily_aggregate_limit: Mandate<f64>,
    /// Maximum accepted transactions in any trailing hour.
    pub rate_limit_per_hour: Mandate<u32>,
    /// Minimum spacing between accepted transactions, in seconds.
    pub cooldown_seconds: Mandate<u64>,
    /// Categories that are hard-blocked (exact match).
    pub blocked_categories: Mandate<Vec<String>>,
    /// Payment methods permitted for autonomous use (exact match).
    pub allowed_methods: Mandate<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A payment proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Non-negative currency amount.
    pub amount: f64,
    /// Opaque routing token.
    pub destination: String,
    pub merchant_name: String,
    /// Free text, matched exactly against `blocked_categories`.
    pub category: String,
    /// Unix epoch milliseconds at which the transaction was proposed.
    pub timestamp: u64,
    /// Free text, matched exactly against `allowed_methods`.
    pub payment_method: String,
}

/// Caller-computed risk signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeContext {
    /// Whether the merchant has no prior accepted history.
    pub is_new_merchant: bool,
    /// Advisory; not consulted by the validator.
    pub history_depth: u32,
    /// Advisory; not consulted by the validator.
    pub risk_score: f64,
}

/// The unit of evaluation: a transaction plus the proposing agent's
/// rationale and contextual risk signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceEnvelope {
    pub transaction: Transaction,
    /// Free-text rationale supplied by the agent.  Not used in any check.
    pub reasoning: String,
    pub context: EnvelopeContext,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Coarse classification of a [`ValidationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Cleared every check; may be committed autonomously.
    Approved,
    /// Human-in-the-loop: a person must approve before commit.
    ApprovalRequired,
    /// Hard block; cannot be escalated or overridden.
    Blocked,
}

/// The verdict returned by the validator.
///
/// Constructed fresh per call.  On full approval `reason`, `mitigation_risk`
/// and `severity` are `None` and `triggered_mandates` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub allowed: bool,
    pub requires_approval: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Copy of the triggering mandate's `risk_disclosure`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation_risk: Option<String>,
    /// Copy of the triggering mandate's `severity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Ids of the mandates that fired.  At most one entry.
    pub triggered_mandates: Vec<String>,
    /// Ids of `shadow_log` mandates that fired without affecting the outcome.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shadowed_mandates: Vec<String>,
}

impl ValidationResult {
    /// A clean pass.
    pub fn approved() -> Self {
        Self {
            allowed: true,
            requires_approval: false,
            reason: None,
            mitigation_risk: None,
            severity: None,
            triggered_mandates: Vec::new(),
            shadowed_mandates: Vec::new(),
        }
    }

    /// Classify this result.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fagf_governance_core::types::{ValidationResult, Verdict};
    ///
    /// assert_eq!(ValidationResult::approved().verdict(), Verdict::Approved);
    /// ```
    pub fn verdict(&self) -> Verdict {
        match (self.allowed, self.requires_approval) {
            (true, _)      => Verdict::Approved,
            (false, true)  => Verdict::ApprovalRequired,
            (false, false) => Verdict::Blocked,
        }
    }

    /// `true` when the result cannot be escalated to a human.
    pub fn is_hard_block(&self) -> bool {
        self.verdict() == Verdict::Blocked
    }

    /// The single mandate id that produced a non-approval, if any.
    pub fn triggered(&self) -> Option<&str> {
        self.triggered_mandates.first().map(String::as_str)
    }
}
