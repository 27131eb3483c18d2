// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Mandate evaluation engine.
//!
//! [`GovernanceValidator`] is a pure function of `(envelope, mandates,
//! history, now)`.  It performs no I/O, mutates nothing, and never fails:
//! every well-formed input terminates in exactly one verdict.
//!
//! ## Evaluation Order
//!
//! 1. **Category block**: category in `blocked_categories` → hard block.
//! 2. **New merchant**: `is_new_merchant` and the gate is enabled → HITL.
//! 3. **Confirmation threshold**: `amount > threshold` → HITL.
//! 4. **Daily aggregate**: only when enabled in [`Config`] → block.
//! 5. **Rate limit**: accepted entries in the trailing hour `>= limit` → HITL.
//! 6. **Cooldown**: most recent entry younger than the cooldown → HITL.
//! 7. **Payment method**: method not in `allowed_methods` → HITL.
//! 8. **Pass**.
//!
//! The first rule that fires short-circuits the rest, so a result names at
//! most one triggered mandate.  The category block runs first and is always
//! terminal regardless of its declared `enforcement`.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use tracing::{debug, info, warn};

use crate::clock::{utc_day_start, Clock, HOUR_MS};
use crate::config::Config;
use crate::history::HistoryView;
use crate::types::{
    EnforcementAction, FinancialMandates, GovernanceEnvelope, Mandate, ValidationResult,
};

/// What a firing rule does to the evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleOutcome {
    Block,
    Escalate,
    Shadow,
}

impl RuleOutcome {
    fn label(self) -> &'static str {
        match self {
            RuleOutcome::Block    => "Blocked",
            RuleOutcome::Escalate => "Approval required",
            RuleOutcome::Shadow   => "Shadow",
        }
    }
}

impl From<EnforcementAction> for RuleOutcome {
    fn from(action: EnforcementAction) -> Self {
        match action {
            EnforcementAction::Block            => RuleOutcome::Block,
            EnforcementAction::ApprovalRequired => RuleOutcome::Escalate,
            EnforcementAction::ShadowLog        => RuleOutcome::Shadow,
        }
    }
}

/// Evaluates governance envelopes against a [`FinancialMandates`] profile.
///
/// The associated functions [`validate`](Self::validate) and
/// [`validate_at`](Self::validate_at) run the reference pipeline with
/// `Config::default()`.  Construct an instance with
/// [`with_config`](Self::with_config) to enable the optional behaviours.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::{
///     history::TransactionHistory,
///     types::{EnvelopeContext, FinancialMandates, GovernanceEnvelope, Transaction},
///     validator::GovernanceValidator,
/// };
///
/// let envelope = GovernanceEnvelope {
///     transaction: Transaction {
///         amount: 50.0,
///         destination: "binance_global".into(),
///         merchant_name: "Binance Exchange".into(),
///         category: "Ungoverned Gambling".into(),
///         timestamp: 1_700_000_000_000,
///         payment_method: "PayNow".into(),
///     },
///     reasoning: "Yield generation via staking platform".into(),
///     context: EnvelopeContext { is_new_merchant: true, history_depth: 0, risk_score: 5.0 },
/// };
///
/// let result = GovernanceValidator::validate_at(
///     &envelope,
///     &FinancialMandates::mas_default(),
///     &TransactionHistory::new(),
///     1_700_000_000_000,
/// );
/// assert!(!result.allowed);
/// assert!(!result.requires_approval);
/// assert_eq!(result.triggered_mandates, vec!["fagf-cat-01"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GovernanceValidator {
    config: Config,
}

impl GovernanceValidator {
    /// A validator running the reference pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate against the wall clock with the reference configuration.
    #[cfg(feature = "std")]
    pub fn validate<H>(
        envelope: &GovernanceEnvelope,
        mandates: &FinancialMandates,
        history: &H,
    ) -> ValidationResult
    where
        H: HistoryView + ?Sized,
    {
        Self::default().evaluate(envelope, mandates, history, crate::clock::current_time_ms())
    }

    /// Evaluate at an explicit instant with the reference configuration.
    pub fn validate_at<H>(
        envelope: &GovernanceEnvelope,
        mandates: &FinancialMandates,
        history: &H,
        now_ms: u64,
    ) -> ValidationResult
    where
        H: HistoryView + ?Sized,
    {
        Self::default().evaluate(envelope, mandates, history, now_ms)
    }

    /// Evaluate using `clock` as the source of "now".
    pub fn evaluate_with_clock<H, C>(
        &self,
        envelope: &GovernanceEnvelope,
        mandates: &FinancialMandates,
        history: &H,
        clock: &C,
    ) -> ValidationResult
    where
        H: HistoryView + ?Sized,
        C: Clock + ?Sized,
    {
        self.evaluate(envelope, mandates, history, clock.now_ms())
    }

    /// Run the ordered rule pipeline at `now_ms`.
    ///
    /// Identical arguments always produce an identical result.
    pub fn evaluate<H>(
        &self,
        envelope: &GovernanceEnvelope,
        mandates: &FinancialMandates,
        history: &H,
        now_ms: u64,
    ) -> ValidationResult
    where
        H: HistoryView + ?Sized,
    {
        let transaction = &envelope.transaction;
        let context = &envelope.context;
        let mut shadowed: Vec<String> = Vec::new();

        debug!(
            merchant = %transaction.merchant_name,
            amount = transaction.amount,
            category = %transaction.category,
            now_ms,
            "evaluating governance envelope"
        );

        // Category block.  Never escalatable, whatever `enforcement` says.
        let blocked = &mandates.blocked_categories;
        if blocked.parameter.iter().any(|category| *category == transaction.category) {
            let reason = format!(
                "{}: category '{}' is strictly restricted.",
                RuleOutcome::Block.label(),
                transaction.category
            );
            return terminal(blocked, RuleOutcome::Block, reason, shadowed);
        }

        let new_merchant = &mandates.new_merchant_auth;
        if context.is_new_merchant && new_merchant.parameter {
            let outcome = self.outcome_for(new_merchant, RuleOutcome::Escalate);
            let reason = format!(
                "{}: new merchant '{}' requires manual authorization.",
                outcome.label(),
                transaction.merchant_name
            );
            if let Some(result) = self.fire(new_merchant, outcome, reason, &mut shadowed) {
                return result;
            }
        }

        let threshold = &mandates.confirmation_threshold;
        if transaction.amount > threshold.parameter {
            let outcome = self.outcome_for(threshold, RuleOutcome::Escalate);
            let reason = format!(
                "{}: transaction amount ${} exceeds autonomous limit (${}).",
                outcome.label(),
                transaction.amount,
                threshold.parameter
            );
            if let Some(result) = self.fire(threshold, outcome, reason, &mut shadowed) {
                return result;
            }
        }

        if self.config.enforce_daily_aggregate {
            let daily = &mandates.daily_aggregate_limit;
            let spent_today = history.total_amount_since(utc_day_start(now_ms));
            let projected = spent_today + transaction.amount;
            if projected > daily.parameter {
                let outcome = self.outcome_for(daily, RuleOutcome::Block);
                let reason = format!(
                    "{}: daily spend ${} would exceed aggregate limit (${}).",
                    outcome.label(),
                    projected,
                    daily.parameter
                );
                if let Some(result) = self.fire(daily, outcome, reason, &mut shadowed) {
                    return result;
                }
            }
        }

        // Entries strictly inside the trailing hour: timestamp > now - 1h.
        let rate = &mandates.rate_limit_per_hour;
        let window_start = now_ms.saturating_add(1).saturating_sub(HOUR_MS);
        let recent = history.count_since(window_start);
        if recent >= rate.parameter as usize {
            let outcome = self.outcome_for(rate, RuleOutcome::Escalate);
            let reason = format!(
                "{}: velocity limit exceeded ({} tx/hr).",
                outcome.label(),
                rate.parameter
            );
            if let Some(result) = self.fire(rate, outcome, reason, &mut shadowed) {
                return result;
            }
        }

        let cooldown = &mandates.cooldown_seconds;
        if let Some(last) = history.most_recent() {
            let cooldown_ms = i128::from(cooldown.parameter) * 1_000;
            let elapsed_ms = i128::from(now_ms) - i128::from(last.transaction.timestamp);
            if elapsed_ms < cooldown_ms {
                let wait_secs = ceil_div(cooldown_ms - elapsed_ms, 1_000);
                let outcome = self.outcome_for(cooldown, RuleOutcome::Escalate);
                let reason = format!(
                    "{}: cooling period active. Wait {}s.",
                    outcome.label(),
                    wait_secs
                );
                if let Some(result) = self.fire(cooldown, outcome, reason, &mut shadowed) {
                    return result;
                }
            }
        }

        let methods = &mandates.allowed_methods;
        if !methods.parameter.iter().any(|method| *method == transaction.payment_method) {
            let outcome = self.outcome_for(methods, RuleOutcome::Escalate);
            let reason = format!(
                "{}: payment method '{}' is untrusted for autonomous use.",
                outcome.label(),
                transaction.payment_method
            );
            if let Some(result) = self.fire(methods, outcome, reason, &mut shadowed) {
                return result;
            }
        }

        debug!(merchant = %transaction.merchant_name, "envelope cleared all mandates");
        ValidationResult {
            shadowed_mandates: shadowed,
            ..ValidationResult::approved()
        }
    }

    fn outcome_for<T>(&self, mandate: &Mandate<T>, hardwired: RuleOutcome) -> RuleOutcome {
        if self.config.honor_enforcement {
            RuleOutcome::from(mandate.enforcement)
        } else {
            hardwired
        }
    }

    /// Apply a fired rule.  Returns `None` when evaluation should continue.
    fn fire<T>(
        &self,
        mandate: &Mandate<T>,
        outcome: RuleOutcome,
        reason: String,
        shadowed: &mut Vec<String>,
    ) -> Option<ValidationResult> {
        if outcome == RuleOutcome::Shadow {
            warn!(mandate = %mandate.id, %reason, "shadow mandate hit");
            shadowed.push(mandate.id.clone());
            return None;
        }
        Some(terminal(mandate, outcome, reason, core::mem::take(shadowed)))
    }
}

fn terminal<T>(
    mandate: &Mandate<T>,
    outcome: RuleOutcome,
    reason: String,
    shadowed: Vec<String>,
) -> ValidationResult {
    let requires_approval = outcome == RuleOutcome::Escalate;
    if requires_approval {
        info!(mandate = %mandate.id, severity = mandate.severity.as_str(), %reason, "escalating to human approval");
    } else {
        warn!(mandate = %mandate.id, severity = mandate.severity.as_str(), %reason, "transaction blocked");
    }

    ValidationResult {
        allowed: false,
        requires_approval,
        reason: Some(reason),
        mitigation_risk: Some(mandate.risk_disclosure.clone()),
        severity: Some(mandate.severity),
        triggered_mandates: alloc::vec![mandate.id.clone()],
        shadowed_mandates: shadowed,
    }
}

fn ceil_div(value: i128, divisor: i128) -> i128 {
    (value + divisor - 1) / divisor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div_rounds_up() {
        assert_eq!(ceil_div(1, 1_000), 1);
        assert_eq!(ceil_div(1_000, 1_000), 1);
        assert_eq!(ceil_div(1_001, 1_000), 2);
        assert_eq!(ceil_div(60_000, 1_000), 60);
    }

    #[test]
    fn test_enforcement_maps_to_outcome() {
        assert_eq!(RuleOutcome::from(EnforcementAction::Block), RuleOutcome::Block);
        assert_eq!(RuleOutcome::from(EnforcementAction::ApprovalRequired), RuleOutcome::Escalate);
        assert_eq!(RuleOutcome::from(EnforcementAction::ShadowLog), RuleOutcome::Shadow);
    }

    #[test]
    fn test_hardwired_outcome_ignores_enforcement_by_default() {
        let validator = GovernanceValidator::new();
        let mut mandates = FinancialMandates::mas_default();
        mandates.confirmation_threshold.enforcement = EnforcementAction::Block;
        assert_eq!(
            validator.outcome_for(&mandates.confirmation_threshold, RuleOutcome::Escalate),
            RuleOutcome::Escalate
        );

        let honoring = GovernanceValidator::with_config(Config {
            honor_enforcement: true,
            ..Config::default()
        });
        assert_eq!(
            honoring.outcome_for(&mandates.confirmation_threshold, RuleOutcome::Escalate),
            RuleOutcome::Block
        );
    }
}
