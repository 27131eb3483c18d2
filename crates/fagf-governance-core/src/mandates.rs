// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! The reference mandate profile and profile-level consistency checks.
//!
//! [`FinancialMandates::mas_default`] reproduces the Singapore-aligned
//! reference profile.  Callers that live-edit a draft use the `with_*`
//! setters and run [`FinancialMandates::check`] before staging it.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::error::{GovernanceError, GovernanceResult};
use crate::types::{
    EnforcementAction, FinancialMandates, GovernanceCategory, Mandate, Severity,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

impl FinancialMandates {
    /// Reference profile for a Singapore-aligned (MAS) deployment.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fagf_governance_core::types::FinancialMandates;
    ///
    /// let mandates = FinancialMandates::mas_default();
    /// assert_eq!(mandates.confirmation_threshold.id, "fagf-limit-01");
    /// assert_eq!(mandates.confirmation_threshold.parameter, 50.0);
    /// assert!(mandates.check().is_ok());
    /// ```
    pub fn mas_default() -> Self {
        Self {
            new_merchant_auth: Mandate {
                id: "fagf-auth-01".into(),
                category: GovernanceCategory::Authorization,
                parameter: true,
                enforcement: EnforcementAction::ApprovalRequired,
                severity: Severity::High,
                risk_disclosure: "Prevents Phishing & Merchant Impersonation".into(),
                description: "Requires manual verification for merchants not in the agent's historical trust list.".into(),
            },
            confirmation_threshold: Mandate {
                id: "fagf-limit-01".into(),
                category: GovernanceCategory::SpendingLimit,
                parameter: 50.0,
                enforcement: EnforcementAction::ApprovalRequired,
                severity: Severity::Medium,
                risk_disclosure: "Mitigates Large Unauthorized Outbound Transfers".into(),
                description: "Autonomous payments above S$50 require explicit user cryptographic approval.".into(),
            },
            daily_aggregate_limit: Mandate {
                id: "fagf-limit-02".into(),
                category: GovernanceCategory::SpendingLimit,
                parameter: 200.0,
                enforcement: EnforcementAction::Block,
                severity: Severity::High,
                risk_disclosure: "Limits Total Daily Exposure for Autonomous Agents".into(),
                description: "Strict block if the total daily spending exceeds S$200.".into(),
            },
            rate_limit_per_hour: Mandate {
                id: "fagf-velocity-01".into(),
                category: GovernanceCategory::Velocity,
                parameter: 5,
                enforcement: EnforcementAction::ApprovalRequired,
                severity: Severity::Medium,
                risk_disclosure: "Prevents API Runaway / Autonomous Fail-loops".into(),
                description: "Max 5 autonomous transactions per hour.".into(),
            },
            cooldown_seconds: Mandate {
                id: "fagf-velocity-02".into(),
                category: GovernanceCategory::Velocity,
                parameter: 60,
                enforcement: EnforcementAction::ApprovalRequired,
                severity: Severity::Low,
                risk_disclosure: "Ensures Observation Period Between Actions".into(),
                description: "Minimum 60-second delay between consecutive autonomous executions.".into(),
            },
            blocked_categories: Mandate {
                id: "fagf-cat-01".into(),
                category: GovernanceCategory::CategoryRestriction,
                parameter: strings(&[
                    "Ungoverned Gambling",
                    "Unregulated Crypto",
                    "Offshore Investment",
                    "Job Scams",
                ]),
                enforcement: EnforcementAction::Block,
                severity: Severity::High,
                risk_disclosure: "Regulatory Compliance & High-Risk Mitigation".into(),
                description: "Strictly blocks transactions to restricted or illegal categories.".into(),
            },
            allowed_methods: Mandate {
                id: "fagf-auth-02".into(),
                category: GovernanceCategory::Authorization,
                parameter: strings(&["PayNow", "NETS", "FAST", "DBS PayLah!"]),
                enforcement: EnforcementAction::ApprovalRequired,
                severity: Severity::Medium,
                risk_disclosure: "Restricts Payment to Verified Local Channels".into(),
                description: "Only allows autonomous usage of verified Singapore payment channels.".into(),
            },
        }
    }

    /// The seven mandate ids in slot order.
    pub fn ids(&self) -> [&str; 7] {
        [
            self.new_merchant_auth.id.as_str(),
            self.confirmation_threshold.id.as_str(),
            self.daily_aggregate_limit.id.as_str(),
            self.rate_limit_per_hour.id.as_str(),
            self.cooldown_seconds.id.as_str(),
            self.blocked_categories.id.as_str(),
            self.allowed_methods.id.as_str(),
        ]
    }

    /// Verify profile-level invariants: non-empty, pairwise-distinct ids and
    /// finite, non-negative currency parameters.
    ///
    /// The validator never calls this; it is run when a profile is staged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fagf_governance_core::{error::GovernanceError, types::FinancialMandates};
    ///
    /// let mut mandates = FinancialMandates::mas_default();
    /// mandates.cooldown_seconds.id = "fagf-limit-01".into();
    /// assert_eq!(
    ///     mandates.check(),
    ///     Err(GovernanceError::DuplicateMandateId("fagf-limit-01".into())),
    /// );
    /// ```
    pub fn check(&self) -> GovernanceResult<()> {
        const SLOTS: [&str; 7] = [
            "newMerchantAuth",
            "confirmationThreshold",
            "dailyAggregateLimit",
            "rateLimitPerHour",
            "cooldownSeconds",
            "blockedCategories",
            "allowedMethods",
        ];

        let mut seen: HashSet<&str> = HashSet::with_capacity(SLOTS.len());
        for (slot, id) in SLOTS.into_iter().zip(self.ids()) {
            if id.trim().is_empty() {
                return Err(GovernanceError::EmptyMandateId { slot });
            }
            if !seen.insert(id) {
                return Err(GovernanceError::DuplicateMandateId(id.into()));
            }
        }

        check_amount(&self.confirmation_threshold)?;
        check_amount(&self.daily_aggregate_limit)?;
        Ok(())
    }

    /// Replace the confirmation threshold parameter.
    pub fn with_confirmation_threshold(mut self, amount: f64) -> Self {
        self.confirmation_threshold.parameter = amount;
        self
    }

    /// Replace the daily aggregate limit parameter.
    pub fn with_daily_aggregate_limit(mut self, amount: f64) -> Self {
        self.daily_aggregate_limit.parameter = amount;
        self
    }

    /// Enable or disable the new-merchant authorisation gate.
    pub fn with_new_merchant_auth(mut self, enabled: bool) -> Self {
        self.new_merchant_auth.parameter = enabled;
        self
    }

    /// Replace the hourly rate limit.
    pub fn with_rate_limit_per_hour(mut self, count: u32) -> Self {
        self.rate_limit_per_hour.parameter = count;
        self
    }

    /// Replace the cooldown, in seconds.
    pub fn with_cooldown_seconds(mut self, seconds: u64) -> Self {
        self.cooldown_seconds.parameter = seconds;
        self
    }

    /// Replace the blocked category list.
    pub fn with_blocked_categories<I, T>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.blocked_categories.parameter = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the payment method allowlist.
    pub fn with_allowed_methods<I, T>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.allowed_methods.parameter = methods.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for FinancialMandates {
    fn default() -> Self {
        Self::mas_default()
    }
}

fn check_amount(mandate: &Mandate<f64>) -> GovernanceResult<()> {
    let value = mandate.parameter;
    if !value.is_finite() || value < 0.0 {
        return Err(GovernanceError::InvalidParameter {
            id: mandate.id.clone(),
            reason: format!("expected a finite, non-negative amount, got {}", value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids_are_pairwise_distinct() {
        let mandates = FinancialMandates::mas_default();
        let ids = mandates.ids();
        for (index, id) in ids.iter().enumerate() {
            assert!(!ids[index + 1..].contains(id), "duplicate id {}", id);
        }
    }

    #[test]
    fn test_threshold_metadata_matches_reference_profile() {
        let threshold = FinancialMandates::mas_default().confirmation_threshold;
        assert_eq!(
            threshold.description,
            "Autonomous payments above S$50 require explicit user cryptographic approval."
        );
        assert_eq!(threshold.risk_disclosure, "Mitigates Large Unauthorized Outbound Transfers");
    }

    #[test]
    fn test_default_profile_passes_check() {
        assert!(FinancialMandates::default().check().is_ok());
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let mut mandates = FinancialMandates::mas_default();
        mandates.allowed_methods.id = "  ".into();
        assert_eq!(
            mandates.check(),
            Err(GovernanceError::EmptyMandateId { slot: "allowedMethods" })
        );
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let mandates = FinancialMandates::mas_default().with_confirmation_threshold(-1.0);
        assert!(matches!(
            mandates.check(),
            Err(GovernanceError::InvalidParameter { ref id, .. }) if id == "fagf-limit-01"
        ));
    }

    #[test]
    fn test_nan_daily_limit_is_rejected() {
        let mandates = FinancialMandates::mas_default().with_daily_aggregate_limit(f64::NAN);
        assert!(mandates.check().is_err());
    }

    #[test]
    fn test_builders_replace_parameters() {
        let mandates = FinancialMandates::mas_default()
            .with_confirmation_threshold(100.0)
            .with_rate_limit_per_hour(2)
            .with_cooldown_seconds(0)
            .with_new_merchant_auth(false)
            .with_blocked_categories(["Casino"])
            .with_allowed_methods(vec![String::from("Corporate Card")]);

        assert_eq!(mandates.confirmation_threshold.parameter, 100.0);
        assert_eq!(mandates.rate_limit_per_hour.parameter, 2);
        assert_eq!(mandates.cooldown_seconds.parameter, 0);
        assert!(!mandates.new_merchant_auth.parameter);
        assert_eq!(mandates.blocked_categories.parameter, vec!["Casino"]);
        assert_eq!(mandates.allowed_methods.parameter, vec!["Corporate Card"]);
        // Metadata is untouched.
        assert_eq!(mandates.blocked_categories.id, "fagf-cat-01");
    }

    #[test]
    fn test_profile_json_uses_camel_case_slots() {
        let json = serde_json::to_value(FinancialMandates::mas_default()).unwrap();
        assert_eq!(json["confirmationThreshold"]["parameter"], 50.0);
        assert_eq!(json["blockedCategories"]["riskDisclosure"], "Regulatory Compliance & High-Risk Mitigation");
        assert_eq!(json["newMerchantAuth"]["enforcement"], "approval_required");
        assert_eq!(json["rateLimitPerHour"]["category"], "velocity");
    }
}
