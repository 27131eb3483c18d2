// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Draft/deploy management of mandate profiles.
//!
//! A [`MandateRegistry`] holds exactly one deployed profile, which every
//! validation reads, and at most one pending draft.  Drafts are checked when
//! staged, so a profile with duplicate ids or a negative limit can never be
//! deployed.

use tracing::info;

use crate::error::{GovernanceError, GovernanceResult};
use crate::types::FinancialMandates;

/// Deployed and pending mandate profiles.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::{registry::MandateRegistry, types::FinancialMandates};
///
/// let mut registry = MandateRegistry::new(FinancialMandates::mas_default());
///
/// let draft = FinancialMandates::mas_default().with_confirmation_threshold(100.0);
/// registry.stage(draft).unwrap();
/// // Validation still reads the deployed profile until the draft is deployed.
/// assert_eq!(registry.active().confirmation_threshold.parameter, 50.0);
///
/// registry.deploy().unwrap();
/// assert_eq!(registry.active().confirmation_threshold.parameter, 100.0);
/// assert_eq!(registry.revision(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MandateRegistry {
    active: FinancialMandates,
    pending: Option<FinancialMandates>,
    revision: u64,
}

impl Default for MandateRegistry {
    fn default() -> Self {
        Self::new(FinancialMandates::mas_default())
    }
}

impl MandateRegistry {
    /// Start with `active` deployed at revision 0.
    pub fn new(active: FinancialMandates) -> Self {
        Self { active, pending: None, revision: 0 }
    }

    /// The deployed profile.
    pub fn active(&self) -> &FinancialMandates {
        &self.active
    }

    pub fn pending(&self) -> Option<&FinancialMandates> {
        self.pending.as_ref()
    }

    /// Number of deployments since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stage `draft` as the pending profile, replacing any earlier draft.
    ///
    /// # Errors
    ///
    /// Returns the first [`FinancialMandates::check`] failure; the previous
    /// pending draft is kept in that case.
    pub fn stage(&mut self, draft: FinancialMandates) -> GovernanceResult<()> {
        draft.check()?;
        self.pending = Some(draft);
        Ok(())
    }

    /// Promote the pending draft to the deployed profile and return the new
    /// revision.
    pub fn deploy(&mut self) -> GovernanceResult<u64> {
        let draft = self.pending.take().ok_or(GovernanceError::NoPendingProfile)?;
        self.active = draft;
        self.revision += 1;
        info!(revision = self.revision, "deployed mandate profile");
        Ok(self.revision)
    }

    /// Drop the pending draft, returning it.
    pub fn discard(&mut self) -> Option<FinancialMandates> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_without_pending_fails() {
        let mut registry = MandateRegistry::default();
        assert_eq!(registry.deploy(), Err(GovernanceError::NoPendingProfile));
        assert_eq!(registry.revision(), 0);
    }

    #[test]
    fn test_invalid_draft_keeps_previous_pending() {
        let mut registry = MandateRegistry::default();
        let good = FinancialMandates::mas_default().with_rate_limit_per_hour(10);
        registry.stage(good.clone()).unwrap();

        let mut bad = FinancialMandates::mas_default();
        bad.allowed_methods.id = bad.blocked_categories.id.clone();
        assert!(registry.stage(bad).is_err());
        assert_eq!(registry.pending(), Some(&good));
    }

    #[test]
    fn test_discard_clears_pending() {
        let mut registry = MandateRegistry::default();
        registry.stage(FinancialMandates::mas_default()).unwrap();
        assert!(registry.discard().is_some());
        assert!(registry.pending().is_none());
        assert!(registry.deploy().is_err());
    }
}
