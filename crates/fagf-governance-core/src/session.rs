// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Governance session: the caller loop around the validator.
//!
//! [`GovernanceSession`] owns everything the validator deliberately does
//! not: the accepted history, the deployed/pending mandate profiles, the
//! audit trail, and the queue of proposals waiting on a human.
//!
//! ## Lifecycle of a proposal
//!
//! 1. **Approved**: committed to history immediately.
//! 2. **Approval required**: parked under a [`ProposalId`] until
//!    [`approve`](GovernanceSession::approve) commits it or
//!    [`reject`](GovernanceSession::reject) discards it, or until
//!    [`expire_pending`](GovernanceSession::expire_pending) ages it out.
//! 3. **Blocked**: dropped; there is nothing to approve.
//!
//! Every step is appended to the audit trail.  Only accepted envelopes ever
//! reach history, so the velocity mandates see a consistent view.
//!
//! A session is single-owner (`&mut self`).  Concurrent callers sharing one
//! agent's history go through
//! [`AsyncGovernanceSession`](crate::async_session::AsyncGovernanceSession)
//! or their own lock, so that evaluate-then-append is serialised.

use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::audit::{AuditLog, AuditOutcome};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{GovernanceError, GovernanceResult};
use crate::history::{HistoryView, TransactionHistory};
use crate::registry::MandateRegistry;
use crate::types::{
    EnvelopeContext, FinancialMandates, GovernanceEnvelope, ValidationResult, Verdict,
};
use crate::validator::GovernanceValidator;

/// Identifier of a proposal parked for human approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalId(pub u64);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A proposal waiting on a human decision.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingApproval {
    pub id: ProposalId,
    pub envelope: GovernanceEnvelope,
    /// The HITL verdict that parked it.
    pub result: ValidationResult,
    pub proposed_at_ms: u64,
}

/// What [`GovernanceSession::propose`] did with an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ProposalOutcome {
    /// Auto-approved and committed to history.
    Committed(ValidationResult),
    /// Parked for a human.
    AwaitingApproval { id: ProposalId, result: ValidationResult },
    /// Hard-blocked and dropped.
    Blocked(ValidationResult),
}

impl ProposalOutcome {
    pub fn result(&self) -> &ValidationResult {
        match self {
            ProposalOutcome::Committed(result)
            | ProposalOutcome::AwaitingApproval { result, .. }
            | ProposalOutcome::Blocked(result) => result,
        }
    }

    pub fn proposal_id(&self) -> Option<ProposalId> {
        match self {
            ProposalOutcome::AwaitingApproval { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Stateful driver for one agent's governed spending.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::{
///     clock::FixedClock,
///     session::{GovernanceSession, ProposalOutcome},
///     types::{FinancialMandates, GovernanceEnvelope, Transaction},
/// };
///
/// let now = 1_700_000_000_000;
/// let mut session = GovernanceSession::new(FinancialMandates::mas_default(), FixedClock::new(now));
///
/// let envelope = GovernanceEnvelope {
///     transaction: Transaction {
///         amount: 1_250.0,
///         destination: "singapore_airlines".into(),
///         merchant_name: "Singapore Airlines".into(),
///         category: "Travel / Logistics".into(),
///         timestamp: now,
///         payment_method: "PayNow".into(),
///     },
///     reasoning: "Urgent talent relocation for project launch".into(),
///     context: session.context_for("Singapore Airlines", 2.0),
/// };
///
/// // New merchant: parked for a human.
/// let outcome = session.propose(envelope);
/// let id = outcome.proposal_id().unwrap();
/// assert_eq!(session.history().len(), 0);
///
/// session.approve(id).unwrap();
/// assert_eq!(session.history().len(), 1);
/// ```
pub struct GovernanceSession<C: Clock> {
    validator: GovernanceValidator,
    registry: MandateRegistry,
    history: TransactionHistory,
    pending: HashMap<ProposalId, PendingApproval>,
    audit: AuditLog,
    clock: C,
    next_id: u64,
}

#[cfg(feature = "std")]
impl GovernanceSession<crate::clock::SystemClock> {
    /// A session evaluating against the wall clock.
    pub fn system(mandates: FinancialMandates) -> Self {
        Self::new(mandates, crate::clock::SystemClock)
    }
}

impl<C: Clock> GovernanceSession<C> {
    /// A session running the reference pipeline over `mandates`.
    pub fn new(mandates: FinancialMandates, clock: C) -> Self {
        Self::with_config(Config::default(), mandates, clock)
    }

    pub fn with_config(config: Config, mandates: FinancialMandates, clock: C) -> Self {
        Self {
            validator: GovernanceValidator::with_config(config),
            registry: MandateRegistry::new(mandates),
            history: TransactionHistory::new(),
            pending: HashMap::new(),
            audit: AuditLog::new(),
            clock,
            next_id: 0,
        }
    }

    /// Seed the session with previously accepted envelopes.
    pub fn with_history(mut self, history: TransactionHistory) -> Self {
        self.history = history;
        self
    }

    /// Compute the caller-side context for a proposal to `merchant_name`.
    ///
    /// A merchant is new when no accepted envelope has paid it.
    pub fn context_for(&self, merchant_name: &str, risk_score: f64) -> EnvelopeContext {
        EnvelopeContext {
            is_new_merchant: !self.history.contains_merchant(merchant_name),
            history_depth: u32::try_from(self.history.len()).unwrap_or(u32::MAX),
            risk_score,
        }
    }

    /// Validate `envelope` against the deployed profile and act on the verdict.
    pub fn propose(&mut self, envelope: GovernanceEnvelope) -> ProposalOutcome {
        let now_ms = self.clock.now_ms();
        let result = self
            .validator
            .evaluate(&envelope, self.registry.active(), &self.history, now_ms);

        match result.verdict() {
            Verdict::Approved => {
                self.audit
                    .log(AuditOutcome::AutoApproved, None, &envelope, &result, now_ms);
                debug!(merchant = %envelope.transaction.merchant_name, "committing auto-approved envelope");
                self.history.record(envelope);
                ProposalOutcome::Committed(result)
            }
            Verdict::ApprovalRequired => {
                let id = ProposalId(self.next_id);
                self.next_id += 1;
                self.audit
                    .log(AuditOutcome::Escalated, Some(id), &envelope, &result, now_ms);
                info!(proposal = %id, merchant = %envelope.transaction.merchant_name, "proposal awaiting approval");
                self.pending.insert(
                    id,
                    PendingApproval {
                        id,
                        envelope,
                        result: result.clone(),
                        proposed_at_ms: now_ms,
                    },
                );
                ProposalOutcome::AwaitingApproval { id, result }
            }
            Verdict::Blocked => {
                self.audit
                    .log(AuditOutcome::Blocked, None, &envelope, &result, now_ms);
                ProposalOutcome::Blocked(result)
            }
        }
    }

    /// Human override: commit a parked proposal to history.
    ///
    /// # Errors
    ///
    /// [`GovernanceError::UnknownProposal`] if `id` is not parked.
    pub fn approve(&mut self, id: ProposalId) -> GovernanceResult<GovernanceEnvelope> {
        let pending = self
            .pending
            .remove(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let now_ms = self.clock.now_ms();
        self.audit.log(
            AuditOutcome::HumanApproved,
            Some(id),
            &pending.envelope,
            &pending.result,
            now_ms,
        );
        info!(proposal = %id, "proposal approved by human");
        let committed = pending.envelope.clone();
        self.history.record(pending.envelope);
        Ok(committed)
    }

    /// Human rejection: discard a parked proposal.
    pub fn reject(&mut self, id: ProposalId) -> GovernanceResult<PendingApproval> {
        let pending = self
            .pending
            .remove(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        let now_ms = self.clock.now_ms();
        self.audit.log(
            AuditOutcome::HumanRejected,
            Some(id),
            &pending.envelope,
            &pending.result,
            now_ms,
        );
        info!(proposal = %id, "proposal rejected by human");
        Ok(pending)
    }

    /// Discard parked proposals that have waited at least `max_age_secs`.
    ///
    /// Parked proposals are otherwise held until [`approve`](Self::approve)
    /// or [`reject`](Self::reject) resolves them, so long-running callers
    /// should either drain [`pending_approvals`](Self::pending_approvals) or
    /// call this periodically.  Returns the expired proposals, oldest first.
    pub fn expire_pending(&mut self, max_age_secs: u64) -> Vec<PendingApproval> {
        let now_ms = self.clock.now_ms();
        let cutoff_ms = now_ms.saturating_sub(max_age_secs.saturating_mul(1_000));
        let mut stale: Vec<ProposalId> = self
            .pending
            .values()
            .filter(|approval| approval.proposed_at_ms <= cutoff_ms)
            .map(|approval| approval.id)
            .collect();
        stale.sort();

        let mut expired = Vec::with_capacity(stale.len());
        for id in stale {
            if let Some(approval) = self.pending.remove(&id) {
                self.audit.log(
                    AuditOutcome::Expired,
                    Some(id),
                    &approval.envelope,
                    &approval.result,
                    now_ms,
                );
                info!(proposal = %id, "parked proposal expired");
                expired.push(approval);
            }
        }
        expired
    }

    /// Proposals awaiting a human, oldest first.
    pub fn pending_approvals(&self) -> Vec<&PendingApproval> {
        let mut pending: Vec<&PendingApproval> = self.pending.values().collect();
        pending.sort_by_key(|approval| approval.id);
        pending
    }

    pub fn history(&self) -> &TransactionHistory {
        &self.history
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn registry(&self) -> &MandateRegistry {
        &self.registry
    }

    /// Stage, deploy or discard mandate profiles.
    pub fn registry_mut(&mut self) -> &mut MandateRegistry {
        &mut self.registry
    }

    pub fn validator(&self) -> &GovernanceValidator {
        &self.validator
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
