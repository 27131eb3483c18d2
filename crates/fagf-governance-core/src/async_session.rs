// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Async governance session backed by Tokio.
//!
//! This module is only compiled when the `async` feature flag is enabled:
//!
//! ```toml
//! [dependencies]
//! fagf-governance-core = { version = "0.1", features = ["async"] }
//! ```
//!
//! # Design
//!
//! The rate-limit and cooldown mandates assume a consistent snapshot of
//! history at the instant of evaluation.  When several tasks propose on
//! behalf of the same agent, evaluating and appending must therefore happen
//! under one lock.  [`AsyncGovernanceSession`] wraps a
//! [`GovernanceSession`] in a [`tokio::sync::Mutex`]; every operation holds
//! the lock for its full read-then-append step.
//!
//! Handles are cheap to clone and all clones share the same session.
//!
//! # Example
//!
//! ```rust,no_run
//! use fagf_governance_core::{
//!     async_session::AsyncGovernanceSession,
//!     clock::SystemClock,
//!     session::GovernanceSession,
//!     types::{FinancialMandates, GovernanceEnvelope, Transaction},
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = AsyncGovernanceSession::new(GovernanceSession::new(
//!         FinancialMandates::mas_default(),
//!         SystemClock,
//!     ));
//!
//!     let context = session.context_for("AWS Cloud Services", 1.0).await;
//!     let envelope = GovernanceEnvelope {
//!         transaction: Transaction {
//!             amount: 15.0,
//!             destination: "aws_devops".into(),
//!             merchant_name: "AWS Cloud Services".into(),
//!             category: "SaaS / API".into(),
//!             timestamp: fagf_governance_core::clock::current_time_ms(),
//!             payment_method: "PayNow".into(),
//!         },
//!         reasoning: "Cost optimization".into(),
//!         context,
//!     };
//!     let outcome = session.propose(envelope).await;
//!     println!("{:?}", outcome.result().verdict());
//! }
//! ```

#![cfg(feature = "async")]

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::audit::{AuditFilter, AuditRecord};
use crate::clock::Clock;
use crate::error::GovernanceResult;
use crate::session::{GovernanceSession, PendingApproval, ProposalId, ProposalOutcome};
use crate::types::{EnvelopeContext, FinancialMandates, GovernanceEnvelope};

/// Shared, lock-protected [`GovernanceSession`].
pub struct AsyncGovernanceSession<C: Clock> {
    inner: Arc<Mutex<GovernanceSession<C>>>,
}

impl<C: Clock> Clone for AsyncGovernanceSession<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Clock> AsyncGovernanceSession<C> {
    pub fn new(session: GovernanceSession<C>) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    /// Validate and act on `envelope` while holding the session lock.
    pub async fn propose(&self, envelope: GovernanceEnvelope) -> ProposalOutcome {
        self.inner.lock().await.propose(envelope)
    }

    pub async fn approve(&self, id: ProposalId) -> GovernanceResult<GovernanceEnvelope> {
        self.inner.lock().await.approve(id)
    }

    pub async fn reject(&self, id: ProposalId) -> GovernanceResult<PendingApproval> {
        self.inner.lock().await.reject(id)
    }

    /// Discard parked proposals older than `max_age_secs`.
    pub async fn expire_pending(&self, max_age_secs: u64) -> Vec<PendingApproval> {
        self.inner.lock().await.expire_pending(max_age_secs)
    }

    pub async fn context_for(&self, merchant_name: &str, risk_score: f64) -> EnvelopeContext {
        self.inner.lock().await.context_for(merchant_name, risk_score)
    }

    /// Stage a draft profile.
    pub async fn stage(&self, draft: FinancialMandates) -> GovernanceResult<()> {
        self.inner.lock().await.registry_mut().stage(draft)
    }

    /// Deploy the staged draft.
    pub async fn deploy(&self) -> GovernanceResult<u64> {
        self.inner.lock().await.registry_mut().deploy()
    }

    pub async fn history_len(&self) -> usize {
        self.inner.lock().await.history().len()
    }

    pub async fn pending_ids(&self) -> Vec<ProposalId> {
        self.inner
            .lock()
            .await
            .pending_approvals()
            .into_iter()
            .map(|approval| approval.id)
            .collect()
    }

    pub async fn query_audit(&self, filter: &AuditFilter) -> Vec<AuditRecord> {
        self.inner.lock().await.audit().query(filter)
    }

    /// Run `callback` with exclusive access to the session.
    pub async fn with_session<F, R>(&self, callback: F) -> R
    where
        F: FnOnce(&mut GovernanceSession<C>) -> R,
    {
        let mut session = self.inner.lock().await;
        callback(&mut session)
    }
}
