// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! # fagf-governance-core
//!
//! Mandate evaluation engine for governed agentic payments.
//!
//! Given a proposed transaction from an autonomous agent, the validator
//! decides whether to approve it automatically, escalate it to a human
//! (HITL), or block it outright, based on a fixed set of configurable
//! mandates: spending limits, merchant trust, category restrictions and
//! velocity limits.
//!
//! This crate is `no_std`-compatible (requires `alloc`).  Enable the `std`
//! feature (on by default) to evaluate against the wall clock.
//!
//! ## Architecture
//!
//! ```text
//! GovernanceValidator          : pure (envelope, mandates, history, now) → verdict
//! GovernanceSession<C: Clock>
//!   ├── MandateRegistry        : deployed profile + pending draft
//!   ├── TransactionHistory     : accepted envelopes, newest first
//!   ├── pending approvals      : HITL proposals awaiting a human
//!   └── AuditLog               : hash-chained decision trail
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fagf_governance_core::{
//!     history::TransactionHistory,
//!     types::{EnvelopeContext, FinancialMandates, GovernanceEnvelope, Transaction},
//!     validator::GovernanceValidator,
//! };
//!
//! let now = 1_700_000_000_000;
//! let envelope = GovernanceEnvelope {
//!     transaction: Transaction {
//!         amount: 15.0,
//!         destination: "aws_devops".into(),
//!         merchant_name: "AWS Cloud Services".into(),
//!         category: "SaaS / API".into(),
//!         timestamp: now,
//!         payment_method: "PayNow".into(),
//!     },
//!     reasoning: "Cost optimization through automated resource scaling".into(),
//!     context: EnvelopeContext { is_new_merchant: false, history_depth: 24, risk_score: 1.0 },
//! };
//!
//! let result = GovernanceValidator::validate_at(
//!     &envelope,
//!     &FinancialMandates::mas_default(),
//!     &TransactionHistory::new(),
//!     now,
//! );
//! assert!(result.allowed);
//! assert!(result.triggered_mandates.is_empty());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod async_session;
pub mod audit;
pub mod clock;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod history;
pub mod mandates;
pub mod registry;
pub mod session;
pub mod types;
pub mod validator;

// Re-export the most commonly used items at the crate root so consumers can
// write `use fagf_governance_core::GovernanceValidator;` instead of the fully
// qualified path.
pub use config::Config;
pub use error::{GovernanceError, GovernanceResult};
pub use history::{HistoryView, TransactionHistory};
pub use session::{GovernanceSession, ProposalId, ProposalOutcome};
pub use types::{
    EnforcementAction, EnvelopeContext, FinancialMandates, GovernanceCategory,
    GovernanceEnvelope, Mandate, Severity, Transaction, ValidationResult, Verdict,
};
pub use validator::GovernanceValidator;
