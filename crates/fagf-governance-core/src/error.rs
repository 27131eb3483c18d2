// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Error taxonomy for configuration and session operations.
//!
//! The validator itself is infallible: every well-formed input produces a
//! [`ValidationResult`](crate::types::ValidationResult).  These errors come
//! from staging mandate profiles and from driving a
//! [`GovernanceSession`](crate::session::GovernanceSession).

use alloc::string::String;
use thiserror::Error;

use crate::session::ProposalId;

/// Errors surfaced by profile staging and session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GovernanceError {
    /// Two mandates in one profile share an id.
    #[error("duplicate mandate id '{0}'")]
    DuplicateMandateId(String),

    /// A mandate carries an empty id.
    #[error("mandate in slot '{slot}' has an empty id")]
    EmptyMandateId { slot: &'static str },

    /// A mandate parameter is outside its meaningful range.
    #[error("mandate '{id}' has an invalid parameter: {reason}")]
    InvalidParameter { id: String, reason: String },

    /// `deploy` was called with nothing staged.
    #[error("no pending mandate profile to deploy")]
    NoPendingProfile,

    /// No parked proposal carries this id.
    #[error("unknown proposal {0}")]
    UnknownProposal(ProposalId),
}

/// Result alias for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;
