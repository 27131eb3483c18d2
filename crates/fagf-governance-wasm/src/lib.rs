// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! # fagf-governance-wasm
//!
//! WebAssembly bindings for the FAGF mandate validator.
//!
//! This crate exposes the `fagf-governance-core` API to JavaScript and
//! TypeScript consumers running in browser or edge-worker environments via
//! `wasm-bindgen`.  All structured values cross the boundary as JSON strings
//! using the camelCase wire shapes of the core types.
//!
//! ## Architecture
//!
//! Each session handle wraps a [`GovernanceSession<FixedClock>`].  Sessions
//! are stored in a thread-local registry keyed by integer handles because
//! WASM is single-threaded and `wasm_bindgen` cannot export opaque Rust
//! structs across the JS boundary without serialisation overhead.
//!
//! The browser has no usable `SystemTime`, so every time-dependent call takes
//! `now_ms` from the caller (`Date.now()`).
//!
//! ## Exported Functions
//!
//! | Function                      | Description                                         |
//! |-------------------------------|-----------------------------------------------------|
//! | `default_mandates`            | The reference mandate profile as JSON               |
//! | `validate`                    | Stateless validation (JSON in, JSON out)            |
//! | `create_session`              | Create a session over the reference profile         |
//! | `create_session_with_profile` | Create a session from JSON options and mandates     |
//! | `destroy_session`             | Release a session handle                            |
//! | `context_for`                 | Compute the envelope context for a merchant         |
//! | `propose`                     | Validate and act on an envelope                     |
//! | `approve` / `reject`          | Resolve a proposal awaiting a human                 |
//! | `pending_approvals`           | List proposals awaiting a human                     |
//! | `stage_mandates` / `deploy`   | Draft/deploy a new mandate profile                  |
//! | `get_audit_trail`             | Return the full audit trail as a JSON array         |
//! | `query_audit`                 | Query the audit trail with a JSON filter            |
//!
//! Failures are reported as `{"error":"..."}`.
//!
//! ## JavaScript Usage
//!
//! ```js
//! import init, { create_session, context_for, propose, approve } from '@fagf/governance-wasm';
//!
//! await init();
//!
//! const handle = create_session();
//! const context = JSON.parse(context_for(handle, 'Singapore Airlines', 2.0));
//!
//! const outcome = JSON.parse(propose(handle, JSON.stringify({
//!   transaction: {
//!     amount: 1250,
//!     destination: 'singapore_airlines',
//!     merchantName: 'Singapore Airlines',
//!     category: 'Travel / Logistics',
//!     timestamp: Date.now(),
//!     paymentMethod: 'PayNow',
//!   },
//!   reasoning: 'Urgent talent relocation for project launch',
//!   context,
//! }), Date.now()));
//!
//! if (outcome.verdict === 'approval_required') {
//!   approve(handle, outcome.proposalId, Date.now());
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;

use fagf_governance_core::{
    audit::AuditFilter,
    clock::FixedClock,
    session::PendingApproval,
    Config, FinancialMandates, GovernanceEnvelope, GovernanceSession, GovernanceValidator,
    ProposalId, ProposalOutcome, TransactionHistory, ValidationResult, Verdict,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

type Session = GovernanceSession<FixedClock>;

// ---------------------------------------------------------------------------
// Session registry
// ---------------------------------------------------------------------------

// WASM is single-threaded; RefCell<HashMap<...>> is safe here.
thread_local! {
    static SESSIONS: RefCell<HashMap<u32, Session>> = RefCell::new(HashMap::new());
    static NEXT_HANDLE: RefCell<u32> = const { RefCell::new(0) };
}

/// Allocate a new session handle. Handles wrap around at `u32::MAX - 1` to
/// reserve `u32::MAX` as the error sentinel.
fn next_handle() -> u32 {
    NEXT_HANDLE.with(|counter| {
        let handle = *counter.borrow();
        let next = if handle >= u32::MAX - 1 { 0 } else { handle + 1 };
        *counter.borrow_mut() = next;
        handle
    })
}

fn register(session: Session) -> u32 {
    let handle = next_handle();
    SESSIONS.with(|sessions| {
        sessions.borrow_mut().insert(handle, session);
    });
    handle
}

/// Run a closure with mutable access to a session, pinning its clock to
/// `now_ms` first.
fn with_session_at<F, R>(handle: u32, now_ms: f64, callback: F) -> Result<R, String>
where
    F: FnOnce(&mut Session) -> R,
{
    SESSIONS.with(|sessions| {
        let mut map = sessions.borrow_mut();
        match map.get_mut(&handle) {
            Some(session) => {
                session.clock().set(epoch_ms(now_ms));
                Ok(callback(session))
            }
            None => Err(format!("unknown session handle {}", handle)),
        }
    })
}

fn with_session<F, R>(handle: u32, callback: F) -> Result<R, String>
where
    F: FnOnce(&mut Session) -> R,
{
    SESSIONS.with(|sessions| {
        let mut map = sessions.borrow_mut();
        match map.get_mut(&handle) {
            Some(session) => Ok(callback(session)),
            None => Err(format!("unknown session handle {}", handle)),
        }
    })
}

/// JS numbers are f64; negative and NaN instants clamp to zero.
fn epoch_ms(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        now_ms as u64
    } else {
        0
    }
}

fn error_json(message: impl Display) -> String {
    serde_json::json!({ "error": message.to_string() }).to_string()
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|error| error_json(format!("serialisation error: {}", error)))
}

fn respond<T: Serialize>(outcome: Result<T, String>) -> String {
    match outcome {
        Ok(value) => to_json(&value),
        Err(error) => error_json(error),
    }
}

/// Wire shape of a [`ProposalOutcome`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProposalResponse<'a> {
    verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    proposal_id: Option<ProposalId>,
    result: &'a ValidationResult,
}

impl<'a> From<&'a ProposalOutcome> for ProposalResponse<'a> {
    fn from(outcome: &'a ProposalOutcome) -> Self {
        Self {
            verdict: outcome.result().verdict(),
            proposal_id: outcome.proposal_id(),
            result: outcome.result(),
        }
    }
}

/// Wire shape of a [`PendingApproval`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingResponse<'a> {
    id: ProposalId,
    envelope: &'a GovernanceEnvelope,
    result: &'a ValidationResult,
    proposed_at_ms: u64,
}

impl<'a> From<&'a PendingApproval> for PendingResponse<'a> {
    fn from(pending: &'a PendingApproval) -> Self {
        Self {
            id: pending.id,
            envelope: &pending.envelope,
            result: &pending.result,
            proposed_at_ms: pending.proposed_at_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Stateless validation
// ---------------------------------------------------------------------------

/// The reference mandate profile as JSON.
#[wasm_bindgen]
pub fn default_mandates() -> String {
    to_json(&FinancialMandates::mas_default())
}

/// Validate one envelope without a session.
///
/// `history_json` is an array of accepted envelopes in any order.  Returns a
/// JSON-serialised [`ValidationResult`].
#[wasm_bindgen]
pub fn validate(envelope_json: &str, mandates_json: &str, history_json: &str, now_ms: f64) -> String {
    let envelope: GovernanceEnvelope = match serde_json::from_str(envelope_json) {
        Ok(envelope) => envelope,
        Err(error) => return error_json(format!("envelope parse error: {}", error)),
    };
    let mandates: FinancialMandates = match serde_json::from_str(mandates_json) {
        Ok(mandates) => mandates,
        Err(error) => return error_json(format!("mandates parse error: {}", error)),
    };
    let entries: Vec<GovernanceEnvelope> = match serde_json::from_str(history_json) {
        Ok(entries) => entries,
        Err(error) => return error_json(format!("history parse error: {}", error)),
    };

    let history = TransactionHistory::from_unordered(entries);
    to_json(&GovernanceValidator::validate_at(
        &envelope,
        &mandates,
        &history,
        epoch_ms(now_ms),
    ))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a session over the reference profile and return its handle.
#[wasm_bindgen]
pub fn create_session() -> u32 {
    register(GovernanceSession::new(
        FinancialMandates::mas_default(),
        FixedClock::default(),
    ))
}

/// Create a session with explicit validator options and mandates.
///
/// `config_json` must match the [`Config`] shape, e.g.
/// `{"enforce_daily_aggregate":true}`; `mandates_json` the
/// [`FinancialMandates`] shape.  Returns `u32::MAX` on parse error or if the
/// mandates fail their consistency check.
#[wasm_bindgen]
pub fn create_session_with_profile(config_json: &str, mandates_json: &str) -> u32 {
    let config: Config = match serde_json::from_str(config_json) {
        Ok(config) => config,
        Err(_) => return u32::MAX,
    };
    let mandates: FinancialMandates = match serde_json::from_str(mandates_json) {
        Ok(mandates) => mandates,
        Err(_) => return u32::MAX,
    };
    if mandates.check().is_err() {
        return u32::MAX;
    }
    register(GovernanceSession::with_config(config, mandates, FixedClock::default()))
}

/// Release the session associated with `handle`.
#[wasm_bindgen]
pub fn destroy_session(handle: u32) {
    SESSIONS.with(|sessions| {
        sessions.borrow_mut().remove(&handle);
    });
}

// ---------------------------------------------------------------------------
// Proposals
// ---------------------------------------------------------------------------

/// JSON [`EnvelopeContext`](fagf_governance_core::EnvelopeContext) for a
/// proposal to `merchant_name`, derived from the session's history.
#[wasm_bindgen]
pub fn context_for(handle: u32, merchant_name: &str, risk_score: f64) -> String {
    respond(with_session(handle, |session| session.context_for(merchant_name, risk_score)))
}

/// Validate an envelope against the deployed profile and act on the verdict.
///
/// Returns `{"verdict":..., "proposalId":..., "result":{...}}`; `proposalId`
/// is present only when the verdict is `approval_required`.
#[wasm_bindgen]
pub fn propose(handle: u32, envelope_json: &str, now_ms: f64) -> String {
    let envelope: GovernanceEnvelope = match serde_json::from_str(envelope_json) {
        Ok(envelope) => envelope,
        Err(error) => return error_json(format!("envelope parse error: {}", error)),
    };
    match with_session_at(handle, now_ms, |session| {
        let outcome = session.propose(envelope);
        to_json(&ProposalResponse::from(&outcome))
    }) {
        Ok(json) => json,
        Err(error) => error_json(error),
    }
}

/// Approve a parked proposal; returns the committed envelope.
///
/// `proposal_id` is the full 64-bit id (a `BigInt` on the JS side).
#[wasm_bindgen]
pub fn approve(handle: u32, proposal_id: u64, now_ms: f64) -> String {
    match with_session_at(handle, now_ms, |session| {
        session.approve(ProposalId(proposal_id))
    }) {
        Ok(Ok(envelope)) => to_json(&envelope),
        Ok(Err(error)) => error_json(error),
        Err(error) => error_json(error),
    }
}

/// Reject a parked proposal; returns the discarded approval.
#[wasm_bindgen]
pub fn reject(handle: u32, proposal_id: u64, now_ms: f64) -> String {
    match with_session_at(handle, now_ms, |session| {
        session
            .reject(ProposalId(proposal_id))
            .map(|pending| to_json(&PendingResponse::from(&pending)))
    }) {
        Ok(Ok(json)) => json,
        Ok(Err(error)) => error_json(error),
        Err(error) => error_json(error),
    }
}

/// Proposals awaiting a human, oldest first.
#[wasm_bindgen]
pub fn pending_approvals(handle: u32) -> String {
    match with_session(handle, |session| {
        let pending: Vec<PendingResponse<'_>> = session
            .pending_approvals()
            .into_iter()
            .map(PendingResponse::from)
            .collect();
        to_json(&pending)
    }) {
        Ok(json) => json,
        Err(_) => "[]".into(),
    }
}

// ---------------------------------------------------------------------------
// Mandate profiles
// ---------------------------------------------------------------------------

/// Stage a draft profile.  Returns `{"staged":true}` or an error object.
#[wasm_bindgen]
pub fn stage_mandates(handle: u32, mandates_json: &str) -> String {
    let draft: FinancialMandates = match serde_json::from_str(mandates_json) {
        Ok(draft) => draft,
        Err(error) => return error_json(format!("mandates parse error: {}", error)),
    };
    match with_session(handle, |session| session.registry_mut().stage(draft)) {
        Ok(Ok(())) => serde_json::json!({ "staged": true }).to_string(),
        Ok(Err(error)) => error_json(error),
        Err(error) => error_json(error),
    }
}

/// Deploy the staged draft.  Returns `{"revision":n}` or an error object.
#[wasm_bindgen]
pub fn deploy(handle: u32) -> String {
    match with_session(handle, |session| session.registry_mut().deploy()) {
        Ok(Ok(revision)) => serde_json::json!({ "revision": revision }).to_string(),
        Ok(Err(error)) => error_json(error),
        Err(error) => error_json(error),
    }
}

// ---------------------------------------------------------------------------
// Audit trail
// ---------------------------------------------------------------------------

/// Return the full audit trail as a JSON array.
///
/// Returns `"[]"` on error or if the trail is empty.
#[wasm_bindgen]
pub fn get_audit_trail(handle: u32) -> String {
    with_session(handle, |session| to_json(session.audit().records()))
        .unwrap_or_else(|_| "[]".into())
}

/// Query the audit trail.  `filter_json` must match the [`AuditFilter`]
/// shape; pass `"{}"` to retrieve all records.
#[wasm_bindgen]
pub fn query_audit(handle: u32, filter_json: &str) -> String {
    let filter: AuditFilter = serde_json::from_str(filter_json).unwrap_or_default();
    with_session(handle, |session| to_json(&session.audit().query(&filter)))
        .unwrap_or_else(|_| "[]".into())
}

// ---------------------------------------------------------------------------
// wasm-bindgen-test
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Native unit tests (run with `cargo test` outside of WASM)
// ---------------------------------------------------------------------------
