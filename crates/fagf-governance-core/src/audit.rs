// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Decision audit trail.
//!
//! [`AuditLog`] exposes three operations only:
//!
//! * [`log`](AuditLog::log)                   : record a verdict or a human decision
//! * [`query`](AuditLog::query)               : filter the trail
//! * [`verify_chain`](AuditLog::verify_chain) : recompute the hash chain
//!
//! Records are chained via a structural FNV-1a hash so that an edited or
//! dropped record is detectable.  The hash is not a signature; entries are
//! not cryptographically signed.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::session::ProposalId;
use crate::types::{GovernanceEnvelope, ValidationResult};

/// Hash of the (virtual) record preceding the first one.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// What happened to a proposal at the time the record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Cleared every mandate and was committed to history.
    AutoApproved,
    /// Parked for a human decision.
    Escalated,
    /// Hard-blocked.
    Blocked,
    /// A human approved a parked proposal; it was committed to history.
    HumanApproved,
    /// A human rejected a parked proposal.
    HumanRejected,
    /// A parked proposal aged out before anyone decided on it.
    Expired,
}

/// An immutable entry in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    /// Zero-based position in the trail.
    pub sequence: u64,
    pub outcome: AuditOutcome,
    /// Set for records that belong to a HITL proposal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<ProposalId>,
    pub merchant_name: String,
    pub amount: f64,
    pub triggered_mandates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Unix epoch milliseconds at which the record was appended.
    pub timestamp_ms: u64,
    pub hash: String,
    pub prev_hash: String,
}

/// Filter used to narrow the results of [`AuditLog::query`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// If set, only return records with this outcome.
    pub outcome: Option<AuditOutcome>,
    /// If set, only return records at or after this Unix epoch millisecond.
    pub since_ms: Option<u64>,
    /// If set, only return records at or before this Unix epoch millisecond.
    pub until_ms: Option<u64>,
    /// If set, limit the number of returned records.
    pub limit: Option<usize>,
}

/// Append-only, hash-chained log of governance outcomes.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::{
///     audit::{AuditFilter, AuditLog, AuditOutcome},
///     types::{EnvelopeContext, GovernanceEnvelope, Transaction, ValidationResult},
/// };
///
/// let envelope = GovernanceEnvelope {
///     transaction: Transaction {
///         amount: 15.0,
///         destination: "aws_devops".into(),
///         merchant_name: "AWS Cloud Services".into(),
///         category: "SaaS / API".into(),
///         timestamp: 0,
///         payment_method: "PayNow".into(),
///     },
///     reasoning: "Cost optimization".into(),
///     context: EnvelopeContext::default(),
/// };
///
/// let mut log = AuditLog::new();
/// log.log(AuditOutcome::AutoApproved, None, &envelope, &ValidationResult::approved(), 0);
///
/// assert_eq!(log.query(&AuditFilter::default()).len(), 1);
/// assert!(log.verify_chain());
/// ```
#[derive(Debug, Clone)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
    /// Hash of the most recently appended record.
    last_hash: String,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditLog {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            last_hash: GENESIS_HASH.into(),
        }
    }

    /// Append a record describing `outcome` for `envelope`.
    pub fn log(
        &mut self,
        outcome: AuditOutcome,
        proposal_id: Option<ProposalId>,
        envelope: &GovernanceEnvelope,
        result: &ValidationResult,
        timestamp_ms: u64,
    ) -> &AuditRecord {
        let mut record = AuditRecord {
            sequence: self.records.len() as u64,
            outcome,
            proposal_id,
            merchant_name: envelope.transaction.merchant_name.clone(),
            amount: envelope.transaction.amount,
            triggered_mandates: result.triggered_mandates.clone(),
            reason: result.reason.clone(),
            timestamp_ms,
            hash: String::new(),
            prev_hash: self.last_hash.clone(),
        };
        record.hash = compute_hash(&record);

        self.last_hash = record.hash.clone();
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Return all records that satisfy `filter`, oldest first.
    pub fn query(&self, filter: &AuditFilter) -> Vec<AuditRecord> {
        self.records
            .iter()
            .filter(|record| {
                if let Some(outcome) = filter.outcome {
                    if record.outcome != outcome {
                        return false;
                    }
                }
                if let Some(since_ms) = filter.since_ms {
                    if record.timestamp_ms < since_ms {
                        return false;
                    }
                }
                if let Some(until_ms) = filter.until_ms {
                    if record.timestamp_ms > until_ms {
                        return false;
                    }
                }
                true
            })
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Recompute every hash and check each record links to its predecessor.
    pub fn verify_chain(&self) -> bool {
        let mut expected_prev = GENESIS_HASH;
        for record in &self.records {
            if record.prev_hash != expected_prev || record.hash != compute_hash(record) {
                return false;
            }
            expected_prev = &record.hash;
        }
        true
    }

    /// The hash of the most recently appended record.
    pub fn chain_tip(&self) -> &str {
        &self.last_hash
    }

    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Hash chain implementation
// ---------------------------------------------------------------------------

/// FNV-1a 64 over the record's content and `prev_hash`, rendered as 64 hex
/// characters.  The record's own `hash` field is excluded.
fn compute_hash(record: &AuditRecord) -> String {
    let payload = format!(
        "{}:{}:{:?}:{:?}:{}:{}:{}:{}:{}",
        record.prev_hash,
        record.sequence,
        record.outcome,
        record.proposal_id.map(|id| id.0),
        record.merchant_name,
        record.amount,
        record.triggered_mandates.join(","),
        record.reason.as_deref().unwrap_or(""),
        record.timestamp_ms,
    );
    let hex16 = format!("{:016x}", fnv1a_64(payload.as_bytes()));
    hex16.repeat(4)
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14_695_981_039_346_656_037;
    const FNV_PRIME: u64 = 1_099_511_628_211;
    let mut hash = FNV_OFFSET;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnvelopeContext, Transaction};

    fn envelope(merchant: &str) -> GovernanceEnvelope {
        GovernanceEnvelope {
            transaction: Transaction {
                amount: 12.5,
                destination: "dest".into(),
                merchant_name: merchant.into(),
                category: "SaaS / API".into(),
                timestamp: 0,
                payment_method: "PayNow".into(),
            },
            reasoning: String::new(),
            context: EnvelopeContext::default(),
        }
    }

    #[test]
    fn test_chain_links_records() {
        let mut log = AuditLog::new();
        let approved = ValidationResult::approved();
        log.log(AuditOutcome::AutoApproved, None, &envelope("a"), &approved, 10);
        log.log(AuditOutcome::AutoApproved, None, &envelope("b"), &approved, 20);

        let records = log.records();
        assert_eq!(records[0].prev_hash, GENESIS_HASH);
        assert_eq!(records[1].prev_hash, records[0].hash);
        assert_eq!(log.chain_tip(), records[1].hash);
        assert_eq!(records[1].hash.len(), 64);
        assert!(log.verify_chain());
    }

    #[test]
    fn test_tampering_breaks_chain() {
        let mut log = AuditLog::new();
        let approved = ValidationResult::approved();
        log.log(AuditOutcome::AutoApproved, None, &envelope("a"), &approved, 10);
        log.log(AuditOutcome::AutoApproved, None, &envelope("b"), &approved, 20);

        log.records[0].amount = 9_999.0;
        assert!(!log.verify_chain());
    }

    #[test]
    fn test_query_filters_by_outcome_and_time() {
        let mut log = AuditLog::new();
        let approved = ValidationResult::approved();
        log.log(AuditOutcome::AutoApproved, None, &envelope("a"), &approved, 10);
        log.log(AuditOutcome::Blocked, None, &envelope("b"), &approved, 20);
        log.log(AuditOutcome::AutoApproved, None, &envelope("c"), &approved, 30);

        let approved_only = log.query(&AuditFilter {
            outcome: Some(AuditOutcome::AutoApproved),
            ..AuditFilter::default()
        });
        assert_eq!(approved_only.len(), 2);

        let window = log.query(&AuditFilter {
            since_ms: Some(15),
            until_ms: Some(30),
            limit: Some(1),
            ..AuditFilter::default()
        });
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].merchant_name, "b");
    }
}
