// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Accepted-transaction history.
//!
//! The validator only ever asks history four questions, captured by
//! [`HistoryView`].  Two implementations ship with this crate:
//!
//! * `[GovernanceEnvelope]`: a caller-maintained slice.  Index 0 must be the
//!   most recent entry; the ordering is a caller contract and is not
//!   re-validated.
//! * [`TransactionHistory`]: an owned log that keeps itself newest-first
//!   on every insert, so the ordering invariant lives in one place.
//!
//! History must only ever contain *accepted* envelopes (auto-approved or
//! human-approved), never pending or rejected ones.

use alloc::vec::Vec;

use crate::types::GovernanceEnvelope;

/// Read-only queries the validator runs against accepted history.
pub trait HistoryView {
    /// The most recently accepted envelope, if any.
    fn most_recent(&self) -> Option<&GovernanceEnvelope>;

    /// Number of entries whose timestamp is at or after `from_ms`.
    fn count_since(&self, from_ms: u64) -> usize;

    /// Sum of amounts whose timestamp is at or after `from_ms`.
    fn total_amount_since(&self, from_ms: u64) -> f64;

    /// Whether any accepted entry paid `merchant_name` (exact match).
    fn contains_merchant(&self, merchant_name: &str) -> bool;
}

impl HistoryView for [GovernanceEnvelope] {
    fn most_recent(&self) -> Option<&GovernanceEnvelope> {
        self.first()
    }

    fn count_since(&self, from_ms: u64) -> usize {
        self.iter()
            .filter(|entry| entry.transaction.timestamp >= from_ms)
            .count()
    }

    fn total_amount_since(&self, from_ms: u64) -> f64 {
        self.iter()
            .filter(|entry| entry.transaction.timestamp >= from_ms)
            .map(|entry| entry.transaction.amount)
            .sum()
    }

    fn contains_merchant(&self, merchant_name: &str) -> bool {
        self.iter()
            .any(|entry| entry.transaction.merchant_name == merchant_name)
    }
}

impl HistoryView for Vec<GovernanceEnvelope> {
    fn most_recent(&self) -> Option<&GovernanceEnvelope> {
        self.as_slice().most_recent()
    }

    fn count_since(&self, from_ms: u64) -> usize {
        self.as_slice().count_since(from_ms)
    }

    fn total_amount_since(&self, from_ms: u64) -> f64 {
        self.as_slice().total_amount_since(from_ms)
    }

    fn contains_merchant(&self, merchant_name: &str) -> bool {
        self.as_slice().contains_merchant(merchant_name)
    }
}

/// An append-only history that maintains newest-first ordering itself.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::history::{HistoryView, TransactionHistory};
/// use fagf_governance_core::types::{EnvelopeContext, GovernanceEnvelope, Transaction};
///
/// fn at(timestamp: u64) -> GovernanceEnvelope {
///     GovernanceEnvelope {
///         transaction: Transaction {
///             amount: 10.0,
///             destination: "aws_devops".into(),
///             merchant_name: "AWS Cloud Services".into(),
///             category: "SaaS / API".into(),
///             timestamp,
///             payment_method: "PayNow".into(),
///         },
///         reasoning: String::new(),
///         context: EnvelopeContext::default(),
///     }
/// }
///
/// let mut history = TransactionHistory::new();
/// history.record(at(2_000));
/// history.record(at(1_000)); // late arrival, still ordered
/// assert_eq!(history.most_recent().unwrap().transaction.timestamp, 2_000);
/// assert_eq!(history.count_since(1_500), 1);
/// assert_eq!(history.count_since(1_000), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionHistory {
    /// Newest first.
    entries: Vec<GovernanceEnvelope>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from envelopes in any order.
    pub fn from_unordered<I>(envelopes: I) -> Self
    where
        I: IntoIterator<Item = GovernanceEnvelope>,
    {
        let mut history = Self::new();
        for envelope in envelopes {
            history.record(envelope);
        }
        history
    }

    /// Insert an accepted envelope at its ordered position.
    ///
    /// An entry whose timestamp ties an existing one is placed ahead of it,
    /// i.e. the later insert counts as more recent.
    pub fn record(&mut self, envelope: GovernanceEnvelope) {
        let timestamp = envelope.transaction.timestamp;
        let position = self
            .entries
            .partition_point(|existing| existing.transaction.timestamp > timestamp);
        self.entries.insert(position, envelope);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> core::slice::Iter<'_, GovernanceEnvelope> {
        self.entries.iter()
    }

    /// Newest-first slice, suitable for callers that still pass history as a
    /// plain sequence.
    pub fn as_slice(&self) -> &[GovernanceEnvelope] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl HistoryView for TransactionHistory {
    fn most_recent(&self) -> Option<&GovernanceEnvelope> {
        self.entries.first()
    }

    fn count_since(&self, from_ms: u64) -> usize {
        // Newest first, so the matching entries form a prefix.
        self.entries
            .partition_point(|entry| entry.transaction.timestamp >= from_ms)
    }

    fn total_amount_since(&self, from_ms: u64) -> f64 {
        self.entries
            .iter()
            .take_while(|entry| entry.transaction.timestamp >= from_ms)
            .map(|entry| entry.transaction.amount)
            .sum()
    }

    fn contains_merchant(&self, merchant_name: &str) -> bool {
        self.as_slice().contains_merchant(merchant_name)
    }
}

impl<'a> IntoIterator for &'a TransactionHistory {
    type Item = &'a GovernanceEnvelope;
    type IntoIter = core::slice::Iter<'a, GovernanceEnvelope>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
