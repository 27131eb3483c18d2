// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

use fagf_governance_core::{
    audit::{AuditFilter, AuditOutcome},
    clock::{Clock, FixedClock},
    FinancialMandates, GovernanceEnvelope, GovernanceError, GovernanceSession, ProposalId,
    ProposalOutcome, Transaction, Verdict,
};

const NOW: u64 = 1_700_000_000_000;

fn proposal(
    session: &GovernanceSession<FixedClock>,
    merchant: &str,
    amount: f64,
    category: &str,
) -> GovernanceEnvelope {
    GovernanceEnvelope {
        transaction: Transaction {
            amount,
            destination: merchant.to_ascii_lowercase().replace(' ', "_"),
            merchant_name: merchant.into(),
            category: category.into(),
            timestamp: session.clock().now_ms(),
            payment_method: "PayNow".into(),
        },
        reasoning: "scheduled spend".into(),
        context: session.context_for(merchant, 1.0),
    }
}

fn session() -> GovernanceSession<FixedClock> {
    GovernanceSession::new(
        FinancialMandates::mas_default().with_new_merchant_auth(false),
        FixedClock::new(NOW),
    )
}

#[test]
fn auto_approved_proposals_are_committed() {
    let mut session = session();
    let envelope = proposal(&session, "AWS Cloud Services", 15.0, "SaaS / API");

    let outcome = session.propose(envelope);
    assert!(matches!(outcome, ProposalOutcome::Committed(_)));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.audit().records()[0].outcome, AuditOutcome::AutoApproved);
}

#[test]
fn blocked_proposals_never_reach_history() {
    let mut session = session();
    let envelope = proposal(&session, "Binance Exchange", 50.0, "Ungoverned Gambling");

    let outcome = session.propose(envelope);
    assert_eq!(outcome.result().verdict(), Verdict::Blocked);
    assert!(outcome.proposal_id().is_none());
    assert!(session.history().is_empty());
    assert!(session.pending_approvals().is_empty());
}

#[test]
fn escalated_proposals_wait_for_a_human() {
    let mut session = session();
    let envelope = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");

    let outcome = session.propose(envelope);
    let id = outcome.proposal_id().expect("escalated");
    assert_eq!(outcome.result().triggered(), Some("fagf-limit-01"));
    assert!(session.history().is_empty());
    assert_eq!(session.pending_approvals().len(), 1);

    let committed = session.approve(id).unwrap();
    assert_eq!(committed.transaction.merchant_name, "Singapore Airlines");
    assert_eq!(session.history().len(), 1);
    assert!(session.pending_approvals().is_empty());

    // Already resolved.
    assert_eq!(session.approve(id), Err(GovernanceError::UnknownProposal(id)));
}

#[test]
fn rejected_proposals_are_discarded() {
    let mut session = session();
    let envelope = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");
    let id = session.propose(envelope).proposal_id().unwrap();

    let rejected = session.reject(id).unwrap();
    assert_eq!(rejected.id, id);
    assert!(session.history().is_empty());

    let rejections = session.audit().query(&AuditFilter {
        outcome: Some(AuditOutcome::HumanRejected),
        ..AuditFilter::default()
    });
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0].proposal_id, Some(id));
}

#[test]
fn unknown_proposal_is_an_error() {
    let mut session = session();
    assert_eq!(
        session.reject(ProposalId(42)).unwrap_err(),
        GovernanceError::UnknownProposal(ProposalId(42))
    );
}

#[test]
fn committed_history_drives_cooldown_and_rate_limit() {
    let mut session = session();

    let first = proposal(&session, "AWS Cloud Services", 10.0, "SaaS / API");
    assert!(session.propose(first).result().allowed);

    session.clock().advance_secs(30);
    let second = proposal(&session, "AWS Cloud Services", 10.0, "SaaS / API");
    let outcome = session.propose(second);
    assert_eq!(outcome.result().triggered(), Some("fagf-velocity-02"));
    assert!(outcome.result().reason.as_deref().unwrap().ends_with("Wait 30s."));

    // Fill the hour: four more spaced commits reach the limit of five.
    for _ in 0..4 {
        session.clock().advance_secs(61);
        let envelope = proposal(&session, "AWS Cloud Services", 10.0, "SaaS / API");
        assert!(session.propose(envelope).result().allowed);
    }
    session.clock().advance_secs(61);
    let envelope = proposal(&session, "AWS Cloud Services", 10.0, "SaaS / API");
    assert_eq!(session.propose(envelope).result().triggered(), Some("fagf-velocity-01"));
}

#[test]
fn context_tracks_known_merchants() {
    let mut session = GovernanceSession::new(FinancialMandates::mas_default(), FixedClock::new(NOW));

    let context = session.context_for("AWS Cloud Services", 1.0);
    assert!(context.is_new_merchant);
    assert_eq!(context.history_depth, 0);

    let envelope = proposal(&session, "AWS Cloud Services", 15.0, "SaaS / API");
    let id = session.propose(envelope).proposal_id().unwrap();
    session.approve(id).unwrap();

    let context = session.context_for("AWS Cloud Services", 1.0);
    assert!(!context.is_new_merchant);
    assert_eq!(context.history_depth, 1);
}

#[test]
fn deployed_profile_applies_to_later_proposals() {
    let mut session = session();
    let draft = FinancialMandates::mas_default()
        .with_new_merchant_auth(false)
        .with_confirmation_threshold(2_000.0);

    session.registry_mut().stage(draft).unwrap();
    let envelope = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");
    assert!(!session.propose(envelope).result().allowed);

    session.registry_mut().deploy().unwrap();
    session.clock().advance_secs(61);
    let envelope = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");
    assert!(session.propose(envelope).result().allowed);
    assert_eq!(session.registry().revision(), 1);
}

#[test]
fn audit_trail_covers_every_decision() {
    let mut session = session();

    let ok = proposal(&session, "AWS Cloud Services", 15.0, "SaaS / API");
    session.propose(ok);
    session.clock().advance_secs(61);
    let blocked = proposal(&session, "Binance Exchange", 1.0, "Unregulated Crypto");
    session.propose(blocked);
    let big = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");
    let id = session.propose(big).proposal_id().unwrap();
    session.approve(id).unwrap();

    let outcomes: Vec<_> = session.audit().records().iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            AuditOutcome::AutoApproved,
            AuditOutcome::Blocked,
            AuditOutcome::Escalated,
            AuditOutcome::HumanApproved,
        ]
    );
    assert!(session.audit().verify_chain());
}

#[test]
fn pending_approvals_are_listed_oldest_first() {
    let mut session = session();
    let mut ids = Vec::new();
    for amount in [100.0, 200.0, 300.0] {
        let envelope = proposal(&session, "Singapore Airlines", amount, "Travel / Logistics");
        ids.push(session.propose(envelope).proposal_id().unwrap());
    }

    let listed: Vec<ProposalId> = session.pending_approvals().iter().map(|p| p.id).collect();
    assert_eq!(listed, ids);
}

#[test]
fn stale_pending_approvals_expire() {
    let mut session = session();
    let old = proposal(&session, "Singapore Airlines", 1_250.0, "Travel / Logistics");
    let old_id = session.propose(old).proposal_id().unwrap();

    session.clock().advance_secs(600);
    let fresh = proposal(&session, "Singapore Airlines", 900.0, "Travel / Logistics");
    let fresh_id = session.propose(fresh).proposal_id().unwrap();

    session.clock().advance_secs(300);
    let expired = session.expire_pending(900);
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].id, old_id);

    let listed: Vec<ProposalId> = session.pending_approvals().iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![fresh_id]);
    assert!(session.history().is_empty());
    assert_eq!(session.approve(old_id), Err(GovernanceError::UnknownProposal(old_id)));

    let expirations = session.audit().query(&AuditFilter {
        outcome: Some(AuditOutcome::Expired),
        ..AuditFilter::default()
    });
    assert_eq!(expirations.len(), 1);
    assert_eq!(expirations[0].proposal_id, Some(old_id));
    assert!(session.audit().verify_chain());
}
