// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

use std::sync::Arc;

use fagf_governance_core::{
    async_session::AsyncGovernanceSession,
    audit::{AuditFilter, AuditOutcome},
    clock::{Clock, FixedClock},
    FinancialMandates, GovernanceEnvelope, GovernanceSession, Transaction,
};

const NOW: u64 = 1_700_000_000_000;

fn envelope(clock: &FixedClock, amount: f64) -> GovernanceEnvelope {
    GovernanceEnvelope {
        transaction: Transaction {
            amount,
            destination: "aws_devops".into(),
            merchant_name: "AWS Cloud Services".into(),
            category: "SaaS / API".into(),
            timestamp: clock.now_ms(),
            payment_method: "PayNow".into(),
        },
        reasoning: "Cost optimization".into(),
        context: Default::default(),
    }
}

fn shared(clock: Arc<FixedClock>) -> AsyncGovernanceSession<Arc<FixedClock>> {
    AsyncGovernanceSession::new(GovernanceSession::new(FinancialMandates::mas_default(), clock))
}

#[tokio::test]
async fn concurrent_proposals_commit_only_once_within_cooldown() {
    let clock = Arc::new(FixedClock::new(NOW));
    let session = shared(Arc::clone(&clock));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let session = session.clone();
        let envelope = envelope(&clock, 10.0);
        handles.push(tokio::spawn(async move { session.propose(envelope).await }));
    }

    let mut committed = 0;
    for handle in handles {
        if handle.await.unwrap().result().allowed {
            committed += 1;
        }
    }

    // Evaluate-then-append is serialised, so the cooldown sees the first commit.
    assert_eq!(committed, 1);
    assert_eq!(session.history_len().await, 1);
    assert_eq!(session.pending_ids().await.len(), 7);
}

#[tokio::test]
async fn approve_and_reject_through_handle() {
    let clock = Arc::new(FixedClock::new(NOW));
    let session = shared(Arc::clone(&clock));

    let first = session.propose(envelope(&clock, 500.0)).await;
    let second = session.propose(envelope(&clock, 600.0)).await;
    let (first, second) = (first.proposal_id().unwrap(), second.proposal_id().unwrap());

    session.approve(first).await.unwrap();
    session.reject(second).await.unwrap();
    assert!(session.reject(second).await.is_err());
    assert_eq!(session.history_len().await, 1);

    let approvals = session
        .query_audit(&AuditFilter {
            outcome: Some(AuditOutcome::HumanApproved),
            ..AuditFilter::default()
        })
        .await;
    assert_eq!(approvals.len(), 1);
}

#[tokio::test]
async fn stage_and_deploy_through_handle() {
    let clock = Arc::new(FixedClock::new(NOW));
    let session = shared(Arc::clone(&clock));

    session
        .stage(FinancialMandates::mas_default().with_confirmation_threshold(1_000.0))
        .await
        .unwrap();
    assert_eq!(session.deploy().await.unwrap(), 1);

    let outcome = session.propose(envelope(&clock, 500.0)).await;
    assert!(outcome.result().allowed);

    let threshold = session
        .with_session(|inner| inner.registry().active().confirmation_threshold.parameter)
        .await;
    assert_eq!(threshold, 1_000.0);
}
