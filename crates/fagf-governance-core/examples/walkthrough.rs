// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! # Governance Walkthrough
//!
//! Drives one agent session through the three verdicts: an auto-approved
//! SaaS payment, a flight booking that needs a human, and a gambling
//! payment that is hard-blocked.  Run with:
//!
//! ```bash
//! RUST_LOG=debug cargo run --example walkthrough
//! ```

use fagf_governance_core::{
    audit::AuditFilter,
    clock::{current_time_ms, Clock, FixedClock},
    types::{FinancialMandates, GovernanceEnvelope, Transaction},
    GovernanceSession, ProposalOutcome,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("FAGF Governance — Walkthrough\n");

    // -----------------------------------------------------------------------
    // 1. Construct the session over the reference profile
    // -----------------------------------------------------------------------
    let clock = FixedClock::new(current_time_ms());
    let mut session = GovernanceSession::new(FinancialMandates::mas_default(), clock);

    // Seed one previously approved AWS payment so the merchant is known.
    let seed = propose(
        &mut session,
        "AWS Cloud Services",
        "aws_devops",
        12.0,
        "SaaS / API",
        "Initial provisioning",
    );
    if let Some(id) = seed.proposal_id() {
        if let Err(error) = session.approve(id) {
            eprintln!("seed approval failed: {}", error);
        }
    }
    session.clock().advance_secs(120);

    // -----------------------------------------------------------------------
    // 2. Auto-approved: known merchant, small amount, trusted channel
    // -----------------------------------------------------------------------
    let outcome = propose(
        &mut session,
        "AWS Cloud Services",
        "aws_devops",
        15.0,
        "SaaS / API",
        "Cost optimization through automated resource scaling",
    );
    print_outcome("AWS Cloud Services $15.00", &outcome);
    session.clock().advance_secs(120);

    // -----------------------------------------------------------------------
    // 3. Human in the loop: new merchant, large amount
    // -----------------------------------------------------------------------
    let outcome = propose(
        &mut session,
        "Singapore Airlines",
        "singapore_airlines",
        1_250.0,
        "Travel / Logistics",
        "Urgent talent relocation for project launch",
    );
    print_outcome("Singapore Airlines $1,250.00", &outcome);

    if let Some(id) = outcome.proposal_id() {
        match session.approve(id) {
            Ok(envelope) => println!(
                "  human approved {} → committed {}\n",
                id, envelope.transaction.merchant_name
            ),
            Err(error) => println!("  approval failed: {}\n", error),
        }
    }
    session.clock().advance_secs(120);

    // -----------------------------------------------------------------------
    // 4. Hard block: restricted category, cannot be escalated
    // -----------------------------------------------------------------------
    let outcome = propose(
        &mut session,
        "Binance Exchange",
        "binance_global",
        50.0,
        "Ungoverned Gambling",
        "Yield generation via staking platform",
    );
    print_outcome("Binance Exchange $50.00", &outcome);

    // -----------------------------------------------------------------------
    // 5. Audit trail
    // -----------------------------------------------------------------------
    println!("Audit trail:");
    for record in session.audit().query(&AuditFilter::default()) {
        println!(
            "  #{} {:?} merchant={} amount={:.2} hash={}",
            record.sequence,
            record.outcome,
            record.merchant_name,
            record.amount,
            &record.hash[..8]
        );
    }
    println!("  chain intact: {}", session.audit().verify_chain());
    println!("  accepted history: {} entries", session.history().len());

    println!("\nDone.");
}

fn propose(
    session: &mut GovernanceSession<FixedClock>,
    merchant: &str,
    destination: &str,
    amount: f64,
    category: &str,
    reasoning: &str,
) -> ProposalOutcome {
    let envelope = GovernanceEnvelope {
        transaction: Transaction {
            amount,
            destination: destination.into(),
            merchant_name: merchant.into(),
            category: category.into(),
            timestamp: session.clock().now_ms(),
            payment_method: "PayNow".into(),
        },
        reasoning: reasoning.into(),
        context: session.context_for(merchant, 1.0),
    };
    session.propose(envelope)
}

fn print_outcome(label: &str, outcome: &ProposalOutcome) {
    let result = outcome.result();
    println!("[{}] verdict={:?}", label, result.verdict());
    if let Some(reason) = &result.reason {
        println!("  reason:     {}", reason);
    }
    if let Some(risk) = &result.mitigation_risk {
        println!("  mitigates:  {}", risk);
    }
    if let Some(severity) = result.severity {
        println!("  severity:   {}", severity.as_str());
    }
    if !result.triggered_mandates.is_empty() {
        println!("  triggered:  {}", result.triggered_mandates.join(", "));
    }
    println!();
}
