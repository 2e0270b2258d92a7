//! Scripted in-process scenario: five chains, one high-severity report,
//! quorum, cross-chain delivery, plus the two classic rejections.

use std::sync::Arc;

use dagshield_crypto::{keypair_from_seed, sign_report};
use dagshield_node::{NodeConfig, NodeEvent, ThreatNode};
use dagshield_nullables::NullClock;
use dagshield_types::{ChainId, EvidenceHash, KeyPair, ReportSubmission, TargetAddress, ThreatType};
use serde_json::json;
use tokio::sync::broadcast;

const START: u64 = 1_700_000_000;

fn keypair(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

pub async fn run() -> anyhow::Result<()> {
    let admin = keypair(0).identity();
    let [a, b, c, d, e] = [1u8, 2, 3, 4, 5].map(keypair);

    let config = NodeConfig {
        admin: Some(admin.to_string()),
        authorized: [&a, &b, &c, &d, &e]
            .iter()
            .map(|kp| kp.identity().to_string())
            .collect(),
        ..NodeConfig::default()
    };
    let clock = Arc::new(NullClock::new(START));
    let node = ThreatNode::new(&config, keypair(100).identity(), clock.clone())?;
    let mut events = node.subscribe();

    let target = TargetAddress::parse("0x00000000000000000000000000000000DeaDBeef")?;
    let observation = ReportSubmission {
        chain_id: ChainId::new(1),
        target: target.clone(),
        threat_level: 9,
        threat_type: ThreatType::Phishing,
        evidence_hash: EvidenceHash::new([0xAB; 32]),
        confidence: 95,
    };

    let signature = sign_report(&observation, &a.private);
    let report_id = node
        .submit_report(&a.identity(), &observation, &signature)
        .await?
        .report_id;
    clock.advance(20);
    node.vote(&b.identity(), &report_id, true).await?;
    clock.advance(20);
    node.vote(&c.identity(), &report_id, true).await?;
    node.flush_dispatch().await?;

    let weak = ReportSubmission {
        confidence: 60,
        ..observation.clone()
    };
    let weak_signature = sign_report(&weak, &d.private);
    if let Err(err) = node.submit_report(&d.identity(), &weak, &weak_signature).await {
        println!("{}", rejection_line(&err));
    }

    clock.set(START + 301);
    if let Err(err) = node.vote(&e.identity(), &report_id, true).await {
        println!("{}", rejection_line(&err));
    }

    print_events(&mut events)?;
    for chain in node.relay_chains().await {
        let risk = node.risk_score(chain, &target).await?;
        let blocked = node.is_blocked(chain, &target).await?;
        println!(
            "{}",
            json!({ "chain": chain.as_u64(), "risk": risk.get(), "blocked": blocked })
        );
    }
    Ok(())
}

fn rejection_line(err: &dyn std::fmt::Display) -> String {
    json!({ "rejected": err.to_string() }).to_string()
}

fn print_events(rx: &mut broadcast::Receiver<NodeEvent>) -> anyhow::Result<()> {
    while let Ok(event) = rx.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
