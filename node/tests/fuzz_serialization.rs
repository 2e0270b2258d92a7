//! Property-based fuzz tests for the cross-chain wire boundary.
//!
//! Every message that leaves the node must decode back to itself, and no
//! byte string arriving from the transport may panic the decoder or smuggle
//! in an out-of-range severity.

use proptest::prelude::*;

use dagshield_node::{CrossChainMessage, MessageKind};
use dagshield_oracle::CrossChainAlert;
use dagshield_types::{ChainId, ReportId, TargetAddress, ThreatLevel, ThreatType, Timestamp};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_target() -> impl Strategy<Value = TargetAddress> {
    "0x[0-9a-fA-F]{40}".prop_map(|s| TargetAddress::parse(&s).unwrap())
}

fn arb_threat_type() -> impl Strategy<Value = ThreatType> {
    prop_oneof![
        Just(ThreatType::Phishing),
        Just(ThreatType::RugPull),
        Just(ThreatType::FlashLoanAttack),
        Just(ThreatType::ContractExploit),
        Just(ThreatType::Other),
    ]
}

fn arb_alert() -> impl Strategy<Value = CrossChainAlert> {
    (
        any::<u64>(),
        any::<[u8; 32]>(),
        arb_target(),
        1u8..=10,
        arb_threat_type(),
        0u64..=u64::MAX / 2,
    )
        .prop_map(|(chain, id, target, level, threat_type, at)| CrossChainAlert {
            source_chain: ChainId::new(chain),
            report_id: ReportId::new(id),
            target,
            threat_level: ThreatLevel::new(level).unwrap(),
            threat_type,
            verified_at: Timestamp::new(at),
        })
}

fn arb_message() -> impl Strategy<Value = CrossChainMessage> {
    let kind = prop_oneof![
        arb_alert().prop_map(MessageKind::ThreatAlert),
        arb_target().prop_map(|target| MessageKind::EmergencyBlock { target }),
    ];
    (any::<u64>(), any::<u64>(), kind, 0u64..=u64::MAX / 2).prop_map(
        |(source, target, kind, ts)| CrossChainMessage {
            source_chain: ChainId::new(source),
            target_chain: ChainId::new(target),
            kind,
            timestamp: Timestamp::new(ts),
        },
    )
}

proptest! {
    #[test]
    fn message_roundtrip(msg in arb_message()) {
        let bytes = msg.encode().unwrap();
        prop_assert_eq!(CrossChainMessage::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        if let Ok(CrossChainMessage { kind: MessageKind::ThreatAlert(alert), .. }) =
            CrossChainMessage::decode(&bytes)
        {
            prop_assert!((1..=10).contains(&alert.threat_level.get()));
        }
    }

    /// Flipping a byte inside the severity field is caught by decoding.
    #[test]
    fn corrupted_severity_rejected(alert in arb_alert(), bad in prop_oneof![Just(0u8), 11u8..]) {
        let msg = CrossChainMessage {
            source_chain: alert.source_chain,
            target_chain: ChainId::new(137),
            kind: MessageKind::ThreatAlert(alert.clone()),
            timestamp: Timestamp::new(1),
        };
        let mut bytes = msg.encode().unwrap();
        // Layout: source(8) target(8) variant(4) source(8) report(32) len(8) target bytes, level(1)
        let level_at = 8 + 8 + 4 + 8 + 32 + 8 + alert.target.as_str().len();
        prop_assert_eq!(bytes[level_at], alert.threat_level.get());
        bytes[level_at] = bad;
        prop_assert!(CrossChainMessage::decode(&bytes).is_err());
    }
}
