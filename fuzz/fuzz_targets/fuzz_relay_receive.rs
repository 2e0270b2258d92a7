#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use dagshield_registry::SingleAdmin;
use dagshield_relay::{RelayEngine, ThreatNotice};
use dagshield_types::{ChainId, Identity, NetworkParams, ReportId, TargetAddress, ThreatType, Timestamp};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Delivery {
    source_chain: u8,
    report: u8,
    target: u8,
    level: u8,
}

fuzz_target!(|deliveries: Vec<Delivery>| {
    let propagator = Identity::new([9; 32]);
    let mut relay = RelayEngine::new(
        ChainId::new(137),
        propagator,
        Arc::new(SingleAdmin::new(Identity::new([0; 32]))),
        NetworkParams::default(),
    );

    for d in deliveries {
        let target = TargetAddress::parse(&format!("0x{:02x}", d.target)).expect("valid address");
        let notice = ThreatNotice {
            source_chain: ChainId::new(u64::from(d.source_chain)),
            report_id: ReportId::new([d.report; 32]),
            target: target.clone(),
            threat_level: d.level,
            threat_type: ThreatType::Other,
        };
        let before = relay.risk_score(&target);
        let _ = relay.receive(&propagator, &notice, Timestamp::new(1));
        let after = relay.risk_score(&target);
        assert!(after >= before);
        assert!(after.get() <= 1000);
    }
});
