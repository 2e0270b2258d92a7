#![no_main]

use dagshield_node::{CrossChainMessage, MessageKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Frames arrive from the transport unauthenticated; decoding must never
    // panic and must never yield an out-of-range severity.
    if let Ok(msg) = CrossChainMessage::decode(data) {
        if let MessageKind::ThreatAlert(alert) = &msg.kind {
            assert!((1..=10).contains(&alert.threat_level.get()));
        }
        let reencoded = msg.encode().expect("decoded message re-encodes");
        assert_eq!(CrossChainMessage::decode(&reencoded).ok(), Some(msg));
    }
});
