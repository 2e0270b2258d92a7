use proptest::prelude::*;

use dagshield_types::{ReportId, TargetAddress, ThreatLevel, Timestamp};

proptest! {
    /// ReportId roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn report_id_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = ReportId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
    }

    /// ReportId bincode serialization roundtrip.
    #[test]
    fn report_id_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = ReportId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: ReportId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// ThreatLevel accepts exactly 1..=10.
    #[test]
    fn threat_level_range(level in any::<u8>()) {
        prop_assert_eq!(ThreatLevel::new(level).is_ok(), (1..=10).contains(&level));
    }

    /// A level that fails validation can never be deserialized either.
    #[test]
    fn threat_level_deserialize_validates(level in any::<u8>()) {
        let encoded = bincode::serialize(&level).unwrap();
        let decoded: Result<ThreatLevel, _> = bincode::deserialize(&encoded);
        prop_assert_eq!(decoded.is_ok(), (1..=10).contains(&level));
    }

    /// The boundary instant is inside the window; one second later is not.
    #[test]
    fn window_boundary(start in 0u64..1_000_000, window in 1u64..10_000) {
        let t = Timestamp::new(start);
        prop_assert!(!t.window_closed(window, Timestamp::new(start + window)));
        prop_assert!(t.window_closed(window, Timestamp::new(start + window + 1)));
    }

    /// remaining_in_window never exceeds the window and hits zero once closed.
    #[test]
    fn remaining_in_window_bounded(start in 0u64..1_000_000, window in 1u64..10_000, offset in 0u64..20_000) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start + offset);
        let remaining = t.remaining_in_window(window, now);
        prop_assert!(remaining <= window);
        if t.window_closed(window, now) {
            prop_assert_eq!(remaining, 0);
        }
    }

    /// Hex addresses normalise case-insensitively.
    #[test]
    fn hex_address_case_insensitive(bytes in prop::array::uniform20(0u8..)) {
        let lower: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let a = TargetAddress::parse(&format!("0x{lower}")).unwrap();
        let b = TargetAddress::parse(&format!("0x{}", lower.to_uppercase())).unwrap();
        prop_assert_eq!(a, b);
    }
}
