#![no_main]

use dagshield_types::TargetAddress;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(addr) = TargetAddress::parse(data) {
        // Parsing is idempotent and never yields whitespace.
        assert_eq!(TargetAddress::parse(addr.as_str()).ok(), Some(addr.clone()));
        assert!(!addr.as_str().chars().any(char::is_whitespace));
    }
});
