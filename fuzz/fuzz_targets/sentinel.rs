#![no_main]
use libfuzzer_sys::fuzz_target;
use rtt_tester::sentinel::{decode, is_failure};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        assert_eq!(is_failure(text), decode(text).is_some());
    }
});
