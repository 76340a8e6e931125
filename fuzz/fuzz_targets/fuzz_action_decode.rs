#![no_main]

use libfuzzer_sys::fuzz_target;

// Decoding arbitrary payloads never panics, and anything that decodes
// re-encodes to a payload that decodes to the same intent.
fuzz_target!(|data: &[u8]| {
    if let Ok(intent) = govgate_action::decode(data) {
        let encoded = govgate_action::encode(&intent);
        let decoded = govgate_action::decode(encoded.as_bytes());
        assert_eq!(decoded.as_ref(), Ok(&intent));
        assert_eq!(encoded.len(), 32 * (4 + 2 * intent.len()));
    }
});
