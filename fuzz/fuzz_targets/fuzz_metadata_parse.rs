#![no_main]

use govgate_registry::{MetadataDocument, MetadataSnapshot};
use govgate_types::NetworkId;
use libfuzzer_sys::fuzz_target;

// Arbitrary metadata documents either fail to parse or yield a snapshot
// whose codes all resolve back to themselves.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = MetadataDocument::from_json(json) else {
        return;
    };
    for network in [NetworkId::Mainnet, NetworkId::Kovan, NetworkId::Localhost] {
        if let Ok(snapshot) = MetadataSnapshot::from_document(&document, network) {
            for meta in snapshot.codes() {
                assert_eq!(snapshot.get(meta.code).map(|m| m.code), Some(meta.code));
                assert!(snapshot.address_by_name(meta.code.as_str()).is_ok());
            }
        }
    }
});
