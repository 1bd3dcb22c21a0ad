//! Fuzz target: `Registry::from_json`
//!
//! Arbitrary bytes as a roster document.  Parsing must never panic, and a
//! roster that loads must satisfy the registry limits and find every
//! identity it holds.
//!
//! cargo fuzz run fuzz_roster_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcall::registry::{MAX_IDENTITIES, Registry};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(registry) = Registry::from_json(json) else {
        return;
    };

    assert!(registry.len() <= MAX_IDENTITIES);
    for (ordinal, identity) in registry.iter().enumerate() {
        assert_eq!(identity.index.get(), ordinal);
        assert!(!identity.id.contains(','));
        assert!(!identity.name.contains(','));
        let found = registry.lookup(&identity.id).map(|i| i.index);
        assert_eq!(found, Some(identity.index));
    }
});
