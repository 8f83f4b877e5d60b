#![no_main]

use std::sync::Arc;

use factuur::store::{CounterLedger, MemoryBackend};
use factuur::{KeyScheme, ScopeKey};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let backend = MemoryBackend::new().with_document("invoice_log.json", s);
        let ledger = CounterLedger::new(Arc::new(backend), "invoice_log.json");
        let Ok(key) = ScopeKey::new(KeyScheme::PerCustomer, 2024, None, "3") else {
            return;
        };
        // A corrupt document must surface as an error, never as a fresh ledger.
        if ledger.entries().is_err() {
            assert!(ledger.advance(&key).is_err());
        } else {
            let _ = ledger.advance(&key);
        }
    }
});
