#![no_main]

use std::sync::Arc;

use factuur::store::{MemoryBackend, RecordStore};
use factuur::{RecordBuilder, RecordKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let backend = MemoryBackend::new().with_document("customers.json", s);
        let store = RecordStore::new(Arc::new(backend), "customers.json", RecordKind::Customer);
        let Ok(record) = RecordBuilder::customer("Fuzz").build() else {
            return;
        };
        if let Ok((id, _)) = store.add(record) {
            assert!(store.get(&id).is_ok());
        }
    }
});
