//! JSON-document persistence: customer/company records, the invoice counter
//! ledger, and the recent-description cache.
//!
//! Every document is read and replaced whole. There is no cross-process
//! locking; one process per data directory is assumed.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use factuur::core::{KeyScheme, ScopeKey};
//! use factuur::store::{CounterLedger, MemoryBackend};
//!
//! let ledger = CounterLedger::new(Arc::new(MemoryBackend::new()), "invoice_log.json");
//! let key = ScopeKey::new(KeyScheme::PerCustomer, 2024, None, "3").unwrap();
//! assert_eq!(ledger.advance(&key).unwrap(), 1);
//! assert_eq!(ledger.advance(&key).unwrap(), 2);
//! ```

mod backend;
mod descriptions;
mod ledger;
mod records;

pub use backend::{Backend, FileBackend, MemoryBackend, SharedBackend, load_json, save_json};
pub use descriptions::{DescriptionCache, RECENT_DESCRIPTIONS_LIMIT};
pub use ledger::{CounterLedger, CounterView, LedgerEntries, Reservation};
pub use records::{RecordStore, next_id};
