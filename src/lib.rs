//! # factuur
//!
//! Small-business invoicing: customer and company records in JSON documents,
//! per-scope invoice counters, VAT split of gross amounts, and HTML/PDF
//! invoice rendering.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "store")] {
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use factuur::core::*;
//! use factuur::invoicing::InvoiceService;
//! use factuur::settings::Settings;
//! use factuur::store::MemoryBackend;
//! use rust_decimal_macros::dec;
//!
//! let service = InvoiceService::new(Arc::new(MemoryBackend::new()), Settings::default());
//! let (customer_id, _) = service
//!     .customers()
//!     .add(RecordBuilder::customer("Jan Jansen").address("Dorpsstraat 1", "1234 AB Ergens").build().unwrap())
//!     .unwrap();
//!
//! let request = InvoiceRequestBuilder::new("1", customer_id)
//!     .description("Eye exam")
//!     .amount_incl(dec!(121))
//!     .build()
//!     .unwrap();
//! let invoice = service.generate(&request, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).unwrap();
//!
//! assert_eq!(invoice.number, "20240101");
//! assert_eq!(invoice.amounts.vat, dec!(21.00));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Records, numbering, VAT split, validation |
//! | `store` (default) | JSON document store, counter ledger, description cache, settings, invoicing service |
//! | `html` | HTML invoice rendering |
//! | `pdf` | PDF invoice rendering |
//! | `http` | JSON HTTP API and the `factuur-server` binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "store")]
pub mod settings;

#[cfg(feature = "store")]
pub mod invoicing;

#[cfg(feature = "html")]
pub mod html;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "http")]
pub mod http;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
