//! Core invoice types, numbering, VAT split, and validation.
//!
//! Everything here is pure: no I/O, no clock. Persistence lives in
//! [`crate::store`], the invoice-creation flow in [`crate::invoicing`].

mod builder;
mod display;
mod error;
mod numbering;
mod types;
mod validation;
mod vat;

pub use builder::*;
pub use display::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;
pub use vat::*;
