//! HTML rendering of issued invoices.
//!
//! The document is written element by element with `quick-xml`, so all
//! record text is escaped.

mod invoice;
mod writer;

pub use invoice::{render_footer, render_invoice};
pub use writer::HtmlWriter;
