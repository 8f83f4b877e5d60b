use crate::core::InvoiceError;

use super::backend::{SharedBackend, load_json, save_json};

/// Maximum number of descriptions kept.
pub const RECENT_DESCRIPTIONS_LIMIT: usize = 10;

/// Most-recently-used line item descriptions, newest first, without duplicates.
#[derive(Clone)]
pub struct DescriptionCache {
    backend: SharedBackend,
    document: String,
}

impl DescriptionCache {
    pub fn new(backend: SharedBackend, document: impl Into<String>) -> Self {
        Self {
            backend,
            document: document.into(),
        }
    }

    /// Stored descriptions, empty when the document does not exist.
    pub fn recent(&self) -> Result<Vec<String>, InvoiceError> {
        load_json(self.backend.as_ref(), &self.document)
    }

    /// Record a used description and return the resulting list.
    ///
    /// A blank or already-present description changes nothing; a present
    /// entry keeps its position.
    pub fn touch(&self, description: &str) -> Result<Vec<String>, InvoiceError> {
        let mut descriptions = self.recent()?;
        if description.trim().is_empty() || descriptions.iter().any(|d| d == description) {
            return Ok(descriptions);
        }

        descriptions.insert(0, description.to_string());
        descriptions.truncate(RECENT_DESCRIPTIONS_LIMIT);
        save_json(self.backend.as_ref(), &self.document, &descriptions)?;

        tracing::debug!(document = %self.document, len = descriptions.len(), "description cached");
        Ok(descriptions)
    }
}
