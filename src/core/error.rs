use thiserror::Error;

/// Errors that can occur while issuing invoices or touching persisted data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// An id is not present in a collection.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Collection the lookup ran against (e.g. "customer").
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A backing document exists but cannot be parsed.
    #[error("corrupt data in {document}: {reason}")]
    CorruptData {
        /// Name of the backing document (e.g. "invoice_log.json").
        document: String,
        /// Parser message.
        reason: String,
    },

    /// Caller-supplied input was rejected before any mutation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Persisted data is inconsistent with the requested mutation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Reading or writing a backing document failed.
    #[error("I/O error on {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    /// HTML or PDF generation error.
    #[error("render error: {0}")]
    Render(String),
}

impl InvoiceError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn corrupt(document: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptData {
            document: document.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(document: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            document: document.into(),
            source,
        }
    }

    /// Join a list of validation errors into a single `InvalidInput`.
    pub fn from_validation(errors: &[ValidationError]) -> Self {
        let msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::InvalidInput(msg)
    }
}

/// A single validation error with field name and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "amount_incl").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_join_into_invalid_input() {
        let err = InvoiceError::from_validation(&[
            ValidationError::new("company_id", "must not be empty"),
            ValidationError::new("amount_incl", "must be positive"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: company_id: must not be empty; amount_incl: must be positive"
        );
    }

    #[test]
    fn not_found_display() {
        let err = InvoiceError::not_found("customer", "7");
        assert_eq!(err.to_string(), "customer '7' not found");
    }
}
