use rust_decimal::Decimal;

use super::error::{InvoiceError, ValidationError};
use super::types::*;
use super::vat::parse_amount;

/// Upper bound on any single text field, to keep documents and PDFs sane.
pub const MAX_FIELD_LEN: usize = 500;

/// Validate an invoice request.
/// Returns all validation errors found (not just the first).
pub fn validate_request(request: &InvoiceRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_id(&request.company_id, "company_id", &mut errors);
    validate_id(&request.customer_id, "customer_id", &mut errors);

    if request.description.trim().is_empty() {
        errors.push(ValidationError::new(
            "description",
            "description must not be empty",
        ));
    } else if request.description.chars().count() > MAX_FIELD_LEN {
        errors.push(ValidationError::new(
            "description",
            format!("description cannot exceed {MAX_FIELD_LEN} characters"),
        ));
    }

    if request.amount_incl <= Decimal::ZERO {
        errors.push(ValidationError::new(
            "amount_incl",
            "amount must be positive",
        ));
    }

    errors
}

/// Build an [`InvoiceRequest`] from raw form values, collecting every problem.
pub fn parse_request(
    company_id: &str,
    customer_id: &str,
    description: &str,
    amount_incl: &str,
) -> Result<InvoiceRequest, InvoiceError> {
    let mut errors = Vec::new();
    let amount = match parse_amount(amount_incl) {
        Ok(amount) => amount,
        Err(e) => {
            errors.push(ValidationError::new("amount_incl", strip_prefix(&e)));
            Decimal::ZERO
        }
    };

    let request = InvoiceRequest {
        company_id: company_id.trim().to_string(),
        customer_id: customer_id.trim().to_string(),
        description: description.trim().to_string(),
        amount_incl: amount,
    };

    // A failed amount parse already reported its own message.
    let amount_failed = !errors.is_empty();
    errors.extend(
        validate_request(&request)
            .into_iter()
            .filter(|e| !(amount_failed && e.field == "amount_incl")),
    );

    if errors.is_empty() {
        Ok(request)
    } else {
        Err(InvoiceError::from_validation(&errors))
    }
}

fn strip_prefix(err: &InvoiceError) -> String {
    match err {
        InvoiceError::InvalidInput(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Validate the fields of a record about to be added.
pub fn validate_new_record(kind: RecordKind, record: &Record) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if record.name().trim().is_empty() {
        errors.push(ValidationError::new(
            fields::NAME,
            format!("{} name must not be empty", kind.label()),
        ));
    }
    validate_field_lengths(record, &mut errors);

    errors
}

/// Validate an update patch. A blank name is allowed (it keeps the stored name).
pub fn validate_patch(record: &Record) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_field_lengths(record, &mut errors);
    errors
}

fn validate_field_lengths(record: &Record, errors: &mut Vec<ValidationError>) {
    for (field, value) in record.iter() {
        if value.chars().count() > MAX_FIELD_LEN {
            errors.push(ValidationError::new(
                field,
                format!("value cannot exceed {MAX_FIELD_LEN} characters"),
            ));
        }
    }
}

fn validate_id(id: &str, field: &str, errors: &mut Vec<ValidationError>) {
    let id = id.trim();
    if id.is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    } else if !id.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::new(
            field,
            format!("'{id}' is not a numeric id"),
        ));
    }
}

/// Parse an administrative counter value. Only non-negative integers pass.
pub fn parse_counter_value(input: &str) -> Result<u64, InvoiceError> {
    let trimmed = input.trim();
    trimmed.parse::<u64>().map_err(|_| {
        InvoiceError::InvalidInput(format!(
            "counter value must be a non-negative integer, got '{trimmed}'"
        ))
    })
}
