use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::*;
use super::validation;

/// Builder for customer and company records.
///
/// ```
/// use factuur::core::*;
///
/// let company = RecordBuilder::company("Opto B.V.")
///     .address("Stationsweg 4", "1234 AB Utrecht")
///     .kvk("12345678")
///     .btw("NL001234567B01")
///     .iban("NL91ABNA0417164300")
///     .build()
///     .unwrap();
///
/// assert_eq!(company.get(fields::KVK), "12345678");
/// ```
pub struct RecordBuilder {
    kind: RecordKind,
    record: Record,
}

impl RecordBuilder {
    pub fn customer(name: impl Into<String>) -> Self {
        Self::new(RecordKind::Customer, name)
    }

    pub fn company(name: impl Into<String>) -> Self {
        Self::new(RecordKind::Company, name)
    }

    fn new(kind: RecordKind, name: impl Into<String>) -> Self {
        let mut record = Record::new();
        for field in kind.known_fields() {
            record.set(*field, "");
        }
        let name: String = name.into();
        record.set(fields::NAME, name.trim());
        Self { kind, record }
    }

    pub fn address(mut self, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        let (line1, line2): (String, String) = (line1.into(), line2.into());
        self.record.set(fields::ADDRESS_LINE1, line1.trim());
        self.record.set(fields::ADDRESS_LINE2, line2.trim());
        self
    }

    pub fn kvk(self, kvk: impl Into<String>) -> Self {
        self.field(fields::KVK, kvk)
    }

    pub fn btw(self, btw: impl Into<String>) -> Self {
        self.field(fields::BTW, btw)
    }

    pub fn iban(self, iban: impl Into<String>) -> Self {
        self.field(fields::IBAN, iban)
    }

    /// Set any field, including ones this crate does not know about.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.record.set(name, value.trim());
        self
    }

    /// Build the record, rejecting a blank name.
    pub fn build(self) -> Result<Record, InvoiceError> {
        let errors = validation::validate_new_record(self.kind, &self.record);
        if !errors.is_empty() {
            return Err(InvoiceError::from_validation(&errors));
        }
        Ok(self.record)
    }
}

/// Builder for an invoice request.
pub struct InvoiceRequestBuilder {
    company_id: String,
    customer_id: String,
    description: String,
    amount_incl: Decimal,
}

impl InvoiceRequestBuilder {
    pub fn new(company_id: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            customer_id: customer_id.into(),
            description: String::new(),
            amount_incl: Decimal::ZERO,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Gross amount, VAT included.
    pub fn amount_incl(mut self, amount: Decimal) -> Self {
        self.amount_incl = amount;
        self
    }

    /// Build the request, returning all validation errors at once.
    pub fn build(self) -> Result<InvoiceRequest, InvoiceError> {
        let request = InvoiceRequest {
            company_id: self.company_id.trim().to_string(),
            customer_id: self.customer_id.trim().to_string(),
            description: self.description.trim().to_string(),
            amount_incl: self.amount_incl,
        };
        let errors = validation::validate_request(&request);
        if !errors.is_empty() {
            return Err(InvoiceError::from_validation(&errors));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn customer_has_known_fields() {
        let rec = RecordBuilder::customer("  Jansen ").build().unwrap();
        assert_eq!(rec.name(), "Jansen");
        assert!(rec.contains(fields::ADDRESS_LINE1));
        assert!(!rec.contains(fields::IBAN));
    }

    #[test]
    fn blank_name_rejected() {
        assert!(RecordBuilder::company("").build().is_err());
    }

    #[test]
    fn request_builder_validates() {
        let err = InvoiceRequestBuilder::new("1", "3").build().unwrap_err();
        assert!(err.to_string().contains("description"));

        let req = InvoiceRequestBuilder::new("1", "3")
            .description("Eye exam")
            .amount_incl(dec!(60.50))
            .build()
            .unwrap();
        assert_eq!(req.customer_id, "3");
    }
}
