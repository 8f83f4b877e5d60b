//! Request and response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{InvoiceError, InvoiceRequest, Record, parse_request};

/// A number sent either as a JSON number or as text such as `"99,95"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Text(String),
    Number(serde_json::Number),
}

impl NumberInput {
    pub fn as_text(&self) -> String {
        match self {
            NumberInput::Text(text) => text.clone(),
            NumberInput::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub company_id: String,
    pub customer_id: String,
    pub description: String,
    /// Gross amount, VAT included.
    pub amount_incl: NumberInput,
    /// Defaults to today.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
}

impl CreateInvoiceRequest {
    pub fn to_request(&self) -> Result<InvoiceRequest, InvoiceError> {
        parse_request(
            &self.company_id,
            &self.customer_id,
            &self.description,
            &self.amount_incl.as_text(),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: String,
    #[serde(flatten)]
    pub record: Record,
}

#[derive(Debug, Deserialize)]
pub struct CounterQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ResetCounterRequest {
    /// Ignored under the per-customer key scheme.
    #[serde(default)]
    pub company_id: Option<String>,
    pub customer_id: String,
    /// Defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
    pub value: NumberInput,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_accepts_number_or_text() {
        let body: CreateInvoiceRequest = serde_json::from_str(
            r#"{"company_id": "1", "customer_id": "3", "description": "Eye exam", "amount_incl": 99.99}"#,
        )
        .unwrap();
        assert_eq!(body.to_request().unwrap().amount_incl, dec!(99.99));

        let body: CreateInvoiceRequest = serde_json::from_str(
            r#"{"company_id": "1", "customer_id": "3", "description": "Eye exam", "amount_incl": "99,99"}"#,
        )
        .unwrap();
        assert_eq!(body.to_request().unwrap().amount_incl, dec!(99.99));
        assert!(body.issue_date.is_none());
    }
}
