use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::vat::VatSplit;

/// Field names used by customer and company records.
pub mod fields {
    pub const NAME: &str = "name";
    pub const ADDRESS_LINE1: &str = "address_line1";
    pub const ADDRESS_LINE2: &str = "address_line2";
    /// Chamber of commerce registration number.
    pub const KVK: &str = "kvk";
    /// VAT identification number.
    pub const BTW: &str = "btw";
    pub const IBAN: &str = "iban";

    pub const CUSTOMER: &[&str] = &[NAME, ADDRESS_LINE1, ADDRESS_LINE2];
    pub const COMPANY: &[&str] = &[NAME, ADDRESS_LINE1, ADDRESS_LINE2, KVK, BTW, IBAN];
}

/// A customer or company: a flat mapping of named text fields.
///
/// Serialized transparently, so a record is a plain JSON object of strings
/// and fields this crate does not know about survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field value, or `""` when the field is missing.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn name(&self) -> &str {
        self.get(fields::NAME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A keyed collection of records, as stored in `customers.json` / `companies.json`.
pub type Collection = BTreeMap<String, Record>;

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Customer,
    Company,
}

impl RecordKind {
    /// Label used in errors and log events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Company => "company",
        }
    }

    /// Fields an edit form for this kind carries.
    pub fn known_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Customer => fields::CUSTOMER,
            Self::Company => fields::COMPANY,
        }
    }
}

/// Operator input for one invoice: issuer, customer, and a single line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub company_id: String,
    pub customer_id: String,
    /// Line item description.
    pub description: String,
    /// Gross amount, VAT included.
    pub amount_incl: Decimal,
}

/// An invoice after a sequence number was drawn for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedInvoice {
    /// Printed invoice number, e.g. "20240301".
    pub number: String,
    /// Sequence drawn from the ledger.
    pub sequence: u64,
    /// Ledger bucket the sequence was drawn from.
    pub scope_key: String,
    pub issue_date: NaiveDate,
    pub company_id: String,
    pub company: Record,
    pub customer_id: String,
    pub customer: Record,
    pub description: String,
    pub amounts: VatSplit,
}
