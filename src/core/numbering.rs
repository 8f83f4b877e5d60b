use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::InvoiceError;

/// How ledger buckets are keyed.
///
/// Both schemes exist in deployed ledgers, so both stay supported; the
/// active one is chosen in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// `{year}-{customer:02}`: one counter per customer and year.
    PerCustomer,
    /// `{year}-COMP{company:02}-CUST{customer:02}`: one counter per
    /// company, customer and year.
    #[default]
    PerCompanyCustomer,
}

/// Composite key identifying one counter bucket in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Build the key for `year` under the given scheme.
    ///
    /// `company_id` is required by [`KeyScheme::PerCompanyCustomer`] and
    /// ignored by [`KeyScheme::PerCustomer`].
    pub fn new(
        scheme: KeyScheme,
        year: i32,
        company_id: Option<&str>,
        customer_id: &str,
    ) -> Result<Self, InvoiceError> {
        if customer_id.trim().is_empty() {
            return Err(InvoiceError::InvalidInput(
                "customer id is required for a scope key".into(),
            ));
        }
        let key = match scheme {
            KeyScheme::PerCustomer => format!("{year}-{}", zfill2(customer_id)),
            KeyScheme::PerCompanyCustomer => {
                let company_id = company_id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| {
                        InvoiceError::InvalidInput(
                            "company id is required for company-scoped counters".into(),
                        )
                    })?;
                format!(
                    "{year}-COMP{}-CUST{}",
                    zfill2(company_id),
                    zfill2(customer_id)
                )
            }
        };
        Ok(Self(key))
    }

    /// Wrap a key read back from a ledger document.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format the printed invoice number: `{year}{customer:02}{sequence:02}`.
///
/// The shape does not depend on the key scheme. Sequences above 99 widen
/// the last field instead of wrapping, e.g. `2024-03`/`100` → `202403100`.
pub fn format_invoice_number(year: i32, customer_id: &str, sequence: u64) -> String {
    format!("{year:04}{}{sequence:02}", zfill2(customer_id))
}

/// Left-pad with zeros to two characters; longer ids are kept whole.
fn zfill2(id: &str) -> String {
    format!("{:0>2}", id.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_customer_key() {
        let key = ScopeKey::new(KeyScheme::PerCustomer, 2024, None, "3").unwrap();
        assert_eq!(key.as_str(), "2024-03");
    }

    #[test]
    fn per_customer_ignores_company() {
        let key = ScopeKey::new(KeyScheme::PerCustomer, 2024, Some("4"), "3").unwrap();
        assert_eq!(key.as_str(), "2024-03");
    }

    #[test]
    fn company_scoped_key() {
        let key = ScopeKey::new(KeyScheme::PerCompanyCustomer, 2024, Some("1"), "12").unwrap();
        assert_eq!(key.as_str(), "2024-COMP01-CUST12");
    }

    #[test]
    fn company_scoped_key_requires_company() {
        let err = ScopeKey::new(KeyScheme::PerCompanyCustomer, 2024, None, "12").unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidInput(_)));
        assert!(ScopeKey::new(KeyScheme::PerCompanyCustomer, 2024, Some(" "), "12").is_err());
    }

    #[test]
    fn wide_ids_are_not_truncated() {
        let key = ScopeKey::new(KeyScheme::PerCompanyCustomer, 2025, Some("123"), "4567").unwrap();
        assert_eq!(key.as_str(), "2025-COMP123-CUST4567");
    }

    #[test]
    fn invoice_number_shape() {
        assert_eq!(format_invoice_number(2024, "3", 1), "20240301");
        assert_eq!(format_invoice_number(2024, "12", 9), "20241209");
        assert_eq!(format_invoice_number(2024, "3", 100), "202403100");
        assert_eq!(format_invoice_number(2024, "123", 7), "202412307");
    }
}
