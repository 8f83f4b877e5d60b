use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::{Collection, InvoiceError, KeyScheme, ScopeKey};

use super::backend::{SharedBackend, load_json, save_json};

/// Persisted ledger content: scope key → last issued sequence.
pub type LedgerEntries = BTreeMap<String, u64>;

/// Invoice counter ledger.
///
/// Each scope key is an independent counter cell. Absent keys read as 0.
/// A ledger document that exists but does not parse is reported as
/// `CorruptData` and never treated as empty, which would hand out duplicate
/// invoice numbers.
#[derive(Clone)]
pub struct CounterLedger {
    backend: SharedBackend,
    document: String,
}

/// A sequence number computed but not yet persisted.
///
/// Obtained from [`CounterLedger::reserve`]; becomes the issued number only
/// once [`CounterLedger::commit`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a reservation does nothing until it is committed"]
pub struct Reservation {
    key: ScopeKey,
    sequence: u64,
}

impl Reservation {
    pub fn key(&self) -> &ScopeKey {
        &self.key
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// One row of the counter overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterView {
    pub company_id: Option<String>,
    pub customer_id: String,
    pub key: String,
    pub value: u64,
}

impl CounterLedger {
    pub fn new(backend: SharedBackend, document: impl Into<String>) -> Self {
        Self {
            backend,
            document: document.into(),
        }
    }

    /// All stored counters.
    pub fn entries(&self) -> Result<LedgerEntries, InvoiceError> {
        load_json(self.backend.as_ref(), &self.document)
    }

    /// Current value for `key`, 0 when unseen.
    pub fn peek(&self, key: &ScopeKey) -> Result<u64, InvoiceError> {
        Ok(self.entries()?.get(key.as_str()).copied().unwrap_or(0))
    }

    /// Increment `key` by one, persist, and return the new value.
    ///
    /// The returned value is the sequence number of the invoice being issued.
    pub fn advance(&self, key: &ScopeKey) -> Result<u64, InvoiceError> {
        let reservation = self.reserve(key)?;
        self.commit(reservation)
    }

    /// Compute the next sequence for `key` without writing anything.
    pub fn reserve(&self, key: &ScopeKey) -> Result<Reservation, InvoiceError> {
        let current = self.peek(key)?;
        let sequence = current.checked_add(1).ok_or_else(|| {
            InvoiceError::InvalidState(format!("counter {key} cannot be incremented past {current}"))
        })?;
        Ok(Reservation {
            key: key.clone(),
            sequence,
        })
    }

    /// Persist a reservation.
    ///
    /// Fails with `InvalidState`, writing nothing, if the counter moved since
    /// the reservation was taken.
    pub fn commit(&self, reservation: Reservation) -> Result<u64, InvoiceError> {
        let mut entries = self.entries()?;
        let current = entries.get(reservation.key.as_str()).copied().unwrap_or(0);
        if current.checked_add(1) != Some(reservation.sequence) {
            return Err(InvoiceError::InvalidState(format!(
                "counter {} is at {current}, cannot commit sequence {}",
                reservation.key, reservation.sequence
            )));
        }
        entries.insert(reservation.key.as_str().to_string(), reservation.sequence);
        save_json(self.backend.as_ref(), &self.document, &entries)?;

        tracing::info!(key = %reservation.key, sequence = reservation.sequence, "counter advanced");
        Ok(reservation.sequence)
    }

    /// Overwrite the counter for `key`, also to a lower value.
    pub fn reset(&self, key: &ScopeKey, value: u64) -> Result<(), InvoiceError> {
        let mut entries = self.entries()?;
        let previous = entries.insert(key.as_str().to_string(), value);
        save_json(self.backend.as_ref(), &self.document, &entries)?;

        tracing::warn!(%key, value, previous = previous.unwrap_or(0), "counter reset");
        Ok(())
    }

    /// Current counter for every company × customer pair in `year`.
    ///
    /// Under [`KeyScheme::PerCustomer`] companies do not scope the counter,
    /// so one row per customer is listed.
    pub fn overview(
        &self,
        scheme: KeyScheme,
        year: i32,
        companies: &Collection,
        customers: &Collection,
    ) -> Result<Vec<CounterView>, InvoiceError> {
        let entries = self.entries()?;
        let mut rows = Vec::new();

        let company_ids: Vec<Option<&str>> = match scheme {
            KeyScheme::PerCustomer => vec![None],
            KeyScheme::PerCompanyCustomer => companies.keys().map(|id| Some(id.as_str())).collect(),
        };

        for company_id in company_ids {
            for customer_id in customers.keys() {
                let key = ScopeKey::new(scheme, year, company_id, customer_id)?;
                rows.push(CounterView {
                    company_id: company_id.map(str::to_string),
                    customer_id: customer_id.clone(),
                    value: entries.get(key.as_str()).copied().unwrap_or(0),
                    key: key.as_str().to_string(),
                });
            }
        }

        Ok(rows)
    }
}
