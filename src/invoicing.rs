//! The invoice-creation flow.
//!
//! [`InvoiceService`] validates a request, resolves company and customer,
//! splits the gross amount, draws a sequence number from the ledger and
//! records the description for reuse.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::core::{
    Collection, InvoiceError, InvoiceRequest, IssuedInvoice, Record, RecordKind, ScopeKey,
    VatSplit, format_invoice_number, parse_counter_value, validate_request,
};
use crate::settings::Settings;
use crate::store::{
    CounterLedger, CounterView, DescriptionCache, FileBackend, RecordStore, Reservation,
    SharedBackend,
};

/// Issues invoices against one set of documents.
#[derive(Clone)]
pub struct InvoiceService {
    settings: Settings,
    customers: RecordStore,
    companies: RecordStore,
    ledger: CounterLedger,
    descriptions: DescriptionCache,
}

impl InvoiceService {
    /// Service over `backend`, with document names and behavior from `settings`.
    pub fn new(backend: SharedBackend, settings: Settings) -> Self {
        let docs = &settings.documents;
        Self {
            customers: RecordStore::new(backend.clone(), &docs.customers, RecordKind::Customer),
            companies: RecordStore::new(backend.clone(), &docs.companies, RecordKind::Company),
            ledger: CounterLedger::new(backend.clone(), &docs.invoice_log),
            descriptions: DescriptionCache::new(backend, &docs.descriptions),
            settings,
        }
    }

    /// Service over files in `settings.data_dir`.
    pub fn from_settings(settings: Settings) -> Self {
        let backend = Arc::new(FileBackend::new(settings.data_dir.clone()));
        Self::new(backend, settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn customers(&self) -> &RecordStore {
        &self.customers
    }

    pub fn companies(&self) -> &RecordStore {
        &self.companies
    }

    pub fn ledger(&self) -> &CounterLedger {
        &self.ledger
    }

    pub fn descriptions(&self) -> &DescriptionCache {
        &self.descriptions
    }

    /// Companies, seeding the configured default company if there are none.
    pub fn companies_or_default(&self) -> Result<Collection, InvoiceError> {
        let default = self.settings.default_company.to_record()?;
        self.companies.ensure_default(&default)
    }

    /// Issue an invoice dated `date`.
    ///
    /// The counter is advanced before returning. If the caller fails to
    /// produce the document afterwards, the number stays used; see
    /// [`generate_with`](Self::generate_with) to avoid that.
    pub fn generate(
        &self,
        request: &InvoiceRequest,
        date: NaiveDate,
    ) -> Result<IssuedInvoice, InvoiceError> {
        self.generate_with(request, date, |_| Ok(()))
            .map(|(invoice, ())| invoice)
    }

    /// Issue an invoice and produce its document with `render`.
    ///
    /// The sequence is reserved first and only committed after `render`
    /// succeeds, so a failed render burns no number and caches nothing.
    /// Once committed the invoice is returned even if caching its
    /// description fails.
    pub fn generate_with<T, F>(
        &self,
        request: &InvoiceRequest,
        date: NaiveDate,
        render: F,
    ) -> Result<(IssuedInvoice, T), InvoiceError>
    where
        F: FnOnce(&IssuedInvoice) -> Result<T, InvoiceError>,
    {
        let (invoice, reservation) = self.prepare(request, date)?;

        let output = render(&invoice).inspect_err(|e| {
            tracing::warn!(number = %invoice.number, error = %e, "render failed, sequence not committed");
        })?;

        self.ledger.commit(reservation)?;
        // The number is spent from here on; the cache is only a convenience.
        if let Err(e) = self.descriptions.touch(&invoice.description) {
            tracing::warn!(number = %invoice.number, error = %e, "description not cached");
        }

        tracing::info!(
            number = %invoice.number,
            key = %invoice.scope_key,
            company_id = %invoice.company_id,
            customer_id = %invoice.customer_id,
            "invoice issued"
        );
        Ok((invoice, output))
    }

    /// The invoice `generate` would issue right now, without writing
    /// anything. The number is only a prediction.
    pub fn preview(
        &self,
        request: &InvoiceRequest,
        date: NaiveDate,
    ) -> Result<IssuedInvoice, InvoiceError> {
        let (invoice, _unused) = self.prepare(request, date)?;
        Ok(invoice)
    }

    fn prepare(
        &self,
        request: &InvoiceRequest,
        date: NaiveDate,
    ) -> Result<(IssuedInvoice, Reservation), InvoiceError> {
        let errors = validate_request(request);
        if !errors.is_empty() {
            let err = InvoiceError::from_validation(&errors);
            tracing::warn!(error = %err, "invoice request rejected");
            return Err(err);
        }

        let mut companies = self.companies_or_default()?;
        let company = companies
            .remove(&request.company_id)
            .ok_or_else(|| InvoiceError::not_found("company", &request.company_id))?;
        let customer = self.customers.get(&request.customer_id)?;
        // Surface a corrupt cache before the counter moves.
        self.descriptions.recent()?;

        let year = date.year();
        let key = ScopeKey::new(
            self.settings.key_scheme,
            year,
            Some(request.company_id.as_str()),
            &request.customer_id,
        )?;
        let reservation = self.ledger.reserve(&key)?;
        let sequence = reservation.sequence();

        let invoice = IssuedInvoice {
            number: format_invoice_number(year, &request.customer_id, sequence),
            sequence,
            scope_key: key.as_str().to_string(),
            issue_date: date,
            company_id: request.company_id.clone(),
            company,
            customer_id: request.customer_id.clone(),
            customer,
            description: request.description.clone(),
            amounts: VatSplit::from_gross(request.amount_incl, self.settings.vat_rate)?,
        };
        Ok((invoice, reservation))
    }

    /// Administrative override of one counter for `year`.
    ///
    /// `raw_value` must be a non-negative integer; it is checked before
    /// anything is written.
    pub fn reset_counter(
        &self,
        company_id: Option<&str>,
        customer_id: &str,
        year: i32,
        raw_value: &str,
    ) -> Result<ScopeKey, InvoiceError> {
        let value = parse_counter_value(raw_value)?;
        let key = ScopeKey::new(self.settings.key_scheme, year, company_id, customer_id)?;
        self.ledger.reset(&key, value)?;
        Ok(key)
    }

    /// Counter value for every company × customer pair in `year`.
    pub fn counter_overview(&self, year: i32) -> Result<Vec<CounterView>, InvoiceError> {
        let companies = self.companies_or_default()?;
        let customers = self.customers.load()?;
        self.ledger
            .overview(self.settings.key_scheme, year, &companies, &customers)
    }

    /// Look up a record by kind.
    pub fn record(&self, kind: RecordKind, id: &str) -> Result<Record, InvoiceError> {
        match kind {
            RecordKind::Customer => self.customers.get(id),
            RecordKind::Company => self.companies.get(id),
        }
    }
}
