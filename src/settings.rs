//! Application settings.
//!
//! Loaded from an optional file (TOML, JSON or YAML) overlaid with
//! `FACTUUR_`-prefixed environment variables. Nested keys use `__`, e.g.
//! `FACTUUR_SERVER__PORT=9000` or `FACTUUR_KEY_SCHEME=per_customer`.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{
    DEFAULT_VAT_RATE, InvoiceError, KeyScheme, Record, RecordBuilder, check_vat_rate,
};

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    pub documents: DocumentNames,
    /// Which ledger key scheme new invoices draw from.
    pub key_scheme: KeyScheme,
    /// VAT rate in percent.
    pub vat_rate: Decimal,
    /// Branding seeded when no company exists yet.
    pub default_company: DefaultCompany,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            documents: DocumentNames::default(),
            key_scheme: KeyScheme::default(),
            vat_rate: DEFAULT_VAT_RATE,
            default_company: DefaultCompany::default(),
            server: ServerSettings::default(),
        }
    }
}

/// File names of the persisted documents, relative to `data_dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentNames {
    pub customers: String,
    pub companies: String,
    pub invoice_log: String,
    pub descriptions: String,
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            customers: "customers.json".into(),
            companies: "companies.json".into(),
            invoice_log: "invoice_log.json".into(),
            descriptions: "recent_descriptions.json".into(),
        }
    }
}

/// Placeholder company written on first use.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultCompany {
    pub name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub kvk: String,
    pub btw: String,
    pub iban: String,
}

impl Default for DefaultCompany {
    fn default() -> Self {
        Self {
            name: "Mijn Bedrijf".into(),
            address_line1: "Straatnaam 1".into(),
            address_line2: "1234 AB Plaats".into(),
            kvk: "00000000".into(),
            btw: "NL000000000B01".into(),
            iban: "NL00BANK0000000000".into(),
        }
    }
}

impl DefaultCompany {
    pub fn to_record(&self) -> Result<Record, InvoiceError> {
        RecordBuilder::company(&self.name)
            .address(&self.address_line1, &self.address_line2)
            .kvk(&self.kvk)
            .btw(&self.btw)
            .iban(&self.iban)
            .build()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Filter directive for the log subscriber, e.g. "info" or "factuur=debug".
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            log_level: "info".into(),
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Load settings from `file` (if given) and the environment.
    ///
    /// A `vat_rate` outside `0..=100` is rejected here, before any service
    /// is built on it.
    pub fn load(file: Option<&Path>) -> Result<Self, InvoiceError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix("FACTUUR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| InvoiceError::InvalidInput(format!("configuration: {e}")))?;
        check_vat_rate(settings.vat_rate)?;
        Ok(settings)
    }

    /// Settings rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.key_scheme, KeyScheme::PerCompanyCustomer);
        assert_eq!(settings.vat_rate, DEFAULT_VAT_RATE);
        assert_eq!(settings.documents.invoice_log, "invoice_log.json");
        assert_eq!(settings.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"key_scheme": "per_customer", "data_dir": "/srv/factuur", "server": {{"port": 9000}}}}"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.key_scheme, KeyScheme::PerCustomer);
        assert_eq!(settings.data_dir, PathBuf::from("/srv/factuur"));
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.documents.customers, "customers.json");
    }

    #[test]
    fn out_of_range_vat_rate_is_rejected() {
        for rate in ["-100", "-0.5", "150"] {
            let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
            write!(file, r#"{{"vat_rate": "{rate}"}}"#).unwrap();

            let err = Settings::load(Some(file.path())).unwrap_err();
            let InvoiceError::InvalidInput(msg) = err else {
                panic!("expected InvalidInput for {rate}");
            };
            assert!(msg.contains("vat_rate"), "{msg}");
        }
    }

    #[test]
    fn vat_rate_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"vat_rate": "9"}}"#).unwrap();
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.vat_rate, Decimal::from(9));
    }

    #[test]
    fn default_company_is_a_valid_record() {
        let record = DefaultCompany::default().to_record().unwrap();
        assert_eq!(record.name(), "Mijn Bedrijf");
        assert_eq!(record.get("iban"), "NL00BANK0000000000");
    }
}
