//! Presentation helpers shared by the HTML and PDF renderers.

use super::types::{IssuedInvoice, fields};

/// Display format of the invoice date.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

impl IssuedInvoice {
    /// Issue date as printed on the invoice, e.g. "15-03-2024".
    pub fn display_date(&self) -> String {
        self.issue_date.format(DATE_FORMAT).to_string()
    }
}

/// Company footer: name, address, then registration numbers.
/// Empty parts are left out.
pub fn footer_lines(invoice: &IssuedInvoice) -> Vec<String> {
    let company = &invoice.company;
    let address = [
        company.get(fields::ADDRESS_LINE1),
        company.get(fields::ADDRESS_LINE2),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(", ");

    let mut registration = Vec::new();
    for (label, field) in [("KvK", fields::KVK), ("BTW", fields::BTW), ("IBAN", fields::IBAN)] {
        let value = company.get(field);
        if !value.is_empty() {
            registration.push(format!("{label}: {value}"));
        }
    }

    [company.name().to_string(), address, registration.join(" | ")]
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect()
}

/// Label of the VAT row, e.g. "BTW 21%".
pub fn vat_label(invoice: &IssuedInvoice) -> String {
    format!("BTW {}%", invoice.amounts.rate.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Record, VatSplit};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice(company: Record) -> IssuedInvoice {
        IssuedInvoice {
            number: "20240301".into(),
            sequence: 1,
            scope_key: "2024-03".into(),
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            company_id: "1".into(),
            company,
            customer_id: "3".into(),
            customer: Record::new(),
            description: "Eye exam".into(),
            amounts: VatSplit::from_gross(dec!(121), dec!(21)).unwrap(),
        }
    }

    #[test]
    fn footer_skips_empty_parts() {
        let company: Record = [
            ("name", "Opto B.V."),
            ("address_line1", "Stationsweg 4"),
            ("address_line2", ""),
            ("btw", "NL001234567B01"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            footer_lines(&invoice(company)),
            ["Opto B.V.", "Stationsweg 4", "BTW: NL001234567B01"]
        );
    }

    #[test]
    fn date_and_vat_label() {
        let inv = invoice(Record::new());
        assert_eq!(inv.display_date(), "05-03-2024");
        assert_eq!(vat_label(&inv), "BTW 21%");
    }
}
