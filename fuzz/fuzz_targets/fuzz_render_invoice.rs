#![no_main]

use std::sync::Arc;

use chrono::NaiveDate;
use factuur::invoicing::InvoiceService;
use factuur::settings::Settings;
use factuur::store::MemoryBackend;
use factuur::{RecordBuilder, parse_request};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (name, description) = s.split_once('\n').unwrap_or((s, "x"));

    let service = InvoiceService::new(Arc::new(MemoryBackend::new()), Settings::default());
    let Ok(customer) = RecordBuilder::customer(name).build() else {
        return;
    };
    let Ok((id, _)) = service.customers().add(customer) else {
        return;
    };
    let Ok(request) = parse_request("1", &id, description, "99,95") else {
        return;
    };
    let Some(date) = NaiveDate::from_ymd_opt(2024, 3, 15) else {
        return;
    };
    let _ = service.generate_with(&request, date, |invoice| {
        factuur::html::render_invoice(invoice)?;
        factuur::pdf::render_pdf(invoice)
    });
});
