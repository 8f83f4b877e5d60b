use std::sync::Arc;

use chrono::NaiveDate;
use factuur::core::*;
use factuur::invoicing::InvoiceService;
use factuur::settings::Settings;
use factuur::store::MemoryBackend;
use rust_decimal_macros::dec;

fn main() {
    let customers = r#"{
        "3": {"name": "Jan Jansen", "address_line1": "Dorpsstraat 1", "address_line2": ""},
        "12": {"name": "Piet Pietersen", "address_line1": "Laan 5", "address_line2": ""}
    }"#;
    let backend = Arc::new(MemoryBackend::new().with_document("customers.json", customers));
    let service = InvoiceService::new(backend, Settings::default());

    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let request = InvoiceRequestBuilder::new("1", "12")
        .description("Controle")
        .amount_incl(dec!(45))
        .build()
        .unwrap();
    for _ in 0..3 {
        let invoice = service.generate(&request, date).unwrap();
        println!("issued {} from {}", invoice.number, invoice.scope_key);
    }

    // Continue numbering from a paper ledger.
    let key = service.reset_counter(Some("1"), "3", 2024, "17").unwrap();
    println!("counter {key} reset to 17");

    println!("{:<8} {:<9} {:<22} {}", "company", "customer", "key", "value");
    for row in service.counter_overview(2024).unwrap() {
        println!(
            "{:<8} {:<9} {:<22} {}",
            row.company_id.as_deref().unwrap_or("-"),
            row.customer_id,
            row.key,
            row.value
        );
    }

    // Invalid values are rejected before anything is written.
    if let Err(e) = service.reset_counter(Some("1"), "3", 2024, "-1") {
        println!("rejected: {e}");
    }
}
