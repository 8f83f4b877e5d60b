use std::sync::Arc;

use chrono::NaiveDate;
use factuur::core::*;
use factuur::invoicing::InvoiceService;
use factuur::settings::Settings;
use factuur::store::MemoryBackend;
use rust_decimal_macros::dec;

fn main() {
    let service = InvoiceService::new(Arc::new(MemoryBackend::new()), Settings::default());

    // Issuing company; without one the configured default is seeded.
    let (company_id, _) = service
        .companies()
        .add(
            RecordBuilder::company("Opto B.V.")
                .address("Stationsweg 4", "3511 ED Utrecht")
                .kvk("12345678")
                .btw("NL001234567B01")
                .iban("NL91ABNA0417164300")
                .build()
                .unwrap(),
        )
        .unwrap();

    let (customer_id, _) = service
        .customers()
        .add(
            RecordBuilder::customer("Jan Jansen")
                .address("Dorpsstraat 1", "1234 AB Ergens")
                .build()
                .unwrap(),
        )
        .unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    for amount in [dec!(60.50), dec!(121), dec!(99.99)] {
        let request = InvoiceRequestBuilder::new(&company_id, &customer_id)
            .description("Oogmeting")
            .amount_incl(amount)
            .build()
            .unwrap();
        let invoice = service.generate(&request, date).unwrap();

        println!(
            "{}  {}  excl {}  {} {}  incl {}",
            invoice.number,
            invoice.display_date(),
            format_eur(invoice.amounts.excl),
            vat_label(&invoice),
            format_eur(invoice.amounts.vat),
            format_eur(invoice.amounts.incl),
        );
    }

    // Raw form input goes through the same validation.
    match parse_request("1", "x", "", "abc") {
        Ok(_) => println!("unexpectedly valid"),
        Err(e) => println!("rejected: {e}"),
    }

    println!("recent descriptions: {:?}", service.descriptions().recent().unwrap());
}
