use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use factuur::core::*;
use factuur::html::render_invoice;
use factuur::invoicing::InvoiceService;
use factuur::pdf::{download_filename, render_pdf};
use factuur::settings::Settings;
use factuur::store::MemoryBackend;
use rust_decimal_macros::dec;

fn main() {
    let service = InvoiceService::new(Arc::new(MemoryBackend::new()), Settings::default());
    let (customer_id, _) = service
        .customers()
        .add(
            RecordBuilder::customer("Zoë de Vries")
                .address("Kerkplein 2", "5678 CD Elders")
                .build()
                .unwrap(),
        )
        .unwrap();

    let request = InvoiceRequestBuilder::new("1", customer_id)
        .description("Multifocale glazen")
        .amount_incl(dec!(1234.56))
        .build()
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

    let html = render_invoice(&service.preview(&request, date).unwrap()).unwrap();
    println!("{html}");

    // The number is only committed once the PDF exists.
    let (invoice, pdf) = service.generate_with(&request, date, render_pdf).unwrap();

    let out = std::env::temp_dir().join(PathBuf::from(download_filename(&invoice)));
    std::fs::write(&out, &pdf).unwrap();
    println!("wrote {} ({} bytes)", out.display(), pdf.len());
}
