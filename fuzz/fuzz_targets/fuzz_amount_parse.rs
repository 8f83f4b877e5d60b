#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(amount) = factuur::parse_amount(s) {
            if let Ok(split) = factuur::VatSplit::from_gross(amount, factuur::DEFAULT_VAT_RATE) {
                let _ = factuur::format_eur(split.excl);
            }
        }
        let _ = factuur::parse_counter_value(s);
    }
});
