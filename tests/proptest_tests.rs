//! Property-based tests for the store, ledger and numbering.
//!
//! Run with: `cargo test --test proptest_tests`

use std::sync::Arc;

use factuur::core::*;
use factuur::store::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn ledger() -> CounterLedger {
    CounterLedger::new(Arc::new(MemoryBackend::new()), "invoice_log.json")
}

fn arb_ids() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1_000_000, 0..20)
}

fn arb_scope() -> impl Strategy<Value = ScopeKey> {
    (
        prop_oneof![Just(KeyScheme::PerCustomer), Just(KeyScheme::PerCompanyCustomer)],
        2000i32..2100,
        1u32..200,
        1u32..500,
    )
        .prop_map(|(scheme, year, company, customer)| {
            ScopeKey::new(scheme, year, Some(company.to_string().as_str()), &customer.to_string())
                .unwrap()
        })
}

fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 éëöüßÅ€–“”日本]{1,40}").unwrap()
}

proptest! {
    #[test]
    fn next_id_exceeds_every_key(ids in arb_ids()) {
        let collection: Collection = ids
            .iter()
            .map(|id| (id.to_string(), Record::new()))
            .collect();
        let next: u64 = next_id(&collection).unwrap().parse().unwrap();
        prop_assert!(ids.iter().all(|id| next > *id));
        prop_assert_eq!(next, ids.iter().max().map_or(1, |max| max + 1));
    }

    #[test]
    fn advance_counts_from_one(key in arb_scope(), n in 1usize..30) {
        let ledger = ledger();
        let issued: Vec<u64> = (0..n).map(|_| ledger.advance(&key).unwrap()).collect();
        let expected: Vec<u64> = (1..=n as u64).collect();
        prop_assert_eq!(issued, expected);
        prop_assert_eq!(ledger.peek(&key).unwrap(), n as u64);
    }

    #[test]
    fn reset_then_peek(key in arb_scope(), before in 0usize..5, value in any::<u64>()) {
        let ledger = ledger();
        for _ in 0..before {
            ledger.advance(&key).unwrap();
        }
        ledger.reset(&key, value).unwrap();
        prop_assert_eq!(ledger.peek(&key).unwrap(), value);
    }

    #[test]
    fn touch_is_idempotent(first in arb_text(), others in prop::collection::vec(arb_text(), 0..12)) {
        prop_assume!(!first.trim().is_empty());
        prop_assume!(!others.contains(&first));
        let cache = DescriptionCache::new(Arc::new(MemoryBackend::new()), "recent_descriptions.json");
        for other in &others {
            cache.touch(other).unwrap();
        }
        let once = cache.touch(&first).unwrap();
        let twice = cache.touch(&first).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&once[0], &first);
        prop_assert!(once.len() <= RECENT_DESCRIPTIONS_LIMIT);
    }

    #[test]
    fn collection_round_trips(names in prop::collection::vec(arb_text(), 1..8)) {
        let backend = Arc::new(MemoryBackend::new());
        let store = RecordStore::new(backend.clone(), "customers.json", RecordKind::Customer);
        let collection: Collection = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let record: Record = [(fields::NAME, name.as_str()), ("note", "ü€")].into_iter().collect();
                ((i + 1).to_string(), record)
            })
            .collect();

        store.save(&collection).unwrap();
        prop_assert_eq!(store.load().unwrap(), collection);

        let raw = backend.read("customers.json").unwrap().unwrap();
        prop_assert!(raw.contains("ü€"));
        for name in &names {
            prop_assert!(raw.contains(name.as_str()));
        }
    }

    #[test]
    fn vat_parts_sum_to_gross(cents in 1i64..100_000_000, rate in 0u32..30) {
        let incl = Decimal::new(cents, 2);
        let split = VatSplit::from_gross(incl, Decimal::from(rate)).unwrap();
        prop_assert_eq!(split.excl + split.vat, incl);
        prop_assert!(split.excl <= incl);
        prop_assert!(split.vat >= Decimal::ZERO);
    }

    #[test]
    fn invoice_number_embeds_customer_and_sequence(year in 2000i32..2100, customer in 1u32..100, seq in 1u64..100) {
        let number = format_invoice_number(year, &customer.to_string(), seq);
        prop_assert_eq!(number.len(), 8);
        prop_assert_eq!(&number[..4], year.to_string());
        prop_assert_eq!(number[4..6].parse::<u32>().unwrap(), customer);
        prop_assert_eq!(number[6..].parse::<u64>().unwrap(), seq);
    }
}
