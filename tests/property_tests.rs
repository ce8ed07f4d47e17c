/// Property-based tests using proptest
/// Tests invariants that should hold for every record the engine can receive
use proptest::prelude::*;
use rust_darkdata_api::extractors::{detect_unicode_script, extract_iban_country};
use rust_darkdata_api::models::CHECKLIST_FIELDS;
use rust_darkdata_api::validators::is_valid_luhn;
use chrono::{TimeZone, Utc};
use rust_darkdata_api::{enrich, enrich_at, Enricher, RawRecord};
use serde_json::{json, Map, Value};

/// Arbitrary string values, including blanks and non-latin text.
fn field_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        "\\PC{0,24}".prop_map(Some),
        "\\+[0-9]{1,3} [0-9]{6,9}".prop_map(Some),
        "[A-Za-z]{2}[0-9]{2} ?[0-9 ]{10,24}".prop_map(Some),
        "[0-9]{2}/[0-9]{2}".prop_map(Some),
    ]
}

fn set_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [leaf] => {
            root.insert(leaf.to_string(), value);
        }
        [group, rest @ ..] => {
            let entry = root
                .entry(group.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = entry {
                set_path(inner, rest, value);
            }
        }
        [] => {}
    }
}

/// Records built from the checklist fields, each independently present or not.
fn record() -> impl Strategy<Value = Map<String, Value>> {
    proptest::collection::vec(field_value(), CHECKLIST_FIELDS.len()).prop_map(|values| {
        let mut root = Map::new();
        for (path, value) in CHECKLIST_FIELDS.iter().zip(values) {
            if let Some(v) = value {
                set_path(&mut root, path, json!(v));
            }
        }
        root
    })
}

// Property: score bounds
proptest! {
    #[test]
    fn financial_score_is_bounded(fields in record()) {
        let enriched = enrich(RawRecord::new(fields));
        prop_assert!(enriched.dark_data.financial_risk_score <= 100);
    }

    #[test]
    fn diversity_index_is_bounded_and_rounded(fields in record()) {
        let index = enrich(RawRecord::new(fields)).dark_data.cultural_diversity_index;
        prop_assert!((0.0..=1.0).contains(&index));
        prop_assert!(((index * 100.0).round() / 100.0 - index).abs() < 1e-12);
    }

    #[test]
    fn coherence_and_completeness_are_bounded(fields in record()) {
        let dark = enrich(RawRecord::new(fields)).dark_data;
        prop_assert!((0.0..=1.0).contains(&dark.behavioral_profile.cultural_coherence));
        prop_assert!(dark.metadata_enrichment.completeness_score <= 100);
    }
}

// Property: the free functions and a default Enricher agree on every record
proptest! {
    #[test]
    fn free_functions_match_default_enricher(fields in record(), secs in 0i64..4_000_000_000) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let record = RawRecord::new(fields);

        let via_enricher = Enricher::default().enrich_at(record.clone(), now);
        prop_assert_eq!(via_enricher, Ok(enrich_at(record, now)));
    }
}

// Property: completeness never decreases when a blank field gets a value
proptest! {
    #[test]
    fn completeness_is_monotonic(
        fields in record(),
        idx in 0usize..CHECKLIST_FIELDS.len(),
        filler in "[a-z]{1,12}"
    ) {
        let before = enrich(RawRecord::new(fields.clone()))
            .dark_data
            .metadata_enrichment
            .completeness_score;

        let mut filled = fields;
        set_path(&mut filled, CHECKLIST_FIELDS[idx], json!(filler));
        let after = enrich(RawRecord::new(filled))
            .dark_data
            .metadata_enrichment
            .completeness_score;

        prop_assert!(after >= before, "completeness dropped from {} to {}", before, after);
    }
}

// Property: extractors are total and idempotent
proptest! {
    #[test]
    fn iban_country_is_idempotent(iban in "\\PC*") {
        if let Some(country) = extract_iban_country(Some(&iban)) {
            prop_assert!(country.chars().count() <= 2);
            prop_assert_eq!(extract_iban_country(Some(&country)), Some(country.clone()));
        }
    }

    #[test]
    fn script_detection_never_panics(text in "\\PC*") {
        let _ = detect_unicode_script(&text);
    }

    #[test]
    fn luhn_ignores_separators(digits in "[0-9]{12,19}") {
        let spaced: String = digits
            .chars()
            .enumerate()
            .flat_map(|(i, c)| if i > 0 && i % 4 == 0 { vec![' ', c] } else { vec![c] })
            .collect();
        prop_assert_eq!(is_valid_luhn(&digits), is_valid_luhn(&spaced));
    }
}
