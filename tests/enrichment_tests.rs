/// Scenario tests for the enrichment engine
/// Covers full records, empty records and malformed input through the public API
use chrono::{TimeZone, Utc};
use rust_darkdata_api::{
    enrich, enrich_at, enrich_value, Enricher, EnrichmentError, NamePattern, RawRecord,
};
use serde_json::{json, Value};

fn raw(value: Value) -> RawRecord {
    RawRecord::try_from(value).expect("test record is an object")
}

fn full_record() -> Value {
    json!({
        "user": {
            "name": "Ahmad Rezai",
            "email": "ahmad.rezai@example.com",
            "gender": "male",
            "location": "Tehran, Iran",
            "picture": "https://randomuser.me/api/portraits/men/1.jpg"
        },
        "random_name": "Ahmad Rezai",
        "phone_number": "+98 912 000 0000",
        "iban": "IR120170000000123456789012",
        "credit_card": {
            "card_number": "4539148803436467",
            "card_type": "visa",
            "expiration_date": "12/99",
            "cvv": "123"
        },
        "pet": "Simba",
        "quote": {"content": "Well begun is half done.", "author": "Aristotle"},
        "joke": {"type": "Pun", "content": "I used to be a banker but I lost interest."}
    })
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_full_coherent_record() {
        let enriched = enrich(raw(full_record()));
        let dark = &enriched.dark_data;

        assert_eq!(dark.financial_risk_score, 100);
        assert!(!dark.behavioral_profile.is_synthetic);
        assert_eq!(dark.behavioral_profile.name_pattern, NamePattern::Latin);
        assert_eq!(dark.metadata_enrichment.completeness_score, 100);
        assert_eq!(
            dark.metadata_enrichment.data_quality_flags,
            vec!["valid_email", "valid_iban", "valid_card_luhn"]
        );
        assert_eq!(dark.metadata_enrichment.source, "rust_pipeline_v1");
    }

    #[test]
    fn test_full_record_through_service_enricher() {
        let enricher = Enricher::default();
        let enriched = enricher.enrich_value(full_record()).unwrap();
        let dark = &enriched.dark_data;

        assert_eq!(dark.financial_risk_score, 100);
        assert_eq!(dark.behavioral_profile.name_pattern, NamePattern::Latin);
        assert_eq!(dark.metadata_enrichment.completeness_score, 100);
        assert_eq!(enriched.record, enrich(raw(full_record())).record);
    }

    #[test]
    fn test_arabic_script_scenario() {
        let enriched = enrich(raw(json!({
            "user": {"name": "احمد رضایی", "location": "Tehran, Iran"},
            "random_name": "احمد رضایی",
            "phone_number": "+98 912 000 0000",
            "iban": "IR12...",
            "credit_card": {"card_number": "4539148803436467", "expiration_date": "12/99"}
        })));
        let dark = &enriched.dark_data;

        assert!(!dark.behavioral_profile.is_synthetic);
        assert_eq!(dark.behavioral_profile.name_pattern, NamePattern::Arabic);
        assert_eq!(dark.behavioral_profile.cultural_coherence, 1.0);
        assert_eq!(dark.cultural_diversity_index, 0.0);
        assert_eq!(dark.financial_risk_score, 100);
    }

    #[test]
    fn test_empty_record() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        let enriched = enrich_at(RawRecord::default(), now);
        let dark = &enriched.dark_data;

        // geo 30 * 0.4, no card, no expiry
        assert_eq!(dark.financial_risk_score, 12);
        assert!(!dark.behavioral_profile.is_synthetic);
        assert_eq!(dark.behavioral_profile.name_pattern, NamePattern::Unknown);
        assert_eq!(dark.behavioral_profile.cultural_coherence, 0.5);
        assert_eq!(dark.cultural_diversity_index, 0.5);
        assert_eq!(dark.metadata_enrichment.completeness_score, 0);
        assert!(dark.metadata_enrichment.data_quality_flags.is_empty());
        assert_eq!(dark.metadata_enrichment.ingestion_timestamp, now);
    }

    #[test]
    fn test_geo_disagreement() {
        let enriched = enrich(raw(json!({
            "user": {"name": "John Smith", "location": "Denver, USA"},
            "random_name": "Jane Doe",
            "phone_number": "+33 6 12 34 56 78",
            "iban": "DE89370400440532013000",
            "credit_card": {"card_number": "1234567812345678", "expiration_date": "12/99"}
        })));
        let dark = &enriched.dark_data;

        // geo 0, bad card, expiry ok -> 20
        assert_eq!(dark.financial_risk_score, 20);
        assert!(dark.behavioral_profile.is_synthetic);
        assert_eq!(dark.behavioral_profile.cultural_coherence, 1.0);
        // latin -> FR vs US, both western
        assert_eq!(dark.cultural_diversity_index, 0.3);
    }

    #[test]
    fn test_generator_style_four_digit_year() {
        let enriched = enrich(raw(json!({
            "credit_card": {"card_number": "4539148803436467", "expiration_date": "12/2099"}
        })));
        // geo 30 -> 12, card 40, expiry 20
        assert_eq!(enriched.dark_data.financial_risk_score, 72);
    }
}

#[cfg(test)]
mod shape_tolerance_tests {
    use super::*;

    #[test]
    fn test_wrongly_typed_groups_degrade_gracefully() {
        let enriched = enrich(raw(json!({
            "user": "Ahmad",
            "credit_card": ["4539148803436467"],
            "quote": null,
            "iban": 42
        })));
        let dark = &enriched.dark_data;

        assert_eq!(dark.financial_risk_score, 12);
        assert_eq!(dark.behavioral_profile.name_pattern, NamePattern::Unknown);
        assert_eq!(dark.cultural_diversity_index, 0.5);
        // only "iban" (a number) counts as filled
        assert_eq!(dark.metadata_enrichment.completeness_score, 6);
    }

    #[test]
    fn test_original_fields_are_preserved() {
        let input = json!({
            "user": {"name": "Jean Dupont", "nickname": "JD"},
            "custom": {"nested": [1, 2, 3]},
            "pet": "Rex"
        });
        let enriched = enrich_value(input.clone()).unwrap();
        let output = serde_json::to_value(&enriched).unwrap();

        let mut without_dark = output.as_object().unwrap().clone();
        assert!(without_dark.remove("dark_data").is_some());
        assert_eq!(Value::Object(without_dark), input);
    }

    #[test]
    fn test_serialized_shape() {
        let output = serde_json::to_value(enrich(RawRecord::default())).unwrap();
        let dark = &output["dark_data"];

        assert!(dark["financial_risk_score"].is_u64());
        assert!(dark["behavioral_profile"]["is_synthetic"].is_boolean());
        assert_eq!(dark["behavioral_profile"]["name_pattern"], json!("unknown"));
        assert!(dark["cultural_diversity_index"].is_f64());
        assert!(dark["metadata_enrichment"]["ingestion_timestamp"].is_string());
        assert_eq!(dark["metadata_enrichment"]["data_quality_flags"], json!([]));
    }
}

#[cfg(test)]
mod invalid_input_tests {
    use super::*;

    #[test]
    fn test_non_object_records_are_rejected() {
        for value in [json!(null), json!([1, 2]), json!("record"), json!(true)] {
            let err = enrich_value(value).unwrap_err();
            assert!(matches!(err, EnrichmentError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_error_display() {
        let err = enrich_value(json!(null)).unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("Invalid input"));
        assert!(display.contains("missing"));
    }
}
