//! Dark-data scorers.
//!
//! Each scorer turns one raw record into one [`Signal`]. Scorers share no
//! state and may run in any order; the enricher merges their signals into a
//! [`DarkData`](crate::models::DarkData).

use chrono::{DateTime, Utc};

use crate::extractors::{
    detect_unicode_script, extract_iban_country, extract_location_country, extract_phone_country,
};
use crate::models::{
    BehavioralProfile, MetadataEnrichment, NamePattern, RawRecord, CHECKLIST_FIELDS,
};
use crate::validators::{expires_beyond_horizon, is_valid_luhn};

/// Provenance tag written into every `metadata_enrichment`.
pub const SOURCE_TAG: &str = "rust_pipeline_v1";

pub const GEO_WEIGHT: f64 = 0.4;
pub const CARD_WEIGHT: f64 = 0.4;
pub const EXPIRY_WEIGHT: f64 = 0.2;

/// Geo coherence when at least one country could not be extracted.
pub const GEO_UNKNOWN: f64 = 30.0;

/// Reference country for each script, used by the diversity index.
pub const SCRIPT_HOME_COUNTRY: [(NamePattern, &str); 4] = [
    (NamePattern::Arabic, "IR"),
    (NamePattern::Latin, "FR"),
    (NamePattern::Cyrillic, "RU"),
    (NamePattern::Cjk, "CN"),
];

pub const REGION_CLUSTERS: [(&str, &[&str]); 5] = [
    ("western", &["FR", "DE", "ES", "IT", "UK", "US", "AU"]),
    ("eastern", &["CN", "JP", "KR"]),
    ("middleEast", &["IR", "SA", "AE"]),
    ("slavic", &["RU", "PL", "UA"]),
    ("latinAmerica", &["BR", "MX", "AR"]),
];

/// One `cultural_coherence` override. `countries: None` matches any location.
#[derive(Debug, Clone, Copy)]
pub struct CoherenceRule {
    pub script: NamePattern,
    pub countries: Option<&'static [&'static str]>,
    pub value: f64,
}

impl CoherenceRule {
    pub fn matches(&self, script: NamePattern, country: Option<&str>) -> bool {
        if script != self.script {
            return false;
        }
        match self.countries {
            None => true,
            Some(allowed) => country.is_some_and(|c| allowed.contains(&c)),
        }
    }
}

/// Coherence overrides in priority order; the first match wins.
pub const COHERENCE_RULES: [CoherenceRule; 4] = [
    CoherenceRule {
        script: NamePattern::Arabic,
        countries: Some(&["IR"]),
        value: 1.0,
    },
    CoherenceRule {
        script: NamePattern::Latin,
        countries: Some(&["FR", "US", "UK"]),
        value: 1.0,
    },
    CoherenceRule {
        script: NamePattern::Cyrillic,
        countries: Some(&["RU"]),
        value: 1.0,
    },
    CoherenceRule {
        script: NamePattern::Mixed,
        countries: None,
        value: 0.3,
    },
];

pub const DEFAULT_COHERENCE: f64 = 0.5;
pub const DEFAULT_DIVERSITY: f64 = 0.5;

/// Inputs shared by every scorer for a single enrichment call.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub record: &'a RawRecord,
    /// Captured once per call.
    pub now: DateTime<Utc>,
}

/// Output of one scorer.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    FinancialRisk(u8),
    Behavioral(BehavioralProfile),
    CulturalDiversity(f64),
    Metadata(MetadataEnrichment),
}

impl Signal {
    /// Name of the `dark_data` field this signal fills.
    pub fn field(&self) -> &'static str {
        match self {
            Signal::FinancialRisk(_) => "financial_risk_score",
            Signal::Behavioral(_) => "behavioral_profile",
            Signal::CulturalDiversity(_) => "cultural_diversity_index",
            Signal::Metadata(_) => "metadata_enrichment",
        }
    }
}

/// A dark-data strategy.
pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, ctx: &ScoringContext<'_>) -> Signal;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FinancialRiskScorer;

impl Scorer for FinancialRiskScorer {
    fn name(&self) -> &'static str {
        "financial_risk"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Signal {
        Signal::FinancialRisk(financial_risk_score(ctx.record, ctx.now))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BehavioralProfileScorer;

impl Scorer for BehavioralProfileScorer {
    fn name(&self) -> &'static str {
        "behavioral_profile"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Signal {
        Signal::Behavioral(behavioral_profile(ctx.record))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CulturalDiversityScorer;

impl Scorer for CulturalDiversityScorer {
    fn name(&self) -> &'static str {
        "cultural_diversity"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Signal {
        Signal::CulturalDiversity(cultural_diversity_index(ctx.record))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MetadataScorer;

impl Scorer for MetadataScorer {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> Signal {
        Signal::Metadata(metadata_enrichment(ctx.record, ctx.now))
    }
}

// ============ Financial risk ============

/// Agreement between the IBAN, phone and location countries (0, 30, 50 or 100).
///
/// Any single pairwise match scores 50, IBAN vs. location included. Older
/// generator pipelines only credited IBAN/phone and phone/location pairs.
pub fn geo_coherence(iban: Option<&str>, phone: Option<&str>, location: Option<&str>) -> f64 {
    match (iban, phone, location) {
        (Some(i), Some(p), Some(l)) => {
            if i == p && p == l {
                100.0
            } else if i == p || p == l || i == l {
                50.0
            } else {
                0.0
            }
        }
        _ => GEO_UNKNOWN,
    }
}

/// Weighted blend of geo coherence, card checksum and expiration horizon.
pub fn financial_risk_score(record: &RawRecord, now: DateTime<Utc>) -> u8 {
    let iban_country = extract_iban_country(record.iban());
    let geo = geo_coherence(
        iban_country.as_deref(),
        extract_phone_country(record.phone_number()),
        extract_location_country(record.user_location()),
    );

    let card = if record.card_number().is_some_and(is_valid_luhn) {
        100.0
    } else {
        0.0
    };

    let expiry = if record
        .card_expiration()
        .is_some_and(|exp| expires_beyond_horizon(exp, now))
    {
        100.0
    } else {
        0.0
    };

    let score = geo * GEO_WEIGHT + card * CARD_WEIGHT + expiry * EXPIRY_WEIGHT;
    score.round().clamp(0.0, 100.0) as u8
}

// ============ Behavioral profile ============

/// `cultural_coherence` for a script/location pair.
pub fn cultural_coherence(script: NamePattern, location_country: Option<&str>) -> f64 {
    COHERENCE_RULES
        .iter()
        .find(|rule| rule.matches(script, location_country))
        .map(|rule| rule.value)
        .unwrap_or(DEFAULT_COHERENCE)
}

pub fn behavioral_profile(record: &RawRecord) -> BehavioralProfile {
    let user_name = record.user_name().unwrap_or("");
    let random_name = record.random_name().unwrap_or("");

    let name_pattern = detect_unicode_script(user_name);
    let location_country = extract_location_country(record.user_location());

    BehavioralProfile {
        is_synthetic: user_name.to_lowercase() != random_name.to_lowercase(),
        cultural_coherence: cultural_coherence(name_pattern, location_country),
        name_pattern,
    }
}

// ============ Cultural diversity ============

fn region_of(country: &str) -> Option<&'static str> {
    REGION_CLUSTERS
        .iter()
        .find(|(_, members)| members.contains(&country))
        .map(|(region, _)| *region)
}

/// Heuristic distance between two countries: 0 (same), 0.3 (same region
/// cluster) or 0.8.
pub fn cultural_distance(a: &str, b: &str) -> f64 {
    if a == b {
        return 0.0;
    }
    match (region_of(a), region_of(b)) {
        (Some(ra), Some(rb)) if ra == rb => 0.3,
        _ => 0.8,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distance between a name's expected home country and its stated location.
pub fn cultural_diversity_index(record: &RawRecord) -> f64 {
    let script = detect_unicode_script(record.user_name().unwrap_or(""));
    let expected = SCRIPT_HOME_COUNTRY
        .iter()
        .find(|(s, _)| *s == script)
        .map(|(_, country)| *country);
    let actual = extract_location_country(record.user_location());

    match (expected, actual) {
        (Some(expected), Some(actual)) => {
            round2(cultural_distance(expected, actual)).clamp(0.0, 1.0)
        }
        _ => DEFAULT_DIVERSITY,
    }
}

// ============ Metadata ============

/// Percentage of [`CHECKLIST_FIELDS`] that carry a value.
pub fn completeness_score(record: &RawRecord) -> u8 {
    let filled = CHECKLIST_FIELDS
        .iter()
        .filter(|path| record.is_filled(path))
        .count();

    let pct = filled as f64 / CHECKLIST_FIELDS.len() as f64 * 100.0;
    pct.round().clamp(0.0, 100.0) as u8
}

/// Structural quality flags, always in the same order.
pub fn data_quality_flags(record: &RawRecord) -> Vec<String> {
    let mut flags = Vec::new();

    if record.user_email().is_some_and(|email| email.contains('@')) {
        flags.push("valid_email".to_string());
    }
    if record.iban().is_some_and(|iban| iban.chars().count() >= 15) {
        flags.push("valid_iban".to_string());
    }
    if record.card_number().is_some_and(is_valid_luhn) {
        flags.push("valid_card_luhn".to_string());
    }

    flags
}

pub fn metadata_enrichment(record: &RawRecord, now: DateTime<Utc>) -> MetadataEnrichment {
    MetadataEnrichment {
        completeness_score: completeness_score(record),
        ingestion_timestamp: now,
        data_quality_flags: data_quality_flags(record),
        source: SOURCE_TAG.to_string(),
    }
}
