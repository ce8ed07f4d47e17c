//! Dark-data enrichment of raw identity records.
//!
//! The [`Enricher`] runs every registered [`Scorer`] over one record and merges
//! their signals under `dark_data`:
//! 1. Capture "now" once for the call
//! 2. Run each scorer against the same record and instant
//! 3. Merge the signals, rejecting incomplete sets
//! 4. Attach `dark_data` to the untouched original fields

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::LazyLock;

use crate::errors::EnrichmentError;
use crate::models::{BehavioralProfile, DarkData, EnrichedRecord, MetadataEnrichment, RawRecord};
use crate::scorers::{
    BehavioralProfileScorer, CulturalDiversityScorer, FinancialRiskScorer, MetadataScorer, Scorer,
    ScoringContext, Signal,
};

/// Collects signals until every `dark_data` field is present.
#[derive(Debug, Default)]
pub struct DarkDataBuilder {
    financial_risk_score: Option<u8>,
    behavioral_profile: Option<BehavioralProfile>,
    cultural_diversity_index: Option<f64>,
    metadata_enrichment: Option<MetadataEnrichment>,
}

impl DarkDataBuilder {
    /// Records a signal. A later signal for the same field replaces an earlier one.
    pub fn push(&mut self, signal: Signal) {
        match signal {
            Signal::FinancialRisk(score) => self.financial_risk_score = Some(score.min(100)),
            Signal::Behavioral(mut profile) => {
                profile.cultural_coherence = profile.cultural_coherence.clamp(0.0, 1.0);
                self.behavioral_profile = Some(profile);
            }
            Signal::CulturalDiversity(index) => {
                self.cultural_diversity_index = Some(index.clamp(0.0, 1.0))
            }
            Signal::Metadata(mut metadata) => {
                metadata.completeness_score = metadata.completeness_score.min(100);
                self.metadata_enrichment = Some(metadata);
            }
        }
    }

    pub fn build(self) -> Result<DarkData, EnrichmentError> {
        Ok(DarkData {
            financial_risk_score: self
                .financial_risk_score
                .ok_or(EnrichmentError::MissingSignal("financial_risk_score"))?,
            behavioral_profile: self
                .behavioral_profile
                .ok_or(EnrichmentError::MissingSignal("behavioral_profile"))?,
            cultural_diversity_index: self
                .cultural_diversity_index
                .ok_or(EnrichmentError::MissingSignal("cultural_diversity_index"))?,
            metadata_enrichment: self
                .metadata_enrichment
                .ok_or(EnrichmentError::MissingSignal("metadata_enrichment"))?,
        })
    }
}

/// Ordered set of scorers applied to each record.
pub struct Enricher {
    scorers: Vec<Box<dyn Scorer>>,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::with_scorers(vec![
            Box::new(FinancialRiskScorer),
            Box::new(BehavioralProfileScorer),
            Box::new(CulturalDiversityScorer),
            Box::new(MetadataScorer),
        ])
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher")
            .field("scorers", &self.scorer_names())
            .finish()
    }
}

impl Enricher {
    pub fn with_scorers(scorers: Vec<Box<dyn Scorer>>) -> Self {
        Self { scorers }
    }

    pub fn scorer_names(&self) -> Vec<&'static str> {
        self.scorers.iter().map(|s| s.name()).collect()
    }

    /// Computes `dark_data` for `record` as of `now`.
    pub fn dark_data(
        &self,
        record: &RawRecord,
        now: DateTime<Utc>,
    ) -> Result<DarkData, EnrichmentError> {
        let ctx = ScoringContext { record, now };

        let mut builder = DarkDataBuilder::default();
        for scorer in &self.scorers {
            builder.push(scorer.score(&ctx));
        }
        builder.build()
    }

    /// Enriches `record` as of `now`. Nothing is attached unless every signal
    /// was produced.
    pub fn enrich_at(
        &self,
        record: RawRecord,
        now: DateTime<Utc>,
    ) -> Result<EnrichedRecord, EnrichmentError> {
        let dark_data = self.dark_data(&record, now)?;
        Ok(EnrichedRecord::new(record, dark_data))
    }

    /// Enriches `record`, reading the clock once.
    pub fn enrich(&self, record: RawRecord) -> Result<EnrichedRecord, EnrichmentError> {
        self.enrich_at(record, Utc::now())
    }

    /// Boundary entry point for arbitrary JSON: anything but an object is
    /// rejected with [`EnrichmentError::InvalidInput`].
    pub fn enrich_value(&self, value: Value) -> Result<EnrichedRecord, EnrichmentError> {
        let record = RawRecord::try_from(value)?;
        self.enrich(record)
    }
}

/// Standard scorer set shared by the free functions below.
static DEFAULT_ENRICHER: LazyLock<Enricher> = LazyLock::new(Enricher::default);

/// Enriches `record` with the standard scorer set as of `now`.
pub fn enrich_at(record: RawRecord, now: DateTime<Utc>) -> EnrichedRecord {
    DEFAULT_ENRICHER
        .enrich_at(record, now)
        // The default set registers a scorer for every signal.
        .expect("default scorer set produces every dark-data signal")
}

/// Enriches `record` with the standard scorer set. Always succeeds.
pub fn enrich(record: RawRecord) -> EnrichedRecord {
    enrich_at(record, Utc::now())
}

/// Enriches an arbitrary JSON value with the standard scorer set.
pub fn enrich_value(value: Value) -> Result<EnrichedRecord, EnrichmentError> {
    DEFAULT_ENRICHER.enrich_value(value)
}
