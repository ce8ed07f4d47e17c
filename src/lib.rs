//! Dark Data Enrichment API Library
//!
//! This library enriches synthetic identity records with four derived
//! "dark data" signals (financial risk, behavioral profile, cultural
//! diversity, metadata) computed purely from the record's own fields, and
//! serves them over a small create/read HTTP API.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic (the enrichment engine).
//! - `data`: Data access layer.
//! - `integrations`: External collaborators.
//! - `obs`: Observability and logging.
//! - `cache_validator`: Checksum-validated record cache.
//! - `config`: Configuration management.
//! - `db`: Database connection and schema.
//! - `db_storage`: Aggregated record storage.
//! - `enrichment`: Enricher orchestration.
//! - `errors`: Error handling types.
//! - `extractors`: Country and script extractors.
//! - `generator`: External record generator launcher.
//! - `handlers`: HTTP request handlers.
//! - `models`: Raw, enriched and stored record models.
//! - `routes`: Router and middleware stack.
//! - `scorers`: The four dark-data scorers.
//! - `validators`: Card checksum and expiration checks.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;
pub mod obs;

pub mod cache_validator;
pub mod config;
pub mod db;
pub mod db_storage;
pub mod enrichment;
pub mod errors;
pub mod extractors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scorers;
pub mod validators;

pub use enrichment::{enrich, enrich_at, enrich_value, Enricher};
pub use errors::{AppError, EnrichmentError};
pub use models::{DarkData, EnrichedRecord, NamePattern, RawRecord};
