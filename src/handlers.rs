use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache_validator::RecordCache;
use crate::config::Config;
use crate::db_storage::AggregatedStorage;
use crate::enrichment::Enricher;
use crate::errors::{AppError, ResultExt};
use crate::generator::{GeneratorOutput, PipelineGenerator};
use crate::models::{ListParams, StoredRecord};

/// Shared application state injected into handlers.
pub struct AppState {
    /// Create/read store for enriched records.
    pub storage: AggregatedStorage,
    /// Application configuration.
    pub config: Config,
    /// Scorer set applied on ingest.
    pub enricher: Enricher,
    /// Fetch-by-id cache, keyed by record id.
    pub record_cache: RecordCache,
    /// External record generator (None when `GENERATOR_COMMAND` is unset).
    pub generator: Option<PipelineGenerator>,
}

impl AppState {
    pub fn new(pool: sqlx::PgPool, config: Config) -> Self {
        let record_cache =
            RecordCache::new(Duration::from_secs(config.record_cache_ttl_secs), 10_000);
        let generator = PipelineGenerator::from_config(&config);

        Self {
            storage: AggregatedStorage::new(pool),
            enricher: Enricher::default(),
            record_cache,
            generator,
            config,
        }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-darkdata-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/aggregated/ingest
///
/// Enriches the posted raw record with dark data and stores it.
///
/// # Returns
///
/// * `201 Created` with the stored record, including its new `id`.
/// * `400 Bad Request` when the body is not a JSON object.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<StoredRecord>), AppError> {
    let enriched = state.enricher.enrich_value(payload).map_err(|e| {
        tracing::warn!("Rejected ingest payload: {}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        "POST /aggregated/ingest - risk: {}, pattern: {}, completeness: {}",
        enriched.dark_data.financial_risk_score,
        enriched.dark_data.behavioral_profile.name_pattern,
        enriched.dark_data.metadata_enrichment.completeness_score
    );

    let stored = state.storage.insert(&enriched).await?;
    state.record_cache.insert(&stored).await;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/v1/aggregated/:id
pub async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredRecord>, AppError> {
    tracing::info!("GET /aggregated/{}", id);

    if let Some(cached) = state.record_cache.get(&id).await {
        return Ok(Json(cached));
    }

    let record = state
        .storage
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Aggregated record {} not found", id)))?;

    state.record_cache.insert(&record).await;
    Ok(Json(record))
}

/// GET /api/v1/aggregated
///
/// Lists stored records, newest first. `limit` defaults to 100 (max 1000).
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StoredRecord>>, AppError> {
    tracing::info!("GET /aggregated - params: {:?}", params);

    let records = state.storage.list(&params).await?;
    Ok(Json(records))
}

/// POST /api/v1/aggregated/trigger-pipeline
///
/// Runs the external record generator and reports its console output.
pub async fn trigger_pipeline(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GeneratorOutput>, AppError> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::BadRequest("No generator configured (set GENERATOR_COMMAND)".to_string())
    })?;

    let output = generator
        .run()
        .await
        .with_context(|| format!("Triggering generator `{}`", generator.command_line()))?;
    Ok(Json(output))
}
