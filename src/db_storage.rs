use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{AppError, ResultExt};
use crate::models::{AggregatedRow, EnrichedRecord, ListParams, StoredRecord};

/// Create/read store for enriched records.
///
/// Records are written once and never updated; each row keeps the full
/// enriched document as JSONB.
#[derive(Clone)]
pub struct AggregatedStorage {
    pool: PgPool,
}

impl AggregatedStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist an enriched record and return it with its store-assigned id.
    pub async fn insert(&self, record: &EnrichedRecord) -> Result<StoredRecord, AppError> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<_, AggregatedRow>(
            r#"
            INSERT INTO aggregated_records (id, payload)
            VALUES ($1, $2)
            RETURNING id, payload, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(Json(record))
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert aggregated record")?;

        tracing::info!(
            "✓ Stored aggregated record {} (risk score: {})",
            row.id,
            record.dark_data.financial_risk_score
        );

        Ok(row.into())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StoredRecord>, AppError> {
        let row = sqlx::query_as::<_, AggregatedRow>(
            "SELECT id, payload, created_at, updated_at FROM aggregated_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load aggregated record {}", id))?;

        Ok(row.map(StoredRecord::from))
    }

    /// Newest records first.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<StoredRecord>, AppError> {
        let (limit, offset) = params.resolve();

        let rows = sqlx::query_as::<_, AggregatedRow>(
            r#"
            SELECT id, payload, created_at, updated_at
            FROM aggregated_records
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list aggregated records")?;

        tracing::debug!(
            "Listed {} aggregated records (limit {}, offset {})",
            rows.len(),
            limit,
            offset
        );

        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }
}
