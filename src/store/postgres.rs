use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use super::StoreResult;
use crate::models::Record;

/// Postgres-backed store. Table and column names come from [`Record`]; the
/// schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list<E: Record>(&self) -> StoreResult<Vec<E>> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at, id", E::COLLECTION);
        let records = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    pub async fn find<E: Record>(&self, id: Uuid) -> StoreResult<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::COLLECTION);
        let record = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    pub async fn count<E: Record>(&self) -> StoreResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::COLLECTION);
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    pub async fn insert<E: Record>(&self, record: E) -> StoreResult<E> {
        let mut query_builder = QueryBuilder::new(format!(
            "INSERT INTO {} (id, created_at, updated_at, {}) VALUES (",
            E::COLLECTION,
            E::COLUMNS.join(", ")
        ));

        let mut values = query_builder.separated(", ");
        values.push_bind(record.id());
        values.push_bind(record.created_at());
        values.push_bind(record.updated_at());
        record.push_columns(&mut values);
        values.push_unseparated(") RETURNING *");

        let inserted = query_builder
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    /// Read-modify-write under `SELECT ... FOR UPDATE`, so concurrent updates
    /// to one row serialize and the last one wins.
    pub async fn update<E, F>(&self, id: Uuid, change: F) -> StoreResult<Option<E>>
    where
        E: Record,
        F: FnOnce(&mut E) + Send,
    {
        let mut tx = self.pool.begin().await?;

        let sql = format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", E::COLLECTION);
        let current = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(mut record) = current else {
            return Ok(None);
        };

        change(&mut record);
        record.touch(Utc::now());

        let mut query_builder = QueryBuilder::new(format!(
            "UPDATE {} SET ({}, updated_at) = (",
            E::COLLECTION,
            E::COLUMNS.join(", ")
        ));
        {
            let mut values = query_builder.separated(", ");
            record.push_columns(&mut values);
            values.push_bind(record.updated_at());
        }
        query_builder.push(") WHERE id = ");
        query_builder.push_bind(id);
        query_builder.push(" RETURNING *");

        let updated = query_builder
            .build_query_as::<E>()
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    pub async fn delete<E: Record>(&self, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::COLLECTION);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
