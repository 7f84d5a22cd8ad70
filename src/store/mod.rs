//! Persistence layer.
//!
//! [`Store`] is the handle every controller receives. It fronts one of two
//! backends with the same contract:
//!
//! - [`PgStore`]: Postgres through sqlx, one table per entity.
//! - [`MemoryStore`]: in-process collections for tests and local development.
//!
//! Both enforce the per-entity unique column and report violations as
//! [`StoreError::Duplicate`]. Neither enforces references between entities.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Named, Record};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Postgres SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE classes for bad input: 22 data exception, 23 integrity constraint violation.
const REJECTED_INPUT_CLASSES: &[&str] = &["22", "23"];

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column already holds the value. Carries the backend's message.
    #[error("{0}")]
    Duplicate(String),

    /// The backend refused the values themselves (overflow, check constraint).
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Database(sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("collection {0} holds records of another type")]
    Corrupted(&'static str),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let Some(db) = err.as_database_error() else {
            return StoreError::Database(err);
        };
        let code = db.code().map(|code| code.into_owned()).unwrap_or_default();
        match classify(&code, db.message()) {
            Some(classified) => classified,
            None => StoreError::Database(err),
        }
    }
}

/// Maps a SQLSTATE to the error the caller can act on; `None` for server-side failures.
fn classify(code: &str, message: &str) -> Option<StoreError> {
    if code == UNIQUE_VIOLATION {
        Some(StoreError::Duplicate(message.to_string()))
    } else if REJECTED_INPUT_CLASSES.iter().any(|class| code.starts_with(class)) {
        Some(StoreError::Invalid(message.to_string()))
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }

    /// Every record of `E`, oldest first.
    pub async fn list<E: Record>(&self) -> StoreResult<Vec<E>> {
        match self {
            Store::Postgres(pg) => pg.list().await,
            Store::Memory(mem) => mem.list(),
        }
    }

    pub async fn find<E: Record>(&self, id: Uuid) -> StoreResult<Option<E>> {
        match self {
            Store::Postgres(pg) => pg.find(id).await,
            Store::Memory(mem) => mem.find(id),
        }
    }

    pub async fn insert<E: Record>(&self, record: E) -> StoreResult<E> {
        match self {
            Store::Postgres(pg) => pg.insert(record).await,
            Store::Memory(mem) => mem.insert(record),
        }
    }

    /// Loads the record, runs `change` on it, refreshes `updated_at` and writes
    /// it back. `None` when no record has this id.
    pub async fn update<E, F>(&self, id: Uuid, change: F) -> StoreResult<Option<E>>
    where
        E: Record,
        F: FnOnce(&mut E) + Send,
    {
        match self {
            Store::Postgres(pg) => pg.update(id, change).await,
            Store::Memory(mem) => mem.update(id, change),
        }
    }

    /// `false` when no record has this id.
    pub async fn delete<E: Record>(&self, id: Uuid) -> StoreResult<bool> {
        match self {
            Store::Postgres(pg) => pg.delete::<E>(id).await,
            Store::Memory(mem) => mem.delete::<E>(id),
        }
    }

    pub async fn count<E: Record>(&self) -> StoreResult<usize> {
        match self {
            Store::Postgres(pg) => pg.count::<E>().await,
            Store::Memory(mem) => mem.count::<E>(),
        }
    }

    /// Id → display name for every record of `E`.
    pub async fn names<E: Record + Named>(&self) -> StoreResult<HashMap<Uuid, String>> {
        let records = self.list::<E>().await?;
        Ok(records
            .iter()
            .map(|r| (r.id(), r.name().to_string()))
            .collect())
    }
}
