//! SQLite-backed media store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use vodforge_models::{MediaId, MediaRecord, MediaStatus, TranscodeOutcome};

use crate::error::{StoreError, StoreResult};
use crate::store::MediaStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS media (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL DEFAULT '',
    source_path TEXT,
    status      TEXT NOT NULL DEFAULT 'pending',
    thumbnail   TEXT,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
)
"#;

/// Media store over a SQLite pool.
#[derive(Clone)]
pub struct SqliteMediaStore {
    pool: SqlitePool,
}

impl SqliteMediaStore {
    /// Connect to a SQLite database, creating the file if needed.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// In-process database. One connection, schema applied: every handle
    /// sees the same data, no file on disk. Used by tests and
    /// single-process deployments.
    pub async fn memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Apply the schema. Idempotent.
    pub async fn init(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MediaRow {
    id: String,
    title: String,
    source_path: Option<String>,
    status: String,
    thumbnail: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl MediaRow {
    fn into_record(self) -> StoreResult<MediaRecord> {
        let status = MediaStatus::from_str(&self.status)
            .map_err(|e| StoreError::corrupt(&self.id, e))?;
        Ok(MediaRecord {
            id: MediaId::from_string(self.id),
            title: self.title,
            source_path: self.source_path,
            status,
            thumbnail: self.thumbnail,
            created_at: from_epoch(self.created_at),
            updated_at: from_epoch(self.updated_at),
        })
    }
}

fn from_epoch(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn insert(&self, record: &MediaRecord) -> StoreResult<()> {
        let result = sqlx::query(
            "INSERT INTO media (id, title, source_path, status, thumbnail, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(record.id.as_str())
        .bind(&record.title)
        .bind(&record.source_path)
        .bind(record.status.as_str())
        .bind(&record.thumbnail)
        .bind(record.created_at.timestamp())
        .bind(record.updated_at.timestamp())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::AlreadyExists(record.id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &MediaId) -> StoreResult<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(
            "SELECT id, title, source_path, status, thumbnail, created_at, updated_at \
             FROM media WHERE id = ?1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MediaRow::into_record).transpose()
    }

    async fn mark_transcoding(&self, id: &MediaId) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE media SET status = 'transcoding', updated_at = ?1 \
             WHERE id = ?2 AND status = 'pending'",
        )
        .bind(Utc::now().timestamp())
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let current = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        match current.status {
            // already entered, duplicate ingest call
            MediaStatus::Transcoding => Ok(()),
            from => Err(StoreError::InvalidTransition {
                from,
                to: MediaStatus::Transcoding,
            }),
        }
    }

    async fn complete(
        &self,
        id: &MediaId,
        outcome: TranscodeOutcome,
        default_thumbnail: &str,
    ) -> StoreResult<MediaRecord> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;

        let target = outcome.as_status();
        if current.status == target {
            // retried callback; the record is already in its end state
            debug!(media_id = %id, status = %target, "terminal callback replayed, no-op");
            return Ok(current);
        }
        if current.status == MediaStatus::Pending {
            // transcoding is always entered before a job exists
            return Err(StoreError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        let now = Utc::now().timestamp();
        match outcome {
            TranscodeOutcome::Ready => {
                sqlx::query(
                    "UPDATE media SET status = ?1, updated_at = ?2, \
                     thumbnail = COALESCE(thumbnail, ?3) WHERE id = ?4",
                )
                .bind(target.as_str())
                .bind(now)
                .bind(default_thumbnail)
                .bind(id.as_str())
                .execute(&self.pool)
                .await?
            }
            TranscodeOutcome::Error => {
                sqlx::query("UPDATE media SET status = ?1, updated_at = ?2 WHERE id = ?3")
                    .bind(target.as_str())
                    .bind(now)
                    .bind(id.as_str())
                    .execute(&self.pool)
                    .await?
            }
        };

        self.get(id)
            .await?
            .ok_or_else(|| StoreError::not_found(id.as_str()))
    }
}
