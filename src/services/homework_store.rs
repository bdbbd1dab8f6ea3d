//! The homework record store: durable rows in SQLite mirrored by an in-memory cache.
//!
//! Storage is the source of truth. The cache is rebuilt from it by [`HomeworkStore::hydrate`]
//! and only ever appended to after a successful write, so both agree after every `create`.
//! Reference numbers are derived from `MAX(ref_number)` in storage, never from the cache.

use crate::database::models::{HomeworkRecord, NewHomework};
use crate::database::{DbPool, StoreError, homework};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

pub struct HomeworkStore {
    pool: DbPool,
    cache: RwLock<Vec<HomeworkRecord>>,
    /// Serialises reference-number allocation with the insert that consumes it, and
    /// cache rebuilds with both.
    write_lock: Mutex<()>,
}

impl HomeworkStore {
    /// Wraps an already-migrated pool. The cache starts empty until [`Self::hydrate`] runs.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            cache: RwLock::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// One greater than the highest stored reference number, or `1` for an empty table.
    pub async fn next_ref_number(&self) -> Result<i64, StoreError> {
        let max = homework::max_ref_number(&self.pool).await?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// Allocates the next reference number, persists the record, then appends it to the cache.
    /// On any storage failure the cache is left untouched.
    #[instrument(level = "debug", skip(self, new), fields(subject = %new.subject))]
    pub async fn create(&self, new: NewHomework) -> Result<HomeworkRecord, StoreError> {
        new.validate()?;

        let _guard = self.write_lock.lock().await;
        let record = match self.insert_next(&new).await {
            Ok(record) => record,
            Err(e) => {
                error!(target = "store", op = "create", error = %e, "failed to persist homework");
                return Err(e);
            }
        };

        self.cache.write().await.push(record.clone());
        info!(target = "store", op = "create", ref_number = record.ref_number, subject = %record.subject, "homework stored");
        Ok(record)
    }

    async fn insert_next(&self, new: &NewHomework) -> Result<HomeworkRecord, StoreError> {
        let mut tx = self.pool.begin().await?;
        let ref_number = homework::max_ref_number(&mut *tx).await?.unwrap_or(0) + 1;
        let record = match homework::insert_homework(&mut *tx, ref_number, new).await {
            Ok(record) => record,
            Err(e) => {
                warn!(target = "store", op = "create", ref_number, error = %e, "insert rejected");
                return Err(e.into());
            }
        };
        tx.commit().await?;
        Ok(record)
    }

    /// Snapshot of every cached record, ascending by reference number.
    pub async fn list_all(&self) -> Vec<HomeworkRecord> {
        self.cache.read().await.clone()
    }

    pub async fn find_by_ref(&self, ref_number: i64) -> Option<HomeworkRecord> {
        self.cache
            .read()
            .await
            .iter()
            .find(|hw| hw.ref_number == ref_number)
            .cloned()
    }

    /// Replaces the cache with the full contents of storage and returns the number of
    /// records loaded. A read failure leaves the cache empty and is logged, not propagated.
    ///
    /// Holds the write lock throughout so a concurrent `create` cannot commit between the
    /// read and the swap and then be overwritten by the older snapshot.
    #[instrument(level = "debug", skip(self))]
    pub async fn hydrate(&self) -> usize {
        let _guard = self.write_lock.lock().await;
        let loaded = match homework::fetch_all_homework(&self.pool).await {
            Ok(records) => records,
            Err(e) => {
                warn!(target = "store", op = "hydrate", error = %e, "could not load homework; continuing with an empty cache");
                Vec::new()
            }
        };
        let count = loaded.len();
        *self.cache.write().await = loaded;
        debug!(target = "store", op = "hydrate", count, "cache rebuilt");
        count
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}
