use async_trait::async_trait;
use burrow_core::error::{Result, StorageError};
use burrow_core::repository::{ReadRepository, Repository};
use burrow_core::ShortCode;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// short code -> original URL
const URLS: TableDefinition<&str, &str> = TableDefinition::new("urls");
/// short code -> big-endian u64 hit count
const HITS: TableDefinition<&str, &[u8]> = TableDefinition::new("hits");

/// Durable repository backed by an embedded redb database file.
///
/// redb serializes write transactions, so insert-if-absent and the hit
/// counter read-modify-write each run as one isolated transaction. Commits
/// use redb's default immediate durability: `Ok` means the change is on disk.
///
/// All redb calls block; they run on tokio's blocking pool. A transaction
/// that has started keeps running to commit or abort even if the awaiting
/// future is dropped.
#[derive(Clone)]
pub struct RedbRepository {
    db: Arc<Database>,
    path: PathBuf,
}

impl RedbRepository {
    /// Opens (or creates) the database at `path` and makes sure both tables
    /// exist. Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Unavailable(format!(
                    "cannot create data directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }

        let db = Database::create(path).map_err(map_redb_error)?;

        let txn = db.begin_write().map_err(map_redb_error)?;
        {
            txn.open_table(URLS).map_err(map_redb_error)?;
            txn.open_table(HITS).map_err(map_redb_error)?;
        }
        txn.commit().map_err(map_redb_error)?;

        info!(path = %path.display(), "opened mapping store");

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Returns the path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Operation(format!("storage task failed: {e}")))?
    }
}

impl std::fmt::Debug for RedbRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbRepository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn map_redb_error(err: impl Into<redb::Error>) -> StorageError {
    let err: redb::Error = err.into();
    let message = err.to_string();

    match err {
        redb::Error::Io(_) | redb::Error::DatabaseAlreadyOpen => StorageError::Unavailable(message),
        redb::Error::Corrupted(_) => StorageError::InvalidData(message),
        _ => StorageError::Transaction(message),
    }
}

fn decode_hits(code: &str, raw: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = raw.try_into().map_err(|_| {
        StorageError::InvalidData(format!(
            "hit counter for '{code}' has {} bytes, expected 8",
            raw.len()
        ))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

fn read_url(db: &Database, code: &str) -> Result<Option<String>> {
    let txn = db.begin_read().map_err(map_redb_error)?;
    let table = txn.open_table(URLS).map_err(map_redb_error)?;
    let url = table
        .get(code)
        .map_err(map_redb_error)?
        .map(|guard| guard.value().to_owned());
    Ok(url)
}

fn read_hits(db: &Database, code: &str) -> Result<u64> {
    let txn = db.begin_read().map_err(map_redb_error)?;
    let table = txn.open_table(HITS).map_err(map_redb_error)?;
    let hits = match table.get(code).map_err(map_redb_error)? {
        Some(raw) => decode_hits(code, raw.value())?,
        None => 0,
    };
    Ok(hits)
}

fn upsert_url(db: &Database, code: &str, url: &str) -> Result<()> {
    let txn = db.begin_write().map_err(map_redb_error)?;
    {
        let mut table = txn.open_table(URLS).map_err(map_redb_error)?;
        table.insert(code, url).map_err(map_redb_error)?;
    }
    txn.commit().map_err(map_redb_error)
}

fn insert_url(db: &Database, code: &str, url: &str) -> Result<()> {
    let txn = db.begin_write().map_err(map_redb_error)?;
    let taken = {
        let mut table = txn.open_table(URLS).map_err(map_redb_error)?;
        let taken = table.get(code).map_err(map_redb_error)?.is_some();
        if !taken {
            table.insert(code, url).map_err(map_redb_error)?;
        }
        taken
    };

    if taken {
        txn.abort().map_err(map_redb_error)?;
        return Err(StorageError::Conflict(code.to_owned()));
    }

    txn.commit().map_err(map_redb_error)
}

fn increment_hits(db: &Database, code: &str) -> Result<u64> {
    let txn = db.begin_write().map_err(map_redb_error)?;
    let count = {
        let mut table = txn.open_table(HITS).map_err(map_redb_error)?;
        let current = match table.get(code).map_err(map_redb_error)? {
            Some(raw) => decode_hits(code, raw.value())?,
            None => 0,
        };
        let next = current.checked_add(1).ok_or_else(|| {
            StorageError::InvalidData(format!("hit counter for '{code}' overflowed"))
        })?;
        table
            .insert(code, next.to_be_bytes().as_slice())
            .map_err(map_redb_error)?;
        next
    };
    txn.commit().map_err(map_redb_error)?;
    Ok(count)
}

#[async_trait]
impl ReadRepository for RedbRepository {
    async fn get(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "reading mapping");
        let key = code.to_string();
        self.run_blocking(move |db| read_url(db, &key))
            .await?
            .ok_or_else(|| StorageError::NotFound(code.to_string()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let key = code.to_string();
        let found = self
            .run_blocking(move |db| read_url(db, &key))
            .await?
            .is_some();
        trace!(code = %code, found, "checked mapping");
        Ok(found)
    }

    async fn hits(&self, code: &ShortCode) -> Result<u64> {
        let key = code.to_string();
        self.run_blocking(move |db| read_hits(db, &key)).await
    }
}

#[async_trait]
impl Repository for RedbRepository {
    async fn save(&self, code: &ShortCode, url: &str) -> Result<()> {
        let key = code.to_string();
        let url = url.to_owned();
        self.run_blocking(move |db| upsert_url(db, &key, &url)).await?;
        debug!(code = %code, "saved mapping");
        Ok(())
    }

    async fn insert(&self, code: &ShortCode, url: &str) -> Result<()> {
        let key = code.to_string();
        let url = url.to_owned();
        self.run_blocking(move |db| insert_url(db, &key, &url)).await?;
        debug!(code = %code, "inserted mapping");
        Ok(())
    }

    async fn increment_hit(&self, code: &ShortCode) -> Result<u64> {
        let key = code.to_string();
        let count = self
            .run_blocking(move |db| increment_hits(db, &key))
            .await?;
        trace!(code = %code, count, "counted hit");
        Ok(count)
    }
}
