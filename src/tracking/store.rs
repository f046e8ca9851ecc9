use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::tracking::{errors::TrackingError, model::TrackingStore};

/// Persistence for the tracking store between runs.
#[async_trait]
pub trait TrackingRepository: Send + Sync {
    /// Load the stored state. A store that was never written loads as empty.
    async fn load(&self) -> Result<TrackingStore, TrackingError>;

    async fn save(&self, store: &TrackingStore) -> Result<(), TrackingError>;
}

/// Tracking store kept as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TrackingError {
        TrackingError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TrackingRepository for JsonFileRepository {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn load(&self) -> Result<TrackingStore, TrackingError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No tracking file yet, starting empty");
                return Ok(TrackingStore::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let store = TrackingStore::from_json(&json)?;
        debug!(entries = store.len(), "Loaded tracking store");
        Ok(store)
    }

    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash mid-write leaves the previous file intact.
    #[instrument(skip_all, fields(path = %self.path.display(), entries = store.len()))]
    async fn save(&self, store: &TrackingStore) -> Result<(), TrackingError> {
        let json = store.to_json()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!("Saved tracking store");
        Ok(())
    }
}

/// In-process repository for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    store: Mutex<Option<TrackingStore>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: TrackingStore) -> Self {
        Self {
            store: Mutex::new(Some(store)),
        }
    }

    /// The last saved store, if anything was ever stored.
    pub async fn snapshot(&self) -> Option<TrackingStore> {
        self.store.lock().await.clone()
    }
}

#[async_trait]
impl TrackingRepository for MemoryRepository {
    async fn load(&self) -> Result<TrackingStore, TrackingError> {
        Ok(self.store.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, store: &TrackingStore) -> Result<(), TrackingError> {
        *self.store.lock().await = Some(store.clone());
        Ok(())
    }
}
