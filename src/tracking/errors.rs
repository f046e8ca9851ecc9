use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("malformed tracking data: {0}")]
    Validation(String),

    #[error("tracking file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize tracking data: {0}")]
    Serialize(#[from] serde_json::Error),
}
