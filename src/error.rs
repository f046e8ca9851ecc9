use thiserror::Error;

use crate::feed::FeedError;
use crate::fetcher::FetchError;
use crate::listing::ListingError;
use crate::tracking::TrackingError;

/// Failures that end a pipeline run.
///
/// Anything scoped to a single article is recovered inside the run and never
/// surfaces here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("failed to parse listing: {0}")]
    Parse(#[from] ListingError),

    #[error("invalid tracking data: {0}")]
    Validation(String),

    #[error(transparent)]
    FileSystem(TrackingError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl From<TrackingError> for PipelineError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::Validation(reason) => Self::Validation(reason),
            other => Self::FileSystem(other),
        }
    }
}
