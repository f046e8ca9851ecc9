//! Cross-run change detection keyed by content hash.

pub mod errors;
pub mod model;
pub mod reconciler;
pub mod store;

pub use errors::TrackingError;
pub use model::{TrackingEntry, TrackingStore};
pub use reconciler::{Change, Reconciliation, classify, reconcile, reconcile_now};
pub use store::{JsonFileRepository, MemoryRepository, TrackingRepository};
