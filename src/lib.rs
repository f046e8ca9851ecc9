pub mod article;
pub mod config;
pub mod dates;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod fetcher;
pub mod identity;
pub mod listing;
pub mod pipeline;
pub mod telemetry;
pub mod text;
pub mod tracking;

pub use article::{Article, ArticlePreview};
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineSettings, RunSummary};
