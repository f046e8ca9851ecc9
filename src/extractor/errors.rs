use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("detail html is empty")]
    EmptyInput,

    #[error("no valid content could be extracted from {url}")]
    ExtractionFailed { url: String },
}
