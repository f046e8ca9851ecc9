use thiserror::Error;

/// Failures that make the whole listing page unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing html is empty")]
    EmptyInput,

    #[error("no article elements found (tried {} selectors: {})", tried.len(), tried.join(", "))]
    NoElementsFound { tried: Vec<String> },
}

/// Failure scoped to a single listing element. The element is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("no link found")]
    MissingLink,

    #[error("link {0:?} cannot be resolved to an absolute http(s) url")]
    InvalidLink(String),
}
