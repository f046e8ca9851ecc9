pub mod client;
pub mod decode;
pub mod errors;
pub mod retry;

pub use client::{FetchSettings, HttpFetcher, PageFetcher};
pub use errors::FetchError;
pub use retry::RetryPolicy;
