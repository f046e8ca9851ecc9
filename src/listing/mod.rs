pub mod errors;
pub mod finder;
pub mod parser;
pub mod selectors;

pub use errors::{ElementError, ListingError};
pub use finder::find;
pub use parser::{parse_listing, parse_listing_at};
pub use selectors::ListingSelectors;
