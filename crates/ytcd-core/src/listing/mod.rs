//! Video listing model: identifiers, availability and listing-level metadata
//! as produced by a channel enumerator.

mod format;
mod types;

pub use format::format_duration;
pub use types::{Availability, VideoId, VideoListing};
