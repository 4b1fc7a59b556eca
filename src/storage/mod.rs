mod booking;
mod sqlite_store;
mod trivia;

pub use booking::{ArtistSummary, VenueArea, VenueSummary};
pub use sqlite_store::{format_timestamp, Database};
pub use trivia::DEFAULT_CATEGORIES;
