pub mod model;
pub mod seed_search;

pub use model::PartialFrame;
pub use seed_search::{SearchError, SearchHandle, SearchOutcome, SeedRange, SeedSearcher};
