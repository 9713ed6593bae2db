//! Ratings input.
//!
//! Reads the tabular ratings resource into a validated [`RatingsTable`](crate::models::RatingsTable).

mod ratings_csv;

pub use ratings_csv::RatingsLoader;
