//! Broadcast programming domain models.
//!
//! Provides the data types shared by the optimizer and its collaborators.
//!
//! | u-broadcast | Broadcast |
//! |-------------|-----------|
//! | Program | Show in the catalog |
//! | Slot | Hour of the broadcast day |
//! | RatingsTable | Expected audience rating per show and hour |
//! | Schedule | One day's lineup |

mod ratings;
mod schedule;

pub use ratings::RatingsTable;
pub use schedule::{Schedule, ScheduleInvariant};
