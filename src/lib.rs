//! Broadcast programming optimizer for the U-Engine ecosystem.
//!
//! Assigns a catalog of TV programs to the hours of a broadcast day so that
//! the summed audience rating is as high as possible, using a genetic
//! algorithm.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `RatingsTable`, `Schedule`, `ScheduleInvariant`
//! - **`ga`**: Fitness, population, operators, and the evolution loop
//! - **`validation`**: Input integrity checks (slot counts, duplicates, unknown programs)
//! - **`data`**: CSV ratings loader
//! - **`format`**: Slot labelling, padding, and table rendering
//! - **`settings`**: TOML settings files
//!
//! # Example
//!
//! ```
//! use u_broadcast::ga::{GaConfig, GaRunner};
//! use u_broadcast::models::RatingsTable;
//!
//! let table = RatingsTable::from_rows(
//!     3,
//!     vec![
//!         ("A", vec![5.0, 1.0, 1.0]),
//!         ("B", vec![1.0, 5.0, 1.0]),
//!         ("C", vec![1.0, 1.0, 5.0]),
//!     ],
//! )
//! .unwrap();
//! let config = GaConfig::default().with_seed(42);
//! let result = GaRunner::run(&table, &config).unwrap();
//! assert_eq!(result.best_fitness, 15.0);
//! ```

pub mod data;
pub mod error;
pub mod format;
pub mod ga;
pub mod models;
pub mod settings;
pub mod validation;

pub use error::{Result, ScheduleError};
