use std::io::Cursor;
use std::path::Path;

use log::{debug, info};
use polars::prelude::*;

use crate::error::{Result, ScheduleError};
use crate::models::RatingsTable;

/// Loads ratings tables from CSV.
///
/// Expected layout: a header row (names are ignored), then one record per
/// program: `program, rating_slot_1, ..., rating_slot_n`. Every column is
/// read as text and ratings are parsed afterwards, so a column's type never
/// depends on which rows come first.
pub struct RatingsLoader;

impl RatingsLoader {
    /// Loads a table that must cover exactly `slot_count` slots.
    ///
    /// # Errors
    /// `InvalidInput` if the file's rating columns disagree with `slot_count`.
    pub fn load_with_slots<P: AsRef<Path>>(path: P, slot_count: usize) -> Result<RatingsTable> {
        let df = Self::read_file(&path)?;
        Self::from_frame(&df, Some(slot_count))
    }

    /// Parses CSV text already in memory.
    pub fn from_csv_str(text: &str, slot_count: Option<usize>) -> Result<RatingsTable> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;
        Self::from_frame(&df, slot_count)
    }

    /// Converts a parsed frame: first column is the program, the rest ratings.
    pub fn from_frame(df: &DataFrame, slot_count: Option<usize>) -> Result<RatingsTable> {
        let (id_column, rating_columns) = df.get_columns().split_first().ok_or_else(|| {
            ScheduleError::InvalidInput("Ratings file has no columns".into())
        })?;

        let slot_count = slot_count.unwrap_or(rating_columns.len());
        if rating_columns.len() != slot_count {
            return Err(ScheduleError::InvalidInput(format!(
                "Ratings file has {} rating column(s), expected {slot_count}",
                rating_columns.len()
            )));
        }

        let height = df.height();
        let mut ratings: Vec<Vec<f64>> = vec![Vec::with_capacity(slot_count); height];
        for column in rating_columns {
            let values = column.cast(&DataType::Float64)?;
            let values = values.f64()?;
            for (row, slot_ratings) in ratings.iter_mut().enumerate() {
                let value = values.get(row).ok_or_else(|| {
                    ScheduleError::InvalidInput(format!(
                        "Missing or non-numeric rating in column '{}', record {}",
                        column.name(),
                        row + 1
                    ))
                })?;
                slot_ratings.push(value);
            }
        }

        let ids = id_column.cast(&DataType::String)?;
        let ids = ids.str()?;
        let mut rows = Vec::with_capacity(height);
        for (row, slot_ratings) in ratings.into_iter().enumerate() {
            let program = ids.get(row).map(str::trim).filter(|p| !p.is_empty()).ok_or_else(|| {
                ScheduleError::InvalidInput(format!("Missing program name in record {}", row + 1))
            })?;
            rows.push((program.to_string(), slot_ratings));
        }

        debug!("Parsed {} program(s) over {slot_count} slot(s)", rows.len());
        RatingsTable::from_rows(slot_count, rows)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        info!("Loading ratings from {}", path.display());
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Ok(df)
    }
}
