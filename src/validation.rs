//! Input validation for programming problems.
//!
//! Checks structural integrity of the ratings rows and of caller-supplied
//! schedules before the optimizer runs. Detects:
//! - Empty catalogs and zero-slot layouts
//! - Duplicate program IDs
//! - Rating rows whose length disagrees with the slot count
//! - Negative or non-finite ratings
//! - Schedules that reference unknown programs or break their invariant

use std::collections::HashSet;

use crate::models::{RatingsTable, Schedule, ScheduleInvariant};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No programs were supplied.
    EmptyCatalog,
    /// The slot layout has zero slots.
    NoSlots,
    /// Two programs share the same ID.
    DuplicateId,
    /// A row's rating count differs from the slot count.
    SlotCountMismatch,
    /// A rating is negative, NaN, or infinite.
    InvalidRating,
    /// A schedule references a program outside the catalog.
    UnknownProgram,
    /// A permutation schedule airs a program twice.
    RepeatedProgram,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates `(program, ratings)` rows against a slot layout.
///
/// Checks:
/// 1. At least one slot and one program
/// 2. No duplicate program IDs
/// 3. Every row has exactly `slot_count` ratings
/// 4. Every rating is finite and non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_ratings(rows: &[(String, Vec<f64>)], slot_count: usize) -> ValidationResult {
    let mut errors = Vec::new();

    if slot_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoSlots,
            "Slot layout has no slots",
        ));
    }
    if rows.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Ratings table has no programs",
        ));
    }

    let mut ids = HashSet::new();
    for (program, ratings) in rows {
        if !ids.insert(program.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate program ID: {program}"),
            ));
        }

        if slot_count > 0 && ratings.len() != slot_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotCountMismatch,
                format!(
                    "Program '{program}' has {} rating(s), expected {slot_count}",
                    ratings.len()
                ),
            ));
        }

        if let Some((slot, value)) = ratings
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRating,
                format!("Program '{program}' has invalid rating {value} in slot {slot}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a caller-supplied schedule against the table and invariant.
///
/// Checks:
/// 1. Length equals the table's slot count
/// 2. Every program is in the catalog
/// 3. Under [`ScheduleInvariant::Permutation`], no program repeats
pub fn validate_schedule(
    schedule: &Schedule,
    table: &RatingsTable,
    invariant: ScheduleInvariant,
) -> ValidationResult {
    let mut errors = Vec::new();

    if schedule.len() != table.slot_count() {
        errors.push(ValidationError::new(
            ValidationErrorKind::SlotCountMismatch,
            format!(
                "Schedule fills {} slot(s), expected {}",
                schedule.len(),
                table.slot_count()
            ),
        ));
    }

    for (slot, program) in schedule.iter() {
        if !table.contains(program) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProgram,
                format!("Slot {slot} references unknown program '{program}'"),
            ));
        }
    }

    if invariant == ScheduleInvariant::Permutation {
        for program in schedule.duplicates() {
            errors.push(ValidationError::new(
                ValidationErrorKind::RepeatedProgram,
                format!("Program '{program}' airs more than once"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
