//! CSV parser for program definitions
//!
//! Expected header (case-insensitive, any column order):
//! `Program, Rooms, Room Capacity, Current Students, Fixed Cost, Variable Cost, Margin %, Tuition`.
//! A non-empty `Margin %` selects margin pricing; otherwise `Tuition` is the
//! manual price. Blank lines and lines starting with `#` are skipped.

use crate::core::analysis::AnalysisRequest;
use crate::core::tuition::{CapacityInputs, PricingPolicy};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROGRAM: &str = "Program";
const ROOMS: &str = "Rooms";
const ROOM_CAPACITY: &str = "Room Capacity";
const CURRENT_STUDENTS: &str = "Current Students";
const FIXED_COST: &str = "Fixed Cost";
const VARIABLE_COST: &str = "Variable Cost";
const MARGIN: &str = "Margin %";
const TUITION: &str = "Tuition";

const REQUIRED_COLUMNS: [&str; 6] = [
    PROGRAM,
    ROOMS,
    ROOM_CAPACITY,
    CURRENT_STUDENTS,
    FIXED_COST,
    VARIABLE_COST,
];

/// Errors raised while reading program files
#[derive(Error, Debug)]
pub enum InputError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Nothing but blank or comment lines
    #[error("{source_name}: no header row found")]
    MissingHeader {
        /// Input label
        source_name: String,
    },

    /// Header lacks a required column
    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        /// Input label
        source_name: String,
        /// Column name as expected
        column: String,
    },

    /// A data row failed to parse
    #[error("{source_name}:{line}: {message}")]
    InvalidRow {
        /// Input label
        source_name: String,
        /// 1-based line number in the input
        line: usize,
        /// What was wrong with the row
        message: String,
    },
}

/// Parse a programs CSV file
///
/// # Errors
/// Returns an error if the file cannot be read or any row fails to parse
pub fn parse_programs_csv<P: AsRef<Path>>(path: P) -> Result<Vec<AnalysisRequest>, InputError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let requests = parse_programs_str(&content, &path.display().to_string())?;
    crate::debug!("Parsed {} programs from {}", requests.len(), path.display());
    Ok(requests)
}

/// Parse several programs files, keeping file order then row order
///
/// # Errors
/// Returns the first file error encountered
pub fn load_programs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<AnalysisRequest>, InputError> {
    let mut requests = Vec::new();
    for path in paths {
        requests.extend(parse_programs_csv(path)?);
    }
    Ok(requests)
}

/// Parse programs CSV content. `source_name` labels error messages.
///
/// # Errors
/// Returns an error for a missing header, a missing required column, or a row
/// with unparseable values
pub fn parse_programs_str(
    content: &str,
    source_name: &str,
) -> Result<Vec<AnalysisRequest>, InputError> {
    let mut rows = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });

    let (_, header_line) = rows.next().ok_or_else(|| InputError::MissingHeader {
        source_name: source_name.to_string(),
    })?;
    let headers = parse_csv_line(header_line);

    for column in REQUIRED_COLUMNS {
        if column_index(&headers, column).is_none() {
            return Err(InputError::MissingColumn {
                source_name: source_name.to_string(),
                column: column.to_string(),
            });
        }
    }

    rows.map(|(line_no, line)| {
        parse_program_line(line, &headers).map_err(|message| InputError::InvalidRow {
            source_name: source_name.to_string(),
            line: line_no,
            message,
        })
    })
    .collect()
}

/// Split a CSV line into trimmed fields, honoring double-quoted fields
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

/// Get a field value by header name; empty fields read as `None`
fn get_field<'a>(fields: &'a [String], header_name: &str, headers: &[String]) -> Option<&'a str> {
    column_index(headers, header_name)
        .and_then(|idx| fields.get(idx))
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

fn required<'a>(fields: &'a [String], column: &str, headers: &[String]) -> Result<&'a str, String> {
    get_field(fields, column, headers).ok_or_else(|| format!("missing value for '{column}'"))
}

fn parse_count<T: std::str::FromStr>(value: &str, column: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("'{column}' must be a whole non-negative number (got '{value}')"))
}

fn parse_amount(value: &str, column: &str) -> Result<f64, String> {
    let cleaned: String = value
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(format!("'{column}' must be a non-negative amount (got '{value}')")),
    }
}

fn parse_program_line(line: &str, headers: &[String]) -> Result<AnalysisRequest, String> {
    let fields = parse_csv_line(line);

    let name = required(&fields, PROGRAM, headers)?.to_string();
    let capacity = CapacityInputs {
        num_rooms: parse_count(required(&fields, ROOMS, headers)?, ROOMS)?,
        room_capacity: parse_count(required(&fields, ROOM_CAPACITY, headers)?, ROOM_CAPACITY)?,
        current_enrollment: parse_count(
            required(&fields, CURRENT_STUDENTS, headers)?,
            CURRENT_STUDENTS,
        )?,
        fixed_cost: parse_amount(required(&fields, FIXED_COST, headers)?, FIXED_COST)?,
        variable_cost: parse_amount(required(&fields, VARIABLE_COST, headers)?, VARIABLE_COST)?,
    };

    let pricing = match (
        get_field(&fields, MARGIN, headers),
        get_field(&fields, TUITION, headers),
    ) {
        (Some(margin), _) => {
            let pct = parse_amount(margin.trim_end_matches('%'), MARGIN)?;
            if pct >= 100.0 {
                return Err(format!("'{MARGIN}' must be below 100 (got '{margin}')"));
            }
            PricingPolicy::Margin(pct)
        }
        (None, Some(tuition)) => PricingPolicy::Manual(parse_amount(tuition, TUITION)?),
        (None, None) => return Err(format!("either '{MARGIN}' or '{TUITION}' is required")),
    };

    Ok(AnalysisRequest {
        name,
        capacity,
        pricing,
    })
}
