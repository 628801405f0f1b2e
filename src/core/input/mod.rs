//! Batch program definitions

pub mod csv_parser;

pub use csv_parser::{load_programs, parse_programs_csv, parse_programs_str, InputError};
