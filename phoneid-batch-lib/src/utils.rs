//! Utility functions for phone number normalization and input files.
//!
//! Numbers enter the core as digits-only strings. This module turns raw
//! cells ("+1 (555) 123-4567") into that form, validates their length, and
//! reads them from CSV or line-delimited files.

use std::fs;
use std::path::Path;

use crate::error::PhoneIdError;

/// Default minimum number of digits for a valid phone number.
pub const DEFAULT_MIN_DIGITS: usize = 8;

/// Default maximum number of digits for a valid phone number (E.164).
pub const DEFAULT_MAX_DIGITS: usize = 15;

const BOM: char = '\u{feff}';

/// Return the digits-only form of `raw`.
///
/// Strips surrounding whitespace, a UTF-8 BOM, a leading `+`, and every
/// non-digit character.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches(BOM);
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    trimmed.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that `digits` is non-empty, all ASCII digits, and within bounds.
pub fn looks_like_e164_digits_only(digits: &str, min_len: usize, max_len: usize) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    (min_len..=max_len).contains(&digits.len())
}

/// Validation settings applied while reading numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFilter {
    pub min_digits: usize,
    pub max_digits: usize,
    /// Drop numbers outside the length bounds instead of keeping them
    pub skip_invalid: bool,
}

impl Default for NumberFilter {
    fn default() -> Self {
        Self {
            min_digits: DEFAULT_MIN_DIGITS,
            max_digits: DEFAULT_MAX_DIGITS,
            skip_invalid: true,
        }
    }
}

/// Numbers accepted from an input file, plus the cells that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedNumbers {
    pub numbers: Vec<String>,
    pub skipped: Vec<String>,
}

/// Read phone numbers from a `.csv` (first column) or line-delimited file.
///
/// For CSV files the first non-empty row is dropped when it looks like a
/// header (contains any letter). Rows that normalize to nothing are ignored.
pub fn read_numbers(path: &Path, filter: &NumberFilter) -> Result<ParsedNumbers, PhoneIdError> {
    if !path.exists() {
        return Err(PhoneIdError::file_error(
            path.to_string_lossy(),
            "Input file not found",
        ));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        PhoneIdError::file_error(
            path.to_string_lossy(),
            format!("Failed to read input file: {}", e),
        )
    })?;

    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    Ok(if is_csv {
        parse_csv_numbers(&content, filter)
    } else {
        parse_line_numbers(&content, filter)
    })
}

/// Parse line-delimited content, one number per line.
pub fn parse_line_numbers(content: &str, filter: &NumberFilter) -> ParsedNumbers {
    let mut parsed = ParsedNumbers::default();
    for line in strip_bom(content).lines() {
        accept_cell(line.trim(), filter, &mut parsed);
    }
    parsed
}

/// Parse CSV content, using the first column of each row.
pub fn parse_csv_numbers(content: &str, filter: &NumberFilter) -> ParsedNumbers {
    let mut parsed = ParsedNumbers::default();
    let mut first = true;

    for line in strip_bom(content).lines() {
        if line.trim().is_empty() {
            continue;
        }
        let cell = first_csv_field(line);
        let cell = cell.trim();

        if first {
            first = false;
            if cell.chars().any(char::is_alphabetic) {
                continue;
            }
        }

        accept_cell(cell, filter, &mut parsed);
    }
    parsed
}

/// Extract the first field of a CSV record, honouring double quotes.
pub fn first_csv_field(line: &str) -> String {
    let line = line.trim_start();
    let Some(rest) = line.strip_prefix('"') else {
        return line.split(',').next().unwrap_or_default().to_string();
    };

    let mut field = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                break;
            }
        } else {
            field.push(c);
        }
    }
    field
}

/// Fatal pre-dispatch check on the identifier list.
pub fn validate_identifiers(numbers: &[String]) -> Result<(), PhoneIdError> {
    if numbers.is_empty() {
        return Err(PhoneIdError::invalid_input("No phone numbers parsed from input."));
    }
    if let Some(position) = numbers.iter().position(|n| n.is_empty()) {
        return Err(PhoneIdError::invalid_input(format!(
            "Empty phone number at position {}",
            position
        )));
    }
    Ok(())
}

fn accept_cell(cell: &str, filter: &NumberFilter, parsed: &mut ParsedNumbers) {
    if cell.is_empty() {
        return;
    }
    let digits = normalize_phone(cell);
    if digits.is_empty() {
        return;
    }

    if looks_like_e164_digits_only(&digits, filter.min_digits, filter.max_digits) {
        parsed.numbers.push(digits);
    } else if filter.skip_invalid {
        tracing::warn!(cell, "skipping invalid phone number");
        parsed.skipped.push(cell.to_string());
    } else {
        parsed.numbers.push(digits);
    }
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix(BOM).unwrap_or(content)
}
