//! Flattened report rows and CSV output.
//!
//! Each [`Outcome`] becomes one [`ReportRow`]. Rows are written in the order
//! they are given, with RFC 4180 quoting so embedded JSON survives intact.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PhoneIdError;
use crate::types::Outcome;

/// Column header of the CSV report.
pub const CSV_HEADER: &str = "phone,status_code,status_description,json";

/// One line of the output report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub phone: String,
    pub status_code: i32,
    pub status_description: Option<String>,
    /// Compact JSON serialization of the response payload
    pub json: String,
}

impl From<&Outcome> for ReportRow {
    fn from(outcome: &Outcome) -> Self {
        Self {
            phone: outcome.phone().to_string(),
            status_code: outcome.status_code(),
            status_description: outcome.status_description().map(str::to_string),
            json: outcome.response().to_string(),
        }
    }
}

impl ReportRow {
    /// Render this row as a CSV record (without line terminator).
    pub fn to_csv_record(&self) -> String {
        [
            escape_csv_field(&self.phone),
            self.status_code.to_string(),
            escape_csv_field(self.status_description.as_deref().unwrap_or_default()),
            escape_csv_field(&self.json),
        ]
        .join(",")
    }
}

/// Quote a field when it contains a comma, quote, or line break.
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write the header and all rows to `writer`.
pub fn write_csv<W: Write>(writer: &mut W, rows: &[ReportRow]) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for row in rows {
        writeln!(writer, "{}", row.to_csv_record())?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the report to it.
pub fn write_csv_file(path: &Path, rows: &[ReportRow]) -> Result<(), PhoneIdError> {
    let to_error = |e: std::io::Error| {
        PhoneIdError::file_error(
            path.to_string_lossy(),
            format!("Failed to write report: {}", e),
        )
    };

    let file = File::create(path).map_err(to_error)?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, rows).map_err(to_error)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_row_from_outcome() {
        let outcome = Outcome::from_response(
            "15551234567",
            200,
            r#"{"status":{"code":300,"description":"Transaction successfully completed"}}"#,
        );
        let row = ReportRow::from(&outcome);

        assert_eq!(row.phone, "15551234567");
        assert_eq!(row.status_code, 200);
        assert_eq!(
            row.status_description.as_deref(),
            Some("Transaction successfully completed")
        );
        assert_eq!(
            row.json,
            r#"{"status":{"code":300,"description":"Transaction successfully completed"}}"#
        );
    }

    #[test]
    fn test_row_without_description() {
        let row = ReportRow::from(&Outcome::failure("15551234567", "timed out"));
        assert_eq!(row.status_code, -1);
        assert_eq!(row.status_description, None);
        assert_eq!(row.to_csv_record(), r#"15551234567,-1,,"{""error"":""timed out""}""#);
    }

    #[test]
    fn test_json_keeps_server_key_order() {
        let outcome = Outcome::from_response(
            "15551234567",
            200,
            r#"{"reference_id":"X1","status":{"description":"ok","code":300},"numbering":{}}"#,
        );
        let row = ReportRow::from(&outcome);
        assert_eq!(
            row.json,
            r#"{"reference_id":"X1","status":{"description":"ok","code":300},"numbering":{}}"#
        );
    }

    #[test]
    fn test_escape_csv_field() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_csv_field(""), "");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            ReportRow::from(&Outcome::from_response("1", 404, "not json")),
            ReportRow::from(&Outcome::from_response("2", 200, "{}")),
        ];

        write_csv_file(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], r#"1,404,,"{""raw_text"":""not json""}""#);
        assert_eq!(lines[2], "2,200,,{}");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_csv_file_bad_path() {
        let err = write_csv_file(Path::new("/nonexistent/dir/out.csv"), &[]).unwrap_err();
        assert!(matches!(err, PhoneIdError::File { .. }));
    }
}
