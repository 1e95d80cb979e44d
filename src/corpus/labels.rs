// Outcome labels from a CSV file.
//
// One column of each row holds an integer label; rows are aligned with the
// corpus by position. Quoting follows the usual CSV rules, so a quoted field
// may contain commas, doubled quotes or line breaks.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use crate::error::PipelineError;
use crate::Label;

/// Parse labels from CSV text.
///
/// Blank lines are skipped. With `skip_header` the first record is ignored.
/// Row numbers in errors are the 1-based line on which the record starts.
pub fn parse_labels(raw: &str, column: usize, skip_header: bool) -> Result<Vec<Label>, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(skip_header)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| PipelineError::LabelParse {
            row: e.position().map(|p| p.line() as usize).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let row = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let value = record.get(column).ok_or_else(|| PipelineError::LabelParse {
            row,
            reason: format!("expected at least {} columns, found {}", column + 1, record.len()),
        })?;
        let label = value
            .trim()
            .parse::<Label>()
            .map_err(|e| PipelineError::LabelParse {
                row,
                reason: format!("'{}' is not an integer ({e})", value.trim()),
            })?;
        labels.push(label);
    }

    Ok(labels)
}

/// Read labels from a CSV file.
pub async fn load_labels(path: &Path, column: usize, skip_header: bool) -> Result<Vec<Label>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read labels from {}", path.display()))?;
    let labels = parse_labels(&raw, column, skip_header)
        .with_context(|| format!("Malformed label file {}", path.display()))?;
    info!(path = %path.display(), labels = labels.len(), column, "Loaded labels");
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_column() {
        let labels = parse_labels("AAPL,1\nMSFT,0\nGOOG,1\n", 1, false).unwrap();
        assert_eq!(labels, vec![1, 0, 1]);
    }

    #[test]
    fn test_header_and_blank_lines() {
        let raw = "ticker,beat\n\nAAPL,1\n\nMSFT,0\n";
        assert_eq!(parse_labels(raw, 1, true).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_quoted_fields() {
        let raw = "\"Apple, Inc.\",1\n\"The \"\"Big\"\" Co\", -1\n";
        assert_eq!(parse_labels(raw, 1, false).unwrap(), vec![1, -1]);
    }

    #[test]
    fn test_missing_column() {
        let err = parse_labels("AAPL,1\nMSFT\n", 1, false).unwrap_err();
        assert!(matches!(err, PipelineError::LabelParse { row: 2, .. }));
    }

    #[test]
    fn test_non_integer() {
        let err = parse_labels("AAPL,yes\n", 1, false).unwrap_err();
        assert!(matches!(err, PipelineError::LabelParse { row: 1, .. }));
    }

    #[test]
    fn test_quoted_field_spans_lines() {
        let raw = "\"Apple\nInc\",1\nMSFT,0\n";
        assert_eq!(parse_labels(raw, 1, false).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_row_number_follows_multiline_record() {
        let err = parse_labels("\"a\nb\",1\nMSFT,x\n", 1, false).unwrap_err();
        assert!(matches!(err, PipelineError::LabelParse { row: 3, .. }), "{err:?}");
    }
}
