//! CSV encoder.

use super::{ExportEncoder, ExportSheet};
use crate::Result;

/// Encodes a sheet as CSV with a header row.
#[derive(Debug, Clone, Copy)]
pub struct CsvEncoder {
    delimiter: u8,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvEncoder {
    /// Comma-separated encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `delimiter` instead of a comma, e.g. `b';'` for spreadsheet
    /// locales that use a decimal comma.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl ExportEncoder for CsvEncoder {
    fn encode(&self, sheet: &ExportSheet) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        wtr.write_record(&sheet.columns)?;
        for row in &sheet.rows {
            wtr.write_record(row)?;
        }

        wtr.into_inner()
            .map_err(|e| crate::Error::internal(format!("failed to flush CSV export: {e}")))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ExportSheet {
        ExportSheet {
            title: "Users".into(),
            columns: vec!["ID".into(), "Username".into()],
            rows: vec![
                vec!["1".into(), "amina".into()],
                vec!["2".into(), "karim, jr".into()],
            ],
        }
    }

    #[test]
    fn test_header_and_quoting() {
        let bytes = CsvEncoder::new().encode(&sheet()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "ID,Username\n1,amina\n2,\"karim, jr\"\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let bytes = CsvEncoder::new().with_delimiter(b';').encode(&sheet()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("ID;Username\n"));
        assert!(text.ends_with("2;karim, jr\n"));
    }

    #[test]
    fn test_empty_sheet_has_header_only() {
        let empty = ExportSheet {
            rows: Vec::new(),
            ..sheet()
        };
        let bytes = CsvEncoder::new().encode(&empty).unwrap();
        assert_eq!(bytes, b"ID,Username\n");
    }
}
