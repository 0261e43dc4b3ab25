//! Export of the filtered, sorted record set.
//!
//! A controller builds an [`ExportSheet`] from every record that passes the
//! current search and filters, in display order and ignoring pagination, and
//! hands it to an [`ExportEncoder`]. Two encoders ship with the crate:
//!
//! - [`CsvEncoder`]: header row of column labels, one row per record
//! - [`JsonEncoder`]: the sheet itself as a JSON document
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffdesk::prelude::*;
//!
//! let stock = client.stock_items(role);
//! stock.refresh().await?;
//! stock.set_filter(StockFilter::Status, "Available");
//!
//! let bytes = stock.export_visible(&CsvEncoder::new())?;
//! std::fs::write("stock.csv", bytes)?;
//! ```

mod csv;
mod json;

use serde::Serialize;

pub use self::csv::CsvEncoder;
pub use self::json::JsonEncoder;
use crate::{Record, Result};

/// A titled table of string cells handed to an [`ExportEncoder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSheet {
    /// Sheet title, the resource's display name.
    pub title: String,
    /// Column labels.
    pub columns: Vec<String>,
    /// One row per record, aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

impl ExportSheet {
    /// Builds a sheet from records, keeping their order.
    pub fn from_records<'a, R: Record>(records: impl IntoIterator<Item = &'a R>) -> Self {
        Self {
            title: R::TITLE.to_string(),
            columns: R::export_columns().iter().map(ToString::to_string).collect(),
            rows: records.into_iter().map(Record::export_row).collect(),
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Suggested file name, e.g. `"Users.csv"`.
    pub fn file_name(&self, encoder: &dyn ExportEncoder) -> String {
        format!("{}.{}", self.title, encoder.extension())
    }
}

/// Serializes an [`ExportSheet`] into a document.
///
/// ## Object Safety
///
/// This trait is object-safe and can be used as `&dyn ExportEncoder`.
pub trait ExportEncoder: Send + Sync {
    /// Encodes the sheet.
    fn encode(&self, sheet: &ExportSheet) -> Result<Vec<u8>>;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;
}

impl<T: ExportEncoder + ?Sized> ExportEncoder for &T {
    fn encode(&self, sheet: &ExportSheet) -> Result<Vec<u8>> {
        (**self).encode(sheet)
    }

    fn extension(&self) -> &'static str {
        (**self).extension()
    }
}
