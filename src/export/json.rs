//! JSON encoder.

use super::{ExportEncoder, ExportSheet};
use crate::{Error, Result};

/// Encodes a sheet as `{"title": .., "columns": [..], "rows": [[..]]}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// Compact encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ExportEncoder for JsonEncoder {
    fn encode(&self, sheet: &ExportSheet) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(sheet)
        } else {
            serde_json::to_vec(sheet)
        };
        encoded.map_err(|e| Error::internal(format!("JSON export failed: {e}")).with_source(e))
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
