//! Stock and equipment inventory.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::Record;
use crate::{Error, Result};

/// Availability of a stock line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StockStatus {
    /// In stock.
    #[default]
    Available,
    /// Out of stock or withdrawn.
    Unavailable,
}

impl StockStatus {
    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Available => "Available",
            StockStatus::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stock line as served by `stock-equipment/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Service-assigned identifier.
    pub id: i64,
    /// Equipment name.
    pub name: String,
    /// Units on hand.
    pub quantity: u32,
    /// Availability.
    pub status: StockStatus,
    /// Store holding the stock.
    pub store: String,
}

/// Sortable stock attributes.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockSortKey {
    Id,
    Name,
    Quantity,
    Status,
    Store,
}

/// Filterable stock attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockFilter {
    /// Matches `"Available"` or `"Unavailable"`.
    Status,
    /// Matches the store name exactly.
    Store,
}

/// Body of a create request.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStockItem {
    pub name: String,
    pub quantity: u32,
    pub status: StockStatus,
    pub store: String,
}

/// Partial update. Absent fields are left unchanged by the service.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StockStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

impl Record for StockItem {
    type Id = i64;
    type SortKey = StockSortKey;
    type FilterKey = StockFilter;
    type Draft = NewStockItem;
    type Patch = StockItemPatch;

    const RESOURCE: &'static str = "stock items";
    const ENDPOINT: &'static str = "stock-equipment/";
    const TITLE: &'static str = "Stock and Equipment";

    fn id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.quantity.to_string(),
            self.status.to_string(),
            self.store.clone(),
        ]
    }

    fn compare(&self, other: &Self, key: StockSortKey) -> Ordering {
        match key {
            StockSortKey::Id => self.id.cmp(&other.id),
            StockSortKey::Name => self.name.cmp(&other.name),
            StockSortKey::Quantity => self.quantity.cmp(&other.quantity),
            StockSortKey::Status => self.status.as_str().cmp(other.status.as_str()),
            StockSortKey::Store => self.store.cmp(&other.store),
        }
    }

    fn default_sort_key() -> StockSortKey {
        StockSortKey::Id
    }

    fn filter_value(&self, key: StockFilter) -> Option<String> {
        match key {
            StockFilter::Status => Some(self.status.to_string()),
            StockFilter::Store => Some(self.store.clone()),
        }
    }

    fn export_columns() -> &'static [&'static str] {
        &["ID", "Name", "Quantity", "Status", "Store"]
    }

    fn export_row(&self) -> Vec<String> {
        self.search_fields()
    }

    fn validate_draft(draft: &NewStockItem) -> Result<()> {
        if draft.name.trim().is_empty() {
            return Err(Error::invalid_argument("stock item name cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_payload() {
        let item: StockItem = serde_json::from_str(
            r#"{"id": 4, "name": "Pump", "quantity": 12, "status": "Unavailable", "store": "Sfax"}"#,
        )
        .unwrap();
        assert_eq!(item.status, StockStatus::Unavailable);
        assert_eq!(item.filter_value(StockFilter::Status).as_deref(), Some("Unavailable"));
    }

    #[test]
    fn test_compare_quantity_is_numeric() {
        let small = StockItem {
            id: 1,
            name: "a".into(),
            quantity: 9,
            status: StockStatus::Available,
            store: "s".into(),
        };
        let large = StockItem { quantity: 10, ..small.clone() };
        assert_eq!(small.compare(&large, StockSortKey::Quantity), Ordering::Less);
    }

    #[test]
    fn test_validate_draft_requires_name() {
        let draft = NewStockItem {
            name: "  ".into(),
            quantity: 1,
            status: StockStatus::Available,
            store: "Tunis".into(),
        };
        assert!(StockItem::validate_draft(&draft).is_err());
    }
}
