//! Domain models for the sales dashboard API.
//!
//! Source data is a pair of spreadsheet tabs with a known but not fixed set of
//! columns, so a row is a free-form JSON object rather than a fixed struct.
//! Field names below are the spreadsheet headers, kept verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One merged order-line row: spreadsheet header -> cell value.
pub type Record = serde_json::Map<String, Value>;

/// An ordered sequence of records. Order only matters for stable output.
pub type RecordSet = Vec<Record>;

// ============================================================================
// Spreadsheet column names
// ============================================================================

/// Field names as they appear in the spreadsheet headers.
pub mod fields {
    pub const ORDER_ID: &str = "OrderID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const DUE_PICKUP_DATE: &str = "Due Pickup Date";
    pub const PICKUP_TIMESTAMP: &str = "Pickup Timestamp";
    pub const DUE_DATE: &str = "Due Date";
    /// The sheet header carries a trailing space.
    pub const ORDER_TYPE: &str = "Order Type ";
    pub const PRODUCT_DESCRIPTION: &str = "Product Description";
    pub const CATEGORY: &str = "Category";
    pub const UNIT_PRICE: &str = "Unit Price";
    pub const SUBTOTAL: &str = "Subtotal";
    pub const TOTAL: &str = "Total";
    pub const CUSTOMER_FIRST_NAME: &str = "Customer First Name";
    pub const CUSTOMER_LAST_NAME: &str = "Customer Last Name";
}

// ============================================================================
// Request Models
// ============================================================================

/// Filter parameters accepted by the reporting endpoints.
///
/// Each field is independently optional; present fields are ANDed together.
/// The list-valued fields (`order_type`, `product`, `pickup_dates`) are
/// comma-separated strings whose tokens are ORed within the predicate.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterSpec {
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub order_type: Option<String>,
    pub product: Option<String>,
    pub pickup_dates: Option<String>,
}

impl FilterSpec {
    /// True when no field would impose a constraint.
    pub fn is_empty(&self) -> bool {
        fn blank(f: &Option<String>) -> bool {
            f.as_deref().map(str::trim).unwrap_or("").is_empty()
        }
        blank(&self.date_start)
            && blank(&self.date_end)
            && blank(&self.order_type)
            && blank(&self.product)
            && blank(&self.pickup_dates)
    }
}

// ============================================================================
// Response Models
// ============================================================================

/// Response for the filtered record listing endpoint.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub success: bool,
    pub count: usize,
    pub records: RecordSet,
}

/// Response wrapper for the summary endpoint.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: crate::aggregate::Summary,
}

/// Already-aggregated table handed to the document formatting layer.
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}
