//! Google Sheets data-source adapter.
//!
//! The dashboard reads two tabs of one spreadsheet through the Sheets v4
//! `values` endpoint. Authentication is a bearer access token or, for public
//! sheets, an API key. Failures are classified so the HTTP layer can tell a
//! rate limit (wait and retry) from bad credentials (operator action) from a
//! generic upstream failure.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::models::{Record, RecordSet};

/// Errors from the upstream spreadsheet fetch.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Google Sheets API rate limit exceeded. Please wait a minute and try again.")]
    RateLimited,
    #[error("Google Sheets authentication failed: {0}. Check the service credentials.")]
    Auth(String),
    #[error("failed to fetch spreadsheet data: {0}")]
    Fetch(String),
}

impl From<reqwest::Error> for DataSourceError {
    fn from(err: reqwest::Error) -> Self {
        DataSourceError::Fetch(err.to_string())
    }
}

/// Read-only source of order and line-item records.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_orders(&self) -> Result<RecordSet, DataSourceError>;
    async fn fetch_line_items(&self) -> Result<RecordSet, DataSourceError>;
}

/// Sheets v4 `values.get` response body.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Google Sheets client for the two dashboard tabs.
pub struct SheetsClient {
    http: reqwest::Client,
    spreadsheet_id: String,
    orders_sheet: String,
    items_sheet: String,
    bearer_token: Option<String>,
    api_key: Option<String>,
}

impl SheetsClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;
        Ok(Self {
            http,
            spreadsheet_id: config.spreadsheet_id.clone(),
            orders_sheet: config.orders_sheet.clone(),
            items_sheet: config.items_sheet.clone(),
            bearer_token: config.sheets_bearer_token.clone(),
            api_key: config.sheets_api_key.clone(),
        })
    }

    async fn fetch_sheet(&self, sheet: &str) -> Result<RecordSet, DataSourceError> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            self.spreadsheet_id,
            urlencoding::encode(sheet)
        );

        let mut request = self.http.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status, &body));
        }

        let range: ValueRange = response.json().await?;
        debug!(sheet, rows = range.values.len().saturating_sub(1), "sheet fetched");
        Ok(rows_to_records(range.values))
    }
}

#[async_trait]
impl DataSource for SheetsClient {
    async fn fetch_orders(&self) -> Result<RecordSet, DataSourceError> {
        self.fetch_sheet(&self.orders_sheet).await
    }

    async fn fetch_line_items(&self) -> Result<RecordSet, DataSourceError> {
        self.fetch_sheet(&self.items_sheet).await
    }
}

/// Map an upstream HTTP failure onto the error taxonomy.
fn classify_http_failure(status: reqwest::StatusCode, body: &str) -> DataSourceError {
    if status.as_u16() == 429
        || body.contains("RESOURCE_EXHAUSTED")
        || body.to_lowercase().contains("quota")
    {
        return DataSourceError::RateLimited;
    }
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return DataSourceError::Auth(format!("upstream returned {status}"));
    }
    DataSourceError::Fetch(format!("upstream returned {status}"))
}

/// First row is the header; each following row becomes a record keyed by it.
/// Short rows leave their trailing columns absent, matching how the sheet
/// API omits empty trailing cells.
fn rows_to_records(rows: Vec<Vec<Value>>) -> RecordSet {
    let mut iter = rows.into_iter();
    let Some(header) = iter.next() else {
        return RecordSet::new();
    };
    let headers: Vec<String> = header
        .iter()
        .map(|h| crate::dates::value_as_text(h))
        .collect();

    iter.map(|row| {
        let mut record = Record::new();
        for (column, cell) in headers.iter().zip(row.into_iter()) {
            if !column.is_empty() {
                record.insert(column.clone(), cell);
            }
        }
        record
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_become_header_keyed_records() {
        let rows = vec![
            vec![json!("OrderID"), json!("Total")],
            vec![json!("A1"), json!("10")],
            vec![json!("B2")],
        ];
        let records = rows_to_records(rows);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["OrderID"], json!("A1"));
        assert_eq!(records[0]["Total"], json!("10"));
        assert_eq!(records[1]["OrderID"], json!("B2"));
        assert!(!records[1].contains_key("Total"));
    }

    #[test]
    fn empty_sheet_yields_no_records() {
        assert!(rows_to_records(Vec::new()).is_empty());
        assert!(rows_to_records(vec![vec![json!("OrderID")]]).is_empty());
    }

    #[test]
    fn http_failures_classify_by_status_and_body() {
        let too_many = reqwest::StatusCode::TOO_MANY_REQUESTS;
        assert!(matches!(
            classify_http_failure(too_many, ""),
            DataSourceError::RateLimited
        ));
        assert!(matches!(
            classify_http_failure(reqwest::StatusCode::OK, "RESOURCE_EXHAUSTED"),
            DataSourceError::RateLimited
        ));
        assert!(matches!(
            classify_http_failure(reqwest::StatusCode::FORBIDDEN, ""),
            DataSourceError::Auth(_)
        ));
        assert!(matches!(
            classify_http_failure(reqwest::StatusCode::BAD_GATEWAY, ""),
            DataSourceError::Fetch(_)
        ));
    }

}
