/// Google Sheets values API client
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::RemoteStore;
use crate::error::{Result, CollectorError};
use crate::sheets::auth::TokenProvider;

const BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Serialize)]
struct ValueRangeBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Append-only client for a single worksheet.
///
/// Construction is cheap; the access token is fetched lazily on first use,
/// so an auth outage surfaces as a per-cycle recoverable error rather than
/// a startup failure.
pub struct SheetsClient {
    client: Client,
    tokens: TokenProvider,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsClient {
    pub fn new(tokens: TokenProvider, spreadsheet_id: String, worksheet: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CollectorError::StoreIoError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(SheetsClient {
            client,
            tokens,
            spreadsheet_id,
            worksheet,
        })
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            BASE_URL, self.spreadsheet_id, self.worksheet, suffix
        )
    }

    async fn append(&self, values: Vec<Vec<String>>) -> Result<()> {
        let token = self.tokens.bearer_token(&self.client).await?;

        let response = self.client
            .post(self.values_url(":append"))
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&ValueRangeBody { values })
            .send()
            .await
            .map_err(|e| CollectorError::StoreIoError(format!("Append request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollectorError::StoreIoError(format!(
                "Append returned {}: {}", status, body
            )));
        }

        Ok(())
    }
}

impl RemoteStore for SheetsClient {
    /// All rows of the worksheet as strings, in sheet order
    async fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let token = self.tokens.bearer_token(&self.client).await?;

        let response = self.client
            .get(self.values_url(""))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CollectorError::StoreIoError(format!("Read request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollectorError::StoreIoError(format!("Read response: {}", e)))?;

        if !status.is_success() {
            return Err(CollectorError::StoreIoError(format!(
                "Read returned {}: {}", status, body
            )));
        }

        let range: ValueRangeResponse = serde_json::from_str(&body)
            .map_err(|e| CollectorError::StoreIoError(format!("Read parse error: {}", e)))?;

        debug!("Read {} remote rows", range.values.len());
        Ok(range.values)
    }

    async fn append_row(&self, row: &[String]) -> Result<()> {
        self.append(vec![row.to_vec()]).await
    }

    /// One batched append call for the whole delta
    async fn append_rows(&self, rows: &[Vec<String>]) -> Result<()> {
        self.append(rows.to_vec()).await
    }
}
