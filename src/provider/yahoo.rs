/// Yahoo Finance chart REST client
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, CollectorError};
use crate::types::Bar;

const BASE_URL: &str = "https://query1.finance.yahoo.com";

// Yahoo throttles requests carrying no browser-like user agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) barsync/0.1";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

/// Yahoo Finance chart API client.
///
/// Always requests the current day's full 1-minute window. The over-fetch is
/// deliberate: the synchronizer diffs against a contiguous window instead of
/// trusting an incremental feed to not drop the most recent partial bar.
pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CollectorError::ProviderError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(YahooClient { client })
    }

    /// Fetch today's 1-minute bars for a symbol.
    ///
    /// Returns an empty Vec when the market has not produced data yet
    /// (pre-open, holiday); transport and payload failures are errors.
    pub async fn fetch_intraday(&self, symbol: &str) -> Result<Vec<Bar>> {
        let url = format!("{}/v8/finance/chart/{}", BASE_URL, symbol);

        let response = self.client
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1m")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Chart response status: {}, {} bytes", status, body.len());

        let chart: ChartResponse = serde_json::from_str(&body)?;
        parse_chart(chart)
    }
}

fn parse_chart(response: ChartResponse) -> Result<Vec<Bar>> {
    if let Some(err) = response.chart.error {
        return Err(CollectorError::ProviderError(format!(
            "{}: {}", err.code, err.description
        )));
    }

    let result = response.chart.result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| CollectorError::ProviderError("No chart result in response".to_string()))?;

    // No timestamps at all means the window is empty, not broken
    let timestamps = match result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(Vec::new()),
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, epoch) in timestamps.iter().enumerate() {
        // The still-forming minute arrives with null fields; skip it
        let (open, high, low, close, volume) = match (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => continue,
        };

        let timestamp = DateTime::<Utc>::from_timestamp(*epoch, 0)
            .ok_or_else(|| CollectorError::InvalidBarData(format!("Bad epoch: {}", epoch)))?;

        // Batch invariant: strictly increasing timestamps
        if let Some(last) = bars.last() {
            if timestamp <= last.timestamp {
                return Err(CollectorError::InvalidBarData(format!(
                    "Non-monotonic timestamp in provider window: {}", timestamp
                )));
            }
        }

        bars.push(Bar { timestamp, open, high, low, close, volume });
    }

    debug!("Fetched {} complete bars", bars.len());
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_body(timestamps: &str, quote: &str) -> String {
        format!(
            r#"{{"chart":{{"result":[{{"meta":{{}},"timestamp":{},"indicators":{{"quote":[{}]}}}}],"error":null}}}}"#,
            timestamps, quote
        )
    }

    #[test]
    fn test_parse_normal_window() {
        let body = chart_body(
            "[1709294400, 1709294460]",
            r#"{"open":[36.1,36.2],"high":[36.3,36.4],"low":[36.0,36.1],"close":[36.2,36.3],"volume":[1000,2000]}"#,
        );
        let chart: ChartResponse = serde_json::from_str(&body).unwrap();
        let bars = parse_chart(chart).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].open, 36.1);
        assert_eq!(bars[1].volume, 2000);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn test_null_trailing_sample_is_skipped() {
        let body = chart_body(
            "[1709294400, 1709294460]",
            r#"{"open":[36.1,null],"high":[36.3,null],"low":[36.0,null],"close":[36.2,null],"volume":[1000,null]}"#,
        );
        let chart: ChartResponse = serde_json::from_str(&body).unwrap();
        let bars = parse_chart(chart).unwrap();

        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn test_empty_window_is_not_an_error() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let chart: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = parse_chart(chart).unwrap();

        assert!(bars.is_empty());
    }

    #[test]
    fn test_provider_error_body() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let chart: ChartResponse = serde_json::from_str(body).unwrap();
        let err = parse_chart(chart).unwrap_err();

        assert!(matches!(err, CollectorError::ProviderError(_)));
    }
}
