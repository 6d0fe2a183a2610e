//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API. One HTTP request per
//! call — retry, backoff, and batch pacing are handled above this layer.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes; the typed response structs below tolerate per-row nulls and
//! ignore fields outside the recognized OHLCV family.

use super::provider::{BarProvider, FetchError, ProviderFrame};
use crate::domain::RawBar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(provider_symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let end_ts = end.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{provider_symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Parse the chart API response into raw bars.
    ///
    /// A "Not Found" chart error and an empty result both yield an empty
    /// bar list — delisted symbols are a no-data condition, not a fault.
    fn parse_response(resp: ChartResponse) -> Result<Vec<RawBar>, FetchError> {
        let result = match resp.chart.result {
            Some(result) => result,
            None => {
                return match resp.chart.error {
                    Some(err) if err.code == "Not Found" => Ok(Vec::new()),
                    Some(err) => Err(FetchError::ResponseFormatChanged(format!(
                        "{}: {}",
                        err.code, err.description
                    ))),
                    None => Err(FetchError::ResponseFormatChanged(
                        "empty result with no error".into(),
                    )),
                };
            }
        };

        let data = match result.into_iter().next() {
            Some(data) => data,
            None => return Ok(Vec::new()),
        };

        let timestamps = match data.timestamp {
            Some(ts) => ts,
            None => return Ok(Vec::new()),
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());

        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    FetchError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let bar = RawBar {
                date,
                open: quote.open.get(i).copied().flatten(),
                high: quote.high.get(i).copied().flatten(),
                low: quote.low.get(i).copied().flatten(),
                close: quote.close.get(i).copied().flatten(),
                adj_close: adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten()),
                volume: quote.volume.get(i).copied().flatten(),
            };

            // Holidays/non-trading days come back as all-null rows
            if bar.is_blank() {
                continue;
            }

            bars.push(bar);
        }

        Ok(bars)
    }
}

impl BarProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn request(
        &self,
        provider_symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderFrame, FetchError> {
        let url = Self::chart_url(provider_symbol, start, end);

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                FetchError::NetworkUnreachable(e.to_string())
            } else {
                FetchError::Other(e.to_string())
            }
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            FetchError::ResponseFormatChanged(format!(
                "failed to parse response for {provider_symbol}: {e}"
            ))
        })?;

        Ok(ProviderFrame::Single(Self::parse_response(chart)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_chart_payload() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704182400, 1704268800],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.0],
                            "high": [102.0, 103.0],
                            "low": [99.0, 100.5],
                            "close": [101.0, 102.5],
                            "volume": [1000, 1100]
                        }],
                        "adjclose": [{"adjclose": [101.0, 102.5]}]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response(resp).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, Some(101.0));
        assert_eq!(bars[1].volume, Some(1100));
    }

    #[test]
    fn all_null_rows_are_skipped() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704182400, 1704268800],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, null],
                            "high": [102.0, null],
                            "low": [99.0, null],
                            "close": [101.0, null],
                            "volume": [1000, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response(resp).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].adj_close, None);
    }

    #[test]
    fn not_found_error_is_no_data() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_response(resp).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn other_chart_errors_are_faults() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Internal", "description": "boom"}
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(YahooProvider::parse_response(resp).is_err());
    }

    #[test]
    fn chart_url_includes_window_and_interval() {
        let url = YahooProvider::chart_url(
            "BRK-B",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(url.contains("/chart/BRK-B"));
        assert!(url.contains("interval=1d"));
    }
}
