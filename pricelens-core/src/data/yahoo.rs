//! Yahoo Finance data source.
//!
//! Fetches daily closes from Yahoo's v8 chart API. One blocking request per
//! fetch; failures are mapped to `DataError` and returned to the caller.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! A local CSV file is the fallback when Yahoo is unavailable.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::provider::{check_range, DataError, DataSource, MarketDataSource};
use crate::domain::Sample;

const BASE_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
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
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Exchange offset from UTC, in seconds. Bars are dated in exchange time.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartMeta {
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance data source.
pub struct YahooSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooSource {
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(BASE_URL)
    }

    /// Point the source at a different chart endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build the chart API URL for `[start, end)`.
    ///
    /// `period1` starts a day early so exchanges east of UTC, whose sessions
    /// open before UTC midnight, keep their first bar. `parse_response` trims
    /// by exchange-local date.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let midnight = |d: NaiveDate| d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let start_ts = midnight(start - chrono::Duration::days(1));
        let end_ts = midnight(end);
        format!(
            "{}/{symbol}?period1={start_ts}&period2={end_ts}&interval=1d&events=history",
            self.base_url
        )
    }
}

/// Parse the chart API response into samples dated in `[start, end)`,
/// using the exchange's local date for each bar.
///
/// Rows where every quote field is null (holidays, non-trading days) are
/// skipped. A null close on an otherwise populated row is kept as missing so
/// cleaning can fill it.
pub(crate) fn parse_response(
    symbol: &str,
    resp: ChartResponse,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Sample>, DataError> {
    let result = match (resp.chart.result, resp.chart.error) {
        (Some(result), _) => result,
        (None, Some(err)) if err.code == "Not Found" => {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
        }
        (None, Some(err)) => {
            return Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code, err.description
            )))
        }
        (None, None) => {
            return Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            ))
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };

    // No timestamps: the range held no trading days.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let offset = data.meta.gmtoffset;
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let mut samples = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        if date < start || date >= end {
            continue;
        }

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        samples.push(Sample { date, close });
    }

    Ok(samples)
}

impl MarketDataSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn kind(&self) -> DataSource {
        DataSource::YahooFinance
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Sample>, DataError> {
        check_range(start, end)?;

        let url = self.chart_url(symbol, start, end);
        info!(%symbol, %start, %end, "fetching from Yahoo Finance");
        debug!(%url, "chart request");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                symbol: symbol.to_string(),
            });
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let samples = parse_response(symbol, chart, start, end)?;
        info!(%symbol, rows = samples.len(), "fetch complete");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(json: &str) -> Result<Vec<Sample>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        parse_response("AAPL", resp, ymd(2023, 1, 1), ymd(2023, 12, 31))
    }

    // 2023-01-03 14:30 UTC, 2023-01-04 14:30 UTC, 2023-01-05 14:30 UTC
    const FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1672756200, 1672842600, 1672929000],
                "indicators": {
                    "quote": [{
                        "open":   [130.28, null, 127.13],
                        "high":   [130.90, null, 127.77],
                        "low":    [124.17, null, 124.76],
                        "close":  [125.07, null, null],
                        "volume": [112117500, null, 80962700]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_closes_and_skips_empty_rows() {
        let samples = parse(FIXTURE).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].date, ymd(2023, 1, 3));
        assert_eq!(samples[0].close, Some(125.07));
        // populated row with a null close is kept as missing
        assert_eq!(samples[1].date, ymd(2023, 1, 5));
        assert_eq!(samples[1].close, None);
    }

    #[test]
    fn filters_to_requested_range() {
        let resp: ChartResponse = serde_json::from_str(FIXTURE).unwrap();
        let samples = parse_response("AAPL", resp, ymd(2023, 1, 4), ymd(2023, 1, 31)).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, ymd(2023, 1, 5));
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn other_chart_error_is_format_change() {
        let err = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn no_timestamps_is_empty() {
        let samples = parse(
            r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#,
        )
        .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn end_date_is_exclusive() {
        let resp: ChartResponse = serde_json::from_str(FIXTURE).unwrap();
        let samples = parse_response("AAPL", resp, ymd(2023, 1, 3), ymd(2023, 1, 5)).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].date, ymd(2023, 1, 3));
    }

    // Tokyo: each bar is stamped 00:00 JST, i.e. 15:00 UTC the day before.
    const TOKYO_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "JPY", "symbol": "7203.T", "gmtoffset": 32400},
                "timestamp": [1672758000, 1672844400],
                "indicators": {
                    "quote": [{
                        "open":   [1800.0, 1790.0],
                        "high":   [1810.0, 1805.0],
                        "low":    [1780.0, 1770.0],
                        "close":  [1795.0, 1801.5],
                        "volume": [1000, 1200]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn bars_are_dated_in_exchange_time() {
        let resp: ChartResponse = serde_json::from_str(TOKYO_FIXTURE).unwrap();
        let samples = parse_response("7203.T", resp, ymd(2023, 1, 4), ymd(2023, 1, 6)).unwrap();
        let dates: Vec<_> = samples.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![ymd(2023, 1, 4), ymd(2023, 1, 5)]);
        assert_eq!(samples[0].close, Some(1795.0));
    }

    #[test]
    fn missing_meta_means_utc() {
        let samples = parse(FIXTURE).unwrap();
        assert_eq!(samples[0].date, ymd(2023, 1, 3));
    }

    #[test]
    fn chart_url_requests_calendar_year() {
        let source = YahooSource::with_base_url("http://localhost").unwrap();
        let url = source.chart_url("BTC-USD", ymd(2022, 1, 1), ymd(2023, 1, 1));
        // period1 is 2021-12-31 00:00 UTC, period2 2023-01-01 00:00 UTC.
        assert_eq!(
            url,
            "http://localhost/BTC-USD?period1=1640908800&period2=1672531200&interval=1d&events=history"
        );
    }
}
