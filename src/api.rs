// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use url::form_urlencoded;

use crate::errors::ProviderError;
use crate::price_series::{PriceBar, PriceSeries};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Descriptive metadata for a ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerProfile {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

impl TickerProfile {
    /// Long name when present, otherwise the short name.
    pub fn display_name(&self) -> Option<&str> {
        fn non_blank(name: &Option<String>) -> Option<&str> {
            name.as_deref().filter(|name| !name.trim().is_empty())
        }

        non_blank(&self.long_name).or_else(|| non_blank(&self.short_name))
    }
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily closes for `ticker` on dates in `[start, end)`.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;

    async fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, ProviderError>;
}

pub struct YahooClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl YahooClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: CHART_URL.to_string(),
        })
    }

    /// Points the client at another chart endpoint, e.g. a regional mirror.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        self
    }

    fn chart_url(&self, ticker: &str) -> Result<Url, ProviderError> {
        if ticker.is_empty() {
            return Err(ProviderError::BadResponse("ticker empty".to_string()));
        }

        // ^GSPC, BZ=F and friends must be escaped before they go into the path.
        let encoded: String = form_urlencoded::byte_serialize(ticker.as_bytes()).collect();
        Url::parse(&format!("{}{}", self.base_url, encoded))
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }

    async fn get_chart(&self, url: Url, query: &[(&str, String)]) -> Result<ChartResult, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        parse_response(status, &text)
    }
}

fn parse_response(status: StatusCode, text: &str) -> Result<ChartResult, ProviderError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    // Unknown symbols come back as 404 with a chart.error body.
    let body: ChartResponse = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(_) if !status.is_success() => {
            return Err(ProviderError::BadResponse(format!("API error: {} - {}", status, text)));
        }
        Err(e) => return Err(ProviderError::Parse(e.to_string())),
    };

    parse_chart(body)
}

fn parse_chart(body: ChartResponse) -> Result<ChartResult, ProviderError> {
    if let Some(error) = body.chart.error {
        let message = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown chart error".to_string());
        return Err(ProviderError::BadResponse(message));
    }

    body.chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| ProviderError::BadResponse("missing result".to_string()))
}

/// Converts chart rows into bars keyed by the exchange-local date.
fn chart_bars(result: &ChartResult) -> Result<Vec<PriceBar>, ProviderError> {
    let closes = result
        .indicators
        .as_ref()
        .and_then(|indicators| indicators.quote.first())
        .map(|quote| quote.close.as_slice())
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        // skip rows without a close
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };

        let local = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| ProviderError::Parse(format!("bad timestamp {}", ts)))?;

        bars.push(PriceBar {
            date: local.date_naive(),
            close,
        });
    }

    Ok(bars)
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[async_trait]
impl PriceProvider for YahooClient {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let url = self.chart_url(ticker)?;
        let query = [
            ("period1", epoch_seconds(start).to_string()),
            ("period2", epoch_seconds(end).to_string()),
            ("interval", "1d".to_string()),
            ("events", "history".to_string()),
        ];

        let result = self.get_chart(url, &query).await?;
        let bars = chart_bars(&result)?;

        Ok(PriceSeries::from_bars(
            bars.into_iter().filter(|bar| bar.date >= start && bar.date < end),
        ))
    }

    async fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, ProviderError> {
        let url = self.chart_url(ticker)?;
        let query = [("range", "1d".to_string()), ("interval", "1d".to_string())];

        let result = self.get_chart(url, &query).await?;

        Ok(TickerProfile {
            long_name: result.meta.long_name,
            short_name: result.meta.short_name,
        })
    }
}
