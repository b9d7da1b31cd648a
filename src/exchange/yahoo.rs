use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::Config;
use crate::error::ProviderError;
use crate::exchange::{BarProvider, BarRequest};
use crate::models::{Bar, BarSeries};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; prop-sniper/0.1)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

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
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance chart API client with a time-based response cache.
pub struct YahooClient {
    client: Client,
    last_request: Option<Instant>,
    cache: HashMap<BarRequest, (Instant, BarSeries)>,
    cache_ttl: Duration,
}

impl YahooClient {
    /// Every request is bounded by a timeout so a stalled upstream surfaces
    /// as a provider error instead of blocking the cycle.
    pub fn new(cfg: &Config) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            last_request: None,
            cache: HashMap::new(),
            cache_ttl: Duration::from_secs(cfg.cache_ttl_secs),
        })
    }

    async fn rate_limit(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    pub async fn fetch_bars(&mut self, request: &BarRequest) -> Result<BarSeries, ProviderError> {
        if let Some((cached_at, series)) = self.cache.get(request) {
            if cached_at.elapsed() < self.cache_ttl {
                debug!("cache hit {} {}", request.symbol, request.interval);
                return Ok(series.clone());
            }
        }

        self.rate_limit().await;

        let resp = self
            .client
            .get(format!("{}/v8/finance/chart/{}", BASE_URL, request.symbol))
            .query(&[
                ("interval", request.interval.yahoo_interval().to_string()),
                ("range", format!("{}d", request.lookback_days)),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api(format!("HTTP {}: {}", status, truncate(&body, 200))));
        }

        let series = parse_chart(&body)?;
        debug!(
            "fetched {} {} bars for {}",
            series.len(),
            request.interval,
            request.symbol
        );

        self.cache
            .insert(request.clone(), (Instant::now(), series.clone()));

        Ok(series)
    }
}

/// Decode a chart payload. Rows with any missing OHLC value are dropped; the
/// remaining rows must form a valid series.
pub fn parse_chart(body: &str) -> Result<BarSeries, ProviderError> {
    let data: ChartResponse = serde_json::from_str(body)?;
    if let Some(err) = data.chart.error {
        return Err(ProviderError::Api(format!("{}: {}", err.code, err.description)));
    }
    let result = data
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(ProviderError::Empty)?;
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or(ProviderError::Empty)?;

    let bars: Vec<Bar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            Some(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: quote.open.get(i).copied().flatten()?,
                high: quote.high.get(i).copied().flatten()?,
                low: quote.low.get(i).copied().flatten()?,
                close: quote.close.get(i).copied().flatten()?,
            })
        })
        .collect();

    if bars.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(BarSeries::new(bars)?)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait]
impl BarProvider for YahooClient {
    async fn fetch_bars(&mut self, request: &BarRequest) -> Result<BarSeries, ProviderError> {
        self.fetch_bars(request).await
    }
}
