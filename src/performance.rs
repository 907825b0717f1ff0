// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::api::PriceProvider;
use crate::errors::DataFetchError;
use crate::logging::RunLog;
use crate::price_series::{PriceSeries, ResolvedDate};

/// Years of daily history requested per ticker.
pub const HISTORY_YEARS: u32 = 4;

/// Trailing windows reported for every ticker, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceWindow {
    Daily,
    Weekly,
    Monthly,
    YearToDate,
    OneYear,
    ThreeYears,
}

impl PerformanceWindow {
    pub const ALL: [PerformanceWindow; 6] = [
        PerformanceWindow::Daily,
        PerformanceWindow::Weekly,
        PerformanceWindow::Monthly,
        PerformanceWindow::YearToDate,
        PerformanceWindow::OneYear,
        PerformanceWindow::ThreeYears,
    ];

    /// Column label used in the report tables.
    pub fn label(self) -> &'static str {
        match self {
            PerformanceWindow::Daily => "daily",
            PerformanceWindow::Weekly => "weekly",
            PerformanceWindow::Monthly => "monthly",
            PerformanceWindow::YearToDate => "YTD",
            PerformanceWindow::OneYear => "1_year",
            PerformanceWindow::ThreeYears => "3_years",
        }
    }

    /// Calendar date the window starts from, before trading-date resolution.
    ///
    /// `end` is the exclusive end of the fetched history, i.e. tomorrow.
    pub fn target_date(self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            PerformanceWindow::Daily => end.checked_sub_days(Days::new(2)),
            PerformanceWindow::Weekly => end.checked_sub_days(Days::new(7)),
            PerformanceWindow::Monthly => end.checked_sub_months(Months::new(1)),
            PerformanceWindow::YearToDate => NaiveDate::from_ymd_opt(end.year() - 1, 12, 31),
            PerformanceWindow::OneYear => end
                .checked_sub_months(Months::new(12))
                .and_then(|d| d.checked_add_days(Days::new(1))),
            PerformanceWindow::ThreeYears => end
                .checked_sub_months(Months::new(36))
                .and_then(|d| d.checked_add_days(Days::new(1))),
        }
    }

    /// Resolves the window's start onto a trading date of `series`.
    pub fn resolve(self, end: NaiveDate, series: &PriceSeries) -> ResolvedDate {
        let Some(target) = self.target_date(end) else {
            return ResolvedDate::Unavailable;
        };

        match self {
            PerformanceWindow::Daily => series.resolve_previous_session(target),
            _ => series.resolve(target),
        }
    }
}

/// Return from the close at `resolved` to the latest close, as a fraction.
///
/// `None` when the date is unavailable, or when its close is missing, zero or
/// not finite.
pub fn performance(resolved: ResolvedDate, series: &PriceSeries) -> Option<f64> {
    let date = resolved.trading_date()?;
    let base = series.close_at(date)?;
    let latest = series.latest_close()?;

    if base == 0.0 || !base.is_finite() || !latest.is_finite() {
        return None;
    }

    Some(latest / base - 1.0)
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerPerformance {
    pub name: String,
    pub ticker: String,
    pub latest_price: f64,
    pub daily: Option<f64>,
    pub weekly: Option<f64>,
    pub monthly: Option<f64>,
    pub ytd: Option<f64>,
    pub one_year: Option<f64>,
    pub three_years: Option<f64>,
}

impl TickerPerformance {
    pub fn window(&self, window: PerformanceWindow) -> Option<f64> {
        match window {
            PerformanceWindow::Daily => self.daily,
            PerformanceWindow::Weekly => self.weekly,
            PerformanceWindow::Monthly => self.monthly,
            PerformanceWindow::YearToDate => self.ytd,
            PerformanceWindow::OneYear => self.one_year,
            PerformanceWindow::ThreeYears => self.three_years,
        }
    }
}

/// Builds a record from an already fetched series.
///
/// Returns `None` for an empty series.
pub fn compute_performance(
    ticker: &str,
    name: &str,
    series: &PriceSeries,
    today: NaiveDate,
) -> Option<TickerPerformance> {
    let latest_price = series.latest_close()?;
    let end = history_end(today);
    let window = |w: PerformanceWindow| performance(w.resolve(end, series), series);

    Some(TickerPerformance {
        name: name.to_string(),
        ticker: ticker.to_string(),
        latest_price,
        daily: window(PerformanceWindow::Daily),
        weekly: window(PerformanceWindow::Weekly),
        monthly: window(PerformanceWindow::Monthly),
        ytd: window(PerformanceWindow::YearToDate),
        one_year: window(PerformanceWindow::OneYear),
        three_years: window(PerformanceWindow::ThreeYears),
    })
}

/// Exclusive end of the fetched history: the day after `today`.
pub fn history_end(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(today)
}

/// First day of the fetched history.
pub fn history_start(today: NaiveDate) -> NaiveDate {
    let end = history_end(today);
    end.checked_sub_months(Months::new(12 * HISTORY_YEARS))
        .unwrap_or(NaiveDate::MIN)
}

/// Fetches history and metadata for `ticker` and computes its record.
///
/// Failures are logged with the ticker before being returned.
pub async fn get_ticker_performance(
    provider: &dyn PriceProvider,
    ticker: &str,
    today: NaiveDate,
    log: &dyn RunLog,
) -> Result<TickerPerformance, DataFetchError> {
    let fetched = provider
        .fetch_daily_history(ticker, history_start(today), history_end(today))
        .await
        .map_err(DataFetchError::History);

    let series = match fetched {
        Ok(series) if series.is_empty() => Err(DataFetchError::EmptyHistory),
        other => other,
    }
    .inspect_err(|e| log.error(&format!("Error fetching performance for {}: {}", ticker, e)))?;

    let name = provider
        .fetch_profile(ticker)
        .await
        .map_err(DataFetchError::Metadata)
        .and_then(|profile| {
            profile
                .display_name()
                .map(str::to_string)
                .ok_or(DataFetchError::MissingName)
        })
        .inspect_err(|e| log.error(&format!("Error fetching company name for {}: {}", ticker, e)))?;

    compute_performance(ticker, &name, &series, today).ok_or(DataFetchError::EmptyHistory)
}
