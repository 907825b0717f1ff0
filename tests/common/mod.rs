// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Common test utilities and helpers
//!
//! This module provides in-memory stand-ins for the external collaborators:
//! - A price provider serving canned series and profiles
//! - A logger that records every message
//! - Mailers that record or reject deliveries

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use daily_insight::api::{PriceProvider, TickerProfile};
use daily_insight::errors::{DeliveryError, ProviderError};
use daily_insight::logging::RunLog;
use daily_insight::mailer::{Mailer, ReportEmail};
use daily_insight::price_series::{PriceBar, PriceSeries};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Weekday bars from `start` to `end` inclusive, closes rising by `step`.
pub fn business_day_series(start: NaiveDate, end: NaiveDate, first_close: f64, step: f64) -> PriceSeries {
    let mut bars = Vec::new();
    let mut day = start;
    let mut close = first_close;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            bars.push(PriceBar { date: day, close });
            close += step;
        }
        day = day.succ_opt().unwrap();
    }
    PriceSeries::from_bars(bars)
}

enum Canned {
    Data {
        series: PriceSeries,
        profile: TickerProfile,
    },
    HistoryFails(String),
    ProfileFails(PriceSeries, String),
}

/// Serves canned data per ticker; unknown tickers fail like a delisted symbol.
#[derive(Default)]
pub struct StaticProvider {
    tickers: HashMap<String, Canned>,
    history_calls: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(mut self, ticker: &str, name: &str, series: PriceSeries) -> Self {
        self.tickers.insert(
            ticker.to_string(),
            Canned::Data {
                series,
                profile: TickerProfile {
                    long_name: Some(name.to_string()),
                    short_name: None,
                },
            },
        );
        self
    }

    pub fn with_profile(mut self, ticker: &str, profile: TickerProfile, series: PriceSeries) -> Self {
        self.tickers
            .insert(ticker.to_string(), Canned::Data { series, profile });
        self
    }

    pub fn with_failing_history(mut self, ticker: &str, message: &str) -> Self {
        self.tickers
            .insert(ticker.to_string(), Canned::HistoryFails(message.to_string()));
        self
    }

    pub fn with_failing_profile(mut self, ticker: &str, series: PriceSeries, message: &str) -> Self {
        self.tickers.insert(
            ticker.to_string(),
            Canned::ProfileFails(series, message.to_string()),
        );
        self
    }

    pub fn history_calls(&self) -> Vec<(String, NaiveDate, NaiveDate)> {
        self.history_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceProvider for StaticProvider {
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        self.history_calls
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));

        match self.tickers.get(ticker) {
            Some(Canned::Data { series, .. }) | Some(Canned::ProfileFails(series, _)) => {
                Ok(PriceSeries::from_bars(
                    series.bars().filter(|b| b.date >= start && b.date < end),
                ))
            }
            Some(Canned::HistoryFails(message)) => Err(ProviderError::Network(message.clone())),
            None => Err(ProviderError::BadResponse(format!(
                "No data found, symbol may be delisted: {}",
                ticker
            ))),
        }
    }

    async fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, ProviderError> {
        match self.tickers.get(ticker) {
            Some(Canned::Data { profile, .. }) => Ok(profile.clone()),
            Some(Canned::ProfileFails(_, message)) => Err(ProviderError::BadResponse(message.clone())),
            Some(Canned::HistoryFails(message)) => Err(ProviderError::Network(message.clone())),
            None => Err(ProviderError::BadResponse("unknown ticker".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Records every message passed to it.
#[derive(Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }

    fn push(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

impl RunLog for RecordingLog {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Keeps delivered emails in memory.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ReportEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<ReportEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn deliver(&self, email: &ReportEmail) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Rejects every delivery.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn deliver(&self, _email: &ReportEmail) -> Result<(), DeliveryError> {
        // A message without a From header never builds.
        lettre::Message::builder()
            .to("b@example.com".parse().unwrap())
            .subject("test")
            .body(String::from("test"))?;
        Ok(())
    }
}
