// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::api::PriceProvider;
use crate::config::TickerGroup;
use crate::logging::RunLog;
use crate::mailer::{Mailer, ReportEmail, compose_report_email};
use crate::performance::{TickerPerformance, get_ticker_performance};
use crate::report::{ReportSection, render_table};

/// Records of one ticker group, in the group's ticker order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceTable {
    records: Vec<TickerPerformance>,
}

impl PerformanceTable {
    pub fn push(&mut self, record: TickerPerformance) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickerPerformance> {
        self.records.iter()
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.ticker.as_str()).collect()
    }
}

impl From<Vec<TickerPerformance>> for PerformanceTable {
    fn from(records: Vec<TickerPerformance>) -> Self {
        Self { records }
    }
}

/// A ticker group together with the records that could be computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPerformance {
    pub name: String,
    pub table: PerformanceTable,
}

/// Computes every ticker in order, skipping the ones that fail.
pub async fn fetch_performance(
    provider: &dyn PriceProvider,
    tickers: &[String],
    today: NaiveDate,
    log: &dyn RunLog,
) -> PerformanceTable {
    let mut table = PerformanceTable::default();

    for ticker in tickers {
        match get_ticker_performance(provider, ticker, today, log).await {
            Ok(record) => table.push(record),
            Err(e) => log.warn(&format!("Skipping {} due to error: {}", ticker, e)),
        }
    }

    table
}

pub async fn fetch_groups(
    provider: &dyn PriceProvider,
    groups: &[TickerGroup],
    today: NaiveDate,
    log: &dyn RunLog,
) -> Vec<GroupPerformance> {
    let mut results = Vec::with_capacity(groups.len());

    for group in groups {
        log.info(&format!(
            "Fetching {} tickers for {}",
            group.tickers.len(),
            group.name
        ));
        let table = fetch_performance(provider, &group.tickers, today, log).await;
        log.info(&format!(
            "{}: {}/{} tickers succeeded",
            group.name,
            table.len(),
            group.tickers.len()
        ));

        results.push(GroupPerformance {
            name: group.name.clone(),
            table,
        });
    }

    results
}

/// Renders every group's table into an email section.
pub fn render_sections(groups: &[GroupPerformance]) -> Result<Vec<ReportSection>> {
    groups
        .iter()
        .map(|group| {
            let table_html = render_table(&group.table)
                .with_context(|| format!("Failed to render the {} table", group.name))?;
            Ok(ReportSection {
                title: group.name.clone(),
                table_html,
            })
        })
        .collect()
}

/// Fetches every group and renders the email, without sending it.
pub async fn build_daily_report(
    provider: &dyn PriceProvider,
    groups: &[TickerGroup],
    today: NaiveDate,
    log: &dyn RunLog,
) -> Result<ReportEmail> {
    let results = fetch_groups(provider, groups, today, log).await;
    let sections = render_sections(&results)?;
    compose_report_email(today, &sections).context("Failed to compose email")
}

/// Runs the whole batch once: fetch, render and email.
///
/// A delivery failure is logged and returned; nothing is retried.
pub async fn run_daily_report(
    provider: &dyn PriceProvider,
    groups: &[TickerGroup],
    mailer: &dyn Mailer,
    today: NaiveDate,
    log: &dyn RunLog,
) -> Result<()> {
    let email = build_daily_report(provider, groups, today, log).await?;

    match mailer.deliver(&email).await {
        Ok(()) => {
            log.info(&format!("Email sent successfully on {}", today));
            Ok(())
        }
        Err(e) => {
            log.error(&format!("Error sending email: {}", e));
            Err(e).context("Failed to deliver the daily report")
        }
    }
}
