// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Daily close series and trading-date resolution.
//!
//! A [`PriceSeries`] only knows the dates a bar was actually observed on.
//! Calendar dates that fall on weekends, holidays or before the first bar are
//! mapped onto observed dates by [`PriceSeries::resolve`].

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A single daily bar as delivered by a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// Outcome of mapping a calendar date onto the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDate {
    Trading(NaiveDate),
    /// The requested date precedes all available history.
    Unavailable,
}

impl ResolvedDate {
    pub fn trading_date(self) -> Option<NaiveDate> {
        match self {
            ResolvedDate::Trading(date) => Some(date),
            ResolvedDate::Unavailable => None,
        }
    }
}

/// Closing prices keyed by trading date, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    /// Builds a series from bars in any order. A repeated date keeps the
    /// last bar given for it.
    pub fn from_bars<I>(bars: I) -> Self
    where
        I: IntoIterator<Item = PriceBar>,
    {
        let closes = bars.into_iter().map(|bar| (bar.date, bar.close)).collect();
        Self { closes }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.closes.keys().next_back().copied()
    }

    /// The trading date immediately before the most recent one.
    pub fn second_to_last_date(&self) -> Option<NaiveDate> {
        self.closes.keys().rev().nth(1).copied()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.closes.values().next_back().copied()
    }

    pub fn close_at(&self, date: NaiveDate) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.closes.contains_key(&date)
    }

    pub fn bars(&self) -> impl Iterator<Item = PriceBar> + '_ {
        self.closes
            .iter()
            .map(|(&date, &close)| PriceBar { date, close })
    }

    /// Maps `target` onto the latest trading date on or before it.
    ///
    /// Returns [`ResolvedDate::Unavailable`] when the series is empty or
    /// `target` is earlier than the first bar; history before the first bar
    /// is never approximated.
    pub fn resolve(&self, target: NaiveDate) -> ResolvedDate {
        match self.first_date() {
            Some(first) if target >= first => {}
            _ => return ResolvedDate::Unavailable,
        }

        // Walking back day by day stops at the nearest observed date, which
        // is exactly the last key in `..=target`.
        self.closes
            .range(..=target)
            .next_back()
            .map(|(&date, _)| ResolvedDate::Trading(date))
            .unwrap_or(ResolvedDate::Unavailable)
    }

    /// Resolves the "previous trading day" target.
    ///
    /// When `target` lands on the newest bar, the feed either already posted
    /// today's close or has not posted yesterday's yet. Either way the
    /// comparison point becomes the second-to-last bar.
    pub fn resolve_previous_session(&self, target: NaiveDate) -> ResolvedDate {
        match self.resolve(target) {
            ResolvedDate::Trading(date) if Some(date) == self.last_date() => self
                .second_to_last_date()
                .map(ResolvedDate::Trading)
                .unwrap_or(ResolvedDate::Unavailable),
            resolved => resolved,
        }
    }
}
