// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Trading-date resolution and return calculation through the public API

mod common;

use approx::assert_relative_eq;
use common::date;
use daily_insight::performance::performance;
use daily_insight::price_series::{PriceBar, PriceSeries, ResolvedDate};

fn series(points: &[((i32, u32, u32), f64)]) -> PriceSeries {
    PriceSeries::from_bars(points.iter().map(|&((y, m, d), close)| PriceBar {
        date: date(y, m, d),
        close,
    }))
}

#[test]
fn test_saturday_resolves_to_friday() {
    let s = series(&[
        ((2024, 1, 2), 470.0),
        ((2024, 1, 3), 467.0),
        ((2024, 1, 4), 465.0),
        ((2024, 1, 5), 467.5),
    ]);

    assert_eq!(s.resolve(date(2024, 1, 6)), ResolvedDate::Trading(date(2024, 1, 5)));
}

#[test]
fn test_date_before_history_is_missing() {
    let s = series(&[((2020, 1, 1), 10.0), ((2020, 1, 2), 12.0)]);

    let resolved = s.resolve(date(2019, 1, 1));

    assert_eq!(resolved, ResolvedDate::Unavailable);
    assert_eq!(performance(resolved, &s), None);
}

#[test]
fn test_ten_percent_gain() {
    let s = series(&[((2024, 1, 2), 100.0), ((2024, 1, 3), 104.0), ((2024, 1, 4), 110.0)]);

    let resolved = s.resolve(date(2024, 1, 2));

    assert_relative_eq!(performance(resolved, &s).unwrap(), 0.10, epsilon = 1e-12);
}

#[test]
fn test_holiday_gap_resolves_to_previous_session() {
    // 2024-01-01 is a market holiday
    let s = series(&[((2023, 12, 29), 100.0), ((2024, 1, 2), 101.0)]);

    assert_eq!(s.resolve(date(2024, 1, 1)), ResolvedDate::Trading(date(2023, 12, 29)));
    assert_eq!(s.resolve(date(2023, 12, 31)), ResolvedDate::Trading(date(2023, 12, 29)));
}

#[test]
fn test_lag_substitution_picks_second_to_last() {
    let s = series(&[((2024, 3, 13), 90.0), ((2024, 3, 14), 100.0), ((2024, 3, 15), 120.0)]);

    assert_eq!(s.resolve(date(2024, 3, 17)), ResolvedDate::Trading(date(2024, 3, 15)));
    assert_eq!(
        s.resolve_previous_session(date(2024, 3, 17)),
        ResolvedDate::Trading(date(2024, 3, 14))
    );
}
