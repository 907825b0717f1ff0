// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod api;
pub mod config;
pub mod daily_performance;
pub mod errors;
pub mod logging;
pub mod mailer;
pub mod performance;
pub mod performance_csv_writer;
pub mod price_series;
pub mod report;
pub mod utils;
