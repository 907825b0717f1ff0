// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! HTML tables for the daily email.

use askama::Template;

use crate::daily_performance::PerformanceTable;
use crate::errors::ReportError;
use crate::performance::{PerformanceWindow, TickerPerformance};
use crate::utils::{format_percent, format_price};

/// Shown in place of a window with no data.
pub const MISSING_PLACEHOLDER: &str = "-";

const HEADER_STYLE: &str = "background-color: #E2EFDA; font-weight: bold; width: 100px; border: 1px solid black; text-align: center;";
const CELL_STYLE: &str = "border: 1px solid black; text-align: center;";

/// One titled table of the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub title: String,
    pub table_html: String,
}

struct TableCell {
    text: String,
    style: String,
}

struct TableRow {
    cells: Vec<TableCell>,
}

#[derive(Template)]
#[template(path = "performance_table.html")]
struct PerformanceTableTemplate {
    headers: Vec<&'static str>,
    header_style: &'static str,
    rows: Vec<TableRow>,
}

/// Column headers, in table order.
pub fn column_headers() -> Vec<&'static str> {
    let mut headers = vec!["name", "ticker", "latest_price"];
    headers.extend(PerformanceWindow::ALL.iter().map(|w| w.label()));
    headers
}

/// Font color for a numeric cell: red below zero, green otherwise, black
/// when there is no value.
pub fn font_color(value: Option<f64>) -> &'static str {
    match value {
        None => "black",
        Some(v) if v.is_nan() => "black",
        Some(v) if v < 0.0 => "red",
        Some(_) => "green",
    }
}

fn plain_cell(text: &str) -> TableCell {
    TableCell {
        text: text.to_string(),
        style: CELL_STYLE.to_string(),
    }
}

fn numeric_cell(value: Option<f64>, format: fn(f64) -> String) -> TableCell {
    TableCell {
        text: value
            .map(format)
            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_string()),
        style: format!("{} color: {};", CELL_STYLE, font_color(value)),
    }
}

fn table_row(record: &TickerPerformance) -> TableRow {
    let mut cells = vec![
        plain_cell(&record.name),
        plain_cell(&record.ticker),
        numeric_cell(Some(record.latest_price), format_price),
    ];
    cells.extend(
        PerformanceWindow::ALL
            .iter()
            .map(|&w| numeric_cell(record.window(w), format_percent)),
    );
    TableRow { cells }
}

/// Renders one group's records as a styled HTML table.
pub fn render_table(table: &PerformanceTable) -> Result<String, ReportError> {
    let template = PerformanceTableTemplate {
        headers: column_headers(),
        header_style: HEADER_STYLE,
        rows: table.iter().map(table_row).collect(),
    };

    Ok(template.render()?)
}
