// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Writer;
use std::path::{Path, PathBuf};

use crate::daily_performance::{GroupPerformance, PerformanceTable};
use crate::performance::PerformanceWindow;

const HEADERS: [&str; 9] = [
    "Name",
    "Ticker",
    "Latest Price",
    "Daily",
    "Weekly",
    "Monthly",
    "YTD",
    "1 Year",
    "3 Years",
];

/// Raw fraction, or empty if not available
fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map(|r| r.to_string()).unwrap_or_default()
}

pub fn write_table<W: std::io::Write>(writer: W, table: &PerformanceTable) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(HEADERS)?;

    for record in table.iter() {
        let mut row = vec![
            record.name.clone(),
            record.ticker.clone(),
            record.latest_price.to_string(),
        ];
        row.extend(
            PerformanceWindow::ALL
                .iter()
                .map(|&w| format_ratio(record.window(w))),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes `performance_<group>_<date>.csv` for every group into `dir`.
pub fn export_groups(
    dir: &Path,
    date: NaiveDate,
    groups: &[GroupPerformance],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(groups.len());
    for group in groups {
        let filename = format!(
            "performance_{}_{}.csv",
            group.name.to_lowercase(),
            date.format("%Y-%m-%d")
        );
        let path = dir.join(filename);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_table(file, &group.table)?;

        tracing::info!("✅ {} records written to {}", group.table.len(), path.display());
        written.push(path);
    }

    Ok(written)
}
