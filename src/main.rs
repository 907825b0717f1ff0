// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use daily_insight::api::YahooClient;
use daily_insight::config::{self, MailConfig};
use daily_insight::daily_performance;
use daily_insight::logging::{self, LoggingConfig, TracingLog};
use daily_insight::mailer::SmtpMailer;
use daily_insight::performance_csv_writer;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ticker group configuration
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch all groups and email the report (default)
    Send,
    /// Fetch all groups and write the email HTML to a file instead of sending it
    Preview {
        #[arg(long, default_value = "output/daily_performance.html")]
        output: PathBuf,
    },
    /// Fetch all groups and write one CSV per group
    ExportCsv {
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// List the configured ticker groups
    ListGroups,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging(LoggingConfig::from_env())?;

    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;
    let groups = config.groups();
    let today = Local::now().date_naive();
    let log = TracingLog;

    match cli.command {
        None | Some(Commands::Send) => {
            // Validate mail settings before spending time on downloads.
            let mail_config = MailConfig::from_env().context("Invalid mail configuration")?;
            let mailer = SmtpMailer::new(mail_config);
            let provider = YahooClient::new()?;

            daily_performance::run_daily_report(&provider, &groups, &mailer, today, &log).await?;
        }
        Some(Commands::Preview { output }) => {
            let provider = YahooClient::new()?;
            let email = daily_performance::build_daily_report(&provider, &groups, today, &log).await?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &email.html_body)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✅ {} written to {}", email.subject, output.display());
        }
        Some(Commands::ExportCsv { output_dir }) => {
            let provider = YahooClient::new()?;
            let results = daily_performance::fetch_groups(&provider, &groups, today, &log).await;
            performance_csv_writer::export_groups(&output_dir, today, &results)?;
        }
        Some(Commands::ListGroups) => {
            for group in groups {
                println!("  {} ({} tickers)", group.name, group.tickers.len());
                println!("    Tickers: {}", group.tickers.join(", "));
                println!();
            }
        }
    }

    Ok(())
}
