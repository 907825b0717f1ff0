// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::ConfigError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Ticker groups reported on, one email section each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub market: Vec<String>,
    pub portfolio: Vec<String>,
    pub watchlist: Vec<String>,
}

/// A named list of tickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerGroup {
    pub name: String,
    pub tickers: Vec<String>,
}

fn tickers(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market: tickers(&[
                "^GSPC", "^DJI", "^IXIC", "BZ=F", "GC=F", "^TNX", "BTC-USD", "ETH-USD",
            ]),
            portfolio: tickers(&[
                "AMD", "AAPL", "MSFT", "TSLA", "IVV", "BABA", "5106.KL", "5168.KL", "7160.KL",
                "5211PA.KL", "5292.KL",
            ]),
            watchlist: tickers(&[
                "AMZN", "GOOG", "NVDA", "ARM", "MU", "SNOW", "QCOM", "META", "V", "D05.SI",
                "O39.SI", "U11.SI", "373220.KS", "096770.KS", "6752.T", "002594.SZ",
            ]),
        }
    }
}

impl Config {
    /// Groups in report order.
    pub fn groups(&self) -> Vec<TickerGroup> {
        vec![
            TickerGroup {
                name: "Market".to_string(),
                tickers: self.market.clone(),
            },
            TickerGroup {
                name: "Portfolio".to_string(),
                tickers: self.portfolio.clone(),
            },
            TickerGroup {
                name: "Watchlist".to_string(),
                tickers: self.watchlist.clone(),
            },
        ]
    }
}

/// Reads the groups from `path`, falling back to the built-in groups when
/// the file does not exist. A file that exists but does not parse is an error.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                "No config file at {}, using built-in ticker groups",
                path.display()
            );
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            });
        }
    };

    toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Mail settings, validated once before a run starts.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: Mailbox,
    pub password: String,
    pub recipient: Mailbox,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl MailConfig {
    pub fn new(sender: &str, password: &str, recipient: &str) -> Result<Self, ConfigError> {
        if password.is_empty() {
            return Err(ConfigError::Empty("EMAIL_PASS"));
        }

        Ok(Self {
            sender: parse_mailbox("EMAIL_USER", sender)?,
            password: password.to_string(),
            recipient: parse_mailbox("EMAIL_RECEIVE", recipient)?,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from any key/value source shaped like the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::MissingVar(key));

        let mut config = Self::new(
            &required("EMAIL_USER")?,
            &required("EMAIL_PASS")?,
            &required("EMAIL_RECEIVE")?,
        )?;

        if let Some(host) = lookup("SMTP_HOST").filter(|h| !h.is_empty()) {
            config.smtp_host = host;
        }
        if let Some(port) = lookup("SMTP_PORT").filter(|p| !p.is_empty()) {
            config.smtp_port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        Ok(config)
    }
}

fn parse_mailbox(field: &'static str, address: &str) -> Result<Mailbox, ConfigError> {
    if address.trim().is_empty() {
        return Err(ConfigError::Empty(field));
    }
    address
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddress { field, source })
}
