// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

/// Failures raised by a price/metadata provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// A ticker could not be turned into a performance record.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("price history unavailable: {0}")]
    History(#[source] ProviderError),

    #[error("price history is empty")]
    EmptyHistory,

    #[error("metadata unavailable: {0}")]
    Metadata(#[source] ProviderError),

    #[error("metadata has neither a long name nor a short name")]
    MissingName,
}

/// The report email could not be built or sent.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid email address in {field}: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("invalid SMTP_PORT '{0}'")]
    InvalidPort(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}
