// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use askama::Template;
use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};

use crate::config::MailConfig;
use crate::errors::{DeliveryError, ReportError};
use crate::report::ReportSection;

pub const SUBJECT_PREFIX: &str = "Daily Performance Insight";

/// A rendered report, ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEmail {
    pub subject: String,
    pub html_body: String,
}

#[derive(Template)]
#[template(path = "daily_email.html")]
struct DailyEmailTemplate {
    date: NaiveDate,
    sections: Vec<ReportSection>,
}

pub fn email_subject(date: NaiveDate) -> String {
    format!("{}_{}", SUBJECT_PREFIX, date.format("%Y-%m-%d"))
}

/// Lays out the dated email with one heading and table per section.
pub fn compose_report_email(
    date: NaiveDate,
    sections: &[ReportSection],
) -> Result<ReportEmail, ReportError> {
    let template = DailyEmailTemplate {
        date,
        sections: sections.to_vec(),
    };
    let html_body = template.render()?;

    Ok(ReportEmail {
        subject: email_subject(date),
        html_body,
    })
}

/// Delivery channel for the report.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, email: &ReportEmail) -> Result<(), DeliveryError>;
}

/// Sends the report over SMTP with implicit TLS, authenticated as the sender.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub fn build_message(&self, email: &ReportEmail) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(self.config.sender.clone())
            .to(self.config.recipient.clone())
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())?;

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, email: &ReportEmail) -> Result<(), DeliveryError> {
        let message = self.build_message(email)?;

        let credentials = Credentials::new(
            self.config.sender.email.to_string(),
            self.config.password.clone(),
        );

        tracing::debug!(
            "Connecting to SMTP server {}:{}",
            self.config.smtp_host,
            self.config.smtp_port
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        transport.send(message).await?;
        Ok(())
    }
}
