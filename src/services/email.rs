//! Email service for guardian notifications

use chrono::NaiveDate;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    models::enums::FineType,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Notify a guardian that a loan was registered
    pub async fn send_loan_created(
        &self,
        to: &str,
        book_name: &str,
        loan_return: NaiveDate,
    ) -> AppResult<()> {
        self.send(to, "Book loan registered", &loan_created_body(book_name, loan_return))
            .await
    }

    /// Notify a guardian that a book came back, in good or bad condition
    pub async fn send_return_notice(
        &self,
        to: &str,
        student_name: &str,
        book_name: &str,
        bad_condition: bool,
    ) -> AppResult<()> {
        self.send(
            to,
            "Book returned",
            &return_notice_body(student_name, book_name, bad_condition),
        )
        .await
    }

    /// Notify a guardian that a fine was opened
    pub async fn send_fine_opened(
        &self,
        to: &str,
        amount: Decimal,
        expired_date: NaiveDate,
        fine_type: FineType,
    ) -> AppResult<()> {
        self.send(
            to,
            "A new fine has been registered",
            &fine_opened_body(amount, expired_date, fine_type),
        )
        .await
    }

    /// Notify a guardian that a loan is past its due date
    pub async fn send_loan_expired(
        &self,
        to: &str,
        guardian_name: &str,
        student_name: &str,
        book_name: &str,
        loan_date: NaiveDate,
    ) -> AppResult<()> {
        self.send(
            to,
            "Book loan expired",
            &loan_expired_body(guardian_name, student_name, book_name, loan_date),
        )
        .await
    }

    /// Warn a guardian that a loan is due back in a few days
    pub async fn send_return_alert(
        &self,
        to: &str,
        guardian_name: &str,
        student_name: &str,
        book_name: &str,
        days_left: i64,
    ) -> AppResult<()> {
        self.send(
            to,
            "Book return reminder",
            &return_alert_body(guardian_name, student_name, book_name, days_left),
        )
        .await
    }

    /// Generic email sending function
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("BibloSoft Notifications");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Email(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Email sent to {}", to);
        Ok(())
    }
}

const SIGNATURE: &str = "\
This is the BibloSoft notification engine.
Please do not reply to this address; messages are sent automatically.";

fn loan_created_body(book_name: &str, loan_return: NaiveDate) -> String {
    format!(
        r#"Good day,

A loan of the book "{}" has been registered for your ward.
The book is due back on {}.

{}"#,
        book_name,
        loan_return.format("%d/%m/%Y"),
        SIGNATURE
    )
}

fn return_notice_body(student_name: &str, book_name: &str, bad_condition: bool) -> String {
    let condition = if bad_condition {
        "The book was returned in bad condition; a damage fine may follow."
    } else {
        "The book was returned in good condition."
    };
    format!(
        r#"Good day,

Your ward, {}, has returned the book "{}".
{}

{}"#,
        student_name, book_name, condition, SIGNATURE
    )
}

fn fine_opened_body(amount: Decimal, expired_date: NaiveDate, fine_type: FineType) -> String {
    format!(
        r#"Good day,

A new fine has been registered: {}
Amount: {}
Date: {}

{}"#,
        fine_type.description(),
        amount,
        expired_date.format("%d/%m/%Y"),
        SIGNATURE
    )
}

fn loan_expired_body(
    guardian_name: &str,
    student_name: &str,
    book_name: &str,
    loan_date: NaiveDate,
) -> String {
    format!(
        r#"Good day, {}

Your ward, {}, borrowed the book "{}" on {} and it has not been
returned yet. Please arrange its return as soon as possible.

{}"#,
        guardian_name,
        student_name,
        book_name,
        loan_date.format("%d/%m/%Y"),
        SIGNATURE
    )
}

fn return_alert_body(
    guardian_name: &str,
    student_name: &str,
    book_name: &str,
    days_left: i64,
) -> String {
    format!(
        r#"Good day, {}

Your ward, {}, has {} days left to return the book "{}".
A fine will be opened if the book is not returned in time.

{}"#,
        guardian_name, student_name, days_left, book_name, SIGNATURE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_body_carries_amount_date_and_description() {
        let body = fine_opened_body(
            Decimal::new(5000, 1),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            FineType::Damage,
        );
        assert!(body.contains("500.0"));
        assert!(body.contains("15/03/2025"));
        assert!(body.contains(FineType::Damage.description()));
    }

    #[test]
    fn return_notice_distinguishes_condition() {
        let good = return_notice_body("Ana", "Boulevard", false);
        let bad = return_notice_body("Ana", "Boulevard", true);
        assert!(good.contains("good condition"));
        assert!(bad.contains("bad condition"));
        assert_ne!(good, bad);
    }

    #[test]
    fn alert_body_names_book_and_days() {
        let body = return_alert_body("Maria", "Luis", "El Principito", 3);
        assert!(body.contains("El Principito"));
        assert!(body.contains("3 days"));
    }
}
