//! Simulated stakeholder notices for a calculation outcome.
//!
//! Nothing leaves the process: the dispatcher validates the recipient,
//! prepares email and SMS content, and records what would have been sent.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use crate::api::CalculationResult;
use crate::format::format_currency;

pub const SMS_LIMIT: usize = 160;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeContent {
    pub email_subject: String,
    pub email_body: String,
    pub sms_message: String,
}

impl NoticeContent {
    pub fn prepare(result: &CalculationResult, recipient: &Recipient, at: DateTime<Local>) -> Self {
        let delay = result.delay_minutes();
        let penalty = result.penalty_amount();
        let amount = format_currency(penalty);
        let rule = &result.calculation_result.rule_applied;

        let (email_subject, sms_message) = if penalty > 0.0 {
            (
                format!("Penalty Notice: {amount} for {delay}min Delay"),
                format!("AI-BOS: {delay}min delay. Penalty: {amount}. Check email for details."),
            )
        } else {
            (
                format!("Delay Notification: {delay}min Delay - No Penalty"),
                format!("AI-BOS: {delay}min delay recorded. No penalty applied. Details in email."),
            )
        };

        let email_body = format!(
            "AI-BOS Notification\n\
             Recipient: {}\n\
             Date: {}\n\n\
             Delay Duration: {delay} minutes\n\
             Rule Applied: {rule}\n\
             Penalty Amount: {amount}\n\
             Reference: {}\n\n\
             This delay has been recorded in our SLA monitoring system.",
            recipient.name.as_deref().unwrap_or("Valued Partner"),
            at.format("%d %B, %Y %H:%M"),
            result.request_id,
        );

        Self {
            email_subject,
            email_body,
            sms_message: truncate_sms(&sms_message),
        }
    }
}

fn truncate_sms(message: &str) -> String {
    if message.chars().count() <= SMS_LIMIT {
        return message.to_string();
    }
    let kept: String = message.chars().take(SMS_LIMIT - 3).collect();
    format!("{kept}...")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeReceipt {
    pub notice_id: String,
    pub email_sent: bool,
    pub sms_sent: bool,
    pub sent_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoticeError {
    #[error("no email or phone provided for the notice")]
    NoRecipient,
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
    #[error("invalid phone number '{0}'")]
    InvalidPhone(String),
    #[error("notice dispatch unavailable: {0}")]
    Unavailable(String),
}

pub trait NoticeDispatcher {
    fn dispatch(
        &self,
        recipient: &Recipient,
        content: &NoticeContent,
        at: DateTime<Local>,
    ) -> Result<NoticeReceipt, NoticeError>;
}

/// What a simulated dispatch would have delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeRecord {
    pub receipt: NoticeReceipt,
    pub recipient: Recipient,
    pub content: NoticeContent,
}

#[derive(Debug, Default, Clone)]
pub struct SimulatedDispatcher {
    log: Arc<Mutex<Vec<NoticeRecord>>>,
}

impl SimulatedDispatcher {
    pub fn records(&self) -> Vec<NoticeRecord> {
        self.log
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl NoticeDispatcher for SimulatedDispatcher {
    fn dispatch(
        &self,
        recipient: &Recipient,
        content: &NoticeContent,
        at: DateTime<Local>,
    ) -> Result<NoticeReceipt, NoticeError> {
        let email = recipient.email.as_deref().map(str::trim);
        let phone = recipient.phone.as_deref().map(str::trim);

        if email.is_none() && phone.is_none() {
            return Err(NoticeError::NoRecipient);
        }
        if let Some(email) = email.filter(|email| !valid_email(email)) {
            return Err(NoticeError::InvalidEmail(email.to_string()));
        }
        if let Some(phone) = phone.filter(|phone| !valid_phone(phone)) {
            return Err(NoticeError::InvalidPhone(phone.to_string()));
        }

        let receipt = NoticeReceipt {
            notice_id: format!("NOTICE_{}", at.format("%Y%m%d_%H%M%S")),
            email_sent: email.is_some(),
            sms_sent: phone.is_some(),
            sent_at: at.to_rfc3339(),
        };
        info!(
            notice_id = %receipt.notice_id,
            email = receipt.email_sent,
            sms = receipt.sms_sent,
            "simulated notice dispatched"
        );

        let mut guard = self
            .log
            .lock()
            .map_err(|_| NoticeError::Unavailable("notice log poisoned".to_string()))?;
        guard.push(NoticeRecord {
            receipt: receipt.clone(),
            recipient: recipient.clone(),
            content: content.clone(),
        });
        Ok(receipt)
    }
}

fn valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

fn valid_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InputData, PenaltyOutcome};
    use chrono::TimeZone;

    fn result(delay: u32, penalty: f64) -> CalculationResult {
        CalculationResult {
            request_id: "req-n".to_string(),
            timestamp: "2026-10-18T10:00:00".to_string(),
            input_data: InputData {
                delay_minutes: delay,
                service_type: None,
                contract_id: None,
            },
            calculation_result: PenaltyOutcome {
                penalty_applied: penalty > 0.0,
                penalty_amount: penalty,
                rule_applied: "fixed_penalty_rule".to_string(),
                rule_description: None,
                calculation_breakdown: None,
                threshold_exceeded: penalty > 0.0,
                exceeded_by_minutes: 0,
                critical_delay: false,
                service_type: None,
            },
            ai_explanation: None,
            notifications_sent: false,
        }
    }

    fn at() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 10, 18, 14, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn penalty_notice_mentions_amount() {
        let content = NoticeContent::prepare(&result(45, 500.0), &Recipient::default(), at());
        assert_eq!(content.email_subject, "Penalty Notice: ₹500.00 for 45min Delay");
        assert!(content.sms_message.contains("Penalty: ₹500.00"));
        assert!(content.email_body.contains("Recipient: Valued Partner"));
    }

    #[test]
    fn no_penalty_notice_uses_compliance_wording() {
        let content = NoticeContent::prepare(&result(10, 0.0), &Recipient::default(), at());
        assert_eq!(
            content.email_subject,
            "Delay Notification: 10min Delay - No Penalty"
        );
    }

    #[test]
    fn long_sms_is_truncated() {
        let long = "x".repeat(200);
        let truncated = truncate_sms(&long);
        assert_eq!(truncated.chars().count(), SMS_LIMIT);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn dispatch_validates_channels() {
        let dispatcher = SimulatedDispatcher::default();
        let content = NoticeContent::prepare(&result(45, 500.0), &Recipient::default(), at());

        let err = dispatcher
            .dispatch(&Recipient::default(), &content, at())
            .expect_err("no channel");
        assert_eq!(err, NoticeError::NoRecipient);

        let bad_phone = Recipient {
            phone: Some("12345".to_string()),
            ..Recipient::default()
        };
        assert!(matches!(
            dispatcher.dispatch(&bad_phone, &content, at()),
            Err(NoticeError::InvalidPhone(_))
        ));

        let ok = Recipient {
            name: Some("Ops".to_string()),
            email: Some("ops@example.com".to_string()),
            phone: None,
        };
        let receipt = dispatcher.dispatch(&ok, &content, at()).expect("sent");
        assert_eq!(receipt.notice_id, "NOTICE_20261018_143000");
        assert!(receipt.email_sent);
        assert!(!receipt.sms_sent);
        assert_eq!(dispatcher.records().len(), 1);
    }
}
