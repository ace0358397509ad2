//! Contact form handling

use crate::error::{ApiError, Result};
use async_trait::async_trait;
use devfolio_database::{ContactMessage, ContactStats, ContactStatus, Database, NewContactMessage};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{error, info, warn};

const NAME_LEN: RangeInclusive<usize> = 2..=100;
const EMAIL_LEN: RangeInclusive<usize> = 5..=254;
const SUBJECT_LEN: RangeInclusive<usize> = 5..=200;
const MESSAGE_LEN: RangeInclusive<usize> = 10..=2000;

/// A contact form submission
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check every field's length in characters, reporting all violations at once
    pub fn validate(&self) -> Result<()> {
        let problems: Vec<String> = [
            ("name", &self.name, NAME_LEN),
            ("email", &self.email, EMAIL_LEN),
            ("subject", &self.subject, SUBJECT_LEN),
            ("message", &self.message, MESSAGE_LEN),
        ]
        .into_iter()
        .filter(|(_, value, range)| !range.contains(&value.chars().count()))
        .map(|(field, _, range)| {
            format!(
                "{} must be between {} and {} characters",
                field,
                range.start(),
                range.end()
            )
        })
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(problems.join("; ")))
        }
    }
}

/// Result of a submission as returned to the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub contact_id: Option<String>,
}

/// Tells someone a new message arrived
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether a notification was actually delivered
    async fn notify(&self, message: &ContactMessage) -> Result<bool>;
}

/// Notifier that writes new messages to the log for the configured admin
pub struct LogNotifier {
    admin_email: Option<String>,
}

impl LogNotifier {
    pub fn new(admin_email: Option<String>) -> Self {
        Self {
            admin_email: admin_email.filter(|e| !e.is_empty()),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &ContactMessage) -> Result<bool> {
        let Some(ref admin) = self.admin_email else {
            warn!("Admin address not configured, skipping contact notification");
            return Ok(false);
        };

        info!(
            to = %admin,
            id = %message.id,
            from = %message.email,
            subject = %message.subject,
            "New contact form message"
        );
        Ok(true)
    }
}

/// Stores contact messages and notifies on arrival
pub struct ContactService {
    db: Database,
    notifier: Arc<dyn Notifier>,
}

impl ContactService {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Persist a validated submission. Notification problems never fail it.
    pub async fn submit(&self, form: ContactForm, ip_address: Option<String>) -> ContactResponse {
        let new = NewContactMessage {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
            ip_address,
        };

        let stored = match self.db.insert_contact_message(new).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(error = %e, "Failed to store contact message");
                return ContactResponse {
                    success: false,
                    message: "There was an error sending your message. Please try again later."
                        .to_string(),
                    contact_id: None,
                };
            }
        };

        if let Err(e) = self.notifier.notify(&stored).await {
            error!(id = %stored.id, error = %e, "Contact notification failed");
        }

        info!(id = %stored.id, "Contact message received");
        ContactResponse {
            success: true,
            message: "Your message has been sent successfully! I'll get back to you soon."
                .to_string(),
            contact_id: Some(stored.id),
        }
    }

    /// Newest messages first
    pub async fn messages(&self, limit: i64, skip: i64) -> Vec<ContactMessage> {
        match self.db.get_contact_messages(limit.max(0), skip.max(0)).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(error = %e, "Failed to list contact messages");
                Vec::new()
            }
        }
    }

    pub async fn mark_read(&self, id: &str) -> bool {
        match self.db.set_contact_status(id, ContactStatus::Read).await {
            Ok(updated) => updated,
            Err(e) => {
                error!(id = id, error = %e, "Failed to mark message as read");
                false
            }
        }
    }

    pub async fn stats(&self) -> ContactStats {
        self.db.get_contact_stats().await.unwrap_or_else(|e| {
            error!(error = %e, "Failed to compute contact stats");
            ContactStats::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &ContactMessage) -> Result<bool> {
            if self.fail {
                return Err(ApiError::Internal("mail relay refused".to_string()));
            }
            self.seen.lock().unwrap().push(message.id.clone());
            Ok(true)
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello there".to_string(),
            message: "I would like to talk about a project.".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let mut short = form();
        short.name = "A".to_string();
        short.message = "too short".to_string();

        let err = short.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let text = err.to_string();
        assert!(text.contains("name"));
        assert!(text.contains("message"));
        assert!(!text.contains("subject"));

        let mut long = form();
        long.subject = "x".repeat(201);
        assert!(long.validate().is_err());

        let mut edge = form();
        edge.message = "x".repeat(2000);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_lengths_count_characters() {
        let mut accented = form();
        accented.name = "Zoë".to_string();
        accented.subject = "Olá!!".to_string();
        assert!(accented.validate().is_ok());
    }

    #[tokio::test]
    async fn test_submit_stores_and_notifies() {
        let db = Database::in_memory().await.unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let service = ContactService::new(db, notifier.clone());

        let response = service.submit(form(), Some("10.0.0.1".to_string())).await;

        assert!(response.success);
        let id = response.contact_id.unwrap();
        assert_eq!(*notifier.seen.lock().unwrap(), vec![id.clone()]);

        let stored = service.messages(50, 0).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].status, ContactStatus::New);
        assert_eq!(stored[0].ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_submission() {
        let db = Database::in_memory().await.unwrap();
        let notifier = Arc::new(RecordingNotifier {
            fail: true,
            ..Default::default()
        });
        let service = ContactService::new(db, notifier);

        let response = service.submit(form(), None).await;
        assert!(response.success);
        assert_eq!(service.stats().await.total_messages, 1);
    }

    #[tokio::test]
    async fn test_storage_failure_reports_apology() {
        let db = Database::in_memory().await.unwrap();
        db.pool().close().await;
        let service = ContactService::new(db, Arc::new(LogNotifier::new(None)));

        let response = service.submit(form(), None).await;

        assert!(!response.success);
        assert!(response.contact_id.is_none());
        assert!(service.messages(10, 0).await.is_empty());
        assert_eq!(service.stats().await, ContactStats::default());
        assert!(!service.mark_read("anything").await);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let db = Database::in_memory().await.unwrap();
        let service = ContactService::new(db, Arc::new(LogNotifier::new(None)));
        let id = service.submit(form(), None).await.contact_id.unwrap();

        assert!(service.mark_read(&id).await);
        assert!(!service.mark_read("missing").await);

        let stats = service.stats().await;
        assert_eq!(stats.new_messages, 0);
        assert_eq!(stats.read_messages, 1);
    }

    #[tokio::test]
    async fn test_log_notifier_needs_admin() {
        let db = Database::in_memory().await.unwrap();
        let stored = db
            .insert_contact_message(NewContactMessage {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                subject: "Hello there".to_string(),
                message: "Body of the message".to_string(),
                ip_address: None,
            })
            .await
            .unwrap();

        assert!(!LogNotifier::new(None).notify(&stored).await.unwrap());
        assert!(!LogNotifier::new(Some(String::new())).notify(&stored).await.unwrap());
        assert!(LogNotifier::new(Some("me@example.com".to_string()))
            .notify(&stored)
            .await
            .unwrap());
    }
}
