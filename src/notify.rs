//! Asynchronous budget alert delivery.
//!
//! The transaction write path enqueues [`AlertMessage`]s through a
//! [`NotificationSender`] and returns immediately; a spawned worker task
//! drains the queue and delivers each message over SMTP. Transport failures
//! are retried up to [`MAX_RETRIES`] additional times with a fixed delay
//! between attempts; exhaustion is logged as a dead-letter, never surfaced
//! to the originating request. Concurrent writes for the same user may both
//! enqueue a message for the same exceeded budget; delivery is
//! at-least-once by design.

use crate::{
    config::settings::NotificationSettings,
    core::budget::BudgetAlert,
    errors::{Error, Result},
};
use lettre::{
    Message, SmtpTransport, Transport,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Additional delivery attempts after the first failure.
pub const MAX_RETRIES: u32 = 3;

/// Fixed delay between delivery attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// One queued alert notification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlertMessage {
    /// Contact address the alert is delivered to
    pub recipient: String,
    /// Name the message greets the user by
    pub display_name: String,
    /// The full alert payload
    pub alert: BudgetAlert,
}

/// Formats the subject line for an exceeded-budget alert.
#[must_use]
pub fn format_subject(alert: &BudgetAlert) -> String {
    format!("Budget Alert: {} limit exceeded", alert.category)
}

/// Formats the plain-text message body.
#[must_use]
pub fn format_body(display_name: &str, alert: &BudgetAlert) -> String {
    use std::fmt::Write;

    let mut body = format!("Hi {display_name},\n\n");

    // write! is infallible when writing to String, so unwrap is safe
    write!(
        body,
        "You have exceeded your {} budget limit for category \"{}\".\n\n",
        alert.period.to_lowercase(),
        alert.category
    )
    .unwrap();
    writeln!(body, "  Spent:  {:.2}", alert.spent).unwrap();
    writeln!(body, "  Limit:  {:.2}", alert.limit).unwrap();
    writeln!(body, "  Usage:  {}%", alert.percentage).unwrap();
    body.push_str("\nConsider reviewing your expenses.\n\n- PocketLedger");

    body
}

/// Delivery seam for alert messages, so the retry loop can be exercised
/// without a live mail server.
pub trait AlertTransport: Send + Sync {
    /// Attempts one delivery. Any error is treated as transient by the
    /// worker until its retry budget runs out.
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// SMTP delivery via lettre, authenticated against a relay.
pub struct SmtpAlertTransport {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpAlertTransport {
    /// Builds a relay transport from the notification settings.
    pub fn new(settings: &NotificationSettings) -> Result<Self> {
        let from = settings
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| Error::Config {
                message: format!("Invalid from_email address: {e}"),
            })?;

        let transport = SmtpTransport::relay(&settings.smtp_server)
            .map_err(|e| Error::Config {
                message: format!("Failed to create SMTP relay: {e}"),
            })?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

impl AlertTransport for SmtpAlertTransport {
    fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let to = recipient.parse::<Mailbox>().map_err(|e| Error::Notification {
            message: format!("Invalid recipient address: {e}"),
        })?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| Error::Notification {
                message: format!("Failed to build email: {e}"),
            })?;

        self.transport.send(&email).map_err(|e| Error::Notification {
            message: format!("SMTP send failed: {e}"),
        })?;

        Ok(())
    }
}

/// Cloneable handle for enqueueing alert messages from the write path.
#[derive(Clone)]
pub struct NotificationSender {
    tx: mpsc::UnboundedSender<AlertMessage>,
}

impl NotificationSender {
    /// Hands a message to the worker. Fire-and-forget: if the worker is
    /// gone the message is dropped with a warning, the triggering write is
    /// never affected.
    pub fn enqueue(&self, message: AlertMessage) {
        if self.tx.send(message).is_err() {
            warn!("notification worker has shut down; dropping alert message");
        }
    }
}

/// Creates a sender/receiver pair without spawning a worker. The caller
/// owns the receiving half and can drain it however it likes; used for
/// wiring custom consumers and for asserting on enqueued messages in tests.
#[must_use]
pub fn channel() -> (NotificationSender, mpsc::UnboundedReceiver<AlertMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NotificationSender { tx }, rx)
}

/// Spawns the delivery worker and returns the sender half of its queue.
pub fn spawn_worker(
    transport: Arc<dyn AlertTransport>,
    retry_delay: Duration,
) -> NotificationSender {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(run_worker(rx, transport, retry_delay));
    NotificationSender { tx }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<AlertMessage>,
    transport: Arc<dyn AlertTransport>,
    retry_delay: Duration,
) {
    info!("notification worker started");
    while let Some(message) = rx.recv().await {
        deliver(transport.as_ref(), &message, retry_delay).await;
    }
    info!("notification worker stopped");
}

async fn deliver(transport: &dyn AlertTransport, message: &AlertMessage, retry_delay: Duration) {
    let subject = format_subject(&message.alert);
    let body = format_body(&message.display_name, &message.alert);

    let mut attempt = 0;
    loop {
        match transport.send(&message.recipient, &subject, &body) {
            Ok(()) => {
                info!(
                    recipient = %message.recipient,
                    category = %message.alert.category,
                    "budget alert email sent"
                );
                return;
            }
            Err(err) if attempt < MAX_RETRIES => {
                attempt += 1;
                warn!(
                    recipient = %message.recipient,
                    %err,
                    attempt,
                    "alert delivery failed, will retry"
                );
                tokio::time::sleep(retry_delay).await;
            }
            Err(err) => {
                error!(
                    recipient = %message.recipient,
                    category = %message.alert.category,
                    %err,
                    "alert delivery failed after {MAX_RETRIES} retries, dropping message"
                );
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_alert() -> BudgetAlert {
        BudgetAlert {
            category: "Food".to_string(),
            spent: dec("150.00"),
            limit: dec("100.00"),
            period: "Monthly".to_string(),
            percentage: dec("150.0"),
            is_warning: true,
            is_exceeded: true,
        }
    }

    fn sample_message() -> AlertMessage {
        AlertMessage {
            recipient: "user@example.com".to_string(),
            display_name: "testuser".to_string(),
            alert: sample_alert(),
        }
    }

    /// Fails the first `failures` attempts, then succeeds.
    struct FlakyTransport {
        failures: usize,
        attempts: AtomicUsize,
    }

    impl FlakyTransport {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                attempts: AtomicUsize::new(0),
            }
        }
    }

    impl AlertTransport for FlakyTransport {
        fn send(&self, _recipient: &str, _subject: &str, _body: &str) -> Result<()> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(Error::Notification {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_message_format_names_all_fields() {
        let alert = sample_alert();
        let subject = format_subject(&alert);
        assert_eq!(subject, "Budget Alert: Food limit exceeded");

        let body = format_body("testuser", &alert);
        assert!(body.contains("Hi testuser"));
        assert!(body.contains("monthly budget limit"));
        assert!(body.contains("\"Food\""));
        assert!(body.contains("150.00"));
        assert!(body.contains("100.00"));
        assert!(body.contains("150.0%"));
    }

    #[tokio::test]
    async fn test_delivery_succeeds_first_try() {
        let transport = FlakyTransport::new(0);
        deliver(&transport, &sample_message(), Duration::from_millis(1)).await;
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delivery_retries_transient_failures() {
        let transport = FlakyTransport::new(2);
        deliver(&transport, &sample_message(), Duration::from_millis(1)).await;
        // Two failures, then success on the third attempt.
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_delivery_gives_up_after_retry_budget() {
        let transport = FlakyTransport::new(usize::MAX);
        deliver(&transport, &sample_message(), Duration::from_millis(1)).await;
        // Initial attempt plus MAX_RETRIES retries.
        assert_eq!(
            transport.attempts.load(Ordering::SeqCst),
            1 + MAX_RETRIES as usize
        );
    }

    #[tokio::test]
    async fn test_worker_drains_queue_in_background() {
        let transport = Arc::new(FlakyTransport::new(0));
        let sender = spawn_worker(
            Arc::<FlakyTransport>::clone(&transport),
            Duration::from_millis(1),
        );

        sender.enqueue(sample_message());
        sender.enqueue(sample_message());

        for _ in 0..100 {
            if transport.attempts.load(Ordering::SeqCst) == 2 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("worker did not deliver both messages in time");
    }
}
