use crate::config::{FormConfig, MailConfig};
use crate::domain::notification::{NotificationMessage, Transport};
use crate::domain::submission::SubmissionFields;
use crate::error::{AppError, Result};
use crate::services::delivery_service::{DeliveryOutcome, DeliveryService};
use opentelemetry::{KeyValue, global, metrics::Counter};

#[derive(Clone, Debug)]
struct Metrics {
    submissions: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            submissions: meter
                .u64_counter("contact_submissions_total")
                .with_description("Contact form submissions by result")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactService {
    delivery: DeliveryService,
    recipient: String,
    brand: String,
    max_message_chars: usize,
    metrics: Metrics,
}

impl ContactService {
    #[must_use]
    pub fn new(delivery: DeliveryService, mail: &MailConfig, form: &FormConfig) -> Self {
        Self {
            delivery,
            recipient: mail.recipient.clone(),
            brand: mail.brand.clone(),
            max_message_chars: form.max_message_chars,
            metrics: Metrics::new(),
        }
    }

    /// Validates a submission and notifies the owner.
    ///
    /// # Errors
    /// Returns `AppError::Validation` before any transport is touched if the submission is invalid,
    /// and `AppError::DeliveryFailed` if no transport delivered it.
    pub async fn submit(&self, fields: SubmissionFields) -> Result<Transport> {
        let submission = match fields.validate(self.max_message_chars) {
            Ok(submission) => submission,
            Err(e) => {
                self.metrics.submissions.add(1, &[KeyValue::new("result", "invalid")]);
                tracing::info!(reason = %e, "Submission rejected by validation");
                return Err(AppError::Validation(e));
            }
        };

        tracing::info!(company = %submission.company, "Submission validated");

        let message = NotificationMessage::from_submission(&submission, &self.recipient, &self.brand);

        match self.delivery.deliver(&message).await {
            DeliveryOutcome::Sent(transport) => {
                self.metrics.submissions.add(1, &[KeyValue::new("result", "sent")]);
                Ok(transport)
            }
            DeliveryOutcome::Failed(e) => {
                self.metrics.submissions.add(1, &[KeyValue::new("result", "failed")]);
                Err(AppError::DeliveryFailed(e))
            }
        }
    }
}
