use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when handing a message to the mail API
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Mail API returned error: {0}")]
    ApiError(String),
}

/// An outbound plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Something that can deliver an [`Email`]
///
/// Callers treat delivery as best-effort: a failure is logged by the caller
/// and never undoes the action that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Payload accepted by the transactional mail API
#[derive(Debug, Serialize)]
struct SendMailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Mail API client
///
/// Posts JSON messages to an HTTP mail provider authenticated with a bearer key.
pub struct HttpMailer {
    endpoint: String,
    api_key: String,
    sender: String,
    client: Client,
}

impl HttpMailer {
    pub fn new(
        endpoint: String,
        api_key: String,
        sender: String,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key,
            sender,
            client,
        })
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let payload = SendMailPayload {
            from: &self.sender,
            to: [&email.to],
            subject: &email.subject,
            text: &email.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::ApiError(format!("{}: {}", status, body)));
        }

        tracing::debug!("Sent email to {}: {}", email.to, email.subject);

        Ok(())
    }
}

/// Used when no mail provider is configured; messages are logged and dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Notifier for DisabledMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!("Mail disabled, skipping email to {}: {}", email.to, email.subject);
        Ok(())
    }
}

/// Email telling a receiver their request was accepted
pub fn acceptance_email(receiver_email: &str, receiver_name: &str, donor_name: &str) -> Email {
    Email {
        to: receiver_email.to_string(),
        subject: "Your Blood Request has been Accepted! - Arogya Deeksha".to_string(),
        body: format!(
            "Dear {},\n\n\
             Great news! Your request for blood has been accepted by donor {}.\n\n\
             Please coordinate with them for the next steps.\n\n\
             Thank you,\n\
             Arogya Deeksha Team\n",
            receiver_name, donor_name
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(url: String) -> HttpMailer {
        HttpMailer::new(
            url,
            "test-key".to_string(),
            "noreply@example.com".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_acceptance_email() {
        let email = acceptance_email("meera@example.com", "Meera", "Ravi");
        assert_eq!(email.to, "meera@example.com");
        assert!(email.subject.contains("Accepted"));
        assert!(email.body.starts_with("Dear Meera,"));
        assert!(email.body.contains("accepted by donor Ravi"));
    }

    #[tokio::test]
    async fn test_http_mailer_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send")
            .match_header("authorization", "Bearer test-key")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "from": "noreply@example.com",
                "to": ["meera@example.com"],
                "subject": "Hello",
            })))
            .with_status(202)
            .create_async()
            .await;

        let email = Email {
            to: "meera@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
        };
        mailer(format!("{}/send", server.url())).send(&email).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_mailer_reports_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send")
            .with_status(500)
            .with_body("provider down")
            .create_async()
            .await;

        let email = acceptance_email("meera@example.com", "Meera", "Ravi");
        let err = mailer(format!("{}/send", server.url())).send(&email).await.unwrap_err();

        match err {
            MailError::ApiError(message) => assert!(message.contains("provider down")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_disabled_mailer_succeeds() {
        let email = acceptance_email("meera@example.com", "Meera", "Ravi");
        assert!(DisabledMailer.send(&email).await.is_ok());
    }
}
