//! Outbound mail transports.

use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};

pub const BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";
pub const MAILPIT_API_URL: &str = "http://localhost:8025/api/v1/send";

const SENDER_NAME: &str = "GalleryPro";

/// A rendered message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Request(String),

    #[error("Mail API rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

pub trait Mailer: Clone + Send + Sync + 'static {
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), MailError>> + Send;
}

#[derive(Serialize)]
struct BrevoContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload {
    sender: BrevoContact,
    to: Vec<BrevoContact>,
    subject: String,
    html_content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MailpitContact {
    name: String,
    email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MailpitPayload {
    from: MailpitContact,
    to: Vec<MailpitContact>,
    subject: String,
    #[serde(rename = "HTML")]
    html: String,
}

#[derive(Debug, Clone)]
enum Transport {
    Brevo { api_key: String, url: String },
    Mailpit { url: String },
}

/// Sends mail through an HTTP mail API.
///
/// With an API key it talks to Brevo; without one it posts to a local Mailpit
/// instance so development never reaches real inboxes.
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    transport: Transport,
    from: String,
}

impl HttpMailer {
    pub fn new(from: impl Into<String>, api_key: Option<String>, api_url: Option<String>) -> Self {
        let transport = match api_key {
            Some(api_key) => Transport::Brevo {
                api_key,
                url: api_url.unwrap_or_else(|| BREVO_API_URL.to_owned()),
            },
            None => Transport::Mailpit {
                url: api_url.unwrap_or_else(|| MAILPIT_API_URL.to_owned()),
            },
        };

        Self {
            client: reqwest::Client::new(),
            transport,
            from: from.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match &self.transport {
            Transport::Brevo { url, .. } | Transport::Mailpit { url } => url,
        }
    }

    fn request(&self, mail: OutgoingMail) -> reqwest::RequestBuilder {
        match &self.transport {
            Transport::Brevo { api_key, url } => {
                let payload = BrevoPayload {
                    sender: BrevoContact {
                        name: Some(SENDER_NAME.to_owned()),
                        email: self.from.clone(),
                    },
                    to: vec![BrevoContact {
                        name: None,
                        email: mail.to,
                    }],
                    subject: mail.subject,
                    html_content: mail.html,
                };
                self.client
                    .post(url)
                    .header("api-key", api_key)
                    .json(&payload)
            }
            Transport::Mailpit { url } => {
                let payload = MailpitPayload {
                    from: MailpitContact {
                        name: SENDER_NAME.to_owned(),
                        email: self.from.clone(),
                    },
                    to: vec![MailpitContact {
                        name: String::new(),
                        email: mail.to,
                    }],
                    subject: mail.subject,
                    html: mail.html,
                };
                self.client.post(url).json(&payload)
            }
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let response = self
            .request(mail)
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Records messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("lock poisoned").clone()
    }
}

impl Mailer for MockMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Request("mock mailer configured to fail".to_owned()));
        }
        self.sent.lock().expect("lock poisoned").push(mail);
        Ok(())
    }
}
