//! Fire-and-forget handoff of templated emails to an external delivery
//! service.
//!
//! The service renders the named template itself; this side only ships the
//! subject, recipients, template name, and a parameter map over HTTP. No
//! delivery confirmation is consumed, and a failed handoff is logged rather
//! than failing the request that triggered it.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub subject: String,
    pub to: Vec<String>,
    pub template: String,
    pub params: Value,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct DispatchBody<'a> {
    sender: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    template: &'a str,
    params: &'a Value,
}

/// Mail handoff handle, managed as Rocket state.
#[derive(Debug)]
pub struct Mailer {
    transport: Transport,
}

#[derive(Debug)]
enum Transport {
    Http {
        client: reqwest::Client,
        endpoint: String,
        api_key: String,
        sender: String,
    },
    /// No delivery service configured; messages are logged and dropped.
    Log,
    #[cfg(feature = "test-staging")]
    Capture(std::sync::Mutex<Vec<OutboundEmail>>),
}

fn env_nonempty(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

impl Mailer {
    /// Builds a mailer from `MAIL_API_URL`, `MAIL_API_KEY`, and
    /// `MAIL_SENDER`. With any of them missing the mailer degrades to
    /// log-only, which keeps development setups working without a
    /// delivery account.
    pub fn from_env() -> Self {
        let configured = (
            env_nonempty("MAIL_API_URL"),
            env_nonempty("MAIL_API_KEY"),
            env_nonempty("MAIL_SENDER"),
        );

        match configured {
            (Some(endpoint), Some(api_key), Some(sender)) => Mailer {
                transport: Transport::Http {
                    client: reqwest::Client::new(),
                    endpoint,
                    api_key,
                    sender,
                },
            },
            _ => {
                rocket::warn!("mail delivery not configured; emails will be logged only");
                Mailer {
                    transport: Transport::Log,
                }
            }
        }
    }

    /// A mailer that records every message in memory instead of sending.
    #[cfg(feature = "test-staging")]
    pub fn capturing() -> Self {
        Mailer {
            transport: Transport::Capture(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Messages recorded by a capturing mailer, oldest first.
    #[cfg(feature = "test-staging")]
    pub fn captured(&self) -> Vec<OutboundEmail> {
        match &self.transport {
            Transport::Capture(messages) => messages.lock().unwrap().clone(),
            _ => Vec::new(),
        }
    }

    /// Hands one email to the delivery service. Never fails the caller;
    /// transport errors are logged and swallowed.
    pub async fn send(&self, mail: OutboundEmail) {
        match &self.transport {
            Transport::Http {
                client,
                endpoint,
                api_key,
                sender,
            } => {
                let body = DispatchBody {
                    sender: Address { email: sender },
                    to: mail.to.iter().map(|email| Address { email }).collect(),
                    subject: &mail.subject,
                    template: &mail.template,
                    params: &mail.params,
                };

                let result = client
                    .post(endpoint)
                    .header("api-key", api_key)
                    .json(&body)
                    .send()
                    .await;

                match result {
                    Ok(response) if response.status().is_success() => {}
                    Ok(response) => {
                        rocket::error!(
                            "mail dispatch rejected (status={}) for template '{}'",
                            response.status(),
                            mail.template
                        );
                    }
                    Err(e) => {
                        rocket::error!(
                            "mail dispatch failed for template '{}': {}",
                            mail.template,
                            e
                        );
                    }
                }
            }
            Transport::Log => {
                rocket::info!(
                    "mail (unconfigured): '{}' to {:?} using template '{}'",
                    mail.subject,
                    mail.to,
                    mail.template
                );
            }
            #[cfg(feature = "test-staging")]
            Transport::Capture(messages) => {
                messages.lock().unwrap().push(mail);
            }
        }
    }
}

#[cfg(all(test, feature = "test-staging"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn capturing_mailer_records_messages_in_order() {
        let mailer = Mailer::capturing();
        mailer
            .send(OutboundEmail {
                subject: "first".to_string(),
                to: vec!["a@example.com".to_string()],
                template: "email_verification".to_string(),
                params: json!({"verification_code": "ABC123"}),
            })
            .await;
        mailer
            .send(OutboundEmail {
                subject: "second".to_string(),
                to: vec!["b@example.com".to_string()],
                template: "password_reset".to_string(),
                params: json!({}),
            })
            .await;

        let captured = mailer.captured();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].subject, "first");
        assert_eq!(captured[1].template, "password_reset");
    }
}
