use crate::error::Result;
use serde::Serialize;
use slog::{info, o, Logger};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Serialize)]
struct WebhookMessage {
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<WebhookAttachment>,
}

#[derive(Serialize)]
struct WebhookAttachment {
    fallback: String,
    text: String,
    // tells the receiver to apply markdown formatting to the text
    mrkdwn_in: Vec<String>,
}

/// posts notifications to per-channel webhook URLs
pub struct Alerter {
    urls: Mutex<HashMap<String, String>>,
    client: reqwest::blocking::Client,
    logger: Logger,
}

impl Alerter {
    pub fn new() -> Alerter {
        Self::with_logger(Logger::root(slog::Discard, o!()))
    }

    pub fn with_logger(logger: Logger) -> Alerter {
        Alerter {
            urls: Mutex::new(HashMap::new()),
            client: reqwest::blocking::Client::new(),
            logger,
        }
    }

    pub fn set_channel_url(&self, channel: &str, url: &str) {
        let mut urls = self.urls.lock().expect("alerter lock poisoned");
        urls.insert(channel.to_string(), url.to_string());
    }

    /// sends a message to the channel's webhook, with an optional attachment
    /// rendered as a fenced code block. A channel without a configured URL is
    /// skipped with a log line rather than treated as an error.
    pub fn notify(&self, channel: &str, message: &str, attachment: Option<&str>) -> Result<()> {
        let url = {
            let urls = self.urls.lock().expect("alerter lock poisoned");
            urls.get(channel).cloned()
        };
        let url = match url {
            Some(url) => url,
            None => {
                info!(self.logger, "no webhook url set for channel {}", channel);
                return Ok(());
            }
        };

        let payload = build_message(message, attachment);
        let response = self.client.post(&url).json(&payload).send()?;
        response.error_for_status()?;
        Ok(())
    }
}

impl Default for Alerter {
    fn default() -> Self {
        Alerter::new()
    }
}

fn build_message(message: &str, attachment: Option<&str>) -> WebhookMessage {
    let mut attachments = Vec::new();
    if let Some(attachment) = attachment {
        attachments.push(WebhookAttachment {
            fallback: "attachment cannot be displayed".to_string(),
            text: format!("```{}```", attachment),
            mrkdwn_in: vec!["text".to_string()],
        });
    }

    WebhookMessage {
        text: message.to_string(),
        attachments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_message_has_no_attachments_field() {
        let payload = serde_json::to_value(build_message("hello", None)).unwrap();
        assert_eq!(payload, json!({ "text": "hello" }));
    }

    #[test]
    fn attachment_is_fenced_and_marked_down() {
        let payload = serde_json::to_value(build_message("oops", Some("stack trace"))).unwrap();
        assert_eq!(payload["text"], "oops");
        assert_eq!(payload["attachments"][0]["text"], "```stack trace```");
        assert_eq!(payload["attachments"][0]["mrkdwn_in"][0], "text");
    }

    #[test]
    fn unconfigured_channel_is_not_an_error() {
        let alerter = Alerter::new();
        assert!(alerter.notify("ops", "ping", None).is_ok());
    }
}
