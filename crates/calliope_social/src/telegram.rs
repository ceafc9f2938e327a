//! Telegram Bot API client.

use async_trait::async_trait;
use calliope_core::Post;
use calliope_error::{CalliopeResult, TelegramError, TelegramErrorKind};
use calliope_pipeline::Publisher;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, instrument};

const API_BASE: &str = "https://api.telegram.org";

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// `sendPhoto` request body.
#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: &'a str,
    photo: &'a str,
    caption: &'a str,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Client for publishing posts to a Telegram channel.
///
/// # Example
/// ```no_run
/// use calliope_social::TelegramClient;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TelegramClient::new()?;
/// # Ok(())
/// # }
/// ```
pub struct TelegramClient {
    http: reqwest::Client,
    token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a client from environment credentials.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHANNEL_ID`; a missing
    /// credential fails before any call is attempted.
    #[instrument(name = "telegram_client_new")]
    pub fn new() -> CalliopeResult<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| TelegramError::new(TelegramErrorKind::MissingToken))?;
        let chat_id = env::var("TELEGRAM_CHANNEL_ID")
            .map_err(|_| TelegramError::new(TelegramErrorKind::MissingChannel))?;
        Ok(Self::with_credentials(token, chat_id))
    }

    /// Create a client from explicit credentials.
    pub fn with_credentials(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    /// Render a post as channel message text.
    fn format_post(post: &Post) -> String {
        format!(
            "{title}\n\n{content}\n\n{date} · {kind}",
            title = post.title,
            content = post.content,
            date = post.date,
            kind = post.post_type,
        )
    }

    async fn call<B: Serialize>(&self, method: &str, body: &B) -> Result<(), TelegramError> {
        let response = self
            .http
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::new(TelegramErrorKind::Transport(e.to_string())))?;

        let envelope: ApiResponse = response
            .json()
            .await
            .map_err(|e| TelegramError::new(TelegramErrorKind::Transport(e.to_string())))?;

        if !envelope.ok {
            return Err(TelegramError::new(TelegramErrorKind::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            )));
        }
        Ok(())
    }

    /// Deliver one post.
    ///
    /// Posts whose image reference is an HTTP URL go out as a photo
    /// with caption; data URIs cannot be sent by reference, so those
    /// posts (and posts without an image) go out as plain messages.
    async fn send_post(&self, post: &Post) -> Result<(), TelegramError> {
        let text = Self::format_post(post);

        if post.image_url.starts_with("http") {
            self.call(
                "sendPhoto",
                &SendPhoto {
                    chat_id: &self.chat_id,
                    photo: &post.image_url,
                    caption: &text,
                },
            )
            .await
        } else {
            self.call(
                "sendMessage",
                &SendMessage {
                    chat_id: &self.chat_id,
                    text: &text,
                },
            )
            .await
        }
    }
}

#[async_trait]
impl Publisher for TelegramClient {
    #[instrument(skip(self, posts), fields(count = posts.len()))]
    async fn publish(&self, posts: &[Post]) -> CalliopeResult<()> {
        for post in posts {
            self.send_post(post).await?;
        }
        info!(count = posts.len(), "Published posts to channel");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliope_core::{PostStatus, PostType};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn post() -> Post {
        Post {
            id: Uuid::new_v4(),
            title: "Latte art basics".to_string(),
            post_type: PostType::Post,
            content: "Start with a smooth microfoam.".to_string(),
            script: None,
            day: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            image_prompt: "A latte".to_string(),
            image_url: String::new(),
            status: PostStatus::Approved,
            edit_count: 0,
        }
    }

    #[test]
    fn api_url_embeds_token_and_method() {
        let client = TelegramClient::with_credentials("123:abc", "@channel");
        assert_eq!(
            client.api_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn formatted_post_carries_title_body_and_date() {
        let text = TelegramClient::format_post(&post());
        assert!(text.starts_with("Latte art basics"));
        assert!(text.contains("microfoam"));
        assert!(text.contains("2025-06-01"));
    }

    #[test]
    fn send_photo_body_serializes_expected_fields() {
        let body = SendPhoto {
            chat_id: "@channel",
            photo: "https://picsum.photos/seed/ab/1024/1024",
            caption: "caption",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["chat_id"], "@channel");
        assert!(json["photo"].as_str().unwrap().starts_with("https://"));
    }
}
