//! Gemini REST client.
//!
//! Speaks the `generateContent` endpoint directly over reqwest. This is
//! the single classification boundary for provider errors: HTTP status
//! lines and quota markers are inspected here, once, and converted into
//! structured [`GeminiErrorKind`] variants. Retry logic downstream
//! dispatches on the variant, never on message text.

use crate::gemini::wire::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Tool,
};
use crate::{ImageModel, ImageRequest, InlineImage, TextModel, TextRequest};
use async_trait::async_trait;
use calliope_error::{CalliopeResult, GeminiError, GeminiErrorKind};
use std::env;
use tracing::{debug, instrument};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model for text and JSON generation.
const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default model for image generation.
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Client for the Google Gemini REST API.
///
/// # Examples
///
/// ```no_run
/// use calliope_models::{GeminiClient, TextModel, TextRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClient::new()?;
/// let request = TextRequest::new("Name three coffee brewing methods.");
/// let text = client.generate(&request).await?;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with default models.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable;
    /// a missing key fails before any call is attempted.
    #[instrument(name = "gemini_client_new")]
    pub fn new() -> CalliopeResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        Ok(Self::with_key(api_key))
    }

    /// Create a client with an explicit API key.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Override the default text model.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Override the default image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// POST a request body to `{model}:generateContent` and parse the
    /// response, classifying failures.
    async fn post(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{API_BASE}/{model}:generateContent");
        debug!(model, "Sending generateContent request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::Transport(e.to_string())))?;

        if !status.is_success() {
            return Err(GeminiError::new(Self::classify_failure(
                status.as_u16(),
                &text,
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))
    }

    /// Classify a non-success HTTP response into a structured kind.
    ///
    /// HTTP 429 and provider quota markers ("RESOURCE_EXHAUSTED",
    /// "quota", "limit") mean rate limiting; everything else keeps its
    /// status code.
    fn classify_failure(status_code: u16, body: &str) -> GeminiErrorKind {
        if status_code == 429 || Self::has_quota_marker(body) {
            GeminiErrorKind::RateLimited {
                status_code: Some(status_code),
                message: body.chars().take(200).collect(),
            }
        } else {
            GeminiErrorKind::HttpStatus {
                status_code,
                message: body.chars().take(200).collect(),
            }
        }
    }

    fn has_quota_marker(body: &str) -> bool {
        let lower = body.to_lowercase();
        lower.contains("resource_exhausted") || lower.contains("quota") || lower.contains("limit")
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    #[instrument(skip(self, req), fields(json = req.json_response, search = req.web_search))]
    async fn generate(&self, req: &TextRequest) -> CalliopeResult<String> {
        let model = req.model.as_deref().unwrap_or(&self.text_model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(&req.instruction)],
            }],
            tools: req.web_search.then(|| vec![Tool::google_search()]),
            generation_config: req.json_response.then(|| GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_modalities: None,
            }),
        };

        let response = self.post(model, &body).await?;
        let text = response.text();
        if text.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::EmptyResponse).into());
        }
        Ok(text)
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    #[instrument(skip(self, req), fields(has_reference = req.reference.is_some()))]
    async fn generate_image(&self, req: &ImageRequest) -> CalliopeResult<InlineImage> {
        let model = req.model.as_deref().unwrap_or(&self.image_model);

        // Reference image rides ahead of the directive text
        let mut parts = Vec::new();
        if let Some(reference) = &req.reference {
            parts.push(Part::inline(reference.mime().clone(), reference.to_base64()));
        }
        parts.push(Part::text(&req.directive));

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            tools: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            }),
        };

        let response = self.post(model, &body).await?;
        let inline = response
            .first_inline()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::NoImageData))?;

        Ok(InlineImage {
            mime: inline.mime_type.clone(),
            data_base64: inline.data.clone(),
        })
    }
}
