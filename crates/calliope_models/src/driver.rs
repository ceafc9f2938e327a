//! Model driver traits and request types.
//!
//! The pipeline depends on these traits rather than on a concrete
//! client, so tests can substitute scripted fakes.

use async_trait::async_trait;
use calliope_core::ReferenceImage;
use calliope_error::CalliopeResult;

/// Request for one text/JSON generation call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextRequest {
    /// Free-text instruction for the model
    pub instruction: String,
    /// Model identifier override; the client default applies when None
    pub model: Option<String>,
    /// Ask the model to respond with a JSON payload
    pub json_response: bool,
    /// Enable the provider's web-search tool for grounding
    pub web_search: bool,
}

impl TextRequest {
    /// Plain text request with the given instruction.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            ..Self::default()
        }
    }

    /// Request a JSON-shaped response.
    pub fn with_json(mut self) -> Self {
        self.json_response = true;
        self
    }

    /// Enable web-search grounding.
    pub fn with_search(mut self) -> Self {
        self.web_search = true;
        self
    }
}

/// Request for one image generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// Directive text describing the desired visual
    pub directive: String,
    /// Optional reference image for palette/mood matching, sent as an
    /// inline part ahead of the directive
    pub reference: Option<ReferenceImage>,
    /// Model identifier override; the client default applies when None
    pub model: Option<String>,
}

impl ImageRequest {
    /// Image request with the given directive and no reference.
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            reference: None,
            model: None,
        }
    }
}

/// An inline image payload returned by the image model.
///
/// The payload stays base64-encoded; the only consumer embeds it into a
/// data URI, so decoding would be a wasted round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type of the image
    pub mime: String,
    /// Base64-encoded image bytes
    pub data_base64: String,
}

impl InlineImage {
    /// Render the payload as a data URI for direct display.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data_base64)
    }
}

/// A generative model that produces text (or JSON-shaped text).
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Execute one generation call and return the response text.
    ///
    /// An empty response is an error; callers never receive a blank
    /// payload.
    async fn generate(&self, req: &TextRequest) -> CalliopeResult<String>;
}

/// A generative model that produces images.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Execute one image call and return the first inline image payload.
    async fn generate_image(&self, req: &ImageRequest) -> CalliopeResult<InlineImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_embeds_mime_and_payload() {
        let image = InlineImage {
            mime: "image/png".to_string(),
            data_base64: "iVBORw0KGgo".to_string(),
        };
        assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo");
    }

    #[test]
    fn text_request_builders_compose() {
        let req = TextRequest::new("analyze").with_json().with_search();
        assert!(req.json_response);
        assert!(req.web_search);
        assert!(req.model.is_none());
    }
}
