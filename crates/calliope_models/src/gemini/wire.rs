//! Wire types for the `generateContent` endpoint.
//!
//! Hand-rolled serde models for the subset of the Gemini REST protocol
//! this planner uses: text parts, inline image data in both directions,
//! a JSON response mime type, response modalities, and the google-search
//! tool.

use serde::{Deserialize, Serialize};

/// Top-level request body.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerateContentRequest {
    /// Ordered conversation contents (a single user turn here)
    pub contents: Vec<Content>,
    /// Optional tool directives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    /// Optional generation configuration
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One conversation turn: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    /// Turn role; omitted on responses from some models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One message part: text or inline binary data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    /// Text payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary payload
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    /// Text-only part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Inline-data part.
    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded binary payload plus its mime type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type, e.g. "image/png"
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Tool directive attached to a request.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    /// Google-search grounding tool
    #[serde(rename = "googleSearch", skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

impl Tool {
    /// The google-search grounding tool.
    pub fn google_search() -> Self {
        Self {
            google_search: Some(GoogleSearch {}),
        }
    }
}

/// Empty marker object enabling google-search grounding.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

/// Generation configuration subset.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GenerationConfig {
    /// Response mime type; "application/json" forces a JSON payload
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Response modalities; image models need ["TEXT", "IMAGE"]
    #[serde(rename = "responseModalities", skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

/// Top-level response body.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateContentResponse {
    /// Response candidates; the first is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's text parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }

    /// First inline-data part of the first candidate, if any.
    pub fn first_inline(&self) -> Option<&InlineData> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()))
    }
}

/// One response candidate.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text("hello")],
            }],
            tools: Some(vec![Tool::google_search()]),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_modalities: None,
            }),
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\""));
        assert!(json.contains("\"googleSearch\""));
        assert!(!json.contains("inlineData"));
    }

    #[test]
    fn response_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Hello, "},
                        {"text": "world"}
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), "Hello, world");
    }

    #[test]
    fn response_finds_first_inline_image() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let inline = response.first_inline().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "aGVsbG8=");
    }

    #[test]
    fn empty_response_yields_empty_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_empty());
        assert!(response.first_inline().is_none());
    }
}
