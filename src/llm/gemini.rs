use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::media::detect_mime_type;

use super::{GenerationBackend, GenerationError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Detail used when the model returns neither an image nor any text parts.
pub const NO_FEEDBACK_PLACEHOLDER: &str = "No text or image feedback from API.";

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

/// One response part: either a text fragment or inline binary data tagged
/// with a media type. Scanning this union is how an image is pulled out of
/// a mixed response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

/// Gemini `generateContent` client. Holds the API key, model names and
/// tuning injected from [`Config`] at construction; no process-wide state.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    text_model: String,
    image_model: String,
    temperature: f32,
    top_k: i32,
    top_p: f32,
    max_output_tokens: i32,
}

impl GeminiClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(GeminiClient {
            http,
            api_key: config.gemini_api_key.clone(),
            text_model: config.gemini_text_model.clone(),
            image_model: config.gemini_image_model.clone(),
            temperature: config.gemini_temperature,
            top_k: config.gemini_top_k,
            top_p: config.gemini_top_p,
            max_output_tokens: config.gemini_max_output_tokens,
        })
    }

    /// The key travels in the request URL, so reqwest errors can embed it.
    fn redact_api_key(&self, text: &str) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, "[redacted]")
    }

    fn text_payload(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "topK": self.top_k,
                "topP": self.top_p,
                "maxOutputTokens": self.max_output_tokens,
            },
        })
    }

    fn image_payload(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
            },
        })
    }

    /// One `generateContent` call, one attempt. Failures map straight to
    /// [`GenerationError`]; the dispatcher decides what to do with them.
    async fn generate_content(
        &self,
        model: &str,
        payload: Value,
    ) -> Result<GeminiResponse, GenerationError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent?key={}", self.api_key);

        let response = self.http.post(&url).json(&payload).send().await.map_err(|err| {
            let err_text = self.redact_api_key(&err.to_string());
            warn!(
                "Gemini request failed to send: {} (timeout={}, connect={}, status={:?})",
                err_text,
                err.is_timeout(),
                err.is_connect(),
                err.status()
            );
            GenerationError::Request(err_text)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            warn!("Gemini API error: status={}, body={}", status, body_summary);
            let detail = message.unwrap_or(body_summary);
            return Err(GenerationError::Api { status, detail });
        }

        let value = response
            .json::<GeminiResponse>()
            .await
            .map_err(|err| GenerationError::Request(self.redact_api_key(&err.to_string())))?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(target: "llm.gemini", model = model, response = %summarize_response(&value));
        }

        Ok(value)
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .generate_content(&self.text_model, self.text_payload(prompt))
            .await?;
        Ok(extract_text(response))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let response = self
            .generate_content(&self.image_model, self.image_payload(prompt))
            .await?;
        let (bytes, mime_type) = extract_image(response)?;

        let mime_type = Some(mime_type)
            .filter(|mime| mime.starts_with("image/"))
            .or_else(|| detect_mime_type(&bytes))
            .unwrap_or_else(|| "image/png".to_string());
        debug!(
            target: "llm.gemini",
            "Inline image part received: mime={}, bytes={}",
            mime_type,
            bytes.len()
        );

        Ok(bytes)
    }
}

/// Flatten every non-blank text part of every candidate, in order.
fn extract_text(response: GeminiResponse) -> String {
    let mut text_parts = Vec::new();
    for candidate in response.candidates.unwrap_or_default() {
        if let Some(content) = candidate.content {
            if let Some(parts) = content.parts {
                for part in parts {
                    if let GeminiPart::Text { text } = part {
                        if !text.trim().is_empty() {
                            text_parts.push(text);
                        }
                    }
                }
            }
        }
    }
    text_parts.join("\n")
}

/// Scan the first candidate's parts in order and decode the first inline
/// payload. When no part carries binary data the text parts become the
/// failure detail, newline-joined in their original order.
fn extract_image(response: GeminiResponse) -> Result<(Vec<u8>, String), GenerationError> {
    let parts = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .unwrap_or_default();

    let mut text_feedback = Vec::new();
    for part in parts {
        match part {
            GeminiPart::InlineData { inline_data } => {
                let bytes = general_purpose::STANDARD.decode(inline_data.data).map_err(|err| {
                    GenerationError::Request(format!("Invalid inline image payload: {err}"))
                })?;
                return Ok((bytes, inline_data.mime_type));
            }
            GeminiPart::Text { text } => text_feedback.push(text),
        }
    }

    let detail = if text_feedback.is_empty() {
        NO_FEEDBACK_PLACEHOLDER.to_string()
    } else {
        text_feedback.join("\n")
    };
    Err(GenerationError::ImageNotGenerated(detail))
}

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

/// Pull the upstream `error.message` out of a JSON error body when present,
/// falling back to a truncated copy of the body itself.
fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

fn summarize_response(response: &GeminiResponse) -> Value {
    let mut text_parts = 0usize;
    let mut image_parts = 0usize;
    let mut text_preview = None;

    let candidates = response.candidates.as_deref().unwrap_or(&[]);
    for candidate in candidates {
        if let Some(content) = &candidate.content {
            if let Some(parts) = &content.parts {
                for part in parts {
                    match part {
                        GeminiPart::Text { text } => {
                            text_parts += 1;
                            if text_preview.is_none() && !text.trim().is_empty() {
                                text_preview = Some(truncate_for_log(text, 200));
                            }
                        }
                        GeminiPart::InlineData { inline_data } => {
                            if inline_data.mime_type.starts_with("image/") {
                                image_parts += 1;
                            }
                        }
                    }
                }
            }
        }
    }

    json!({
        "candidates": candidates.len(),
        "textParts": text_parts,
        "imageParts": image_parts,
        "textPreview": text_preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_from_json(value: Value) -> GeminiResponse {
        serde_json::from_value(value).expect("parse response")
    }

    fn encoded(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn first_inline_part_wins_and_later_parts_are_ignored() {
        let response = response_from_json(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "no" },
                        { "text": "still no" },
                        { "inlineData": { "mimeType": "image/png", "data": encoded(b"first") } },
                        { "text": "ignored" },
                        { "inlineData": { "mimeType": "image/png", "data": encoded(b"second") } }
                    ]
                }
            }]
        }));

        let (bytes, mime_type) = extract_image(response).expect("image");
        assert_eq!(bytes, b"first");
        assert_eq!(mime_type, "image/png");
    }

    #[test]
    fn text_only_response_joins_parts_as_failure_detail() {
        let response = response_from_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "A" }, { "text": "B" }] }
            }]
        }));

        let err = extract_image(response).expect_err("no image");
        match err {
            GenerationError::ImageNotGenerated(detail) => assert_eq!(detail, "A\nB"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_response_uses_placeholder_detail() {
        let err = extract_image(response_from_json(json!({}))).expect_err("no image");
        match err {
            GenerationError::ImageNotGenerated(detail) => {
                assert_eq!(detail, NO_FEEDBACK_PLACEHOLDER);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_the_first_candidate_is_scanned_for_images() {
        let response = response_from_json(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "refused" }] } },
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": encoded(b"late") } }
                ] } }
            ]
        }));

        assert!(matches!(
            extract_image(response),
            Err(GenerationError::ImageNotGenerated(detail)) if detail == "refused"
        ));
    }

    #[test]
    fn text_extraction_flattens_candidates_and_skips_blanks() {
        let response = response_from_json(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Once upon a time" }, { "text": "   " }] } },
                { "content": { "parts": [{ "text": "the end." }] } }
            ]
        }));

        assert_eq!(extract_text(response), "Once upon a time\nthe end.");
    }

    #[test]
    fn error_body_summary_prefers_the_nested_message() {
        let (message, _) = summarize_error_body(
            r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#,
        );
        assert_eq!(message.as_deref(), Some("Quota exceeded"));

        let (message, summary) = summarize_error_body("plain text failure");
        assert_eq!(message, None);
        assert_eq!(summary, "plain text failure");
    }
}
