//! Gemini REST client backing both provider ports.
//!
//! Text goes through `models/{model}:generateContent` with a JSON response
//! schema; images go through the Imagen `models/{model}:predict` endpoint.

use crate::core::prompts::{image_prompt, insights_instruction, insights_schema, TEXT_FIELDS};
use crate::domain::model::{Enrichment, GeneratedImage};
use crate::domain::ports::{ConfigProvider, ImageProvider, TextProvider};
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
    rai_filtered_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
            text_model: config.text_model().to_string(),
            image_model: config.image_model().to_string(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<T: DeserializeOwned>(&self, url: &str, body: &Value) -> Result<T> {
        // 沒有金鑰時不送出請求
        if self.api_key.is_empty() {
            return Err(EnrichError::MissingApiKey);
        }

        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Provider response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(provider_error(status.as_u16(), &raw));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn provider_error(status: u16, raw: &str) -> EnrichError {
    let message = serde_json::from_str::<ErrorEnvelope>(raw)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            if raw.trim().is_empty() {
                "empty response body".to_string()
            } else {
                raw.trim().to_string()
            }
        });
    EnrichError::ProviderError { status, message }
}

/// Checks a decoded reply against the insights schema.
pub fn parse_enrichment(value: &Value) -> Result<Enrichment> {
    let object = value.as_object().ok_or_else(|| EnrichError::SchemaViolation {
        message: "expected a JSON object".to_string(),
    })?;

    let mut fields = Vec::with_capacity(TEXT_FIELDS.len());
    for field in TEXT_FIELDS {
        let text = match object.get(field) {
            Some(Value::String(text)) => text,
            Some(_) => {
                return Err(EnrichError::SchemaViolation {
                    message: format!("field `{}` is not a string", field),
                })
            }
            None => {
                return Err(EnrichError::SchemaViolation {
                    message: format!("missing field `{}`", field),
                })
            }
        };
        validate_non_empty_string(field, text).map_err(|_| EnrichError::SchemaViolation {
            message: format!("field `{}` is blank", field),
        })?;
        fields.push(text.trim().to_string());
    }

    let mut fields = fields.into_iter();
    Ok(Enrichment {
        tasting_notes: fields.next().unwrap_or_default(),
        pairing_suggestion: fields.next().unwrap_or_default(),
        region_history: fields.next().unwrap_or_default(),
    })
}

#[async_trait]
impl TextProvider for GeminiClient {
    async fn generate_insights(&self, product_name: &str) -> Result<Enrichment> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": insights_instruction(product_name) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": insights_schema(),
            }
        });

        let url = self.endpoint(&self.text_model, "generateContent");
        let response: GenerateContentResponse = self.post_json(&url, &body).await?;

        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(EnrichError::MissingContent {
                message: format!("prompt blocked: {}", reason),
            });
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| EnrichError::MissingContent {
                message: "no candidates".to_string(),
            })?;

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(EnrichError::MissingContent {
                message: format!(
                    "candidate had no text (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        let value: Value = serde_json::from_str(&text)?;
        let enrichment = parse_enrichment(&value)?;
        tracing::info!("✨ Generated tasting notes for '{}'", product_name);
        Ok(enrichment)
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate_image(&self, product_name: &str) -> Result<Option<GeneratedImage>> {
        let body = json!({
            "instances": [{ "prompt": image_prompt(product_name) }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "3:4",
                "outputMimeType": DEFAULT_IMAGE_MIME,
            }
        });

        let url = self.endpoint(&self.image_model, "predict");
        let response: PredictResponse = self.post_json(&url, &body).await?;

        let Some(prediction) = response.predictions.into_iter().next() else {
            return Ok(None);
        };

        if let Some(reason) = &prediction.rai_filtered_reason {
            tracing::warn!("Image for '{}' was filtered: {}", product_name, reason);
        }

        let image = prediction
            .bytes_base64_encoded
            .filter(|data| !data.is_empty())
            .map(|base64_data| GeneratedImage {
                mime_type: prediction
                    .mime_type
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
                base64_data,
            });

        if image.is_some() {
            tracing::info!("🖼️ Generated image for '{}'", product_name);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_reply() {
        let value = json!({
            "tastingNotes": " Silky and briny. ",
            "pairingSuggestion": "Alvarinho",
            "regionHistory": "Matosinhos canneries date to the 1800s."
        });
        let enrichment = parse_enrichment(&value).unwrap();
        assert_eq!(enrichment.tasting_notes, "Silky and briny.");
        assert_eq!(enrichment.pairing_suggestion, "Alvarinho");
    }

    #[test]
    fn rejects_missing_or_mistyped_fields() {
        let missing = json!({ "tastingNotes": "a", "pairingSuggestion": "b" });
        assert!(matches!(
            parse_enrichment(&missing),
            Err(EnrichError::SchemaViolation { .. })
        ));

        let mistyped = json!({ "tastingNotes": "a", "pairingSuggestion": 3, "regionHistory": "c" });
        assert!(parse_enrichment(&mistyped).is_err());

        let blank = json!({ "tastingNotes": "", "pairingSuggestion": "b", "regionHistory": "c" });
        assert!(parse_enrichment(&blank).is_err());

        assert!(parse_enrichment(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn provider_error_prefers_envelope_message() {
        let raw = r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#;
        match provider_error(403, raw) {
            EnrichError::ProviderError { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        match provider_error(502, "") {
            EnrichError::ProviderError { message, .. } => assert_eq!(message, "empty response body"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
