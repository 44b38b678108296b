use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{GenerationError, GenerationResult};
use crate::types::GenerationResponse;

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate, `None` when there are none
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let texts: Vec<&str> = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

/// Fixed prompt, the industry is interpolated verbatim
pub fn build_prompt(industry: &str) -> String {
    format!(
        "Generate 10 creative, modern, and memorable startup names for the \"{}\" industry. \
         For each name, provide a short, catchy 1-sentence tagline explaining why this name fits the brand.",
        industry
    )
}

/// Structured-output schema: `{ names: [{ name, tagline }] }`
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "names": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {
                            "type": "STRING",
                            "description": "The creative startup name."
                        },
                        "tagline": {
                            "type": "STRING",
                            "description": "A short catchy tagline."
                        }
                    },
                    "required": ["name", "tagline"]
                }
            }
        },
        "required": ["names"]
    })
}

/// Parse the model's text as the schema's JSON shape. The count is not checked.
pub fn parse_generation_text(text: Option<&str>) -> GenerationResult<GenerationResponse> {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return Err(GenerationError::EmptyResponse),
    };
    Ok(serde_json::from_str(text)?)
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn with_base_url(api_key: Option<&str>, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.map(str::to_string),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Same model and endpoint, different key
    pub fn with_api_key(&self, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..self.clone()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the model for ten name/tagline pairs. One best-effort call, no retry.
    pub async fn generate_startup_names(&self, industry: &str) -> GenerationResult<GenerationResponse> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::MissingApiKey)?;

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: build_prompt(industry),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        tracing::debug!(model = %self.model, industry, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let parsed = parse_generation_text(gemini_response.text().as_deref())?;
        tracing::info!(count = parsed.names.len(), "received generated names");
        Ok(parsed)
    }
}
