//! OpenAI chat-completions client producing schema-constrained summaries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::prompt::{build_user_prompt, SYSTEM_PROMPT};
use super::{GeneratedSummary, SummaryError, SummaryGenerator, MAX_BULLETS};
use crate::config::LlmConfig;
use crate::pr::PullRequest;
use crate::script::{Style, Summary, Tone, Vibe};

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    response_format: Value,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiGenerator {
    /// Build a generator, or `None` when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, SummaryError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            name: format!("openai:{}", config.model),
        }))
    }

    fn response_format() -> Value {
        let vibes: Vec<&str> = Vibe::ALL.iter().map(|v| v.as_str()).collect();
        let tones: Vec<&str> = Tone::ALL.iter().map(|t| t.as_str()).collect();
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "video_script",
                "strict": true,
                "schema": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["headline", "vibe", "bullets", "emoji", "accentColor", "tone"],
                    "properties": {
                        "headline": {"type": "string"},
                        "vibe": {"type": "string", "enum": vibes},
                        "bullets": {
                            "type": "array",
                            "items": {"type": "string"},
                            "minItems": 3,
                            "maxItems": MAX_BULLETS
                        },
                        "emoji": {"type": "string"},
                        "accentColor": {"type": "string", "description": "Hex color such as #8b5cf6"},
                        "tone": {"type": "string", "enum": tones}
                    }
                }
            }
        })
    }
}

/// Parse the assistant message, tolerating a markdown code fence around it.
fn parse_content(content: &str) -> Result<GeneratedSummary, SummaryError> {
    let text = content.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text).trim();
    serde_json::from_str(text).map_err(|e| SummaryError::Malformed(e.to_string()))
}

#[async_trait]
impl SummaryGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, pr), fields(model = %self.model, pr = pr.number))]
    async fn generate(&self, pr: &PullRequest) -> Result<(Summary, Style), SummaryError> {
        let user_prompt = build_user_prompt(pr);
        debug!(prompt_chars = user_prompt.len(), "sending summary request");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            response_format: Self::response_format(),
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Status { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        let message = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| SummaryError::Malformed("no choices in response".to_string()))?;

        if let Some(refusal) = message.refusal {
            return Err(SummaryError::Malformed(format!("model refused: {}", refusal)));
        }
        let content = message
            .content
            .ok_or_else(|| SummaryError::Malformed("empty message content".to_string()))?;
        debug!(content_chars = content.len(), "received summary");

        parse_content(&content)?.into_parts()
    }
}
