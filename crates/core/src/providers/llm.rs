use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::SuggestionSettings;
use crate::models::suggestion::CategorySuggestion;
use crate::models::transaction::Category;
use super::traits::CategorySuggester;

const PROVIDER_NAME: &str = "LLM";

const SYSTEM_PROMPT: &str = "You are a financial assistant that helps users categorize their \
transactions according to the 50/30/20 rule: Needs (essentials such as rent, groceries, \
utilities, insurance, transport to work), Wants (discretionary spending such as dining out, \
entertainment, hobbies, travel) and Savings (money set aside: savings transfers, investments, \
debt prepayment). Reply with a single JSON object of the form \
{\"category\": \"Needs\" | \"Wants\" | \"Savings\", \"explanation\": \"<one short sentence>\"} \
and nothing else.";

/// Category suggestions from an OpenAI-compatible chat completions API.
///
/// - **Requires**: API key (bearer token).
/// - **Endpoint**: `POST {endpoint}/chat/completions`
/// - **Output**: JSON object with `category` and `explanation`, parsed
///   from the first choice's message content.
pub struct LlmSuggester {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl LlmSuggester {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }

    /// Build from settings. Returns `None` when no API key is configured.
    pub fn from_settings(settings: &SuggestionSettings) -> Option<Self> {
        if !settings.has_api_key() {
            return None;
        }
        let key = settings.api_key.clone()?;
        Some(Self::new(&settings.endpoint, &settings.model, key))
    }

    fn user_prompt(description: &str, amount: f64) -> String {
        format!("Transaction Description: {description}\nTransaction Amount: {amount:.2}")
    }
}

// ── Chat completions request/response types ─────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawSuggestion {
    category: String,
    #[serde(default)]
    explanation: String,
}

/// Extract a suggestion from model output.
///
/// Accepts the bare JSON object, or one wrapped in prose or a code fence:
/// everything between the first `{` and the last `}` is parsed.
pub fn parse_suggestion(content: &str) -> Result<CategorySuggestion, CoreError> {
    let (start, end) = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: "Model reply contains no JSON object".into(),
            })
        }
    };

    let raw: RawSuggestion =
        serde_json::from_str(&content[start..=end]).map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Malformed suggestion JSON: {e}"),
        })?;

    let category = Category::parse(&raw.category).ok_or_else(|| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("Unknown category '{}'", raw.category),
    })?;

    Ok(CategorySuggestion::new(category, raw.explanation.trim()))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CategorySuggester for LlmSuggester {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn suggest_category(
        &self,
        description: &str,
        amount: f64,
    ) -> Result<CategorySuggestion, CoreError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(description, amount),
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} from completions endpoint"),
            });
        }

        let chat: ChatResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse completion response: {e}"),
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: "Completion response has no content".into(),
            })?;

        parse_suggestion(&content)
    }
}
