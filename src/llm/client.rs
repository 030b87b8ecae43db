use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::ServiceError;
use crate::llm::Oracle;

const SERVICE: &str = "llm";

/// HTTP oracle speaking to Ollama, an OpenAI-compatible server, or Gemini.
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!("{}/api/chat", self.config.base_url.trim_end_matches('/'));

        let req = OllamaChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let resp = self.client.post(&url).json(&req).send().await?;
        let body: OllamaChatResponse = decode(resp).await?;
        Ok(body.message.content)
    }

    async fn call_openai(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let req = OpenAiChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await?;

        let body: OpenAiChatResponse = decode(resp).await?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ServiceError::Decode {
                service: SERVICE,
                detail: "no choices in chat completion".to_string(),
            })
    }

    async fn call_gemini(&self, prompt: &str) -> Result<String, ServiceError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.chat_model
        );
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let req = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&req)
            .send()
            .await?;

        let body: GeminiResponse = decode(resp).await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ServiceError::Decode {
                service: SERVICE,
                detail: "Gemini returned no candidate text".to_string(),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Oracle for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        match self.config.provider.as_str() {
            "ollama" => self.call_ollama(prompt).await,
            "openai" => self.call_openai(prompt).await,
            "gemini" => self.call_gemini(prompt).await,
            other => Err(ServiceError::UnknownProvider(other.to_string())),
        }
    }
}

/// Check the status, then parse the JSON body.
async fn decode<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T, ServiceError> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ServiceError::from_status(SERVICE, status, body));
    }

    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode {
        service: SERVICE,
        detail: e.to_string(),
    })
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: Message,
}

// ─── Gemini ──────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
