// inference_utils.rs
use crate::api_utils::ApiCallBuilder;
use crate::error::EnactError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const CHAT_COMPLETIONS_URL: &str = "https://router.huggingface.co/v1/chat/completions";

fn model_url(model: &str) -> String {
    format!("https://router.huggingface.co/hf-inference/models/{}", model)
}

/// One turn of a chat conversation, in the wire shape the chat completions
/// endpoint expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.to_string(),
        }
    }
}

/// Parameters for one chat completion request.
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ChatCompletionConfig {
    fn default() -> Self {
        ChatCompletionConfig {
            model: "Qwen/QwQ-32B-Preview".to_string(),
            max_tokens: 2800,
            temperature: 0.7,
        }
    }
}

/// Parameters for one zero-shot classification request.
#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    pub model: String,
    pub candidate_labels: Vec<String>,
    pub multi_label: bool,
}

impl Default for ZeroShotConfig {
    fn default() -> Self {
        ZeroShotConfig {
            model: "facebook/bart-large-mnli".to_string(),
            candidate_labels: vec![
                "positive".to_string(),
                "negative".to_string(),
                "neutral".to_string(),
            ],
            multi_label: false,
        }
    }
}

/// The provider's zero-shot response: labels sorted by descending score.
#[derive(Debug, Clone, Deserialize)]
pub struct ZeroShotResult {
    pub sequence: String,
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ZeroShotResult {
    /// The best-scoring label.
    pub fn top_label(&self) -> Result<&str, EnactError> {
        self.labels
            .first()
            .map(|s| s.as_str())
            .ok_or_else(|| EnactError::Provider("zero-shot response has no labels".to_string()))
    }
}

/// Parameters for one text-to-image request.
#[derive(Debug, Clone)]
pub struct TextToImageConfig {
    pub model: String,
}

impl Default for TextToImageConfig {
    fn default() -> Self {
        TextToImageConfig {
            model: "black-forest-labs/FLUX.1-dev".to_string(),
        }
    }
}

/// The collaborator boundary every hosted inference service is consumed
/// through: one synchronous, opaque request-response exchange. The wire
/// format belongs to the provider.
#[async_trait]
pub trait InferenceProvider {
    async fn submit(&self, input: &str, parameters: Value) -> Result<Value, EnactError>;
}

/// A Hugging Face inference client covering the chat, zero-shot and
/// text-to-image endpoints the analysis pages call.
pub struct HuggingFaceConnect {
    api_key: String,
}

impl HuggingFaceConnect {
    pub fn new(api_key: &str) -> Self {
        HuggingFaceConnect {
            api_key: api_key.to_string(),
        }
    }

    fn auth_headers(&self) -> Value {
        json!({
            "Content-Type": "application/json",
            "Authorization": format!("Bearer {}", self.api_key)
        })
    }

    /// Sends a full conversation to the chat completions endpoint and
    /// returns the assistant's reply text.
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        config: &ChatCompletionConfig,
    ) -> Result<String, EnactError> {
        let payload = json!({
            "model": config.model,
            "messages": messages,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
        });

        let response = ApiCallBuilder::call(
            "POST",
            CHAT_COMPLETIONS_URL,
            Some(self.auth_headers()),
            Some(payload),
        )
        .retries(3, 2)
        .execute()
        .await?;

        let parsed: Value = serde_json::from_str(&response)?;
        let content = parsed["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| {
                EnactError::Provider("chat completion response has no content".to_string())
            })?;
        Ok(content.to_string())
    }

    /// Classifies `text` against the configured candidate labels without
    /// any prior training.
    pub async fn classify_text(
        &self,
        text: &str,
        config: &ZeroShotConfig,
    ) -> Result<ZeroShotResult, EnactError> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "candidate_labels": config.candidate_labels,
                "multi_label": config.multi_label,
            }
        });

        let response = ApiCallBuilder::call(
            "POST",
            &model_url(&config.model),
            Some(self.auth_headers()),
            Some(payload),
        )
        .retries(3, 2)
        .execute()
        .await?;

        Ok(serde_json::from_str(&response)?)
    }

    /// Generates an image for `prompt` and returns the raw image bytes.
    pub async fn text_to_image(
        &self,
        prompt: &str,
        config: &TextToImageConfig,
    ) -> Result<Vec<u8>, EnactError> {
        let client = Client::new();
        let response = client
            .post(model_url(&config.model))
            .bearer_auth(&self.api_key)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.bytes().await?;

        // A JSON body here is the provider reporting a failure, not pixels.
        if content_type.contains("application/json") {
            let detail = String::from_utf8_lossy(&bytes).to_string();
            return Err(EnactError::Provider(format!(
                "the model did not return an image: {}",
                detail
            )));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl InferenceProvider for HuggingFaceConnect {
    async fn submit(&self, input: &str, parameters: Value) -> Result<Value, EnactError> {
        let model = parameters["model"].as_str().ok_or_else(|| {
            EnactError::Provider("submit parameters need a 'model' string".to_string())
        })?;
        let mut payload = json!({ "inputs": input });
        if let Some(extra) = parameters.get("parameters") {
            payload["parameters"] = extra.clone();
        }

        let response = ApiCallBuilder::call(
            "POST",
            &model_url(model),
            Some(self.auth_headers()),
            Some(payload),
        )
        .execute()
        .await?;

        Ok(serde_json::from_str(&response)?)
    }
}
