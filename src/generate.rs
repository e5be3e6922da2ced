//! LLM-backed description generation.
//!
//! A [`DescriptionGenerator`] turns a system prompt and a user prompt into
//! text. [`describe_file`] and [`explain_file`] build the prompts and map
//! every failure to [`ScribeError::GenerationFailed`].
//!
//! | Config Value | Provider | Endpoint |
//! |-------------|----------|----------|
//! | `"ollama"` | [`OllamaGenerator`] | `POST {base_url}/api/chat` |
//! | `"openai"` | [`OpenAIGenerator`] | `POST {base_url}/v1/chat/completions` |
//! | `"disabled"` | [`DisabledGenerator`] | always errors |

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::ScribeError;

/// File content beyond this many bytes is cut before prompting.
const MAX_PROMPT_CHARS: usize = 12_000;

const DESCRIBE_SYSTEM_PROMPT: &str = "You are a code description generator. Given a file name \
and its content, generate a concise, descriptive summary of the code's purpose and \
functionality. The description should be detailed enough to allow retrieval based on \
natural language queries. For example, if the code is a middleware function in Node.js, \
generate a description like 'This code implements middleware for a Node.js application.'";

const EXPLAIN_SYSTEM_PROMPT: &str = "You are a code explainer. Given a file name and its \
content, explain how the code works for a developer who is new to the repository. Cover \
the main types and functions and how they fit together. When a question is provided, \
focus the explanation on answering it.";

#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    fn model_name(&self) -> &str;
    /// One chat completion with a system and a user message.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Generate the description for one file.
pub async fn describe_file(
    generator: &dyn DescriptionGenerator,
    resource_path: &str,
    content: &str,
) -> Result<String, ScribeError> {
    let user = format!(
        "Please generate a description for the following code snippet: {} \n filename: {}",
        truncate_content(content),
        resource_path
    );
    run(generator, DESCRIBE_SYSTEM_PROMPT, &user, resource_path).await
}

/// Explain one file, optionally focused on `question`.
pub async fn explain_file(
    generator: &dyn DescriptionGenerator,
    resource_path: &str,
    content: &str,
    question: Option<&str>,
) -> Result<String, ScribeError> {
    let mut user = format!(
        "filename: {}\n\n{}",
        resource_path,
        truncate_content(content)
    );
    if let Some(q) = question.map(str::trim).filter(|q| !q.is_empty()) {
        user.push_str(&format!("\n\nQuestion: {}", q));
    }
    run(generator, EXPLAIN_SYSTEM_PROMPT, &user, resource_path).await
}

async fn run(
    generator: &dyn DescriptionGenerator,
    system: &str,
    user: &str,
    resource_path: &str,
) -> Result<String, ScribeError> {
    let output = generator
        .complete(system, user)
        .await
        .with_context(|| format!("{} failed for {}", generator.model_name(), resource_path))
        .map_err(ScribeError::generation_failed)?;

    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(ScribeError::GenerationFailed(format!(
            "{} returned no text for {}",
            generator.model_name(),
            resource_path
        )));
    }
    Ok(trimmed.to_string())
}

fn truncate_content(content: &str) -> &str {
    if content.len() <= MAX_PROMPT_CHARS {
        return content;
    }
    let mut end = MAX_PROMPT_CHARS;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

// ============ Disabled ============

pub struct DisabledGenerator;

#[async_trait]
impl DescriptionGenerator for DisabledGenerator {
    fn model_name(&self) -> &str {
        "disabled"
    }
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        bail!("LLM provider is disabled; set [llm] provider in the config")
    }
}

// ============ Ollama ============

pub struct OllamaGenerator {
    client: reqwest::Client,
    url: String,
    model: String,
    temperature: f32,
    num_predict: u32,
}

impl OllamaGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            num_predict: config.num_predict,
        })
    }
}

#[async_trait]
impl DescriptionGenerator for OllamaGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "stream": false,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "options": {
                "temperature": self.temperature,
                "num_predict": self.num_predict,
            },
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.url))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Ollama connection error (is Ollama running at {}?)", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("Ollama API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Ollama chat response")?;
        parse_ollama_chat(&json)
    }
}

fn parse_ollama_chat(json: &serde_json::Value) -> Result<String> {
    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing message.content"))
}

// ============ OpenAI ============

pub struct OpenAIGenerator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.num_predict,
        })
    }
}

#[async_trait]
impl DescriptionGenerator for OpenAIGenerator {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("Failed to call OpenAI chat API")?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        parse_openai_chat(&json)
    }
}

fn parse_openai_chat(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing choices[0].message.content"))
}

pub fn create_generator(config: &LlmConfig) -> Result<Box<dyn DescriptionGenerator>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "ollama" => Ok(Box::new(OllamaGenerator::new(config)?)),
        "openai" => Ok(Box::new(OpenAIGenerator::new(config)?)),
        other => bail!("Unknown llm provider: {}", other),
    }
}
