//! LLM gateway client
//!
//! Every model call goes through an OpenAI-compatible chat-completions
//! gateway. Tasks pick a model tier (fast, web-connected, deep) and carry
//! their own timeout and sampling settings; [`ModelRouter::ask`] adds the
//! single fallback step some tasks allow.

pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::utils::error::FetchError;

/// Application name sent in the `X-Title` header
pub const APP_TITLE: &str = "corpscout";

/// Model class used for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheap general-purpose model
    Fast,
    /// Web-connected model for fact finding
    Web,
    /// Larger reasoning model
    Deep,
}

impl ModelTier {
    /// Configured model name for this tier
    pub fn model<'a>(&self, config: &'a LlmConfig) -> &'a str {
        match self {
            Self::Fast => &config.fast_model,
            Self::Web => &config.web_model,
            Self::Deep => &config.deep_model,
        }
    }
}

/// Kinds of model call made during an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmTask {
    Summary,
    Description,
    Ceo,
    Management,
    ManagementFallback,
    Events,
    Enrichment,
    Subsidiaries,
    ClassifyCompany,
}

impl LlmTask {
    /// Tier tried first
    pub fn primary(&self) -> ModelTier {
        match self {
            Self::Summary | Self::Ceo | Self::Management | Self::Enrichment => ModelTier::Web,
            Self::Description | Self::ClassifyCompany => ModelTier::Fast,
            Self::ManagementFallback | Self::Events | Self::Subsidiaries => ModelTier::Deep,
        }
    }

    /// Tier tried when the primary fails or answers empty
    pub fn fallback(&self) -> Option<ModelTier> {
        match self {
            Self::Summary => Some(ModelTier::Fast),
            Self::Subsidiaries => Some(ModelTier::Web),
            _ => None,
        }
    }

    pub fn timeout(&self, config: &LlmConfig) -> Duration {
        let secs = match self {
            Self::Events => config.extraction_timeout_secs,
            Self::Enrichment => config.enrichment_timeout_secs,
            _ => config.timeout_secs,
        };
        Duration::from_secs(secs)
    }

    pub fn temperature(&self) -> Option<f32> {
        match self {
            Self::Events | Self::Enrichment => Some(0.1),
            Self::Ceo | Self::ClassifyCompany => Some(0.0),
            _ => None,
        }
    }

    pub fn max_tokens(&self) -> Option<u32> {
        match self {
            Self::Events => Some(32_000),
            Self::Enrichment => Some(2_000),
            Self::ClassifyCompany => Some(10),
            _ => None,
        }
    }

    /// Short label used in logs and the `X-Title` header
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Description => "description",
            Self::Ceo => "ceo",
            Self::Management => "management",
            Self::ManagementFallback => "management-fallback",
            Self::Events => "events",
            Self::Enrichment => "enrichment",
            Self::Subsidiaries => "subsidiaries",
            Self::ClassifyCompany => "classify-company",
        }
    }
}

/// One chat-completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
    /// Value of the `X-Title` header
    pub title: String,
}

impl CompletionRequest {
    /// Build the request for a task on the given tier
    pub fn for_task(task: LlmTask, tier: ModelTier, prompt: &str, config: &LlmConfig) -> Self {
        Self {
            model: tier.model(config).to_string(),
            prompt: prompt.to_string(),
            temperature: task.temperature(),
            max_tokens: task.max_tokens(),
            timeout: task.timeout(config),
            title: format!("{APP_TITLE} {}", task.as_str()),
        }
    }
}

/// Chat model seam; the reply is the first choice's message text
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Chat-completions client for the LLM gateway
pub struct LlmClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl LlmClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(config: &LlmConfig) -> Result<Self, FetchError> {
        let client = Client::builder().gzip(true).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create a client against a custom gateway URL, for testing
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let config = LlmConfig {
            endpoint: base_url.to_string(),
            api_key: Some(api_key.to_string()),
            ..LlmConfig::default()
        };
        Self::with_config(&config)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::NotConfigured("LLM gateway"))?;

        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &request.model,
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(model = %request.model, title = %request.title, "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("X-Title", &request.title)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::status(status.as_u16(), &body));
        }

        let parsed: ChatResponse = response.json().await?;
        if let Some(error) = parsed.error {
            return Err(FetchError::Api(error.message));
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(FetchError::EmptyResponse(request.model.clone()));
        }
        Ok(content)
    }
}

/// Resolves tasks to models and applies the fallback rule
#[derive(Clone)]
pub struct ModelRouter {
    chat: Arc<dyn ChatModel>,
    config: LlmConfig,
}

impl ModelRouter {
    pub fn new(chat: Arc<dyn ChatModel>, config: LlmConfig) -> Self {
        Self { chat, config }
    }

    /// Run a task: primary model, then the fallback model on failure or an
    /// empty reply. There is no other retry.
    pub async fn ask(&self, task: LlmTask, prompt: &str) -> Result<String, FetchError> {
        let primary = self.call(task, task.primary(), prompt).await;

        let Some(fallback) = task.fallback() else {
            return primary;
        };

        match primary {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::warn!(
                    task = task.as_str(),
                    error = %e,
                    fallback = fallback.model(&self.config),
                    "Primary model failed, trying fallback"
                );
                self.call(task, fallback, prompt).await
            }
        }
    }

    async fn call(&self, task: LlmTask, tier: ModelTier, prompt: &str) -> Result<String, FetchError> {
        let request = CompletionRequest::for_task(task, tier, prompt, &self.config);
        let reply = self.chat.complete(&request).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(FetchError::EmptyResponse(request.model));
        }
        tracing::debug!(task = task.as_str(), model = %request.model, chars = reply.len(), "Model replied");
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replies in order, recording the models asked
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String, FetchError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, FetchError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, FetchError> {
            self.seen.lock().unwrap().push(request.model.clone());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(FetchError::EmptyResponse(request.model.clone()));
            }
            replies.remove(0)
        }
    }

    #[test]
    fn test_task_settings() {
        let config = LlmConfig::default();
        assert_eq!(LlmTask::Events.primary(), ModelTier::Deep);
        assert_eq!(LlmTask::Events.timeout(&config), Duration::from_secs(180));
        assert_eq!(LlmTask::Enrichment.timeout(&config), Duration::from_secs(45));
        assert_eq!(LlmTask::Description.timeout(&config), Duration::from_secs(20));
        assert_eq!(LlmTask::Events.max_tokens(), Some(32_000));
        assert_eq!(LlmTask::Enrichment.primary().model(&config), "perplexity/sonar-pro");
    }

    #[tokio::test]
    async fn test_fallback_on_empty_reply() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("   ".to_string()),
            Ok("- Company Name: Acme".to_string()),
        ]));
        let router = ModelRouter::new(model.clone(), LlmConfig::default());

        let reply = router.ask(LlmTask::Summary, "prompt").await.unwrap();
        assert_eq!(reply, "- Company Name: Acme");
        assert_eq!(
            *model.seen.lock().unwrap(),
            vec!["perplexity/sonar-pro", "openai/gpt-4o-mini"]
        );
    }

    #[tokio::test]
    async fn test_no_fallback_means_one_call() {
        let model = Arc::new(ScriptedModel::new(vec![Err(FetchError::Timeout), Ok("late".to_string())]));
        let router = ModelRouter::new(model.clone(), LlmConfig::default());

        let result = router.ask(LlmTask::Events, "prompt").await;
        assert!(matches!(result, Err(FetchError::Timeout)));
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let config = LlmConfig::default();
        let client = LlmClient::with_config(&config).unwrap();
        let request = CompletionRequest::for_task(LlmTask::Ceo, ModelTier::Web, "who?", &config);
        let result = client.complete(&request).await;
        assert!(matches!(result, Err(FetchError::NotConfigured(_))));
    }
}
