//! Configuration for feedback generation.
//!
//! All pipeline behaviour is controlled through [`FeedbackConfig`], built via
//! its [`FeedbackConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across submissions and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The defaults here are the fixed service constants of the pipeline
//! (model, 300-token cap, temperature 0.7); most callers change nothing.
//! The builder lets the few who do set only what they care about.

use crate::error::GraderError;
use crate::pipeline::llm::CompletionClient;
use std::fmt;
use std::sync::Arc;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default base URL of the OpenAI-compatible completion endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a feedback run.
///
/// Built via [`FeedbackConfig::builder()`] or [`FeedbackConfig::default()`].
///
/// # Example
/// ```rust
/// use assessai_grader::FeedbackConfig;
///
/// let config = FeedbackConfig::builder()
///     .model("gpt-4o-mini")
///     .max_tokens(300)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct FeedbackConfig {
    /// Completion model identifier. Default: `gpt-3.5-turbo`.
    pub model: String,

    /// Maximum tokens the model may generate. Default: 300.
    ///
    /// Feedback is two positive bullets, three improvement bullets, and a
    /// grade line; 300 tokens covers that comfortably while keeping the
    /// per-submission cost bounded.
    pub max_tokens: u32,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Feedback should read naturally rather than deterministically, so the
    /// temperature sits well above transcription-style settings. The grade
    /// line survives because it is demanded verbatim by the prompt, not by
    /// low temperature.
    pub temperature: f32,

    /// API key for the completion endpoint. If `None`, the `OPENAI_API_KEY`
    /// environment variable is consulted when the client is resolved.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,

    /// Custom system instruction. If `None`, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Pre-constructed completion client. Takes precedence over `api_key`.
    ///
    /// Useful in tests or when the caller needs custom middleware.
    pub client: Option<Arc<dyn CompletionClient>>,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 0.7,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: None,
            client: None,
        }
    }
}

impl fmt::Debug for FeedbackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("system_prompt", &self.system_prompt)
            .field("client", &self.client.as_ref().map(|_| "<dyn CompletionClient>"))
            .finish()
    }
}

impl FeedbackConfig {
    /// Create a new builder for `FeedbackConfig`.
    pub fn builder() -> FeedbackConfigBuilder {
        FeedbackConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`FeedbackConfig`].
#[derive(Debug)]
pub struct FeedbackConfigBuilder {
    config: FeedbackConfig,
}

impl FeedbackConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n.max(1);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FeedbackConfig, GraderError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(GraderError::InvalidConfig("Model must not be empty".into()));
        }
        if c.base_url.trim().is_empty() {
            return Err(GraderError::InvalidConfig(
                "Base URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
