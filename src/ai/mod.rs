mod gemini;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Language;

pub use gemini::GeminiClient;

/// What the orchestrator hands to a generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub language: Language,
    pub grounded: bool,
}

/// A citation as reported by the backend. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Citation {
    pub uri: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundedResponse {
    pub text: Option<String>,
    pub citations: Vec<Citation>,
}

/// Prompt in, grounded text plus citations out.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GroundedResponse>;

    fn model_name(&self) -> &str;
}
