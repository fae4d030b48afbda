//! Gateway trait and request types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A role-tagged conversation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl GenerationRequest {
    /// The usual system + user pair
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            max_tokens,
            temperature,
        }
    }

    /// Content of the last user message
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Generates text for a conversation
///
/// Implementations own retry and backoff; callers treat any error as final.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GatewayError>;
}

/// Gateway errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Upstream error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No choices in response")]
    EmptyResponse,
}

impl GatewayError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) | GatewayError::Timeout(_) => true,
            GatewayError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "be brief");
    }

    #[test]
    fn test_user_prompt() {
        let request = GenerationRequest::new("sys", "question", 10, 0.7);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.user_prompt(), Some("question"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(GatewayError::Timeout("slow".into()).is_retryable());
        assert!(GatewayError::Upstream { status: 429, body: String::new() }.is_retryable());
        assert!(GatewayError::Upstream { status: 503, body: String::new() }.is_retryable());
        assert!(!GatewayError::Upstream { status: 401, body: String::new() }.is_retryable());
        assert!(!GatewayError::EmptyResponse.is_retryable());
    }
}
