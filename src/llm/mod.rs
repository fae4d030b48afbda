//! Language model gateway
//!
//! The pipeline talks to the model only through [`LlmGateway`]: an ordered
//! list of role-tagged messages plus generation parameters in, generated
//! text out. [`OpenAiGateway`] implements it against any OpenAI-compatible
//! chat completions endpoint.

pub mod gateway;
pub mod openai;
pub mod testing;

pub use gateway::{ChatMessage, GatewayError, GenerationRequest, LlmGateway, Role};
pub use openai::OpenAiGateway;
pub use testing::RecordingGateway;
