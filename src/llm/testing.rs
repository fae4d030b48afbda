//! In-memory gateway for tests and offline runs
//!
//! Records every request and answers with `summary N` (1-based call index,
//! padded with whitespace so callers' trimming is exercised).

use super::gateway::{GatewayError, GenerationRequest, LlmGateway};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GenerationRequest>>,
    fail_at: Option<usize>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call with this 0-based index
    pub fn failing_at(index: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmGateway for RecordingGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GatewayError> {
        let index = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.push(request);
            calls.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(GatewayError::Upstream {
                status: 500,
                body: "scripted failure".to_string(),
            });
        }

        Ok(format!("  summary {}  \n", index + 1))
    }
}
