//! Inference API integration
//!
//! Provides the interface to the hosted model that rewrites transcripts, with
//! a Bedrock-backed client and a mock for tests.

pub mod bedrock;
pub mod mock;

pub use bedrock::{extract_region_from_arn, BedrockClient, DEFAULT_REGION};
pub use mock::MockInferenceClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Invoke the model once with a JSON request body and return the raw JSON
    /// response body. Response validation is the caller's concern.
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>>;
}
