use super::InferenceService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A response well-formed per the invoke_model contract, used when no
/// responses have been queued.
const DEFAULT_RESPONSE: &str =
    r#"{"output":{"message":{"content":[{"text":"corrected transcript"}]}}}"#;

#[derive(Clone)]
pub struct MockInferenceClient {
    responses: Arc<Mutex<Vec<std::result::Result<Vec<u8>, String>>>>,
    requests: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MockInferenceClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, body: impl Into<Vec<u8>>) -> Self {
        self.responses.lock().unwrap().push(Ok(body.into()));
        self
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(Err(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Model id and request body of the most recent invocation.
    pub fn last_request(&self) -> Option<(String, Vec<u8>)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockInferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceService for MockInferenceClient {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let mut requests = self.requests.lock().unwrap();
        requests.push((model_id.to_string(), body));
        let count = requests.len();
        drop(requests);

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(DEFAULT_RESPONSE.as_bytes().to_vec());
        }

        let index = (count - 1) % responses.len();
        match &responses[index] {
            Ok(body) => Ok(body.clone()),
            Err(message) => Err(Error::Inference(message.clone())),
        }
    }
}
