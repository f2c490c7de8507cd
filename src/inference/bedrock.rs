use super::InferenceService;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::{config::Region, primitives::Blob, Client as BedrockRuntimeClient};

/// Region used when the invocation ARN does not carry one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Region segment of a Lambda-style ARN
/// (`arn:aws:lambda:<region>:<account>:function:<name>`), if present.
pub fn extract_region_from_arn(arn: &str) -> Option<&str> {
    let rest = arn.strip_prefix("arn:aws:lambda:")?;
    let (region, _) = rest.split_once(':')?;
    (!region.is_empty()).then_some(region)
}

pub struct BedrockClient {
    client: BedrockRuntimeClient,
}

impl BedrockClient {
    pub async fn new(region: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;

        Self {
            client: BedrockRuntimeClient::new(&config),
        }
    }

    /// Client pointed at a custom endpoint with static credentials, so tests
    /// can stand in for the service with a local HTTP server.
    pub async fn with_endpoint(region: String, endpoint: String) -> Self {
        let credentials = aws_sdk_bedrockruntime::config::Credentials::new(
            "test-access-key",
            "test-secret-key",
            None,
            None,
            "static",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region))
            .endpoint_url(endpoint)
            .load()
            .await;

        Self {
            client: BedrockRuntimeClient::new(&config),
        }
    }
}

#[async_trait]
impl InferenceService for BedrockClient {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        tracing::debug!("Calling Bedrock invoke_model (model: {})", model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Bedrock invoke_model failed: {}", e);
                Error::Inference(format!("invoke_model failed: {}", e))
            })?;

        Ok(response.body.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_region_from_lambda_arn() {
        assert_eq!(
            extract_region_from_arn("arn:aws:lambda:ap-northeast-1:123:function:foo"),
            Some("ap-northeast-1")
        );
        assert_eq!(
            extract_region_from_arn("arn:aws:lambda:us-west-2:000000000000:function:bar"),
            Some("us-west-2")
        );
    }

    #[test]
    fn test_extract_region_rejects_other_shapes() {
        assert_eq!(extract_region_from_arn("not an arn"), None);
        assert_eq!(extract_region_from_arn(""), None);
        assert_eq!(
            extract_region_from_arn("arn:aws:s3:::some-bucket"),
            None
        );
        // Region segment present but empty
        assert_eq!(extract_region_from_arn("arn:aws:lambda::123:function:foo"), None);
        // No segment terminator after the region
        assert_eq!(extract_region_from_arn("arn:aws:lambda:us-east-1"), None);
    }
}
