// SQS Client Construction
// reason: aws-config loads credentials/region from the environment; the
// endpoint override exists for localstack and other SQS-compatible endpoints

use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Region;

/// Connection settings for the SQS client
///
/// Unset fields fall back to whatever the AWS environment provides
/// (AWS_REGION, shared config files, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct SqsConnectConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl SqsConnectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// Create an SQS client from the environment plus optional overrides
pub async fn create_client(config: &SqsConnectConfig) -> aws_sdk_sqs::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.clone());
    }

    let sdk_config = loader.load().await;
    aws_sdk_sqs::Client::new(&sdk_config)
}
