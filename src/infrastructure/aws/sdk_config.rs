use aws_config::{BehaviorVersion, SdkConfig};
use tracing::info;

use crate::config::config_model::Aws;

/// Shared SDK configuration. Region and credentials come from the default provider chain;
/// `base_endpoint` points every client at a single emulator such as LocalStack.
pub async fn load(aws: &Aws) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(endpoint) = &aws.base_endpoint {
        info!(%endpoint, "aws: using custom base endpoint");
        loader = loader.endpoint_url(endpoint.trim_end_matches('/'));
    }

    loader.load().await
}
