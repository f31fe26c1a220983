use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Loads the ambient credential chain, pinning the region when one is
/// configured for the function.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
