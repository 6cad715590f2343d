// src/s3_client.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Builds the S3 client from the environment. Callers own the returned
//! client; there is no process-global instance.

use std::env;
use std::time::Duration;

use anyhow::{Result, bail};
use aws_config::meta::region::RegionProviderChain;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_s3::{Client, config::Region};
use tracing::debug;

// -----------------------------------------------------------------------------
// Constants
// -----------------------------------------------------------------------------
pub const DEFAULT_REGION: &str = "us-east-1";

/// Build an S3 client honoring `AWS_REGION`, `AWS_ENDPOINT_URL` and the
/// usual credential variables. Path-style addressing is forced so
/// S3-compatible services behind custom endpoints resolve correctly.
pub async fn build_client() -> Result<Client> {
    dotenvy::dotenv().ok();

    if env::var("AWS_ACCESS_KEY_ID").is_err() || env::var("AWS_SECRET_ACCESS_KEY").is_err() {
        bail!("Missing AWS_ACCESS_KEY_ID or AWS_SECRET_ACCESS_KEY");
    }

    // Region & optional endpoint
    let region = RegionProviderChain::first_try(env::var("AWS_REGION").ok().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader =
        aws_config::defaults(aws_config::BehaviorVersion::v2025_08_07()).region(region);
    if let Ok(endpoint) = env::var("AWS_ENDPOINT_URL") {
        if !endpoint.is_empty() {
            debug!("using custom endpoint {}", endpoint);
            loader = loader.endpoint_url(endpoint);
        }
    }

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(5))
        .build();
    let cfg = loader.timeout_config(timeout_config).load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&cfg)
        .force_path_style(true)
        .build();
    Ok(Client::from_conf(s3_config))
}
