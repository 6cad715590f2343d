// src/constants.rs
//
// Centralized constants for s3acl to avoid hardcoded values throughout the codebase

/// Default number of concurrent ACL updates in a recursive batch
pub const DEFAULT_JOBS: usize = 32;

/// Maximum keys requested per listing page (S3 caps this at 1000)
pub const DEFAULT_LIST_PAGE_SIZE: i32 = 1000;

/// Capacity of the channel carrying per-object outcomes to the aggregator
pub const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Bucket name length bounds, enforced before any remote call
pub const MIN_BUCKET_NAME_LEN: usize = 3;
pub const MAX_BUCKET_NAME_LEN: usize = 63;

/// URI scheme for addressable targets
pub const SCHEME_S3: &str = "s3://";
