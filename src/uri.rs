//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// src/uri.rs
//! Parsing and local validation of `s3://bucket[/key]` locators.
//!
//! Everything here runs before the first remote call, so a malformed
//! locator never costs a network round trip.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MAX_BUCKET_NAME_LEN, MIN_BUCKET_NAME_LEN, SCHEME_S3};
use crate::error::AclError;

/// Bucket names: lowercase letters, digits and interior hyphens, beginning
/// and ending with a letter or digit.
static BUCKET_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap());

/// A parsed `s3://bucket[/key]` locator. `key` is empty when the URI names
/// a bucket, or serves as a whole-bucket prefix in recursive mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudUri {
    pub bucket: String,
    pub key: String,
}

impl CloudUri {
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    fn validate_bucket(bucket: &str) -> Result<(), AclError> {
        if bucket.is_empty() {
            return Err(AclError::input("URI is missing a bucket name"));
        }
        if bucket.len() < MIN_BUCKET_NAME_LEN || bucket.len() > MAX_BUCKET_NAME_LEN {
            return Err(AclError::input(format!(
                "invalid bucket name '{}': length must be {}-{} characters",
                bucket, MIN_BUCKET_NAME_LEN, MAX_BUCKET_NAME_LEN
            )));
        }
        if !BUCKET_NAME_RE.is_match(bucket) {
            return Err(AclError::input(format!(
                "invalid bucket name '{}': lowercase letters, digits and interior hyphens only",
                bucket
            )));
        }
        Ok(())
    }
}

impl FromStr for CloudUri {
    type Err = AclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(SCHEME_S3).ok_or_else(|| {
            AclError::input(format!("URI '{}' must start with {}", s, SCHEME_S3))
        })?;
        let (bucket, key) = match rest.split_once('/') {
            Some((b, k)) => (b, k),
            None => (rest, ""),
        };
        Self::validate_bucket(bucket)?;
        if key.starts_with('/') {
            return Err(AclError::input(format!(
                "invalid key '{}': keys must not begin with '/'",
                key
            )));
        }
        Ok(CloudUri {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for CloudUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}{}", SCHEME_S3, self.bucket)
        } else {
            write!(f, "{}{}/{}", SCHEME_S3, self.bucket, self.key)
        }
    }
}
