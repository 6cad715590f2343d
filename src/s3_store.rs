//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// src/s3_store.rs
//! `AclStore` adapter for S3 and S3-compatible services.

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types::{BucketCannedAcl, Grant, ObjectCannedAcl, Permission};
use tracing::debug;

use crate::acl::CannedAcl;
use crate::constants::DEFAULT_LIST_PAGE_SIZE;
use crate::error::AclError;
use crate::s3_client::build_client;
use crate::store::{AclStore, ListPage, TargetStat};

const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

pub struct S3AclStore {
    client: Client,
}

impl S3AclStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a store from the process environment (credentials, region,
    /// optional custom endpoint).
    pub async fn from_env() -> Result<Self> {
        Ok(Self {
            client: build_client().await?,
        })
    }
}

/// Sort an SDK failure into the error taxonomy: the codes that mean "the
/// target is not there" become `NotFound`, everything else `Remote`.
fn classify<E>(op: &'static str, target: String, err: E) -> AclError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err.code() {
        Some("NoSuchBucket") | Some("NoSuchKey") | Some("NotFound") => AclError::not_found(target),
        _ => AclError::remote(op, target, err.into()),
    }
}

/// Collapse a grant list to the canned token it amounts to. Only the
/// AllUsers group grants distinguish the public policies.
fn canned_from_grants(grants: &[Grant]) -> &'static str {
    let mut public_read = false;
    let mut public_write = false;
    for grant in grants {
        let all_users = grant
            .grantee()
            .and_then(|g| g.uri())
            .map(|uri| uri == ALL_USERS_URI)
            .unwrap_or(false);
        if !all_users {
            continue;
        }
        match grant.permission() {
            Some(Permission::Read) => public_read = true,
            Some(Permission::Write) => public_write = true,
            _ => {}
        }
    }
    if public_read && public_write {
        "public-read-write"
    } else if public_read {
        "public-read"
    } else {
        "private"
    }
}

/// `default` never reaches bucket scope; the validator rejects it first and
/// this adapter refuses it again rather than sending a bogus header.
fn bucket_canned(acl: CannedAcl) -> Result<BucketCannedAcl, AclError> {
    match acl {
        CannedAcl::Default => Err(AclError::input(
            "ACL 'default' applies to objects, not buckets",
        )),
        other => Ok(BucketCannedAcl::from(other.as_str())),
    }
}

#[async_trait]
impl AclStore for S3AclStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, AclError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(ctx)) if ctx.err().is_not_found() => Ok(false),
            Err(e) => Err(classify("head_bucket", format!("s3://{}", bucket), e)),
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), AclError> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {
                debug!("created bucket {}", bucket);
                Ok(())
            }
            Err(e) => match e.code() {
                // Recreating a bucket we already own is fine.
                Some("BucketAlreadyOwnedByYou") | Some("BucketAlreadyExists") => Ok(()),
                _ => Err(classify("create_bucket", format!("s3://{}", bucket), e)),
            },
        }
    }

    async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<(), AclError> {
        let canned = bucket_canned(acl)?;
        self.client
            .put_bucket_acl()
            .bucket(bucket)
            .acl(canned)
            .send()
            .await
            .map_err(|e| classify("put_bucket_acl", format!("s3://{}", bucket), e))?;
        debug!("put_bucket_acl {} {}", bucket, acl);
        Ok(())
    }

    async fn set_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: CannedAcl,
    ) -> Result<(), AclError> {
        // SDK enums carry unknown tokens through as-is, which is how the
        // OSS-style `default` policy goes on the wire.
        self.client
            .put_object_acl()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::from(acl.as_str()))
            .send()
            .await
            .map_err(|e| classify("put_object_acl", format!("s3://{}/{}", bucket, key), e))?;
        Ok(())
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListPage, AclError> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .max_keys(DEFAULT_LIST_PAGE_SIZE);
        if let Some(t) = token {
            req = req.continuation_token(t);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| classify("list_objects_v2", format!("s3://{}/{}", bucket, prefix), e))?;

        let keys = resp
            .contents()
            .iter()
            .filter_map(|o| o.key().map(str::to_string))
            .collect();
        let next = resp.next_continuation_token().map(str::to_string);
        Ok(ListPage { keys, next })
    }

    async fn stat(&self, bucket: &str, key: Option<&str>) -> Result<TargetStat, AclError> {
        match key {
            Some(k) => {
                let out = self
                    .client
                    .get_object_acl()
                    .bucket(bucket)
                    .key(k)
                    .send()
                    .await
                    .map_err(|e| {
                        classify("get_object_acl", format!("s3://{}/{}", bucket, k), e)
                    })?;
                Ok(TargetStat {
                    acl: canned_from_grants(out.grants()).to_string(),
                    owner: out
                        .owner()
                        .and_then(|o| o.display_name().or_else(|| o.id()))
                        .map(str::to_string),
                })
            }
            None => {
                let out = self
                    .client
                    .get_bucket_acl()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| classify("get_bucket_acl", format!("s3://{}", bucket), e))?;
                Ok(TargetStat {
                    acl: canned_from_grants(out.grants()).to_string(),
                    owner: out
                        .owner()
                        .and_then(|o| o.display_name().or_else(|| o.id()))
                        .map(str::to_string),
                })
            }
        }
    }
}
