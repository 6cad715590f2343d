// src/store.rs
//
// Remote capability surface the ACL engine drives. One production adapter
// (S3-compatible, src/s3_store.rs) and the in-memory test double implement
// it; everything the engine touches remotely goes through this trait.

use async_trait::async_trait;

use crate::acl::CannedAcl;
use crate::error::AclError;

/// One page of a key listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Continuation token for the next page, when the service reported one.
    pub next: Option<String>,
}

/// ACL state of a bucket or object, as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetStat {
    /// Canned token the current grants amount to.
    pub acl: String,
    pub owner: Option<String>,
}

/// Minimal remote surface needed to set canned ACLs in bulk.
#[async_trait]
pub trait AclStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, AclError>;

    /// Create `bucket`; creating a bucket that already belongs to the caller
    /// is not an error.
    async fn create_bucket(&self, bucket: &str) -> Result<(), AclError>;

    async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<(), AclError>;

    async fn set_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: CannedAcl,
    ) -> Result<(), AclError>;

    /// Fetch one listing page of keys under `prefix`, resuming from `token`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListPage, AclError>;

    /// Report the current ACL of a bucket (`key` is `None`) or an object.
    async fn stat(&self, bucket: &str, key: Option<&str>) -> Result<TargetStat, AclError>;
}
