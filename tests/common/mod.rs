// tests/common/mod.rs
//
// In-memory `AclStore` for the integration tests. Tracks canned-ACL tokens
// per bucket and object, serves listings in configurable page sizes, and
// can inject listing or per-key failures. Every remote call is journaled so
// tests can assert that nothing was called.

#![allow(dead_code)] // not every test binary uses every helper

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use s3acl::acl::CannedAcl;
use s3acl::error::AclError;
use s3acl::store::{AclStore, ListPage, TargetStat};
use s3acl::uri::CloudUri;

#[derive(Default)]
struct BucketState {
    acl: String,
    objects: BTreeMap<String, String>,
}

#[derive(Default)]
struct Inner {
    buckets: BTreeMap<String, BucketState>,
    calls: Vec<String>,
    pages_served: usize,
}

pub struct MemoryAclStore {
    inner: Mutex<Inner>,
    page_size: usize,
    /// Fail `list_page` once this many pages have been served.
    fail_listing_after: Option<usize>,
    fail_keys: BTreeSet<String>,
}

impl MemoryAclStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            page_size: 1000,
            fail_listing_after: None,
            fail_keys: BTreeSet::new(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn fail_listing_after(mut self, pages: usize) -> Self {
        self.fail_listing_after = Some(pages);
        self
    }

    pub fn fail_key(mut self, key: &str) -> Self {
        self.fail_keys.insert(key.to_string());
        self
    }

    /// Seed a bucket directly, bypassing the call journal. New buckets
    /// start out private.
    pub fn seed_bucket(&self, bucket: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.buckets.insert(
            bucket.to_string(),
            BucketState {
                acl: "private".to_string(),
                objects: BTreeMap::new(),
            },
        );
    }

    /// Seed an object directly. Fresh objects defer to the bucket ACL.
    pub fn seed_object(&self, bucket: &str, key: &str) {
        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .buckets
            .get_mut(bucket)
            .unwrap_or_else(|| panic!("seed_object: no bucket {bucket}"));
        state
            .objects
            .insert(key.to_string(), "default".to_string());
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.inner.lock().unwrap().buckets.contains_key(bucket)
    }

    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .buckets
            .get(bucket)
            .map(|b| b.objects.contains_key(key))
            .unwrap_or(false)
    }

    pub fn bucket_acl(&self, bucket: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.buckets.get(bucket).map(|b| b.acl.clone())
    }

    pub fn object_acl(&self, bucket: &str, key: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .buckets
            .get(bucket)
            .and_then(|b| b.objects.get(key).cloned())
    }

    /// Journal of every remote call, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("head_bucket {bucket}"));
        Ok(inner.buckets.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("create_bucket {bucket}"));
        inner
            .buckets
            .entry(bucket.to_string())
            .or_insert_with(|| BucketState {
                acl: "private".to_string(),
                objects: BTreeMap::new(),
            });
        Ok(())
    }

    async fn set_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<(), AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("set_bucket_acl {bucket} {acl}"));
        let state = inner
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| AclError::not_found(format!("bucket '{bucket}'")))?;
        state.acl = acl.to_string();
        Ok(())
    }

    async fn set_object_acl(
        &self,
        bucket: &str,
        key: &str,
        acl: CannedAcl,
    ) -> Result<(), AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(format!("set_object_acl {bucket} {key} {acl}"));
        if self.fail_keys.contains(key) {
            return Err(AclError::remote(
                "put_object_acl",
                format!("s3://{bucket}/{key}"),
                anyhow!("injected failure"),
            ));
        }
        let state = inner
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| AclError::not_found(format!("bucket '{bucket}'")))?;
        match state.objects.get_mut(key) {
            Some(slot) => {
                *slot = acl.to_string();
                Ok(())
            }
            None => Err(AclError::not_found(format!("s3://{bucket}/{key}"))),
        }
    }

    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListPage, AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("list {bucket} {prefix}"));
        if let Some(limit) = self.fail_listing_after {
            if inner.pages_served >= limit {
                return Err(AclError::remote(
                    "list_objects_v2",
                    format!("s3://{bucket}/{prefix}"),
                    anyhow!("listing interrupted"),
                ));
            }
        }
        inner.pages_served += 1;
        let state = inner
            .buckets
            .get(bucket)
            .ok_or_else(|| AclError::not_found(format!("bucket '{bucket}'")))?;

        let matching: Vec<String> = state
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        let start: usize = token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let keys: Vec<String> = matching
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let next = if start + keys.len() < matching.len() {
            Some((start + keys.len()).to_string())
        } else {
            None
        };
        Ok(ListPage { keys, next })
    }

    async fn stat(&self, bucket: &str, key: Option<&str>) -> Result<TargetStat, AclError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("stat {bucket} {key:?}"));
        let state = inner
            .buckets
            .get(bucket)
            .ok_or_else(|| AclError::not_found(format!("bucket '{bucket}'")))?;
        let acl = match key {
            None => state.acl.clone(),
            Some(k) => state
                .objects
                .get(k)
                .cloned()
                .ok_or_else(|| AclError::not_found(format!("s3://{bucket}/{k}")))?,
        };
        Ok(TargetStat {
            acl,
            owner: Some("memory-store".to_string()),
        })
    }
}

pub fn uri(s: &str) -> CloudUri {
    s.parse().unwrap()
}
