// src/config.rs
//
// Typed batch options. Validation happens at construction so the engine
// never sees an inconsistent combination.

use crate::acl::Scope;
use crate::constants::DEFAULT_JOBS;
use crate::error::AclError;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub scope: Scope,
    /// Apply to every object under the key prefix instead of one target.
    pub recursive: bool,
    /// Authorize creating a missing bucket before setting its ACL.
    pub force: bool,
    /// Upper bound on concurrent ACL updates in recursive mode.
    pub jobs: usize,
}

impl BatchOptions {
    pub fn new(scope: Scope, recursive: bool, force: bool, jobs: usize) -> Result<Self, AclError> {
        if jobs == 0 {
            return Err(AclError::input("jobs must be at least 1"));
        }
        if scope == Scope::Bucket && recursive {
            return Err(AclError::input(
                "recursive mode applies to objects, not buckets",
            ));
        }
        Ok(BatchOptions {
            scope,
            recursive,
            force,
            jobs,
        })
    }

    /// Options for the common single-object case.
    pub fn object() -> Self {
        BatchOptions {
            scope: Scope::Object,
            recursive: false,
            force: false,
            jobs: DEFAULT_JOBS,
        }
    }

    /// Options for a bucket-scope update.
    pub fn bucket(force: bool) -> Self {
        BatchOptions {
            scope: Scope::Bucket,
            recursive: false,
            force,
            jobs: 1,
        }
    }

    /// A non-recursive object target must name exactly one key.
    pub fn requires_key(&self) -> bool {
        self.scope == Scope::Object && !self.recursive
    }
}
