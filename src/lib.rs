// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! s3acl: batch canned-ACL management for S3-compatible object stores.
//!
//! Parse a locator, validate a policy, then apply it to a bucket, a single
//! object, or every object under a prefix with bounded concurrency.

pub mod acl;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod lister;
pub mod progress;
pub mod s3_client;
pub mod s3_store;
pub mod store;
pub mod uri;

// Curated public surface.
pub use acl::{CannedAcl, Scope};
pub use batch::{BatchSummary, SetAclEngine};
pub use config::BatchOptions;
pub use error::AclError;
pub use store::{AclStore, ListPage, TargetStat};
pub use uri::CloudUri;
