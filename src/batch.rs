//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// src/batch.rs
//! The set-ACL engine: entry validation, the bucket existence guard, and a
//! bounded worker pool feeding a single aggregation point.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::acl::{CannedAcl, Scope};
use crate::config::BatchOptions;
use crate::constants::OUTCOME_CHANNEL_CAPACITY;
use crate::error::AclError;
use crate::lister::{KeyStream, key_stream, single_key};
use crate::progress::ProgressCallback;
use crate::store::AclStore;
use crate::uri::CloudUri;

/// Result of a completed run: how many keys the enumerator produced, how
/// many updates were applied, and how long the work took. `matched == 0` is
/// a legitimate outcome for a prefix nothing lives under.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub matched: usize,
    pub updated: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn nothing_matched(&self) -> bool {
        self.matched == 0
    }
}

/// Per-key result delivered to the aggregation point.
struct Outcome {
    key: String,
    result: Result<(), AclError>,
}

pub struct SetAclEngine {
    store: Arc<dyn AclStore>,
    progress: Option<Arc<ProgressCallback>>,
}

impl SetAclEngine {
    pub fn new(store: Arc<dyn AclStore>) -> Self {
        Self {
            store,
            progress: None,
        }
    }

    /// Attach a callback invoked once per finished object update.
    pub fn with_progress(mut self, progress: Arc<ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Apply `acl` to the target described by `uri` and `opts`: the bucket
    /// itself, one object, or every object under the key prefix.
    pub async fn run(
        &self,
        uri: &CloudUri,
        acl: CannedAcl,
        opts: &BatchOptions,
    ) -> Result<BatchSummary, AclError> {
        validate(uri, acl, opts)?;
        let started = Instant::now();

        let (matched, updated) = match opts.scope {
            Scope::Bucket => {
                self.set_bucket(uri, acl, opts).await?;
                (1, 1)
            }
            Scope::Object => {
                let keys = if opts.recursive {
                    key_stream(self.store.clone(), uri.bucket.clone(), uri.key.clone())
                } else {
                    single_key(uri.key.clone())
                };
                self.dispatch(&uri.bucket, keys, acl, opts.jobs, !opts.recursive)
                    .await?
            }
        };

        Ok(BatchSummary {
            matched,
            updated,
            elapsed: started.elapsed(),
        })
    }

    /// Bucket path: existence guard, then one ACL call. A missing bucket is
    /// only created when `force` authorizes it.
    async fn set_bucket(
        &self,
        uri: &CloudUri,
        acl: CannedAcl,
        opts: &BatchOptions,
    ) -> Result<(), AclError> {
        if !self.store.bucket_exists(&uri.bucket).await? {
            if !opts.force {
                return Err(AclError::not_found(format!("bucket '{}'", uri.bucket)));
            }
            info!("creating missing bucket {}", uri.bucket);
            self.store.create_bucket(&uri.bucket).await?;
        }
        self.store.set_bucket_acl(&uri.bucket, acl).await
    }

    /// Object path: admit keys from the enumerator under a semaphore, spawn
    /// one task per key, and drain every outcome over a channel. Per-item
    /// failures never halt siblings; an enumerator failure stops admission,
    /// lets in-flight updates finish, then fails the run.
    async fn dispatch(
        &self,
        bucket: &str,
        mut keys: KeyStream,
        acl: CannedAcl,
        jobs: usize,
        single: bool,
    ) -> Result<(usize, usize), AclError> {
        let (tx, mut rx) = mpsc::channel::<Outcome>(OUTCOME_CHANNEL_CAPACITY);
        let sem = Arc::new(Semaphore::new(jobs));
        let store = self.store.clone();
        let bucket_name = bucket.to_string();

        // Producer task. Dropping `tx` when it returns closes the channel
        // once the last in-flight worker has reported.
        let producer = tokio::spawn(async move {
            let mut dispatched = 0usize;
            let mut listing_error: Option<AclError> = None;
            while let Some(item) = keys.next().await {
                let key = match item {
                    Ok(k) => k,
                    Err(e) => {
                        listing_error = Some(e);
                        break;
                    }
                };
                let permit = sem.clone().acquire_owned().await.unwrap();
                let store = store.clone();
                let bucket = bucket_name.clone();
                let tx = tx.clone();
                dispatched += 1;
                tokio::spawn(async move {
                    let _permit = permit;
                    let result = store.set_object_acl(&bucket, &key, acl).await;
                    tx.send(Outcome { key, result }).await.ok();
                });
            }
            (dispatched, listing_error)
        });

        // Single aggregation point: every dispatched key reports exactly once.
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut first_error: Option<AclError> = None;
        while let Some(outcome) = rx.recv().await {
            match outcome.result {
                Ok(()) => {
                    succeeded += 1;
                    debug!("set acl on {}", outcome.key);
                }
                Err(e) => {
                    failed += 1;
                    warn!("{}: {}", outcome.key, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
            if let Some(p) = &self.progress {
                p.object_completed();
            }
        }

        let (dispatched, listing_error) = producer
            .await
            .map_err(|e| AclError::remote("list", format!("s3://{}", bucket), e.into()))?;
        debug_assert_eq!(succeeded + failed, dispatched);

        if let Some(e) = listing_error {
            return Err(e);
        }
        if failed > 0 {
            return Err(match first_error {
                // A single-target run surfaces its one failure unwrapped.
                Some(e) if single => e,
                Some(e) => AclError::Partial {
                    failed,
                    succeeded,
                    attempted: dispatched,
                    first: e.to_string(),
                },
                None => AclError::Partial {
                    failed,
                    succeeded,
                    attempted: dispatched,
                    first: String::new(),
                },
            });
        }
        Ok((dispatched, succeeded))
    }
}

/// Every rule here fires before the first remote call, whatever path the
/// inputs took to get here.
fn validate(uri: &CloudUri, acl: CannedAcl, opts: &BatchOptions) -> Result<(), AclError> {
    if opts.jobs == 0 {
        return Err(AclError::input("jobs must be at least 1"));
    }
    match opts.scope {
        Scope::Bucket => {
            if opts.recursive {
                return Err(AclError::input(
                    "recursive mode applies to objects, not buckets",
                ));
            }
            if uri.has_key() {
                return Err(AclError::input(format!(
                    "'{}' names an object but the target is a bucket ACL",
                    uri
                )));
            }
            if acl == CannedAcl::Default {
                return Err(AclError::input(
                    "ACL 'default' applies to objects, not buckets",
                ));
            }
        }
        Scope::Object => {
            if opts.requires_key() && !uri.has_key() {
                return Err(AclError::input(format!(
                    "'{}' names no object; pass a key or use recursive mode",
                    uri
                )));
            }
        }
    }
    Ok(())
}
