// src/lister.rs
//
// Lazy key enumeration. Pages are pulled only as the stream is consumed, so
// a batch that stops early never lists past what it used.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::try_stream;
use futures_core::Stream;

use crate::error::AclError;
use crate::store::AclStore;

pub type KeyStream = Pin<Box<dyn Stream<Item = Result<String, AclError>> + Send>>;

/// Stream every key under `prefix`, walking continuation tokens until the
/// service reports the final page. An empty prefix enumerates the whole
/// bucket. A listing failure surfaces in-stream and ends it.
pub fn key_stream(store: Arc<dyn AclStore>, bucket: String, prefix: String) -> KeyStream {
    Box::pin(try_stream! {
        let mut token: Option<String> = None;
        loop {
            let page = store.list_page(&bucket, &prefix, token.as_deref()).await?;
            for key in page.keys {
                yield key;
            }
            match page.next {
                Some(t) => token = Some(t),
                None => break,
            }
        }
    })
}

/// A one-element stream for single-object targets. No listing call is made;
/// a nonexistent key is only discovered by the mutation itself.
pub fn single_key(key: String) -> KeyStream {
    Box::pin(futures_util::stream::iter([Ok::<_, AclError>(key)]))
}
