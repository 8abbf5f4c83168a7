use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

use crate::error::QueryResult;
use crate::key::QueryKey;

/// Future shared by every caller of one in-flight key.
type InFlight<T> = Shared<BoxFuture<'static, QueryResult<T>>>;

/// At most one in-flight request per [`QueryKey`].
///
/// A caller whose key is already in flight awaits the existing future instead
/// of starting another one. The entry is dropped once the request settles, so
/// a later call with the same key issues a fresh request. Each request is
/// driven to completion on its own task, which also clears the entry; callers
/// may be dropped at any point without leaving it behind.
pub struct Dedup<T> {
    in_flight: Arc<Mutex<HashMap<QueryKey, InFlight<T>>>>,
}

impl<T> Clone for Dedup<T> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<T> Default for Dedup<T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T> std::fmt::Debug for Dedup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dedup").finish_non_exhaustive()
    }
}

/// Remove `key` if it still maps to `shared`.
async fn release<T>(
    in_flight: &Mutex<HashMap<QueryKey, InFlight<T>>>,
    key: &QueryKey,
    shared: &InFlight<T>,
) {
    let mut in_flight = in_flight.lock().await;
    if in_flight.get(key).is_some_and(|current| current.ptr_eq(shared)) {
        in_flight.remove(key);
    }
}

impl<T> Dedup<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` for `key`, or join the request already in flight for it.
    ///
    /// `fetch` is only called when no request for `key` is pending. Must be
    /// called within a tokio runtime.
    pub async fn run<F, Fut>(&self, key: QueryKey, fetch: F) -> QueryResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = QueryResult<T>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock().await;
            // A settled entry whose cleanup has not run yet is never joined.
            let pending = in_flight
                .get(&key)
                .filter(|existing| existing.peek().is_none())
                .cloned();
            if let Some(existing) = pending {
                log::debug!("joining in-flight query {key}");
                existing
            } else {
                let fut = fetch().boxed().shared();
                in_flight.insert(key.clone(), fut.clone());
                self.drive(key.clone(), fut.clone());
                fut
            }
        };

        let result = shared.clone().await;
        release(&self.in_flight, &key, &shared).await;
        result
    }

    /// Poll `shared` to completion on its own task and clear its entry.
    fn drive(&self, key: QueryKey, shared: InFlight<T>) {
        let in_flight = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let _ = shared.clone().await;
            release(&in_flight, &key, &shared).await;
        });
    }

    /// Number of keys with a request in flight.
    pub async fn in_flight(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
