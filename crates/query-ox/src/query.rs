use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use users_ox::{ListResponse, User};

use crate::error::{QueryError, QueryResult};
use crate::key::QueryKey;

/// Lifecycle of one observed query: `Idle -> Loading -> Success | Error`.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Idle,
    Loading,
    Success(T),
    Error(QueryError),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> QueryState<T> {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Something with a row count, so an empty success can be told apart.
pub trait ItemCount {
    fn item_count(&self) -> usize;
}

impl<T> ItemCount for Vec<T> {
    fn item_count(&self) -> usize {
        self.len()
    }
}

impl ItemCount for ListResponse {
    fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl ItemCount for User {
    fn item_count(&self) -> usize {
        1
    }
}

/// What a view should render for a query. A failure and an empty result are
/// distinct variants and must be shown differently.
#[derive(Debug)]
pub enum Presentation<'a, T> {
    Idle,
    Loading,
    Failed(&'a QueryError),
    Empty,
    Ready(&'a T),
}

impl<T: ItemCount> QueryState<T> {
    #[must_use]
    pub fn presentation(&self) -> Presentation<'_, T> {
        match self {
            Self::Idle => Presentation::Idle,
            Self::Loading => Presentation::Loading,
            Self::Error(err) => Presentation::Failed(err),
            Self::Success(data) if data.item_count() == 0 => Presentation::Empty,
            Self::Success(data) => Presentation::Ready(data),
        }
    }
}

/// Whether a finished request was allowed to update the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The request was the latest one; its outcome is now the state.
    Current,
    /// A newer request started meanwhile; the outcome was dropped.
    Stale,
}

/// Shared part of a [`Query`] handle.
#[derive(Debug)]
struct Inner<T> {
    state: watch::Sender<QueryState<T>>,
    generation: AtomicU64,
    key: Mutex<Option<QueryKey>>,
}

/// Observable, staleness-guarded holder of one query's state.
///
/// Each [`Query::run`] takes a new generation number. When its request
/// settles, the outcome is published only if no later `run` has started,
/// so a slow response for an abandoned key never overwrites a newer one.
/// Superseded requests are not cancelled.
#[derive(Debug)]
pub struct Query<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Query<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(QueryState::Idle);
        Self {
            inner: Arc::new(Inner {
                state,
                generation: AtomicU64::new(0),
                key: Mutex::new(None),
            }),
        }
    }

    /// Receiver notified on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.inner.state.subscribe()
    }

    /// Key of the most recently started request.
    pub fn current_key(&self) -> Option<QueryKey> {
        self.inner
            .key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests started so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Start a request for `key` and publish its outcome unless superseded.
    pub async fn run<Fut>(&self, key: QueryKey, fetch: Fut) -> Applied
    where
        Fut: Future<Output = QueryResult<T>>,
    {
        let generation = {
            let mut current = self
                .inner
                .key
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *current = Some(key.clone());
            self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        self.inner.state.send_if_modified(|state| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = QueryState::Loading;
            true
        });

        let outcome = fetch.await;

        let applied = self.inner.state.send_if_modified(move |state| {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = match outcome {
                Ok(data) => QueryState::Success(data),
                Err(err) => QueryState::Error(err),
            };
            true
        });

        if applied {
            Applied::Current
        } else {
            log::debug!("discarding stale result for {key} (generation {generation})");
            Applied::Stale
        }
    }
}

impl<T: Clone> Query<T> {
    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState<T> {
        self.inner.state.borrow().clone()
    }
}
