use std::sync::Arc;

use futures_util::future::try_join4;
use serde::{Deserialize, Serialize};
use users_ox::{ListFilter, ListResponse, User, UserId, UserStatus, UsersApi};

use crate::dedup::Dedup;
use crate::error::{QueryError, QueryResult};
use crate::key::QueryKey;
use crate::query::{Applied, Query};

/// Dashboard counts, one per status plus the overall total.
///
/// Each field comes from its own request, so under concurrent writes on the
/// server `active + inactive + pending` may differ from `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub pending: u64,
}

impl UserStats {
    /// Count reported for `status`.
    #[must_use]
    pub fn count(&self, status: UserStatus) -> u64 {
        match status {
            UserStatus::Active => self.active,
            UserStatus::Inactive => self.inactive,
            UserStatus::Pending => self.pending,
        }
    }
}

/// Number of rows the dashboard's latest-active panel shows.
pub const DEFAULT_LATEST_LIMIT: u32 = 5;

/// Per-operation request deduplication.
#[derive(Debug, Clone, Default)]
struct Inflight {
    lists: Dedup<ListResponse>,
    users: Dedup<User>,
    stats: Dedup<UserStats>,
    latest: Dedup<Vec<User>>,
}

/// Query layer over a [`UsersApi`].
///
/// Every operation is keyed by a [`QueryKey`]; identical calls made while one
/// is pending share a single underlying request. Failures are passed through
/// untouched: no retries, no backoff. Cloning is cheap and clones share the
/// deduplication state.
pub struct QueryClient<A> {
    api: Arc<A>,
    inflight: Inflight,
}

impl<A> Clone for QueryClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            inflight: self.inflight.clone(),
        }
    }
}

impl<A> std::fmt::Debug for QueryClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("inflight", &self.inflight)
            .finish_non_exhaustive()
    }
}

impl<A> QueryClient<A>
where
    A: UsersApi + 'static,
{
    pub fn new(api: A) -> Self {
        Self::from_arc(Arc::new(api))
    }

    pub fn from_arc(api: Arc<A>) -> Self {
        Self {
            api,
            inflight: Inflight::default(),
        }
    }

    /// The wrapped API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// One page of users for `filter`.
    ///
    /// # Errors
    ///
    /// The HTTP-layer error of the underlying request, verbatim.
    pub async fn list_users(&self, filter: &ListFilter) -> QueryResult<ListResponse> {
        let api = Arc::clone(&self.api);
        let owned = filter.clone();
        self.inflight
            .lists
            .run(QueryKey::users(filter), move || async move {
                api.list_users(&owned).await.map_err(QueryError::from)
            })
            .await
    }

    /// A single user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, otherwise the HTTP-layer error verbatim.
    pub async fn get_user(&self, id: UserId) -> QueryResult<User> {
        let api = Arc::clone(&self.api);
        self.inflight
            .users
            .run(QueryKey::user(id), move || async move {
                api.get_user(id).await.map_err(QueryError::from)
            })
            .await
    }

    /// Total and per-status user counts.
    ///
    /// Four count probes run concurrently; if any of them fails the whole
    /// call fails and no partial counts are returned.
    ///
    /// # Errors
    ///
    /// The first probe failure.
    pub async fn user_stats(&self) -> QueryResult<UserStats> {
        let client = self.clone();
        self.inflight
            .stats
            .run(QueryKey::stats(), move || async move { client.fetch_stats().await })
            .await
    }

    /// Newest `limit` active users, in the order the server returned them.
    ///
    /// # Errors
    ///
    /// The HTTP-layer error of the underlying request, verbatim.
    pub async fn latest_active_users(&self, limit: u32) -> QueryResult<Vec<User>> {
        let client = self.clone();
        self.inflight
            .latest
            .run(QueryKey::latest_active(limit), move || async move {
                client
                    .list_users(&ListFilter::latest_active(limit))
                    .await
                    .map(|page| page.items)
            })
            .await
    }

    /// Fan out the four count probes and combine their totals.
    async fn fetch_stats(&self) -> QueryResult<UserStats> {
        let [active, inactive, pending] =
            UserStatus::ALL.map(|status| ListFilter::count_probe(Some(status)));
        let all = ListFilter::count_probe(None);

        let (all, active, inactive, pending) = try_join4(
            self.list_users(&all),
            self.list_users(&active),
            self.list_users(&inactive),
            self.list_users(&pending),
        )
        .await?;

        let stats = UserStats {
            total: all.total(),
            active: active.total(),
            inactive: inactive.total(),
            pending: pending.total(),
        };

        let summed = stats.active + stats.inactive + stats.pending;
        if summed != stats.total {
            log::debug!(
                "status counts sum to {summed} but total is {}; counts were read non-atomically",
                stats.total
            );
        }

        Ok(stats)
    }

    /// Run [`QueryClient::list_users`] for `filter` and publish it into `query`.
    pub async fn watch_users(&self, query: &Query<ListResponse>, filter: &ListFilter) -> Applied {
        query
            .run(QueryKey::users(filter), self.list_users(filter))
            .await
    }

    /// Run [`QueryClient::get_user`] and publish it into `query`.
    pub async fn watch_user(&self, query: &Query<User>, id: UserId) -> Applied {
        query.run(QueryKey::user(id), self.get_user(id)).await
    }

    /// Run [`QueryClient::user_stats`] and publish it into `query`.
    pub async fn watch_stats(&self, query: &Query<UserStats>) -> Applied {
        query.run(QueryKey::stats(), self.user_stats()).await
    }

    /// Run [`QueryClient::latest_active_users`] and publish it into `query`.
    pub async fn watch_latest_active(&self, query: &Query<Vec<User>>, limit: u32) -> Applied {
        query
            .run(QueryKey::latest_active(limit), self.latest_active_users(limit))
            .await
    }
}
