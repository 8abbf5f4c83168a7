#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Query layer for the admin users API
//!
//! [`QueryClient`] wraps any [`users_ox::UsersApi`] and gives views two ways
//! in: plain async functions (`list_users`, `get_user`, `user_stats`,
//! `latest_active_users`) and observable [`Query`] handles fed by the
//! `watch_*` methods.
//!
//! Two guarantees hold:
//!
//! - at most one request per [`QueryKey`] is in flight; concurrent identical
//!   calls share it;
//! - a [`Query`] only shows the outcome of its most recently started request,
//!   whatever order responses arrive in.
//!
//! ```rust,no_run
//! use query_ox::{Query, QueryClient};
//! use users_ox::{ListViewState, Users};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = QueryClient::new(Users::from_env()?);
//!
//! let stats = client.user_stats().await?;
//! println!("{} users, {} active", stats.total, stats.active);
//!
//! let view = ListViewState::from_query("status=pending&page=2");
//! let list = Query::new();
//! client.watch_users(&list, &view.to_filter()).await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod dedup;
pub mod error;
pub mod key;
pub mod query;

pub use client::{DEFAULT_LATEST_LIMIT, QueryClient, UserStats};
pub use dedup::Dedup;
pub use error::{QueryError, QueryResult};
pub use key::QueryKey;
pub use query::{Applied, ItemCount, Presentation, Query, QueryState};
