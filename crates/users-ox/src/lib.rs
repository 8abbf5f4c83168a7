#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Typed client for the admin users API
//!
//! Two read operations are exposed, `GET /users` with a structured
//! [`ListFilter`] and `GET /users/{id}`. Each performs exactly one round trip,
//! never retries and keeps no local state. The crate also carries the display
//! helpers and URL view-state codec the admin views are built on.
//!
//! # Example
//!
//! ```rust,no_run
//! use users_ox::{ListFilter, UserStatus, Users};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let users = Users::from_env()?;
//!
//!     let filter = ListFilter::builder()
//!         .page(1)
//!         .page_size(20)
//!         .status(UserStatus::Active)
//!         .build();
//!
//!     let page = users.list_users(&filter).await?;
//!     println!("{} of {} users", page.items.len(), page.pagination.total);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod format;
mod internal;
pub mod model;
pub mod request;
pub mod response;
pub mod view_state;

pub use error::UsersRequestError;
pub use model::{Account, Address, User, UserId, UserStatus};
pub use request::{ListFilter, SortBy, SortDirection};
pub use response::{ListResponse, Pagination};
pub use view_state::{ListViewState, StatusFilter};

use async_trait::async_trait;
use bon::Builder;
#[cfg(feature = "leaky-bucket")]
use leaky_bucket::RateLimiter;
#[cfg(feature = "leaky-bucket")]
use std::sync::Arc;

use crate::internal::UsersRequestHelper;

pub const BASE_URL: &str = "http://localhost:50000";

/// Environment variable `Users::from_env` reads the base URL from.
pub const BASE_URL_ENV: &str = "USERS_API_URL";

/// Read side of the users API.
///
/// This is the seam query layers depend on, so they can be driven by the HTTP
/// client or by an in-memory double.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// One page of users matching `filter`.
    async fn list_users(&self, filter: &ListFilter) -> Result<ListResponse, UsersRequestError>;

    /// A single user; a 404 is reported as [`UsersRequestError::NotFound`].
    async fn get_user(&self, id: UserId) -> Result<User, UsersRequestError>;
}

#[derive(Debug, Clone, Builder)]
pub struct Users {
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[cfg(feature = "leaky-bucket")]
    pub(crate) leaky_bucket: Option<Arc<RateLimiter>>,
}

impl Default for Users {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Users {
    /// Create a new users client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from `USERS_API_URL`, falling back to [`BASE_URL`].
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when the variable is set but is not valid
    /// unicode or not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, UsersRequestError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) => {
                let url = url::Url::parse(&value).map_err(|e| {
                    UsersRequestError::InvalidConfiguration(format!("{BASE_URL_ENV}={value}: {e}"))
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(UsersRequestError::InvalidConfiguration(format!(
                        "{BASE_URL_ENV}={value}: unsupported scheme {}",
                        url.scheme()
                    )));
                }
                log::debug!("users API base URL from {BASE_URL_ENV}: {value}");
                Ok(Self::new(value))
            }
            Err(std::env::VarError::NotPresent) => {
                log::debug!("{BASE_URL_ENV} not set, using {BASE_URL}");
                Ok(Self::default())
            }
            Err(e) => Err(UsersRequestError::InvalidConfiguration(format!(
                "{BASE_URL_ENV}: {e}"
            ))),
        }
    }

    /// Base URL for the API
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create request helper for internal use
    fn request_helper(&self) -> UsersRequestHelper {
        UsersRequestHelper::new(self.client.clone(), &self.base_url)
    }

    /// Wait for the rate limiter, if one is configured
    async fn throttle(&self) {
        #[cfg(feature = "leaky-bucket")]
        if let Some(ref limiter) = self.leaky_bucket {
            limiter.acquire_one().await;
        }
    }

    /// List one page of users.
    ///
    /// # Errors
    ///
    /// `Transport` for any non-success status, `Network` when the request
    /// cannot complete, `UnexpectedResponse` for an undecodable body.
    pub async fn list_users(&self, filter: &ListFilter) -> Result<ListResponse, UsersRequestError> {
        self.throttle().await;
        self.request_helper().list_users(filter).await
    }

    /// Fetch one user by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for a 404, otherwise as [`Users::list_users`].
    pub async fn get_user(&self, id: UserId) -> Result<User, UsersRequestError> {
        self.throttle().await;
        self.request_helper().get_user(id).await
    }
}

#[async_trait]
impl UsersApi for Users {
    async fn list_users(&self, filter: &ListFilter) -> Result<ListResponse, UsersRequestError> {
        Users::list_users(self, filter).await
    }

    async fn get_user(&self, id: UserId) -> Result<User, UsersRequestError> {
        Users::get_user(self, id).await
    }
}
