#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client abstractions for the admin-ox API clients
//!
//! This crate holds the request plumbing every admin-ox client needs: joining a
//! base URL with an endpoint path, attaching query pairs and headers, decoding
//! JSON bodies and turning non-success statuses into a typed error that still
//! carries the server's own message.

pub mod error;
pub mod request_builder;

pub use error::{CommonRequestError, parse_error_response};
pub use request_builder::{Endpoint, HttpMethod, RequestBuilder, RequestConfig};

/// Re-export common types for convenience
pub use serde::{Deserialize, Serialize};
