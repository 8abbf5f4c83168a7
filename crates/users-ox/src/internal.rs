use admin_ox_common::request_builder::{Endpoint, HttpMethod, RequestBuilder, RequestConfig};

use crate::{
    error::{Operation, UsersRequestError},
    model::{User, UserId},
    request::ListFilter,
    response::ListResponse,
};

/// Users client helper methods using the common `RequestBuilder`
#[derive(Debug, Clone)]
pub(crate) struct UsersRequestHelper {
    request_builder: RequestBuilder,
}

impl UsersRequestHelper {
    pub(crate) fn new(client: reqwest::Client, base_url: &str) -> Self {
        let config = RequestConfig::new(base_url)
            .with_header("accept", "application/json")
            .with_user_agent(concat!("users-ox/", env!("CARGO_PKG_VERSION")));

        Self {
            request_builder: RequestBuilder::new(client, config),
        }
    }

    /// `GET /users` with the encoded filter as the query
    pub(crate) async fn list_users(
        &self,
        filter: &ListFilter,
    ) -> Result<ListResponse, UsersRequestError> {
        let endpoint =
            Endpoint::new("users", HttpMethod::Get).with_query_params(filter.to_query_pairs());

        self.request_builder
            .request(&endpoint)
            .await
            .map_err(|e| UsersRequestError::from_common(e, Operation::ListUsers))
    }

    /// `GET /users/{id}`
    pub(crate) async fn get_user(&self, id: UserId) -> Result<User, UsersRequestError> {
        let endpoint = Endpoint::new(format!("users/{id}"), HttpMethod::Get);

        self.request_builder
            .request(&endpoint)
            .await
            .map_err(|e| UsersRequestError::from_common(e, Operation::GetUser(id)))
    }
}
