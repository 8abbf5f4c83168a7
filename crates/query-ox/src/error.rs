use std::sync::Arc;

use thiserror::Error;
use users_ox::UsersRequestError;

/// Failure of a query, shared verbatim with every caller that joined it.
///
/// The underlying [`UsersRequestError`] is not `Clone` (it can hold a
/// `reqwest::Error`), so it is kept behind an `Arc`.
#[derive(Debug, Clone, Error)]
#[error(transparent)]
pub struct QueryError(Arc<UsersRequestError>);

impl QueryError {
    /// The HTTP-layer error, unchanged.
    #[must_use]
    pub fn inner(&self) -> &UsersRequestError {
        &self.0
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.0.is_not_found()
    }
}

impl From<UsersRequestError> for QueryError {
    fn from(err: UsersRequestError) -> Self {
        Self(Arc::new(err))
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
