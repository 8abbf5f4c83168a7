use admin_ox_common::CommonRequestError;
use reqwest::StatusCode;
use serde::{Serialize, Serializer, ser::SerializeStruct};
use thiserror::Error;

use crate::model::UserId;

/// Errors that can occur when making requests to the users API
#[derive(Debug, Error)]
pub enum UsersRequestError {
    /// Non-success status; `message` is the server's own message when the
    /// error body carried one, a generic `Failed to fetch ...` line otherwise.
    #[error("{message}")]
    Transport { status: StatusCode, message: String },

    /// `GET /users/{id}` answered 404
    #[error("User not found")]
    NotFound { id: UserId },

    /// The request could not complete
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    /// Success status with a body that is not what the API promises
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),

    /// Client could not be configured
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Which read operation failed; names the resource in fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    ListUsers,
    GetUser(UserId),
}

impl Operation {
    /// Resource noun used in `Failed to fetch {noun}: {reason}`.
    fn noun(self) -> &'static str {
        match self {
            Self::ListUsers => "users",
            Self::GetUser(_) => "user",
        }
    }
}

impl UsersRequestError {
    /// Map a transport-level failure for `operation` onto the users taxonomy.
    pub(crate) fn from_common(err: CommonRequestError, operation: Operation) -> Self {
        match (err, operation) {
            (CommonRequestError::Api { status, .. }, Operation::GetUser(id))
                if status == StatusCode::NOT_FOUND =>
            {
                Self::NotFound { id }
            }
            (CommonRequestError::Api { status, message }, _) => {
                let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
                    format!(
                        "Failed to fetch {}: {}",
                        operation.noun(),
                        status.canonical_reason().unwrap_or("Unknown status")
                    )
                });
                Self::Transport { status, message }
            }
            (CommonRequestError::Http(e), _) => Self::Network(e),
            (CommonRequestError::Json(e), _) => Self::UnexpectedResponse(e.to_string()),
            (CommonRequestError::UnexpectedResponse(body), _) => Self::UnexpectedResponse(body),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status behind the error, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Network(e) => e.status(),
            Self::UnexpectedResponse(_) | Self::InvalidConfiguration(_) => None,
        }
    }
}

impl Serialize for UsersRequestError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            UsersRequestError::Transport { status, message } => {
                let mut state = serializer.serialize_struct("UsersRequestError", 3)?;
                state.serialize_field("type", "Transport")?;
                state.serialize_field("status", &status.as_u16())?;
                state.serialize_field("message", message)?;
                state.end()
            }
            UsersRequestError::NotFound { id } => {
                let mut state = serializer.serialize_struct("UsersRequestError", 2)?;
                state.serialize_field("type", "NotFound")?;
                state.serialize_field("id", id)?;
                state.end()
            }
            UsersRequestError::Network(e) => {
                let mut state = serializer.serialize_struct("UsersRequestError", 2)?;
                state.serialize_field("type", "Network")?;
                state.serialize_field("error", &e.to_string())?;
                state.end()
            }
            UsersRequestError::UnexpectedResponse(response) => {
                let mut state = serializer.serialize_struct("UsersRequestError", 2)?;
                state.serialize_field("type", "UnexpectedResponse")?;
                state.serialize_field("response", response)?;
                state.end()
            }
            UsersRequestError::InvalidConfiguration(reason) => {
                let mut state = serializer.serialize_struct("UsersRequestError", 2)?;
                state.serialize_field("type", "InvalidConfiguration")?;
                state.serialize_field("reason", reason)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: StatusCode, message: Option<&str>) -> CommonRequestError {
        CommonRequestError::Api {
            status,
            message: message.map(ToString::to_string),
        }
    }

    #[test]
    fn not_found_only_for_id_lookup() {
        let err = UsersRequestError::from_common(
            api(StatusCode::NOT_FOUND, None),
            Operation::GetUser(UserId(999)),
        );
        assert!(matches!(err, UsersRequestError::NotFound { id: UserId(999) }));
        assert_eq!(err.to_string(), "User not found");

        let err = UsersRequestError::from_common(api(StatusCode::NOT_FOUND, None), Operation::ListUsers);
        assert!(matches!(err, UsersRequestError::Transport { .. }));
        assert_eq!(err.to_string(), "Failed to fetch users: Not Found");
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = UsersRequestError::from_common(
            api(StatusCode::INTERNAL_SERVER_ERROR, Some("database unavailable")),
            Operation::GetUser(UserId(1)),
        );
        assert_eq!(err.to_string(), "database unavailable");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn fallback_names_the_operation() {
        let err = UsersRequestError::from_common(
            api(StatusCode::BAD_GATEWAY, None),
            Operation::GetUser(UserId(1)),
        );
        assert_eq!(err.to_string(), "Failed to fetch user: Bad Gateway");
    }

    #[test]
    fn empty_server_message_uses_fallback() {
        let err = UsersRequestError::from_common(
            api(StatusCode::SERVICE_UNAVAILABLE, Some("")),
            Operation::ListUsers,
        );
        assert_eq!(err.to_string(), "Failed to fetch users: Service Unavailable");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = UsersRequestError::NotFound { id: UserId(5) };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "NotFound", "id": 5 }));
    }
}
