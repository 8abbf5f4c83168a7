use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::model::UserStatus;

/// Largest page the users API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when nothing else is asked for.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
pub enum SortBy {
    #[serde(rename = "createdAt")]
    #[strum(serialize = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    #[strum(serialize = "updatedAt")]
    UpdatedAt,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parameters of one `GET /users` call.
///
/// A filter is a query intent, rebuilt from view state for every request. It
/// is not validated here: the server is the source of truth for ranges, so a
/// `balance_from` above `balance_to` goes out as-is.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ListFilter {
    #[builder(default = 1)]
    pub page: u32,
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
    pub sort_by: Option<SortBy>,
    pub direction: Option<SortDirection>,
    pub status: Option<UserStatus>,
    #[builder(into)]
    pub email: Option<String>,
    pub balance_from: Option<f64>,
    pub balance_to: Option<f64>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ListFilter {
    /// Probe that reads only `pagination.total` for the given status (or all users).
    #[must_use]
    pub fn count_probe(status: Option<UserStatus>) -> Self {
        Self::builder().page(1).page_size(1).maybe_status(status).build()
    }

    /// Newest active users first, one page of `limit` rows.
    #[must_use]
    pub fn latest_active(limit: u32) -> Self {
        Self::builder()
            .page(1)
            .page_size(limit)
            .status(UserStatus::Active)
            .sort_by(SortBy::CreatedAt)
            .direction(SortDirection::Desc)
            .build()
    }

    /// Encode the filter as transport query pairs.
    ///
    /// `page` and `pageSize` are always present. Every other key is present
    /// only when the field is set; an unset field is omitted, never sent empty.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];

        if let Some(sort_by) = self.sort_by {
            pairs.push(("sortBy".to_string(), sort_by.to_string()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction".to_string(), direction.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.to_string()));
        }
        if let Some(ref email) = self.email {
            pairs.push(("email".to_string(), email.clone()));
        }
        if let Some(balance_from) = self.balance_from {
            pairs.push(("balanceFrom".to_string(), balance_from.to_string()));
        }
        if let Some(balance_to) = self.balance_to {
            pairs.push(("balanceTo".to_string(), balance_to.to_string()));
        }

        pairs
    }
}
