use serde::{Deserialize, Serialize};

use crate::model::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Server-side count of rows matching the filter, independent of paging.
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// 1-based index of the first and last row on the current page, for
    /// labels such as `11-20 of 42 users`. `None` when the page is empty.
    #[must_use]
    pub fn page_range(&self) -> Option<(u64, u64)> {
        let page_size = u64::from(self.page_size);
        let offset = u64::from(self.page.saturating_sub(1)).saturating_mul(page_size);
        if page_size == 0 || offset >= self.total {
            return None;
        }
        let last = offset.saturating_add(page_size).min(self.total);
        Some((offset + 1, last))
    }
}

/// One page of users, ordered by the server according to the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<User>,
    pub pagination: Pagination,
}

impl ListResponse {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.pagination.total
    }
}
