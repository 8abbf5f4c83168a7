//! URL-encodable state of the users list view.
//!
//! The list view keeps its status filter, page and page size in the URL query.
//! Decoding never fails: a missing, malformed or out-of-range value silently
//! becomes that field's default.

use std::fmt;
use std::str::FromStr;

use crate::model::UserStatus;
use crate::request::{DEFAULT_PAGE_SIZE, ListFilter, MAX_PAGE_SIZE, SortBy, SortDirection};

/// Page sizes offered by the list view.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Status selector of the list view; `All` sends no status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(UserStatus),
}

impl StatusFilter {
    /// Every selectable option, `All` first.
    pub const OPTIONS: [Self; 4] = [
        Self::All,
        Self::Only(UserStatus::Active),
        Self::Only(UserStatus::Inactive),
        Self::Only(UserStatus::Pending),
    ];

    #[must_use]
    pub fn status(self) -> Option<UserStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Self::All)
        } else {
            UserStatus::from_str(s).map(Self::Only)
        }
    }
}

impl From<Option<UserStatus>> for StatusFilter {
    fn from(status: Option<UserStatus>) -> Self {
        status.map_or(Self::All, Self::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListViewState {
    pub status: StatusFilter,
    pub page: u32,
    pub page_size: u32,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListViewState {
    /// Decode from a URL query such as `status=active&page=2&pageSize=20`.
    ///
    /// A leading `?` is accepted. Unknown keys are ignored; for repeated keys
    /// the last occurrence wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "status" => state.status = value.parse().unwrap_or_default(),
                "page" => state.page = parse_page(&value).unwrap_or(1),
                "pageSize" => state.page_size = parse_page_size(&value).unwrap_or(DEFAULT_PAGE_SIZE),
                _ => {}
            }
        }

        state
    }

    /// Encode as a URL query (without the leading `?`).
    #[must_use]
    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("status", &self.status.to_string())
            .append_pair("page", &self.page.to_string())
            .append_pair("pageSize", &self.page_size.to_string())
            .finish()
    }

    /// Switch the status filter; paging restarts at the first page.
    #[must_use]
    pub fn with_status(self, status: StatusFilter) -> Self {
        Self {
            status,
            page: 1,
            ..self
        }
    }

    /// Move to `page`, keeping the filter and page size.
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Change the page size; paging restarts at the first page.
    #[must_use]
    pub fn with_page_size(self, page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
            ..self
        }
    }

    /// The list request this view issues: newest users first.
    #[must_use]
    pub fn to_filter(&self) -> ListFilter {
        ListFilter::builder()
            .page(self.page)
            .page_size(self.page_size)
            .maybe_status(self.status.status())
            .sort_by(SortBy::CreatedAt)
            .direction(SortDirection::Desc)
            .build()
    }
}

/// Page number, at least 1.
fn parse_page(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|page| *page >= 1)
}

/// Page size within `1..=MAX_PAGE_SIZE`.
fn parse_page_size(value: &str) -> Option<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_gives_defaults() {
        let state = ListViewState::from_query("");
        assert_eq!(state, ListViewState::default());
        assert_eq!(state.status, StatusFilter::All);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn valid_query_is_decoded() {
        let state = ListViewState::from_query("?status=pending&page=3&pageSize=50");
        assert_eq!(state.status, StatusFilter::Only(UserStatus::Pending));
        assert_eq!(state.page, 3);
        assert_eq!(state.page_size, 50);
    }

    #[test]
    fn invalid_values_fall_back_per_field() {
        let state = ListViewState::from_query("status=banned&page=0&pageSize=500");
        assert_eq!(state, ListViewState::default());

        let state = ListViewState::from_query("status=active&page=-2&pageSize=abc");
        assert_eq!(state.status, StatusFilter::Only(UserStatus::Active));
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);

        let state = ListViewState::from_query("page=2.5&pageSize=0&other=1");
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn query_round_trips() {
        let state = ListViewState {
            status: StatusFilter::Only(UserStatus::Inactive),
            page: 4,
            page_size: 20,
        };
        assert_eq!(state.to_query(), "status=inactive&page=4&pageSize=20");
        assert_eq!(ListViewState::from_query(&state.to_query()), state);
    }

    #[test]
    fn navigation_resets_paging_where_the_view_does() {
        let state = ListViewState::default().with_page(5);
        assert_eq!(state.page, 5);

        let filtered = state.with_status(StatusFilter::Only(UserStatus::Active));
        assert_eq!(filtered.page, 1);

        let resized = state.with_page_size(100);
        assert_eq!((resized.page, resized.page_size), (1, 100));
        assert_eq!(state.with_page_size(1000).page_size, MAX_PAGE_SIZE);
        assert_eq!(state.with_page(0).page, 1);
    }

    #[test]
    fn filter_carries_status_only_when_selected() {
        let all = ListViewState::default().to_filter();
        assert_eq!(all.status, None);
        assert_eq!(all.sort_by, Some(SortBy::CreatedAt));
        assert_eq!(all.direction, Some(SortDirection::Desc));

        let active = ListViewState::default()
            .with_status(StatusFilter::Only(UserStatus::Active))
            .to_filter();
        assert_eq!(active.status, Some(UserStatus::Active));
    }

    #[test]
    fn page_size_options_are_all_valid() {
        for size in PAGE_SIZE_OPTIONS {
            assert_eq!(parse_page_size(&size.to_string()), Some(size));
        }
        assert_eq!(StatusFilter::OPTIONS.len(), 4);
    }
}
