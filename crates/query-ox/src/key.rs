use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use users_ox::{ListFilter, UserId};

/// Canonical identity of a logical query: a name plus its parameters.
///
/// Parameters live in a `BTreeMap`, so two keys built from structurally equal
/// inputs compare and hash equal whatever order the pairs were produced in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey {
    name: Cow<'static, str>,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// `users` list page for `filter`.
    #[must_use]
    pub fn users(filter: &ListFilter) -> Self {
        Self::new("users").with_params(filter.to_query_pairs())
    }

    /// Single user lookup.
    #[must_use]
    pub fn user(id: UserId) -> Self {
        Self::new("user").with_param("id", id)
    }

    /// Dashboard status counts.
    #[must_use]
    pub fn stats() -> Self {
        Self::new("users/stats")
    }

    /// Newest `limit` active users.
    #[must_use]
    pub fn latest_active(limit: u32) -> Self {
        Self::new("users/latest-active").with_param("limit", limit)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use users_ox::UserStatus;

    #[test]
    fn equal_filters_give_equal_keys() {
        let a = ListFilter::builder().page(2).status(UserStatus::Active).build();
        let b = ListFilter::builder().status(UserStatus::Active).page(2).build();
        assert_eq!(QueryKey::users(&a), QueryKey::users(&b));

        let set: HashSet<_> = [QueryKey::users(&a), QueryKey::users(&b)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn parameter_order_does_not_matter() {
        let a = QueryKey::new("users").with_params([("b", "2"), ("a", "1")]);
        let b = QueryKey::new("users").with_params([("a", "1"), ("b", "2")]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "users?a=1&b=2");
    }

    #[test]
    fn different_inputs_give_different_keys() {
        let page1 = QueryKey::users(&ListFilter::builder().page(1).build());
        let page2 = QueryKey::users(&ListFilter::builder().page(2).build());
        assert_ne!(page1, page2);
        assert_ne!(QueryKey::user(UserId(1)), QueryKey::user(UserId(2)));
        assert_ne!(QueryKey::stats(), QueryKey::latest_active(5));
        assert_ne!(QueryKey::latest_active(5), QueryKey::latest_active(10));
    }

    #[test]
    fn keys_are_totally_ordered() {
        let mut keys = vec![QueryKey::user(UserId(2)), QueryKey::stats(), QueryKey::user(UserId(1))];
        keys.sort();
        assert_eq!(keys[0], QueryKey::user(UserId(1)));
        assert_eq!(keys[2], QueryKey::stats());
    }
}
