//! Query parameters shared by list endpoints.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Relationship includes and filters for a list request.
///
/// Rendered as `include=<a,b>` and one `filter[<key>]=<value>` pair per
/// filter. Keys and values are passed through verbatim, so operator keys
/// such as `due_date[lt]` work as-is.
///
/// # Example
///
/// ```
/// use highbond::ListQuery;
///
/// let query = ListQuery::new()
///     .include("owner_user")
///     .filter("status", "open");
///
/// assert_eq!(
///     query.to_pairs(),
///     vec![
///         ("include".to_string(), "owner_user".to_string()),
///         ("filter[status]".to_string(), "open".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    include: Vec<String>,
    filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship to side-load.
    #[must_use]
    pub fn include(mut self, relationship: impl Into<String>) -> Self {
        self.include.push(relationship.into());
        self
    }

    /// Add several relationships to side-load.
    #[must_use]
    pub fn includes<I, S>(mut self, relationships: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(relationships.into_iter().map(Into::into));
        self
    }

    /// Add a filter; a repeated key replaces the earlier value.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    pub fn included(&self) -> &[String] {
        &self.include
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.filters.is_empty()
    }

    /// Render as wire query pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 1);
        if let Some(include) = include_param(&self.include) {
            pairs.push(("include".to_string(), include));
        }
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (format!("filter[{key}]"), value.clone())),
        );
        pairs
    }
}

/// Comma-joined `include` value, or `None` when nothing is included.
pub(crate) fn include_param<S: AsRef<str>>(include: &[S]) -> Option<String> {
    if include.is_empty() {
        return None;
    }
    Some(
        include
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(","),
    )
}
