//! Persistent table rename map.

use alloc::string::String;
use hashbrown::HashMap;

/// Accumulated table renames, keyed by the lower-cased old name.
///
/// A `TableRenames` value is the explicit configuration threaded through
/// [`Statement::parse_with`](crate::Statement::parse_with): every statement
/// parsed with it has its matching table names replaced. Registering the same
/// old name twice keeps the latest target.
///
/// With the `serde` feature the map (de)serializes as a plain
/// `{ "old_name": "new_name" }` object, so rename tables can live in
/// configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        from = "HashMap<String, String>",
        into = "HashMap<String, String>"
    )
)]
pub struct TableRenames {
    map: HashMap<String, String>,
}

impl TableRenames {
    /// Create an empty rename map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `old` to be renamed to `new`.
    ///
    /// Returns the previous target for `old`, if any.
    pub fn insert(&mut self, old: &str, new: impl Into<String>) -> Option<String> {
        self.map.insert(old.to_lowercase(), new.into())
    }

    /// Look up the new name for `table`, ignoring case.
    #[must_use]
    pub fn get(&self, table: &str) -> Option<&str> {
        self.map.get(&table.to_lowercase()).map(String::as_str)
    }

    /// Remove the rename registered for `old`, returning its target.
    pub fn remove(&mut self, old: &str) -> Option<String> {
        self.map.remove(&old.to_lowercase())
    }

    /// Number of registered renames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no rename is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over `(lower-cased old name, new name)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }
}

impl<O: AsRef<str>, N: Into<String>> Extend<(O, N)> for TableRenames {
    fn extend<I: IntoIterator<Item = (O, N)>>(&mut self, iter: I) {
        for (old, new) in iter {
            self.insert(old.as_ref(), new);
        }
    }
}

impl<O: AsRef<str>, N: Into<String>> FromIterator<(O, N)> for TableRenames {
    fn from_iter<I: IntoIterator<Item = (O, N)>>(iter: I) -> Self {
        let mut renames = Self::new();
        renames.extend(iter);
        renames
    }
}

impl From<HashMap<String, String>> for TableRenames {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<TableRenames> for HashMap<String, String> {
    fn from(renames: TableRenames) -> Self {
        renames.map
    }
}

/// Renders the map as `old -> new` pairs sorted by old name.
impl core::fmt::Display for TableRenames {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut pairs: alloc::vec::Vec<_> = self.iter().collect();
        pairs.sort_unstable();
        for (i, (old, new)) in pairs.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{old} -> {new}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_keys_are_case_insensitive() {
        let mut renames = TableRenames::new();
        assert_eq!(renames.insert("User_Info", "t_user"), None);
        assert_eq!(renames.get("USER_INFO"), Some("t_user"));
        assert_eq!(renames.get("user_info"), Some("t_user"));
        assert_eq!(renames.get("orders"), None);
    }

    #[test]
    fn test_latest_rename_wins() {
        let mut renames = TableRenames::new();
        renames.insert("user_info", "t_user");
        assert_eq!(
            renames.insert("USER_INFO", "t_member"),
            Some("t_user".into())
        );
        assert_eq!(renames.len(), 1);
        assert_eq!(renames.get("user_info"), Some("t_member"));
    }

    #[test]
    fn test_collect_and_display() {
        let renames: TableRenames = [("Orders", "t_order"), ("users", "t_user")]
            .into_iter()
            .collect();
        assert_eq!(renames.to_string(), "orders -> t_order, users -> t_user");
        assert!(!renames.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut renames: TableRenames = [("a", "b")].into_iter().collect();
        assert_eq!(renames.remove("A"), Some("b".into()));
        assert!(renames.is_empty());
    }
}
