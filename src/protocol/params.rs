//! Ordered key-value parameter sets
//!
//! The wire protocol carries both request parameters and response bodies as
//! flat string pairs. [`Params`] is a small insertion-ordered map used on both
//! sides: order is not significant to the server but preserving it keeps
//! request building deterministic and testable.

/// An insertion-ordered string map.
///
/// Lookup is linear; parameter sets are a handful of entries at most, so a
/// hash map would buy nothing and lose ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing the value in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the key is present
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no pairs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate only the bulk-record pairs, i.e. keys prefixed with `_`,
    /// with the prefix stripped. Non-prefixed keys are protocol metadata.
    pub fn bulk_records(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(k, v)| k.strip_prefix('_').map(|k| (k, v)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[macro_export]
/// Build a [`Params`] from literal pairs: `params! { "key" => "k", "value" => "v" }`
macro_rules! params {
    () => { $crate::protocol::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut p = $crate::protocol::Params::new();
        $( p.insert($key, $value); )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut p = Params::new();
        p.insert("z", "1").insert("a", "2").insert("m", "3");
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut p = Params::new();
        p.insert("key", "old").insert("other", "x").insert("key", "new");
        assert_eq!(p.get("key"), Some("new"));
        assert_eq!(p.len(), 2);
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["key", "other"]);
    }

    #[test]
    fn test_bulk_records_filter_metadata() {
        let mut p = Params::new();
        p.insert("DB", "0").insert("_a", "1").insert("xt", "30").insert("_b", "2");
        let records: Vec<(&str, &str)> = p.bulk_records().collect();
        assert_eq!(records, vec![("a", "1"), ("b", "2")]);
    }
}
