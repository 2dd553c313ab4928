use std::collections::HashMap;

/// Ordered mapping of keys to raw (not yet dereferenced) values.
///
/// A key keeps the position where it first appeared; inserting it again only
/// replaces the value. Order matters because later values may reference
/// variables assigned by earlier ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ParsedFile {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value if `key` was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item=&str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item=(&str, &str)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl IntoIterator for ParsedFile {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParsedFile {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        fn as_strs(entry: &(String, String)) -> (&str, &str) {
            (entry.0.as_str(), entry.1.as_str())
        }
        self.entries.iter().map(as_strs as fn(&'a (String, String)) -> (&'a str, &'a str))
    }
}

impl<K, V> FromIterator<(K, V)> for ParsedFile
where K: Into<String>, V: Into<String> {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
        let mut parsed = Self::new();
        parsed.extend(iter);
        parsed
    }
}

impl<K, V> Extend<(K, V)> for ParsedFile
where K: Into<String>, V: Into<String> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
