use std::ops::Index;

use super::{GetAll, HeaderEntry, Iter};

/// Ordered header multimap.
///
/// Insertion order is preserved and duplicate names are permitted. Lookup returns the first
/// matching value, or an empty string when nothing matches.
///
/// Note that an absent header and a header with empty value are indistinguishable with
/// [`Headers::get`], use [`Headers::contains`] when the difference matters.
///
/// ```
/// use multipart_reader::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "text/plain");
/// headers.insert("X-Tag", "a");
/// headers.insert("X-Tag", "b");
///
/// assert_eq!(headers.get("Content-Type"), "text/plain");
/// assert_eq!(headers.get("X-Tag"), "a");
/// assert_eq!(headers.get("Accept"), "");
/// assert_eq!(headers.get_all("X-Tag").collect::<Vec<_>>(), ["a", "b"]);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<HeaderEntry>,
}

impl Headers {
    /// Create new empty [`Headers`].
    ///
    /// This function does not allocate.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Create new empty [`Headers`] with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there is no entry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns entries as slice, in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[HeaderEntry] {
        &self.entries
    }

    /// Returns an iterator over headers as name and value pair, in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.entries)
    }
}

// ===== Lookup =====

impl Headers {
    /// Returns the first value with exactly the given name, or an empty string if there is none.
    ///
    /// Comparison is case sensitive, see [`Headers::get_ignore_ascii_case`].
    pub fn get(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .map_or("", HeaderEntry::value)
    }

    /// Returns the first value whose name matches ignoring ASCII case, or an empty string if there
    /// is none.
    pub fn get_ignore_ascii_case(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .map_or("", HeaderEntry::value)
    }

    /// Returns an iterator over every value with exactly the given name, in insertion order.
    #[inline]
    pub fn get_all<'a>(&'a self, name: &'a str) -> GetAll<'a> {
        GetAll::new(&self.entries, name)
    }

    /// Returns `true` if at least one entry has exactly the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name() == name)
    }
}

// ===== Mutation =====

impl Headers {
    /// Append new entry, existing entries with the same name are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(HeaderEntry::new(name, value));
    }

    /// Append an already built entry.
    #[inline]
    pub fn push(&mut self, entry: HeaderEntry) {
        self.entries.push(entry);
    }

    /// Removes all entries, keeping the allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Index<&str> for Headers {
    type Output = str;

    /// Same as [`Headers::get`], never panics.
    #[inline]
    fn index(&self, name: &str) -> &str {
        self.get(name)
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = <Iter<'a> as Iterator>::Item;

    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(n, v)| HeaderEntry::new(n, v)).collect(),
        }
    }
}

impl std::fmt::Debug for Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
