/// A single header name and value pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    value: String,
}

impl HeaderEntry {
    /// Create new [`HeaderEntry`].
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create new [`HeaderEntry`] from raw bytes.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    pub fn from_bytes(name: &[u8], value: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        }
    }

    /// Returns the header name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the header value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consume the entry, returning the name and value.
    #[inline]
    pub fn into_parts(self) -> (String, String) {
        (self.name, self.value)
    }
}
