//! Multipart boundary.
//!
//! [`parse_boundary`] extracts the boundary parameter from a `Content-Type` value, the result can
//! be passed directly to [`Reader::new`].
//!
//! [`Reader::new`]: crate::Reader::new

/// Maximum boundary length, RFC 2046 section 5.1.1.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Delimiter prefix preceding the boundary inside the stream.
const DELIMITER_PREFIX: &[u8; 4] = b"\r\n--";

/// An error that can occur when extracting or validating a boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoundaryError {
    /// Content type is not `multipart/*`.
    NotMultipart,
    /// Content type does not have `boundary` parameter.
    Missing,
    /// Boundary is empty, too long, or contains line break.
    Invalid,
}

impl BoundaryError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::NotMultipart => "content type is not multipart",
            Self::Missing => "missing boundary parameter",
            Self::Invalid => "invalid boundary: must be 1 to 70 bytes without CR or LF",
        }
    }
}

impl std::error::Error for BoundaryError {}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Extract boundary from a `Content-Type` header value.
///
/// Media type and parameter name are matched case insensitively, the boundary itself is returned
/// as is, without surrounding quotes.
///
/// ```
/// use multipart_reader::parse_boundary;
///
/// let ctype = "multipart/form-data; boundary=\"----WebKitFormBoundary7MA4YWxkTrZu0gW\"";
/// assert_eq!(parse_boundary(ctype), Ok("----WebKitFormBoundary7MA4YWxkTrZu0gW"));
/// ```
pub fn parse_boundary(content_type: &str) -> Result<&str, BoundaryError> {
    let mut params = content_type.split(';');

    let media_type = params.next().unwrap_or_default().trim();
    let is_multipart = media_type
        .as_bytes()
        .get(..b"multipart/".len())
        .is_some_and(|e| e.eq_ignore_ascii_case(b"multipart/"));
    if !is_multipart {
        return Err(BoundaryError::NotMultipart);
    }

    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("boundary") {
            continue;
        }

        let value = value.trim();
        let value = match value.strip_prefix('"').and_then(|e| e.strip_suffix('"')) {
            Some(unquoted) => unquoted,
            None => value,
        };

        validate(value.as_bytes())?;
        return Ok(value);
    }

    Err(BoundaryError::Missing)
}

/// Check boundary length and content.
pub fn validate(boundary: &[u8]) -> Result<(), BoundaryError> {
    match boundary.len() {
        1..=MAX_BOUNDARY_LEN if !boundary.iter().any(|b| matches!(b, b'\r' | b'\n')) => Ok(()),
        _ => Err(BoundaryError::Invalid),
    }
}

// ===== Needle =====

/// The byte sequence searched in part body, `CRLF "--" boundary`.
#[derive(Clone)]
pub(crate) struct Needle {
    bytes: Box<[u8]>,
    /// Whether a byte occurs anywhere in `bytes`.
    table: [bool; 256],
}

impl Needle {
    pub(crate) fn new(boundary: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(DELIMITER_PREFIX.len() + boundary.len());
        bytes.extend_from_slice(DELIMITER_PREFIX);
        bytes.extend_from_slice(boundary);

        let mut table = [false; 256];
        for &b in &bytes {
            table[b as usize] = true;
        }

        Self {
            bytes: bytes.into_boxed_slice(),
            table,
        }
    }

    /// The whole delimiter, including the leading CRLF.
    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The delimiter without leading CRLF, as it appears at the very start of the stream.
    #[inline]
    pub(crate) fn opening(&self) -> &[u8] {
        &self.bytes[2..]
    }

    #[inline]
    pub(crate) fn boundary(&self) -> &[u8] {
        &self.bytes[DELIMITER_PREFIX.len()..]
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub(crate) fn contains(&self, byte: u8) -> bool {
        self.table[byte as usize]
    }
}

impl std::fmt::Debug for Needle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Needle")
            .field(&String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}
