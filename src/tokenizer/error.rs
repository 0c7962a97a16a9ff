use crate::boundary::BoundaryError;

/// Multipart parsing error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Stream does not start with the given boundary.
    Boundary,
    /// Boundary is not followed by CRLF or `--`.
    BoundaryEnding,
    /// Header line starts with a colon.
    EmptyHeaderName,
    /// Invalid character in header name.
    HeaderName,
    /// CR in header value is not followed by LF.
    HeaderValueEnding,
    /// CR of the empty line after headers is not followed by LF.
    HeadersEnding,
    /// Input ended before the closing boundary.
    UnexpectedEof,
    /// Boundary is empty, too long, or contains line break.
    InvalidBoundary,
}

impl ParseError {
    /// Returns human readable description of the error.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Boundary => "malformed boundary: found different data than the given boundary",
            Self::BoundaryEnding => "malformed boundary ending: expected CRLF or `--`",
            Self::EmptyHeaderName => "malformed header: empty header name",
            Self::HeaderName => "malformed header name",
            Self::HeaderValueEnding => "malformed header value: expected LF after CR",
            Self::HeadersEnding => "malformed header ending: expected LF after CR",
            Self::UnexpectedEof => "unexpected end of stream",
            Self::InvalidBoundary => BoundaryError::Invalid.message(),
        }
    }
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<BoundaryError> for ParseError {
    #[inline]
    fn from(_: BoundaryError) -> Self {
        Self::InvalidBoundary
    }
}
