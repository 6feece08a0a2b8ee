//! Contains the Error and Result type used by the reader and writer.

/// An error raised while constructing, decoding or encoding tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

/// The category of an [`Error`]. Every kind is terminal for the operation
/// that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input violates the wire grammar: negative or oversized lengths,
    /// truncated input, invalid text, unknown type ids, trailing bytes.
    MalformedData,

    /// An in-memory tree cannot be represented: mixed list elements, over
    /// long strings or names, arrays longer than the 32-bit count allows.
    InvalidTag,

    /// Nesting went deeper than the configured maximum depth.
    DepthExceeded,

    /// The underlying reader or writer failed for a reason other than
    /// running out of input.
    Io,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == ErrorKind::MalformedData
    }

    pub fn is_invalid_tag(&self) -> bool {
        self.kind == ErrorKind::InvalidTag
    }

    pub fn is_depth_exceeded(&self) -> bool {
        self.kind == ErrorKind::DepthExceeded
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::MalformedData,
        }
    }

    pub(crate) fn invalid_tag(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind: ErrorKind::InvalidTag,
        }
    }

    pub(crate) fn depth_exceeded(max: usize) -> Self {
        Self {
            msg: format!("nesting deeper than maximum depth {}", max),
            kind: ErrorKind::DepthExceeded,
        }
    }

    pub(crate) fn unknown_type_id(id: u8) -> Self {
        Self::malformed(format!("invalid tag type id: {}", id))
    }

    pub(crate) fn nonunicode(data: &[u8]) -> Self {
        Self::malformed(format!(
            "invalid string, not modified utf-8: {}",
            String::from_utf8_lossy(data)
        ))
    }

    pub(crate) fn negative_len(len: i32) -> Self {
        Self::malformed(format!("negative length: {}", len))
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            // Running dry part way through a value means the data was cut
            // short, not that the source broke.
            std::io::ErrorKind::UnexpectedEof => Self {
                msg: format!("eof: unexpectedly ran out of input: {}", e),
                kind: ErrorKind::MalformedData,
            },
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}
