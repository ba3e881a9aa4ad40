/// Broad classes of failures, used by callers to decide whether a playlist is
/// usable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The playlist cannot be used.
    Structural,
    /// A single optional tag was malformed and has been dropped.
    Attribute,
    OutOfRange,
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty playlist")]
    EmptyPlaylist,

    #[error("Missing #EXTM3U marker on the first line")]
    MissingExtM3u,

    #[error("Line {line}: {tag} cannot appear in a {kind} playlist")]
    MixedPlaylist {
        line: usize,
        tag: String,
        kind: &'static str,
    },

    #[error("Line {0}: variant stream has no URI")]
    MissingVariantUri(usize),

    #[error("Line {0}: media segment has no #EXTINF duration")]
    MissingDuration(usize),

    #[error("Invalid byte range format: {0}")]
    InvalidByteRange(String),

    #[error("Invalid IV format: {0}")]
    InvalidIv(String),

    #[error("Unsupported encryption method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid key tag: {0}")]
    InvalidKey(String),

    #[error("Invalid {tag} attributes: {reason}")]
    InvalidAttribute { tag: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Index {index} out of range for {size} items")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    pub(crate) fn attribute(tag: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyPlaylist => "EMPTY_PLAYLIST",
            Self::MissingExtM3u => "MISSING_EXTM3U",
            Self::MixedPlaylist { .. } => "MIXED_PLAYLIST",
            Self::MissingVariantUri(_) => "MISSING_VARIANT_URI",
            Self::MissingDuration(_) => "MISSING_DURATION",
            Self::InvalidByteRange(_) => "INVALID_BYTE_RANGE",
            Self::InvalidIv(_) => "INVALID_IV",
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::InvalidAttribute { .. } => "INVALID_ATTRIBUTE",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyPlaylist
            | Self::MissingExtM3u
            | Self::MixedPlaylist { .. }
            | Self::MissingVariantUri(_)
            | Self::MissingDuration(_)
            | Self::InvalidByteRange(_)
            | Self::InvalidIv(_)
            | Self::UnsupportedMethod(_)
            | Self::InvalidKey(_)
            | Self::InvalidUrl(_) => ErrorCategory::Structural,
            Self::InvalidAttribute { .. } => ErrorCategory::Attribute,
            Self::IndexOutOfRange { .. } => ErrorCategory::OutOfRange,
            Self::NotFound(_) => ErrorCategory::NotFound,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.category() == ErrorCategory::Structural
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::InvalidIv(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert!(Error::EmptyPlaylist.is_structural());
        assert!(Error::InvalidByteRange("x".into()).is_structural());
        assert_eq!(
            Error::attribute("#EXT-X-MEDIA", "missing NAME").category(),
            ErrorCategory::Attribute
        );
        assert_eq!(
            Error::IndexOutOfRange { index: 3, size: 2 }.category(),
            ErrorCategory::OutOfRange
        );
        assert_eq!(
            Error::NotFound("audio".into()).error_code(),
            "NOT_FOUND"
        );
    }

    #[test]
    fn test_display() {
        let err = Error::IndexOutOfRange { index: 5, size: 2 };
        assert_eq!(err.to_string(), "Index 5 out of range for 2 items");
    }
}
