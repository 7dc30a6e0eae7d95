use core::fmt;

/// RLP result type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while decoding RLP data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Numeric overflow while computing a length.
    #[error("overflow")]
    Overflow,
    /// A length prefix carries redundant leading zero bytes.
    #[error("leading zero in length prefix")]
    LeadingZero,
    /// The input ended before the declared payload.
    #[error("input too short")]
    InputTooShort,
    /// A single byte below 0x80 was wrapped in a string header.
    #[error("non-canonical single byte")]
    NonCanonicalSingleByte,
    /// A long-form length was used where the short form fits.
    #[error("non-canonical size")]
    NonCanonicalSize,
    /// The payload length does not match the decoded contents.
    #[error("unexpected length")]
    UnexpectedLength,
    /// Expected a list, found a string.
    #[error("unexpected string")]
    UnexpectedString,
    /// Expected a string, found a list.
    #[error("unexpected list")]
    UnexpectedList,
    /// A list's declared payload length disagrees with its contents.
    #[error("list length mismatch: expected {expected}, got {got}")]
    ListLengthMismatch {
        /// Declared payload length.
        expected: usize,
        /// Actual number of bytes consumed.
        got: usize,
    },
    /// Caller-supplied decoding failure.
    #[error("{0}")]
    Custom(&'static str),
}

impl Error {
    /// Shorthand for a [`Error::Custom`] value.
    pub const fn custom(msg: &'static str) -> Self {
        Self::Custom(msg)
    }
}

impl From<Error> for fmt::Error {
    fn from(_: Error) -> Self {
        Self
    }
}
