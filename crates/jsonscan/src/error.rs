//! Scan-time error taxonomy and the lazily positioned error wrapper.

use thiserror::Error;

use crate::{convert::NumberError, lexer::TokenKind};

/// Everything that can go wrong while scanning or converting input.
///
/// Each variant is a stable kind callers can branch on; the payload carries
/// the offending byte or token where one exists. Every error is returned to
/// the immediate caller — nothing is retried or swallowed, and malformed
/// input is always a hard stop at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Input ended while more bytes were required.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A scanned string is not valid UTF-8.
    #[error("string with invalid UTF-8 sequence")]
    InvalidUtf8,
    /// The byte after a backslash is not a legal escape character.
    #[error("invalid escaped character {0:#04x}")]
    InvalidEscape(u8),
    /// A raw control byte appeared inside a string.
    #[error("invalid JSON character {0:#04x} in string")]
    InvalidStringByte(u8),
    /// A `\u` escape contained a non-hexadecimal digit.
    #[error("invalid hex digit {0:#04x} in unicode escape")]
    InvalidHexDigit(u8),
    /// A lone or mispaired UTF-16 surrogate in a `\u` escape sequence.
    #[error("invalid unicode surrogate \\u{0:04X}")]
    InvalidSurrogate(u32),
    /// A byte that cannot begin any token.
    #[error("invalid character {0:#04x}")]
    InvalidCharacter(u8),
    /// A `true`/`false`/`null` literal with mismatched bytes.
    #[error("invalid literal")]
    InvalidLiteral,
    /// `-` with no digit after it.
    #[error("missing integer after minus")]
    MissingIntegerAfterMinus,
    /// `.` with no digit after it.
    #[error("missing integer after decimal")]
    MissingIntegerAfterDecimal,
    /// `e`/`E` (and optional sign) with no digit after it.
    #[error("missing integer after exponent")]
    MissingIntegerAfterExponent,
    /// A `/` opener while comments are disabled.
    #[error("comments are not allowed")]
    CommentsDisallowed,
    /// A malformed comment opening.
    #[error("incomplete comment")]
    IncompleteComment,
    /// A value-scan helper expected one token kind and saw another.
    #[error("wanted token {wanted}, got token {got}")]
    UnexpectedToken {
        /// The kind the caller required.
        wanted: TokenKind,
        /// The kind that was scanned.
        got: TokenKind,
    },
    /// A token that cannot begin a value where a value was required.
    #[error("wanted a value token, got token {0}")]
    ExpectedValue(TokenKind),
    /// A capture or skip was started from a non-value token.
    #[error("invalid capture kind {0}")]
    InvalidCaptureKind(TokenKind),
    /// Numeric conversion of a scanned token failed.
    #[error(transparent)]
    Number(#[from] NumberError),
}

/// A [`ScanError`] annotated with where in the input it happened.
///
/// Line and column are recovered by a linear rescan of the consumed input
/// (see [`Reader::line_col`](crate::Reader::line_col)); construct this only
/// when building a reportable error, never on the scan path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{source} at {line}:{column} (offset {offset})")]
pub struct PositionedError {
    /// The underlying scan error.
    pub source: ScanError,
    /// Byte offset of the cursor when the error was wrapped.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based byte column within the line.
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn unexpected_token_names_both_kinds() {
        let err = ScanError::UnexpectedToken {
            wanted: TokenKind::Colon,
            got: TokenKind::String,
        };
        assert_eq!(err.to_string(), "wanted token colon, got token string");
    }

    #[test]
    fn positioned_error_display() {
        let err = PositionedError {
            source: ScanError::InvalidLiteral,
            offset: 12,
            line: 2,
            column: 3,
        };
        assert_eq!(err.to_string(), "invalid literal at 2:3 (offset 12)");
    }
}
