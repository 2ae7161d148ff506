//! Token-level state machine over a byte [`Reader`].
//!
//! One [`Lexer::scan`] call produces one token. The token's payload is not
//! carried on the token itself: it lives in the lexer's output buffer and
//! stays valid until the next `scan` resets it (capture mode instead
//! accumulates across calls, which is what the structural
//! [`Lexer::capture_field`] traversal builds on).
//!
//! The lexer is single-owner and single-threaded. Workers that scan in
//! parallel each get their own instance; [`Lexer::reset`] re-initializes
//! cursor, token state, and output length so pooled instances are
//! indistinguishable from new ones.

use alloc::string::String;
use core::fmt;

use crate::{
    buffer::{Buffer, FloatWidth},
    convert,
    error::{PositionedError, ScanError},
    reader::Reader,
};

/// The classified unit produced by one scan step.
///
/// Structural kinds are named for their literal byte: [`TokenKind::LeftBrace`]
/// is `{` and [`TokenKind::LeftBracket`] is `[`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    /// No token scanned yet (fresh or reset lexer).
    #[default]
    Init,
    /// `true` or `false`.
    Bool,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// End of input at a token boundary; distinct from an error.
    Eof,
    /// `{`
    LeftBrace,
    /// `[`
    LeftBracket,
    /// `null`.
    Null,
    /// `}`
    RightBrace,
    /// `]`
    RightBracket,
    /// A number with no fractional part and no exponent.
    Integer,
    /// A number with a fractional part or an exponent.
    Double,
    /// A quoted string; the buffered payload is the decoded content.
    String,
    /// A `//` or `/* */` comment (non-standard extension). Never produced
    /// by the capture/skip/value-scan helpers, only by direct `scan` calls.
    Comment,
}

impl TokenKind {
    /// True for kinds that can begin a JSON value.
    #[must_use]
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            Self::LeftBrace
                | Self::LeftBracket
                | Self::Integer
                | Self::Double
                | Self::String
                | Self::Bool
                | Self::Null
        )
    }

    fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Bool => "bool",
            Self::Colon => "colon",
            Self::Comma => "comma",
            Self::Eof => "eof",
            Self::LeftBrace => "left brace",
            Self::LeftBracket => "left bracket",
            Self::Null => "null",
            Self::RightBrace => "right brace",
            Self::RightBracket => "right bracket",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-loop states for generated object decoders.
///
/// The runtime does not interpret these; they are the shared vocabulary
/// generated `unmarshal` code steps through while driving
/// [`Lexer::scan`]/[`Lexer::capture_field`]/[`Lexer::skip_field`] over an
/// object's key/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Positioned at the object opener.
    MapStart,
    /// Expecting a key or the object closer.
    WantKey,
    /// Key consumed, expecting `:`.
    WantColon,
    /// Colon consumed, expecting a value.
    WantValue,
    /// Value consumed, expecting `,` or the closer.
    AfterValue,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MapStart => "map:start",
            Self::WantKey => "want_key",
            Self::WantColon => "want_colon",
            Self::WantValue => "want_value",
            Self::AfterValue => "after_value",
        })
    }
}

/// Configuration for a [`Lexer`].
#[derive(Debug, Clone, Copy)]
pub struct LexerOptions {
    /// Whether `//` and `/* */` comments are lexed as
    /// [`TokenKind::Comment`] tokens. When disabled, a `/` opener is a
    /// [`ScanError::CommentsDisallowed`] error.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_comments: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
        }
    }
}

/// The token scanner.
///
/// Constructed once per input document, or reused across documents via
/// [`Lexer::reset`] to keep the output and scratch buffer allocations.
#[derive(Debug)]
pub struct Lexer<'a> {
    reader: Reader<'a>,
    /// Token payload sink; also the cumulative capture sink in capture mode.
    output: Buffer,
    /// Re-quoting staging area for string captures.
    scratch: Buffer,
    token: TokenKind,
    options: LexerOptions,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input` with default options.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    /// Creates a lexer over `input` with explicit options.
    #[must_use]
    pub fn with_options(input: &'a [u8], options: LexerOptions) -> Self {
        Self {
            reader: Reader::new(input),
            output: Buffer::new(),
            scratch: Buffer::new(),
            token: TokenKind::Init,
            options,
        }
    }

    /// Re-initializes the lexer over new input.
    ///
    /// Cursor, token state, and output length are all reset; buffer
    /// capacity is retained, so a pooled lexer scans without reallocating.
    pub fn reset(&mut self, input: &'a [u8]) {
        self.reader.reset(input);
        self.output.reset();
        self.token = TokenKind::Init;
    }

    /// The most recently produced token kind.
    #[must_use]
    pub fn token(&self) -> TokenKind {
        self.token
    }

    /// The current token's buffered payload.
    ///
    /// Valid until the next [`Lexer::scan`]; in capture mode the buffer
    /// accumulates every scanned token's bytes instead.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.output.bytes()
    }

    /// Mutable access to the output buffer, for callers that interleave
    /// encoding with scanning.
    pub fn output_mut(&mut self) -> &mut Buffer {
        &mut self.output
    }

    /// Wraps `source` with the position of the cursor, recovering line and
    /// column by rescanning consumed input. Error-path only.
    #[must_use]
    pub fn position_error(&self, source: ScanError) -> PositionedError {
        let (line, column) = self.reader.line_col();
        PositionedError {
            source,
            offset: self.reader.pos(),
            line,
            column,
        }
    }

    /// Scans one token.
    ///
    /// With `capture_all` false, the output buffer is reset first and holds
    /// only this token's payload afterwards. With `capture_all` true,
    /// whitespace and every token's bytes are appended cumulatively, and
    /// string payloads are re-quoted so the accumulated bytes remain valid
    /// JSON.
    ///
    /// # Errors
    ///
    /// Any [`ScanError`] produced by token lexing. End of input at a token
    /// boundary is `Ok(TokenKind::Eof)`, not an error.
    pub fn scan(&mut self, capture_all: bool) -> Result<TokenKind, ScanError> {
        if !capture_all {
            self.output.reset();
        }
        self.token = TokenKind::Init;

        let kind = loop {
            let next = if capture_all {
                self.reader.read_byte()
            } else {
                self.reader.read_byte_skip_ws()
            };
            let Some(c) = next else {
                break TokenKind::Eof;
            };

            match c {
                b'{' | b'}' | b'[' | b']' | b',' | b':' => {
                    if capture_all {
                        self.output.push_byte(c);
                    }
                    break match c {
                        b'{' => TokenKind::LeftBrace,
                        b'}' => TokenKind::RightBrace,
                        b'[' => TokenKind::LeftBracket,
                        b']' => TokenKind::RightBracket,
                        b',' => TokenKind::Comma,
                        _ => TokenKind::Colon,
                    };
                }
                b'\t' | b'\n' | 0x0b | 0x0c | b'\r' | b' ' => {
                    // Only reachable in capture mode; the whitespace-skipping
                    // read already consumed these otherwise.
                    self.output.push_byte(c);
                }
                b't' => {
                    self.output.push_byte(c);
                    break self.want_bytes(b"rue", TokenKind::Bool)?;
                }
                b'f' => {
                    self.output.push_byte(c);
                    break self.want_bytes(b"alse", TokenKind::Bool)?;
                }
                b'n' => {
                    self.output.push_byte(c);
                    break self.want_bytes(b"ull", TokenKind::Null)?;
                }
                b'"' => break self.lex_string(capture_all)?,
                b'-' | b'0'..=b'9' => {
                    // Push the leading byte back so number lexing re-reads
                    // the whole grammar uniformly.
                    self.reader.unread_byte();
                    break self.lex_number()?;
                }
                b'/' => {
                    if !self.options.allow_comments {
                        return Err(ScanError::CommentsDisallowed);
                    }
                    break self.lex_comment()?;
                }
                _ => return Err(ScanError::InvalidCharacter(c)),
            }
        };

        self.token = kind;
        Ok(kind)
    }

    /// Requires the exact remaining bytes of a literal, pushing the
    /// mismatched byte back on failure.
    fn want_bytes(&mut self, want: &'static [u8], kind: TokenKind) -> Result<TokenKind, ScanError> {
        for &b in want {
            let c = self
                .reader
                .read_byte()
                .ok_or(ScanError::UnexpectedEndOfInput)?;
            if c != b {
                self.reader.unread_byte();
                return Err(ScanError::InvalidLiteral);
            }
            self.output.push_byte(c);
        }
        Ok(kind)
    }

    fn lex_string(&mut self, capture_all: bool) -> Result<TokenKind, ScanError> {
        if capture_all {
            // The capture sink must stay valid JSON, so decode into the
            // scratch buffer and re-quote into the output.
            self.scratch.reset();
            self.reader.scan_string_body(&mut self.scratch)?;
            self.output.push_json(self.scratch.bytes());
        } else {
            self.reader.scan_string_body(&mut self.output)?;
        }
        Ok(TokenKind::String)
    }

    fn lex_number(&mut self) -> Result<TokenKind, ScanError> {
        let mut kind = TokenKind::Integer;

        // The dispatch loop pushed the first byte back, so one is present.
        let mut c = self
            .reader
            .read_byte()
            .ok_or(ScanError::UnexpectedEndOfInput)?;

        // optional leading minus
        if c == b'-' {
            self.output.push_byte(c);
            c = match self.reader.read_byte() {
                Some(b) => b,
                None => return Err(ScanError::MissingIntegerAfterMinus),
            };
        }

        // a single zero, or a nonzero digit followed by any digits; leading
        // zeros are not consumed (the `0` token completes on its own)
        if c == b'0' {
            self.output.push_byte(c);
            c = match self.reader.read_byte() {
                Some(b) => b,
                None => return Ok(kind),
            };
        } else if c.is_ascii_digit() {
            loop {
                self.output.push_byte(c);
                c = match self.reader.read_byte() {
                    Some(b) => b,
                    None => return Ok(kind),
                };
                if !c.is_ascii_digit() {
                    break;
                }
            }
        } else {
            self.reader.unread_byte();
            return Err(ScanError::MissingIntegerAfterMinus);
        }

        // optional fractional part
        if c == b'.' {
            self.output.push_byte(c);
            kind = TokenKind::Double;
            let mut digits = 0usize;
            loop {
                c = match self.reader.read_byte() {
                    Some(b) => b,
                    None if digits > 0 => return Ok(kind),
                    None => return Err(ScanError::MissingIntegerAfterDecimal),
                };
                if !c.is_ascii_digit() {
                    break;
                }
                self.output.push_byte(c);
                digits += 1;
            }
            if digits == 0 {
                self.reader.unread_byte();
                return Err(ScanError::MissingIntegerAfterDecimal);
            }
        }

        // optional exponent
        if c == b'e' || c == b'E' {
            self.output.push_byte(c);
            kind = TokenKind::Double;
            c = match self.reader.read_byte() {
                Some(b) => b,
                None => return Err(ScanError::MissingIntegerAfterExponent),
            };
            if c == b'+' || c == b'-' {
                self.output.push_byte(c);
                c = match self.reader.read_byte() {
                    Some(b) => b,
                    None => return Err(ScanError::MissingIntegerAfterExponent),
                };
            }
            let mut digits = 0usize;
            while c.is_ascii_digit() {
                self.output.push_byte(c);
                digits += 1;
                c = match self.reader.read_byte() {
                    Some(b) => b,
                    None => return Ok(kind),
                };
            }
            if digits == 0 {
                return Err(ScanError::MissingIntegerAfterExponent);
            }
        }

        // the byte that ended the grammar belongs to the next token
        self.reader.unread_byte();
        Ok(kind)
    }

    fn lex_comment(&mut self) -> Result<TokenKind, ScanError> {
        let c = self
            .reader
            .read_byte()
            .ok_or(ScanError::IncompleteComment)?;
        match c {
            b'/' => loop {
                let c = self
                    .reader
                    .read_byte()
                    .ok_or(ScanError::UnexpectedEndOfInput)?;
                if c == b'\n' {
                    return Ok(TokenKind::Comment);
                }
            },
            b'*' => loop {
                let c = self
                    .reader
                    .read_byte()
                    .ok_or(ScanError::UnexpectedEndOfInput)?;
                if c == b'*' {
                    let c = self
                        .reader
                        .read_byte()
                        .ok_or(ScanError::UnexpectedEndOfInput)?;
                    if c == b'/' {
                        return Ok(TokenKind::Comment);
                    }
                    // may itself begin the close, e.g. `**/`
                    self.reader.unread_byte();
                }
            },
            _ => Err(ScanError::IncompleteComment),
        }
    }

    /// Captures an entire field value, including nested structures, as a
    /// byte sequence that is itself valid JSON (suitable to hand to a
    /// sub-document's unmarshal entry point).
    ///
    /// `start` is the token that opened the value (the caller typically got
    /// it from [`Lexer::scan_to_value`]). Structural starts traverse with a
    /// depth counter in capture mode; scalar starts return the
    /// already-buffered bytes; string starts re-quote the decoded payload.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedEndOfInput`] if the input ends mid-structure,
    /// [`ScanError::InvalidCaptureKind`] for a non-value `start`, plus any
    /// scan error from the traversal.
    pub fn capture_field(&mut self, start: TokenKind) -> Result<&[u8], ScanError> {
        match start {
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                let end = if start == TokenKind::LeftBrace {
                    self.output.push_byte(b'{');
                    TokenKind::RightBrace
                } else {
                    self.output.push_byte(b'[');
                    TokenKind::RightBracket
                };

                let mut depth = 1usize;
                loop {
                    let tok = self.scan(true)?;
                    if tok == TokenKind::Eof {
                        return Err(ScanError::UnexpectedEndOfInput);
                    }
                    if tok == end {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    } else if tok == start {
                        depth += 1;
                    }
                }
                Ok(self.output.bytes())
            }
            TokenKind::Bool | TokenKind::Integer | TokenKind::Double | TokenKind::Null => {
                Ok(self.output.bytes())
            }
            TokenKind::String => {
                // Callers expect a quoted string, not the decoded content.
                self.scratch.reset();
                self.scratch.push_json(self.output.bytes());
                Ok(self.scratch.bytes())
            }
            _ => Err(ScanError::InvalidCaptureKind(start)),
        }
    }

    /// Consumes an entire field value without retaining its bytes.
    ///
    /// The traversal mirrors [`Lexer::capture_field`] but scans in
    /// non-capture mode, leaving the cursor at the first byte after the
    /// value.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedEndOfInput`] if the input ends mid-structure,
    /// [`ScanError::InvalidCaptureKind`] for a non-value `start`, plus any
    /// scan error from the traversal.
    pub fn skip_field(&mut self, start: TokenKind) -> Result<(), ScanError> {
        match start {
            TokenKind::LeftBrace | TokenKind::LeftBracket => {
                let end = if start == TokenKind::LeftBrace {
                    TokenKind::RightBrace
                } else {
                    TokenKind::RightBracket
                };

                let mut depth = 1usize;
                loop {
                    let tok = self.scan(false)?;
                    if tok == TokenKind::Eof {
                        return Err(ScanError::UnexpectedEndOfInput);
                    }
                    if tok == end {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(());
                        }
                    } else if tok == start {
                        depth += 1;
                    }
                }
            }
            TokenKind::Bool
            | TokenKind::Integer
            | TokenKind::Double
            | TokenKind::Null
            | TokenKind::String => Ok(()),
            _ => Err(ScanError::InvalidCaptureKind(start)),
        }
    }

    /// Scans the next non-comment token.
    fn scan_token(&mut self) -> Result<TokenKind, ScanError> {
        loop {
            let tok = self.scan(false)?;
            if tok != TokenKind::Comment {
                return Ok(tok);
            }
        }
    }

    fn scan_expect(&mut self, wanted: TokenKind) -> Result<(), ScanError> {
        let got = self.scan_token()?;
        if got == wanted {
            Ok(())
        } else {
            Err(ScanError::UnexpectedToken { wanted, got })
        }
    }

    /// Scans `:` then an integer token, converting it to a signed value
    /// that must fit in `bits` (1–64) bits.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] on a kind mismatch, or a
    /// [`ScanError::Number`] conversion failure.
    pub fn scan_int_value(&mut self, bits: u32) -> Result<i64, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        self.scan_expect(TokenKind::Integer)?;
        Ok(convert::parse_int(self.output.bytes(), 10, bits)?)
    }

    /// Scans `:` then an integer token, converting it to an unsigned value
    /// that must fit in `bits` (1–64) bits.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] on a kind mismatch, or a
    /// [`ScanError::Number`] conversion failure.
    pub fn scan_uint_value(&mut self, bits: u32) -> Result<u64, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        self.scan_expect(TokenKind::Integer)?;
        Ok(convert::parse_uint(self.output.bytes(), 10, bits)?)
    }

    /// Scans `:` then a string token, returning the decoded content.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] on a kind mismatch, or
    /// [`ScanError::InvalidUtf8`] when the decoded bytes are not UTF-8.
    pub fn scan_string_value(&mut self) -> Result<String, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        self.scan_expect(TokenKind::String)?;
        let text = core::str::from_utf8(self.output.bytes()).map_err(|_| ScanError::InvalidUtf8)?;
        Ok(String::from(text))
    }

    /// Scans `:` then a boolean token.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] on a kind mismatch.
    pub fn scan_bool_value(&mut self) -> Result<bool, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        self.scan_expect(TokenKind::Bool)?;
        match self.output.bytes() {
            b"true" => Ok(true),
            b"false" => Ok(false),
            _ => Err(ScanError::InvalidLiteral),
        }
    }

    /// Scans `:` then a double token, converting it at full 64-bit
    /// precision.
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] on a kind mismatch, or a
    /// [`ScanError::Number`] conversion failure.
    pub fn scan_float_value(&mut self) -> Result<f64, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        self.scan_expect(TokenKind::Double)?;
        Ok(convert::parse_float(self.output.bytes(), FloatWidth::F64)?)
    }

    /// Scans `:` then any value-starting token, returning its kind for the
    /// caller to dispatch on (typically into [`Lexer::capture_field`] or
    /// [`Lexer::skip_field`]).
    ///
    /// # Errors
    ///
    /// [`ScanError::UnexpectedToken`] when the `:` is missing, or
    /// [`ScanError::ExpectedValue`] when the following token cannot begin a
    /// value.
    pub fn scan_to_value(&mut self) -> Result<TokenKind, ScanError> {
        self.scan_expect(TokenKind::Colon)?;
        let got = self.scan_token()?;
        if got.starts_value() {
            Ok(got)
        } else {
            Err(ScanError::ExpectedValue(got))
        }
    }
}
