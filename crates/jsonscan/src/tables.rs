//! Per-byte classification tables shared by the reader and lexer.
//!
//! Fixed 256-entry arrays indexed by byte value give branch-free
//! classification on the scanning hot paths. The tables are built at compile
//! time; the flag semantics follow the string-scanning needs of
//! [`Reader::scan_string_body`](crate::Reader::scan_string_body).

/// Byte is a legal escape character after a backslash
/// (`"`, `\`, `/`, `b`, `f`, `n`, `r`, `t`).
pub(crate) const VALID_ESCAPE: u8 = 0x01;

/// Byte may not appear raw inside a string: control bytes below 0x20, plus
/// `"` and `\` (which end the unescaped run rather than the string being
/// malformed).
pub(crate) const INVALID_IN_STRING: u8 = 0x02;

/// ASCII hexadecimal digit, as used in `\uXXXX` escapes.
pub(crate) const HEX_DIGIT: u8 = 0x04;

/// Byte needs further processing during string scanning (`"` and `\`).
pub(crate) const NEEDS_PROCESSING: u8 = 0x08;

/// Non-ASCII byte; surfaces that validate UTF-8 key off this flag.
pub(crate) const NON_ASCII: u8 = 0x10;

/// Mask of bytes the string fast path must stop on.
pub(crate) const STRING_STOP: u8 = INVALID_IN_STRING | NEEDS_PROCESSING;

const fn classify(b: u8) -> u8 {
    let mut flags = 0u8;
    if b < 0x20 {
        flags |= INVALID_IN_STRING;
    }
    if b >= 0x80 {
        flags |= NON_ASCII;
    }
    if b == b'"' || b == b'\\' {
        flags |= VALID_ESCAPE | INVALID_IN_STRING | NEEDS_PROCESSING;
    }
    if b == b'/' || b == b'b' || b == b'f' || b == b'n' || b == b'r' || b == b't' {
        flags |= VALID_ESCAPE;
    }
    if b.is_ascii_hexdigit() {
        flags |= HEX_DIGIT;
    }
    flags
}

pub(crate) static CLASS: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = classify(b as u8);
        b += 1;
    }
    table
};

/// JSON whitespace: tab, LF, VT, FF, CR, space. A dedicated table (rather
/// than a predicate chain) measurably speeds up indentation-heavy input.
pub(crate) static WHITESPACE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'\t' as usize] = true;
    table[b'\n' as usize] = true;
    table[0x0b] = true;
    table[0x0c] = true;
    table[b'\r' as usize] = true;
    table[b' ' as usize] = true;
    table
};

#[inline]
pub(crate) fn class_of(b: u8) -> u8 {
    CLASS[b as usize]
}

#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    WHITESPACE[b as usize]
}
