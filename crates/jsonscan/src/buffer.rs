//! Growable byte buffer doubling as the lexer's token sink and the
//! value-encoding surface for generated marshal code.
//!
//! Every operation is a pure append except [`Buffer::rewind`], which
//! truncates, and [`Buffer::reset`], which drops the logical length while
//! keeping capacity. Reset-and-reuse is the allocation-avoidance mechanism
//! the whole runtime is built around: once capacity has stabilized, scan
//! cycles over a reused buffer never allocate.

use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use thiserror::Error;

use crate::{
    convert::format_int,
    tables::{self, NON_ASCII, STRING_STOP},
};

/// Textual form selector for [`Buffer::push_float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatFormat {
    /// Plain decimal notation (`-8.07`).
    Decimal,
    /// Exponential notation (`-8.07e0`).
    Exponential,
}

/// Bit width selector for float formatting and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    /// Narrow to `f32` first; shortest forms match the 32-bit value.
    F32,
    /// Full `f64` precision.
    F64,
}

/// Returned by [`Buffer::rewind`] when asked to truncate more bytes than
/// are buffered. The buffer is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot rewind {requested} bytes, only {available} buffered")]
pub struct RewindError {
    /// How many bytes the caller asked to drop.
    pub requested: usize,
    /// The buffer's logical length at the time of the call.
    pub available: usize,
}

/// An owned, growable byte accumulator with typed append operations.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty buffer with `capacity` bytes pre-reserved.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// The accumulated bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Logical length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been appended since construction or reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Allocated capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Appends a single byte.
    #[inline]
    pub fn push_byte(&mut self, b: u8) {
        self.data.push(b);
    }

    /// Appends a byte slice.
    #[inline]
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Appends the UTF-8 bytes of `s`.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Appends `value` formatted in `base` (2–36).
    ///
    /// # Panics
    ///
    /// If `base` is outside 2–36; that is a caller bug, not a data error.
    pub fn push_int(&mut self, value: i64, base: u32) {
        format_int(self, value.unsigned_abs(), base, value < 0);
    }

    /// Appends `value` formatted in `base` (2–36).
    ///
    /// # Panics
    ///
    /// If `base` is outside 2–36; that is a caller bug, not a data error.
    pub fn push_uint(&mut self, value: u64, base: u32) {
        format_int(self, value, base, false);
    }

    /// Appends the literal bytes `true` or `false`.
    pub fn push_bool(&mut self, value: bool) {
        self.push_bytes(if value { b"true" } else { b"false" });
    }

    /// Appends `value` in the requested textual form.
    ///
    /// `precision: None` selects the shortest representation that parses
    /// back to the same value; `Some(p)` fixes `p` digits after the point.
    /// With [`FloatWidth::F32`] the value is narrowed before formatting so
    /// the shortest form reflects the 32-bit value.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_float(
        &mut self,
        value: f64,
        format: FloatFormat,
        precision: Option<usize>,
        width: FloatWidth,
    ) {
        match width {
            FloatWidth::F32 => self.format_float(value as f32, format, precision),
            FloatWidth::F64 => self.format_float(value, format, precision),
        }
    }

    fn format_float<F: fmt::Display + fmt::LowerExp>(
        &mut self,
        value: F,
        format: FloatFormat,
        precision: Option<usize>,
    ) {
        // Writes through `fmt::Write` go straight into the byte store; the
        // sink is infallible so the result is discarded.
        let _ = match (format, precision) {
            (FloatFormat::Decimal, None) => write!(self, "{value}"),
            (FloatFormat::Decimal, Some(p)) => write!(self, "{value:.prec$}", prec = p),
            (FloatFormat::Exponential, None) => write!(self, "{value:e}"),
            (FloatFormat::Exponential, Some(p)) => write!(self, "{value:.prec$e}", prec = p),
        };
    }

    /// Appends `raw` as a quoted, JSON-escaped string.
    ///
    /// `raw` holds already-decoded content: `"`, `\`, and control bytes
    /// below 0x20 are escaped (short escapes where JSON defines them,
    /// `\u00XX` otherwise), valid UTF-8 passes through byte-for-byte, and
    /// invalid sequences become U+FFFD.
    pub fn push_json(&mut self, raw: &[u8]) {
        self.push_byte(b'"');
        let mut rest = raw;
        while !rest.is_empty() {
            // Bulk-copy the longest prefix that needs no attention.
            let mut plain = 0;
            while plain < rest.len()
                && tables::class_of(rest[plain]) & (STRING_STOP | NON_ASCII) == 0
            {
                plain += 1;
            }
            self.push_bytes(&rest[..plain]);
            rest = &rest[plain..];

            let Some(&b) = rest.first() else { break };
            if b < 0x80 {
                self.push_escaped(b);
                rest = &rest[1..];
            } else {
                let (ch, len) = bstr::decode_utf8(rest);
                if ch.is_some() {
                    self.push_bytes(&rest[..len]);
                } else {
                    self.push_str("\u{fffd}");
                }
                rest = &rest[len..];
            }
        }
        self.push_byte(b'"');
    }

    /// Appends `s` as a quoted, JSON-escaped string.
    pub fn push_json_str(&mut self, s: &str) {
        self.push_json(s.as_bytes());
    }

    fn push_escaped(&mut self, b: u8) {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        match b {
            b'"' => self.push_str("\\\""),
            b'\\' => self.push_str("\\\\"),
            0x08 => self.push_str("\\b"),
            0x0c => self.push_str("\\f"),
            b'\n' => self.push_str("\\n"),
            b'\r' => self.push_str("\\r"),
            b'\t' => self.push_str("\\t"),
            _ => {
                self.push_str("\\u00");
                self.push_byte(HEX[usize::from(b >> 4)]);
                self.push_byte(HEX[usize::from(b & 0x0f)]);
            }
        }
    }

    /// Reserves room for at least `additional` more bytes without changing
    /// the logical length.
    pub fn grow(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Truncates the buffer by `n` bytes.
    ///
    /// # Errors
    ///
    /// [`RewindError`] when `n` exceeds the current length; the buffer is
    /// not modified in that case.
    pub fn rewind(&mut self, n: usize) -> Result<(), RewindError> {
        let len = self.data.len();
        if n > len {
            return Err(RewindError {
                requested: n,
                available: len,
            });
        }
        self.data.truncate(len - n);
        Ok(())
    }

    /// Drops all content, retaining capacity for reuse.
    pub fn reset(&mut self) {
        self.data.clear();
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

/// The typed append surface of [`Buffer`] as a capability trait.
///
/// Generated marshal code is written against `E: Encoder` so tests can
/// substitute a recording sink and assert the exact append sequence.
/// Buffer lifecycle operations (`rewind`, `reset`, `bytes`) are deliberately
/// not part of the capability.
pub trait Encoder {
    /// Appends a single byte.
    fn push_byte(&mut self, b: u8);
    /// Appends a byte slice.
    fn push_bytes(&mut self, bytes: &[u8]);
    /// Appends the UTF-8 bytes of `s`.
    fn push_str(&mut self, s: &str);
    /// Appends a signed integer formatted in `base` (2–36).
    fn push_int(&mut self, value: i64, base: u32);
    /// Appends an unsigned integer formatted in `base` (2–36).
    fn push_uint(&mut self, value: u64, base: u32);
    /// Appends the literal bytes `true` or `false`.
    fn push_bool(&mut self, value: bool);
    /// Appends a float in the requested textual form.
    fn push_float(
        &mut self,
        value: f64,
        format: FloatFormat,
        precision: Option<usize>,
        width: FloatWidth,
    );
    /// Appends already-decoded bytes as a quoted, JSON-escaped string.
    fn push_json(&mut self, raw: &[u8]);
    /// Appends `s` as a quoted, JSON-escaped string.
    fn push_json_str(&mut self, s: &str);
    /// Reserves room for at least `additional` more bytes.
    fn grow(&mut self, additional: usize);
}

impl Encoder for Buffer {
    fn push_byte(&mut self, b: u8) {
        Buffer::push_byte(self, b);
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        Buffer::push_bytes(self, bytes);
    }

    fn push_str(&mut self, s: &str) {
        Buffer::push_str(self, s);
    }

    fn push_int(&mut self, value: i64, base: u32) {
        Buffer::push_int(self, value, base);
    }

    fn push_uint(&mut self, value: u64, base: u32) {
        Buffer::push_uint(self, value, base);
    }

    fn push_bool(&mut self, value: bool) {
        Buffer::push_bool(self, value);
    }

    fn push_float(
        &mut self,
        value: f64,
        format: FloatFormat,
        precision: Option<usize>,
        width: FloatWidth,
    ) {
        Buffer::push_float(self, value, format, precision, width);
    }

    fn push_json(&mut self, raw: &[u8]) {
        Buffer::push_json(self, raw);
    }

    fn push_json_str(&mut self, s: &str) {
        Buffer::push_json_str(self, s);
    }

    fn grow(&mut self, additional: usize) {
        Buffer::grow(self, additional);
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String, vec::Vec};

    use super::*;

    #[test]
    fn number_appends() {
        let mut buf = Buffer::new();
        buf.push_int(-6, 10);
        assert_eq!(buf.bytes(), b"-6");

        buf.reset();
        buf.push_uint(8, 10);
        assert_eq!(buf.bytes(), b"8");

        buf.reset();
        buf.push_float(-8.07, FloatFormat::Decimal, None, FloatWidth::F64);
        assert_eq!(buf.bytes(), b"-8.07");
    }

    #[test]
    fn int_appends_in_other_bases() {
        let mut buf = Buffer::new();
        buf.push_int(255, 16);
        assert_eq!(buf.bytes(), b"ff");

        buf.reset();
        buf.push_int(-5, 2);
        assert_eq!(buf.bytes(), b"-101");

        buf.reset();
        buf.push_uint(u64::MAX, 10);
        assert_eq!(buf.bytes(), b"18446744073709551615");
    }

    #[test]
    fn float_formats() {
        let mut buf = Buffer::new();
        buf.push_float(1.5, FloatFormat::Decimal, Some(3), FloatWidth::F64);
        assert_eq!(buf.bytes(), b"1.500");

        buf.reset();
        buf.push_float(1500.0, FloatFormat::Exponential, None, FloatWidth::F64);
        assert_eq!(buf.bytes(), b"1.5e3");

        buf.reset();
        // Narrowing first keeps the shortest form of the 32-bit value.
        buf.push_float(f64::from(0.1f32), FloatFormat::Decimal, None, FloatWidth::F32);
        assert_eq!(buf.bytes(), b"0.1");
    }

    #[test]
    fn bool_appends() {
        let mut buf = Buffer::new();
        buf.push_bool(true);
        buf.push_byte(b',');
        buf.push_bool(false);
        assert_eq!(buf.bytes(), b"true,false");
    }

    #[test]
    fn json_escaping() {
        let mut buf = Buffer::new();
        buf.push_json_str("plain");
        assert_eq!(buf.bytes(), b"\"plain\"");

        buf.reset();
        buf.push_json_str("say \"hi\"\\\n");
        assert_eq!(buf.bytes(), br#""say \"hi\"\\\n""#);

        buf.reset();
        buf.push_json_str("tab\there");
        assert_eq!(buf.bytes(), br#""tab\there""#);

        buf.reset();
        buf.push_json(b"\x00\x1f");
        assert_eq!(buf.bytes(), br#""\u0000\u001f""#);

        buf.reset();
        buf.push_json_str("snowman \u{2603}");
        assert_eq!(buf.bytes(), "\"snowman \u{2603}\"".as_bytes());
    }

    #[test]
    fn json_escaping_replaces_invalid_utf8() {
        let mut buf = Buffer::new();
        buf.push_json(b"a\xffb");
        assert_eq!(buf.bytes(), "\"a\u{fffd}b\"".as_bytes());
    }

    #[test]
    fn rewind_truncates_and_rejects_overshoot() {
        let mut buf = Buffer::new();
        buf.push_str("abcdef");
        buf.rewind(2).unwrap();
        assert_eq!(buf.bytes(), b"abcd");

        let err = buf.rewind(5).unwrap_err();
        assert_eq!(
            err,
            RewindError {
                requested: 5,
                available: 4
            }
        );
        // Failed rewind leaves the buffer untouched.
        assert_eq!(buf.bytes(), b"abcd");
    }

    #[test]
    fn reset_behaves_like_new() {
        let mut reused = Buffer::new();
        reused.push_str("first pass");
        reused.reset();

        let mut fresh = Buffer::new();
        for buf in [&mut reused, &mut fresh] {
            buf.push_int(42, 10);
            buf.push_bool(true);
        }
        assert_eq!(reused.bytes(), fresh.bytes());
    }

    #[test]
    fn reset_reuse_does_not_grow_past_high_water_mark() {
        let mut buf = Buffer::new();
        for _ in 0..1000 {
            buf.reset();
            buf.push_str("a moderately sized payload");
            buf.push_int(123_456, 10);
        }
        let high_water = buf.capacity();
        for _ in 0..1000 {
            buf.reset();
            buf.push_str("a moderately sized payload");
            buf.push_int(123_456, 10);
        }
        assert_eq!(buf.capacity(), high_water);
    }

    #[test]
    fn grow_reserves_without_lengthening() {
        let mut buf = Buffer::new();
        buf.grow(128);
        assert!(buf.capacity() >= 128);
        assert!(buf.is_empty());
    }

    /// Recording sink proving callers can observe exact append sequences.
    #[derive(Default)]
    struct RecordingSink {
        ops: Vec<String>,
    }

    impl Encoder for RecordingSink {
        fn push_byte(&mut self, b: u8) {
            self.ops.push(format!("byte {b:#04x}"));
        }

        fn push_bytes(&mut self, bytes: &[u8]) {
            self.ops.push(format!("bytes {}", bytes.len()));
        }

        fn push_str(&mut self, s: &str) {
            self.ops.push(format!("str {s}"));
        }

        fn push_int(&mut self, value: i64, base: u32) {
            self.ops.push(format!("int {value} base {base}"));
        }

        fn push_uint(&mut self, value: u64, base: u32) {
            self.ops.push(format!("uint {value} base {base}"));
        }

        fn push_bool(&mut self, value: bool) {
            self.ops.push(format!("bool {value}"));
        }

        fn push_float(
            &mut self,
            value: f64,
            _format: FloatFormat,
            _precision: Option<usize>,
            _width: FloatWidth,
        ) {
            self.ops.push(format!("float {value}"));
        }

        fn push_json(&mut self, raw: &[u8]) {
            self.ops.push(format!("json {}", raw.len()));
        }

        fn push_json_str(&mut self, s: &str) {
            self.ops.push(format!("json-str {s}"));
        }

        fn grow(&mut self, additional: usize) {
            self.ops.push(format!("grow {additional}"));
        }
    }

    fn encode_pair<E: Encoder>(out: &mut E) {
        out.push_byte(b'{');
        out.push_json_str("id");
        out.push_byte(b':');
        out.push_int(7, 10);
        out.push_byte(b'}');
    }

    #[test]
    fn encoder_mock_sees_exact_append_sequence() {
        let mut sink = RecordingSink::default();
        encode_pair(&mut sink);
        assert_eq!(
            sink.ops,
            ["byte 0x7b", "json-str id", "byte 0x3a", "int 7 base 10", "byte 0x7d"]
        );
    }

    #[test]
    fn encoder_buffer_produces_the_document() {
        let mut buf = Buffer::new();
        encode_pair(&mut buf);
        assert_eq!(buf.bytes(), br#"{"id":7}"#);
    }
}
