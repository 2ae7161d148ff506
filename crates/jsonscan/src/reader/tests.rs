use super::*;

fn scan_string(input: &[u8]) -> Result<Buffer, ScanError> {
    let mut reader = Reader::new(input);
    let mut out = Buffer::new();
    reader.scan_string_body(&mut out)?;
    Ok(out)
}

#[test]
fn read_byte_distinguishes_eof_from_nul() {
    let mut reader = Reader::new(b"\x00");
    assert_eq!(reader.read_byte(), Some(0));
    assert_eq!(reader.read_byte(), None);
}

#[test]
fn read_byte_skip_ws_consumes_whitespace_runs() {
    let mut reader = Reader::new(b" \t\r\n  x \x0b\x0c y");
    assert_eq!(reader.read_byte_skip_ws(), Some(b'x'));
    assert_eq!(reader.read_byte_skip_ws(), Some(b'y'));
    assert_eq!(reader.read_byte_skip_ws(), None);
}

#[test]
fn unread_byte_steps_back_once() {
    let mut reader = Reader::new(b"ab");
    assert_eq!(reader.read_byte(), Some(b'a'));
    reader.unread_byte();
    assert_eq!(reader.read_byte(), Some(b'a'));
    assert_eq!(reader.read_byte(), Some(b'b'));
}

#[test]
#[should_panic(expected = "unread_byte at start of input")]
fn unread_byte_at_start_panics() {
    let mut reader = Reader::new(b"a");
    reader.unread_byte();
}

#[test]
#[should_panic(expected = "unread_byte without a preceding read")]
fn double_unread_panics() {
    let mut reader = Reader::new(b"ab");
    let _ = reader.read_byte();
    let _ = reader.read_byte();
    reader.unread_byte();
    reader.unread_byte();
}

#[test]
fn line_col_rescans_consumed_input() {
    let mut reader = Reader::new(b"ab\ncd\nef");
    assert_eq!(reader.line_col(), (1, 1));
    for _ in 0..4 {
        let _ = reader.read_byte();
    }
    // Consumed "ab\nc": cursor sits on line 2, after one byte.
    assert_eq!(reader.line_col(), (2, 2));
    for _ in 0..3 {
        let _ = reader.read_byte();
    }
    assert_eq!(reader.line_col(), (3, 2));
}

#[test]
fn reset_restarts_cleanly() {
    let mut reader = Reader::new(b"abc");
    let _ = reader.read_byte();
    reader.reset(b"xyz");
    assert_eq!(reader.pos(), 0);
    assert_eq!(reader.read_byte(), Some(b'x'));
}

#[test]
fn string_fast_path_is_one_contiguous_copy() {
    let out = scan_string(b"hello world\" tail").unwrap();
    assert_eq!(out.bytes(), b"hello world");
}

#[test]
fn string_scan_leaves_cursor_after_quote() {
    let mut reader = Reader::new(b"abc\",");
    let mut out = Buffer::new();
    reader.scan_string_body(&mut out).unwrap();
    assert_eq!(reader.read_byte(), Some(b','));
}

#[test]
fn empty_string_body() {
    let out = scan_string(b"\"").unwrap();
    assert_eq!(out.bytes(), b"");
}

#[test]
fn two_char_escapes_decode_to_literal_bytes() {
    let out = scan_string(br#"a\"b\\c\/d\be\ff\ng\rh\ti""#).unwrap();
    assert_eq!(out.bytes(), b"a\"b\\c/d\x08e\x0cf\ng\rh\ti");
}

#[test]
fn unicode_escape_decodes_to_utf8() {
    let out = scan_string(br#"A\u00e5\u2603""#).unwrap();
    assert_eq!(out.bytes(), "A\u{e5}\u{2603}".as_bytes());
}

#[test]
fn surrogate_pair_decodes_to_one_scalar() {
    let out = scan_string(br#"\uD834\uDD1E""#).unwrap();
    assert_eq!(out.bytes(), "\u{1d11e}".as_bytes());
}

#[test]
fn surrogate_pair_between_text_flushes_prefix() {
    let out = scan_string(br#"clef: \uD834\uDD1E!""#).unwrap();
    assert_eq!(out.bytes(), "clef: \u{1d11e}!".as_bytes());
}

#[test]
fn lone_high_surrogate_is_rejected() {
    assert_eq!(
        scan_string(br#"\uD834 rest""#),
        Err(ScanError::InvalidSurrogate(0xD834))
    );
}

#[test]
fn high_surrogate_followed_by_non_surrogate_is_rejected() {
    assert_eq!(
        scan_string(br#"\uD834A""#),
        Err(ScanError::InvalidSurrogate(0xD834))
    );
}

#[test]
fn lone_low_surrogate_is_rejected() {
    assert_eq!(
        scan_string(br#"\uDD1E""#),
        Err(ScanError::InvalidSurrogate(0xDD1E))
    );
}

#[test]
fn invalid_hex_digit_is_rejected() {
    assert_eq!(
        scan_string(br#"\u00g0""#),
        Err(ScanError::InvalidHexDigit(b'g'))
    );
}

#[test]
fn invalid_escape_character_is_rejected() {
    assert_eq!(scan_string(br#"\x41""#), Err(ScanError::InvalidEscape(b'x')));
}

#[test]
fn raw_control_byte_is_rejected() {
    assert_eq!(
        scan_string(b"ab\x01cd\""),
        Err(ScanError::InvalidStringByte(0x01))
    );
}

#[test]
fn unterminated_string_is_rejected() {
    assert_eq!(
        scan_string(b"no closing quote"),
        Err(ScanError::UnexpectedEndOfInput)
    );
    assert_eq!(scan_string(br#"trailing\"#), Err(ScanError::UnexpectedEndOfInput));
}

#[test]
fn multibyte_utf8_passes_through_the_fast_path() {
    let out = scan_string("snowman \u{2603} and clef \u{1d11e}\"".as_bytes()).unwrap();
    assert_eq!(out.bytes(), "snowman \u{2603} and clef \u{1d11e}".as_bytes());
}
