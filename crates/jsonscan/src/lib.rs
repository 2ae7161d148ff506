//! Low-level JSON tokenization and encoding runtime.
//!
//! This crate is the support library that generated (or hand-written)
//! marshal/unmarshal code calls into; it is not a document-to-struct binder
//! and it does not build a DOM. It supplies three cooperating pieces:
//!
//! - [`Lexer`]: a byte-oriented token scanner over a complete in-memory
//!   input slice. One [`Lexer::scan`] call produces one token, validating
//!   JSON grammar as it goes, with structural *capture* (reconstruct a
//!   value's exact bytes, re-quoted as valid JSON) and *skip* (validate and
//!   discard) traversals plus `scan_*_value` helpers that expect `:` and a
//!   typed value.
//! - [`Buffer`]: a growable byte accumulator that doubles as the lexer's
//!   token sink and as the value-encoding surface (integers in any base,
//!   floats, booleans, JSON-escaped strings). The [`Encoder`] trait restates
//!   its typed append surface for generated marshal code.
//! - [`Reader`]: the byte cursor underneath the lexer, with
//!   whitespace-skipping reads, single-byte pushback, and a string-body
//!   scanner whose fast path bulk-copies unescaped runs and whose slow path
//!   decodes escapes, including UTF-16 surrogate pairs.
//!
//! A token's payload lives in the lexer's output buffer and is valid until
//! the next `scan`. Instances are single-owner and single-threaded;
//! [`Lexer::reset`] and [`Buffer::reset`] fully re-initialize state so
//! callers may pool and reuse instances without reallocation.
//!
//! `//` and `/* */` comments are accepted as a non-standard extension,
//! gated by [`LexerOptions::allow_comments`] (on by default).

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod convert;
mod error;
mod lexer;
mod reader;
mod tables;

pub use buffer::{Buffer, Encoder, FloatFormat, FloatWidth, RewindError};
pub use convert::{NumberError, parse_float, parse_int, parse_uint};
pub use error::{PositionedError, ScanError};
pub use lexer::{Lexer, LexerOptions, ParseState, TokenKind};
pub use reader::Reader;
