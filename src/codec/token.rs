// Token formats for the RLE and window-match streams.
//
// RLE:          Literal = value            (1 byte, never 0xFF)
//               Run     = 0xFF value count (3 bytes)
// Window-match: Literal = 0x00 value          (2 bytes)
//               Match   = 0x01 offset length  (3 bytes)
//
// Streams are flat token sequences with no length prefix. The readers below
// walk an encoded buffer one token at a time and report truncation or bad
// markers as `CodecError::MalformedStream` instead of reading past the end.

use super::{Algorithm, CodecError, MalformedKind};

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// RLE run marker. Literal `0xFF` bytes are always escaped as runs.
pub const RLE_RUN_MARKER: u8 = 0xFF;
/// Window-match literal marker.
pub const WINDOW_LITERAL_MARKER: u8 = 0x00;
/// Window-match back-reference marker.
pub const WINDOW_MATCH_MARKER: u8 = 0x01;

/// Shortest repeat the RLE encoder turns into a run token.
pub const MIN_RUN: usize = 3;
/// Longest run a single RLE token can describe.
pub const MAX_RUN: usize = u8::MAX as usize;
/// Farthest back a match can reach.
pub const MAX_OFFSET: usize = u8::MAX as usize;
/// Longest match a single token can describe.
pub const MAX_MATCH: usize = u8::MAX as usize;

// ---------------------------------------------------------------------------
// RLE tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleToken {
    Literal(u8),
    Run { value: u8, count: u8 },
}

impl RleToken {
    /// Size of the token in the encoded stream.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Run { .. } => 3,
        }
    }

    /// Number of bytes the token expands to.
    pub fn decoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Run { count, .. } => *count as usize,
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match *self {
            Self::Literal(value) => {
                debug_assert_ne!(value, RLE_RUN_MARKER, "0xFF must be escaped as a run");
                out.push(value);
            }
            Self::Run { value, count } => out.extend_from_slice(&[RLE_RUN_MARKER, value, count]),
        }
    }
}

/// Reads RLE tokens from an encoded buffer.
///
/// Yields `(position, token)` pairs, where `position` is the token's offset
/// in the buffer. Stops after the first error.
#[derive(Debug, Clone)]
pub struct RleTokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RleTokens<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Iterator for RleTokens<'_> {
    type Item = Result<(usize, RleToken), CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let marker = *self.data.get(start)?;

        if marker != RLE_RUN_MARKER {
            self.pos += 1;
            return Some(Ok((start, RleToken::Literal(marker))));
        }

        match self.data.get(start + 1..start + 3) {
            Some(&[value, count]) => {
                self.pos += 3;
                Some(Ok((start, RleToken::Run { value, count })))
            }
            _ => {
                self.pos = self.data.len();
                Some(Err(truncated(Algorithm::Rle, self.data, start, 2)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Window-match tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowToken {
    Literal(u8),
    /// Copy `length` bytes starting `offset` bytes back from the end of the
    /// output. `length` may exceed `offset`.
    Match { offset: u8, length: u8 },
}

impl WindowToken {
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 2,
            Self::Match { .. } => 3,
        }
    }

    pub fn decoded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => *length as usize,
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match *self {
            Self::Literal(value) => out.extend_from_slice(&[WINDOW_LITERAL_MARKER, value]),
            Self::Match { offset, length } => {
                out.extend_from_slice(&[WINDOW_MATCH_MARKER, offset, length])
            }
        }
    }
}

/// Reads window-match tokens from an encoded buffer.
///
/// Only checks the token framing; offsets are validated by the decoder,
/// which knows how much output exists.
#[derive(Debug, Clone)]
pub struct WindowTokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WindowTokens<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn fail(&mut self, err: CodecError) -> Option<<Self as Iterator>::Item> {
        self.pos = self.data.len();
        Some(Err(err))
    }
}

impl Iterator for WindowTokens<'_> {
    type Item = Result<(usize, WindowToken), CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let marker = *self.data.get(start)?;

        match marker {
            WINDOW_LITERAL_MARKER => match self.data.get(start + 1) {
                Some(&value) => {
                    self.pos += 2;
                    Some(Ok((start, WindowToken::Literal(value))))
                }
                None => {
                    let err = truncated(Algorithm::WindowMatch, self.data, start, 1);
                    self.fail(err)
                }
            },
            WINDOW_MATCH_MARKER => match self.data.get(start + 1..start + 3) {
                Some(&[offset, length]) => {
                    self.pos += 3;
                    Some(Ok((start, WindowToken::Match { offset, length })))
                }
                _ => {
                    let err = truncated(Algorithm::WindowMatch, self.data, start, 2);
                    self.fail(err)
                }
            },
            other => self.fail(CodecError::malformed(
                Algorithm::WindowMatch,
                start,
                MalformedKind::UnknownMarker(other),
            )),
        }
    }
}

fn truncated(algorithm: Algorithm, data: &[u8], start: usize, needed: usize) -> CodecError {
    CodecError::malformed(
        algorithm,
        start,
        MalformedKind::Truncated {
            marker: data[start],
            needed,
            available: data.len() - start - 1,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
