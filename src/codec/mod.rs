// Byte codecs: run-length encoding and bounded-window LZ.
//
// - `token` : token formats, marker constants, and stream readers
// - `rle`   : run-length codec (0xFF run marker, raw literals)
// - `window`: window-match codec (0x00 literal / 0x01 match markers)
//
// Raw streams carry no header, so decoding needs the same `Algorithm` that
// produced the stream. `crate::frame` adds a one-byte tag for callers that
// want self-describing output.

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

pub mod rle;
pub mod token;
pub mod window;

pub use rle::RleCodec;
pub use token::{RleToken, WindowToken};
pub use window::{WindowConfig, WindowMatchCodec};

// ---------------------------------------------------------------------------
// Algorithm identifier
// ---------------------------------------------------------------------------

/// Identifies which codec produced (or should produce) a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Run-length encoding.
    Rle,
    /// Bounded-window match codec ("LZ-lite").
    WindowMatch,
}

impl Algorithm {
    /// Every supported algorithm, in a stable order.
    pub const ALL: [Algorithm; 2] = [Algorithm::Rle, Algorithm::WindowMatch];

    /// Short name used on the command line and in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rle => "rle",
            Self::WindowMatch => "lz",
        }
    }

    /// A codec for this algorithm with its default configuration.
    pub fn codec(self) -> Box<dyn Codec> {
        self.codec_with(WindowConfig::default())
    }

    /// A codec for this algorithm; `window` only affects window-match.
    pub fn codec_with(self, window: WindowConfig) -> Box<dyn Codec> {
        match self {
            Self::Rle => Box::new(RleCodec),
            Self::WindowMatch => Box::new(WindowMatchCodec::new(window)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rle" => Ok(Self::Rle),
            "lz" | "lz-lite" | "window" | "window-match" => Ok(Self::WindowMatch),
            _ => Err(CodecError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by decoding and codec selection. Encoding never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The stream ended mid-token or contained an invalid token.
    #[error("malformed {algorithm} stream at byte {position}: {kind}")]
    MalformedStream {
        algorithm: Algorithm,
        /// Offset of the offending token within the encoded buffer.
        position: usize,
        kind: MalformedKind,
    },

    /// The caller named a codec that does not exist.
    #[error("unsupported algorithm '{0}' (expected 'rle' or 'lz')")]
    UnsupportedAlgorithm(String),

    /// A framed stream had no tag byte.
    #[error("empty frame: missing codec tag")]
    EmptyFrame,

    /// A framed stream started with an unknown tag byte.
    #[error("unknown frame tag {0:#04x}")]
    UnknownTag(u8),
}

/// What exactly was wrong with a malformed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedKind {
    #[error("marker {marker:#04x} needs {needed} trailing byte(s), {available} available")]
    Truncated {
        marker: u8,
        needed: usize,
        available: usize,
    },

    #[error("unknown marker byte {0:#04x}")]
    UnknownMarker(u8),

    #[error("match offset {offset} outside the {available} byte(s) decoded so far")]
    OffsetOutOfRange { offset: usize, available: usize },
}

impl CodecError {
    pub(crate) fn malformed(algorithm: Algorithm, position: usize, kind: MalformedKind) -> Self {
        Self::MalformedStream {
            algorithm,
            position,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Codec trait
// ---------------------------------------------------------------------------

/// A reversible byte codec.
///
/// `decode(&encode(x))` must return `x` for every input.
pub trait Codec: Send + Sync {
    /// The identifier a caller must pass to decode this codec's output.
    fn algorithm(&self) -> Algorithm;

    /// Encode a whole buffer. Total: every input has an encoding.
    fn encode(&self, input: &[u8]) -> Vec<u8>;

    /// Decode a whole buffer produced by `encode`.
    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;
}

// ---------------------------------------------------------------------------
// Dispatch by identifier
// ---------------------------------------------------------------------------

/// Encode `input` with the default configuration of `algorithm`.
pub fn encode(algorithm: Algorithm, input: &[u8]) -> Vec<u8> {
    algorithm.codec().encode(input)
}

/// Decode a raw stream that `algorithm` produced.
///
/// Streams carry no header: decoding with the wrong algorithm yields
/// garbage or a `MalformedStream` error.
pub fn decode(algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>, CodecError> {
    algorithm.codec().decode(input)
}

/// Let the selector pick a codec, then encode with it.
pub fn encode_auto(input: &[u8]) -> (Algorithm, Vec<u8>) {
    let algorithm = crate::select::select(input);
    debug!("auto-selected {algorithm} for {} byte(s)", input.len());
    (algorithm, encode(algorithm, input))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
