// Run-length codec.
//
// Repeats of three or more bytes become `0xFF value count` run tokens; all
// other bytes pass through unchanged. Because `0xFF` doubles as the run
// marker, every `0xFF` value is written as a run token, even a single one,
// so the decoder never mistakes a literal for a marker.

use log::debug;

use super::token::{MAX_RUN, MIN_RUN, RLE_RUN_MARKER, RleToken, RleTokens};
use super::{Algorithm, Codec, CodecError};

/// The run-length codec. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec;

impl Codec for RleCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rle
    }

    fn encode(&self, input: &[u8]) -> Vec<u8> {
        encode(input)
    }

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        decode(input)
    }
}

/// Encode `input` as a run-length stream.
///
/// Runs are capped at 255 bytes; a longer stretch of one value is split
/// into consecutive runs, with any tail shorter than three bytes emitted as
/// literals.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let Some((&first, rest)) = input.split_first() else {
        return out;
    };

    let mut current = first;
    let mut count = 1usize;

    for &byte in rest {
        if byte == current && count < MAX_RUN {
            count += 1;
            continue;
        }
        flush_run(current, count, &mut out);
        current = byte;
        count = 1;
    }
    flush_run(current, count, &mut out);

    debug!("rle: encoded {} -> {} byte(s)", input.len(), out.len());
    out
}

fn flush_run(value: u8, count: usize, out: &mut Vec<u8>) {
    if count >= MIN_RUN || value == RLE_RUN_MARKER {
        RleToken::Run {
            value,
            count: count as u8,
        }
        .write_to(out);
    } else {
        out.resize(out.len() + count, value);
    }
}

/// Decode a run-length stream.
///
/// Fails with `MalformedStream` if a run marker is missing its value or
/// count byte. A zero-count run is accepted and expands to nothing.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(input.len());

    for token in RleTokens::new(input) {
        match token?.1 {
            RleToken::Literal(value) => out.push(value),
            RleToken::Run { value, count } => out.resize(out.len() + count as usize, value),
        }
    }

    debug!("rle: decoded {} -> {} byte(s)", input.len(), out.len());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
