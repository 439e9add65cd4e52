// Tagged container for codec streams.
//
// A frame is one tag byte naming the codec followed by the raw stream:
//
//   b'R' <rle stream>      b'W' <window-match stream>
//
// Raw streams stay headerless; framing is opt-in for callers that cannot
// track which codec produced a buffer.

use log::debug;

use crate::codec::{self, Algorithm, Codec, CodecError};

/// Tag byte for RLE frames.
pub const TAG_RLE: u8 = b'R';
/// Tag byte for window-match frames.
pub const TAG_WINDOW_MATCH: u8 = b'W';

/// Tag byte written in front of `algorithm`'s stream.
pub fn tag_for(algorithm: Algorithm) -> u8 {
    match algorithm {
        Algorithm::Rle => TAG_RLE,
        Algorithm::WindowMatch => TAG_WINDOW_MATCH,
    }
}

/// The algorithm a tag byte names, if any.
pub fn algorithm_for(tag: u8) -> Option<Algorithm> {
    match tag {
        TAG_RLE => Some(Algorithm::Rle),
        TAG_WINDOW_MATCH => Some(Algorithm::WindowMatch),
        _ => None,
    }
}

/// Encode `input` with `algorithm` and prefix the tag.
pub fn encode_framed(algorithm: Algorithm, input: &[u8]) -> Vec<u8> {
    encode_framed_with(algorithm.codec().as_ref(), input)
}

/// Encode `input` with a configured codec and prefix its tag.
pub fn encode_framed_with(codec: &dyn Codec, input: &[u8]) -> Vec<u8> {
    let payload = codec.encode(input);
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(tag_for(codec.algorithm()));
    out.extend_from_slice(&payload);
    out
}

/// Let the selector choose the codec, then frame its output.
pub fn encode_framed_auto(input: &[u8]) -> (Algorithm, Vec<u8>) {
    let algorithm = crate::select::select(input);
    (algorithm, encode_framed(algorithm, input))
}

/// Read the tag of a framed buffer without decoding the payload.
pub fn peek_algorithm(framed: &[u8]) -> Result<Algorithm, CodecError> {
    let &tag = framed.first().ok_or(CodecError::EmptyFrame)?;
    algorithm_for(tag).ok_or(CodecError::UnknownTag(tag))
}

/// Decode a framed buffer, returning the codec it named and the payload.
///
/// Error positions in `MalformedStream` are relative to the payload, not
/// the frame.
pub fn decode_framed(framed: &[u8]) -> Result<(Algorithm, Vec<u8>), CodecError> {
    let algorithm = peek_algorithm(framed)?;
    debug!("frame: {algorithm} payload of {} byte(s)", framed.len() - 1);
    let decoded = codec::decode(algorithm, &framed[1..])?;
    Ok((algorithm, decoded))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
