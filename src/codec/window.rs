// Window-match codec ("LZ-lite").
//
// Greedy LZ77 over a small trailing window. At each position the encoder
// brute-force scans the window from its oldest byte for the longest match,
// emitting a 3-byte back-reference when it reaches `min_match` and a
// 2-byte literal otherwise. Offsets and lengths fit one byte each.
//
// The decoder copies matches one byte at a time, so a match whose length
// exceeds its offset repeats the bytes it is producing.

use log::{debug, trace};

use super::token::{MAX_MATCH, MAX_OFFSET, WindowToken, WindowTokens};
use super::{Algorithm, Codec, CodecError, MalformedKind};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Default number of preceding bytes searched for a match.
pub const DEFAULT_WINDOW_SIZE: usize = 20;
/// Default shortest match worth a back-reference.
pub const DEFAULT_MIN_MATCH: usize = 3;

/// Encoder tuning. Decoding needs none of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// How far back to search. Values above 255 are clamped to 255.
    pub window_size: usize,
    /// Shortest match emitted as a back-reference (clamped to 1..=255).
    pub min_match: usize,
    /// Let a candidate run past the current position into the bytes the
    /// match itself produces. When false, candidates stop at the current
    /// position.
    pub allow_overlap: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_match: DEFAULT_MIN_MATCH,
            allow_overlap: true,
        }
    }
}

impl WindowConfig {
    fn effective_window(&self) -> usize {
        self.window_size.min(MAX_OFFSET)
    }

    fn effective_min_match(&self) -> usize {
        self.min_match.clamp(1, MAX_MATCH)
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// The window-match codec with a fixed encoder configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowMatchCodec {
    pub config: WindowConfig,
}

impl WindowMatchCodec {
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }
}

impl Codec for WindowMatchCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::WindowMatch
    }

    fn encode(&self, input: &[u8]) -> Vec<u8> {
        encode_with(input, &self.config)
    }

    fn decode(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        decode(input)
    }
}

// ---------------------------------------------------------------------------
// Match search
// ---------------------------------------------------------------------------

/// A back-reference candidate for one encoder position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Distance back from the current position.
    pub offset: usize,
    pub length: usize,
}

/// Find the longest match for `input[pos..]` in the window before `pos`.
///
/// Window positions are scanned oldest first and only a strictly longer
/// candidate replaces the best one, so ties go to the largest offset.
/// Returns `None` if the best candidate is shorter than `min_match`.
pub fn find_longest_match(
    input: &[u8],
    pos: usize,
    config: &WindowConfig,
) -> Option<MatchCandidate> {
    let window_start = pos.saturating_sub(config.effective_window());
    let max_len = input.len().saturating_sub(pos).min(MAX_MATCH);
    let mut best: Option<MatchCandidate> = None;

    for i in window_start..pos {
        let limit = if config.allow_overlap {
            max_len
        } else {
            max_len.min(pos - i)
        };
        let length = input[i..]
            .iter()
            .zip(&input[pos..])
            .take(limit)
            .take_while(|(a, b)| a == b)
            .count();

        if length > best.map_or(0, |m| m.length) {
            best = Some(MatchCandidate {
                offset: pos - i,
                length,
            });
        }
    }

    best.filter(|m| m.length >= config.effective_min_match())
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Encode with the default configuration (window 20, min match 3).
pub fn encode(input: &[u8]) -> Vec<u8> {
    encode_with(input, &WindowConfig::default())
}

/// Encode with an explicit configuration.
pub fn encode_with(input: &[u8], config: &WindowConfig) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() * 2);
    let mut pos = 0;
    let mut matches = 0usize;

    while pos < input.len() {
        let token = match find_longest_match(input, pos, config) {
            Some(m) => {
                trace!("lz: match at {pos}: offset {} length {}", m.offset, m.length);
                pos += m.length;
                matches += 1;
                WindowToken::Match {
                    offset: m.offset as u8,
                    length: m.length as u8,
                }
            }
            None => {
                let literal = WindowToken::Literal(input[pos]);
                pos += 1;
                literal
            }
        };
        token.write_to(&mut out);
    }

    debug!(
        "lz: encoded {} -> {} byte(s), {matches} match(es)",
        input.len(),
        out.len()
    );
    out
}

/// Decode a window-match stream.
///
/// Fails with `MalformedStream` on an unknown marker, a truncated token, or
/// a match that reaches before the start of the output.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(input.len());

    for token in WindowTokens::new(input) {
        let (position, token) = token?;
        match token {
            WindowToken::Literal(value) => out.push(value),
            WindowToken::Match { offset, length } => {
                let offset = offset as usize;
                if offset == 0 || offset > out.len() {
                    return Err(CodecError::malformed(
                        Algorithm::WindowMatch,
                        position,
                        MalformedKind::OffsetOutOfRange {
                            offset,
                            available: out.len(),
                        },
                    ));
                }
                let start = out.len() - offset;
                out.reserve(length as usize);
                // Byte at a time: later bytes of an overlapping copy read
                // earlier bytes of the same copy.
                for k in 0..length as usize {
                    let byte = out[start + k];
                    out.push(byte);
                }
            }
        }
    }

    debug!("lz: decoded {} -> {} byte(s)", input.len(), out.len());
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(encoded: &[u8]) -> Vec<WindowToken> {
        WindowTokens::new(encoded).map(|t| t.unwrap().1).collect()
    }

    #[test]
    fn empty_input() {
        assert!(encode(b"").is_empty());
        assert!(decode(b"").unwrap().is_empty());
    }

    #[test]
    fn no_repeats_are_literals() {
        let input = b"ABCDEFGH";
        let encoded = encode(input);
        assert_eq!(encoded.len(), 2 * input.len());
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn periodic_pattern_compresses() {
        let input = b"ABCABCABCABCABC";
        let encoded = encode(input);
        assert!(encoded.len() < 2 * input.len(), "len={}", encoded.len());
        assert_eq!(
            tokens(&encoded),
            vec![
                WindowToken::Literal(b'A'),
                WindowToken::Literal(b'B'),
                WindowToken::Literal(b'C'),
                WindowToken::Match { offset: 3, length: 12 },
            ]
        );
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn overlapping_copy() {
        let encoded = encode(b"AAAAA");
        assert_eq!(
            tokens(&encoded),
            vec![
                WindowToken::Literal(b'A'),
                WindowToken::Match { offset: 1, length: 4 },
            ]
        );
        assert_eq!(decode(&encoded).unwrap(), b"AAAAA");
    }

    #[test]
    fn prefix_only_search() {
        let config = WindowConfig {
            allow_overlap: false,
            ..Default::default()
        };
        let input = b"ABCABCABCABCABC";
        let encoded = encode_with(input, &config);
        assert_eq!(
            tokens(&encoded),
            vec![
                WindowToken::Literal(b'A'),
                WindowToken::Literal(b'B'),
                WindowToken::Literal(b'C'),
                WindowToken::Match { offset: 3, length: 3 },
                WindowToken::Match { offset: 6, length: 6 },
                WindowToken::Match { offset: 12, length: 3 },
            ]
        );
        assert_eq!(decode(&encoded).unwrap(), input);

        // Without overlap a run never reaches three bytes of prefix in time.
        assert_eq!(encode_with(b"AAAAA", &config).len(), 10);
    }

    #[test]
    fn ties_prefer_oldest_position() {
        // "XYZ" occurs at 0 and 4; both give a 3-byte match at 8.
        let input = b"XYZ-XYZ-XYZ";
        let m = find_longest_match(input, 8, &WindowConfig::default()).unwrap();
        assert_eq!(m, MatchCandidate { offset: 8, length: 3 });
    }

    #[test]
    fn window_limits_reach() {
        let mut input = b"HELLO".to_vec();
        input.extend((0..30u8).map(|i| b'a' + i));
        input.extend_from_slice(b"HELLO");
        let pos = input.len() - 5;
        assert!(find_longest_match(&input, pos, &WindowConfig::default()).is_none());

        let wide = WindowConfig {
            window_size: 64,
            ..Default::default()
        };
        let m = find_longest_match(&input, pos, &wide).unwrap();
        assert_eq!(m.length, 5);
        assert_eq!(decode(&encode_with(&input, &wide)).unwrap(), input);
    }

    #[test]
    fn oversized_config_is_clamped() {
        let config = WindowConfig {
            window_size: 10_000,
            min_match: 0,
            allow_overlap: true,
        };
        let input: Vec<u8> = (0..2000u32).map(|i| (i % 300 % 251) as u8).collect();
        let encoded = encode_with(&input, &config);
        for token in tokens(&encoded) {
            if let WindowToken::Match { offset, length } = token {
                assert!(offset >= 1 && length >= 1);
            }
        }
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn long_match_caps_at_255() {
        let input = vec![b'z'; 600];
        let encoded = encode(&input);
        assert!(tokens(&encoded).contains(&WindowToken::Match {
            offset: 1,
            length: 255
        }));
        assert_eq!(decode(&encoded).unwrap(), input);
    }

    #[test]
    fn truncated_match_is_malformed() {
        let err = decode(&[0x00, b'A', 0x01]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedStream {
                position: 2,
                kind: MalformedKind::Truncated { marker: 0x01, .. },
                ..
            }
        ));
    }

    #[test]
    fn offset_before_start_is_malformed() {
        let err = decode(&[0x00, b'A', 0x01, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            CodecError::MalformedStream {
                algorithm: Algorithm::WindowMatch,
                position: 2,
                kind: MalformedKind::OffsetOutOfRange {
                    offset: 2,
                    available: 1
                },
            }
        );

        let err = decode(&[0x00, b'A', 0x01, 0, 3]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedStream {
                kind: MalformedKind::OffsetOutOfRange { offset: 0, .. },
                ..
            }
        ));
    }

    #[test]
    fn unknown_marker_is_malformed() {
        let err = decode(&[0x00, b'A', 0x05, 1]).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedStream {
                kind: MalformedKind::UnknownMarker(0x05),
                ..
            }
        ));
    }
}
