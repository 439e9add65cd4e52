// Codec selection heuristic.
//
// Counts adjacent equal bytes: data dominated by runs goes to RLE,
// everything else to the window-match codec. Advisory only; decoding never
// consults it.

use log::debug;

use crate::codec::Algorithm;

/// Share of adjacent repeats above which RLE is recommended.
pub const RLE_REPEAT_RATIO: f64 = 0.3;

/// Input statistics behind a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionStats {
    /// Input length in bytes.
    pub len: usize,
    /// Positions `i >= 1` with `input[i] == input[i - 1]`.
    pub repeats: usize,
    /// `repeats / len`, or 0 for empty input.
    pub ratio: f64,
    pub recommended: Algorithm,
}

/// Compute the adjacent-repeat statistics and the recommended codec.
pub fn analyze(input: &[u8]) -> SelectionStats {
    let len = input.len();
    let repeats = input.windows(2).filter(|w| w[0] == w[1]).count();

    // ratio > 3/10, compared exactly in integers.
    let recommended = if len == 0 || repeats as u128 * 10 > len as u128 * 3 {
        Algorithm::Rle
    } else {
        Algorithm::WindowMatch
    };
    let ratio = if len == 0 {
        0.0
    } else {
        repeats as f64 / len as f64
    };

    debug!("select: {repeats}/{len} adjacent repeats (ratio {ratio:.3}) -> {recommended}");
    SelectionStats {
        len,
        repeats,
        ratio,
        recommended,
    }
}

/// Recommend a codec for `input`. Empty input selects RLE.
pub fn select(input: &[u8]) -> Algorithm {
    analyze(input).recommended
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `zeros` zero bytes followed by `1..=tail` (no further repeats).
    fn with_repeats(zeros: usize, tail: u8) -> Vec<u8> {
        let mut data = vec![0u8; zeros];
        data.extend(1..=tail);
        data
    }

    #[test]
    fn empty_selects_rle() {
        let stats = analyze(b"");
        assert_eq!(stats.recommended, Algorithm::Rle);
        assert_eq!(stats.ratio, 0.0);
    }

    #[test]
    fn exact_threshold_selects_window_match() {
        // 31 zeros give 30 repeats over 100 bytes.
        let data = with_repeats(31, 69);
        let stats = analyze(&data);
        assert_eq!((stats.len, stats.repeats), (100, 30));
        assert_eq!(stats.recommended, Algorithm::WindowMatch);

        assert_eq!(select(b"AABBCCDEFG"), Algorithm::WindowMatch);
    }

    #[test]
    fn just_above_threshold_selects_rle() {
        let data = with_repeats(32, 68);
        let stats = analyze(&data);
        assert_eq!((stats.len, stats.repeats), (100, 31));
        assert!((stats.ratio - 0.31).abs() < 1e-9);
        assert_eq!(stats.recommended, Algorithm::Rle);
    }

    #[test]
    fn single_byte_has_no_repeats() {
        let stats = analyze(b"x");
        assert_eq!(stats.repeats, 0);
        assert_eq!(stats.recommended, Algorithm::WindowMatch);
    }
}
