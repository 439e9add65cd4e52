// File-level helpers for compressing and decompressing whole files.
//
// Each helper reads its input fully into memory, runs exactly one encode or
// decode call, and writes the result verbatim. The output file is only
// created once the codec has succeeded, so a failed decode leaves nothing
// behind. Optionally computes SHA-256 digests (feature-gated behind
// `file-io`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
#[cfg(feature = "file-io")]
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::codec::{self, Algorithm, Codec, CodecError, WindowConfig};
use crate::frame;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `compress_file()`.
#[derive(Debug, Clone)]
pub struct CompressStats {
    /// Codec used to encode the input.
    pub algorithm: Algorithm,
    /// Whether the output carries a frame tag.
    pub framed: bool,
    /// Input file size in bytes.
    pub original_size: u64,
    /// Output file size in bytes.
    pub compressed_size: u64,
    /// SHA-256 of the input file (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

impl CompressStats {
    /// Compressed size as a percentage of the original (0 for empty input).
    pub fn ratio(&self) -> f64 {
        ratio_percent(self.compressed_size, self.original_size)
    }
}

/// Statistics returned by `decompress_file()`.
#[derive(Debug, Clone)]
pub struct DecompressStats {
    /// Codec the input was decoded with.
    pub algorithm: Algorithm,
    /// Compressed input size in bytes.
    pub compressed_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the reconstructed output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// `compressed / original × 100`, or 0 when `original` is 0.
pub fn ratio_percent(compressed: u64, original: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        compressed as f64 / original as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The input was not a valid stream for the requested codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Refused to overwrite an existing output file.
    #[error("output file exists, use --force to overwrite: {}", .0.display())]
    OutputExists(PathBuf),
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Whether an existing output file may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    #[default]
    Deny,
    Allow,
}

/// Configuration for `compress_file()`.
#[derive(Debug, Clone, Default)]
pub struct CompressOptions {
    /// Codec to use; `None` lets the selector choose from the input.
    pub algorithm: Option<Algorithm>,
    /// Window-match encoder tuning (ignored by RLE).
    pub window: WindowConfig,
    /// Prefix the output with a codec tag.
    pub framed: bool,
    pub overwrite: Overwrite,
}

fn write_output(path: &Path, data: &[u8], overwrite: Overwrite) -> Result<(), IoError> {
    if overwrite == Overwrite::Deny && path.exists() {
        return Err(IoError::OutputExists(path.to_path_buf()));
    }
    fs::write(path, data)?;
    Ok(())
}

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    Some(Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// compress_file / decompress_file
// ---------------------------------------------------------------------------

/// Compress `input_path` into `output_path`.
///
/// With `opts.framed`, the output starts with a tag byte so
/// `decompress_file` can be called without an algorithm.
pub fn compress_file(
    input_path: &Path,
    output_path: &Path,
    opts: &CompressOptions,
) -> Result<CompressStats, IoError> {
    let data = fs::read(input_path)?;
    let algorithm = opts
        .algorithm
        .unwrap_or_else(|| crate::select::select(&data));
    let codec = algorithm.codec_with(opts.window);

    let encoded = if opts.framed {
        frame::encode_framed_with(codec.as_ref(), &data)
    } else {
        codec.encode(&data)
    };
    write_output(output_path, &encoded, opts.overwrite)?;

    debug!(
        "compressed {} ({} bytes) -> {} ({} bytes) with {algorithm}",
        input_path.display(),
        data.len(),
        output_path.display(),
        encoded.len()
    );

    Ok(CompressStats {
        algorithm,
        framed: opts.framed,
        original_size: data.len() as u64,
        compressed_size: encoded.len() as u64,
        input_sha256: sha256(&data),
    })
}

/// Decompress `input_path` into `output_path`.
///
/// `Some(algorithm)` decodes a raw stream produced by that codec; `None`
/// expects a framed stream and takes the codec from its tag.
pub fn decompress_file(
    input_path: &Path,
    output_path: &Path,
    algorithm: Option<Algorithm>,
    overwrite: Overwrite,
) -> Result<DecompressStats, IoError> {
    let data = fs::read(input_path)?;

    let (algorithm, decoded) = match algorithm {
        Some(algorithm) => (algorithm, codec::decode(algorithm, &data)?),
        None => frame::decode_framed(&data)?,
    };
    write_output(output_path, &decoded, overwrite)?;

    Ok(DecompressStats {
        algorithm,
        compressed_size: data.len() as u64,
        output_size: decoded.len() as u64,
        output_sha256: sha256(&decoded),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
