//! rlelz: small reversible byte codecs in Rust.
//!
//! The crate provides:
//! - A run-length codec and a bounded-window LZ codec (`codec`)
//! - A heuristic that recommends one of them for a buffer (`select`)
//! - An opt-in tagged container so decode can find its codec (`frame`)
//! - Whole-file helpers with size/ratio stats (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use rlelz::codec::{self, Algorithm};
//!
//! let input = b"AAAAAAAABCABCABCABC";
//! let algorithm = rlelz::select::select(input);
//! let packed = codec::encode(algorithm, input);
//! let unpacked = codec::decode(algorithm, &packed).unwrap();
//! assert_eq!(unpacked, input);
//!
//! // Raw streams have no header; frames carry the codec tag.
//! let framed = rlelz::frame::encode_framed(Algorithm::WindowMatch, input);
//! let (used, unpacked) = rlelz::frame::decode_framed(&framed).unwrap();
//! assert_eq!((used, unpacked.as_slice()), (Algorithm::WindowMatch, &input[..]));
//! ```

pub mod codec;
pub mod frame;
pub mod io;
pub mod select;

#[cfg(feature = "cli")]
pub mod cli;
