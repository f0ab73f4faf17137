//! # OxiArc Deflate
//!
//! A resumable, pure-Rust implementation of DEFLATE (RFC 1951) and the
//! zlib envelope (RFC 1950).
//!
//! ## Layout
//!
//! - [`bitreader`]: the inflater's bit-accumulator cursor over input.
//! - [`huffman`]: canonical Huffman table construction, decode and encode
//!   sides, including the length-limited package-merge builder.
//! - [`tables`]: the fixed DEFLATE tables (length/distance bases and
//!   extra-bit counts, the code-length alphabet permutation).
//! - [`checksums`]: Adler-32 (CRC-32 is re-exported from `oxiarc-core`).
//! - [`lz77`]: the hash-chain match finder and greedy/lazy/RLE parsers.
//! - [`deflate`]: the LZ code buffer and block emitter — [`Deflater`].
//! - [`inflate`]: the resumable decompressor state machine — [`Inflater`].
//! - [`zlib`]: the RFC 1950 wrap, one-shot helpers, and streaming
//!   convenience wrappers.
//!
//! ## Example
//!
//! ```
//! use oxiarc_deflate::zlib::{zlib_compress, zlib_decompress};
//!
//! let original = b"Hello, World! Hello, World!";
//! let compressed = zlib_compress(original, 6).unwrap();
//! let decompressed = zlib_decompress(&compressed).unwrap();
//! assert_eq!(&decompressed, original);
//! ```
//!
//! For bare RFC 1951 streams with no zlib envelope, use
//! [`deflate::deflate`]/[`inflate::inflate`] directly, or drive
//! [`Deflater`]/[`Inflater`] incrementally for true streaming.
//!
//! ## Compression levels
//!
//! - Level 0: no compression (stored blocks only).
//! - Level 1: fastest, single-probe greedy matching.
//! - Level 6: the default balance of speed and ratio.
//! - Level 9: maximum compression, widest hash-chain search.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitreader;
pub mod checksums;
pub mod deflate;
pub mod huffman;
pub mod inflate;
pub mod lz77;
pub mod tables;
pub mod zlib;

pub use checksums::{adler32, crc32, Adler32};
pub use deflate::{deflate, DeflateFlags, Deflater};
pub use huffman::DecodeTable;
pub use inflate::{inflate, Inflater, Wrap};
pub use lz77::{parse_from, LzToken, MatchFinder, ParseStrategy};
pub use zlib::{zlib_compress, zlib_decompress, ZlibCompressor, ZlibDecompressor, ZlibLevel};
