//! Zlib format wrapper for DEFLATE compression.
//!
//! The zlib format (RFC 1950) wraps raw DEFLATE data with a 2-byte
//! header and a big-endian Adler-32 checksum.
//!
//! # Format
//!
//! ```text
//! +---+---+============+---+---+---+---+
//! |CMF|FLG| compressed |    ADLER32    |
//! +---+---+============+---+---+---+---+
//! ```
//!
//! - CMF: Compression Method and Flags
//!   - Bits 0-3: CM (Compression Method) - must be 8 for DEFLATE
//!   - Bits 4-7: CINFO (Compression Info) - log2(window size) - 8
//! - FLG: Flags
//!   - Bits 0-4: FCHECK - check bits so (CMF*256 + FLG) mod 31 == 0
//!   - Bit 5: FDICT - preset dictionary present (rejected by this crate)
//!   - Bits 6-7: FLEVEL - compression level hint (0-3)
//!
//! The actual bit-level parsing and the Adler-32 trailer check live in
//! [`crate::inflate::Inflater`] and [`crate::deflate::Deflater`]
//! themselves (both take a [`crate::inflate::Wrap`] /
//! [`crate::deflate::DeflateFlags`] selecting zlib framing), since both
//! are already resumable streaming state machines and the wrap is just
//! two bytes of header plus a trailer around the same bit reader/writer.
//! What this module adds on top is the one-shot convenience API and a
//! pair of streaming wrappers (enabled by [`Deflater::deflate`]/
//! [`Inflater::inflate`]'s own bounded `next_in`/`next_out` contract)
//! that drive the underlying codec through a small fixed scratch buffer
//! rather than accumulating an entire stream before doing any work.

use crate::deflate::{DeflateFlags, Deflater};
use crate::inflate::{Inflater, Wrap};
use oxiarc_core::error::{OxiArcError, Result};
use oxiarc_core::traits::{CompressionLevel, FlushMode, Status};

/// Size of the internal scratch buffer [`ZlibCompressor`]/
/// [`ZlibDecompressor`] drive their inner codec through. Fixed at
/// construction time, matching the fixed allocation budget the
/// underlying streaming contract is built around.
const SCRATCH_SIZE: usize = 8192;

/// The FLEVEL hint packed into a zlib header's FLG byte: a coarse,
/// informational record of how hard the encoder tried, carrying no
/// decoding significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ZlibLevel {
    /// Levels 0-2: fastest compression.
    Fastest = 0,
    /// Levels 3-5: fast compression.
    Fast = 1,
    /// Level 6: the default balance of speed and ratio.
    Default = 2,
    /// Levels 7-9: maximum compression.
    Maximum = 3,
}

impl ZlibLevel {
    /// Map a 0..=9 compression level to its FLEVEL hint.
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=2 => Self::Fastest,
            3..=5 => Self::Fast,
            6 => Self::Default,
            _ => Self::Maximum,
        }
    }
}

/// Compress `input` into a complete zlib stream (header, DEFLATE body,
/// Adler-32 trailer) at the given level (0..=9), in one call.
///
/// ```
/// use oxiarc_deflate::zlib::{zlib_compress, zlib_decompress};
///
/// let data = b"Hello, World! Hello, World!";
/// let compressed = zlib_compress(data, 6).unwrap();
/// let decompressed = zlib_decompress(&compressed).unwrap();
/// assert_eq!(decompressed, data);
/// ```
pub fn zlib_compress(input: &[u8], level: u8) -> Result<Vec<u8>> {
    let flags = DeflateFlags::from_level(CompressionLevel::new(level), true);
    let mut deflater = Deflater::new(flags);
    deflater.write_input(input);
    deflater.process(true)?;
    Ok(deflater.take_output())
}

/// Decompress a complete zlib stream in one call, validating both the
/// header and the Adler-32 trailer.
///
/// ```
/// use oxiarc_deflate::zlib::{zlib_compress, zlib_decompress};
///
/// let data = b"Hello, World! Hello, World!";
/// let compressed = zlib_compress(data, 6).unwrap();
/// let decompressed = zlib_decompress(&compressed).unwrap();
/// assert_eq!(decompressed, data);
/// ```
pub fn zlib_decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Inflater::new(Wrap::Zlib);
    let mut out = Vec::with_capacity(input.len() * 3 + 64);
    let mut in_pos = 0;
    let mut scratch = vec![0u8; 64 * 1024];

    loop {
        let (consumed, produced, status) =
            inflater.inflate(&input[in_pos..], &mut scratch, oxiarc_core::traits::FlushMode::Finish);
        in_pos += consumed;
        out.extend_from_slice(&scratch[..produced]);
        match status {
            oxiarc_core::traits::Status::StreamEnd => return Ok(out),
            oxiarc_core::traits::Status::Ok => continue,
            other => {
                return Err(oxiarc_core::error::OxiArcError::corrupted(
                    in_pos as u64,
                    format!("zlib decompress failed with status {other:?}"),
                ))
            }
        }
    }
}

fn status_to_error(status: Status) -> OxiArcError {
    OxiArcError::corrupted(0, format!("zlib stream operation failed with status {status:?}"))
}

/// Incremental zlib compressor built directly on [`Deflater::deflate`]'s
/// bounded `next_in`/`next_out` contract: input handed to [`Self::write`]
/// is compressed immediately through a fixed-size scratch buffer rather
/// than accumulated whole, so this type's own working set stays O(one
/// block), not O(total stream length).
#[derive(Debug)]
pub struct ZlibCompressor {
    deflater: Deflater,
    flags: DeflateFlags,
    scratch: Vec<u8>,
    out: Vec<u8>,
    finished: bool,
}

impl ZlibCompressor {
    /// Create a new zlib compressor at the given level (0..=9).
    pub fn new(level: u8) -> Self {
        let flags = DeflateFlags::from_level(CompressionLevel::new(level), true);
        Self {
            deflater: Deflater::new(flags),
            flags,
            scratch: vec![0u8; SCRATCH_SIZE],
            out: Vec::new(),
            finished: false,
        }
    }

    /// Compress `data` immediately, appending whatever compressed bytes
    /// it produces to this compressor's accumulated output queue.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        let mut in_pos = 0usize;
        while in_pos < data.len() {
            let (consumed, produced, status) =
                self.deflater.deflate(&data[in_pos..], &mut self.scratch, FlushMode::NoFlush);
            in_pos += consumed;
            self.out.extend_from_slice(&self.scratch[..produced]);
            match status {
                Status::Ok => {
                    if consumed == 0 && produced == 0 {
                        break;
                    }
                }
                Status::StreamEnd => break,
                other => return Err(status_to_error(other)),
            }
        }
        Ok(())
    }

    /// Flush all remaining input and the trailer, returning the complete
    /// compressed stream produced across every [`Self::write`] call plus
    /// this one. Idempotent after the first call.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if self.finished {
            return Ok(Vec::new());
        }
        loop {
            let (_, produced, status) =
                self.deflater.deflate(&[], &mut self.scratch, FlushMode::Finish);
            self.out.extend_from_slice(&self.scratch[..produced]);
            match status {
                Status::StreamEnd => break,
                Status::Ok => continue,
                other => return Err(status_to_error(other)),
            }
        }
        self.finished = true;
        Ok(std::mem::take(&mut self.out))
    }

    /// Discard in-progress state and start a fresh compression stream at
    /// the previously configured level.
    pub fn reset(&mut self) {
        self.deflater = Deflater::new(self.flags);
        self.out.clear();
        self.finished = false;
    }
}

/// Incremental zlib decompressor built directly on [`Inflater::inflate`];
/// kept as a thin, struct-per-stream convenience over driving an
/// [`Inflater`] by hand, with the same bounded scratch buffer as
/// [`ZlibCompressor`].
#[derive(Debug)]
pub struct ZlibDecompressor {
    inflater: Inflater,
    scratch: Vec<u8>,
    out: Vec<u8>,
    finished: bool,
}

impl Default for ZlibDecompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ZlibDecompressor {
    /// Create a new zlib decompressor.
    pub fn new() -> Self {
        Self {
            inflater: Inflater::new(Wrap::Zlib),
            scratch: vec![0u8; SCRATCH_SIZE],
            out: Vec::new(),
            finished: false,
        }
    }

    /// Decompress `data` immediately, appending whatever decompressed
    /// bytes it produces to this decompressor's accumulated output queue.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        let mut in_pos = 0usize;
        while in_pos < data.len() {
            let (consumed, produced, status) =
                self.inflater.inflate(&data[in_pos..], &mut self.scratch, FlushMode::NoFlush);
            in_pos += consumed;
            self.out.extend_from_slice(&self.scratch[..produced]);
            match status {
                Status::Ok => {
                    if consumed == 0 && produced == 0 {
                        break;
                    }
                }
                Status::StreamEnd => break,
                other => return Err(status_to_error(other)),
            }
        }
        Ok(())
    }

    /// Finish decoding (validating the Adler-32 trailer) and return the
    /// complete decompressed output produced across every [`Self::write`]
    /// call plus this one. Idempotent after the first call.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if self.finished {
            return Ok(Vec::new());
        }
        loop {
            let (_, produced, status) =
                self.inflater.inflate(&[], &mut self.scratch, FlushMode::Finish);
            self.out.extend_from_slice(&self.scratch[..produced]);
            match status {
                Status::StreamEnd => break,
                Status::Ok => continue,
                other => return Err(status_to_error(other)),
            }
        }
        self.finished = true;
        Ok(std::mem::take(&mut self.out))
    }

    /// Discard in-progress state and start fresh for a new stream.
    pub fn reset(&mut self) {
        self.inflater = Inflater::new(Wrap::Zlib);
        self.out.clear();
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deflate::deflate;
    use crate::inflate::inflate;

    #[test]
    fn test_zlib_level_hint_packed_into_header() {
        let compressed = zlib_compress(b"some text to compress", 9).expect("compress failed");
        assert_eq!(compressed[0], 0x78);
        let cmf = compressed[0] as u16;
        let flg = compressed[1] as u16;
        assert_eq!((cmf * 256 + flg) % 31, 0);
        assert_eq!(ZlibLevel::from_level(9), ZlibLevel::Maximum);
        assert_eq!(ZlibLevel::from_level(0), ZlibLevel::Fastest);
        assert_eq!(ZlibLevel::from_level(6), ZlibLevel::Default);
    }

    #[test]
    fn test_zlib_roundtrip_simple() {
        let data = b"Hello, World!";
        let compressed = zlib_compress(data, 6).expect("compress failed");
        let decompressed = zlib_decompress(&compressed).expect("decompress failed");
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_zlib_roundtrip_empty() {
        let data: &[u8] = b"";
        let compressed = zlib_compress(data, 6).expect("compress failed");
        let decompressed = zlib_decompress(&compressed).expect("decompress failed");
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_zlib_roundtrip_levels() {
        let data = b"Hello, World! Hello, World! Hello, World!";
        for level in 0..=9 {
            let compressed = zlib_compress(data, level).unwrap_or_else(|e| {
                panic!("level {level} compress failed: {e}");
            });
            let decompressed = zlib_decompress(&compressed).unwrap_or_else(|e| {
                panic!("level {level} decompress failed: {e}");
            });
            assert_eq!(&decompressed[..], &data[..]);
        }
    }

    #[test]
    fn test_zlib_checksum_mismatch_is_rejected() {
        let mut compressed = zlib_compress(b"Test data for checksum", 6).expect("compress failed");
        let len = compressed.len();
        compressed[len - 1] ^= 0xFF;
        assert!(zlib_decompress(&compressed).is_err());
    }

    #[test]
    fn test_zlib_invalid_compression_method_is_rejected() {
        let bad_data = [0x08u8, 0x1D, 0x00, 0x00, 0x00, 0x01];
        assert!(zlib_decompress(&bad_data).is_err());
    }

    #[test]
    fn test_zlib_too_short_is_rejected() {
        let short_data = [0x78u8, 0x9C];
        assert!(zlib_decompress(&short_data).is_err());
    }

    #[test]
    fn test_compressor_streaming_wrapper() {
        let mut compressor = ZlibCompressor::new(6);
        compressor.write(b"Hello, ").expect("write failed");
        compressor.write(b"World!").expect("write failed");
        let compressed = compressor.finish().expect("compress failed");

        let decompressed = zlib_decompress(&compressed).expect("decompress failed");
        assert_eq!(decompressed, b"Hello, World!");
    }

    #[test]
    fn test_decompressor_streaming_wrapper() {
        let compressed = zlib_compress(b"Hello, World!", 6).expect("compress failed");

        let mut decompressor = ZlibDecompressor::new();
        decompressor.write(&compressed[..5]).expect("write failed");
        decompressor.write(&compressed[5..]).expect("write failed");
        let decompressed = decompressor.finish().expect("decompress failed");
        assert_eq!(decompressed, b"Hello, World!");
    }

    #[test]
    fn test_compressor_decompressor_roundtrip_through_small_scratch() {
        // Exercise more than one internal SCRATCH_SIZE refill on both
        // sides of the wrapper pair, not just a single pass.
        let data = b"the quick brown fox jumps over the lazy dog. ".repeat(2000);

        let mut compressor = ZlibCompressor::new(9);
        for chunk in data.chunks(777) {
            compressor.write(chunk).expect("write failed");
        }
        let compressed = compressor.finish().expect("compress failed");

        let mut decompressor = ZlibDecompressor::new();
        for chunk in compressed.chunks(333) {
            decompressor.write(chunk).expect("write failed");
        }
        let decompressed = decompressor.finish().expect("decompress failed");
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_oneshot_raw_deflate_still_available() {
        // The raw (unwrapped) one-shot helpers stay independent of the
        // zlib wrap for callers that want bare RFC 1951 streams.
        let data = b"raw deflate helpers, not zlib-wrapped";
        let compressed = deflate(data, 6).unwrap();
        let decompressed = inflate(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }
}
