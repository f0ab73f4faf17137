//! Streaming vocabulary shared by OxiArc codecs.
//!
//! This module defines the `Status`/`FlushMode` contract that a streaming
//! codec's `next_in`/`avail_in`/`next_out`/`avail_out` operation reports
//! through, mirroring the classic zlib/miniz `mz_stream` driver loop: the
//! caller repeatedly calls the operation, refilling input or draining
//! output in response to the returned status, until `StreamEnd` is seen.

/// Outcome of a single streaming compress/decompress call.
///
/// Numeric values match the status codes of the zlib/miniz family this
/// contract is modeled on, so callers that already think in those terms
/// (`0` = ok, negative = error) can match on `as i32` if they need to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Progress was made; call again with more input or output space.
    Ok = 0,
    /// The stream has been fully decoded/encoded, including the trailer.
    StreamEnd = 1,
    /// A preset dictionary is required before decoding can continue.
    NeedDict = 2,
    /// The state machine was driven in an invalid way (e.g. called again
    /// after `StreamEnd`, or after a sticky error).
    StreamError = -2,
    /// The compressed data is malformed.
    DataError = -3,
    /// Allocation failed at construction time.
    MemError = -4,
    /// Transient: the caller must refill `next_in` or drain `next_out`
    /// and call again. Not fatal.
    BufError = -5,
    /// Reserved for ABI/version negotiation; unused by this codec.
    VersionError = -6,
    /// Invalid flags, a null required pointer, or contradictory buffers.
    ParamError = -10000,
}

impl Status {
    /// True for `Ok` and `StreamEnd`; false for every transient or sticky
    /// error status.
    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::StreamEnd)
    }

    /// True for the three sticky error kinds (`StreamError`, `DataError`,
    /// `ParamError`) that a caller must not attempt to recover from by
    /// simply retrying.
    pub fn is_sticky_error(self) -> bool {
        matches!(
            self,
            Status::StreamError | Status::DataError | Status::ParamError | Status::MemError
        )
    }
}

/// Flush mode requested of a streaming compressor.
///
/// `PartialFlush` from the original zlib API is not a distinct variant
/// here; use [`FlushMode::SYNC_FLUSH_ALIAS`] or simply `FlushMode::Sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// No flush — buffer data for best compression. Default.
    #[default]
    NoFlush,
    /// Emit all pending output, aligned to a byte boundary, without
    /// resetting the encoder's dictionary or Huffman state.
    SyncFlush,
    /// Like `SyncFlush`, but also resets the match finder's dictionary so
    /// the next block does not reference data before this point.
    FullFlush,
    /// No more input will follow; emit the final block (and, if wrapped,
    /// the trailer) and transition to `Done`.
    Finish,
}

impl FlushMode {
    /// `PartialFlush` in the classic zlib API names exactly this mode.
    pub const PARTIAL_FLUSH_ALIAS: FlushMode = FlushMode::SyncFlush;
}

/// Compression level for algorithms that support a 0-9(-10) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (store only).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level, clamped to 0..=9.
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::FAST.level(), 1);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::BEST.level(), 9);
        assert_eq!(CompressionLevel::new(100).level(), 9);
    }

    #[test]
    fn test_flush_mode_default() {
        assert_eq!(FlushMode::default(), FlushMode::NoFlush);
        assert_eq!(FlushMode::PARTIAL_FLUSH_ALIAS, FlushMode::SyncFlush);
    }

    #[test]
    fn test_status_classification() {
        assert!(Status::Ok.is_success());
        assert!(Status::StreamEnd.is_success());
        assert!(!Status::BufError.is_success());
        assert!(Status::DataError.is_sticky_error());
        assert!(!Status::BufError.is_sticky_error());
    }
}
