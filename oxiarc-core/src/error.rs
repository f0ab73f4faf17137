//! Error types for OxiArc codec operations.
//!
//! This module provides a comprehensive error type that covers the failure
//! modes of a DEFLATE/zlib codec: malformed bitstreams, checksum mismatches,
//! and the handful of programming errors (oversized buffers, invalid flags)
//! that a caller of the streaming API can trigger.

use std::io;
use thiserror::Error;

/// The main error type for OxiArc codec operations.
#[derive(Debug, Error)]
pub enum OxiArcError {
    /// I/O error from an underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported compression method in a zlib header.
    #[error("unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The compression method identifier (CM field).
        method: u8,
    },

    /// Adler-32 or CRC-32 checksum mismatch.
    #[error("checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Expected checksum value from the trailer.
        expected: u32,
        /// Checksum computed over the emitted bytes.
        computed: u32,
    },

    /// Invalid Huffman code encountered during decompression.
    #[error("invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// A code-length table violates Kraft's inequality (over- or
    /// under-subscribed) and cannot be built into a canonical code.
    #[error("Huffman table is not a complete prefix code: {message}")]
    InvalidHuffmanTable {
        /// Description of the violation.
        message: String,
    },

    /// An invalid DEFLATE block type (`11`) was read from the bitstream.
    #[error("invalid DEFLATE block type {block_type}")]
    InvalidBlockType {
        /// The 2-bit block type value read.
        block_type: u8,
    },

    /// Corrupted data in the bitstream.
    #[error("corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Invalid zlib header.
    #[error("invalid zlib header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// Output buffer too small for the requested operation.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Invalid back-reference distance in LZ77 decoding.
    #[error("invalid back-reference distance: {distance} exceeds history size {history_size}")]
    InvalidDistance {
        /// The invalid distance value.
        distance: usize,
        /// Current history buffer size.
        history_size: usize,
    },

    /// Invalid flags or parameters passed to a constructor or stream call.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the invalid parameter.
        message: String,
    },

    /// The stream state machine was driven after it had already finished
    /// or after a sticky error.
    #[error("stream misuse: {message}")]
    StreamMisuse {
        /// Description of the misuse.
        message: String,
    },
}

/// Result type alias for OxiArc operations.
pub type Result<T> = std::result::Result<T, OxiArcError>;

impl OxiArcError {
    /// Create an unsupported method error.
    pub fn unsupported_method(method: u8) -> Self {
        Self::UnsupportedMethod { method }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create an invalid Huffman table error.
    pub fn invalid_huffman_table(message: impl Into<String>) -> Self {
        Self::InvalidHuffmanTable {
            message: message.into(),
        }
    }

    /// Create an invalid block type error.
    pub fn invalid_block_type(block_type: u8) -> Self {
        Self::InvalidBlockType { block_type }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a buffer too small error.
    pub fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall { needed, available }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, history_size: usize) -> Self {
        Self::InvalidDistance {
            distance,
            history_size,
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a stream misuse error.
    pub fn stream_misuse(message: impl Into<String>) -> Self {
        Self::StreamMisuse {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiArcError::checksum_mismatch(0x1234_5678, 0xDEAD_BEEF);
        assert!(err.to_string().contains("checksum mismatch"));

        let err = OxiArcError::unsupported_method(9);
        assert!(err.to_string().contains('9'));

        let err = OxiArcError::invalid_block_type(3);
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OxiArcError = io_err.into();
        assert!(matches!(err, OxiArcError::Io(_)));
    }
}
