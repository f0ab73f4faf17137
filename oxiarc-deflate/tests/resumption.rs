//! Resumption law: for any partition of the compressed bytes into input
//! chunks and any partition of the output buffer into chunks, a
//! streaming `inflate` must produce the same bytes as a single-call
//! `inflate`.

use oxiarc_deflate::inflate::{Inflater, Wrap};
use oxiarc_deflate::zlib::{zlib_compress, zlib_decompress};
use oxiarc_core::traits::{FlushMode, Status};

/// Drives `Inflater` with both input and output handed over in bounded
/// chunks, re-entering after every suspend exactly as a real caller
/// feeding a socket or file would.
fn inflate_fully_chunked(compressed: &[u8], in_chunk: usize, out_chunk: usize) -> Vec<u8> {
    let mut inflater = Inflater::new(Wrap::Zlib);
    let mut result = Vec::new();
    let mut in_pos = 0;
    let mut scratch = vec![0u8; out_chunk.max(1)];

    while !inflater.is_finished() {
        let end = (in_pos + in_chunk.max(1)).min(compressed.len());
        let flush = if end >= compressed.len() {
            FlushMode::Finish
        } else {
            FlushMode::NoFlush
        };
        let (consumed, produced, status) =
            inflater.inflate(&compressed[in_pos..end], &mut scratch, flush);
        in_pos += consumed;
        result.extend_from_slice(&scratch[..produced]);

        match status {
            Status::Ok | Status::StreamEnd => {}
            other => panic!("inflate failed: {other:?}"),
        }
        if consumed == 0 && produced == 0 && !inflater.is_finished() && in_pos >= compressed.len() {
            panic!("inflate stalled with no input left and no progress");
        }
    }

    result
}

#[test]
fn test_byte_and_output_chunking_agree_with_single_call() {
    let data =
        b"Good morning Dr. Chandra. This is Hal. I am ready for my first lesson.".repeat(7);
    let compressed = zlib_compress(&data, 6).unwrap();

    for &(in_chunk, out_chunk) in &[
        (1usize, 1usize),
        (1, 7),
        (3, 1),
        (17, 64),
        (compressed.len(), data.len() + 16),
    ] {
        let out = inflate_fully_chunked(&compressed, in_chunk, out_chunk);
        assert_eq!(out, data, "in_chunk={in_chunk} out_chunk={out_chunk}");
    }
}

#[test]
fn test_chunked_inflate_matches_one_shot_helper() {
    let data = b"resumption law baseline".repeat(20);
    let compressed = zlib_compress(&data, 6).unwrap();
    let decompressed = zlib_decompress(&compressed).unwrap();
    assert_eq!(decompressed, data);

    let chunked = inflate_fully_chunked(&compressed, 5, 13);
    assert_eq!(chunked, data);
}

#[test]
fn test_raw_stream_resumption_with_tiny_output_buffer() {
    use oxiarc_deflate::deflate::deflate;
    let data = vec![b'm'; 5000];
    let compressed = deflate(&data, 6).unwrap();

    let out = inflate_raw_chunked(&compressed, 11, 3);
    assert_eq!(out, data);
}

fn inflate_raw_chunked(compressed: &[u8], in_chunk: usize, out_chunk: usize) -> Vec<u8> {
    let mut inflater = Inflater::new(Wrap::Raw);
    let mut result = Vec::new();
    let mut in_pos = 0;
    let mut scratch = vec![0u8; out_chunk.max(1)];

    while !inflater.is_finished() {
        let end = (in_pos + in_chunk.max(1)).min(compressed.len());
        let flush = if end >= compressed.len() {
            FlushMode::Finish
        } else {
            FlushMode::NoFlush
        };
        let (consumed, produced, status) =
            inflater.inflate(&compressed[in_pos..end], &mut scratch, flush);
        in_pos += consumed;
        result.extend_from_slice(&scratch[..produced]);
        match status {
            Status::Ok | Status::StreamEnd => {}
            other => panic!("inflate failed: {other:?}"),
        }
    }

    result
}
