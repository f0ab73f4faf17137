//! Edge case tests for the raw (unwrapped) DEFLATE one-shot helpers.

use oxiarc_deflate::{deflate, inflate};

#[test]
fn test_empty_input() {
    let input = b"";
    let compressed = deflate(input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_single_byte() {
    let input = b"A";
    let compressed = deflate(input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_all_zeros_compress_well() {
    let input = vec![0u8; 1000];
    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
    assert!(compressed.len() < input.len() / 10);
}

#[test]
fn test_repeated_byte_compresses_extremely_well() {
    let input = vec![255u8; 10 * 1024];
    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
    assert!(compressed.len() < 50);
}

#[test]
fn test_exactly_258_identical_bytes_is_one_match() {
    // Longest single back-reference DEFLATE can encode.
    let input = vec![b'q'; 258];
    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_max_match_length_repeated_chunks() {
    let pattern = vec![42u8; 258];
    let mut input = Vec::new();
    for _ in 0..10 {
        input.extend_from_slice(&pattern);
    }

    let compressed = deflate(&input, 9).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_distance_one_run_of_1000_bytes() {
    // Overlap semantics: a distance-1 match must reproduce a flat run
    // byte by byte even though the source region overlaps the copy.
    let mut input = vec![b'x'];
    input.extend(std::iter::repeat(b'x').take(999));
    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
    assert_eq!(decompressed.len(), 1000);
}

#[test]
fn test_alternating_pattern() {
    let mut input = Vec::with_capacity(2000);
    for i in 0..1000 {
        input.push(if i % 2 == 0 { b'A' } else { b'B' });
    }

    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_large_input_multi_block() {
    let mut input = Vec::with_capacity(1024 * 1024);
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    while input.len() < 1024 * 1024 {
        input.extend_from_slice(pattern);
    }
    input.truncate(1024 * 1024);

    let compressed = deflate(&input, 5).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
    assert_eq!(decompressed.len(), 1024 * 1024);
}

#[test]
fn test_compression_levels_all_roundtrip() {
    let input = b"Hello, world! This is a test of DEFLATE compression with various levels.";

    for level in 0..=9 {
        let compressed = deflate(input, level).unwrap();
        let decompressed = inflate(&compressed).unwrap();
        assert_eq!(decompressed, input, "level {level} failed");

        if level == 0 {
            // Stored blocks always carry a few bytes of framing overhead.
            assert!(compressed.len() > input.len());
        }
    }
}

#[test]
fn test_binary_data_all_byte_values() {
    let input: Vec<u8> = (0..=255u16).cycle().map(|b| b as u8).take(5000).collect();

    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_long_distance_match_near_window_edge() {
    let mut input = vec![0u8; 32768];
    let pattern = b"PATTERN_TO_MATCH";
    input[0..pattern.len()].copy_from_slice(pattern);
    input[32768 - pattern.len()..32768].copy_from_slice(pattern);

    let compressed = deflate(&input, 6).unwrap();
    let decompressed = inflate(&compressed).unwrap();
    assert_eq!(decompressed, input);
}

#[test]
fn test_no_expansion_bound_for_small_inputs() {
    // |deflate(X)| <= |X| + 5*ceil(|X|/65535) + 6, via the stored-block
    // fallback (level 0 forces it outright).
    for len in [0usize, 1, 17, 4096, 65535] {
        let input = vec![b'r'; len];
        let compressed = deflate(&input, 0).unwrap();
        let bound = len + 5 * len.div_ceil(65535).max(1) + 6;
        assert!(
            compressed.len() <= bound,
            "len {len}: compressed {} > bound {bound}",
            compressed.len()
        );
    }
}
