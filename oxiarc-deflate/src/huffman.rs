//! Canonical Huffman table construction: decode tables for the inflater
//! and length-limited optimal code lengths for the deflater.
//!
//! # Decode side
//!
//! [`DecodeTable`] holds a 1024-entry fast lookup array (codes of up to
//! [`FAST_BITS`] bits resolve in one indexed read) and a tree for longer
//! codes. The tree reuses the fast table's own slots as roots: a
//! non-negative fast-table entry is a resolved `(length, symbol)` leaf; a
//! negative entry is the bitwise complement of an index into `tree`,
//! where two consecutive entries are the 0-bit and 1-bit children.
//! Walking the tree complements the next negative value to find the next
//! pair, until a non-negative entry (a bare symbol) is reached.
//!
//! # Encode side
//!
//! [`build_length_limited_lengths`] assigns optimal code lengths, each
//! bounded by `max_len`, via the package-merge algorithm: symbols are
//! treated as coins of weight `frequency`; pairs of coins are repeatedly
//! "packaged" into combined coins and merged back in with a fresh copy of
//! the original coins, once per bit of the length budget. Selecting the
//! lightest `2*(n-1)` coins from the final round and unpacking them back
//! down to their constituent symbols gives, for each symbol, exactly its
//! optimal code length — the length limit falls out of the construction
//! itself, with no separate Kraft-rebalancing pass required.

use crate::bitreader::BitReader;
use oxiarc_core::error::{OxiArcError, Result};

/// Codes at most this many bits long resolve via a single fast-table
/// lookup.
pub const FAST_BITS: u8 = 10;
const FAST_SIZE: usize = 1 << FAST_BITS;
const SENTINEL: i16 = i16::MIN;

/// Reverse the low `nbits` bits of `value`.
///
/// DEFLATE's canonical code values are conventionally written MSB-first,
/// but the bitstream itself is read LSB-first; reversing the code's bits
/// converts between the two conventions for both encode and decode.
pub fn reverse_bits(mut value: u32, nbits: u8) -> u32 {
    let mut result = 0u32;
    for _ in 0..nbits {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}

/// Assign canonical codes (RFC 1951 §3.2.2) from a code-length array,
/// returning each code already bit-reversed and ready to feed to a
/// `BitWriter`.
pub fn assign_canonical_codes(lengths: &[u8]) -> Vec<u16> {
    let mut count = [0u32; 16];
    for &len in lengths {
        count[len as usize] += 1;
    }
    count[0] = 0;

    let mut next_code = [0u32; 16];
    let mut code = 0u32;
    for len in 1..16 {
        code = (code + count[len - 1]) << 1;
        next_code[len] = code;
    }

    lengths
        .iter()
        .map(|&len| {
            if len == 0 {
                0
            } else {
                let c = next_code[len as usize];
                next_code[len as usize] += 1;
                reverse_bits(c, len) as u16
            }
        })
        .collect()
}

/// A canonical Huffman decoding table: a fast array for short codes plus
/// a tree for codes longer than [`FAST_BITS`].
#[derive(Debug, Clone)]
pub struct DecodeTable {
    fast: Box<[i16]>,
    tree: Vec<i16>,
    max_len: u8,
}

impl DecodeTable {
    /// Build a decode table from per-symbol code lengths (0..=15).
    ///
    /// Lengths must form a complete prefix code (Kraft equality), with
    /// one exception carried over from the reference decoder: a single
    /// symbol with nonzero length is accepted even though its code does
    /// not fill the codespace, since a degenerate one-symbol alphabet has
    /// no other valid representation.
    pub fn from_code_lengths(lengths: &[u8]) -> Result<Self> {
        let mut count = [0u32; 16];
        for &len in lengths {
            debug_assert!(len <= 15, "code length out of range: {len}");
            count[len as usize] += 1;
        }
        count[0] = 0;

        let max_len = (1..=15).rev().find(|&l| count[l] > 0).unwrap_or(0);
        let nonzero_symbols = lengths.iter().filter(|&&l| l != 0).count();

        if max_len > 0 {
            let mut total: u32 = 0;
            for len in 1..=max_len {
                total += count[len] << (max_len - len);
            }
            let required = 1u32 << max_len;
            if total > required {
                return Err(OxiArcError::invalid_huffman_table(
                    "code is over-subscribed (Kraft inequality violated)",
                ));
            }
            if total < required && nonzero_symbols > 1 {
                return Err(OxiArcError::invalid_huffman_table(
                    "code is incomplete (Kraft sum below 1)",
                ));
            }
        }

        let mut next_code = [0u32; 16];
        let mut code = 0u32;
        for len in 1..16 {
            code = (code + count[len - 1]) << 1;
            next_code[len] = code;
        }

        let mut fast = vec![SENTINEL; FAST_SIZE].into_boxed_slice();
        let mut tree: Vec<i16> = Vec::new();

        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let code_val = next_code[len as usize];
            next_code[len as usize] += 1;
            let rev = reverse_bits(code_val, len);

            if len <= FAST_BITS {
                let entry = ((len as i16) << 9) | (symbol as i16);
                let step = 1usize << len;
                let mut slot = rev as usize;
                while slot < FAST_SIZE {
                    fast[slot] = entry;
                    slot += step;
                }
            } else {
                let prefix = (rev as usize) & (FAST_SIZE - 1);
                let mut node = match fast[prefix] {
                    SENTINEL => {
                        let idx = tree.len();
                        tree.push(SENTINEL);
                        tree.push(SENTINEL);
                        fast[prefix] = !(idx as i16);
                        idx
                    }
                    e if e < 0 => (!e) as usize,
                    _ => {
                        return Err(OxiArcError::invalid_huffman_table(
                            "fast-table prefix collides between a short code and a long code",
                        ));
                    }
                };

                let mut depth = FAST_BITS;
                while depth < len - 1 {
                    let bit = ((rev >> depth) & 1) as usize;
                    node = match tree[node + bit] {
                        SENTINEL => {
                            let idx = tree.len();
                            tree.push(SENTINEL);
                            tree.push(SENTINEL);
                            tree[node + bit] = !(idx as i16);
                            idx
                        }
                        e if e < 0 => (!e) as usize,
                        _ => {
                            return Err(OxiArcError::invalid_huffman_table(
                                "tree node collides between a short code and a long code",
                            ));
                        }
                    };
                    depth += 1;
                }

                let bit = ((rev >> (len - 1)) & 1) as usize;
                tree[node + bit] = symbol as i16;
            }
        }

        Ok(Self {
            fast,
            tree,
            max_len: max_len as u8,
        })
    }

    /// Maximum code length present in this table.
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Decode one symbol, consuming its code's bits from `reader`.
    ///
    /// The caller must have already ensured at least `max_len()` real
    /// bits are buffered (or that no further input will ever arrive, in
    /// which case the reader's implicit zero-padding past end-of-stream
    /// is itself the correctness boundary: a truncated stream decodes to
    /// an invalid code and fails).
    pub fn decode(&self, reader: &mut BitReader) -> Result<u16> {
        let low = reader.peek(FAST_BITS) as usize;
        let entry = self.fast[low];

        if entry == SENTINEL {
            return Err(OxiArcError::invalid_huffman(0));
        }
        if entry >= 0 {
            let len = (entry >> 9) as u8;
            let symbol = (entry & 0x1FF) as u16;
            reader.drop_bits(len);
            return Ok(symbol);
        }

        reader.drop_bits(FAST_BITS);
        let mut idx = (!entry) as usize;
        loop {
            let bit = reader.get(1) as usize;
            let entry = self.tree[idx + bit];
            if entry == SENTINEL {
                return Err(OxiArcError::invalid_huffman(0));
            }
            if entry >= 0 {
                return Ok(entry as u16);
            }
            idx = (!entry) as usize;
        }
    }
}

/// A single weighted "coin" in the package-merge construction: either an
/// original symbol or the combination of two coins from the previous
/// round.
#[derive(Clone)]
enum Coin {
    Leaf(usize),
    Package(Box<Coin>, Box<Coin>),
}

struct WeightedCoin {
    weight: u64,
    coin: Coin,
}

fn merge_sorted(a: Vec<WeightedCoin>, b: Vec<WeightedCoin>) -> Vec<WeightedCoin> {
    let mut result = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();
    loop {
        match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => {
                if x.weight <= y.weight {
                    result.push(a.next().unwrap());
                } else {
                    result.push(b.next().unwrap());
                }
            }
            (Some(_), None) => result.push(a.next().unwrap()),
            (None, Some(_)) => result.push(b.next().unwrap()),
            (None, None) => break,
        }
    }
    result
}

fn unpack_coin(coin: &Coin, lengths: &mut [u8]) {
    match coin {
        Coin::Leaf(symbol) => lengths[*symbol] += 1,
        Coin::Package(left, right) => {
            unpack_coin(left, lengths);
            unpack_coin(right, lengths);
        }
    }
}

/// Build optimal canonical Huffman code lengths, each bounded by
/// `max_len` bits, for the given per-symbol frequency table (index =
/// symbol, value = occurrence count; zero-frequency symbols get length
/// 0 and are excluded from the code).
///
/// Uses the package-merge algorithm (Larmore & Hirschberg's
/// length-limited minimum-redundancy construction, the same technique
/// often attributed to Moffat & Katajainen for its linear-time
/// in-place variant): symbols are repeatedly paired and merged back with
/// a fresh copy of the original weights, once per length level, and the
/// lightest `2*(n-1)` coins from the final level, unpacked down to their
/// constituent symbols, give each symbol's optimal length directly.
pub fn build_length_limited_lengths(freqs: &[u64], max_len: u8) -> Vec<u8> {
    let mut lengths = vec![0u8; freqs.len()];

    let mut used: Vec<usize> = (0..freqs.len()).filter(|&i| freqs[i] > 0).collect();
    let n = used.len();
    if n == 0 {
        return lengths;
    }
    if n == 1 {
        lengths[used[0]] = 1;
        return lengths;
    }

    used.sort_by(|&a, &b| freqs[a].cmp(&freqs[b]).then(a.cmp(&b)));

    let base_leaves: Vec<WeightedCoin> = used
        .iter()
        .map(|&sym| WeightedCoin {
            weight: freqs[sym],
            coin: Coin::Leaf(sym),
        })
        .collect();

    let mut level = base_leaves
        .iter()
        .map(|c| WeightedCoin {
            weight: c.weight,
            coin: c.coin.clone(),
        })
        .collect::<Vec<_>>();

    for _ in 2..=max_len {
        let mut packages = Vec::with_capacity(level.len() / 2);
        let mut it = level.into_iter();
        loop {
            let a = match it.next() {
                Some(x) => x,
                None => break,
            };
            let b = match it.next() {
                Some(x) => x,
                None => break, // odd leftover item is discarded
            };
            packages.push(WeightedCoin {
                weight: a.weight + b.weight,
                coin: Coin::Package(Box::new(a.coin), Box::new(b.coin)),
            });
        }

        let fresh_leaves = base_leaves
            .iter()
            .map(|c| WeightedCoin {
                weight: c.weight,
                coin: c.coin.clone(),
            })
            .collect::<Vec<_>>();

        level = merge_sorted(packages, fresh_leaves);
    }

    let take = (2 * (n - 1)).min(level.len());
    for item in level.into_iter().take(take) {
        unpack_coin(&item.coin, &mut lengths);
    }

    lengths
}
