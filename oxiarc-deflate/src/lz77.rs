//! LZ77 match finding over an in-memory window.
//!
//! The reference implementation streams bytes one at a time into a
//! mirrored ring buffer so a hash-chain index can be built incrementally.
//! Here the deflater hands the match finder its whole working window as
//! one contiguous slice (accumulated ahead of time by
//! [`crate::deflate::Deflater`]), so there is no wraparound bookkeeping —
//! or mirrored dictionary tail — to maintain, and the window is a single
//! owned, linearly-indexed array. The hash-chain index itself is still
//! built incrementally as the parse position advances ([`MatchFinder::insert`]),
//! the same way the reference implementation's `update_hash` runs one
//! position behind the encoder: a candidate must always have been
//! visited before it can be offered as a match.

/// Sliding window size: the farthest a back-reference may reach.
pub const LZ_DICT_SIZE: usize = 32768;
/// Shortest back-reference DEFLATE can encode.
pub const MIN_MATCH_LEN: usize = 3;
/// Longest back-reference DEFLATE can encode.
pub const MAX_MATCH_LEN: usize = 258;

const HASH_BITS: u32 = 15;
const HASH_SIZE: usize = 1 << HASH_BITS;

#[inline]
fn hash3(data: &[u8], p: usize) -> usize {
    let v = (data[p] as u32) | ((data[p + 1] as u32) << 8) | ((data[p + 2] as u32) << 16);
    ((v.wrapping_mul(2_654_435_761)) >> (32 - HASH_BITS)) as usize
}

/// A single candidate or accepted back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Number of bytes covered by the match (3..=258).
    pub length: usize,
    /// Distance back from the current position (1..=32768).
    pub distance: usize,
}

/// Hash-chain index over a fixed window, used to probe for the longest
/// match at any position within it.
///
/// The index is built incrementally: [`Self::insert`] must be called for
/// a position before [`Self::find_match`] may return it as a candidate
/// for a later position. This mirrors the teacher's `update_hash`, which
/// is called once per byte as its encoder advances, rather than indexing
/// the whole window up front — a chain entry for a position that has not
/// been visited yet would let an early probe "match" data that lies
/// ahead of it, corrupting both the reported distance and the bytes a
/// decoder would copy.
pub struct MatchFinder<'a> {
    data: &'a [u8],
    hash_head: Vec<i32>,
    chain_next: Vec<i32>,
    fast_mode: bool,
}

impl<'a> MatchFinder<'a> {
    /// Create an empty chain index over `data`. `fast_mode` restricts
    /// lookups to a single probe against the most recent occurrence of a
    /// given trigram, matching the "fast mode" single-probe encoder
    /// (level 1). Call [`Self::insert`] to index positions as the parser
    /// visits them.
    pub fn new(data: &'a [u8], fast_mode: bool) -> Self {
        Self {
            data,
            hash_head: vec![-1i32; HASH_SIZE],
            chain_next: vec![-1i32; data.len()],
            fast_mode,
        }
    }

    /// Index position `p` into the hash chain so later calls to
    /// [`Self::find_match`] at a position past `p` may find it. Positions
    /// must be inserted in increasing order; inserting `p` twice, or out
    /// of order, is not supported.
    pub fn insert(&mut self, p: usize) {
        if p + MIN_MATCH_LEN > self.data.len() {
            return;
        }
        let h = hash3(self.data, p);
        if !self.fast_mode {
            self.chain_next[p] = self.hash_head[h];
        }
        self.hash_head[h] = p as i32;
    }

    /// Find the longest match starting at `p`, probing at most
    /// `max_probes` chain candidates no farther back than `max_dist`.
    /// Only ever considers candidates strictly before `p`.
    pub fn find_match(&self, p: usize, max_dist: usize, max_probes: u32) -> Option<Match> {
        if p + MIN_MATCH_LEN > self.data.len() || max_probes == 0 {
            return None;
        }

        let h = hash3(self.data, p);
        let mut candidate = self.hash_head[h];
        let limit = p.saturating_sub(max_dist);
        let max_len = (self.data.len() - p).min(MAX_MATCH_LEN);
        if max_len < MIN_MATCH_LEN {
            return None;
        }

        let mut best: Option<Match> = None;
        let mut probes = 0u32;

        while candidate >= 0 && (candidate as usize) >= limit {
            let c = candidate as usize;
            if c >= p {
                // A chain entry must never point at or past the position
                // being matched; treat this defensively as "no more
                // usable history" rather than reading ahead of `p`.
                break;
            }

            let best_len = best.map_or(0, |m| m.length);
            if best_len > 0 && best_len < max_len {
                // Cheap early-out: the incumbent's trailing byte must
                // also match before a full scan is worth doing.
                let probe_end = c + best_len;
                let cur_end = p + best_len;
                if probe_end >= self.data.len() || self.data[probe_end] != self.data[cur_end] {
                    probes += 1;
                    if self.fast_mode || probes >= max_probes {
                        break;
                    }
                    candidate = self.chain_next[c];
                    continue;
                }
            }

            let len = match_length(self.data, c, p, max_len);
            if len >= MIN_MATCH_LEN && len > best_len {
                best = Some(Match {
                    length: len,
                    distance: p - c,
                });
                if len >= max_len {
                    break;
                }
            }

            probes += 1;
            if self.fast_mode || probes >= max_probes {
                break;
            }
            candidate = self.chain_next[c];
        }

        best
    }
}

/// Count matching bytes between positions `a` and `b` in `data`, capped
/// at `max_len`, comparing two bytes at a time where possible.
fn match_length(data: &[u8], a: usize, b: usize, max_len: usize) -> usize {
    let mut len = 0;
    while len + 1 < max_len && data[a + len] == data[b + len] && data[a + len + 1] == data[b + len + 1]
    {
        len += 2;
    }
    while len < max_len && data[a + len] == data[b + len] {
        len += 1;
    }
    len
}

/// A single decision out of the parser: a literal byte or a
/// back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzToken {
    /// A literal byte, emitted as-is.
    Literal(u8),
    /// A back-reference copying `length` bytes from `distance` bytes
    /// behind the current output position.
    Match {
        /// Match length, 3..=258.
        length: u16,
        /// Match distance, 1..=32768.
        distance: u16,
    },
}

/// Which parsing discipline [`parse`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// Emit the first accepted match immediately (fast mode's default).
    Greedy,
    /// Defer a match by one byte if the next position finds a longer one
    /// (normal mode's default).
    Lazy,
    /// Only ever consider distance-1 matches (run-length encoding).
    RleOnly,
}

fn accept_match(m: &Match, filter_matches: bool) -> bool {
    if m.length < MIN_MATCH_LEN {
        return false;
    }
    if filter_matches && m.length <= 5 {
        return false;
    }
    // A length-3 match more than 8K back rarely pays for its distance bits.
    if m.length == MIN_MATCH_LEN && m.distance >= 8192 {
        return false;
    }
    true
}

/// Parse `data` into a token stream of literals and back-references.
///
/// `max_dist` bounds how far back a match may reach (normally
/// [`LZ_DICT_SIZE`]); `max_probes` bounds the hash-chain search effort
/// per position; `filter_matches` additionally discards short matches
/// per the encoder's filter flag; `fast_mode` restricts the finder to a
/// single probe.
pub fn parse(
    data: &[u8],
    strategy: ParseStrategy,
    max_dist: usize,
    max_probes: u32,
    filter_matches: bool,
    fast_mode: bool,
) -> Vec<LzToken> {
    parse_from(data, 0, strategy, max_dist, max_probes, filter_matches, fast_mode)
}

/// Like [`parse`], but the token walk begins at `start` rather than 0.
/// Bytes before `start` are indexed into the hash chain (so matches may
/// reach back into them) but are never themselves emitted as literals or
/// match starting points — this is how a preset dictionary is folded into
/// the window without re-emitting its own bytes as output.
pub fn parse_from(
    data: &[u8],
    start: usize,
    strategy: ParseStrategy,
    max_dist: usize,
    max_probes: u32,
    filter_matches: bool,
    fast_mode: bool,
) -> Vec<LzToken> {
    if strategy == ParseStrategy::RleOnly {
        return parse_rle_only(data, start);
    }

    let mut finder = MatchFinder::new(data, fast_mode);
    // A preset dictionary is history, never output: index it up front so
    // the main walk can reach back into it, but start emitting tokens
    // only from `start`.
    for i in 0..start {
        finder.insert(i);
    }

    let mut tokens = Vec::new();
    let n = data.len();
    let mut p = start;

    while p < n {
        let dist_bound = max_dist.min(p);
        let candidate = finder.find_match(p, dist_bound, max_probes);

        match candidate {
            Some(m1) if accept_match(&m1, filter_matches) => {
                finder.insert(p);

                let mut take_literal = false;
                if strategy == ParseStrategy::Lazy && p + 1 < n {
                    let next_bound = max_dist.min(p + 1);
                    if let Some(m2) = finder.find_match(p + 1, next_bound, max_probes) {
                        if m2.length > m1.length && accept_match(&m2, filter_matches) {
                            take_literal = true;
                        }
                    }
                }

                if take_literal {
                    tokens.push(LzToken::Literal(data[p]));
                    p += 1;
                } else {
                    // `p` is already indexed above; index the rest of the
                    // match's span so later positions can reach into it.
                    for i in (p + 1)..(p + m1.length) {
                        finder.insert(i);
                    }
                    tokens.push(LzToken::Match {
                        length: m1.length as u16,
                        distance: m1.distance as u16,
                    });
                    p += m1.length;
                }
            }
            _ => {
                finder.insert(p);
                tokens.push(LzToken::Literal(data[p]));
                p += 1;
            }
        }
    }

    tokens
}

fn parse_rle_only(data: &[u8], start: usize) -> Vec<LzToken> {
    let mut tokens = Vec::new();
    let n = data.len();
    let mut p = start;

    while p < n {
        if p >= 1 {
            let mut len = 0usize;
            let max_len = (n - p).min(MAX_MATCH_LEN);
            while len < max_len && data[p + len] == data[p - 1] {
                len += 1;
            }
            if len >= MIN_MATCH_LEN {
                tokens.push(LzToken::Match {
                    length: len as u16,
                    distance: 1,
                });
                p += len;
                continue;
            }
        }
        tokens.push(LzToken::Literal(data[p]));
        p += 1;
    }

    tokens
}
