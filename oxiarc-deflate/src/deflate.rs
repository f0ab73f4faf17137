//! The LZ code buffer, canonical-length builder, and block emitter
//! (RFC 1951 §3.2): turns a byte slice into raw, fixed-Huffman, or
//! dynamic-Huffman DEFLATE blocks, picking whichever is cheapest.

use crate::checksums::Adler32;
use crate::huffman;
use crate::lz77::{self, LzToken, ParseStrategy, LZ_DICT_SIZE};
use crate::tables;
use oxiarc_core::bitstream::BitWriter;
use oxiarc_core::error::{OxiArcError, Result};
use oxiarc_core::traits::{CompressionLevel, FlushMode, Status};

const BLOCK_SIZE: usize = 65_535;

/// Default level→probes table (index = level 0..=10).
const LEVEL_PROBES: [u32; 11] = [0, 1, 6, 32, 16, 32, 128, 256, 512, 768, 1500];

/// Packed 32-bit deflate configuration word.
///
/// Bits 0-11: max probes (0..=4095). Bit 12: write zlib header. Bit 13:
/// compute Adler-32. Bit 14: greedy parsing. Bit 15: non-deterministic
/// init. Bit 16: RLE matches only. Bit 17: filter short matches. Bit 18:
/// force static (fixed-Huffman) blocks. Bit 19: force raw (stored)
/// blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeflateFlags(u32);

impl DeflateFlags {
    /// Mask for the low 12 bits carrying max-probes.
    pub const MAX_PROBES_MASK: u32 = 0xFFF;
    /// Write a 2-byte zlib header before the first block.
    pub const WRITE_ZLIB_HEADER: u32 = 1 << 12;
    /// Compute and emit an Adler-32 trailer on finish.
    pub const COMPUTE_ADLER32: u32 = 1 << 13;
    /// Use greedy (not lazy) parsing.
    pub const GREEDY_PARSING: u32 = 1 << 14;
    /// Skip clearing internal tables at init for speed, at the cost of
    /// deterministic output. Off by default; this crate does not carry
    /// any such residual state to skip, so the bit is accepted but has
    /// no effect, matching the spec's note that it "MUST produce
    /// byte-identical output across runs when off" (and trivially so
    /// here since nothing is skipped either way).
    pub const NON_DETERMINISTIC_INIT: u32 = 1 << 15;
    /// Only consider distance-1 matches.
    pub const RLE_MATCHES: u32 = 1 << 16;
    /// Discard matches of length <= 5.
    pub const FILTER_MATCHES: u32 = 1 << 17;
    /// Always emit fixed-Huffman blocks.
    pub const FORCE_STATIC: u32 = 1 << 18;
    /// Always emit stored (raw) blocks.
    pub const FORCE_RAW: u32 = 1 << 19;

    /// Build a flag word from a raw packed value.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Build the default flag word for a compression level, per the
    /// level→probes table: level 0 forces raw blocks, level 1 uses
    /// greedy parsing with a single probe.
    pub fn from_level(level: CompressionLevel, zlib_wrap: bool) -> Self {
        let lvl = (level.level() as usize).min(10);
        let mut bits = LEVEL_PROBES[lvl];

        if zlib_wrap {
            bits |= Self::WRITE_ZLIB_HEADER | Self::COMPUTE_ADLER32;
        }
        if lvl == 0 {
            bits |= Self::FORCE_RAW;
        }
        if lvl == 1 {
            bits |= Self::GREEDY_PARSING;
        }

        Self(bits)
    }

    /// The raw packed word.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Maximum hash-chain probes per match attempt.
    pub fn max_probes(&self) -> u32 {
        self.0 & Self::MAX_PROBES_MASK
    }

    /// True if every bit in `mask` is set.
    pub fn contains(&self, mask: u32) -> bool {
        self.0 & mask == mask
    }
}

impl Default for DeflateFlags {
    fn default() -> Self {
        Self::from_level(CompressionLevel::default(), true)
    }
}

fn zlib_header_bytes() -> [u8; 2] {
    let cmf = 0x78u8; // CM = 8 (deflate), CINFO = 7 (32K window)
    let flevel: u8 = 2;
    let mut flg = (flevel & 0x3) << 6;
    let check = ((cmf as u16) * 256 + flg as u16) % 31;
    if check != 0 {
        flg += (31 - check) as u8;
    }
    [cmf, flg]
}

/// Per-symbol occurrence counts, used to build optimal Huffman code
/// lengths for a block.
struct FrequencyTables {
    litlen: Vec<u64>,
    dist: Vec<u64>,
}

impl FrequencyTables {
    fn from_tokens(tokens: &[LzToken]) -> Self {
        let mut litlen = vec![0u64; 288];
        let mut dist = vec![0u64; 30];

        for tok in tokens {
            match tok {
                LzToken::Literal(b) => litlen[*b as usize] += 1,
                LzToken::Match { length, distance } => {
                    let (lcode, _, _) = tables::length_to_code(*length);
                    litlen[lcode as usize] += 1;
                    let (dcode, _, _) = tables::distance_to_code(*distance);
                    dist[dcode as usize] += 1;
                }
            }
        }
        litlen[256] += 1; // end-of-block

        Self { litlen, dist }
    }
}

fn extra_bits_total(tokens: &[LzToken]) -> u64 {
    tokens
        .iter()
        .filter_map(|t| match t {
            LzToken::Match { length, distance } => {
                let (_, lb, _) = tables::length_to_code(*length);
                let (_, db, _) = tables::distance_to_code(*distance);
                Some((lb + db) as u64)
            }
            LzToken::Literal(_) => None,
        })
        .sum()
}

fn weighted_bits(freqs: &[u64], lengths: &[u8]) -> u64 {
    freqs.iter().zip(lengths).map(|(&f, &l)| f * l as u64).sum()
}

/// A packed code-length-alphabet symbol: `(symbol, extra_value)`, where
/// 16/17/18 carry a repeat count in `extra_value`.
type PackedLength = (u8, u16);

fn pack_code_lengths(lengths: &[u8]) -> Vec<PackedLength> {
    let mut out = Vec::new();
    let n = lengths.len();
    let mut i = 0;

    while i < n {
        let val = lengths[i];
        let mut run = 1usize;
        while i + run < n && lengths[i + run] == val {
            run += 1;
        }

        if val == 0 {
            let mut remaining = run;
            while remaining > 0 {
                if remaining < 3 {
                    out.push((0, 0));
                    remaining -= 1;
                } else if remaining <= 10 {
                    out.push((17, (remaining - 3) as u16));
                    remaining = 0;
                } else {
                    let take = remaining.min(138);
                    out.push((18, (take - 11) as u16));
                    remaining -= take;
                }
            }
        } else {
            out.push((val, 0));
            let mut remaining = run - 1;
            while remaining > 0 {
                if remaining < 3 {
                    out.push((val, 0));
                    remaining -= 1;
                } else {
                    let take = remaining.min(6);
                    out.push((16, (take - 3) as u16));
                    remaining -= take;
                }
            }
        }

        i += run;
    }

    out
}

fn packed_header_bits(packed: &[PackedLength], meta_lengths: &[u8]) -> u64 {
    packed
        .iter()
        .map(|&(sym, _)| {
            let extra = match sym {
                16 => 2,
                17 => 3,
                18 => 7,
                _ => 0,
            };
            meta_lengths[sym as usize] as u64 + extra
        })
        .sum()
}

/// A fully-built dynamic block's tables, kept together so cost
/// estimation and emission share one construction.
struct DynamicBlock {
    litlen_lengths: Vec<u8>,
    dist_lengths: Vec<u8>,
    meta_lengths: Vec<u8>,
    packed: Vec<PackedLength>,
    hlit: usize,
    hdist: usize,
    hclen_count: usize,
}

fn last_nonzero(lengths: &[u8], min_count: usize) -> usize {
    let trimmed = lengths
        .iter()
        .rposition(|&l| l != 0)
        .map_or(0, |idx| idx + 1);
    trimmed.max(min_count)
}

fn build_dynamic_block(freqs: &FrequencyTables) -> DynamicBlock {
    let mut litlen_lengths = huffman::build_length_limited_lengths(&freqs.litlen, 15);
    let mut dist_lengths = huffman::build_length_limited_lengths(&freqs.dist, 15);

    if dist_lengths.iter().all(|&l| l == 0) {
        // RFC 1951 requires at least one distance code length even when
        // no back-references occur.
        dist_lengths[0] = 1;
    }

    let hlit = last_nonzero(&litlen_lengths, 257);
    let hdist = last_nonzero(&dist_lengths, 1);
    litlen_lengths.truncate(hlit);
    dist_lengths.truncate(hdist);

    let mut combined = litlen_lengths.clone();
    combined.extend_from_slice(&dist_lengths);
    let packed = pack_code_lengths(&combined);

    let mut meta_freq = vec![0u64; 19];
    for &(sym, _) in &packed {
        meta_freq[sym as usize] += 1;
    }
    let meta_lengths = huffman::build_length_limited_lengths(&meta_freq, 7);

    let hclen_count = (0..19)
        .rev()
        .find(|&i| meta_lengths[tables::CODE_LENGTH_ORDER[i]] != 0)
        .map_or(4, |i| (i + 1).max(4));

    DynamicBlock {
        litlen_lengths,
        dist_lengths,
        meta_lengths,
        packed,
        hlit,
        hdist,
        hclen_count,
    }
}

/// Which block representation was chosen for a chunk.
enum BlockPlan {
    Stored,
    Fixed,
    Dynamic(Box<DynamicBlock>),
}

fn choose_block_plan(flags: &DeflateFlags, chunk_len: usize, freqs: &FrequencyTables, extra_bits: u64) -> BlockPlan {
    if flags.contains(DeflateFlags::FORCE_RAW) {
        return BlockPlan::Stored;
    }
    if flags.contains(DeflateFlags::FORCE_STATIC) {
        return BlockPlan::Fixed;
    }

    let fixed_cost =
        3 + weighted_bits(&freqs.litlen, &tables::fixed_litlen_lengths()) + weighted_bits(&freqs.dist, &tables::fixed_distance_lengths()) + extra_bits;

    let dynamic = build_dynamic_block(freqs);
    let dynamic_cost = 3
        + 14
        + (dynamic.hclen_count as u64) * 3
        + packed_header_bits(&dynamic.packed, &dynamic.meta_lengths)
        + weighted_bits(&freqs.litlen[..dynamic.hlit], &dynamic.litlen_lengths)
        + weighted_bits(&freqs.dist[..dynamic.hdist], &dynamic.dist_lengths)
        + extra_bits;

    let raw_cost = (chunk_len as u64 + 5) * 8;

    if raw_cost <= fixed_cost && raw_cost <= dynamic_cost {
        BlockPlan::Stored
    } else if fixed_cost <= dynamic_cost {
        BlockPlan::Fixed
    } else {
        BlockPlan::Dynamic(Box::new(dynamic))
    }
}

/// The resumable DEFLATE encoder: accumulates input and, on demand,
/// packs it into raw, fixed, or dynamic blocks.
pub struct Deflater {
    flags: DeflateFlags,
    pending: Vec<u8>,
    bitwriter: BitWriter<Vec<u8>>,
    adler: Adler32,
    header_written: bool,
    finished: bool,
    dictionary: Vec<u8>,
    dictionary_consumed: bool,
    /// Sticky status once [`Self::deflate`] has hit an unrecoverable
    /// error; every later call returns it immediately without touching
    /// state again, mirroring [`crate::inflate::Inflater`]'s
    /// `State::Failed`.
    failed: Option<Status>,
}

impl Deflater {
    /// Create a deflater with the given flag word.
    pub fn new(flags: DeflateFlags) -> Self {
        Self {
            flags,
            pending: Vec::new(),
            bitwriter: BitWriter::new(Vec::new()),
            adler: Adler32::new(),
            header_written: false,
            finished: false,
            dictionary: Vec::new(),
            dictionary_consumed: false,
            failed: None,
        }
    }

    /// Create a deflater with a preset dictionary already primed into its
    /// matcher window, for raw (non-zlib) streams whose decoder will be
    /// seeded with the same dictionary out of band.
    pub fn with_dictionary(flags: DeflateFlags, dictionary: &[u8]) -> Self {
        let mut deflater = Self::new(flags);
        deflater.set_dictionary(dictionary);
        deflater
    }

    /// Prime the match finder's window with `dictionary` so the first
    /// block's back-references may reach into it. Only the last
    /// [`LZ_DICT_SIZE`] bytes are kept if `dictionary` is larger. Must be
    /// called before the first [`Self::process`] call; has no effect
    /// afterwards. Returns the dictionary's Adler-32 checksum, for callers
    /// that want to hand it to the matching decoder's
    /// [`crate::inflate::Inflater::set_dictionary`].
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> u32 {
        let trimmed = if dictionary.len() > LZ_DICT_SIZE {
            &dictionary[dictionary.len() - LZ_DICT_SIZE..]
        } else {
            dictionary
        };
        self.dictionary = trimmed.to_vec();
        Adler32::compute(dictionary)
    }

    /// Buffer more source bytes.
    pub fn write_input(&mut self, data: &[u8]) {
        if self.flags.contains(DeflateFlags::COMPUTE_ADLER32) {
            self.adler.update(data);
        }
        self.pending.extend_from_slice(data);
    }

    /// True once the final block and trailer (if any) have been emitted.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain whatever compressed bytes have been fully flushed so far.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(self.bitwriter.get_mut())
    }

    fn write_header_if_needed(&mut self) -> Result<()> {
        if !self.header_written {
            if self.flags.contains(DeflateFlags::WRITE_ZLIB_HEADER) {
                let [cmf, flg] = zlib_header_bytes();
                self.bitwriter.write_byte_aligned(cmf)?;
                self.bitwriter.write_byte_aligned(flg)?;
            }
            self.header_written = true;
        }
        Ok(())
    }

    fn write_trailer_and_finish(&mut self) -> Result<()> {
        self.bitwriter.align_to_byte()?;

        if self.flags.contains(DeflateFlags::COMPUTE_ADLER32) {
            let checksum = self.adler.finish();
            self.bitwriter.write_byte_aligned((checksum >> 24) as u8)?;
            self.bitwriter.write_byte_aligned((checksum >> 16) as u8)?;
            self.bitwriter.write_byte_aligned((checksum >> 8) as u8)?;
            self.bitwriter.write_byte_aligned(checksum as u8)?;
        }

        self.bitwriter.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Pack whatever is possible into blocks. With `finish` false, only
    /// complete 64 KiB chunks are emitted and any remainder stays
    /// buffered; with `finish` true, all remaining bytes are emitted
    /// (the last chunk marked final) and the stream is closed out.
    pub fn process(&mut self, finish: bool) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        self.write_header_if_needed()?;

        while !finish && self.pending.len() >= BLOCK_SIZE {
            let chunk: Vec<u8> = self.pending.drain(..BLOCK_SIZE).collect();
            self.emit_block(&chunk, false)?;
        }

        if finish {
            loop {
                if self.pending.len() > BLOCK_SIZE {
                    let chunk: Vec<u8> = self.pending.drain(..BLOCK_SIZE).collect();
                    self.emit_block(&chunk, false)?;
                } else {
                    let chunk = std::mem::take(&mut self.pending);
                    self.emit_block(&chunk, true)?;
                    break;
                }
            }

            self.write_trailer_and_finish()?;
        }

        Ok(())
    }

    /// Emit whatever is currently buffered as a non-final block, without
    /// closing the stream out. Used by [`Self::deflate`] to honor
    /// `SyncFlush`/`FullFlush` requests that arrive with less than a full
    /// block's worth of input pending.
    fn flush_pending_as_block(&mut self) -> Result<()> {
        if self.finished || self.pending.is_empty() {
            return Ok(());
        }
        self.write_header_if_needed()?;
        let chunk = std::mem::take(&mut self.pending);
        self.emit_block(&chunk, false)
    }

    /// Copy as many queued compressed bytes as fit into `out`, removing
    /// them from the internal queue. Returns the number of bytes copied.
    fn drain_output(&mut self, out: &mut [u8]) -> usize {
        let queued = self.bitwriter.get_mut();
        let n = out.len().min(queued.len());
        out[..n].copy_from_slice(&queued[..n]);
        queued.drain(..n);
        n
    }

    /// Compress as much as possible from `next_in` into `next_out`,
    /// returning `(bytes_consumed, bytes_produced, status)`.
    ///
    /// Mirrors [`crate::inflate::Inflater::inflate`]'s streaming
    /// contract: a call suspends exactly at input exhaustion or output
    /// saturation. Unlike [`Self::write_input`]/[`Self::process`], which
    /// let `pending` grow to hold an entire stream before any block is
    /// emitted, this entry point only ever buffers up to one block's
    /// worth (`BLOCK_SIZE`) of source bytes between calls, so a caller
    /// driving a whole stream through `deflate()` never holds more than a
    /// fixed, bounded amount of unflushed state regardless of total
    /// stream length.
    pub fn deflate(
        &mut self,
        next_in: &[u8],
        next_out: &mut [u8],
        flush: FlushMode,
    ) -> (usize, usize, Status) {
        if let Some(status) = self.failed {
            return (0, 0, status);
        }

        let mut in_pos = 0usize;
        let mut out_pos = 0usize;

        loop {
            out_pos += self.drain_output(&mut next_out[out_pos..]);
            if !self.bitwriter.get_ref().is_empty() {
                // `next_out` is full; the caller must drain before more
                // progress can be made.
                return (in_pos, out_pos, Status::Ok);
            }

            if self.finished {
                return (in_pos, out_pos, Status::StreamEnd);
            }

            let room = BLOCK_SIZE.saturating_sub(self.pending.len());
            let take = room.min(next_in.len() - in_pos);
            if take > 0 {
                self.write_input(&next_in[in_pos..in_pos + take]);
                in_pos += take;
            }

            let input_exhausted = in_pos >= next_in.len();
            let should_finish = flush == FlushMode::Finish && input_exhausted;
            let should_flush_partial = !should_finish
                && input_exhausted
                && flush != FlushMode::NoFlush
                && !self.pending.is_empty();

            let step = if self.pending.len() >= BLOCK_SIZE {
                self.process(false)
            } else if should_finish {
                self.process(true)
            } else if should_flush_partial {
                self.flush_pending_as_block()
            } else if input_exhausted {
                if in_pos == 0 && out_pos == 0 && !next_in.is_empty() {
                    return (in_pos, out_pos, Status::BufError);
                }
                return (in_pos, out_pos, Status::Ok);
            } else {
                // `take` above always consumes everything it can; reaching
                // here with input left and room to spare cannot happen.
                continue;
            };

            if let Err(err) = step {
                let status = status_for_error(&err);
                self.failed = Some(status);
                return (in_pos, out_pos, status);
            }
        }
    }

    fn emit_block(&mut self, chunk: &[u8], is_final: bool) -> Result<()> {
        let strategy = if self.flags.contains(DeflateFlags::RLE_MATCHES) {
            ParseStrategy::RleOnly
        } else if self.flags.contains(DeflateFlags::GREEDY_PARSING) {
            ParseStrategy::Greedy
        } else {
            ParseStrategy::Lazy
        };

        let fast_mode = self.flags.max_probes() <= 1;
        let filter_matches = self.flags.contains(DeflateFlags::FILTER_MATCHES);
        let max_probes = self.flags.max_probes().max(1);

        let tokens = if !self.dictionary.is_empty() && !self.dictionary_consumed {
            let dict_len = self.dictionary.len();
            let mut combined = self.dictionary.clone();
            combined.extend_from_slice(chunk);
            self.dictionary_consumed = true;
            lz77::parse_from(&combined, dict_len, strategy, LZ_DICT_SIZE, max_probes, filter_matches, fast_mode)
        } else {
            lz77::parse(chunk, strategy, LZ_DICT_SIZE, max_probes, filter_matches, fast_mode)
        };

        let freqs = FrequencyTables::from_tokens(&tokens);
        let extra_bits = extra_bits_total(&tokens);
        let plan = choose_block_plan(&self.flags, chunk.len(), &freqs, extra_bits);

        match plan {
            BlockPlan::Stored => self.emit_stored(chunk, is_final),
            BlockPlan::Fixed => self.emit_fixed(&tokens, is_final),
            BlockPlan::Dynamic(dyn_block) => self.emit_dynamic(&tokens, &dyn_block, is_final),
        }
    }

    fn emit_stored(&mut self, chunk: &[u8], is_final: bool) -> Result<()> {
        self.bitwriter.write_bits(is_final as u32, 1)?;
        self.bitwriter.write_bits(0b00, 2)?;
        self.bitwriter.align_to_byte()?;

        let len = chunk.len() as u16;
        let nlen = !len;
        self.bitwriter.write_byte_aligned(len as u8)?;
        self.bitwriter.write_byte_aligned((len >> 8) as u8)?;
        self.bitwriter.write_byte_aligned(nlen as u8)?;
        self.bitwriter.write_byte_aligned((nlen >> 8) as u8)?;
        self.bitwriter.write_bytes(chunk)?;
        Ok(())
    }

    fn emit_fixed(&mut self, tokens: &[LzToken], is_final: bool) -> Result<()> {
        self.bitwriter.write_bits(is_final as u32, 1)?;
        self.bitwriter.write_bits(0b01, 2)?;

        let litlen_lengths = tables::fixed_litlen_lengths();
        let dist_lengths = tables::fixed_distance_lengths();
        let litlen_codes = huffman::assign_canonical_codes(&litlen_lengths);
        let dist_codes = huffman::assign_canonical_codes(&dist_lengths);

        self.emit_symbols(tokens, &litlen_codes, &litlen_lengths, &dist_codes, &dist_lengths)
    }

    fn emit_dynamic(&mut self, tokens: &[LzToken], block: &DynamicBlock, is_final: bool) -> Result<()> {
        self.bitwriter.write_bits(is_final as u32, 1)?;
        self.bitwriter.write_bits(0b10, 2)?;

        self.bitwriter.write_bits((block.hlit - 257) as u32, 5)?;
        self.bitwriter.write_bits((block.hdist - 1) as u32, 5)?;
        self.bitwriter.write_bits((block.hclen_count - 4) as u32, 4)?;

        for i in 0..block.hclen_count {
            let sym = tables::CODE_LENGTH_ORDER[i];
            self.bitwriter.write_bits(block.meta_lengths[sym] as u32, 3)?;
        }

        let meta_codes = huffman::assign_canonical_codes(&block.meta_lengths);
        for &(sym, extra) in &block.packed {
            self.bitwriter
                .write_bits(meta_codes[sym as usize] as u32, block.meta_lengths[sym as usize])?;
            match sym {
                16 => self.bitwriter.write_bits(extra as u32, 2)?,
                17 => self.bitwriter.write_bits(extra as u32, 3)?,
                18 => self.bitwriter.write_bits(extra as u32, 7)?,
                _ => {}
            }
        }

        let litlen_codes = huffman::assign_canonical_codes(&block.litlen_lengths);
        let dist_codes = huffman::assign_canonical_codes(&block.dist_lengths);
        self.emit_symbols(tokens, &litlen_codes, &block.litlen_lengths, &dist_codes, &block.dist_lengths)
    }

    fn emit_symbols(
        &mut self,
        tokens: &[LzToken],
        litlen_codes: &[u16],
        litlen_lengths: &[u8],
        dist_codes: &[u16],
        dist_lengths: &[u8],
    ) -> Result<()> {
        for tok in tokens {
            match *tok {
                LzToken::Literal(b) => {
                    let sym = b as usize;
                    self.bitwriter.write_bits(litlen_codes[sym] as u32, litlen_lengths[sym])?;
                }
                LzToken::Match { length, distance } => {
                    let (lcode, lextra_bits, lextra_val) = tables::length_to_code(length);
                    self.bitwriter
                        .write_bits(litlen_codes[lcode as usize] as u32, litlen_lengths[lcode as usize])?;
                    if lextra_bits > 0 {
                        self.bitwriter.write_bits(lextra_val as u32, lextra_bits)?;
                    }

                    let (dcode, dextra_bits, dextra_val) = tables::distance_to_code(distance);
                    self.bitwriter
                        .write_bits(dist_codes[dcode as usize] as u32, dist_lengths[dcode as usize])?;
                    if dextra_bits > 0 {
                        self.bitwriter.write_bits(dextra_val as u32, dextra_bits)?;
                    }
                }
            }
        }
        self.bitwriter.write_bits(litlen_codes[256] as u32, litlen_lengths[256])
    }
}

fn status_for_error(err: &OxiArcError) -> Status {
    match err {
        OxiArcError::InvalidParameter { .. } => Status::ParamError,
        _ => Status::DataError,
    }
}

/// Compress a complete buffer into a raw (unwrapped) DEFLATE stream in
/// one call, at the given level (0..=9). For zlib-wrapped output, use
/// [`crate::zlib::zlib_compress`].
pub fn deflate(data: &[u8], level: u8) -> Result<Vec<u8>> {
    let flags = DeflateFlags::from_level(CompressionLevel::new(level), false);
    let mut deflater = Deflater::new(flags);
    deflater.write_input(data);
    deflater.process(true)?;
    Ok(deflater.take_output())
}
