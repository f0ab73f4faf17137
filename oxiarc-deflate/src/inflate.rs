//! Resumable DEFLATE/zlib decompressor.
//!
//! [`Inflater`] is a state machine, not a function: every transition
//! reads only as many bits as it strictly needs, and if a call runs out
//! of input or output space mid-symbol, the next call picks up exactly
//! where the last one left off. All state that would otherwise live on
//! a stack frame across a `read()` syscall — which block type is open,
//! how many bytes remain in a back-reference copy, the scratch
//! code-length array for a dynamic header — is instead a field on
//! `Inflater` itself.

use crate::bitreader::BitReader;
use crate::checksums::Adler32;
use crate::huffman::DecodeTable;
use crate::tables;
use oxiarc_core::error::{OxiArcError, Result};
use oxiarc_core::ringbuffer::RingBuffer;
use oxiarc_core::traits::{FlushMode, Status};

/// Which framing the input stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    /// RFC 1950 zlib framing: a 2-byte header and a big-endian Adler-32
    /// trailer around a raw DEFLATE stream.
    Zlib,
    /// Bare RFC 1951 DEFLATE with no header or trailer.
    Raw,
}

/// The state machine's program counter. Every variant that needs locals
/// across a suspension carries them; everything else lives on `Inflater`.
#[derive(Debug, Clone)]
enum State {
    ZlibHeader,
    BlockHeader,
    StoredLen,
    StoredCopy { remaining: usize },
    DynamicCounts,
    DynamicClenLengths,
    DynamicCodeLengths,
    BuildTables,
    Symbols,
    MatchCopy { remaining: usize, distance: usize },
    Trailer,
    Done,
    Failed(Status),
}

/// A resumable DEFLATE/zlib decompressor.
///
/// Mirrors the `next_in`/`next_out` driver loop of the classic zlib
/// `inflate()`: each call is handed a slice of fresh input and a slice
/// of output space, and returns how much of each it used along with a
/// [`Status`] telling the caller what to do next.
pub struct Inflater {
    wrap: Wrap,
    state: State,
    bitreader: BitReader,

    final_block: bool,

    litlen_table: DecodeTable,
    dist_table: DecodeTable,
    clen_table: DecodeTable,

    hlit: usize,
    hdist: usize,
    hclen: usize,
    clen_lengths: [u8; 19],
    clen_read: usize,
    code_lengths: Vec<u8>,

    window: RingBuffer,
    adler: Adler32,
    stored_adler: u32,
}

impl Inflater {
    /// Create a fresh decompressor for a stream framed as `wrap`.
    pub fn new(wrap: Wrap) -> Self {
        let empty = DecodeTable::from_code_lengths(&[]).expect("empty table is trivially valid");
        Self {
            wrap,
            state: if wrap == Wrap::Zlib {
                State::ZlibHeader
            } else {
                State::BlockHeader
            },
            bitreader: BitReader::new(),
            final_block: false,
            litlen_table: empty.clone(),
            dist_table: empty.clone(),
            clen_table: empty,
            hlit: 0,
            hdist: 0,
            hclen: 0,
            clen_lengths: [0u8; 19],
            clen_read: 0,
            code_lengths: Vec::new(),
            window: RingBuffer::deflate(),
            adler: Adler32::new(),
            stored_adler: 0,
        }
    }

    /// True once the final block and (if wrapped) trailer have been
    /// consumed and verified.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Done)
    }

    /// Create an inflater with a preset dictionary already loaded into
    /// its window, for streams whose encoder was seeded the same way.
    pub fn with_dictionary(wrap: Wrap, dictionary: &[u8]) -> Self {
        let mut inflater = Self::new(wrap);
        inflater.set_dictionary(dictionary);
        inflater
    }

    /// Preload `dictionary` into the output window before decoding
    /// begins, so that early back-references may reach into it as if it
    /// were already-emitted output. Returns the dictionary's Adler-32
    /// checksum. Call this before the first `inflate()` call; this
    /// crate's zlib header parsing always rejects the in-band FDICT bit
    /// (the dictionary must be agreed out of band, as in `Wrap::Raw`
    /// use), so this is the only way to prime one.
    pub fn set_dictionary(&mut self, dictionary: &[u8]) -> u32 {
        self.window.preload_dictionary(dictionary);
        Adler32::compute(dictionary)
    }

    /// Ensure at least `n` bits are buffered, pulling from `input[*pos..]`
    /// as needed.
    ///
    /// Returns `true` if the caller may proceed (either `n` real bits are
    /// now available, or `finishing` is set and no more input will ever
    /// arrive — in which case reads past the buffered bits degrade to
    /// zero, and a truncated stream simply fails validation downstream).
    /// Returns `false` to signal that this call must suspend here.
    fn ensure_bits(&mut self, input: &[u8], pos: &mut usize, n: u8, finishing: bool) -> bool {
        if self.bitreader.has(n) {
            return true;
        }
        self.bitreader.refill(input, pos);
        if self.bitreader.has(n) {
            return true;
        }
        finishing && *pos >= input.len()
    }

    /// Decompress as much as possible from `next_in` into `next_out`.
    ///
    /// Returns `(bytes_consumed, bytes_produced, status)`. `flush ==
    /// Finish` tells the inflater that `next_in` holds the last bytes of
    /// the stream, so a truncated trailing block's missing bits may be
    /// treated as zero rather than triggering a suspend.
    pub fn inflate(
        &mut self,
        next_in: &[u8],
        next_out: &mut [u8],
        flush: FlushMode,
    ) -> (usize, usize, Status) {
        if let State::Failed(status) = self.state {
            return (0, 0, status);
        }
        if let State::Done = self.state {
            return (0, 0, Status::StreamEnd);
        }

        let finishing = flush == FlushMode::Finish;
        let mut pos = 0usize;
        let mut out_pos = 0usize;

        let result = self.run(next_in, &mut pos, next_out, &mut out_pos, finishing);

        match result {
            Ok(Suspend::NeedMoreInput) | Ok(Suspend::NeedMoreOutput) => {
                if pos == 0 && out_pos == 0 {
                    (pos, out_pos, Status::BufError)
                } else {
                    (pos, out_pos, Status::Ok)
                }
            }
            Ok(Suspend::Done) => (pos, out_pos, Status::StreamEnd),
            Err(err) => {
                let status = status_for_error(&err);
                self.state = State::Failed(status);
                (pos, out_pos, status)
            }
        }
    }

    fn run(
        &mut self,
        input: &[u8],
        pos: &mut usize,
        output: &mut [u8],
        out_pos: &mut usize,
        finishing: bool,
    ) -> Result<Suspend> {
        loop {
            match self.state.clone() {
                State::ZlibHeader => {
                    if !self.ensure_bits(input, pos, 16, finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    let cmf = self.bitreader.get(8) as u8;
                    let flg = self.bitreader.get(8) as u8;
                    let header = ((cmf as u16) << 8) | flg as u16;
                    if header % 31 != 0 {
                        return Err(OxiArcError::invalid_header(
                            "FCHECK bits do not make the header a multiple of 31",
                        ));
                    }
                    let cm = cmf & 0x0F;
                    if cm != 8 {
                        return Err(OxiArcError::unsupported_method(cm));
                    }
                    let cinfo = cmf >> 4;
                    if cinfo > 7 {
                        return Err(OxiArcError::invalid_header(
                            "CINFO indicates a window size larger than 32 KiB",
                        ));
                    }
                    let fdict = (flg >> 5) & 1;
                    if fdict != 0 {
                        return Err(OxiArcError::invalid_header(
                            "preset dictionaries are not supported",
                        ));
                    }
                    self.state = State::BlockHeader;
                }

                State::BlockHeader => {
                    if !self.ensure_bits(input, pos, 3, finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    self.final_block = self.bitreader.get(1) != 0;
                    let btype = self.bitreader.get(2);
                    match btype {
                        0 => {
                            self.bitreader.align_to_byte();
                            self.state = State::StoredLen;
                        }
                        1 => {
                            self.litlen_table = tables::fixed_litlen_table()?.clone();
                            self.dist_table = tables::fixed_distance_table()?.clone();
                            self.state = State::Symbols;
                        }
                        2 => {
                            self.state = State::DynamicCounts;
                        }
                        _ => return Err(OxiArcError::invalid_block_type(3)),
                    }
                }

                State::StoredLen => {
                    if !self.ensure_bits(input, pos, 32, finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    let len = self.bitreader.get(16) as u16;
                    let nlen = self.bitreader.get(16) as u16;
                    if len != !nlen {
                        return Err(OxiArcError::corrupted(
                            0,
                            "stored block LEN does not match its one's complement",
                        ));
                    }
                    self.state = State::StoredCopy {
                        remaining: len as usize,
                    };
                }

                State::StoredCopy { mut remaining } => {
                    while remaining > 0 {
                        if *out_pos >= output.len() {
                            self.state = State::StoredCopy { remaining };
                            return Ok(Suspend::NeedMoreOutput);
                        }
                        let byte = if self.bitreader.has(8) {
                            self.bitreader.take_aligned_byte()
                        } else {
                            self.bitreader.refill(input, pos);
                            if self.bitreader.has(8) {
                                self.bitreader.take_aligned_byte()
                            } else if *pos < input.len() {
                                let b = input[*pos];
                                *pos += 1;
                                b
                            } else {
                                self.state = State::StoredCopy { remaining };
                                return Ok(Suspend::NeedMoreInput);
                            }
                        };
                        self.window.push(byte);
                        self.adler.update(&[byte]);
                        output[*out_pos] = byte;
                        *out_pos += 1;
                        remaining -= 1;
                    }
                    self.state = self.after_block();
                }

                State::DynamicCounts => {
                    if !self.ensure_bits(input, pos, 14, finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    self.hlit = self.bitreader.get(5) as usize + 257;
                    self.hdist = self.bitreader.get(5) as usize + 1;
                    self.hclen = self.bitreader.get(4) as usize + 4;
                    self.clen_lengths = [0u8; 19];
                    self.clen_read = 0;
                    self.state = State::DynamicClenLengths;
                }

                State::DynamicClenLengths => {
                    while self.clen_read < self.hclen {
                        if !self.ensure_bits(input, pos, 3, finishing) {
                            return Ok(Suspend::NeedMoreInput);
                        }
                        let value = self.bitreader.get(3) as u8;
                        self.clen_lengths[tables::CODE_LENGTH_ORDER[self.clen_read]] = value;
                        self.clen_read += 1;
                    }
                    self.clen_table = DecodeTable::from_code_lengths(&self.clen_lengths)?;
                    self.code_lengths = Vec::with_capacity(self.hlit + self.hdist);
                    self.state = State::DynamicCodeLengths;
                }

                State::DynamicCodeLengths => {
                    let target = self.hlit + self.hdist;
                    while self.code_lengths.len() < target {
                        if !self.ensure_bits(input, pos, self.clen_table.max_len(), finishing) {
                            return Ok(Suspend::NeedMoreInput);
                        }
                        let sym = self.clen_table.decode(&mut self.bitreader)?;
                        match sym {
                            0..=15 => self.code_lengths.push(sym as u8),
                            16 => {
                                if !self.ensure_bits(input, pos, 2, finishing) {
                                    return Ok(Suspend::NeedMoreInput);
                                }
                                let repeat = self.bitreader.get(2) as usize + 3;
                                let prev = *self.code_lengths.last().ok_or_else(|| {
                                    OxiArcError::corrupted(
                                        0,
                                        "repeat-previous code length with nothing to repeat",
                                    )
                                })?;
                                for _ in 0..repeat {
                                    self.code_lengths.push(prev);
                                }
                            }
                            17 => {
                                if !self.ensure_bits(input, pos, 3, finishing) {
                                    return Ok(Suspend::NeedMoreInput);
                                }
                                let repeat = self.bitreader.get(3) as usize + 3;
                                for _ in 0..repeat {
                                    self.code_lengths.push(0);
                                }
                            }
                            18 => {
                                if !self.ensure_bits(input, pos, 7, finishing) {
                                    return Ok(Suspend::NeedMoreInput);
                                }
                                let repeat = self.bitreader.get(7) as usize + 11;
                                for _ in 0..repeat {
                                    self.code_lengths.push(0);
                                }
                            }
                            _ => {
                                return Err(OxiArcError::invalid_huffman_table(
                                    "code-length symbol out of range",
                                ))
                            }
                        }
                    }
                    self.code_lengths.truncate(target);
                    self.state = State::BuildTables;
                }

                State::BuildTables => {
                    let litlen_lengths = &self.code_lengths[..self.hlit];
                    let dist_lengths = &self.code_lengths[self.hlit..self.hlit + self.hdist];
                    self.litlen_table = DecodeTable::from_code_lengths(litlen_lengths)?;
                    self.dist_table = DecodeTable::from_code_lengths(dist_lengths)?;
                    self.state = State::Symbols;
                }

                State::Symbols => {
                    if *out_pos >= output.len() {
                        return Ok(Suspend::NeedMoreOutput);
                    }
                    if !self.ensure_bits(input, pos, self.litlen_table.max_len(), finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    let sym = self.litlen_table.decode(&mut self.bitreader)?;
                    if sym < 256 {
                        let byte = sym as u8;
                        self.window.push(byte);
                        self.adler.update(&[byte]);
                        output[*out_pos] = byte;
                        *out_pos += 1;
                    } else if sym == 256 {
                        self.state = self.after_block();
                    } else {
                        let code = sym;
                        if !(257..=285).contains(&code) {
                            return Err(OxiArcError::invalid_huffman(0));
                        }
                        let len_extra = tables::LENGTH_EXTRA_BITS[(code - 257) as usize];
                        if !self.ensure_bits(input, pos, len_extra, finishing) {
                            return Ok(Suspend::NeedMoreInput);
                        }
                        let len_extra_val = self.bitreader.get(len_extra) as u16;
                        let length = tables::decode_length(code, len_extra_val);

                        if !self.ensure_bits(input, pos, self.dist_table.max_len(), finishing) {
                            return Ok(Suspend::NeedMoreInput);
                        }
                        let dsym = self.dist_table.decode(&mut self.bitreader)?;
                        if dsym >= 30 {
                            return Err(OxiArcError::invalid_distance(0, self.window.len()));
                        }
                        let dist_extra = tables::DISTANCE_EXTRA_BITS[dsym as usize];
                        if !self.ensure_bits(input, pos, dist_extra, finishing) {
                            return Ok(Suspend::NeedMoreInput);
                        }
                        let dist_extra_val = self.bitreader.get(dist_extra) as u16;
                        let distance = tables::decode_distance(dsym, dist_extra_val) as usize;

                        if distance > self.window.len() {
                            return Err(OxiArcError::invalid_distance(distance, self.window.len()));
                        }

                        self.state = State::MatchCopy {
                            remaining: length as usize,
                            distance,
                        };
                    }
                }

                State::MatchCopy {
                    mut remaining,
                    distance,
                } => {
                    while remaining > 0 {
                        if *out_pos >= output.len() {
                            self.state = State::MatchCopy { remaining, distance };
                            return Ok(Suspend::NeedMoreOutput);
                        }
                        let byte = self.window.byte_at_distance(distance)?;
                        self.window.push(byte);
                        self.adler.update(&[byte]);
                        output[*out_pos] = byte;
                        *out_pos += 1;
                        remaining -= 1;
                    }
                    self.state = State::Symbols;
                }

                State::Trailer => {
                    if self.wrap == Wrap::Raw {
                        self.state = State::Done;
                        return Ok(Suspend::Done);
                    }
                    self.bitreader.align_to_byte();
                    if !self.ensure_bits(input, pos, 32, finishing) {
                        return Ok(Suspend::NeedMoreInput);
                    }
                    let b0 = self.bitreader.get(8) as u8;
                    let b1 = self.bitreader.get(8) as u8;
                    let b2 = self.bitreader.get(8) as u8;
                    let b3 = self.bitreader.get(8) as u8;
                    self.stored_adler = u32::from_be_bytes([b0, b1, b2, b3]);
                    let computed = self.adler.finish();
                    if self.stored_adler != computed {
                        return Err(OxiArcError::checksum_mismatch(self.stored_adler, computed));
                    }
                    self.state = State::Done;
                    return Ok(Suspend::Done);
                }

                State::Done => return Ok(Suspend::Done),
                State::Failed(_) => {
                    unreachable!("inflate() short-circuits before entering run() with a sticky error")
                }
            }
        }
    }

    fn after_block(&mut self) -> State {
        if self.final_block {
            State::Trailer
        } else {
            State::BlockHeader
        }
    }
}

enum Suspend {
    NeedMoreInput,
    NeedMoreOutput,
    Done,
}

/// Decompress a complete raw (unwrapped) DEFLATE stream in one call,
/// growing the output buffer as needed. For zlib-wrapped streams, use
/// [`crate::zlib::zlib_decompress`].
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Inflater::new(Wrap::Raw);
    let mut out = Vec::with_capacity(data.len() * 3 + 64);
    let mut in_pos = 0;
    let mut scratch = vec![0u8; 64 * 1024];

    loop {
        let (consumed, produced, status) =
            inflater.inflate(&data[in_pos..], &mut scratch, FlushMode::Finish);
        in_pos += consumed;
        out.extend_from_slice(&scratch[..produced]);
        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok => continue,
            other => {
                return Err(OxiArcError::corrupted(
                    in_pos as u64,
                    format!("inflate failed with status {other:?}"),
                ))
            }
        }
    }
}

fn status_for_error(err: &OxiArcError) -> Status {
    match err {
        OxiArcError::InvalidParameter { .. } => Status::ParamError,
        _ => Status::DataError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inflate_all(compressed: &[u8], wrap: Wrap, out_cap: usize) -> Vec<u8> {
        let mut inflater = Inflater::new(wrap);
        let mut out = vec![0u8; out_cap];
        let mut in_pos = 0;
        let mut out_pos = 0;
        loop {
            let (consumed, produced, status) = inflater.inflate(
                &compressed[in_pos..],
                &mut out[out_pos..],
                FlushMode::Finish,
            );
            in_pos += consumed;
            out_pos += produced;
            match status {
                Status::StreamEnd => break,
                Status::Ok => continue,
                other => panic!("inflate failed: {other:?}"),
            }
        }
        out.truncate(out_pos);
        out
    }

    #[test]
    fn test_raw_stored_block_roundtrip() {
        // BFINAL=1, BTYPE=00 (stored), then byte-aligned LEN/NLEN/data.
        let data = b"hi!";
        let mut bytes = vec![0b0000_0001u8]; // final, stored
        bytes.push(0x03);
        bytes.push(0x00);
        bytes.push(0xFC);
        bytes.push(0xFF);
        bytes.extend_from_slice(data);

        let out = inflate_all(&bytes, Wrap::Raw, 16);
        assert_eq!(out, data);
    }

    #[test]
    fn test_byte_at_a_time_resumption() {
        // Same stored block, fed one byte per call.
        let data = b"resumable chunking";
        let mut bytes = vec![0b0000_0001u8];
        let len = data.len() as u16;
        bytes.push((len & 0xFF) as u8);
        bytes.push((len >> 8) as u8);
        bytes.push((!len & 0xFF) as u8);
        bytes.push((!len >> 8) as u8);
        bytes.extend_from_slice(data);

        let mut inflater = Inflater::new(Wrap::Raw);
        let mut out = vec![0u8; 64];
        let mut out_pos = 0;
        let mut produced_any_statuses = Vec::new();
        for &byte in &bytes {
            loop {
                let (consumed, produced, status) =
                    inflater.inflate(&[byte], &mut out[out_pos..], FlushMode::NoFlush);
                out_pos += produced;
                produced_any_statuses.push(status);
                if consumed > 0 || produced > 0 {
                    break;
                }
                if status == Status::StreamEnd {
                    break;
                }
            }
            if inflater.is_finished() {
                break;
            }
        }
        out.truncate(out_pos);
        assert_eq!(out, data);
    }

    #[test]
    fn test_invalid_block_type_is_data_error() {
        let bytes = vec![0b0000_0111u8]; // final, btype=11 (invalid)
        let mut inflater = Inflater::new(Wrap::Raw);
        let mut out = vec![0u8; 16];
        let (_, _, status) = inflater.inflate(&bytes, &mut out, FlushMode::Finish);
        assert_eq!(status, Status::DataError);
    }

    #[test]
    fn test_zlib_header_rejects_preset_dictionary() {
        // CMF=0x78 (CM=8, CINFO=7), FLG with FDICT set and FCHECK adjusted.
        let cmf = 0x78u8;
        let mut flg = 0x20u8; // FDICT bit
        let header = ((cmf as u16) << 8) | flg as u16;
        let remainder = header % 31;
        if remainder != 0 {
            flg += (31 - remainder) as u8;
        }
        let bytes = vec![cmf, flg];
        let mut inflater = Inflater::new(Wrap::Zlib);
        let mut out = vec![0u8; 16];
        let (_, _, status) = inflater.inflate(&bytes, &mut out, FlushMode::Finish);
        assert_eq!(status, Status::DataError);
    }

    #[test]
    fn test_zlib_header_rejects_bad_fcheck() {
        let bytes = vec![0x78u8, 0x00u8]; // FCHECK almost certainly wrong
        let mut inflater = Inflater::new(Wrap::Zlib);
        let mut out = vec![0u8; 16];
        let (_, _, status) = inflater.inflate(&bytes, &mut out, FlushMode::Finish);
        assert_eq!(status, Status::DataError);
    }

    #[test]
    fn test_truncated_output_suspends_then_resumes() {
        let data = vec![b'z'; 40];
        let mut bytes = vec![0b0000_0001u8];
        let len = data.len() as u16;
        bytes.push((len & 0xFF) as u8);
        bytes.push((len >> 8) as u8);
        bytes.push((!len & 0xFF) as u8);
        bytes.push((!len >> 8) as u8);
        bytes.extend_from_slice(&data);

        let mut inflater = Inflater::new(Wrap::Raw);
        let mut small_out = vec![0u8; 10];
        let (consumed1, produced1, status1) =
            inflater.inflate(&bytes, &mut small_out, FlushMode::NoFlush);
        assert_eq!(status1, Status::Ok);
        assert_eq!(produced1, 10);

        let mut rest_out = vec![0u8; 40];
        let (_consumed2, produced2, status2) =
            inflater.inflate(&bytes[consumed1..], &mut rest_out, FlushMode::Finish);
        assert_eq!(status2, Status::StreamEnd);
        assert_eq!(produced1 + produced2, 40);
    }
}
