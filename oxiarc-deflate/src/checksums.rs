//! Adler-32, the rolling checksum carried in the zlib trailer (RFC 1950
//! §9). CRC-32 lives in `oxiarc_core::crc` and is re-exported from here
//! for callers that only ever touch this crate.

pub use oxiarc_core::crc::{crc32, Crc32};

const MOD_ADLER: u32 = 65521;

/// Largest number of bytes that can be folded into `a`/`b` before either
/// might overflow a `u32` accumulator, bounding how often the mod-65521
/// reduction is needed.
const NMAX: usize = 5552;

/// Incremental Adler-32 checksum.
#[derive(Debug, Clone, Copy)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Adler32 {
    /// A fresh checksum seeded to Adler-32's defined initial value, 1.
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Fold `data` into the running checksum.
    pub fn update(&mut self, data: &[u8]) {
        let mut a = self.a;
        let mut b = self.b;

        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                a += byte as u32;
                b += a;
            }
            a %= MOD_ADLER;
            b %= MOD_ADLER;
        }

        self.a = a;
        self.b = b;
    }

    /// The checksum value accumulated so far.
    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }

    /// Compute the Adler-32 checksum of a complete buffer in one call.
    pub fn compute(data: &[u8]) -> u32 {
        let mut checksum = Self::new();
        checksum.update(data);
        checksum.finish()
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the Adler-32 checksum of `data` in one call.
pub fn adler32(data: &[u8]) -> u32 {
    Adler32::compute(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adler32_empty() {
        assert_eq!(adler32(b""), 1);
    }

    #[test]
    fn test_adler32_known_value() {
        // Reference value from RFC 1950's own Adler-32 worked example.
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_adler32_incremental_matches_one_shot() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let one_shot = adler32(data);

        let mut incremental = Adler32::new();
        for chunk in data.chunks(7) {
            incremental.update(chunk);
        }
        assert_eq!(incremental.finish(), one_shot);
    }

    #[test]
    fn test_adler32_large_input_wraps_correctly() {
        // Exercises the NMAX chunking boundary.
        let data = vec![0xAAu8; NMAX * 3 + 17];
        let one_shot = adler32(&data);

        let mut incremental = Adler32::new();
        incremental.update(&data[..NMAX]);
        incremental.update(&data[NMAX..]);
        assert_eq!(incremental.finish(), one_shot);
    }

    #[test]
    fn test_crc32_reexport_available() {
        assert_eq!(crc32(b""), 0);
    }
}
