//! LSB-first bit reader/writer over fixed-width units
//!
//! Units are `width` bits wide (at most 8). Bits are consumed and produced
//! least significant first, which is the order the password payload uses
//! for both the 6-bit symbols and the 8-bit bytes.

/// Reads arbitrary bit counts from a sequence of `width`-bit units
pub struct BitReader<'a> {
    data: &'a [u8],
    width: u32,
    pos: usize,
    bits: u32,
    value: u64,
}

impl<'a> BitReader<'a> {
    /// Reader over 8-bit units
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_width(data, 8)
    }

    /// Reader over `width`-bit units; higher bits of each unit are ignored
    pub fn with_width(data: &'a [u8], width: u32) -> Self {
        debug_assert!((1..=8).contains(&width));
        Self {
            data,
            width,
            pos: 0,
            bits: 0,
            value: 0,
        }
    }

    /// True while unread units or buffered bits remain
    pub fn remaining(&self) -> bool {
        self.pos < self.data.len() || self.bits > 0
    }

    /// Read `count` bits (at most 32); missing bits past the end read as zero
    pub fn read(&mut self, count: u32) -> u32 {
        debug_assert!(count <= 32);
        while self.bits < count && self.pos < self.data.len() {
            let unit = self.data[self.pos] as u64 & mask(self.width);
            self.value |= unit << self.bits;
            self.bits += self.width;
            self.pos += 1;
        }

        let ret = (self.value & mask(count)) as u32;
        self.value >>= count;
        self.bits = self.bits.saturating_sub(count);
        ret
    }
}

/// Writes arbitrary bit counts as a sequence of `width`-bit units
pub struct BitWriter {
    bytes: Vec<u8>,
    width: u32,
    bits: u32,
    value: u64,
}

impl BitWriter {
    /// Writer producing 8-bit units
    pub fn new() -> Self {
        Self::with_width(8)
    }

    /// Writer producing `width`-bit units
    pub fn with_width(width: u32) -> Self {
        debug_assert!((1..=8).contains(&width));
        Self {
            bytes: Vec::new(),
            width,
            bits: 0,
            value: 0,
        }
    }

    /// Append the low `count` bits of `value` (at most 32)
    pub fn write(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        self.value |= (value as u64 & mask(count)) << self.bits;
        self.bits += count;
        while self.bits >= self.width {
            self.bytes.push((self.value & mask(self.width)) as u8);
            self.value >>= self.width;
            self.bits -= self.width;
        }
    }

    /// Flush a zero-padded partial unit and return all units
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.bytes.push((self.value & mask(self.width)) as u8);
        }
        self.bytes
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-chunk `from`-bit units into `to`-bit units, keeping a final partial unit
pub fn repack(data: &[u8], from: u32, to: u32) -> Vec<u8> {
    debug_assert!((1..=8).contains(&to));
    if to == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity((data.len() * from as usize).div_ceil(to as usize));
    let mut reader = BitReader::with_width(data, from);
    while reader.remaining() {
        out.push(reader.read(to) as u8);
    }
    out
}

#[inline]
fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lsb_first() {
        let data = [0b1010_1100, 0xFF];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read(2), 0b00);
        assert_eq!(reader.read(3), 0b011);
        assert_eq!(reader.read(5), 0b11101);
        assert_eq!(reader.read(6), 0b111111);
        assert!(!reader.remaining());
    }

    #[test]
    fn test_read_32_bits() {
        let data = 0x5E5B_9600u32.to_le_bytes();
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read(32), 0x5E5B_9600);
    }

    #[test]
    fn test_read_past_end_is_zero() {
        let data = [0x0F];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read(12), 0x0F);
        assert!(!reader.remaining());
        assert_eq!(reader.read(4), 0);
    }

    #[test]
    fn test_write_and_finish_pads() {
        let mut writer = BitWriter::new();
        writer.write(0b101, 3);
        writer.write(0x1FF, 9);
        assert_eq!(writer.finish(), vec![0b1111_1101, 0b0000_1111]);
    }

    #[test]
    fn test_write_masks_value() {
        let mut writer = BitWriter::new();
        writer.write(0xFFFF_FFFF, 4);
        assert_eq!(writer.finish(), vec![0x0F]);
    }

    #[test]
    fn test_six_bit_writer() {
        let mut writer = BitWriter::with_width(6);
        writer.write(0xABC, 12);
        writer.write(1, 1);
        assert_eq!(writer.finish(), vec![0x3C, 0x2A, 0x01]);
    }

    #[test]
    fn test_repack_six_to_eight() {
        assert_eq!(repack(&[0x3F, 0x01, 0x20, 0x15], 6, 8), vec![127, 0, 86]);
    }

    #[test]
    fn test_repack_eight_to_six_keeps_partial() {
        assert_eq!(repack(&[0xAB, 0xCD, 0xEF], 8, 6), vec![43, 54, 60, 59]);
        // 16 bits -> two full symbols plus a 4-bit tail
        assert_eq!(repack(&[0xFF, 0xFF], 8, 6).len(), 3);
    }

    #[test]
    fn test_repack_inverse_on_aligned_lengths() {
        let data: Vec<u8> = (0..24u8).map(|x| x.wrapping_mul(37)).collect();
        let six = repack(&data, 8, 6);
        assert_eq!(six.len(), 32);
        assert!(six.iter().all(|&x| x < 64));
        assert_eq!(repack(&six, 6, 8), data);
    }

    #[test]
    fn test_password_sized_repack() {
        // 30 symbols -> 23 bytes, the last holding 4 bits
        let symbols = [63u8; 30];
        let bytes = repack(&symbols, 6, 8);
        assert_eq!(bytes.len(), 23);
        assert_eq!(bytes[22], 0x0F);
        // and back: 31 units, the 31st being padding
        let back = repack(&bytes, 8, 6);
        assert_eq!(back.len(), 31);
        assert_eq!(&back[..30], &symbols[..]);
    }

    #[test]
    fn test_repack_zero_width_output_is_empty() {
        assert!(repack(&[1, 2, 3], 8, 0).is_empty());
        assert!(repack(&[], 6, 8).is_empty());
    }
}
