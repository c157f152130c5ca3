//! Payload checksum and the table-driven CRC-32 behind revive values

/// Calculate the 8-bit checksum of a payload
///
/// The first byte and then little-endian byte pairs are summed, a trailing
/// byte is added when the length is even, and the sum is folded down to
/// 8 bits and complemented.
pub fn calc_checksum(payload: &[u8]) -> u8 {
    let Some(&first) = payload.first() else {
        return 0xFF;
    };

    let len = payload.len();
    let mut calc = first as u32;
    for x in (1..(len - 1) / 2 * 2).step_by(2) {
        calc += payload[x] as u32 | (payload[x + 1] as u32) << 8;
    }
    if len % 2 == 0 {
        calc += payload[len - 1] as u32;
    }

    calc = ((calc >> 16) & 0xFFFF) + (calc & 0xFFFF);
    calc += calc >> 16;
    calc = ((calc >> 8) & 0xFF) + (calc & 0xFF);
    calc += calc >> 8;
    (calc & 0xFF) as u8 ^ 0xFF
}

/// 256-entry lookup table for a reflected CRC-32
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrcTable([u32; 256]);

impl CrcTable {
    /// The standard table for the reflected polynomial `0xEDB88320`
    pub const fn ieee() -> Self {
        let mut table = [0u32; 256];
        let mut n = 0;
        while n < 256 {
            let mut c = n as u32;
            let mut k = 0;
            while k < 8 {
                c = if c & 1 != 0 { (c >> 1) ^ 0xEDB8_8320 } else { c >> 1 };
                k += 1;
            }
            table[n] = c;
            n += 1;
        }
        Self(table)
    }

    pub fn from_entries(entries: [u32; 256]) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[u32; 256] {
        &self.0
    }

    /// CRC-32 of `bytes`: initial value and final xor are `0xFFFFFFFF`
    pub fn checksum(&self, bytes: &[u8]) -> u32 {
        let mut sum = 0xFFFF_FFFFu32;
        for &b in bytes {
            sum = self.0[((sum ^ b as u32) & 0xFF) as usize] ^ (sum >> 8);
        }
        sum ^ 0xFFFF_FFFF
    }
}

impl Default for CrcTable {
    fn default() -> Self {
        IEEE_TABLE.clone()
    }
}

/// Built-in table used when no table file supplies one
pub static IEEE_TABLE: CrcTable = CrcTable::ieee();
