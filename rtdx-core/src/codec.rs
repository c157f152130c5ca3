/// Handles the password pipeline: symbols, shuffle, bit packing, keystream and checksum
use log::{debug, warn};
use serde::Serialize;

use crate::bitstream::{BitReader, repack};
use crate::checksum::{CrcTable, calc_checksum};
use crate::error::PasswordError;
use crate::keystream::{decrypt_bytes, encrypt_bytes};
use crate::record::{REVIVE_MASK, Record, Tail};
use crate::shuffle::{apply_shuffle, unapply_shuffle};
use crate::symbols::{Code, PASSWORD_SYMBOLS, parse, render};

/// Number of glyphs in the symbol charmap
pub const CHARMAP_LEN: usize = 64;

/// Result of decoding a password
///
/// Serializes as the record's fields next to the checksums, so the JSON is
/// also a valid [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoded {
    pub included_checksum: u8,
    pub computed_checksum: u8,
    #[serde(flatten)]
    pub record: Record,
    /// Stored value for revive records, CRC-derived for missions
    pub revive_value: u32,
}

impl Decoded {
    pub fn checksum_ok(&self) -> bool {
        self.included_checksum == self.computed_checksum
    }
}

/// Password codec bound to the symbol charmap and CRC table of the game
#[derive(Debug, Clone)]
pub struct Codec {
    charmap: [char; CHARMAP_LEN],
    crc: CrcTable,
}

impl Codec {
    pub fn new(charmap: [char; CHARMAP_LEN], crc: CrcTable) -> Self {
        Self { charmap, crc }
    }

    /// Parse and decode password text
    pub fn decode(&self, password: &str) -> Result<Decoded, PasswordError> {
        let code = parse(password)?;
        Ok(self.decode_code(&code))
    }

    /// Decode symbol codes; a checksum mismatch is logged, not rejected
    pub fn decode_code(&self, code: &Code) -> Decoded {
        let bytes = unpack_code(code);
        let included_checksum = bytes[0];
        let payload = &bytes[1..];
        let computed_checksum = calc_checksum(payload);

        if included_checksum != computed_checksum {
            warn!(
                "checksum mismatch: stored=0x{:02x} calc=0x{:02x}",
                included_checksum, computed_checksum
            );
        }

        let record = Record::read(&mut BitReader::new(payload));
        let revive_value = match &record.tail {
            Tail::Mission(_) => self.revive_value(code),
            Tail::Revive { revive } => *revive,
        };

        Decoded {
            included_checksum,
            computed_checksum,
            record,
            revive_value,
        }
    }

    /// CRC of the password as the game displays it, masked to 30 bits
    ///
    /// Takes the symbols in password order, before the shuffle.
    pub fn revive_value(&self, code: &Code) -> u32 {
        let text: String = code
            .iter()
            .map(|&c| self.charmap[c as usize % CHARMAP_LEN])
            .collect();
        self.crc.checksum(text.as_bytes()) & REVIVE_MASK
    }

    /// Encode a record into password text
    ///
    /// `checksum` overrides the computed checksum byte.
    pub fn encode(&self, record: &Record, checksum: Option<u8>) -> Result<String, PasswordError> {
        Ok(render(&encode_code(record, checksum)?))
    }
}

/// Shuffle, unpack and deobfuscate symbol codes into checksum + payload bytes
pub fn unpack_code(code: &Code) -> Vec<u8> {
    let shuffled = apply_shuffle(code);
    let packed = repack(&shuffled, 6, 8);
    debug!("packed bytes: {:02x?}", packed);
    decrypt_bytes(&packed)
}

/// Obfuscate, pack and unshuffle checksum + payload bytes into symbol codes
pub fn pack_bytes(bytes: &[u8]) -> Code {
    let packed = repack(&encrypt_bytes(bytes), 8, 6);
    debug!("packed symbols: {:?}", packed);

    // the trailing partial symbol is padding only
    let mut shuffled = [0u8; PASSWORD_SYMBOLS];
    for (dst, &src) in shuffled.iter_mut().zip(&packed) {
        *dst = src;
    }
    unapply_shuffle(&shuffled)
}

/// Encode a record into symbol codes
///
/// Mission records carry no revive value; it is derived from the
/// resulting password instead.
pub fn encode_code(record: &Record, checksum: Option<u8>) -> Result<Code, PasswordError> {
    let payload = record.to_bytes()?;
    let checksum = checksum.unwrap_or_else(|| calc_checksum(&payload));

    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(checksum);
    bytes.extend_from_slice(&payload);
    Ok(pack_bytes(&bytes))
}
