//! core functionality for decoding and encoding
//! rescue passwords from "Mystery Dungeon: Rescue Team DX"
//!
//! # Modules
//!
//! - `symbols`: password text <-> symbol codes
//! - `shuffle`: fixed symbol permutation
//! - `bitstream`: LSB-first bit reader/writer and repacking
//! - `keystream`: subtractive generator and payload obfuscation
//! - `checksum`: payload checksum and CRC-32
//! - `record`: record fields and bit layout
//! - `codec`: the full decode/encode pipeline
//! - `romdata`: lookup tables dumped from the game
//! - `report`: warnings and info text

pub mod bitstream;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod keystream;
pub mod record;
pub mod report;
pub mod romdata;
pub mod shuffle;
pub mod symbols;

// Re-export commonly used items
pub use checksum::{CrcTable, calc_checksum};
pub use codec::{Codec, Decoded, encode_code, pack_bytes, unpack_code};
pub use error::PasswordError;
pub use record::{Kind, Mission, Record, Tail};
pub use report::{Warning, info_text, warnings};
pub use romdata::{Entry, RomData, Table};
pub use symbols::{Code, parse, render};
