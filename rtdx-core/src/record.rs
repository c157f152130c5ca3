//! Rescue record and its fixed bit layout
//!
//! Layout after the checksum byte, LSB first:
//!
//! ```text
//! timestamp:32 kind:1 unk1:1 team:12x9 tail:30
//! mission tail: dungeon:7 floor:7 pokemon:11 gender:2 reward:2 unk2:1
//! revive tail:  revive:30
//! ```

use serde::{Deserialize, Serialize};

use crate::bitstream::{BitReader, BitWriter};
use crate::error::PasswordError;

/// Number of team name characters
pub const TEAM_LEN: usize = 12;

/// Revive values are 30 bits wide
pub const REVIVE_MASK: u32 = 0x3FFF_FFFF;

/// Total bits of the record layout, identical for both tails
pub const RECORD_BITS: u32 = 32 + 1 + 1 + TEAM_LEN as u32 * TEAM_CHAR_BITS + TAIL_BITS;

const TEAM_CHAR_BITS: u32 = 9;
const TAIL_BITS: u32 = 30;

const DUNGEON_BITS: u32 = 7;
const FLOOR_BITS: u32 = 7;
const POKEMON_BITS: u32 = 11;
const GENDER_BITS: u32 = 2;
const REWARD_BITS: u32 = 2;
const FLAG_BITS: u32 = 1;

/// Which tail layout a record uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Mission = 0,
    Revive = 1,
}

/// Rescue request details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub dungeon: u8,
    pub floor: u8,
    pub pokemon: u16,
    pub gender: u8,
    pub reward: u8,
    #[serde(default)]
    pub unk2: u8,
}

/// Kind-specific end of the record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Tail {
    Mission(Mission),
    Revive { revive: u32 },
}

impl Tail {
    pub fn kind(&self) -> Kind {
        match self {
            Tail::Mission(_) => Kind::Mission,
            Tail::Revive { .. } => Kind::Revive,
        }
    }
}

/// Decoded password payload without its checksum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Seconds since the Unix epoch
    pub timestamp: u32,
    #[serde(default)]
    pub unk1: u8,
    /// Indices into the text charmap, zero terminated
    pub team: [u16; TEAM_LEN],
    #[serde(flatten)]
    pub tail: Tail,
}

impl Record {
    /// Revive record answering a rescue request
    pub fn revive(timestamp: u32, team: [u16; TEAM_LEN], revive: u32) -> Self {
        Self {
            timestamp,
            unk1: 0,
            team,
            tail: Tail::Revive { revive },
        }
    }

    pub fn kind(&self) -> Kind {
        self.tail.kind()
    }

    /// Check every field against its bit width
    pub fn validate(&self) -> Result<(), PasswordError> {
        check("unk1", self.unk1 as u32, FLAG_BITS)?;
        for &c in &self.team {
            check("team", c as u32, TEAM_CHAR_BITS)?;
        }
        match &self.tail {
            Tail::Mission(m) => {
                check("dungeon", m.dungeon as u32, DUNGEON_BITS)?;
                check("floor", m.floor as u32, FLOOR_BITS)?;
                check("pokemon", m.pokemon as u32, POKEMON_BITS)?;
                check("gender", m.gender as u32, GENDER_BITS)?;
                check("reward", m.reward as u32, REWARD_BITS)?;
                check("unk2", m.unk2 as u32, FLAG_BITS)?;
            }
            Tail::Revive { revive } => check("revive", *revive, TAIL_BITS)?,
        }
        Ok(())
    }

    /// Serialize the fields; call [`Record::validate`] first
    pub fn write(&self, writer: &mut BitWriter) {
        writer.write(self.timestamp, 32);
        writer.write(self.kind() as u32, 1);
        writer.write(self.unk1 as u32, FLAG_BITS);
        for &c in &self.team {
            writer.write(c as u32, TEAM_CHAR_BITS);
        }
        match &self.tail {
            Tail::Mission(m) => {
                writer.write(m.dungeon as u32, DUNGEON_BITS);
                writer.write(m.floor as u32, FLOOR_BITS);
                writer.write(m.pokemon as u32, POKEMON_BITS);
                writer.write(m.gender as u32, GENDER_BITS);
                writer.write(m.reward as u32, REWARD_BITS);
                writer.write(m.unk2 as u32, FLAG_BITS);
            }
            Tail::Revive { revive } => writer.write(*revive, TAIL_BITS),
        }
    }

    pub fn read(reader: &mut BitReader<'_>) -> Self {
        let timestamp = reader.read(32);
        let kind = reader.read(1);
        let unk1 = reader.read(FLAG_BITS) as u8;

        let mut team = [0u16; TEAM_LEN];
        for c in team.iter_mut() {
            *c = reader.read(TEAM_CHAR_BITS) as u16;
        }

        let tail = if kind == Kind::Mission as u32 {
            Tail::Mission(Mission {
                dungeon: reader.read(DUNGEON_BITS) as u8,
                floor: reader.read(FLOOR_BITS) as u8,
                pokemon: reader.read(POKEMON_BITS) as u16,
                gender: reader.read(GENDER_BITS) as u8,
                reward: reader.read(REWARD_BITS) as u8,
                unk2: reader.read(FLAG_BITS) as u8,
            })
        } else {
            Tail::Revive {
                revive: reader.read(TAIL_BITS),
            }
        };

        Self {
            timestamp,
            unk1,
            team,
            tail,
        }
    }

    /// Serialized payload bytes (without checksum)
    pub fn to_bytes(&self) -> Result<Vec<u8>, PasswordError> {
        self.validate()?;
        let mut writer = BitWriter::new();
        self.write(&mut writer);
        Ok(writer.finish())
    }
}

fn check(field: &'static str, value: u32, bits: u32) -> Result<(), PasswordError> {
    if bits < 32 && value >> bits != 0 {
        return Err(PasswordError::FieldRangeViolation { field, value, bits });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mission() -> Record {
        Record {
            timestamp: 1584316800,
            unk1: 1,
            team: [51, 70, 84, 68, 86, 70, 83, 84, 0, 0, 0, 0],
            tail: Tail::Mission(Mission {
                dungeon: 2,
                floor: 7,
                pokemon: 4,
                gender: 1,
                reward: 2,
                unk2: 0,
            }),
        }
    }

    #[test]
    fn test_layout_width() {
        assert_eq!(RECORD_BITS, 172);
        assert_eq!(
            DUNGEON_BITS + FLOOR_BITS + POKEMON_BITS + GENDER_BITS + REWARD_BITS + FLAG_BITS,
            TAIL_BITS
        );
    }

    #[test]
    fn test_both_kinds_serialize_to_same_length() {
        let m = mission().to_bytes().unwrap();
        let r = Record::revive(0, [0; TEAM_LEN], REVIVE_MASK).to_bytes().unwrap();
        assert_eq!(m.len(), 22);
        assert_eq!(r.len(), 22);
    }

    #[test]
    fn test_write_read_mission() {
        let record = mission();
        let bytes = record.to_bytes().unwrap();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(Record::read(&mut reader), record);
    }

    #[test]
    fn test_timestamp_is_first() {
        let record = Record::revive(0x5E5B_9600, [0; TEAM_LEN], 0);
        let bytes = record.to_bytes().unwrap();
        assert_eq!(&bytes[..4], &0x5E5B_9600u32.to_le_bytes());
        // kind bit follows the timestamp
        assert_eq!(bytes[4] & 1, 1);
    }

    #[test]
    fn test_validate_rejects_wide_fields() {
        let mut record = mission();
        if let Tail::Mission(m) = &mut record.tail {
            m.dungeon = 128;
        }
        assert_eq!(
            record.to_bytes(),
            Err(PasswordError::FieldRangeViolation {
                field: "dungeon",
                value: 128,
                bits: 7
            })
        );

        let mut record = mission();
        record.team[3] = 512;
        assert!(matches!(
            record.validate(),
            Err(PasswordError::FieldRangeViolation { field: "team", .. })
        ));

        let record = Record::revive(0, [0; TEAM_LEN], REVIVE_MASK + 1);
        assert!(matches!(
            record.validate(),
            Err(PasswordError::FieldRangeViolation { field: "revive", bits: 30, .. })
        ));

        let mut record = mission();
        record.unk1 = 2;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "timestamp": 1583020800,
            "team": [49, 66, 84, 84, 88, 69, 1, 85, 80, 80, 77, 0],
            "kind": "revive",
            "revive": 305419896
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind(), Kind::Revive);
        assert_eq!(record.unk1, 0);
        assert_eq!(record.tail, Tail::Revive { revive: 0x1234_5678 });

        let text = serde_json::to_string(&mission()).unwrap();
        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, mission());
        assert!(text.contains(r#""kind":"mission""#));
    }
}
