//! Human readable output for decoded passwords
//!
//! Nothing here changes what the codec accepts: unknown dungeons, pokemon
//! or a bad checksum only produce [`Warning`]s next to the decoded record.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::codec::Decoded;
use crate::record::{Mission, Tail};
use crate::romdata::{RomData, Table};

/// Non-fatal problem found in a decoded password
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("checksum mismatch: stored 0x{included:02X}, calculated 0x{computed:02X}")]
    ChecksumMismatch { included: u8, computed: u8 },

    #[error("{table} index {index} has no valid entry")]
    OutOfRangeReference { table: Table, index: usize },

    #[error("floor {floor} is outside 1..={floors}")]
    InvalidFloor { floor: u8, floors: u16 },
}

impl Warning {
    /// Short name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            Warning::ChecksumMismatch { .. } => "checksum",
            Warning::OutOfRangeReference { table, .. } => match table {
                Table::Dungeons => "dungeon",
                Table::Pokemon => "pokemon",
                Table::Genders => "gender",
                Table::Rewards => "reward",
            },
            Warning::InvalidFloor { .. } => "floor",
        }
    }
}

fn references(mission: &Mission) -> [(Table, usize); 4] {
    [
        (Table::Dungeons, mission.dungeon as usize),
        (Table::Pokemon, mission.pokemon as usize),
        (Table::Genders, mission.gender as usize),
        (Table::Rewards, mission.reward as usize),
    ]
}

fn floor_ok(mission: &Mission, floors: u16) -> bool {
    mission.floor != 0 && mission.floor as u16 <= floors
}

/// Collect all warnings for a decoded password
pub fn warnings(decoded: &Decoded, rom: &RomData) -> Vec<Warning> {
    let mut out = Vec::new();
    if !decoded.checksum_ok() {
        out.push(Warning::ChecksumMismatch {
            included: decoded.included_checksum,
            computed: decoded.computed_checksum,
        });
    }

    if let Tail::Mission(mission) = &decoded.record.tail {
        for (table, index) in references(mission) {
            if !rom.get_index(table, index).valid {
                out.push(Warning::OutOfRangeReference { table, index });
            }
        }

        let floors = rom.get_index(Table::Dungeons, mission.dungeon as usize).floors;
        if !floor_ok(mission, floors) {
            out.push(Warning::InvalidFloor {
                floor: mission.floor,
                floors,
            });
        }
    }
    out
}

/// Multi-line description of a decoded password, `(!)` marking bad values
pub struct InfoText<'a> {
    pub decoded: &'a Decoded,
    pub rom: &'a RomData,
}

impl fmt::Display for InfoText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (decoded, rom) = (self.decoded, self.rom);
        let record = &decoded.record;

        writeln!(
            f,
            "Checksum: 0x{:02X} (calculated: 0x{:02X})",
            decoded.included_checksum, decoded.computed_checksum
        )?;
        match DateTime::<Utc>::from_timestamp(record.timestamp as i64, 0) {
            Some(t) => writeln!(f, "Timestamp: {}", t.format("%Y-%m-%d %H:%M:%S"))?,
            None => writeln!(f, "Timestamp: {}", record.timestamp)?,
        }
        writeln!(f, "Revive: {}", matches!(record.tail, Tail::Revive { .. }))?;
        writeln!(f, "Unk1: 0x{:X}", record.unk1)?;
        writeln!(f, "Team Name: {}", rom.team_name(&record.team))?;

        if let Tail::Mission(mission) = &record.tail {
            let mark = |bad: bool| if bad { " (!)" } else { "" };

            let dungeon = rom.get_index(Table::Dungeons, mission.dungeon as usize);
            writeln!(
                f,
                "Dungeon ({}): {}{}",
                mission.dungeon,
                dungeon.name,
                mark(!dungeon.valid)
            )?;

            let prefix = if dungeon.ascending { "" } else { "B" };
            writeln!(
                f,
                "Floor: {}{}F{}",
                prefix,
                mission.floor,
                mark(!floor_ok(mission, dungeon.floors))
            )?;

            let pokemon = rom.get_index(Table::Pokemon, mission.pokemon as usize);
            writeln!(
                f,
                "Pokemon ({}): {}{}",
                mission.pokemon,
                pokemon.name,
                mark(!pokemon.valid)
            )?;

            let gender = rom.get_index(Table::Genders, mission.gender as usize);
            writeln!(f, "Gender: {}{}", gender.name, mark(!gender.valid))?;

            let reward = rom.get_index(Table::Rewards, mission.reward as usize);
            writeln!(f, "Reward: {}{}", reward.name, mark(!reward.valid))?;

            writeln!(f, "Unk2: 0x{:X}", mission.unk2)?;
        }

        writeln!(f, "Revive value: 0x{:08X}", decoded.revive_value)
    }
}

pub fn info_text(decoded: &Decoded, rom: &RomData) -> String {
    InfoText { decoded, rom }.to_string()
}
