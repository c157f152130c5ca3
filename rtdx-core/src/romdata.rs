/// Lookup tables dumped from the game: display charmaps, CRC table and names
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::checksum::CrcTable;
use crate::codec::{CHARMAP_LEN, Codec};
use crate::record::TEAM_LEN;

/// Number of glyphs in the team name charmap
pub const TEXT_CHARMAP_LEN: usize = 402;

/// Shown for team characters past the end of the text charmap
pub const PLACEHOLDER_GLYPH: char = '★';

/// One row of a name table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "const", default)]
    pub const_name: String,
    pub valid: bool,
    /// Dungeons only: floors count upwards
    #[serde(default)]
    pub ascending: bool,
    /// Dungeons only: number of floors
    #[serde(default)]
    pub floors: u16,
}

impl Entry {
    fn fixed(name: &str, valid: bool) -> Self {
        Self {
            name: name.to_string(),
            const_name: String::new(),
            valid,
            ascending: false,
            floors: 0,
        }
    }
}

static MISSING: Entry = Entry {
    name: String::new(),
    const_name: String::new(),
    valid: false,
    ascending: false,
    floors: 0,
};

/// Name tables available through [`RomData::get_index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Dungeons,
    Pokemon,
    Genders,
    Rewards,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Dungeons, Table::Pokemon, Table::Genders, Table::Rewards];

    pub fn name(self) -> &'static str {
        match self {
            Table::Dungeons => "dungeons",
            Table::Pokemon => "pokemon",
            Table::Genders => "genders",
            Table::Rewards => "rewards",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .with_context(|| format!("unknown table: {}", s))
    }
}

/// On-disk layout of the table file
#[derive(Deserialize)]
struct RawRomData {
    charmap: String,
    charmap_text: String,
    #[serde(default)]
    crc32table: Vec<u32>,
    #[serde(default)]
    dungeons: Vec<Entry>,
    #[serde(default)]
    pokemon: Vec<Entry>,
    #[serde(default = "default_genders")]
    genders: Vec<Entry>,
    #[serde(default = "default_rewards")]
    rewards: Vec<Entry>,
}

fn default_genders() -> Vec<Entry> {
    vec![
        Entry::fixed("Male", true),
        Entry::fixed("Female", true),
        Entry::fixed("Unknown", true),
    ]
}

fn default_rewards() -> Vec<Entry> {
    vec![
        Entry::fixed("", false),
        Entry::fixed("Regular", true),
        Entry::fixed("Special", true),
        Entry::fixed("Deluxe", true),
    ]
}

/// Tables loaded once and shared read-only
#[derive(Debug, Clone)]
pub struct RomData {
    charmap: [char; CHARMAP_LEN],
    charmap_text: Vec<char>,
    crc: CrcTable,
    dungeons: Vec<Entry>,
    pokemon: Vec<Entry>,
    genders: Vec<Entry>,
    rewards: Vec<Entry>,
}

impl RomData {
    /// Load the JSON table file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read table file: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse table file: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawRomData = serde_json::from_str(text).context("Invalid table JSON")?;

        let glyphs: Vec<char> = raw.charmap.chars().collect();
        let charmap: [char; CHARMAP_LEN] = match glyphs.try_into() {
            Ok(charmap) => charmap,
            Err(glyphs) => bail!(
                "charmap must have {} glyphs, got {}",
                CHARMAP_LEN,
                glyphs.len()
            ),
        };

        let charmap_text: Vec<char> = raw.charmap_text.chars().collect();
        if charmap_text.len() != TEXT_CHARMAP_LEN {
            bail!(
                "charmap_text must have {} glyphs, got {}",
                TEXT_CHARMAP_LEN,
                charmap_text.len()
            );
        }

        let crc = if raw.crc32table.is_empty() {
            log::debug!("no crc32table in table file, using the standard table");
            CrcTable::default()
        } else {
            let entries: [u32; 256] = raw.crc32table.as_slice().try_into().with_context(|| {
                format!("crc32table must have 256 entries, got {}", raw.crc32table.len())
            })?;
            CrcTable::from_entries(entries)
        };

        Ok(Self {
            charmap,
            charmap_text,
            crc,
            dungeons: raw.dungeons,
            pokemon: raw.pokemon,
            genders: raw.genders,
            rewards: raw.rewards,
        })
    }

    /// Codec using this file's symbol charmap and CRC table
    pub fn codec(&self) -> Codec {
        Codec::new(self.charmap, self.crc.clone())
    }

    pub fn table(&self, table: Table) -> &[Entry] {
        match table {
            Table::Dungeons => &self.dungeons,
            Table::Pokemon => &self.pokemon,
            Table::Genders => &self.genders,
            Table::Rewards => &self.rewards,
        }
    }

    /// Entry at `index`, or an invalid blank entry when out of range
    pub fn get_index(&self, table: Table, index: usize) -> &Entry {
        self.table(table).get(index).unwrap_or(&MISSING)
    }

    /// Render team codes up to the first zero
    pub fn team_name(&self, team: &[u16]) -> String {
        team.iter()
            .take_while(|&&c| c != 0)
            .map(|&c| {
                self.charmap_text
                    .get(c as usize)
                    .copied()
                    .unwrap_or(PLACEHOLDER_GLYPH)
            })
            .collect()
    }

    /// Team codes spelling `name`, zero padded
    pub fn team_codes(&self, name: &str) -> Result<[u16; TEAM_LEN]> {
        let mut team = [0u16; TEAM_LEN];
        let mut len = 0;
        for c in name.chars() {
            if len == TEAM_LEN {
                bail!("team name longer than {} characters: {:?}", TEAM_LEN, name);
            }
            let code = self
                .charmap_text
                .iter()
                .skip(1)
                .position(|&g| g == c)
                .with_context(|| format!("character {:?} has no team code", c))?;
            team[len] = code as u16 + 1;
            len += 1;
        }
        Ok(team)
    }
}
