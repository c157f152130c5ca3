use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rtdx_core::{Codec, Decoded, Record, RomData, Warning, info_text, warnings};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rtdx-cli")]
#[command(about = "Rescue Team DX rescue password (de|en)coder – CLI tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the table file dumped from the game
    #[arg(long, global = true, env = "RTDX_DATA", default_value = "data.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a password and show its contents
    Decode {
        /// Password symbols, whitespace is ignored
        #[arg(required = true, num_args = 1..)]
        password: Vec<String>,

        /// Print the decoded record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a JSON record into a password
    Encode {
        /// JSON record, or path to a file containing one
        record: String,

        /// Use this checksum byte instead of computing it (decimal or 0x-hex)
        #[arg(long, value_parser = parse_byte, conflicts_with = "keep_checksum")]
        checksum: Option<u8>,

        /// Reuse `included_checksum` from the record JSON, as written by `decode --json`
        #[arg(short, long)]
        keep_checksum: bool,

        /// Show the contents of the resulting password
        #[arg(short, long)]
        info: bool,
    },

    /// Build the revive password answering a rescue request
    ///
    /// Any password that decodes without warnings is accepted. A revive
    /// password as input gives a new one carrying its stored revive value.
    Revive {
        /// Password of the rescue request
        #[arg(required = true, num_args = 1..)]
        password: Vec<String>,

        /// Team name written into the revive password
        #[arg(long, default_value = "Passwd tool")]
        team: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let rom = RomData::load(&cli.data)?;
    log::debug!("loaded table file {}", cli.data.display());
    let codec = rom.codec();

    match cli.command {
        Commands::Decode { password, json } => {
            cmd_decode(&rom, &codec, &password.join(" "), json)?;
        }
        Commands::Encode {
            record,
            checksum,
            keep_checksum,
            info,
        } => {
            cmd_encode(&rom, &codec, &record, checksum, keep_checksum, info)?;
        }
        Commands::Revive { password, team } => {
            cmd_revive(&rom, &codec, &password.join(" "), &team)?;
        }
    }

    Ok(())
}

fn parse_byte(s: &str) -> Result<u8> {
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    value.with_context(|| format!("not a byte value: {}", s))
}

/// Warnings worth printing; checksum mismatches are already logged by the decoder
fn shown_warnings(found: &[Warning]) -> impl Iterator<Item = &Warning> {
    found
        .iter()
        .filter(|w| !matches!(w, Warning::ChecksumMismatch { .. }))
}

fn report_warnings(rom: &RomData, decoded: &Decoded) -> usize {
    let found = warnings(decoded, rom);
    for w in shown_warnings(&found) {
        eprintln!("[warn] {}: {}", w.field(), w);
    }
    found.len()
}

fn cmd_decode(rom: &RomData, codec: &Codec, password: &str, json: bool) -> Result<()> {
    let decoded = codec.decode(password).context("Failed to decode password")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        print!("{}", info_text(&decoded, rom));
    }

    report_warnings(rom, &decoded);
    Ok(())
}

/// Record JSON given inline or as a file path
///
/// Also returns `included_checksum` when the JSON carries one.
fn read_record(arg: &str) -> Result<(Record, Option<u8>)> {
    let path = Path::new(arg);
    let text = if path.is_file() {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read record file: {}", path.display()))?
    } else {
        arg.to_string()
    };

    let value: serde_json::Value = serde_json::from_str(&text).context("Invalid record JSON")?;
    let included = match value.get("included_checksum") {
        Some(v) => Some(
            v.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .with_context(|| format!("included_checksum is not a byte: {}", v))?,
        ),
        None => None,
    };
    let record = serde_json::from_value(value).context("Invalid record JSON")?;
    Ok((record, included))
}

fn cmd_encode(
    rom: &RomData,
    codec: &Codec,
    record_arg: &str,
    checksum: Option<u8>,
    keep_checksum: bool,
    info: bool,
) -> Result<()> {
    let (record, included) = read_record(record_arg)?;
    let checksum = if keep_checksum {
        Some(included.context("record JSON has no included_checksum to keep")?)
    } else {
        checksum
    };
    let password = codec
        .encode(&record, checksum)
        .context("Failed to encode record")?;

    println!("{}", password);

    // decode again to confirm what the game will see
    let decoded = codec.decode(&password)?;
    if info {
        print!("{}", info_text(&decoded, rom));
    }
    if decoded.record != record {
        bail!("re-decoded record differs from input");
    }

    println!(
        "[ok] checksum stored=0x{:02x}  calc=0x{:02x}",
        decoded.included_checksum, decoded.computed_checksum
    );
    Ok(())
}

/// Revive password for `decoded`, refused while it raises warnings
fn revive_password(rom: &RomData, codec: &Codec, decoded: &Decoded, team: &str) -> Result<String> {
    let count = report_warnings(rom, decoded);
    if count > 0 {
        bail!("{} warning(s), not building a revive password", count);
    }

    let revive = Record::revive(
        decoded.record.timestamp,
        rom.team_codes(team)?,
        decoded.revive_value,
    );
    Ok(codec.encode(&revive, None)?)
}

fn cmd_revive(rom: &RomData, codec: &Codec, password: &str, team: &str) -> Result<()> {
    let decoded = codec.decode(password).context("Failed to decode password")?;
    print!("{}", info_text(&decoded, rom));

    let output = revive_password(rom, codec, &decoded, team)?;
    println!("[ok] revive password:");
    println!("{}", output);
    Ok(())
}
