use std::path::{Path, PathBuf};

use clap::Args;
use replaydb_core::ReplayDb;

#[derive(Args)]
pub struct DbArgs {
    /// Path to the archive file
    #[arg(long)]
    pub archive: PathBuf,

    /// Game identifier stored alongside the index
    #[arg(long, default_value = "default")]
    pub game: String,

    /// Number of distinct cards the game defines
    #[arg(long)]
    pub card_count: u32,
}

/// Loads the archive at `args.archive` if it exists, otherwise starts a
/// fresh, empty database for that card count.
pub fn open_or_new(args: &DbArgs) -> anyhow::Result<ReplayDb> {
    if args.archive.exists() {
        Ok(ReplayDb::load(&args.game, args.card_count, &args.archive)?)
    } else {
        Ok(ReplayDb::new(&args.game, args.card_count))
    }
}

pub fn parse_csv_u32(raw: &str) -> anyhow::Result<Vec<u32>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|s| s.trim().parse::<u32>().map_err(anyhow::Error::from))
        .collect()
}

pub fn parse_csv_string(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

pub fn save(db: &ReplayDb, path: &Path) -> anyhow::Result<()> {
    db.save(path)?;
    Ok(())
}
