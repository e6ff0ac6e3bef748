use std::path::PathBuf;

use clap::Args;
use replaydb_core::archive;

#[derive(Args)]
pub struct InspectArgs {
    /// Archive path to inspect
    pub archive: PathBuf,
}

/// Unlike `open_or_new`, this never falls back to an empty db on error —
/// a corrupt or version-mismatched archive should fail loudly here.
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let sections = archive::read_from(&args.archive)?;

    println!("card_count={}", sections.header.card_count);
    println!("replay_count={}", sections.header.replay_count);
    println!("replay_capacity={}", sections.header.replay_capacity);
    println!("modes={}", sections.modes.len());
    println!("sources={}", sections.sources.len());
    println!("results={}", sections.results.len());
    Ok(())
}
