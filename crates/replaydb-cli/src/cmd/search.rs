use clap::Args;
use replaydb_core::Filter;

use super::common::{self, DbArgs};
use super::print_record;

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Comma-separated card indexes for side 0 of the query
    #[arg(long, default_value = "")]
    pub cards0: String,

    /// Comma-separated card indexes for side 1 of the query
    #[arg(long, default_value = "")]
    pub cards1: String,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    #[arg(long, default_value_t = 20)]
    pub num_results: u32,

    #[arg(long, default_value_t = 0)]
    pub min_date: u64,

    /// Exclude ranked replays from the result
    #[arg(long)]
    pub exclude_ranked: bool,

    /// Exclude unranked replays from the result
    #[arg(long)]
    pub exclude_unranked: bool,

    #[arg(long)]
    pub only_wins: bool,

    /// Don't match a row in its normal orientation (card set 0 vs. the
    /// row's side0, card set 1 vs. the row's side1)
    #[arg(long)]
    pub exclude_from_player: bool,

    /// Don't match a row in its flipped orientation (card set 0 vs. the
    /// row's side1, card set 1 vs. the row's side0)
    #[arg(long)]
    pub exclude_from_opponent: bool,

    #[arg(long, default_value = "")]
    pub sources: String,

    #[arg(long, default_value = "")]
    pub modes: String,
}

pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let db = common::open_or_new(&args.db)?;
    let cards0 = common::parse_csv_u32(&args.cards0)?;
    let cards1 = common::parse_csv_u32(&args.cards1)?;

    let mut filter = Filter::new();
    filter.min_date = args.min_date;
    filter.ranked = !args.exclude_ranked;
    filter.unranked = !args.exclude_unranked;
    filter.only_wins = args.only_wins;
    filter.from_player = !args.exclude_from_player;
    filter.from_opponent = !args.exclude_from_opponent;
    filter.sources = common::parse_csv_string(&args.sources);
    filter.modes = common::parse_csv_string(&args.modes);

    match db.search(args.offset, args.num_results, &cards0, &cards1, &filter) {
        Some(result) => {
            for record in &result.replays {
                print_record(record);
            }
            eprintln!("search ok: returned={} valid_count={}", result.replays.len(), result.valid_count);
            Ok(())
        }
        None => anyhow::bail!("filter excludes both ranked/unranked or both from-player/from-opponent"),
    }
}
