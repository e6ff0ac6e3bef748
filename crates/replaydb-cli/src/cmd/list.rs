use clap::Args;
use replaydb_core::Filter;

use super::common::{self, DbArgs};
use super::print_record;

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub db: DbArgs,

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

    #[arg(long, default_value = "")]
    pub sources: String,

    #[arg(long, default_value = "")]
    pub modes: String,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let db = common::open_or_new(&args.db)?;

    let mut filter = Filter::new();
    filter.min_date = args.min_date;
    filter.ranked = !args.exclude_ranked;
    filter.unranked = !args.exclude_unranked;
    filter.sources = common::parse_csv_string(&args.sources);
    filter.modes = common::parse_csv_string(&args.modes);

    match db.new_games(args.offset, args.num_results, &filter) {
        Some(result) => {
            for record in &result.replays {
                print_record(record);
            }
            eprintln!("list ok: returned={} valid_count={}", result.replays.len(), result.valid_count);
            Ok(())
        }
        None => anyhow::bail!("filter excludes both ranked and unranked replays"),
    }
}
