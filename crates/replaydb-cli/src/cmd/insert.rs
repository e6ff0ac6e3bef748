use clap::Args;
use replaydb_core::NewReplay;

use super::common::{self, DbArgs};

#[derive(Args)]
pub struct InsertArgs {
    #[command(flatten)]
    pub db: DbArgs,

    /// Replay id; an existing id is overwritten in place
    #[arg(long)]
    pub id: String,

    /// Unix timestamp
    #[arg(long)]
    pub date: u64,

    #[arg(long)]
    pub ranked: bool,

    #[arg(long)]
    pub mode: String,

    #[arg(long)]
    pub source: String,

    #[arg(long)]
    pub result: String,

    /// Comma-separated card indexes for side 0
    #[arg(long, default_value = "")]
    pub cards0: String,

    /// Comma-separated card indexes for side 1
    #[arg(long, default_value = "")]
    pub cards1: String,

    #[arg(long, default_value = "")]
    pub result_desc: String,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub link: String,

    #[arg(long, default_value = "")]
    pub deck0: String,

    #[arg(long, default_value = "")]
    pub deck1: String,

    #[arg(long, default_value = "")]
    pub region: String,

    #[arg(long, default_value = "")]
    pub author_link: String,

    #[arg(long, default_value = "")]
    pub author_name: String,
}

pub fn run(args: InsertArgs) -> anyhow::Result<()> {
    let mut db = common::open_or_new(&args.db)?;
    let cards0 = common::parse_csv_u32(&args.cards0)?;
    let cards1 = common::parse_csv_u32(&args.cards1)?;

    db.set_replay(NewReplay {
        id: &args.id,
        date: args.date,
        ranked: args.ranked,
        mode: &args.mode,
        source: &args.source,
        result: &args.result,
        cards0: &cards0,
        cards1: &cards1,
        result_desc: &args.result_desc,
        title: &args.title,
        link: &args.link,
        deck0: &args.deck0,
        deck1: &args.deck1,
        region: &args.region,
        author_link: &args.author_link,
        author_name: &args.author_name,
    })?;

    common::save(&db, &args.db.archive)?;
    eprintln!("insert ok: id={} replay_count={}", args.id, db.get_replay_count());
    Ok(())
}
