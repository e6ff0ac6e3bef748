use clap::Args;

use super::common::{self, DbArgs};

#[derive(Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[arg(long)]
    pub id: String,
}

pub fn run(args: RemoveArgs) -> anyhow::Result<()> {
    let mut db = common::open_or_new(&args.db)?;
    let removed = db.remove_replay(&args.id);
    common::save(&db, &args.db.archive)?;

    if removed {
        eprintln!("remove ok: id={} replay_count={}", args.id, db.get_replay_count());
    } else {
        eprintln!("remove no-op: id={} not found", args.id);
    }
    Ok(())
}
