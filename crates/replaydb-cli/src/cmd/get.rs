use clap::Args;

use super::common::{self, DbArgs};
use super::print_record;

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub db: DbArgs,

    #[arg(long)]
    pub id: String,
}

pub fn run(args: GetArgs) -> anyhow::Result<()> {
    let db = common::open_or_new(&args.db)?;
    match db.get_replay_by_id(&args.id) {
        Some(record) => {
            print_record(&record);
            Ok(())
        }
        None => anyhow::bail!("no replay with id {}", args.id),
    }
}
