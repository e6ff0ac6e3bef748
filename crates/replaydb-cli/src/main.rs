use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "replaydb")]
#[command(about = "Card-replay index CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Insert or overwrite a replay
    Insert(cmd::insert::InsertArgs),

    /// Remove a replay by id
    Remove(cmd::remove::RemoveArgs),

    /// Fetch a single replay by id
    Get(cmd::get::GetArgs),

    /// List the most recent replays
    List(cmd::list::ListArgs),

    /// Card-overlap search
    Search(cmd::search::SearchArgs),

    /// Inspect an archive file's header without loading it into a db
    Inspect(cmd::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Insert(args) => cmd::insert::run(args),
        Commands::Remove(args) => cmd::remove::run(args),
        Commands::Get(args) => cmd::get::run(args),
        Commands::List(args) => cmd::list::run(args),
        Commands::Search(args) => cmd::search::run(args),
        Commands::Inspect(args) => cmd::inspect::run(args),
    }
}
