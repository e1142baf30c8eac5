use crate::prelude::*;

pub mod get;
pub mod list;

#[derive(Debug, clap::Parser)]
#[command(name = "category")]
#[command(about = "Category operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List all categories
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Read a single category by slug, with its articles
    #[clap(name = "get")]
    Get(get::GetOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Get(options) => get::run(options, global).await,
    }
}
