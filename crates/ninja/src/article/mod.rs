use crate::prelude::*;

pub mod get;
pub mod list;

#[derive(Debug, clap::Parser)]
#[command(name = "article")]
#[command(about = "Article (blog post) operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List articles with search, category, and sort filters
    #[clap(name = "list")]
    List(list::ListOptions),

    /// Read a single article by slug
    #[clap(name = "get")]
    Get(get::GetOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => list::run(options, global).await,
        Commands::Get(options) => get::run(options, global).await,
    }
}
