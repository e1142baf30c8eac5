use crate::prelude::*;
use clap::Parser;

mod article;
mod category;
mod client;
mod error;
mod prelude;
mod serve;
mod services;
mod subscribe;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Simplified Ninja content client and site server"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Content API base URL
    #[clap(
        long,
        env = "NINJA_API_URL",
        global = true,
        default_value = "https://cms.simplified-ninja.com/api"
    )]
    pub api_url: String,

    /// Media server base URL (images live on a different host than the API)
    #[clap(
        long,
        env = "NINJA_MEDIA_URL",
        global = true,
        default_value = "https://cms.simplified-ninja.com"
    )]
    pub media_url: String,

    /// Public site base URL, used for sitemap and robots links
    #[clap(
        long,
        env = "NINJA_SITE_URL",
        global = true,
        default_value = "https://simplified-ninja.com"
    )]
    pub site_url: String,

    /// Whether to display additional information.
    #[clap(long, env = "NINJA_VERBOSE", global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Article (blog post) operations
    Article(crate::article::App),

    /// Category operations
    Category(crate::category::App),

    /// Subscribe an email to the newsletter
    Subscribe(crate::subscribe::SubscribeOptions),

    /// Serve the site (pages, robots.txt, sitemap.xml)
    Serve(crate::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Article(sub_app) => crate::article::run(sub_app, app.global).await,
        SubCommands::Category(sub_app) => crate::category::run(sub_app, app.global).await,
        SubCommands::Subscribe(options) => crate::subscribe::run(options, app.global).await,
        SubCommands::Serve(options) => crate::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
