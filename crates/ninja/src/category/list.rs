use ninja_core::category::CategoryView;

use crate::client::{build_client, FetchOptions};
use crate::prelude::{new_table, println, *};
use crate::services::{self, SiteConfig, DEFAULT_DEPTH};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Relational expansion depth for the API query
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u8,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let config = SiteConfig::from(&global);

    if global.verbose {
        println!("Fetching categories from {}...", config.api_url);
    }

    let client = build_client()?;
    let raw = services::get_categories(&client, &config, options.depth, FetchOptions::default()).await;
    let views = services::category_views_from_raw(&raw, &config);

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&views)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        print!("{}", format_category_table(&views));
    }

    Ok(())
}

fn format_category_table(views: &[CategoryView]) -> String {
    if views.is_empty() {
        return "No categories available.\n".to_string();
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "TITLE", "SLUG", "POSTS", "NEW", "FEATURED", "DESCRIPTION"
    ]);

    for view in views {
        table.add_row(prettytable::row![
            view.title,
            view.slug,
            view.count,
            if view.is_new { "yes" } else { "" },
            if view.is_featured { "yes" } else { "" },
            view.description,
        ]);
    }

    table.to_string()
}
