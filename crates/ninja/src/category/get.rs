use colored::Colorize;

use ninja_core::article::Post;
use ninja_core::category::CategoryView;

use crate::client::{build_client, FetchOptions};
use crate::prelude::{println, *};
use crate::services::{self, SiteConfig};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct GetOptions {
    /// Category slug
    pub slug: String,

    /// Relational expansion depth; 2 expands the embedded articles
    #[arg(long, default_value = "2")]
    pub depth: u8,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: GetOptions, global: crate::Global) -> Result<()> {
    let config = SiteConfig::from(&global);

    if global.verbose {
        println!("Fetching category: {}", options.slug);
    }

    let client = build_client()?;
    let raw = services::get_category_by_slug(
        &client,
        &config,
        &options.slug,
        options.depth,
        FetchOptions::default(),
    )
    .await;

    let Some(raw) = raw else {
        println!(
            "{}",
            format!("No category found for slug \"{}\".", options.slug).yellow()
        );
        return Ok(());
    };

    // A single category fetched by slug has no list position, so the
    // positional badge fallbacks stay off.
    let view = ninja_core::category::map_category_to_view(&raw, None, &config.media_url);
    let posts = view
        .articles
        .as_deref()
        .map(|articles| services::posts_from_raw(articles, &config))
        .unwrap_or_default();

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view)
                .map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        print!("{}", format_category_detail(&view, &posts));
    }

    Ok(())
}

fn format_category_detail(view: &CategoryView, posts: &[Post]) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", view.title.bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&format!("\n{}\n", view.description.white()));
    result.push_str(&format!(
        "{}: {}\n",
        "Href".green(),
        view.href.cyan().underline()
    ));

    if posts.is_empty() {
        result.push_str(&format!("\n{}\n", "No articles in this category.".yellow()));
    } else {
        result.push_str(&format!(
            "\n{} ({}):\n",
            "Articles".bright_white().bold(),
            posts.len()
        ));
        for post in posts {
            result.push_str(&format!(
                "  {} {}\n",
                "-".green(),
                format!("{} ({})", post.title, post.href).white()
            ));
        }
    }

    result.push('\n');
    result
}
