use colored::Colorize;

use ninja_core::article::Post;

use crate::client::{build_client, FetchOptions};
use crate::prelude::{println, *};
use crate::services::{self, SiteConfig};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct GetOptions {
    /// Article slug (the last segment of its URL)
    pub slug: String,

    /// Relational expansion depth for the API query
    #[arg(long, default_value = "2")]
    pub depth: u8,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: GetOptions, global: crate::Global) -> Result<()> {
    let config = SiteConfig::from(&global);

    if global.verbose {
        println!("Fetching article: {}", options.slug);
    }

    let client = build_client()?;
    let raw =
        services::get_article_by_slug(&client, &config, &options.slug, options.depth, FetchOptions::default())
            .await;

    // Not-found is a normal outcome, not an error: print the empty state
    // and exit cleanly.
    let Some(raw) = raw else {
        println!("{}", format_not_found(&options.slug).yellow());
        return Ok(());
    };

    let posts = services::posts_from_raw(std::slice::from_ref(&raw), &config);
    let post = &posts[0];

    if options.json {
        println!(
            "{}",
            serde_json::to_string_pretty(post).map_err(|e| eyre!("JSON serialization failed: {}", e))?
        );
    } else {
        print!("{}", format_post_detail(post));
    }

    Ok(())
}

fn format_not_found(slug: &str) -> String {
    format!("No article found for slug \"{slug}\".")
}

fn format_post_detail(post: &Post) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!("{}\n", post.title.bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    result.push_str(&format!(
        "\n{}: {} ({})\n",
        "Category".green(),
        post.category.name.bright_white(),
        post.category.slug.bright_black()
    ));
    result.push_str(&format!(
        "{}: {} | {}: {} min | {}: {}\n",
        "Published".green(),
        post.published_at
            .format("%Y-%m-%d %H:%M UTC")
            .to_string()
            .bright_white(),
        "Read time".green(),
        post.read_time.to_string().bright_yellow(),
        "Reads".green(),
        post.read_count.to_string().bright_magenta()
    ));

    if let Some(image_url) = &post.image_url {
        result.push_str(&format!(
            "{}: {}\n",
            "Image".green(),
            image_url.cyan().underline()
        ));
    }

    result.push_str(&format!(
        "{}: {}\n",
        "Href".green(),
        post.href.cyan().underline()
    ));

    if post.featured {
        result.push_str(&format!("{}\n", "[featured]".bright_magenta()));
    }

    result.push_str(&format!("\n{}\n", post.description.white()));

    if post.content.is_some() {
        // The rich-text document belongs to the renderer; the CLI only
        // notes its presence. Use --json to see the raw payload.
        result.push_str(&format!(
            "\n{}\n",
            "(rich-text content available; use --json for the raw document)".bright_black()
        ));
    }

    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ninja_core::article::{map_article_to_post, RawArticle};

    fn sample_post(content: Option<serde_json::Value>) -> Post {
        let mut value = serde_json::json!({
            "id": "abc",
            "slug": "rust-guide",
            "title": "Rust Guide",
            "description": "All about Rust",
            "category": {"id": "c1", "name": "Rust", "slug": "rust"},
            "featuredImage": {"url": "/media/rust.png"},
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-16T10:30:00Z",
        });
        if let Some(content) = content {
            value["content"] = content;
        }
        let raw: RawArticle = serde_json::from_value(value).unwrap();
        map_article_to_post(&raw, "https://cms.example.com")
    }

    #[test]
    fn test_format_not_found_mentions_slug() {
        assert_eq!(
            format_not_found("missing-post"),
            "No article found for slug \"missing-post\"."
        );
    }

    #[test]
    fn test_format_detail_includes_metadata() {
        let formatted = format_post_detail(&sample_post(None));

        assert!(formatted.contains("Rust Guide"));
        assert!(formatted.contains("Category"));
        assert!(formatted.contains("2024-01-15"));
        assert!(formatted.contains("/article/rust-guide"));
        assert!(formatted.contains("https://cms.example.com/media/rust.png"));
        assert!(formatted.contains("All about Rust"));
    }

    #[test]
    fn test_format_detail_notes_rich_text_presence() {
        let with_content = sample_post(Some(serde_json::json!({"root": {}})));
        let formatted = format_post_detail(&with_content);
        assert!(formatted.contains("rich-text content available"));

        let without = format_post_detail(&sample_post(None));
        assert!(!without.contains("rich-text content available"));
    }

    #[test]
    fn test_format_detail_omits_missing_image() {
        let mut post = sample_post(None);
        post.image_url = None;
        let formatted = format_post_detail(&post);
        assert!(!formatted.contains("Image"));
    }
}
