use colored::Colorize;

use ninja_core::article::Post;
use ninja_core::store::{FilterStore, LayoutKind, SortOrder};

use crate::client::{build_client, FetchOptions};
use crate::prelude::{println, *};
use crate::services::{self, SiteConfig, DEFAULT_DEPTH};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListOptions {
    /// Case-insensitive search over title, description, and category name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Filter by category id (repeatable)
    #[arg(short, long = "category")]
    pub category: Vec<String>,

    /// Sort order: newest, oldest, title-asc, title-desc
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,

    /// Listing layout: grid, list, compact
    #[arg(long, default_value = "grid")]
    pub layout: LayoutKind,

    /// Maximum number of posts to show
    #[arg(short, long)]
    pub limit: Option<usize>,

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
        println!("Fetching articles from {}...", config.api_url);
    }

    let client = build_client()?;
    let raw = services::get_articles(&client, &config, options.depth, FetchOptions::default()).await;
    let posts = services::posts_from_raw(&raw, &config);

    let store = build_store(posts, &options);
    let mut visible = store.filtered_articles();
    let total = store.articles().len();
    if let Some(limit) = options.limit {
        visible.truncate(limit);
    }

    if options.json {
        println!("{}", format_post_list_json(&visible)?);
    } else {
        print!("{}", format_post_list_text(&visible, &store, total));
    }

    Ok(())
}

/// Seed a filter store from the CLI flags. The store owns the filter
/// pipeline; this module only translates arguments into mutator calls.
fn build_store(posts: Vec<Post>, options: &ListOptions) -> FilterStore {
    let mut store = FilterStore::new();
    store.set_articles(posts);
    if let Some(search) = &options.search {
        store.set_search_query(search.clone());
    }
    for id in &options.category {
        store.toggle_category(id);
    }
    store.set_sort_by(options.sort);
    store.set_layout(options.layout);
    store
}

fn format_post_list_json(posts: &[Post]) -> Result<String> {
    serde_json::to_string_pretty(posts).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

fn format_post_list_text(posts: &[Post], store: &FilterStore, total: usize) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("SIMPLIFIED NINJA ARTICLES ({} layout)", store.layout())
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if posts.is_empty() {
        let message = if store.has_active_filters() {
            "No posts found. Try adjusting your filters or search terms."
        } else {
            "No posts available."
        };
        result.push_str(&format!("\n{}\n", message.yellow()));
        return result;
    }

    for (idx, post) in posts.iter().enumerate() {
        let badge = if post.featured {
            format!(" {}", "[featured]".bright_magenta())
        } else {
            String::new()
        };
        result.push_str(&format!(
            "\n{} {}{}\n",
            format!("[{}]", idx + 1).yellow().bold(),
            post.title.white().bold(),
            badge
        ));
        result.push_str(&format!(
            "    {}: {} | {}: {} | {}: {} min | {}: {}\n",
            "Category".green(),
            post.category.name.bright_white(),
            "Published".green(),
            post.published_at.format("%Y-%m-%d").to_string().bright_black(),
            "Read time".green(),
            post.read_time.to_string().bright_yellow(),
            "Reads".green(),
            post.read_count.to_string().bright_magenta()
        ));
        result.push_str(&format!(
            "    {}: {} | {}: {}\n",
            "Href".green(),
            post.href.cyan().underline(),
            "Read".green(),
            format!("ninja article get {}", post.slug).cyan()
        ));
    }

    result.push_str(&format!(
        "\n{} {} {} {} {}\n",
        "Showing".bright_white(),
        posts.len().to_string().bright_cyan().bold(),
        "of".bright_white(),
        total.to_string().bright_cyan().bold(),
        "posts".bright_white()
    ));

    if store.has_active_filters() {
        result.push_str(&format!(
            "  {}: {}\n",
            "Active filters".green(),
            describe_filters(store).cyan()
        ));
    }

    result.push('\n');
    result
}

fn describe_filters(store: &FilterStore) -> String {
    let mut parts = Vec::new();
    if !store.search_query().trim().is_empty() {
        parts.push(format!("search \"{}\"", store.search_query().trim()));
    }
    if !store.selected_category_ids().is_empty() {
        parts.push(format!(
            "categories [{}]",
            store.selected_category_ids().join(", ")
        ));
    }
    if store.sort_by() != SortOrder::Newest {
        parts.push(format!("sort {}", store.sort_by()));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ninja_core::article::{map_article_to_post, RawArticle};

    fn post(id: &str, title: &str, created_at: &str) -> Post {
        let raw: RawArticle = serde_json::from_value(serde_json::json!({
            "id": id,
            "slug": title.to_lowercase().replace(' ', "-"),
            "title": title,
            "description": format!("All about {title}"),
            "category": {"id": "c1", "name": "Rust", "slug": "rust"},
            "createdAt": created_at,
            "updatedAt": created_at,
        }))
        .unwrap();
        map_article_to_post(&raw, "https://cms.example.com")
    }

    fn default_options() -> ListOptions {
        ListOptions {
            search: None,
            category: vec![],
            sort: SortOrder::Newest,
            layout: LayoutKind::Grid,
            limit: None,
            depth: 1,
            json: false,
        }
    }

    #[test]
    fn test_build_store_applies_flags() {
        let mut options = default_options();
        options.search = Some("rust".to_string());
        options.category = vec!["c1".to_string(), "c2".to_string()];
        options.sort = SortOrder::TitleAsc;

        let store = build_store(vec![post("a1", "Rust Guide", "2024-01-01T00:00:00Z")], &options);

        assert_eq!(store.search_query(), "rust");
        assert_eq!(store.selected_category_ids().len(), 2);
        assert_eq!(store.sort_by(), SortOrder::TitleAsc);
    }

    #[test]
    fn test_format_json_includes_post_fields() {
        let posts = vec![post("a1", "Rust Guide", "2024-01-01T00:00:00Z")];
        let json = format_post_list_json(&posts).unwrap();
        assert!(json.contains("\"title\": \"Rust Guide\""));
        assert!(json.contains("\"href\": \"/article/rust-guide\""));
        assert!(json.contains("\"read_count\""));
    }

    #[test]
    fn test_format_text_lists_posts() {
        let posts = vec![
            post("a1", "Rust Guide", "2024-02-01T00:00:00Z"),
            post("a2", "Go Basics", "2024-01-01T00:00:00Z"),
        ];
        let store = build_store(posts.clone(), &default_options());

        let formatted = format_post_list_text(&posts, &store, 2);

        assert!(formatted.contains("SIMPLIFIED NINJA ARTICLES"));
        assert!(formatted.contains("Rust Guide"));
        assert!(formatted.contains("Go Basics"));
        assert!(formatted.contains("[1]"));
        assert!(formatted.contains("[2]"));
        assert!(formatted.contains("ninja article get rust-guide"));
    }

    #[test]
    fn test_format_text_empty_without_filters() {
        let store = build_store(vec![], &default_options());
        let formatted = format_post_list_text(&[], &store, 0);
        assert!(formatted.contains("No posts available."));
    }

    #[test]
    fn test_format_text_empty_with_filters() {
        let mut options = default_options();
        options.search = Some("nothing matches".to_string());
        let store = build_store(
            vec![post("a1", "Rust Guide", "2024-01-01T00:00:00Z")],
            &options,
        );
        let visible = store.filtered_articles();
        assert!(visible.is_empty());

        let formatted = format_post_list_text(&visible, &store, 1);
        assert!(formatted.contains("No posts found"));
        assert!(formatted.contains("adjusting your filters"));
    }

    #[test]
    fn test_format_text_shows_counts_and_filters() {
        let mut options = default_options();
        options.search = Some("rust".to_string());
        let posts = vec![
            post("a1", "Rust Guide", "2024-02-01T00:00:00Z"),
            post("a2", "Go Basics", "2024-01-01T00:00:00Z"),
        ];
        let store = build_store(posts, &options);
        let visible = store.filtered_articles();

        let formatted = format_post_list_text(&visible, &store, 2);
        assert!(formatted.contains("Showing"));
        assert!(formatted.contains("Active filters"));
        assert!(formatted.contains("search \"rust\""));
    }

    #[test]
    fn test_describe_filters_mentions_non_default_sort() {
        let mut options = default_options();
        options.sort = SortOrder::TitleDesc;
        let store = build_store(vec![], &options);
        assert!(describe_filters(&store).contains("sort title-desc"));
    }
}
