use log::warn;

use ninja_core::api::DocsResponse;
use ninja_core::article::{map_article_to_post, Post, RawArticle};
use ninja_core::category::{map_category_to_view, CategoryView, RawCategory};
use ninja_core::subscribe::{
    classify_subscribe_status, transport_failure, validate_email, SubscriptionResult,
};

use crate::client::{fetch_json, FetchOptions};

/// Default relational expansion depth for list queries.
pub const DEFAULT_DEPTH: u8 = 1;

/// Content API endpoints and media host, resolved from the global CLI
/// arguments (which in turn read the `NINJA_*` environment variables).
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL of the JSON content API.
    pub api_url: String,
    /// Base URL of the media server. Images live on a different host than
    /// the API, so relative image paths get this prefix.
    pub media_url: String,
    /// Public base URL of the site itself, used for sitemap links.
    pub site_url: String,
}

impl From<&crate::Global> for SiteConfig {
    fn from(global: &crate::Global) -> Self {
        Self {
            api_url: global.api_url.trim_end_matches('/').to_string(),
            media_url: global.media_url.trim_end_matches('/').to_string(),
            site_url: global.site_url.trim_end_matches('/').to_string(),
        }
    }
}

pub fn article_list_url(api_url: &str, depth: u8) -> String {
    format!("{api_url}/article?depth={depth}")
}

pub fn article_slug_url(api_url: &str, slug: &str, depth: u8) -> String {
    format!(
        "{api_url}/article?where[slug][equals]={}&depth={depth}",
        urlencoding::encode(slug)
    )
}

pub fn category_list_url(api_url: &str, depth: u8) -> String {
    format!("{api_url}/category?depth={depth}")
}

pub fn category_slug_url(api_url: &str, slug: &str, depth: u8) -> String {
    format!(
        "{api_url}/category?where[slug][equals]={}&depth={depth}",
        urlencoding::encode(slug)
    )
}

/// List all articles. Failures collapse to an empty list; callers never
/// see an error from this layer.
pub async fn get_articles(
    client: &reqwest::Client,
    config: &SiteConfig,
    depth: u8,
    options: FetchOptions,
) -> Vec<RawArticle> {
    let url = article_list_url(&config.api_url, depth);
    fetch_json::<DocsResponse<RawArticle>>(client, &url, options)
        .await
        .map(|response| response.docs)
        .unwrap_or_default()
}

/// Look up a single article by slug. `None` covers both "no match" and
/// "fetch failed"; the page layer renders an empty state either way.
pub async fn get_article_by_slug(
    client: &reqwest::Client,
    config: &SiteConfig,
    slug: &str,
    depth: u8,
    options: FetchOptions,
) -> Option<RawArticle> {
    let url = article_slug_url(&config.api_url, slug, depth);
    fetch_json::<DocsResponse<RawArticle>>(client, &url, options)
        .await
        .and_then(|response| response.docs.into_iter().next())
}

pub async fn get_categories(
    client: &reqwest::Client,
    config: &SiteConfig,
    depth: u8,
    options: FetchOptions,
) -> Vec<RawCategory> {
    let url = category_list_url(&config.api_url, depth);
    fetch_json::<DocsResponse<RawCategory>>(client, &url, options)
        .await
        .map(|response| response.docs)
        .unwrap_or_default()
}

pub async fn get_category_by_slug(
    client: &reqwest::Client,
    config: &SiteConfig,
    slug: &str,
    depth: u8,
    options: FetchOptions,
) -> Option<RawCategory> {
    let url = category_slug_url(&config.api_url, slug, depth);
    fetch_json::<DocsResponse<RawCategory>>(client, &url, options)
        .await
        .and_then(|response| response.docs.into_iter().next())
}

/// Map raw articles into canonical posts.
///
/// Services return raw records and mapping is always this explicit second
/// step; no service hands out pre-mapped records. A record without a slug
/// still maps (the href is just incomplete), but it is a data-quality
/// problem worth surfacing in the logs.
pub fn posts_from_raw(articles: &[RawArticle], config: &SiteConfig) -> Vec<Post> {
    articles
        .iter()
        .map(|raw| {
            if raw.slug.is_empty() {
                warn!("article {} has an empty slug; href will be incomplete", raw.id);
            }
            map_article_to_post(raw, &config.media_url)
        })
        .collect()
}

/// Map raw categories into canonical views, preserving list order so the
/// positional badge fallbacks stay stable.
pub fn category_views_from_raw(categories: &[RawCategory], config: &SiteConfig) -> Vec<CategoryView> {
    categories
        .iter()
        .enumerate()
        .map(|(index, raw)| map_category_to_view(raw, Some(index), &config.media_url))
        .collect()
}

/// Subscribe an email address to the newsletter.
///
/// Validates locally first, then POSTs `{ "email": ... }` to the
/// subscribers endpoint and classifies the response status. Transport
/// failures resolve to the generic-failure result, never an error.
pub async fn subscribe_email(
    client: &reqwest::Client,
    config: &SiteConfig,
    email: &str,
) -> SubscriptionResult {
    if let Some(rejection) = validate_email(email) {
        return rejection;
    }

    let url = format!("{}/subscribers", config.api_url);
    let body = serde_json::json!({ "email": email.trim() });

    match client.post(&url).json(&body).send().await {
        Ok(response) => classify_subscribe_status(response.status().as_u16()),
        Err(err) => {
            warn!("subscribe_email: {err} for {url}");
            transport_failure()
        }
    }
}
