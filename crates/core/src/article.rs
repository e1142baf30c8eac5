use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used when an article carries no category data at all.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
/// Slug counterpart of [`UNCATEGORIZED_NAME`].
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// An embedded category relation, as expanded by the API at `depth >= 1`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// The category field as it actually arrives over the wire.
///
/// Backend schema revisions have shipped this as a single embedded object,
/// an array of embedded objects, or a bare slug string depending on the
/// query `depth`. [`normalize_category`] is the only place allowed to look
/// at this enum; everything downstream sees a single [`CategoryRef`].
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum RawCategoryRel {
    Many(Vec<CategoryRef>),
    One(CategoryRef),
    Slug(String),
}

/// Featured image relation. Only the URL is ever used.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RawImage {
    #[serde(default)]
    pub url: String,
}

/// Article record exactly as returned by the content API.
///
/// Every field except `id` is defaulted: older backend revisions omit
/// `isFeatured`, drafts can miss `slug`, and `content` is an opaque
/// rich-text document owned by the renderer, passed through untouched.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub category: Option<RawCategoryRel>,
    #[serde(default)]
    pub featured_image: Option<RawImage>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Canonical post view model.
///
/// This is the contract every rendering path depends on: `category` is
/// always a single object, `image_url` is always absolute, and the
/// pseudo-metrics (`read_count`, fallback `featured`) are pure functions of
/// the article id so repeated renders of the same data never disagree.
#[derive(Debug, Serialize, Clone)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub category: CategoryRef,
    pub read_count: u32,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    pub slug: String,
    pub href: String,
    pub read_time: u32,
    pub featured: bool,
}

/// Interpret the leading base-36 digits of an id as an integer.
///
/// Ids are opaque base-36-like tokens; this value seeds every deterministic
/// fallback. Digits are folded with wrapping arithmetic so arbitrarily long
/// ids still produce a stable value, and an id with no base-36 prefix maps
/// to 0.
pub fn base36_value(id: &str) -> u64 {
    let mut value: u64 = 0;
    for c in id.chars() {
        match c.to_digit(36) {
            Some(d) => value = value.wrapping_mul(36).wrapping_add(u64::from(d)),
            None => break,
        }
    }
    value
}

/// Deterministic pseudo read count: `base36(id) % 1900 + 100`.
///
/// Not a real analytics value. The constants are cosmetic but load-bearing
/// for compatibility: the same id must always render the same number.
pub fn read_count(id: &str) -> u32 {
    (base36_value(id) % 1900 + 100) as u32
}

/// Deterministic fallback for articles whose backend revision predates the
/// explicit `isFeatured` flag: `base36(id) % 5 == 0`.
pub fn fallback_featured(id: &str) -> bool {
    base36_value(id) % 5 == 0
}

/// Estimated reading time in minutes, one minute per 200 characters of
/// description, rounded up.
pub fn read_time(description: &str) -> u32 {
    description.chars().count().div_ceil(200) as u32
}

/// Lowercase a display name and collapse whitespace runs into hyphens.
pub fn name_to_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Title-case a slug back into a display name: `"web-dev"` -> `"Web Dev"`.
pub fn slug_to_name(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The sentinel category attached to articles with no category data.
pub fn uncategorized() -> CategoryRef {
    CategoryRef {
        id: None,
        name: UNCATEGORIZED_NAME.to_string(),
        slug: UNCATEGORIZED_SLUG.to_string(),
    }
}

/// Collapse the wire category field into a single [`CategoryRef`].
///
/// Arrays take their first element, a bare slug gets a title-cased name,
/// and anything empty or missing falls back to the sentinel. A present
/// reference with an empty slug has one derived from its name.
pub fn normalize_category(raw: Option<&RawCategoryRel>) -> CategoryRef {
    fn fill_slug(mut category: CategoryRef) -> CategoryRef {
        if category.slug.is_empty() {
            category.slug = name_to_slug(&category.name);
        }
        category
    }

    match raw {
        Some(RawCategoryRel::One(category)) => fill_slug(category.clone()),
        Some(RawCategoryRel::Many(categories)) => categories
            .first()
            .cloned()
            .map(fill_slug)
            .unwrap_or_else(uncategorized),
        Some(RawCategoryRel::Slug(slug)) => CategoryRef {
            id: None,
            name: slug_to_name(slug),
            slug: slug.clone(),
        },
        None => uncategorized(),
    }
}

/// Build an absolute media URL, prefixing the configured media base exactly
/// once. Paths that are already absolute or already carry the base pass
/// through unmodified.
pub fn resolve_media_url(media_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with(media_base) {
        return path.to_string();
    }

    let base = media_base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Parse an ISO-8601 timestamp, falling back to the Unix epoch on malformed
/// input so the mapper never fails.
pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Map a raw article record into the canonical [`Post`] view model.
///
/// This function never fails: shape anomalies collapse to the deterministic
/// fallbacks above. A missing slug still yields an href (the caller is
/// expected to flag it as a data-quality condition).
pub fn map_article_to_post(article: &RawArticle, media_base: &str) -> Post {
    Post {
        id: article.id.clone(),
        title: article.title.clone(),
        description: article.description.clone(),
        image_url: article
            .featured_image
            .as_ref()
            .filter(|image| !image.url.is_empty())
            .map(|image| resolve_media_url(media_base, &image.url)),
        category: normalize_category(article.category.as_ref()),
        read_count: read_count(&article.id),
        published_at: parse_timestamp(&article.created_at),
        updated_at: parse_timestamp(&article.updated_at),
        content: article.content.clone(),
        slug: article.slug.clone(),
        href: format!("/article/{}", article.slug),
        read_time: read_time(&article.description),
        featured: article
            .is_featured
            .unwrap_or_else(|| fallback_featured(&article.id)),
    }
}
