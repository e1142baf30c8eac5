use serde::{Deserialize, Serialize};

use crate::article::{base36_value, name_to_slug, resolve_media_url, RawArticle};

/// Category record exactly as returned by the content API.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub articles: Option<Vec<RawArticle>>,
    #[serde(default)]
    pub is_new: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Canonical category view model.
///
/// `count` and the badge flags follow the same determinism rule as the post
/// pseudo-metrics: explicit backend values win, otherwise the fallbacks are
/// keyed off the id and the category's position in list order.
#[derive(Debug, Serialize, Clone)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub href: String,
    pub slug: String,
    pub count: usize,
    pub is_new: bool,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<RawArticle>>,
}

/// Deterministic fallback article count for categories fetched without
/// their article relation: `base36(id) % 45 + 5`.
pub fn fallback_count(id: &str) -> usize {
    (base36_value(id) % 45 + 5) as usize
}

/// Map a raw category record into the canonical [`CategoryView`].
///
/// `index` is the category's position in list order. Listing pages pass it
/// so the positional badge fallbacks apply (`is_new` for the first two,
/// `is_featured` for every third); detail pages fetching a single category
/// pass `None` and get unbadged output.
pub fn map_category_to_view(
    category: &RawCategory,
    index: Option<usize>,
    media_base: &str,
) -> CategoryView {
    let slug = if category.slug.is_empty() {
        name_to_slug(&category.name)
    } else {
        category.slug.clone()
    };

    let count = match (&category.articles, index) {
        (Some(articles), _) => articles.len(),
        (None, Some(_)) => fallback_count(&category.id),
        (None, None) => 0,
    };

    CategoryView {
        id: category.id.clone(),
        title: category.name.clone(),
        description: category
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Explore {} content", category.name)),
        image_url: category
            .icon
            .as_deref()
            .filter(|icon| !icon.is_empty())
            .map(|icon| resolve_media_url(media_base, icon)),
        href: format!("/category/{slug}"),
        slug,
        count,
        is_new: category
            .is_new
            .unwrap_or_else(|| index.is_some_and(|i| i < 2)),
        is_featured: category
            .is_featured
            .unwrap_or_else(|| index.is_some_and(|i| i % 3 == 0)),
        articles: category.articles.clone(),
    }
}
