use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::article::Post;
use crate::category::CategoryView;

/// Sort orders supported by the listing UI.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "title-asc" => Ok(SortOrder::TitleAsc),
            "title-desc" => Ok(SortOrder::TitleDesc),
            _ => Err(format!(
                "Invalid sort order: {s}. Valid orders: newest, oldest, title-asc, title-desc"
            )),
        }
    }
}

/// Layout variants for the posts grid.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    #[default]
    Grid,
    List,
    Compact,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Grid => "grid",
            LayoutKind::List => "list",
            LayoutKind::Compact => "compact",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(LayoutKind::Grid),
            "list" => Ok(LayoutKind::List),
            "compact" => Ok(LayoutKind::Compact),
            _ => Err(format!(
                "Invalid layout: {s}. Valid layouts: grid, list, compact"
            )),
        }
    }
}

/// Session-scoped store holding the fetched post list plus the user's
/// filter selections.
///
/// The store is a plain owned value handed to whichever component drives
/// the listing (no ambient global). [`filtered_articles`] is recomputed on
/// every call from the current articles and filters, so there is no cached
/// derived state to invalidate and no staleness window between a mutation
/// and the next read.
///
/// [`filtered_articles`]: FilterStore::filtered_articles
#[derive(Debug, Default, Clone)]
pub struct FilterStore {
    articles: Vec<Post>,
    categories: Vec<CategoryView>,
    search_query: String,
    selected_category_ids: Vec<String>,
    sort_by: SortOrder,
    layout: LayoutKind,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[Post] {
        &self.articles
    }

    pub fn categories(&self) -> &[CategoryView] {
        &self.categories
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_category_ids(&self) -> &[String] {
        &self.selected_category_ids
    }

    pub fn sort_by(&self) -> SortOrder {
        self.sort_by
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn set_articles(&mut self, articles: Vec<Post>) {
        self.articles = articles;
    }

    pub fn set_categories(&mut self, categories: Vec<CategoryView>) {
        self.categories = categories;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Toggle a category id in or out of the selected set.
    pub fn toggle_category(&mut self, id: &str) {
        if let Some(position) = self.selected_category_ids.iter().position(|c| c == id) {
            self.selected_category_ids.remove(position);
        } else {
            self.selected_category_ids.push(id.to_string());
        }
    }

    pub fn set_sort_by(&mut self, sort_by: SortOrder) {
        self.sort_by = sort_by;
    }

    pub fn set_layout(&mut self, layout: LayoutKind) {
        self.layout = layout;
    }

    /// Reset search, category selection, and sort order to their defaults.
    /// The fetched data and the layout choice are left untouched.
    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.selected_category_ids.clear();
        self.sort_by = SortOrder::default();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.search_query.trim().is_empty()
            || !self.selected_category_ids.is_empty()
            || self.sort_by != SortOrder::default()
    }

    /// The derived visible-posts view: search, then category filter, then
    /// sort. Recomputed from scratch on every call.
    pub fn filtered_articles(&self) -> Vec<Post> {
        let query = self.search_query.trim().to_lowercase();

        let mut visible: Vec<Post> = self
            .articles
            .iter()
            .filter(|post| {
                if query.is_empty() {
                    return true;
                }
                post.title.to_lowercase().contains(&query)
                    || post.description.to_lowercase().contains(&query)
                    || post.category.name.to_lowercase().contains(&query)
            })
            .filter(|post| {
                if self.selected_category_ids.is_empty() {
                    return true;
                }
                post.category
                    .id
                    .as_ref()
                    .is_some_and(|id| self.selected_category_ids.contains(id))
            })
            .cloned()
            .collect();

        visible.sort_by(|a, b| match self.sort_by {
            SortOrder::Newest => b.published_at.cmp(&a.published_at),
            SortOrder::Oldest => a.published_at.cmp(&b.published_at),
            SortOrder::TitleAsc => compare_titles(&a.title, &b.title),
            SortOrder::TitleDesc => compare_titles(&b.title, &a.title),
        });

        visible
    }
}

/// Case-insensitive title comparison, with the original casing as a
/// tiebreaker so ordering stays total.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{map_article_to_post, RawArticle};

    fn post(id: &str, title: &str, category_id: &str, created_at: &str) -> Post {
        let raw: RawArticle = serde_json::from_value(serde_json::json!({
            "id": id,
            "slug": id,
            "title": title,
            "description": format!("About {title}"),
            "category": {"id": category_id, "name": format!("Cat {category_id}"), "slug": category_id},
            "createdAt": created_at,
            "updatedAt": created_at,
        }))
        .unwrap();
        map_article_to_post(&raw, "https://cms.example.com")
    }

    fn seeded_store() -> FilterStore {
        let mut store = FilterStore::new();
        store.set_articles(vec![
            post("a1", "React Guide", "c1", "2024-03-01T00:00:00Z"),
            post("a2", "Go Basics", "c2", "2024-01-01T00:00:00Z"),
            post("a3", "Rust Ownership", "c1", "2024-02-01T00:00:00Z"),
        ]);
        store
    }

    #[test]
    fn test_empty_store_has_no_articles() {
        let store = FilterStore::new();
        assert!(store.filtered_articles().is_empty());
        assert!(!store.has_active_filters());
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let store = seeded_store();
        let visible = store.filtered_articles();
        let ids: Vec<&str> = visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a3", "a2"]);
    }

    #[test]
    fn test_search_matches_title() {
        let mut store = seeded_store();
        store.set_search_query("go");
        let visible = store.filtered_articles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Go Basics");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut store = seeded_store();
        store.set_search_query("RUST");
        assert_eq!(store.filtered_articles().len(), 1);
    }

    #[test]
    fn test_search_matches_description_and_category_name() {
        let mut store = seeded_store();
        store.set_search_query("about react");
        assert_eq!(store.filtered_articles().len(), 1);

        store.set_search_query("cat c2");
        let visible = store.filtered_articles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a2");
    }

    #[test]
    fn test_search_whitespace_only_matches_everything() {
        let mut store = seeded_store();
        store.set_search_query("   ");
        assert_eq!(store.filtered_articles().len(), 3);
    }

    #[test]
    fn test_category_filter() {
        let mut store = seeded_store();
        store.toggle_category("c1");
        let visible = store.filtered_articles();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|p| p.category.id.as_deref() == Some("c1")));
    }

    #[test]
    fn test_category_filter_multiple_selected() {
        let mut store = seeded_store();
        store.toggle_category("c1");
        store.toggle_category("c2");
        assert_eq!(store.filtered_articles().len(), 3);
    }

    #[test]
    fn test_toggle_category_is_symmetric() {
        let mut store = seeded_store();
        let before = store.selected_category_ids().to_vec();
        store.toggle_category("c1");
        assert_eq!(store.selected_category_ids(), ["c1".to_string()]);
        store.toggle_category("c1");
        assert_eq!(store.selected_category_ids(), before.as_slice());
    }

    #[test]
    fn test_search_and_category_compose() {
        let mut store = seeded_store();
        store.toggle_category("c1");
        store.set_search_query("rust");
        let visible = store.filtered_articles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a3");
    }

    #[test]
    fn test_sort_title_asc() {
        let mut store = seeded_store();
        store.set_sort_by(SortOrder::TitleAsc);
        let titles: Vec<String> = store
            .filtered_articles()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Go Basics", "React Guide", "Rust Ownership"]);
    }

    #[test]
    fn test_sort_title_desc() {
        let mut store = seeded_store();
        store.set_sort_by(SortOrder::TitleDesc);
        let first = store.filtered_articles();
        assert_eq!(first[0].title, "Rust Ownership");
        assert_eq!(first[2].title, "Go Basics");
    }

    #[test]
    fn test_sort_title_ignores_case() {
        let mut store = FilterStore::new();
        store.set_articles(vec![
            post("a1", "banana", "c1", "2024-01-01T00:00:00Z"),
            post("a2", "Apple", "c1", "2024-01-02T00:00:00Z"),
        ]);
        store.set_sort_by(SortOrder::TitleAsc);
        let titles: Vec<String> = store
            .filtered_articles()
            .iter()
            .map(|p| p.title.clone())
            .collect();
        assert_eq!(titles, vec!["Apple", "banana"]);
    }

    #[test]
    fn test_sort_oldest() {
        let mut store = seeded_store();
        store.set_sort_by(SortOrder::Oldest);
        let ids: Vec<String> = store
            .filtered_articles()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn test_clear_filters_restores_everything() {
        let mut store = seeded_store();
        store.set_search_query("go");
        store.toggle_category("c2");
        store.set_sort_by(SortOrder::TitleDesc);
        store.set_layout(LayoutKind::Compact);
        assert!(store.has_active_filters());

        store.clear_filters();

        assert!(!store.has_active_filters());
        assert_eq!(store.filtered_articles().len(), 3);
        assert_eq!(store.sort_by(), SortOrder::Newest);
        // Layout and data survive a filter reset.
        assert_eq!(store.layout(), LayoutKind::Compact);
        assert_eq!(store.articles().len(), 3);
    }

    #[test]
    fn test_derived_view_tracks_latest_mutation() {
        let mut store = seeded_store();
        store.set_search_query("go");
        assert_eq!(store.filtered_articles().len(), 1);
        store.set_search_query("");
        assert_eq!(store.filtered_articles().len(), 3);
    }

    #[test]
    fn test_sort_order_round_trips_from_str() {
        for order in SortOrder::ALL {
            assert_eq!(order.as_str().parse::<SortOrder>().unwrap(), order);
        }
        assert!("random".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_layout_kind_from_str() {
        assert_eq!("grid".parse::<LayoutKind>().unwrap(), LayoutKind::Grid);
        assert_eq!("list".parse::<LayoutKind>().unwrap(), LayoutKind::List);
        assert_eq!(
            "compact".parse::<LayoutKind>().unwrap(),
            LayoutKind::Compact
        );
        assert!("masonry".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_category_filter_skips_posts_without_category_id() {
        let mut store = FilterStore::new();
        let raw: RawArticle = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "slug": "a1",
            "title": "Orphan",
            "description": "No category",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap();
        store.set_articles(vec![map_article_to_post(&raw, "https://cms.example.com")]);

        assert_eq!(store.filtered_articles().len(), 1);
        store.toggle_category("c1");
        assert!(store.filtered_articles().is_empty());
    }
}
