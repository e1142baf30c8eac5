use std::any::Any;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;

use ninja_core::article::Post;
use ninja_core::category::CategoryView;
use ninja_core::store::FilterStore;
use ninja_core::subscribe::SubscriptionResult;

use crate::client::{build_client, FetchOptions};
use crate::prelude::{eprintln, *};
use crate::services::{self, SiteConfig, DEFAULT_DEPTH};

/// How many posts the home page shows.
const HOME_POST_LIMIT: usize = 6;

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

struct AppState {
    client: reqwest::Client,
    config: SiteConfig,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let config = SiteConfig::from(&global);

    if global.verbose {
        eprintln!(
            "Serving Simplified Ninja on {}:{} (content API: {})",
            options.host, options.port, config.api_url
        );
    }

    let state = Arc::new(AppState {
        client: build_client()?,
        config,
    });

    let router = Router::new()
        .route("/", get(home))
        .route("/article", get(article_index))
        .route("/article/{slug}", get(article_detail))
        .route("/category", get(category_index))
        .route("/category/{slug}", get(category_detail))
        .route("/subscribers", post(subscribe))
        .route("/robots.txt", get(robots))
        .route("/sitemap.xml", get(sitemap))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state);

    let addr = format!("{}:{}", options.host, options.port);
    eprintln!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| eyre!("Server error: {}", e))?;

    Ok(())
}

// Handlers. Every data-fetching handler renders an empty state on fetch
// failure instead of surfacing an error; the catch-panic layer is the only
// path to the 500 page.

async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    // Articles and categories are independent; issue both fetches together.
    let (articles, categories) = tokio::join!(
        services::get_articles(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default()),
        services::get_categories(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default()),
    );

    let mut store = FilterStore::new();
    store.set_articles(services::posts_from_raw(&articles, &state.config));
    let mut recent = store.filtered_articles();
    recent.truncate(HOME_POST_LIMIT);

    let views = services::category_views_from_raw(&categories, &state.config);
    Html(render_home(&recent, &views))
}

async fn article_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let articles =
        services::get_articles(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default())
            .await;
    let posts = services::posts_from_raw(&articles, &state.config);
    Html(render_article_index(&posts))
}

async fn article_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let raw =
        services::get_article_by_slug(&state.client, &state.config, &slug, 2, FetchOptions::default())
            .await;

    match raw {
        Some(raw) => {
            let posts = services::posts_from_raw(std::slice::from_ref(&raw), &state.config);
            Html(render_article_detail(&posts[0])).into_response()
        }
        None => (StatusCode::NOT_FOUND, Html(render_not_found())).into_response(),
    }
}

async fn category_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let categories =
        services::get_categories(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default())
            .await;
    let views = services::category_views_from_raw(&categories, &state.config);
    Html(render_category_index(&views))
}

async fn category_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let raw =
        services::get_category_by_slug(&state.client, &state.config, &slug, 2, FetchOptions::default())
            .await;

    match raw {
        Some(raw) => {
            let view = ninja_core::category::map_category_to_view(&raw, None, &state.config.media_url);
            let posts = view
                .articles
                .as_deref()
                .map(|articles| services::posts_from_raw(articles, &state.config))
                .unwrap_or_default();
            Html(render_category_detail(&view, &posts)).into_response()
        }
        None => (StatusCode::NOT_FOUND, Html(render_not_found())).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct SubscribeForm {
    #[serde(default)]
    email: String,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubscribeForm>,
) -> Html<String> {
    let result = services::subscribe_email(&state.client, &state.config, &form.email).await;
    Html(render_subscribe_result(&result))
}

async fn robots(State(state): State<Arc<AppState>>) -> Response {
    (
        [(axum::http::header::CONTENT_TYPE, "text/plain")],
        render_robots_txt(&state.config.site_url),
    )
        .into_response()
}

async fn sitemap(State(state): State<Arc<AppState>>) -> Response {
    let (articles, categories) = tokio::join!(
        services::get_articles(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default()),
        services::get_categories(&state.client, &state.config, DEFAULT_DEPTH, FetchOptions::default()),
    );
    let posts = services::posts_from_raw(&articles, &state.config);
    let views = services::category_views_from_raw(&categories, &state.config);

    (
        [(axum::http::header::CONTENT_TYPE, "application/xml")],
        render_sitemap_xml(&state.config.site_url, &posts, &views),
    )
        .into_response()
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found())).into_response()
}

fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(render_error_page())).into_response()
}

// Markup. Presentation is intentionally minimal; the view models carry all
// the data a styled front-end would need.

fn render_page(title: &str, body: &str) -> String {
    format!(
        concat!(
            "<!doctype html>\n",
            "<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title} | Simplified Ninja</title>\n",
            "</head>\n<body>\n",
            "<nav><a href=\"/\">Simplified Ninja</a> ",
            "<a href=\"/article\">Articles</a> ",
            "<a href=\"/category\">Categories</a></nav>\n",
            "<main>\n{body}</main>\n",
            "<footer>\n",
            "<h2>The Ninja's Dispatch</h2>\n",
            "<p>Get new articles in your inbox.</p>\n",
            "<form action=\"/subscribers\" method=\"post\">\n",
            "<input type=\"email\" name=\"email\" placeholder=\"you@example.com\" required>\n",
            "<button type=\"submit\">Subscribe</button>\n",
            "</form>\n",
            "</footer>\n</body>\n</html>\n"
        ),
        title = encode_text(title),
        body = body,
    )
}

fn render_post_card(post: &Post) -> String {
    let mut card = String::new();
    card.push_str("<article class=\"post-card\">\n");
    if let Some(image_url) = &post.image_url {
        card.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            encode_double_quoted_attribute(image_url),
            encode_double_quoted_attribute(&post.title)
        ));
    }
    card.push_str(&format!(
        "<h3><a href=\"{}\">{}</a></h3>\n",
        encode_double_quoted_attribute(&post.href),
        encode_text(&post.title)
    ));
    card.push_str(&format!(
        "<p class=\"meta\">{} &middot; {} min read &middot; {} reads</p>\n",
        encode_text(&post.category.name),
        post.read_time,
        post.read_count
    ));
    card.push_str(&format!("<p>{}</p>\n", encode_text(&post.description)));
    card.push_str("</article>\n");
    card
}

fn render_category_card(view: &CategoryView) -> String {
    let mut badges = String::new();
    if view.is_new {
        badges.push_str("<span class=\"badge\">New</span> ");
    }
    if view.is_featured {
        badges.push_str("<span class=\"badge\">Featured</span> ");
    }
    format!(
        concat!(
            "<article class=\"category-card\">\n",
            "<h3><a href=\"{href}\">{title}</a></h3>\n",
            "{badges}<p class=\"meta\">{count} posts</p>\n",
            "<p>{description}</p>\n",
            "</article>\n"
        ),
        href = encode_double_quoted_attribute(&view.href),
        title = encode_text(&view.title),
        badges = badges,
        count = view.count,
        description = encode_text(&view.description),
    )
}

fn render_home(recent: &[Post], categories: &[CategoryView]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Simplified Ninja</h1>\n");
    body.push_str("<p>Programming, simplified.</p>\n");

    body.push_str("<h2>Recent posts</h2>\n");
    if recent.is_empty() {
        body.push_str("<p>No posts available.</p>\n");
    } else {
        for post in recent {
            body.push_str(&render_post_card(post));
        }
        body.push_str("<p><a href=\"/article\">View all posts</a></p>\n");
    }

    body.push_str("<h2>Categories</h2>\n");
    if categories.is_empty() {
        body.push_str("<p>No categories available.</p>\n");
    } else {
        for view in categories {
            body.push_str(&render_category_card(view));
        }
    }

    render_page("Home", &body)
}

fn render_article_index(posts: &[Post]) -> String {
    let mut body = String::new();
    body.push_str("<h1>All Articles</h1>\n");
    if posts.is_empty() {
        body.push_str("<p>No posts available.</p>\n");
    } else {
        for post in posts {
            body.push_str(&render_post_card(post));
        }
    }
    render_page("All Articles", &body)
}

fn render_article_detail(post: &Post) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", encode_text(&post.title)));
    body.push_str(&format!(
        "<p class=\"meta\"><a href=\"/category/{}\">{}</a> &middot; {} &middot; {} min read &middot; {} reads</p>\n",
        encode_double_quoted_attribute(&post.category.slug),
        encode_text(&post.category.name),
        post.published_at.format("%B %-d, %Y"),
        post.read_time,
        post.read_count
    ));
    if let Some(image_url) = &post.image_url {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            encode_double_quoted_attribute(image_url),
            encode_double_quoted_attribute(&post.title)
        ));
    }
    body.push_str(&format!("<p>{}</p>\n", encode_text(&post.description)));
    // The rich-text document is rendered by a separate collaborator; this
    // shell only marks where it goes.
    if post.content.is_some() {
        body.push_str("<div class=\"rich-text\" data-rendered-elsewhere></div>\n");
    }
    render_page(&post.title, &body)
}

fn render_category_index(views: &[CategoryView]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Categories</h1>\n");
    if views.is_empty() {
        body.push_str("<p>No categories available.</p>\n");
    } else {
        for view in views {
            body.push_str(&render_category_card(view));
        }
    }
    render_page("Categories", &body)
}

fn render_category_detail(view: &CategoryView, posts: &[Post]) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", encode_text(&view.title)));
    body.push_str(&format!("<p>{}</p>\n", encode_text(&view.description)));
    if posts.is_empty() {
        body.push_str("<p>No articles in this category.</p>\n");
    } else {
        for post in posts {
            body.push_str(&render_post_card(post));
        }
    }
    render_page(&view.title, &body)
}

fn render_subscribe_result(result: &SubscriptionResult) -> String {
    let heading = if result.success {
        "You're in!"
    } else {
        "Subscription failed"
    };
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Go home</a></p>\n",
        encode_text(heading),
        encode_text(&result.message)
    );
    render_page("Newsletter", &body)
}

fn render_not_found() -> String {
    render_page(
        "Not Found",
        "<h1>Page not found</h1>\n<p>The page you are looking for does not exist.</p>\n<p><a href=\"/\">Go home</a></p>\n",
    )
}

fn render_error_page() -> String {
    render_page(
        "Something went wrong",
        "<h1>Something went wrong</h1>\n<p>An unexpected error occurred while rendering this page.</p>\n<p><a href=\"javascript:location.reload()\">Try again</a> or <a href=\"/\">go home</a>.</p>\n",
    )
}

fn render_robots_txt(site_url: &str) -> String {
    format!(
        concat!(
            "User-agent: *\n",
            "Allow: /\n\n",
            "Allow: /article\n",
            "Allow: /category\n",
            "Allow: /article/*\n\n",
            "Disallow: /api/\n",
            "Disallow: /admin\n\n",
            "Sitemap: {site_url}/sitemap.xml\n\n",
            "Crawl-delay: 1\n"
        ),
        site_url = site_url
    )
}

fn render_sitemap_xml(site_url: &str, posts: &[Post], categories: &[CategoryView]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for path in ["", "/article", "/category"] {
        xml.push_str(&format!(
            "  <url><loc>{}{}</loc><changefreq>daily</changefreq></url>\n",
            encode_text(site_url),
            path
        ));
    }

    // A slug-less post would point the crawler at the article index.
    for post in posts.iter().filter(|post| !post.slug.is_empty()) {
        xml.push_str(&format!(
            "  <url><loc>{}{}</loc><lastmod>{}</lastmod></url>\n",
            encode_text(site_url),
            encode_text(&post.href),
            post.updated_at.format("%Y-%m-%d")
        ));
    }

    for category in categories {
        xml.push_str(&format!(
            "  <url><loc>{}{}</loc><changefreq>weekly</changefreq></url>\n",
            encode_text(site_url),
            encode_text(&category.href)
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}
