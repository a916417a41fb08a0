//! HTTP server: site pages, contact relay and profile stats

use anyhow::Result;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tera::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::{sort_by_published, total_pages, Catalog};
use crate::config::SiteConfig;
use crate::contact::{ContactError, ContactForm, ContactService};
use crate::content::ContentKind;
use crate::helpers;
use crate::stats::StatsService;
use crate::templates::{CategoryCard, ItemCard, TemplateRenderer};
use crate::Portfolio;

/// Shared state of every handler
pub struct AppState {
    pub config: SiteConfig,
    pub catalog: Catalog,
    pub templates: TemplateRenderer,
    pub contact: ContactService,
    pub stats: StatsService,
    pub public_dir: PathBuf,
    syntax_css: String,
}

impl AppState {
    /// State with the webhook relay and GitHub client from configuration
    pub fn new(site: &Portfolio) -> Result<Self> {
        let contact = ContactService::from_config(&site.config.contact)?;
        let stats = StatsService::from_config(&site.config.stats)?;
        Self::with_services(site, contact, stats)
    }

    pub fn with_services(
        site: &Portfolio,
        contact: ContactService,
        stats: StatsService,
    ) -> Result<Self> {
        let catalog = site.catalog();
        let highlight = &site.config.highlight;
        let syntax_css = catalog
            .renderer()
            .theme_css(&highlight.light_theme, &highlight.dark_theme)?;

        Ok(Self {
            config: site.config.clone(),
            catalog,
            templates: TemplateRenderer::new()?,
            contact,
            stats,
            public_dir: site.public_dir.clone(),
            syntax_css,
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.contact.limits.max_body_bytes());

    Router::new()
        .route("/", get(home))
        .route("/contact", get(contact_page))
        .route("/css/syntax.css", get(syntax_css))
        .route("/project", get(project_categories))
        .route("/project/:category", get(project_category))
        .route("/project/:category/:slug", get(project_item))
        .route("/work", get(work_categories))
        .route("/work/:category", get(work_category))
        .route("/work/:category/:slug", get(work_item))
        .route("/blog/:slug", get(blog_post))
        .route("/api/sendMessage", post(send_message).layer(body_limit))
        .route("/api/getStats", get(get_stats))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Portfolio, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(site)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

type SharedState = State<Arc<AppState>>;

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

fn render(state: &AppState, status: StatusCode, template: &str, context: &Context) -> Response {
    match state.templates.render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

fn message_page(
    state: &AppState,
    status: StatusCode,
    heading: &str,
    message: &str,
    back_url: Option<&str>,
) -> Response {
    let mut context = state.templates.context(&state.config);
    context.insert("heading", heading);
    context.insert("message", message);
    context.insert("back_url", &back_url);
    render(state, status, "message.html", &context)
}

fn not_found(state: &AppState) -> Response {
    message_page(
        state,
        StatusCode::NOT_FOUND,
        "404",
        "This page could not be found.",
        Some("/"),
    )
}

async fn home(State(state): SharedState) -> Response {
    let context = state.templates.context(&state.config);
    render(&state, StatusCode::OK, "home.html", &context)
}

async fn contact_page(State(state): SharedState) -> Response {
    let mut context = state.templates.context(&state.config);
    context.insert("limits", &state.config.contact.limits);
    render(&state, StatusCode::OK, "contact.html", &context)
}

async fn syntax_css(State(state): SharedState) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.syntax_css.clone(),
    )
        .into_response()
}

async fn project_categories(State(state): SharedState) -> Response {
    categories(&state, ContentKind::Project)
}

async fn work_categories(State(state): SharedState) -> Response {
    categories(&state, ContentKind::Work)
}

async fn project_category(
    State(state): SharedState,
    Path(category): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    category_page(&state, ContentKind::Project, &category, query.page.as_deref())
}

async fn work_category(
    State(state): SharedState,
    Path(category): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    category_page(&state, ContentKind::Work, &category, query.page.as_deref())
}

async fn project_item(
    State(state): SharedState,
    Path((category, slug)): Path<(String, String)>,
) -> Response {
    item_page(&state, ContentKind::Project, &category, &slug)
}

async fn work_item(
    State(state): SharedState,
    Path((category, slug)): Path<(String, String)>,
) -> Response {
    item_page(&state, ContentKind::Work, &category, &slug)
}

fn categories(state: &AppState, kind: ContentKind) -> Response {
    let cards: Vec<CategoryCard> = state
        .catalog
        .list_categories(kind)
        .iter()
        .map(|c| CategoryCard::new(kind, c, state.catalog.count_in_category(kind, &c.slug)))
        .collect();

    let heading = match kind {
        ContentKind::Work => "My Work",
        _ => "My Projects",
    };

    let mut context = state.templates.context(&state.config);
    context.insert("heading", heading);
    context.insert("kind", kind.dir_name());
    context.insert("cards", &cards);
    render(state, StatusCode::OK, "categories.html", &context)
}

/// Requested page number; `None` when it is not a number
fn parse_page(raw: Option<&str>) -> Option<usize> {
    match raw {
        None => Some(1),
        Some(s) => s.trim().parse().ok(),
    }
}

fn category_page(
    state: &AppState,
    kind: ContentKind,
    category: &str,
    raw_page: Option<&str>,
) -> Response {
    let Some(count) = state.catalog.page_count(kind, category) else {
        return not_found(state);
    };
    let heading = helpers::title_case_slug(category);
    let back_url = format!("/{}", kind.dir_name());

    if count == 0 {
        let message = format!(
            "There isn't any {} available in this category yet! :(",
            kind.noun()
        );
        return message_page(state, StatusCode::OK, &heading, &message, Some(&back_url));
    }

    let total = total_pages(count, state.catalog.page_size());
    let page = match parse_page(raw_page) {
        Some(page) if (1..=total).contains(&page) => page,
        _ => {
            let message = format!(
                "Invalid page number. Please try a page number between 1 and {}.",
                total
            );
            return message_page(state, StatusCode::OK, &heading, &message, Some(&back_url));
        }
    };

    let mut items = state
        .catalog
        .list_page(kind, category, page)
        .unwrap_or_default();
    sort_by_published(&mut items);
    let cards: Vec<ItemCard> = items.iter().map(ItemCard::new).collect();

    let base_url = format!("/{}/{}", kind.dir_name(), category);
    let paginator = helpers::paginator(page, total, &base_url, "Previous", "Next", 2);

    let mut context = state.templates.context(&state.config);
    context.insert("kind", kind.dir_name());
    context.insert("slug", category);
    context.insert("items", &cards);
    context.insert("paginator", &paginator);
    render(state, StatusCode::OK, "category.html", &context)
}

fn item_page(state: &AppState, kind: ContentKind, category: &str, slug: &str) -> Response {
    let Some(item) = state.catalog.get_item(kind, category, slug) else {
        return not_found(state);
    };
    let back_url = format!("/{}/{}", kind.dir_name(), category);
    render_item(state, &ItemCard::new(&item), &back_url)
}

async fn blog_post(State(state): SharedState, Path(slug): Path<String>) -> Response {
    match state.catalog.get_post(&slug) {
        Some(post) => render_item(&state, &ItemCard::new(&post), "/"),
        None => not_found(&state),
    }
}

fn render_item(state: &AppState, card: &ItemCard, back_url: &str) -> Response {
    let mut context = state.templates.context(&state.config);
    context.insert("item", card);
    context.insert("back_url", back_url);
    render(state, StatusCode::OK, "item.html", &context)
}

async fn send_message(
    State(state): SharedState,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Response {
    match relay_contact(&state, payload).await {
        Ok(()) => Json(json!({ "success": true })).into_response(),
        Err(e) => (
            e.status(),
            Json(json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Every request counts against the rate limit, even one with a bad body
async fn relay_contact(
    state: &AppState,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<(), ContactError> {
    state.contact.admit()?;
    let Json(form) = payload.map_err(|e| {
        tracing::debug!("Rejected contact body: {}", e);
        ContactError::InvalidBody
    })?;
    state.contact.send(form).await
}

async fn get_stats(State(state): SharedState) -> Response {
    match state.stats.get().await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!("Error fetching GitHub stats: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch GitHub stats" })),
            )
                .into_response()
        }
    }
}

/// Static files from the public directory, then the 404 page
async fn fallback_handler(State(state): SharedState, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => not_found(&state),
        Err(e) => {
            tracing::error!("Failed to serve static file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}
