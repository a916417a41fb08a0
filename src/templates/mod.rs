//! Site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::badges::BadgeSet;
use crate::catalog::Category;
use crate::config::SiteConfig;
use crate::content::{ContentItem, ContentKind, Links};
use crate::helpers;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("categories.html", include_str!("site/categories.html")),
            ("category.html", include_str!("site/category.html")),
            ("item.html", include_str!("site/item.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("message.html", include_str!("site/message.html")),
        ])?;

        tera.register_filter("title_case", title_case_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Base context shared by every page
    pub fn context(&self, config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context
    }
}

/// Tera filter: slug to heading
fn title_case_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("title_case", "value", String, value);
    Ok(tera::Value::String(helpers::title_case_slug(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!("{}…", truncated.trim_end())))
    }
}

/// Tera filter: `2023-05-30` -> `May 30, 2023`
fn date_format_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(date.format("%B %-d, %Y").to_string())),
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub tagline: String,
    pub description: String,
    pub url: String,
    pub skills: Vec<String>,
    pub year: i32,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        use chrono::Datelike;
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            tagline: config.tagline.clone(),
            description: config.description.clone(),
            url: config.url.clone(),
            skills: config.skills.clone(),
            year: chrono::Local::now().year(),
        }
    }
}

/// A category card on the listing overview
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCard {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image_src: String,
    pub image_alt: String,
    pub url: String,
    pub label: String,
}

impl CategoryCard {
    pub fn new(kind: ContentKind, category: &Category, count: usize) -> Self {
        let (singular, plural) = match kind {
            ContentKind::Project => ("Project", "Projects"),
            ContentKind::Work => ("Work", "Works"),
            ContentKind::Blog => ("Post", "Posts"),
        };
        Self {
            slug: category.slug.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            image_src: category.image.src.clone(),
            image_alt: category.image.alt.clone(),
            url: format!("/{}/{}", kind.dir_name(), category.slug),
            label: helpers::count_label(count, singular, plural),
        }
    }
}

/// A content item card
#[derive(Debug, Clone, Serialize)]
pub struct ItemCard {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub published_at: Option<String>,
    pub inactive: bool,
    pub links: Links,
    pub badges: BadgeSet,
    pub has_badges: bool,
    pub body: String,
}

impl ItemCard {
    /// Projects classify their tags and flag inactive entries,
    /// work entries show every tag as-is
    pub fn new(item: &ContentItem) -> Self {
        let tags = item.metadata.tags.as_deref().unwrap_or("");
        let (badges, inactive) = match item.kind {
            ContentKind::Project => (BadgeSet::from_tags(tags), !item.metadata.is_active()),
            ContentKind::Work | ContentKind::Blog => (BadgeSet::generic(tags), false),
        };
        Self {
            slug: item.slug.clone(),
            url: format!("/{}/{}", item.kind.dir_name(), item.slug),
            title: item.metadata.title.clone(),
            description: item.metadata.description.clone(),
            image: item.metadata.image.clone(),
            published_at: item
                .metadata
                .published_at
                .map(|d| d.format("%Y-%m-%d").to_string()),
            inactive,
            links: item.metadata.links.clone(),
            has_badges: !badges.is_empty(),
            badges,
            body: item.body_html.clone(),
        }
    }
}
