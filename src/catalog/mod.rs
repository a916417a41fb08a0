//! Content catalog: categories, paginated listings and counts
//!
//! Every call reads the filesystem afresh; the catalog itself holds no
//! mutable state and can be shared freely between requests.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

use crate::config::{CategoriesConfig, SiteConfig};
use crate::content::loader::is_safe_segment;
use crate::content::{ContentItem, ContentKind, ContentLoader, LoadReport, MarkdownRenderer};

/// Image shown on a category card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImage {
    pub src: String,
    pub alt: String,
}

/// A static grouping of content items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub image: CategoryImage,
}

/// Project and work catalog backed by the content directory
pub struct Catalog {
    content_dir: PathBuf,
    extension: String,
    page_size: usize,
    categories: CategoriesConfig,
    renderer: MarkdownRenderer,
}

impl Catalog {
    /// Build a catalog from the site configuration
    pub fn new(config: &SiteConfig, content_dir: PathBuf) -> Self {
        Self {
            content_dir,
            extension: config.content_extension.clone(),
            page_size: config.page_size(),
            categories: config.categories.clone(),
            renderer: MarkdownRenderer::new(),
        }
    }

    fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(&self.content_dir, &self.extension, &self.renderer)
    }

    /// Number of items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Renderer shared by every listing
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// The static category registry of a kind
    pub fn list_categories(&self, kind: ContentKind) -> &[Category] {
        match kind {
            ContentKind::Project => &self.categories.project,
            ContentKind::Work => &self.categories.work,
            ContentKind::Blog => &[],
        }
    }

    /// Look up a registered category
    pub fn category(&self, kind: ContentKind, slug: &str) -> Option<&Category> {
        self.list_categories(kind).iter().find(|c| c.slug == slug)
    }

    /// Number of valid items in a category directory; 0 when it does not exist
    pub fn count_in_category(&self, kind: ContentKind, slug: &str) -> usize {
        if !is_safe_segment(slug) {
            return 0;
        }
        self.loader().count_valid(kind, slug)
    }

    /// One page (1-indexed) of a category, in directory order.
    ///
    /// `None` only when the category is not registered; a page past the end
    /// is an empty list.
    pub fn list_page(
        &self,
        kind: ContentKind,
        slug: &str,
        page: usize,
    ) -> Option<Vec<ContentItem>> {
        self.category(kind, slug)?;

        let mut items = self.loader().load_valid(kind, slug);
        let window = page_window(items.len(), page, self.page_size);
        tracing::debug!(
            "Listing {}/{} page {} -> items {:?}",
            kind,
            slug,
            page,
            window
        );
        Some(items.drain(window).collect())
    }

    /// Total item count (not page count) of a registered category
    pub fn page_count(&self, kind: ContentKind, slug: &str) -> Option<usize> {
        self.category(kind, slug)?;
        Some(self.loader().count_valid(kind, slug))
    }

    /// A single item of a registered category
    pub fn get_item(&self, kind: ContentKind, category: &str, slug: &str) -> Option<ContentItem> {
        self.category(kind, category)?;
        self.load_one(kind, Some(category), slug)
    }

    /// A blog post stored directly under `content/blog`
    pub fn get_post(&self, slug: &str) -> Option<ContentItem> {
        self.load_one(ContentKind::Blog, None, slug)
    }

    fn load_one(
        &self,
        kind: ContentKind,
        category: Option<&str>,
        slug: &str,
    ) -> Option<ContentItem> {
        match self.loader().load_one(kind, category, slug) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!("Skipping content file: {}", e);
                None
            }
        }
    }

    /// Every item of a registered category plus the files that failed to load
    pub fn load_report(&self, kind: ContentKind, slug: &str) -> Option<LoadReport> {
        self.category(kind, slug)?;
        Some(self.loader().load_category(kind, slug))
    }
}

/// Number of pages needed for `count` items
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Index range of a 1-indexed page, clamped to `len`. Page 0 is empty.
pub fn page_window(len: usize, page: usize, page_size: usize) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// Sort newest first by `publishedAt`.
///
/// Only dated items move: they are reordered among the positions dated
/// items already occupy, undated items keep their index. Equal dates keep
/// their relative order.
pub fn sort_by_published(items: &mut [ContentItem]) {
    let slots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.metadata.published_at.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut dated: Vec<ContentItem> = slots.iter().map(|&i| items[i].clone()).collect();
    dated.sort_by(|a, b| b.metadata.published_at.cmp(&a.metadata.published_at));

    for (slot, item) in slots.into_iter().zip(dated) {
        items[slot] = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn item_file(title: &str, date: Option<&str>) -> String {
        let date = date
            .map(|d| format!("publishedAt: {}\n", d))
            .unwrap_or_default();
        format!(
            "---\ntitle: {}\ndescription: d\nimage: /i.png\n{}tags: python, Flask\n---\nBody\n",
            title, date
        )
    }

    fn catalog_with(files: &[(&str, &str, usize)]) -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        for (kind, category, count) in files {
            let cat_dir = dir.path().join(kind).join(category);
            fs::create_dir_all(&cat_dir).unwrap();
            for i in 0..*count {
                fs::write(
                    cat_dir.join(format!("item-{:02}.mdx", i)),
                    item_file(&format!("Item {}", i), None),
                )
                .unwrap();
            }
        }
        let catalog = Catalog::new(&SiteConfig::default(), dir.path().to_path_buf());
        (dir, catalog)
    }

    #[test]
    fn test_unknown_category_is_none() {
        let (_dir, catalog) = catalog_with(&[("project", "web-development", 2)]);
        for slug in ["nope", "", "../project", "WEB-DEVELOPMENT"] {
            assert!(catalog.list_page(ContentKind::Project, slug, 1).is_none());
            assert!(catalog.page_count(ContentKind::Project, slug).is_none());
        }
        // Registries are per kind
        assert!(catalog
            .list_page(ContentKind::Work, "web-development", 1)
            .is_none());
    }

    #[test]
    fn test_empty_known_category() {
        let (_dir, catalog) = catalog_with(&[]);
        assert_eq!(catalog.count_in_category(ContentKind::Project, "discord-bots"), 0);
        assert!(matches!(
            catalog.list_page(ContentKind::Project, "discord-bots", 1),
            Some(items) if items.is_empty()
        ));
        assert_eq!(catalog.page_count(ContentKind::Project, "discord-bots"), Some(0));
    }

    #[test]
    fn test_four_items_make_two_pages() {
        let (_dir, catalog) = catalog_with(&[("project", "web-development", 4)]);
        let count = catalog
            .page_count(ContentKind::Project, "web-development")
            .unwrap();
        assert_eq!(count, 4);
        assert_eq!(total_pages(count, catalog.page_size()), 2);

        let page1 = catalog
            .list_page(ContentKind::Project, "web-development", 1)
            .unwrap();
        let page2 = catalog
            .list_page(ContentKind::Project, "web-development", 2)
            .unwrap();
        let page3 = catalog
            .list_page(ContentKind::Project, "web-development", 3)
            .unwrap();
        assert_eq!(page1.len(), 3);
        assert_eq!(page2.len(), 1);
        assert!(page3.is_empty());
        assert!(3 > total_pages(count, catalog.page_size()));
    }

    #[test]
    fn test_pages_cover_every_item_once() {
        for n in [0usize, 1, 3, 5, 7, 9] {
            let (_dir, catalog) = catalog_with(&[("work", "freelance", n)]);
            let count = catalog.page_count(ContentKind::Work, "freelance").unwrap();
            let pages = total_pages(count, 3);

            let mut seen = HashSet::new();
            for page in 1..=pages {
                let items = catalog.list_page(ContentKind::Work, "freelance", page).unwrap();
                assert!(items.len() <= 3);
                if page < pages {
                    assert_eq!(items.len(), 3);
                }
                for item in items {
                    assert!(seen.insert(item.slug));
                }
            }
            assert_eq!(seen.len(), n);
        }
    }

    #[test]
    fn test_malformed_files_are_skipped() {
        let (dir, catalog) = catalog_with(&[("project", "minecraft-plugins", 2)]);
        let cat_dir = dir.path().join("project").join("minecraft-plugins");
        fs::write(cat_dir.join("bad.mdx"), "---\ndescription: no title\n---\n").unwrap();

        assert_eq!(
            catalog.count_in_category(ContentKind::Project, "minecraft-plugins"),
            2
        );
        assert_eq!(
            catalog
                .list_page(ContentKind::Project, "minecraft-plugins", 1)
                .unwrap()
                .len(),
            2
        );
        let report = catalog
            .load_report(ContentKind::Project, "minecraft-plugins")
            .unwrap();
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_get_item_and_post() {
        let (dir, catalog) = catalog_with(&[("project", "web-development", 1)]);
        let item = catalog
            .get_item(ContentKind::Project, "web-development", "item-00")
            .unwrap();
        assert_eq!(item.slug, "web-development/item-00");
        assert!(catalog
            .get_item(ContentKind::Project, "unknown", "item-00")
            .is_none());

        fs::create_dir_all(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog").join("hello.mdx"), item_file("Hi", None)).unwrap();
        assert_eq!(catalog.get_post("hello").unwrap().metadata.title, "Hi");
        assert!(catalog.get_post("missing").is_none());
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(4, 1, 3), 0..3);
        assert_eq!(page_window(4, 2, 3), 3..4);
        assert_eq!(page_window(4, 3, 3), 4..4);
        assert_eq!(page_window(4, 0, 3), 0..0);
        assert_eq!(page_window(4, usize::MAX, 3), 4..4);
        assert_eq!(total_pages(0, 3), 0);
        assert_eq!(total_pages(6, 3), 2);
        assert_eq!(total_pages(7, 3), 3);
    }

    #[test]
    fn test_sort_by_published_keeps_undated_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let cat_dir = dir.path().join("project").join("web-development");
        fs::create_dir_all(&cat_dir).unwrap();
        fs::write(cat_dir.join("a.mdx"), item_file("A", Some("2022-01-01"))).unwrap();
        fs::write(cat_dir.join("b.mdx"), item_file("B", None)).unwrap();
        fs::write(cat_dir.join("c.mdx"), item_file("C", Some("2024-06-01"))).unwrap();
        fs::write(cat_dir.join("d.mdx"), item_file("D", Some("2023-03-15"))).unwrap();

        let catalog = Catalog::new(&SiteConfig::default(), dir.path().to_path_buf());
        let mut items = catalog
            .load_report(ContentKind::Project, "web-development")
            .unwrap()
            .items;
        sort_by_published(&mut items);
        let titles: Vec<_> = items.iter().map(|i| i.metadata.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "D", "A"]);
    }
}
