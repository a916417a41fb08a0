//! Content loader - reads content files of one category directory

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{ContentItem, ContentKind, FrontMatterError, ItemMetadata, MarkdownRenderer};

/// Failure to load a single content file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

impl LoadError {
    /// File that failed to load
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::FrontMatter { path, .. } => path,
        }
    }
}

/// Items of a directory together with the files that could not be loaded
#[derive(Debug, Default)]
pub struct LoadReport {
    pub items: Vec<ContentItem>,
    pub failures: Vec<LoadError>,
}

/// Loads content from the content root
pub struct ContentLoader<'a> {
    root: &'a Path,
    extension: &'a str,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(root: &'a Path, extension: &'a str, renderer: &'a MarkdownRenderer) -> Self {
        Self {
            root,
            extension,
            renderer,
        }
    }

    /// Directory backing a category (`<root>/<kind>/<category>`)
    pub fn category_dir(&self, kind: ContentKind, category: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(category)
    }

    /// Content files directly inside `dir`, in file name order.
    /// A missing directory has no files.
    pub fn content_files(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.is_dir() {
            return Vec::new();
        }

        let files: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Failed to read entry in {:?}: {}", dir, e);
                    None
                }
            })
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && self.is_content_file(path))
            .collect();

        self.unique_stems(files)
    }

    /// One file per stem: `site.mdx` wins over `site.md`, in the same order
    /// `load_one` tries extensions. The others are logged and dropped.
    fn unique_stems(&self, files: Vec<PathBuf>) -> Vec<PathBuf> {
        let extensions = self.candidate_extensions();
        let rank = |path: &Path| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(|e| extensions.iter().position(|x| *x == e))
                .unwrap_or(usize::MAX)
        };

        let mut kept: Vec<PathBuf> = Vec::with_capacity(files.len());
        for path in files {
            let stem = file_stem(&path);
            match kept.iter().position(|k| file_stem(k) == stem) {
                Some(i) if rank(&path) < rank(&kept[i]) => {
                    tracing::warn!("{:?} is shadowed by {:?}", kept[i], path);
                    kept[i] = path;
                }
                Some(i) => tracing::warn!("{:?} is shadowed by {:?}", path, kept[i]),
                None => kept.push(path),
            }
        }
        kept
    }

    /// Load every item of a category, keeping the failures
    pub fn load_category(&self, kind: ContentKind, category: &str) -> LoadReport {
        let dir = self.category_dir(kind, category);
        let mut report = LoadReport::default();

        for path in self.content_files(&dir) {
            let slug = format!("{}/{}", category, file_stem(&path));
            match self.load_item(&path, kind, slug) {
                Ok(item) => report.items.push(item),
                Err(e) => report.failures.push(e),
            }
        }

        report
    }

    /// Load every item of a category, skipping (and logging) malformed files
    pub fn load_valid(&self, kind: ContentKind, category: &str) -> Vec<ContentItem> {
        let report = self.load_category(kind, category);
        for failure in &report.failures {
            tracing::warn!("Skipping content file: {}", failure);
        }
        report.items
    }

    /// Count the items of a category whose front-matter is valid.
    /// Bodies are not rendered.
    pub fn count_valid(&self, kind: ContentKind, category: &str) -> usize {
        let dir = self.category_dir(kind, category);
        self.content_files(&dir)
            .iter()
            .filter(|path| match read_metadata(path) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Skipping content file: {}", e);
                    false
                }
            })
            .count()
    }

    /// Load one item by file stem. `Ok(None)` when no such file exists.
    pub fn load_one(
        &self,
        kind: ContentKind,
        category: Option<&str>,
        stem: &str,
    ) -> Result<Option<ContentItem>, LoadError> {
        if !is_safe_segment(stem) {
            return Ok(None);
        }

        let dir = match category {
            Some(category) => self.category_dir(kind, category),
            None => self.root.join(kind.dir_name()),
        };

        let Some(path) = self
            .candidate_extensions()
            .into_iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|p| p.is_file())
        else {
            return Ok(None);
        };

        let slug = match category {
            Some(category) => format!("{}/{}", category, stem),
            None => stem.to_string(),
        };
        self.load_item(&path, kind, slug).map(Some)
    }

    /// Load a single item from a file
    fn load_item(
        &self,
        path: &Path,
        kind: ContentKind,
        slug: String,
    ) -> Result<ContentItem, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (metadata, body) =
            ItemMetadata::parse(&content).map_err(|source| LoadError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(ContentItem {
            slug,
            kind,
            metadata,
            body_html: self.renderer.render(body),
            path: path.to_path_buf(),
        })
    }

    fn candidate_extensions(&self) -> Vec<&str> {
        let mut extensions = vec![self.extension];
        extensions.extend(
            ["md", "markdown"]
                .into_iter()
                .filter(|ext| *ext != self.extension),
        );
        extensions
    }

    /// Check if a file carries a content extension
    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension || e == "md" || e == "markdown")
            .unwrap_or(false)
    }
}

fn read_metadata(path: &Path) -> Result<ItemMetadata, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ItemMetadata::parse(&content)
        .map(|(metadata, _)| metadata)
        .map_err(|source| LoadError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// A single path segment that cannot escape its directory
pub(crate) fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_file(title: &str) -> String {
        format!(
            "---\ntitle: {}\ndescription: About {}\nimage: /img/{}.png\n---\n\nBody of {}.\n",
            title, title, title, title
        )
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let cat = dir.path().join("project").join("web-development");
        fs::create_dir_all(&cat).unwrap();
        fs::write(cat.join("b-site.mdx"), item_file("B")).unwrap();
        fs::write(cat.join("a-site.mdx"), item_file("A")).unwrap();
        fs::write(cat.join("notes.txt"), "not content").unwrap();
        fs::write(cat.join("broken.mdx"), "no front matter here").unwrap();
        fs::create_dir_all(cat.join("nested")).unwrap();
        fs::write(cat.join("nested").join("deep.mdx"), item_file("Deep")).unwrap();
        dir
    }

    #[test]
    fn test_load_category_sorted_by_file_name() {
        let dir = setup();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(dir.path(), "mdx", &renderer);

        let report = loader.load_category(ContentKind::Project, "web-development");
        let slugs: Vec<_> = report.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["web-development/a-site", "web-development/b-site"]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path().ends_with("broken.mdx"));
        assert!(report.items[0].body_html.contains("<p>Body of A.</p>"));
        assert_eq!(report.items[0].stem(), "a-site");
    }

    #[test]
    fn test_same_stem_keeps_preferred_extension() {
        let dir = tempfile::tempdir().unwrap();
        let cat = dir.path().join("project").join("web-development");
        fs::create_dir_all(&cat).unwrap();
        fs::write(cat.join("site.md"), item_file("Markdown")).unwrap();
        fs::write(cat.join("site.mdx"), item_file("Mdx")).unwrap();
        fs::write(cat.join("site.markdown"), item_file("Long")).unwrap();
        fs::write(cat.join("zed.md"), item_file("Zed")).unwrap();

        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(dir.path(), "mdx", &renderer);

        let report = loader.load_category(ContentKind::Project, "web-development");
        let slugs: Vec<_> = report.items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["web-development/site", "web-development/zed"]);
        assert_eq!(report.items[0].metadata.title, "Mdx");
        assert_eq!(loader.count_valid(ContentKind::Project, "web-development"), 2);

        let one = loader
            .load_one(ContentKind::Project, Some("web-development"), "site")
            .unwrap()
            .unwrap();
        assert_eq!(one.path, report.items[0].path);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = setup();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(dir.path(), "mdx", &renderer);

        assert!(loader.load_valid(ContentKind::Work, "freelance").is_empty());
        assert_eq!(loader.count_valid(ContentKind::Work, "freelance"), 0);
        assert_eq!(loader.count_valid(ContentKind::Project, "web-development"), 2);
    }

    #[test]
    fn test_load_one() {
        let dir = setup();
        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(dir.path(), "mdx", &renderer);

        let item = loader
            .load_one(ContentKind::Project, Some("web-development"), "a-site")
            .unwrap()
            .unwrap();
        assert_eq!(item.metadata.title, "A");

        assert!(loader
            .load_one(ContentKind::Project, Some("web-development"), "missing")
            .unwrap()
            .is_none());
        assert!(loader
            .load_one(ContentKind::Project, Some("web-development"), "..")
            .unwrap()
            .is_none());
        assert!(loader
            .load_one(ContentKind::Project, Some("web-development"), "broken")
            .is_err());
    }

    #[test]
    fn test_blog_posts_live_at_kind_root() {
        let dir = tempfile::tempdir().unwrap();
        let blog = dir.path().join("blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(blog.join("hello.md"), item_file("Hello")).unwrap();

        let renderer = MarkdownRenderer::new();
        let loader = ContentLoader::new(dir.path(), "mdx", &renderer);
        let post = loader
            .load_one(ContentKind::Blog, None, "hello")
            .unwrap()
            .unwrap();
        assert_eq!(post.slug, "hello");
    }
}
