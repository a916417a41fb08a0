//! Content item model

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::ItemMetadata;

/// Kind of content, one directory per kind under the content root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Project,
    Work,
    Blog,
}

impl ContentKind {
    /// Kinds that are organized in categories
    pub const CATEGORIZED: [ContentKind; 2] = [ContentKind::Project, ContentKind::Work];

    /// Directory name under the content root, also used as the URL prefix
    pub fn dir_name(self) -> &'static str {
        match self {
            ContentKind::Project => "project",
            ContentKind::Work => "work",
            ContentKind::Blog => "blog",
        }
    }

    /// Singular display noun
    pub fn noun(self) -> &'static str {
        match self {
            ContentKind::Project => "project",
            ContentKind::Work => "work",
            ContentKind::Blog => "post",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" | "projects" => Ok(ContentKind::Project),
            "work" | "works" => Ok(ContentKind::Work),
            "blog" | "post" | "posts" => Ok(ContentKind::Blog),
            other => Err(format!(
                "Unknown content kind: {}. Available: project, work, blog",
                other
            )),
        }
    }
}

/// A project, work or blog entry backed by one content file
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Category-qualified slug (`<category>/<file stem>`), or the file stem for blog posts
    pub slug: String,

    pub kind: ContentKind,

    /// Validated front-matter
    pub metadata: ItemMetadata,

    /// Rendered HTML body
    #[serde(rename = "source")]
    pub body_html: String,

    /// File the item was read from
    #[serde(skip)]
    pub path: PathBuf,
}

impl ContentItem {
    /// File stem part of the slug
    pub fn stem(&self) -> &str {
        self.slug.rsplit('/').next().unwrap_or(&self.slug)
    }
}
