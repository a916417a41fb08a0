//! Content module - content files, front-matter and markdown rendering

mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use frontmatter::{FrontMatterError, ItemMetadata, Links};
pub use item::{ContentItem, ContentKind};
pub use loader::{ContentLoader, LoadError, LoadReport};
pub use markdown::MarkdownRenderer;
