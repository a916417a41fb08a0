//! Create a new content item

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::ContentKind;
use crate::Portfolio;

/// Front matter written into a new file
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    description: String,
    image: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    tags: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
}

/// Create `<content>/<kind>/<category>/<slug>.<ext>` and return its path
pub fn create_item(site: &Portfolio, kind: &str, category: &str, title: &str) -> Result<PathBuf> {
    let kind: ContentKind = kind.parse().map_err(anyhow::Error::msg)?;
    if !ContentKind::CATEGORIZED.contains(&kind) {
        anyhow::bail!("Only project and work items can be created");
    }

    let catalog = site.catalog();
    if catalog.category(kind, category).is_none() {
        let available: Vec<&str> = catalog
            .list_categories(kind)
            .iter()
            .map(|c| c.slug.as_str())
            .collect();
        anyhow::bail!(
            "Unknown {} category: {}. Available: {}",
            kind,
            category,
            available.join(", ")
        );
    }

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title must contain at least one letter or digit");
    }

    let target_dir = site.content_dir.join(kind.dir_name()).join(category);
    let file_path = target_dir.join(format!("{}.{}", slug, site.config.content_extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let scaffold = Scaffold {
        title,
        description: format!("A short description of {}.", title),
        image: format!("/img/{}/{}.png", kind.dir_name(), slug),
        published_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        tags: "",
        active: (kind == ContentKind::Project).then_some(true),
    };
    let front_matter = serde_yaml::to_string(&scaffold)?;
    let content = format!("---\n{}---\n\n# {}\n", front_matter, title);

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Portfolio, kind: &str, category: &str, title: &str) -> Result<()> {
    let path = create_item(site, kind, category, title)?;
    println!("Created: {:?}", path);
    Ok(())
}
