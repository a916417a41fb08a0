//! List site content

use anyhow::Result;

use crate::badges;
use crate::catalog::{sort_by_published, Catalog};
use crate::content::{ContentItem, ContentKind};
use crate::Portfolio;

/// List categories with their item counts, or the items of one category
pub fn run(site: &Portfolio, kind: Option<&str>, category: Option<&str>) -> Result<()> {
    let catalog = site.catalog();

    let kinds = match kind {
        Some(kind) => vec![kind.parse::<ContentKind>().map_err(anyhow::Error::msg)?],
        None => ContentKind::CATEGORIZED.to_vec(),
    };

    if let (Some(category), [kind]) = (category, kinds.as_slice()) {
        return list_items(&catalog, *kind, category);
    }

    for kind in &kinds {
        list_categories(&catalog, *kind);
    }
    Ok(())
}

fn list_categories(catalog: &Catalog, kind: ContentKind) {
    let categories = catalog.list_categories(kind);
    println!("{} categories ({}):", kind, categories.len());
    for category in categories {
        println!(
            "  {} - {} ({})",
            category.slug,
            category.title,
            catalog.count_in_category(kind, &category.slug)
        );
    }
}

fn list_items(catalog: &Catalog, kind: ContentKind, category: &str) -> Result<()> {
    let Some(report) = catalog.load_report(kind, category) else {
        anyhow::bail!("Unknown {} category: {}", kind, category);
    };

    let mut items = report.items;
    sort_by_published(&mut items);

    println!("{}/{} ({}):", kind, category, items.len());
    for item in &items {
        println!("  {}", item_line(item));
    }

    for failure in &report.failures {
        tracing::warn!("Skipped {}", failure);
    }

    Ok(())
}

/// `2024-06-01 portfolio - Portfolio Website [React, TypeScript, custom]`
fn item_line(item: &ContentItem) -> String {
    let date = item
        .metadata
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let tags: Vec<String> = badges::classify(item.metadata.tags.as_deref().unwrap_or(""))
        .iter()
        .map(|b| b.label().to_string())
        .collect();
    format!(
        "{} {} - {} [{}]",
        date,
        item.stem(),
        item.metadata.title,
        tags.join(", ")
    )
}
