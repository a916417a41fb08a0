//! Validate every content file

use anyhow::Result;

use crate::catalog::Catalog;
use crate::content::ContentKind;
use crate::Portfolio;

/// Summary of a full content check
#[derive(Debug, Default)]
pub struct CheckSummary {
    pub valid: usize,
    pub failures: Vec<String>,
}

/// Load every category of every kind and collect the files that fail
pub fn check_catalog(catalog: &Catalog) -> CheckSummary {
    let mut summary = CheckSummary::default();

    for kind in ContentKind::CATEGORIZED {
        for category in catalog.list_categories(kind) {
            let Some(report) = catalog.load_report(kind, &category.slug) else {
                continue;
            };
            tracing::debug!(
                "{}/{}: {} valid, {} failed",
                kind,
                category.slug,
                report.items.len(),
                report.failures.len()
            );
            summary.valid += report.items.len();
            summary
                .failures
                .extend(report.failures.iter().map(|e| e.to_string()));
        }
    }

    summary
}

/// Run the check command; fails when any file is malformed
pub fn run(site: &Portfolio) -> Result<()> {
    let summary = check_catalog(&site.catalog());

    for failure in &summary.failures {
        println!("  {}", failure);
    }

    if !summary.failures.is_empty() {
        anyhow::bail!(
            "{} malformed content file(s), {} valid",
            summary.failures.len(),
            summary.valid
        );
    }

    println!("All {} content files are valid.", summary.valid);
    Ok(())
}
