//! portfolio-rs: a personal portfolio site server
//!
//! Projects and work entries are markdown files with YAML front matter,
//! grouped in a fixed set of categories and rendered with embedded Tera
//! templates. The server also relays contact messages to a webhook and
//! serves cached GitHub profile statistics.

pub mod badges;
pub mod cache;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod helpers;
pub mod server;
pub mod stats;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main application
#[derive(Clone)]
pub struct Portfolio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory
    pub content_dir: std::path::PathBuf,
    /// Static assets directory
    pub public_dir: std::path::PathBuf,
}

impl Portfolio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Catalog over this site's content directory
    pub fn catalog(&self) -> catalog::Catalog {
        catalog::Catalog::new(&self.config, self.content_dir.clone())
    }

    /// Run the server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }

    /// Create a new content file
    pub fn new_item(&self, kind: &str, category: &str, title: &str) -> Result<()> {
        commands::new::run(self, kind, category, title)
    }

    /// Validate every content file
    pub fn check(&self) -> Result<()> {
        commands::check::run(self)
    }
}
