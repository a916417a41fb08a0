//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog::{Category, CategoryImage};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub tagline: String,
    pub description: String,
    pub url: String,
    pub skills: Vec<String>,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub content_extension: String,

    // Pagination
    pub per_page: usize,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            author: "Anthony".to_string(),
            tagline: "Full-stack developer".to_string(),
            description: "I build websites, bots and plugins.".to_string(),
            url: "http://localhost:3000".to_string(),
            skills: Vec::new(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            content_extension: "mdx".to_string(),

            per_page: 3,

            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
            contact: ContactConfig::default(),
            stats: StatsConfig::default(),
            categories: CategoriesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        if config.per_page == 0 {
            tracing::warn!("per_page must be at least 1, falling back to 3");
            config.per_page = 3;
        }
        Ok(config)
    }

    /// Page size used by every listing
    pub fn page_size(&self) -> usize {
        self.per_page.max(1)
    }
}

/// Syntax highlighting themes (syntect theme names)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            light_theme: "InspiredGitHub".to_string(),
            dark_theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Contact relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Webhook receiving contact messages. `DISCORD_WEBHOOK_URL` takes precedence.
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub limits: FieldLimits,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            rate_limit: RateLimitConfig::default(),
            limits: FieldLimits::default(),
        }
    }
}

impl ContactConfig {
    /// Resolve the webhook URL, preferring the environment
    pub fn resolve_webhook_url(&self) -> Option<String> {
        std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.webhook_url.clone().filter(|s| !s.trim().is_empty()))
    }
}

/// Fixed-window rate limit for the contact endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 50,
            window_secs: 60,
        }
    }
}

/// Per-field character limits for contact submissions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub name: usize,
    pub email: usize,
    pub reason: usize,
    pub exact_reason: usize,
    pub message: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            name: 125,
            email: 250,
            reason: 50,
            exact_reason: 250,
            message: 8 * 1024 * 1024,
        }
    }
}

impl FieldLimits {
    /// Largest JSON body that can still hold every field at its limit.
    /// A `\uXXXX` escape takes six bytes per character.
    pub fn max_body_bytes(&self) -> usize {
        let chars = self.name + self.email + self.reason + self.exact_reason + self.message;
        chars.saturating_mul(6).saturating_add(16 * 1024)
    }
}

/// Upstream profile statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub github_user: String,
    pub api_base: String,
    pub ttl_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            github_user: "Anthony01M".to_string(),
            api_base: "https://api.github.com".to_string(),
            ttl_secs: 4 * 60 * 60,
        }
    }
}

/// Category registries per content kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoriesConfig {
    pub project: Vec<Category>,
    pub work: Vec<Category>,
}

impl Default for CategoriesConfig {
    fn default() -> Self {
        Self {
            project: vec![
                category(
                    "web-development",
                    "Web Development",
                    "I build websites and web applications using modern tools and technologies.",
                    "/img/project/web-development.png",
                ),
                category(
                    "minecraft-plugins",
                    "Minecraft Plugins",
                    "I develop custom plugins for Minecraft servers using basic and advanced frameworks.",
                    "/img/project/minecraft-plugins.png",
                ),
                category(
                    "discord-bots",
                    "Discord Bots",
                    "I develop custom bots for Discord servers using Discord.js, Discord.py, JDA and other libraries.",
                    "/img/project/discord-bots.png",
                ),
            ],
            work: vec![
                category(
                    "freelance",
                    "Freelance",
                    "Client work delivered end to end, from the first sketch to deployment.",
                    "/img/work/freelance.png",
                ),
                category(
                    "open-source",
                    "Open Source",
                    "Contributions to community projects and libraries.",
                    "/img/work/open-source.png",
                ),
                category(
                    "commissions",
                    "Commissions",
                    "Custom plugins and bots built to order for communities.",
                    "/img/work/commissions.png",
                ),
            ],
        }
    }
}

fn category(slug: &str, title: &str, description: &str, image: &str) -> Category {
    Category {
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: CategoryImage {
            src: image.to_string(),
            alt: title.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.per_page, 3);
        assert_eq!(config.content_extension, "mdx");
        assert_eq!(config.contact.rate_limit.max_requests, 50);
        assert_eq!(config.contact.limits.name, 125);
        assert_eq!(config.stats.ttl_secs, 14_400);
        assert_eq!(config.categories.project.len(), 3);
        assert_eq!(config.categories.project[0].slug, "web-development");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
per_page: 6
server:
  port: 8080
contact:
  rate_limit:
    max_requests: 5
categories:
  work:
    - slug: agency
      title: Agency
      description: Agency work
      image:
        src: /img/work/agency.png
        alt: Agency
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.per_page, 6);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert_eq!(config.contact.rate_limit.max_requests, 5);
        assert_eq!(config.contact.rate_limit.window_secs, 60);
        // Untouched registries keep their defaults
        assert_eq!(config.categories.project.len(), 3);
        assert_eq!(config.categories.work.len(), 1);
        assert_eq!(config.categories.work[0].slug, "agency");
    }

    #[test]
    fn test_body_limit_covers_field_limits() {
        let limits = FieldLimits::default();
        assert!(limits.max_body_bytes() > 4 * limits.message);

        let small = FieldLimits {
            name: 1,
            email: 1,
            reason: 1,
            exact_reason: 1,
            message: 1,
        };
        assert_eq!(small.max_body_bytes(), 30 + 16 * 1024);
    }

    #[test]
    fn test_zero_per_page_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        std::fs::write(&path, "per_page: 0\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.page_size(), 3);
    }
}
