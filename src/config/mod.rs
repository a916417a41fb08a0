//! Configuration module

mod site;

pub use site::CategoriesConfig;
pub use site::ContactConfig;
pub use site::FieldLimits;
pub use site::HighlightConfig;
pub use site::RateLimitConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::StatsConfig;
