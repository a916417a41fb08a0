//! Technology badges for content tags
//!
//! A tag string such as `"python, Flask, custom-tag"` is split into lowercase
//! tokens, and each token is looked up in a fixed registry of languages and
//! tools. Tokens the registry does not know become generic badges.

use serde::Serialize;

/// Whether a registered technology is a language or a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TechKind {
    Language,
    Tool,
}

/// A technology with a dedicated badge icon
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Technology {
    pub name: &'static str,
    pub icon: &'static str,
    pub kind: TechKind,
}

const fn tech(name: &'static str, icon: &'static str, kind: TechKind) -> Technology {
    Technology { name, icon, kind }
}

/// Known languages and tools, in display order
pub static REGISTRY: &[Technology] = &[
    tech("JavaScript", "/svg/javascript.svg", TechKind::Language),
    tech("TypeScript", "/svg/typescript.svg", TechKind::Language),
    tech("Python", "/svg/python.svg", TechKind::Language),
    tech("Java", "/svg/java.svg", TechKind::Language),
    tech("HTML", "/svg/html5.svg", TechKind::Language),
    tech("CSS", "/svg/css3.svg", TechKind::Language),
    tech("Node.js", "/svg/nodejs.svg", TechKind::Language),
    tech("Express.js", "/svg/expressjs.svg", TechKind::Tool),
    tech("React", "/svg/reactjs.svg", TechKind::Tool),
    tech("Next.js", "/svg/nextjs.svg", TechKind::Tool),
    tech("TailwindCSS", "/svg/tailwindcss.svg", TechKind::Tool),
    tech("Flask", "/svg/flask.svg", TechKind::Tool),
    tech("Appwrite", "/svg/appwrite.svg", TechKind::Tool),
    tech("Firebase", "/svg/firebase.svg", TechKind::Tool),
    tech("MySQL", "/svg/mysql.svg", TechKind::Tool),
    tech("SQLite", "/svg/sqlite.svg", TechKind::Tool),
    tech("Redis", "/svg/redis.svg", TechKind::Tool),
    tech("Postman", "/svg/postman.svg", TechKind::Tool),
    tech("Figma", "/svg/figma.svg", TechKind::Tool),
    tech("Zapier", "/svg/zapier.svg", TechKind::Tool),
];

/// Look up a technology by name, ignoring case
pub fn lookup(token: &str) -> Option<&'static Technology> {
    REGISTRY.iter().find(|t| t.name.eq_ignore_ascii_case(token.trim()))
}

/// A badge shown on a content card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Badge {
    Language(&'static Technology),
    Tool(&'static Technology),
    Generic { label: String },
}

impl Badge {
    /// Text shown on the badge
    pub fn label(&self) -> &str {
        match self {
            Badge::Language(t) | Badge::Tool(t) => t.name,
            Badge::Generic { label } => label,
        }
    }
}

/// Split a raw tag string into trimmed, lowercase, deduplicated tokens
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in raw.split(',') {
        let token = token.trim().to_lowercase();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Classify every token of a tag string, in token order
pub fn classify(raw: &str) -> Vec<Badge> {
    parse_tags(raw)
        .into_iter()
        .map(|token| match lookup(&token) {
            Some(t) if t.kind == TechKind::Language => Badge::Language(t),
            Some(t) => Badge::Tool(t),
            None => Badge::Generic { label: token },
        })
        .collect()
}

/// Badges grouped the way a project card shows them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BadgeSet {
    pub languages: Vec<&'static Technology>,
    pub tools: Vec<&'static Technology>,
    pub other: Vec<String>,
}

impl BadgeSet {
    /// Group a tag string. Languages and tools follow registry order,
    /// unmatched tokens keep their original order.
    pub fn from_tags(raw: &str) -> Self {
        let mut set = BadgeSet::default();
        for badge in classify(raw) {
            match badge {
                Badge::Language(t) => set.languages.push(t),
                Badge::Tool(t) => set.tools.push(t),
                Badge::Generic { label } => set.other.push(label),
            }
        }
        set.languages.sort_by_key(|t| registry_index(t));
        set.tools.sort_by_key(|t| registry_index(t));
        set
    }

    /// Every token as a generic badge, no classification
    pub fn generic(raw: &str) -> Self {
        BadgeSet {
            other: parse_tags(raw),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.tools.is_empty() && self.other.is_empty()
    }
}

fn registry_index(tech: &Technology) -> usize {
    REGISTRY
        .iter()
        .position(|t| std::ptr::eq(t, tech))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mixed_tags() {
        let badges = classify("python, Flask, custom-tag");
        assert_eq!(badges.len(), 3);
        assert!(matches!(badges[0], Badge::Language(t) if t.name == "Python"));
        assert!(matches!(badges[1], Badge::Tool(t) if t.name == "Flask"));
        assert_eq!(
            badges[2],
            Badge::Generic {
                label: "custom-tag".to_string()
            }
        );
    }

    #[test]
    fn test_parse_tags_dedupes_case_insensitively() {
        assert_eq!(
            parse_tags(" React ,react, REACT,, Node.js "),
            vec!["react", "node.js"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_badge_set_orders_by_registry() {
        let set = BadgeSet::from_tags("sqlite, typescript, redis, javascript, discord.js");
        let languages: Vec<_> = set.languages.iter().map(|t| t.name).collect();
        let tools: Vec<_> = set.tools.iter().map(|t| t.name).collect();
        assert_eq!(languages, vec!["JavaScript", "TypeScript"]);
        assert_eq!(tools, vec!["SQLite", "Redis"]);
        assert_eq!(set.other, vec!["discord.js"]);
    }

    #[test]
    fn test_unrecognized_tags_are_all_other() {
        let set = BadgeSet::from_tags("spigot, bukkit");
        assert!(set.languages.is_empty());
        assert!(set.tools.is_empty());
        assert_eq!(set.other, vec!["spigot", "bukkit"]);
    }

    #[test]
    fn test_generic_skips_registry() {
        let set = BadgeSet::generic("Python, Flask");
        assert!(set.languages.is_empty());
        assert_eq!(set.other, vec!["python", "flask"]);
        assert!(BadgeSet::generic("").is_empty());
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("NEXT.JS").map(|t| t.name), Some("Next.js"));
        assert_eq!(lookup("html").map(|t| t.kind), Some(TechKind::Language));
        assert!(lookup("rust").is_none());
        assert_eq!(Badge::Generic { label: "x".into() }.label(), "x");
    }
}
