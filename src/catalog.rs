//! Topic catalogs
//!
//! A catalog is the static list of curriculum topics one visualization
//! instance draws from. Order matters: circuit layout fills the grid in
//! catalog order and node ids are catalog indices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::Rgba;

/// 8-bit RGB color, parsed from `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` literal
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Same color with an alpha channel
    pub fn alpha(self, a: f32) -> Rgba {
        Rgba::from_rgb(self, a)
    }

    /// CSS hex form, e.g. `#06b6d4`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Circuit component kind. Drives node shape and which nodes may connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Processor,
    Memory,
    Network,
    Interface,
    Shield,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Processor,
        Category::Memory,
        Category::Network,
        Category::Interface,
        Category::Shield,
    ];

    /// Categories this one may be wired to
    pub fn compatible(self) -> &'static [Category] {
        use Category::*;
        match self {
            Processor => &[Memory, Interface],
            Memory => &[Processor, Network],
            Network => &[Interface, Shield],
            Interface => &[Processor, Shield],
            Shield => &[Network, Processor],
        }
    }

    /// Whether a connection may run from `self` to `other`. Directional:
    /// memory accepts network even though network does not list memory.
    pub fn accepts(self, other: Category) -> bool {
        self.compatible().contains(&other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Processor => "processor",
            Category::Memory => "memory",
            Category::Network => "network",
            Category::Interface => "interface",
            Category::Shield => "shield",
        }
    }
}

/// Difficulty tier used by the waterfall variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    /// 1-2 beginner, 3 intermediate, 4-5 advanced
    pub fn from_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=2 => Tier::Beginner,
            3 => Tier::Intermediate,
            _ => Tier::Advanced,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
        }
    }
}

/// Category tag carried by a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Category(Category),
    Tier(Tier),
}

impl Tag {
    pub fn category(self) -> Option<Category> {
        match self {
            Tag::Category(c) => Some(c),
            Tag::Tier(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Category(c) => c.as_str(),
            Tag::Tier(t) => t.as_str(),
        }
    }
}

impl From<Category> for Tag {
    fn from(c: Category) -> Self {
        Tag::Category(c)
    }
}

impl From<Tier> for Tag {
    fn from(t: Tier) -> Self {
        Tag::Tier(t)
    }
}

/// One curriculum topic
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub name: String,
    pub color: Rgb,
    pub tag: Tag,
    /// Importance (circuit) or difficulty (waterfall), 1..=5
    pub importance: u8,
}

impl Topic {
    pub fn new(name: impl Into<String>, color: Rgb, tag: impl Into<Tag>, importance: u8) -> Self {
        Self {
            name: name.into(),
            color,
            tag: tag.into(),
            importance: importance.clamp(1, 5),
        }
    }
}

/// Errors from loading a catalog description
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topic {topic:?} has invalid color {color:?}")]
    Color { topic: String, color: String },
}

#[derive(Debug, Deserialize)]
struct TopicEntry {
    color: String,
    #[serde(alias = "type")]
    category: Tag,
    #[serde(alias = "difficulty")]
    importance: u8,
}

/// Ordered topic list for one grade level
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub grade: u8,
    /// Theme color for grid and connection traces
    pub accent: Rgb,
    topics: Vec<Topic>,
}

const ACCENT_GRADE_10: Rgb = Rgb::new(6, 182, 212);
const ACCENT_GRADE_11: Rgb = Rgb::new(139, 92, 246);

impl Catalog {
    pub fn new(grade: u8, accent: Rgb, topics: Vec<Topic>) -> Self {
        Self {
            grade,
            accent,
            topics,
        }
    }

    /// Built-in circuit catalog. Grade 10 gets the ICT basics set, every
    /// other grade the advanced set.
    pub fn circuit(grade: u8) -> Self {
        use Category::*;
        let entries: &[(&str, u32, Category, u8)] = if grade == 10 {
            &[
                ("ICT Basics", 0x06b6d4, Processor, 5),
                ("Hardware", 0x3b82f6, Memory, 4),
                ("Operating Systems", 0x1e40af, Processor, 4),
                ("Input/Output", 0x0ea5e9, Interface, 3),
                ("Storage", 0x0284c7, Memory, 3),
                ("Networks", 0x0369a1, Network, 5),
                ("Internet", 0x075985, Network, 4),
                ("Communication", 0x0c4a6e, Interface, 3),
                ("Security", 0x164e63, Shield, 4),
            ]
        } else {
            &[
                ("Programming", 0x8b5cf6, Processor, 5),
                ("Algorithms", 0x7c3aed, Processor, 5),
                ("Databases", 0x6d28d9, Memory, 5),
                ("Web Dev", 0x5b21b6, Interface, 4),
                ("Analysis", 0x581c87, Processor, 5),
                ("Management", 0x4c1d95, Interface, 4),
                ("Advanced Security", 0xec4899, Shield, 5),
                ("Data Analytics", 0xdb2777, Memory, 5),
                ("Emerging Tech", 0xbe185d, Network, 5),
            ]
        };

        let topics = entries
            .iter()
            .map(|&(name, color, category, importance)| {
                Topic::new(name, Rgb::hex(color), category, importance)
            })
            .collect();

        Self::new(grade, accent_for(grade), topics)
    }

    /// Built-in waterfall catalog: the circuit topics retagged by difficulty tier
    pub fn waterfall(grade: u8) -> Self {
        let mut catalog = Self::circuit(grade);
        for topic in &mut catalog.topics {
            topic.tag = Tag::Tier(Tier::from_difficulty(topic.importance));
        }
        catalog
    }

    /// Load a catalog from a JSON object keyed by topic name:
    /// `{"Networks": {"color": "#0369a1", "category": "network", "importance": 5}}`
    pub fn from_json(grade: u8, json: &str) -> Result<Self, CatalogError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut topics = Vec::with_capacity(map.len());
        for (name, value) in map {
            let entry: TopicEntry = serde_json::from_value(value)?;
            let color = Rgb::parse(&entry.color).ok_or_else(|| CatalogError::Color {
                topic: name.clone(),
                color: entry.color.clone(),
            })?;
            topics.push(Topic::new(name, color, entry.category, entry.importance));
        }
        Ok(Self::new(grade, accent_for(grade), topics))
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Info line shown while a topic is hovered,
    /// e.g. `Networks - NETWORK MODULE (Level 5/5)`
    pub fn describe(&self, name: &str) -> Option<String> {
        self.find(name).map(|t| {
            format!(
                "{} - {} MODULE (Level {}/5)",
                t.name,
                t.tag.as_str().to_uppercase(),
                t.importance
            )
        })
    }
}

fn accent_for(grade: u8) -> Rgb {
    if grade == 10 {
        ACCENT_GRADE_10
    } else {
        ACCENT_GRADE_11
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parse() {
        assert_eq!(Rgb::parse("#06b6d4"), Some(Rgb::new(6, 182, 212)));
        assert_eq!(Rgb::parse("ec4899"), Some(Rgb::hex(0xec4899)));
        assert_eq!(Rgb::parse("#fff"), None);
        assert_eq!(Rgb::parse("#gg0000"), None);
        assert_eq!(Rgb::hex(0x0c4a6e).to_hex(), "#0c4a6e");
    }

    #[test]
    fn test_compatibility_matrix() {
        use Category::*;
        assert!(Processor.accepts(Memory));
        assert!(Network.accepts(Shield));
        assert!(Interface.accepts(Processor));
        // one-sided rules still wire the listing side
        assert!(Memory.accepts(Network));
        assert!(!Network.accepts(Memory));
        assert!(Network.accepts(Interface));
        assert!(Shield.accepts(Processor));
        assert!(!Processor.accepts(Shield));
        for a in Category::ALL {
            assert!(!a.accepts(a));
            assert_eq!(a.compatible().len(), 2);
        }
    }

    #[test]
    fn test_builtin_catalogs() {
        let g10 = Catalog::circuit(10);
        assert_eq!(g10.len(), 9);
        assert_eq!(g10.topics()[0].name, "ICT Basics");
        assert_eq!(g10.accent, Rgb::new(6, 182, 212));

        let g11 = Catalog::circuit(11);
        assert_eq!(g11.len(), 9);
        assert_eq!(
            g11.find("Advanced Security").map(|t| t.tag),
            Some(Tag::Category(Category::Shield))
        );
    }

    #[test]
    fn test_waterfall_tiers() {
        let catalog = Catalog::waterfall(10);
        let tier = |name: &str| catalog.find(name).map(|t| t.tag);
        assert_eq!(tier("ICT Basics"), Some(Tag::Tier(Tier::Advanced)));
        assert_eq!(tier("Storage"), Some(Tag::Tier(Tier::Intermediate)));
        assert_eq!(Tier::from_difficulty(1), Tier::Beginner);
    }

    #[test]
    fn test_from_json_preserves_order() {
        let json = r##"{
            "Zeta": {"color": "#112233", "category": "shield", "importance": 2},
            "Alpha": {"color": "#445566", "type": "memory", "importance": 9},
            "Mid": {"color": "#778899", "category": "advanced", "difficulty": 4}
        }"##;
        let catalog = Catalog::from_json(11, json).expect("valid catalog");
        let names: Vec<_> = catalog.topics().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
        // importance is clamped into 1..=5
        assert_eq!(catalog.topics()[1].importance, 5);
        assert_eq!(catalog.topics()[2].tag, Tag::Tier(Tier::Advanced));
    }

    #[test]
    fn test_from_json_rejects_bad_color() {
        let json = r#"{"Bad": {"color": "blue", "category": "memory", "importance": 3}}"#;
        assert!(matches!(
            Catalog::from_json(10, json),
            Err(CatalogError::Color { .. })
        ));
        assert!(matches!(
            Catalog::from_json(10, "not json"),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn test_describe() {
        let catalog = Catalog::circuit(10);
        assert_eq!(
            catalog.describe("Networks").as_deref(),
            Some("Networks - NETWORK MODULE (Level 5/5)")
        );
        assert_eq!(catalog.describe("Nope"), None);
    }
}
