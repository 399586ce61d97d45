use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Memory category (§3): covers conversation turns, lessons, bookmarks,
/// and project context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryCategory {
    Conversation,
    Lesson,
    Note,
    Bookmark,
    Fact,
    Preference,
    Project,
    General,
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Conversation => "conversation",
            Self::Lesson => "lesson",
            Self::Note => "note",
            Self::Bookmark => "bookmark",
            Self::Fact => "fact",
            Self::Preference => "preference",
            Self::Project => "project",
            Self::General => "general",
        };
        write!(f, "{s}")
    }
}

impl FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conversation" => Ok(Self::Conversation),
            "lesson" => Ok(Self::Lesson),
            "note" => Ok(Self::Note),
            "bookmark" => Ok(Self::Bookmark),
            "fact" => Ok(Self::Fact),
            "preference" => Ok(Self::Preference),
            "project" => Ok(Self::Project),
            "general" => Ok(Self::General),
            other => Err(format!("unknown memory category: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMatch {
    pub id: i64,
    pub content: String,
    pub category: MemoryCategory,
    pub source: String,
    pub metadata: serde_json::Value,
    pub similarity: f32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_display_and_fromstr() {
        for cat in [
            MemoryCategory::Conversation,
            MemoryCategory::Lesson,
            MemoryCategory::Note,
            MemoryCategory::Bookmark,
            MemoryCategory::Fact,
            MemoryCategory::Preference,
            MemoryCategory::Project,
            MemoryCategory::General,
        ] {
            assert_eq!(cat.to_string().parse::<MemoryCategory>().unwrap(), cat);
        }
    }
}
