use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The eight portfolio content tables. Variants serialize as their SQL table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTable {
    PersonalInfo,
    AboutInfo,
    Experiences,
    Projects,
    Education,
    Certificates,
    Achievements,
    SocialLinks,
}

impl ContentTable {
    pub const ALL: [ContentTable; 8] = [
        ContentTable::PersonalInfo,
        ContentTable::AboutInfo,
        ContentTable::Experiences,
        ContentTable::Projects,
        ContentTable::Education,
        ContentTable::Certificates,
        ContentTable::Achievements,
        ContentTable::SocialLinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentTable::PersonalInfo => "personal_info",
            ContentTable::AboutInfo => "about_info",
            ContentTable::Experiences => "experiences",
            ContentTable::Projects => "projects",
            ContentTable::Education => "education",
            ContentTable::Certificates => "certificates",
            ContentTable::Achievements => "achievements",
            ContentTable::SocialLinks => "social_links",
        }
    }
}

impl fmt::Display for ContentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTable(pub String);

impl fmt::Display for UnknownTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown content table '{}'", self.0)
    }
}

impl std::error::Error for UnknownTable {}

impl FromStr for ContentTable {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ContentTable::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| UnknownTable(needle.to_string()))
    }
}
