//! Target publishing platforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Publishing platform a project targets.
///
/// Drives the suitability filter: vertical-preferred platforms reject
/// strongly horizontal video candidates before download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Tiktok,
    Instagram,
}

/// Coarse aspect-ratio preference of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectClass {
    Horizontal,
    Vertical,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Instagram => "instagram",
        }
    }

    /// Preferred aspect class for this platform's typical output.
    pub fn aspect_class(&self) -> AspectClass {
        match self {
            Platform::Youtube => AspectClass::Horizontal,
            Platform::Tiktok | Platform::Instagram => AspectClass::Vertical,
        }
    }

    /// Whether the platform prefers vertical (portrait) output.
    pub fn prefers_vertical(&self) -> bool {
        self.aspect_class() == AspectClass::Vertical
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "instagram" => Ok(Platform::Instagram),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}
