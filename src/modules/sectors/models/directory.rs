use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::sector::Sector;

/// Named entities that own monthly income rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    Tenants,
    Events,
}

impl DirectoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryKind::Tenants => "tenants",
            DirectoryKind::Events => "events",
        }
    }

    /// Sector whose rows reference this directory
    pub fn sector(&self) -> Sector {
        match self {
            DirectoryKind::Tenants => Sector::Tenants,
            DirectoryKind::Events => Sector::Events,
        }
    }

    pub fn for_sector(sector: Sector) -> Option<Self> {
        match sector {
            Sector::Tenants => Some(DirectoryKind::Tenants),
            Sector::Events => Some(DirectoryKind::Events),
            _ => None,
        }
    }
}

impl fmt::Display for DirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tenants" => Ok(DirectoryKind::Tenants),
            "events" => Ok(DirectoryKind::Events),
            other => Err(format!("Unknown directory: {}", other)),
        }
    }
}

/// A tenant or an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
