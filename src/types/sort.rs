use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::ViewError;

/// Direction applied on top of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }

    pub fn toggled(&self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(SortDirection::Ascending),
            "descending" => Ok(SortDirection::Descending),
            other => Err(ViewError::UnknownDirection(other.to_string())),
        }
    }
}

/// Key used to order tabs inside a device group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "lastViewed")]
    LastViewed,
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "domain")]
    Domain,
    #[serde(rename = "tabPosition", alias = "position")]
    Position,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::LastViewed,
        SortOrder::Title,
        SortOrder::Domain,
        SortOrder::Position,
    ];

    /// Raw value used for persistence and over RPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::LastViewed => "lastViewed",
            SortOrder::Title => "title",
            SortOrder::Domain => "domain",
            SortOrder::Position => "tabPosition",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::LastViewed => "Last Viewed",
            SortOrder::Title => "Title",
            SortOrder::Domain => "Domain",
            SortOrder::Position => "Tab Position",
        }
    }

    /// Most recent first for `LastViewed`, A-Z / lowest position first otherwise.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortOrder::LastViewed => SortDirection::Descending,
            SortOrder::Title | SortOrder::Domain | SortOrder::Position => {
                SortDirection::Ascending
            }
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Position
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lastViewed" => Ok(SortOrder::LastViewed),
            "title" => Ok(SortOrder::Title),
            "domain" => Ok(SortOrder::Domain),
            "tabPosition" | "position" => Ok(SortOrder::Position),
            other => Err(ViewError::UnknownSortKey(other.to_string())),
        }
    }
}
