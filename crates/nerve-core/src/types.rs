use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NerveError, Result};

/// Longest entry the store accepts, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// One of the two fixed content pools.
///
/// This is the only thing ever interpolated into SQL, so the set of table
/// names is closed at the type level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Truths,
    Dares,
}

impl Partition {
    pub fn all() -> &'static [Partition] {
        &[Partition::Truths, Partition::Dares]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Partition::Truths => "truths",
            Partition::Dares => "dares",
        }
    }

    /// SQL table backing this partition.
    pub fn table(self) -> &'static str {
        self.as_str()
    }

    pub fn singular(self) -> &'static str {
        match self {
            Partition::Truths => "truth",
            Partition::Dares => "dare",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Partition {
    type Err = NerveError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "truths" | "truth" => Ok(Partition::Truths),
            "dares" | "dare" => Ok(Partition::Dares),
            _ => Err(NerveError::InvalidPartition(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub content: String,
}

/// Trim `raw` and check it is storable.
///
/// Returns the trimmed text; empty, whitespace-only or over-long input is
/// `InvalidContent`.
pub fn validate_content(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(NerveError::InvalidContent);
    }
    Ok(trimmed.to_string())
}
