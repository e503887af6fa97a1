//! Split module - the two record collections of a project

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which collection of a project a record belongs to
///
/// Train and validation are independent id spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training examples
    Train,

    /// Validation examples
    #[serde(alias = "val")]
    Validation,
}

impl Split {
    /// Both splits, in display order
    pub const ALL: [Split; 2] = [Split::Train, Split::Validation];

    /// Get the split name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "val",
        }
    }

    /// File name the split is persisted under inside a project directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Split::Train => "train_data.json",
            Split::Validation => "val_data.json",
        }
    }
}

impl FromStr for Split {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train" | "training" => Ok(Split::Train),
            "val" | "validation" => Ok(Split::Validation),
            other => Err(DomainError::UnknownSplit(other.to_string())),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
