//! The Mars rovers shown by the viewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A Mars rover with a photo gallery.
///
/// The declaration order is the routing precedence: when a hash could
/// match more than one rover, the earliest variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    /// Mars Science Laboratory, landed 2012.
    Curiosity,
    /// Mars Exploration Rover B, landed 2004.
    Opportunity,
    /// Mars Exploration Rover A, landed 2004.
    Spirit,
}

impl Rover {
    /// Every rover, in routing precedence order.
    pub const ALL: [Self; 3] = [Self::Curiosity, Self::Opportunity, Self::Spirit];

    /// Lower-case key used in URL hashes, proxy paths and `roversData`.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Curiosity => "curiosity",
            Self::Opportunity => "opportunity",
            Self::Spirit => "spirit",
        }
    }

    /// Display name as stored in the `rovers` list of the client state.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Curiosity => "Curiosity",
            Self::Opportunity => "Opportunity",
            Self::Spirit => "Spirit",
        }
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Rover {
    type Err = ParseRoverError;

    /// Parse a rover from its key or display name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rover| rover.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRoverError(s.to_owned()))
    }
}

/// Returned when a string names no known rover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rover: {0}")]
pub struct ParseRoverError(pub String);
