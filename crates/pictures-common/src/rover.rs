//! Rover identifiers exposed by the upstream imagery API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The rovers whose imagery the upstream service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rover {
    Curiosity,
    Opportunity,
    Spirit,
}

impl Rover {
    /// All known rovers, in the order they appear in error messages.
    pub const ALL: [Rover; 3] = [Rover::Curiosity, Rover::Opportunity, Rover::Spirit];

    /// Lowercase name used for cache keys and upstream URL segments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rover::Curiosity => "curiosity",
            Rover::Opportunity => "opportunity",
            Rover::Spirit => "spirit",
        }
    }

    /// Comma-separated list of valid rover names for error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(Rover::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Rover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rover {
    type Err = RoverParseError;

    /// Case-insensitive parse; `"Curiosity"` and `"curiosity"` both match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curiosity" => Ok(Rover::Curiosity),
            "opportunity" => Ok(Rover::Opportunity),
            "spirit" => Ok(Rover::Spirit),
            _ => Err(RoverParseError::UnknownRover(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum RoverParseError {
    #[error("Unknown rover: {0}")]
    UnknownRover(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Rover::from_str("curiosity").unwrap(), Rover::Curiosity);
        assert_eq!(Rover::from_str("Curiosity").unwrap(), Rover::Curiosity);
        assert_eq!(Rover::from_str("OPPORTUNITY").unwrap(), Rover::Opportunity);
        assert_eq!(Rover::from_str("sPiRiT").unwrap(), Rover::Spirit);
    }

    #[test]
    fn test_unknown_rover_is_rejected() {
        assert!(Rover::from_str("Zhurong").is_err());
        assert!(Rover::from_str("").is_err());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(Rover::Curiosity.to_string(), "curiosity");
        assert_eq!(Rover::Opportunity.as_str(), "opportunity");
    }

    #[test]
    fn test_valid_names_lists_all_rovers() {
        assert_eq!(Rover::valid_names(), "curiosity, opportunity, spirit");
    }
}
