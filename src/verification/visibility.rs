use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::status::VerificationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// The only other reachable visibility.
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::Public,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized visibility '{0}' (expected public or private)")]
pub struct ParseVisibilityError(pub String);

impl FromStr for Visibility {
    type Err = ParseVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Visibility::Public),
            "PRIVATE" => Ok(Visibility::Private),
            _ => Err(ParseVisibilityError(s.to_string())),
        }
    }
}

/// Visibility can only be changed on certified listings.
pub fn visibility_change_allowed(status: VerificationStatus) -> bool {
    matches!(status, VerificationStatus::Green)
}

/// Target offered by the visibility control, if the control is enabled.
pub fn visibility_target(status: VerificationStatus, current: Visibility) -> Option<Visibility> {
    visibility_change_allowed(status).then(|| current.toggled())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_opens_only_for_green() {
        assert!(visibility_change_allowed(VerificationStatus::Green));
        assert!(!visibility_change_allowed(VerificationStatus::Yellow));
        assert!(!visibility_change_allowed(VerificationStatus::Red));
        assert!(!visibility_change_allowed(VerificationStatus::Unknown));
    }

    #[test]
    fn test_target_is_complement() {
        assert_eq!(
            visibility_target(VerificationStatus::Green, Visibility::Public),
            Some(Visibility::Private)
        );
        assert_eq!(
            visibility_target(VerificationStatus::Green, Visibility::Private),
            Some(Visibility::Public)
        );
        assert_eq!(visibility_target(VerificationStatus::Yellow, Visibility::Private), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("public".parse::<Visibility>(), Ok(Visibility::Public));
        assert!("hidden".parse::<Visibility>().is_err());
    }
}
