use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Verification status of a listing as reported by the marketplace API.
///
/// Statuses only ever move forward along `Red -> Yellow -> Green`. Any value
/// the API sends that is not one of the three known statuses decodes to
/// [`VerificationStatus::Unknown`], which offers no actions at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Newly submitted or rejected. Initial state of every record.
    Red,
    /// Under administrative review.
    Yellow,
    /// Certified. Terminal.
    Green,
    #[serde(other)]
    Unknown,
}

const FROM_RED: &[VerificationStatus] = &[VerificationStatus::Yellow, VerificationStatus::Green];
const FROM_YELLOW: &[VerificationStatus] = &[VerificationStatus::Green];
const TERMINAL: &[VerificationStatus] = &[];

/// Ordered list of statuses `current` may legally move to next.
///
/// Unknown statuses are treated as terminal so an ambiguous record can never
/// enable a transition.
pub fn allowed_transitions(current: VerificationStatus) -> &'static [VerificationStatus] {
    match current {
        VerificationStatus::Red => FROM_RED,
        VerificationStatus::Yellow => FROM_YELLOW,
        VerificationStatus::Green | VerificationStatus::Unknown => TERMINAL,
    }
}

/// Membership test used to re-validate a target right before a mutation.
pub fn is_transition_allowed(from: VerificationStatus, to: VerificationStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

impl VerificationStatus {
    pub const ALL: [VerificationStatus; 3] = [
        VerificationStatus::Red,
        VerificationStatus::Yellow,
        VerificationStatus::Green,
    ];

    /// Position in the review order, `None` for unrecognized values.
    pub fn rank(self) -> Option<u8> {
        match self {
            VerificationStatus::Red => Some(0),
            VerificationStatus::Yellow => Some(1),
            VerificationStatus::Green => Some(2),
            VerificationStatus::Unknown => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        allowed_transitions(self).is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Red => "RED",
            VerificationStatus::Yellow => "YELLOW",
            VerificationStatus::Green => "GREEN",
            VerificationStatus::Unknown => "UNKNOWN",
        }
    }

    /// Short human label used by the admin listings.
    pub fn label(self) -> &'static str {
        match self {
            VerificationStatus::Red => "Unverified",
            VerificationStatus::Yellow => "Under review",
            VerificationStatus::Green => "Certified",
            VerificationStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized verification status '{0}' (expected red, yellow or green)")]
pub struct ParseStatusError(pub String);

impl FromStr for VerificationStatus {
    type Err = ParseStatusError;

    /// Parses user input. Only the three real statuses are accepted; `Unknown`
    /// can never be requested as a target.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RED" => Ok(VerificationStatus::Red),
            "YELLOW" => Ok(VerificationStatus::Yellow),
            "GREEN" => Ok(VerificationStatus::Green),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_red_offers_yellow_then_green() {
        assert_eq!(
            allowed_transitions(VerificationStatus::Red),
            &[VerificationStatus::Yellow, VerificationStatus::Green]
        );
    }

    #[test]
    fn test_yellow_offers_only_green() {
        assert_eq!(
            allowed_transitions(VerificationStatus::Yellow),
            &[VerificationStatus::Green]
        );
    }

    #[test]
    fn test_green_and_unknown_are_terminal() {
        assert!(allowed_transitions(VerificationStatus::Green).is_empty());
        assert!(allowed_transitions(VerificationStatus::Unknown).is_empty());
        assert!(VerificationStatus::Green.is_terminal());
        assert!(VerificationStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_backward_moves_rejected() {
        assert!(!is_transition_allowed(VerificationStatus::Green, VerificationStatus::Yellow));
        assert!(!is_transition_allowed(VerificationStatus::Green, VerificationStatus::Red));
        assert!(!is_transition_allowed(VerificationStatus::Yellow, VerificationStatus::Red));
        assert!(!is_transition_allowed(VerificationStatus::Red, VerificationStatus::Red));
        assert!(is_transition_allowed(VerificationStatus::Red, VerificationStatus::Green));
    }

    #[test]
    fn test_wire_format() {
        let parsed: VerificationStatus = serde_json::from_str("\"YELLOW\"").unwrap();
        assert_eq!(parsed, VerificationStatus::Yellow);

        let odd: VerificationStatus = serde_json::from_str("\"PURPLE\"").unwrap();
        assert_eq!(odd, VerificationStatus::Unknown);

        // lowercase is not a value the API emits
        let lower: VerificationStatus = serde_json::from_str("\"green\"").unwrap();
        assert_eq!(lower, VerificationStatus::Unknown);

        assert_eq!(serde_json::to_string(&VerificationStatus::Green).unwrap(), "\"GREEN\"");
    }

    #[test]
    fn test_parse_user_input() {
        assert_eq!("yellow".parse::<VerificationStatus>(), Ok(VerificationStatus::Yellow));
        assert_eq!(" Green ".parse::<VerificationStatus>(), Ok(VerificationStatus::Green));
        assert!("unknown".parse::<VerificationStatus>().is_err());
        assert!("".parse::<VerificationStatus>().is_err());
    }
}
