//! Disposition outcomes and the candidate status machine.
//!
//! A disposition is the human-reported outcome of a contact attempt. The
//! mapping to candidate status is exhaustive — anything outside the five
//! known strings is rejected before any store access:
//!
//! | disposition | status | validates the number? |
//! |-------------|--------|-----------------------|
//! | `wrong_number` | `failed` | no |
//! | `disconnected` | `failed` | no |
//! | `no_answer` | `failed` | no |
//! | `connected_good` | `verified` | yes |
//! | `positive_interaction` | `verified` | yes, with the stronger flag |
//!
//! Both `failed` and `verified` are terminal only in the sense that the
//! selector never offers them again; a later call for the same number
//! re-runs the mapping and overwrites the stored status.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Human-reported outcome of a contact attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    WrongNumber,
    Disconnected,
    NoAnswer,
    ConnectedGood,
    PositiveInteraction,
}

impl FromStr for Disposition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wrong_number" => Ok(Disposition::WrongNumber),
            "disconnected" => Ok(Disposition::Disconnected),
            "no_answer" => Ok(Disposition::NoAnswer),
            "connected_good" => Ok(Disposition::ConnectedGood),
            "positive_interaction" => Ok(Disposition::PositiveInteraction),
            _ => Err(CoreError::Validation("Invalid disposition".to_string())),
        }
    }
}

impl Disposition {
    /// The candidate status this disposition transitions to.
    pub fn outcome(self) -> CandidateStatus {
        match self {
            Disposition::WrongNumber | Disposition::Disconnected | Disposition::NoAnswer => {
                CandidateStatus::Failed
            }
            Disposition::ConnectedGood | Disposition::PositiveInteraction => {
                CandidateStatus::Verified
            }
        }
    }

    /// True for the success outcomes that write a validated-phone record.
    pub fn verifies(self) -> bool {
        self.outcome() == CandidateStatus::Verified
    }

    /// True only for the stronger of the two success outcomes.
    pub fn positive_interaction(self) -> bool {
        matches!(self, Disposition::PositiveInteraction)
    }
}

/// Trial status of a candidate number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Untested,
    Failed,
    Verified,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Untested => "untested",
            CandidateStatus::Failed => "failed",
            CandidateStatus::Verified => "verified",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_dispositions_map_to_failed() {
        for s in ["wrong_number", "disconnected", "no_answer"] {
            let d: Disposition = s.parse().unwrap();
            assert_eq!(d.outcome(), CandidateStatus::Failed, "{}", s);
            assert!(!d.verifies(), "{}", s);
            assert!(!d.positive_interaction(), "{}", s);
        }
    }

    #[test]
    fn success_dispositions_map_to_verified() {
        for s in ["connected_good", "positive_interaction"] {
            let d: Disposition = s.parse().unwrap();
            assert_eq!(d.outcome(), CandidateStatus::Verified, "{}", s);
            assert!(d.verifies(), "{}", s);
        }
    }

    #[test]
    fn only_positive_interaction_sets_the_flag() {
        assert!(Disposition::PositiveInteraction.positive_interaction());
        assert!(!Disposition::ConnectedGood.positive_interaction());
    }

    #[test]
    fn unknown_dispositions_are_rejected() {
        for s in ["maybe", "", "WRONG_NUMBER", "connected", "no-answer"] {
            let err = s.parse::<Disposition>().unwrap_err();
            assert!(
                matches!(err, CoreError::Validation(_)),
                "'{}' should be a validation error",
                s
            );
        }
    }

    #[test]
    fn status_round_trips_through_as_str() {
        assert_eq!(CandidateStatus::Untested.as_str(), "untested");
        assert_eq!(CandidateStatus::Failed.as_str(), "failed");
        assert_eq!(CandidateStatus::Verified.as_str(), "verified");
        assert_eq!(CandidateStatus::Verified.to_string(), "verified");
    }
}
