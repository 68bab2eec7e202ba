use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvigilError;

/// Category of proctoring violation reported by the judge model.
///
/// The wire form is SCREAMING_SNAKE_CASE, matching what the fine-tuned
/// model is trained to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagType {
    /// A mobile phone is visible or in use.
    PhoneDetected,
    /// Books, notes, or other disallowed materials in frame.
    UnauthorizedObject,
    /// A second person is visible.
    AnotherPerson,
    /// An additional display is visible.
    SecondaryMonitor,
    /// Anything else, including clean frames.
    Other,
}

impl FlagType {
    /// All known flag types, in wire order.
    pub const ALL: [FlagType; 5] = [
        Self::PhoneDetected,
        Self::UnauthorizedObject,
        Self::AnotherPerson,
        Self::SecondaryMonitor,
        Self::Other,
    ];
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhoneDetected => write!(f, "PHONE_DETECTED"),
            Self::UnauthorizedObject => write!(f, "UNAUTHORIZED_OBJECT"),
            Self::AnotherPerson => write!(f, "ANOTHER_PERSON"),
            Self::SecondaryMonitor => write!(f, "SECONDARY_MONITOR"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

impl FromStr for FlagType {
    type Err = InvigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHONE_DETECTED" => Ok(Self::PhoneDetected),
            "UNAUTHORIZED_OBJECT" => Ok(Self::UnauthorizedObject),
            "ANOTHER_PERSON" => Ok(Self::AnotherPerson),
            "SECONDARY_MONITOR" => Ok(Self::SecondaryMonitor),
            "OTHER" => Ok(Self::Other),
            other => Err(InvigilError::UnknownFlagType(other.to_string())),
        }
    }
}

/// The structured verdict the judge model produces for a single webcam frame.
///
/// Generated once per inference call and consumed by an external decision
/// layer. When `violation` is false the record still carries `flag_type` and
/// `confidence`, treated as low-signal (confidence near 0, flag `OTHER`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// True iff any cheating indicator was found in the frame.
    pub violation: bool,

    /// Free-text justification. Non-empty whenever `violation` is true.
    pub reason: String,

    /// Confidence score in `[0.0, 1.0]`.
    pub confidence: f32,

    /// Violation category.
    pub flag_type: FlagType,
}

impl Verdict {
    /// Creates a violation verdict.
    ///
    /// Confidence is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn violation(reason: impl Into<String>, confidence: f32, flag_type: FlagType) -> Self {
        Self {
            violation: true,
            reason: reason.into(),
            confidence: confidence.clamp(0.0, 1.0),
            flag_type,
        }
    }

    /// Creates a clean-frame verdict (`violation: false`, flag `OTHER`).
    #[must_use]
    pub fn clean(reason: impl Into<String>, confidence: f32) -> Self {
        Self {
            violation: false,
            reason: reason.into(),
            confidence: confidence.clamp(0.0, 1.0),
            flag_type: FlagType::Other,
        }
    }

    /// Checks the invariants the external decision layer relies on.
    ///
    /// # Errors
    ///
    /// Returns `InvigilError::ConfidenceOutOfRange` or
    /// `InvigilError::EmptyReason` when a field violates the contract.
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) || !self.confidence.is_finite() {
            return Err(InvigilError::ConfidenceOutOfRange(self.confidence));
        }
        if self.violation && self.reason.trim().is_empty() {
            return Err(InvigilError::EmptyReason);
        }
        Ok(())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Verdict({}, {}, conf={:.2})",
            if self.violation { "VIOLATION" } else { "clean" },
            self.flag_type,
            self.confidence
        )
    }
}
