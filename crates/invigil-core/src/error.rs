use thiserror::Error;

/// Errors that can occur during Invigil core operations.
#[derive(Debug, Error)]
pub enum InvigilError {
    /// The input string is empty or contains only whitespace.
    #[error("input is empty or whitespace-only")]
    EmptyInput,

    /// No JSON object could be located in the judge response.
    #[error("no JSON object found in judge output: {input:?}")]
    NoJsonObject {
        /// The raw response that contained no object.
        input: String,
    },

    /// The judge response held JSON that does not match the verdict schema.
    #[error("malformed verdict JSON: {0}")]
    MalformedVerdict(#[from] serde_json::Error),

    /// The confidence field is outside `[0.0, 1.0]`.
    #[error("confidence {0} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange(f32),

    /// A violation verdict carried an empty reason.
    #[error("violation verdict has an empty reason")]
    EmptyReason,

    /// The flag_type string is not one of the five known variants.
    #[error("unknown flag type: {0:?}")]
    UnknownFlagType(String),

    /// A class index outside the frozen 0..=7 label set.
    #[error("watchdog class index {0} is out of range (expected 0..=7)")]
    ClassIndexOutOfRange(usize),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type alias for Invigil core operations.
pub type Result<T> = std::result::Result<T, InvigilError>;
