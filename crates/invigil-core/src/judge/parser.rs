use regex::Regex;
use tracing::debug;

use crate::error::{InvigilError, Result};
use crate::types::Verdict;

/// Validator for raw judge-model output.
///
/// Fine-tuned VLMs mostly emit the bare verdict JSON they were trained on,
/// but still occasionally wrap it in a markdown code fence or surround it
/// with prose. The parser locates the first balanced JSON object in the
/// response, deserializes it, and checks the field constraints. Any failure
/// is "malformed judge output" as far as the caller is concerned; the
/// decision layer falls back via [`VerdictParser::fallback_verdict`] or asks
/// the model to regenerate.
pub struct VerdictParser {
    re_fence: Regex,
}

impl VerdictParser {
    /// Constructs a new `VerdictParser` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `InvigilError::RegexError` if a pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_fence: Regex::new(r"(?s)```(?:json)?\s*(.*?)```")?,
        })
    }

    /// Parses a raw judge response into a validated [`Verdict`].
    ///
    /// # Errors
    ///
    /// - `InvigilError::EmptyInput` for empty or whitespace-only input.
    /// - `InvigilError::NoJsonObject` when no balanced `{...}` is present.
    /// - `InvigilError::MalformedVerdict` when the JSON does not match the
    ///   verdict schema (missing field, wrong type, unknown flag_type).
    /// - `InvigilError::ConfidenceOutOfRange` / `InvigilError::EmptyReason`
    ///   when a field violates its constraint.
    pub fn parse(&self, raw: &str) -> Result<Verdict> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvigilError::EmptyInput);
        }

        let candidate = self.extract_object(trimmed)?;
        debug!(len = candidate.len(), "extracted verdict candidate");

        let verdict: Verdict = serde_json::from_str(candidate)?;
        verdict.validate()?;
        Ok(verdict)
    }

    /// The degrade-path verdict for responses the parser rejects: a
    /// low-signal clean record the decision layer can score past.
    #[must_use]
    pub fn fallback_verdict(&self) -> Verdict {
        Verdict::clean("judge output could not be parsed", 0.0)
    }

    /// Locates the first balanced JSON object, preferring fenced blocks.
    fn extract_object<'a>(&self, input: &'a str) -> Result<&'a str> {
        if let Some(caps) = self.re_fence.captures(input) {
            let inner = caps.get(1).map_or("", |m| m.as_str()).trim();
            if let Some(obj) = balanced_object(inner) {
                return Ok(obj);
            }
        }

        balanced_object(input).ok_or_else(|| InvigilError::NoJsonObject {
            input: input.to_string(),
        })
    }
}

/// Returns the first balanced `{...}` span, tracking string literals and
/// escapes so braces inside reason text do not truncate the object.
fn balanced_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in input[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlagType;

    fn parser() -> VerdictParser {
        VerdictParser::new().unwrap()
    }

    #[test]
    fn parses_bare_json() {
        let raw = r#"{"violation": true, "reason": "The candidate is holding a smartphone.", "confidence": 0.92, "flag_type": "PHONE_DETECTED"}"#;
        let v = parser().parse(raw).unwrap();
        assert!(v.violation);
        assert_eq!(v.flag_type, FlagType::PhoneDetected);
        assert!((v.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "Here is my analysis:\n```json\n{\"violation\": false, \"reason\": \"No violation detected.\", \"confidence\": 0.05, \"flag_type\": \"OTHER\"}\n```\nLet me know if you need more.";
        let v = parser().parse(raw).unwrap();
        assert!(!v.violation);
        assert_eq!(v.flag_type, FlagType::Other);
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let raw = "The frame shows a violation. {\"violation\": true, \"reason\": \"A second person {partially visible} behind the candidate.\", \"confidence\": 0.88, \"flag_type\": \"ANOTHER_PERSON\"} End of report.";
        let v = parser().parse(raw).unwrap();
        assert_eq!(v.flag_type, FlagType::AnotherPerson);
        assert!(v.reason.contains("{partially visible}"));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            parser().parse("   \n"),
            Err(InvigilError::EmptyInput)
        ));
    }

    #[test]
    fn rejects_prose_without_object() {
        let err = parser().parse("I could not analyze this frame.").unwrap_err();
        assert!(matches!(err, InvigilError::NoJsonObject { .. }));
    }

    #[test]
    fn rejects_missing_field() {
        let raw = r#"{"violation": true, "confidence": 0.9, "flag_type": "PHONE_DETECTED"}"#;
        assert!(matches!(
            parser().parse(raw),
            Err(InvigilError::MalformedVerdict(_))
        ));
    }

    #[test]
    fn rejects_unknown_flag_type() {
        let raw = r#"{"violation": true, "reason": "phone", "confidence": 0.9, "flag_type": "CELLPHONE"}"#;
        // serde rejects the unknown variant during deserialization.
        assert!(matches!(
            parser().parse(raw),
            Err(InvigilError::MalformedVerdict(_))
        ));
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        let raw = r#"{"violation": true, "reason": "phone", "confidence": 1.3, "flag_type": "PHONE_DETECTED"}"#;
        assert!(matches!(
            parser().parse(raw),
            Err(InvigilError::ConfidenceOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_empty_violation_reason() {
        let raw = r#"{"violation": true, "reason": "", "confidence": 0.9, "flag_type": "PHONE_DETECTED"}"#;
        assert!(matches!(
            parser().parse(raw),
            Err(InvigilError::EmptyReason)
        ));
    }

    #[test]
    fn serialized_verdict_roundtrips_through_parser() {
        let original = Verdict::violation(
            "Written notes are visible on the desk.",
            0.85,
            FlagType::UnauthorizedObject,
        );
        let text = serde_json::to_string(&original).unwrap();
        let back = parser().parse(&text).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn fallback_verdict_is_low_signal_clean() {
        let v = parser().fallback_verdict();
        assert!(!v.violation);
        assert_eq!(v.flag_type, FlagType::Other);
        assert_eq!(v.confidence, 0.0);
        assert!(v.validate().is_ok());
    }
}
