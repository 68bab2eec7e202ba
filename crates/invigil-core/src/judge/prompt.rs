/// System prompt the judge model is fine-tuned against.
///
/// This is the single source of truth for the verdict schema as the model
/// sees it; the trainer's dataset generation embeds the same text, so the
/// schema the model learns and the schema [`crate::judge::VerdictParser`]
/// enforces cannot drift apart.
pub const JUDGE_SYSTEM_PROMPT: &str = "You are an AI proctor monitoring a candidate taking an exam. \
Analyze this webcam frame carefully. Look for: phones, books, notes, \
earphones, additional monitors, extra people, or any other cheating indicators. \
Output a JSON object with these fields:\n\
  \"violation\": boolean,\n\
  \"reason\": string (detailed explanation),\n\
  \"confidence\": number (0.0 to 1.0),\n\
  \"flag_type\": string (one of: PHONE_DETECTED, UNAUTHORIZED_OBJECT, \
ANOTHER_PERSON, SECONDARY_MONITOR, OTHER)\n\
If no violation is detected, set violation to false.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlagType;

    #[test]
    fn prompt_names_every_flag_type() {
        for flag in FlagType::ALL {
            assert!(
                JUDGE_SYSTEM_PROMPT.contains(&flag.to_string()),
                "prompt is missing {flag}"
            );
        }
    }

    #[test]
    fn prompt_names_every_verdict_field() {
        for field in ["violation", "reason", "confidence", "flag_type"] {
            assert!(JUDGE_SYSTEM_PROMPT.contains(field));
        }
    }
}
