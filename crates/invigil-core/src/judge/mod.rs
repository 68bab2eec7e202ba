//! Judge-side contract: the system prompt the VLM is fine-tuned against and
//! the validator that checks its raw output against the verdict schema.

pub mod parser;
pub mod prompt;

pub use parser::VerdictParser;
pub use prompt::JUDGE_SYSTEM_PROMPT;
