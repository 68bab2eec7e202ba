//! # Invigil Core
//!
//! Data contracts shared by the Invigil proctoring training pipelines and
//! their downstream consumers: the structured verdict emitted by the
//! vision-language judge, the frozen watchdog class-label set, and the
//! validator that turns raw judge output into a checked [`Verdict`].
//!
//! ## Quick Start
//!
//! ```rust
//! use invigil_core::judge::VerdictParser;
//!
//! let parser = VerdictParser::new().unwrap();
//! let raw = r#"{"violation": true, "reason": "Phone in left hand.",
//!               "confidence": 0.92, "flag_type": "PHONE_DETECTED"}"#;
//! let verdict = parser.parse(raw).unwrap();
//!
//! assert!(verdict.violation);
//! assert_eq!(verdict.flag_type.to_string(), "PHONE_DETECTED");
//! ```
pub mod error;
pub mod judge;
pub mod types;

// Re-export primary API
pub use error::{InvigilError, Result};
pub use judge::{VerdictParser, JUDGE_SYSTEM_PROMPT};
pub use types::{FlagType, Verdict, WatchdogClass};
