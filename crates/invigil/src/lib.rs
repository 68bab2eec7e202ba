//! # Invigil
//!
//! Facade crate for the Invigil proctoring training toolkit. Re-exports the
//! data contracts from [`invigil_core`] and the judge/watchdog pipelines
//! from [`invigil_trainer`].

pub use invigil_core::{
    FlagType, InvigilError, JUDGE_SYSTEM_PROMPT, Result, Verdict, VerdictParser, WatchdogClass,
};
pub use invigil_trainer::{judge, watchdog};
