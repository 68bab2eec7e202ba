pub mod labels;
pub mod verdict;

pub use labels::WatchdogClass;
pub use verdict::{FlagType, Verdict};
