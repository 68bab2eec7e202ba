//! Sample JSONL dataset for judge fine-tuning.
//!
//! In production the records come from labeled webcam captures; this module
//! writes a small seed set that documents the exact format, with every
//! assistant turn serialized from a real [`Verdict`] so the training targets
//! can never drift from the schema the validator enforces.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use invigil_core::types::{FlagType, Verdict};
use invigil_core::JUDGE_SYSTEM_PROMPT;

/// One side of a ShareGPT conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub from: String,
    pub value: String,
}

/// A single fine-tuning example: one webcam image paired with the expected
/// proctor analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeSample {
    pub id: String,
    pub image: String,
    pub conversations: Vec<Turn>,
}

impl JudgeSample {
    /// Builds an example from an image path and its labeled verdict.
    pub fn new(id: &str, image: &str, verdict: &Verdict) -> Result<Self> {
        let user = Turn {
            from: "user".to_string(),
            value: format!("<img>{image}</img>\n{JUDGE_SYSTEM_PROMPT}\n\nAnalyze this webcam frame."),
        };
        let assistant = Turn {
            from: "assistant".to_string(),
            value: serde_json::to_string(verdict).context("serializing verdict label")?,
        };
        Ok(Self {
            id: id.to_string(),
            image: image.to_string(),
            conversations: vec![user, assistant],
        })
    }
}

/// The seed examples, one per violation category plus a clean frame.
pub fn sample_records() -> Result<Vec<JudgeSample>> {
    let labeled = [
        (
            "train_001",
            "images/phone_visible_001.jpg",
            Verdict::violation(
                "The candidate is holding a smartphone in their left hand, partially \
                 hidden below the desk level. The screen appears to be illuminated, \
                 suggesting active use.",
                0.92,
                FlagType::PhoneDetected,
            ),
        ),
        (
            "train_002",
            "images/clean_frame_001.jpg",
            Verdict::clean(
                "No violation detected. The candidate is facing the camera directly \
                 with no unauthorized objects visible in the frame.",
                0.05,
            ),
        ),
        (
            "train_003",
            "images/two_people_001.jpg",
            Verdict::violation(
                "Two faces are visible in the frame. A second person is partially \
                 visible behind the candidate's right shoulder, appearing to look at \
                 the screen.",
                0.88,
                FlagType::AnotherPerson,
            ),
        ),
        (
            "train_004",
            "images/notes_visible_001.jpg",
            Verdict::violation(
                "Written notes or a textbook are visible on the desk in front of the \
                 candidate. The pages appear to contain text and diagrams.",
                0.85,
                FlagType::UnauthorizedObject,
            ),
        ),
    ];

    labeled
        .iter()
        .map(|(id, image, verdict)| JudgeSample::new(id, image, verdict))
        .collect()
}

/// Writes the seed dataset as one JSON object per line to
/// `<dataset_dir>/train.jsonl`, creating the images directory alongside.
pub fn write_sample_dataset(dataset_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dataset_dir.join("images"))
        .with_context(|| format!("creating dataset directory {}", dataset_dir.display()))?;

    let records = sample_records()?;
    let train_path = dataset_dir.join("train.jsonl");
    let mut out = File::create(&train_path)
        .with_context(|| format!("creating {}", train_path.display()))?;

    for record in &records {
        let json = serde_json::to_string(record)?;
        writeln!(out, "{json}")?;
    }

    info!(
        path = %train_path.display(),
        samples = records.len(),
        "sample dataset written"
    );
    println!("Sample dataset written to: {}", train_path.display());
    println!("  {} training samples", records.len());
    println!("\nTo create a real dataset:");
    println!("  1. Collect webcam images of cheating scenarios");
    println!("  2. Label each image with the expected JSON verdict");
    println!("  3. Follow the same JSONL format as above");
    println!("  4. Aim for 500-2000 labeled examples for good results");

    Ok(train_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invigil_core::judge::VerdictParser;

    #[test]
    fn sample_records_cover_clean_and_violation() {
        let records = sample_records().unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.conversations.len() == 2));
        assert!(records.iter().all(|r| r.conversations[0].from == "user"));
    }

    #[test]
    fn user_turns_embed_prompt_and_image_tag() {
        for record in sample_records().unwrap() {
            let user = &record.conversations[0].value;
            assert!(user.starts_with(&format!("<img>{}</img>", record.image)));
            assert!(user.contains(JUDGE_SYSTEM_PROMPT));
        }
    }

    #[test]
    fn assistant_turns_parse_as_valid_verdicts() {
        let parser = VerdictParser::new().unwrap();
        for record in sample_records().unwrap() {
            let verdict = parser.parse(&record.conversations[1].value).unwrap();
            assert!((0.0..=1.0).contains(&verdict.confidence));
        }
    }

    #[test]
    fn write_sample_dataset_emits_one_json_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample_dataset(dir.path()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 4);
        for line in lines {
            let sample: JudgeSample = serde_json::from_str(line).unwrap();
            assert!(!sample.id.is_empty());
        }
        assert!(dir.path().join("images").is_dir());
    }
}
