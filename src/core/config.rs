/// Run configuration: one struct, filled from defaults, an optional RON file,
/// then command-line overrides.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::timeline::{TimelineOptions, DEFAULT_MAX_PHONEME_GAP, DEFAULT_RESET_DURATION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Everything a generation run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipSyncConfig {
    /// Alignment document produced by the forced aligner.
    pub input: PathBuf,
    /// Morph pattern holding one trigger per morph set, including `RESET`.
    pub morphs: PathBuf,
    /// Audio clip name embedded in the sound-effect trigger. Never read.
    pub sound: String,
    /// Output file name, placed under `output_dir`.
    pub output: PathBuf,
    pub output_dir: PathBuf,
    /// Holds `phonemap.json`, `trigger.json`, `sfx.json` and `animationpattern.json`.
    pub data_dir: PathBuf,
    pub max_phoneme_gap: f64,
    pub reset_duration: f64,
    pub verbose: bool,
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("sampleinput/align.json"),
            morphs: PathBuf::from("data/morphpattern.json"),
            sound: "ptest4.wav".to_string(),
            output: PathBuf::from("output_animation_pattern_sample.json"),
            output_dir: PathBuf::from("output"),
            data_dir: PathBuf::from("data"),
            max_phoneme_gap: DEFAULT_MAX_PHONEME_GAP,
            reset_duration: DEFAULT_RESET_DURATION,
            verbose: false,
        }
    }
}

impl LipSyncConfig {
    /// Load a configuration from a RON file. Fields it leaves out keep
    /// their defaults.
    pub fn load_from_ron(path: &Path) -> Result<LipSyncConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<LipSyncConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Full path of the generated pattern.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output)
    }

    pub fn timeline_options(&self) -> TimelineOptions {
        TimelineOptions {
            max_phoneme_gap: self.max_phoneme_gap,
            reset_duration: self.reset_duration,
        }
    }
}
