/// The lip-sync pipeline: alignment → timeline → pattern document → file.
///
/// Wires together the phoneme map, timeline stages, transition table and
/// pattern assembler, and owns loading of the fixed data documents.
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::assembler::{AssembledPattern, AssemblyError, PatternAssembler, PatternTemplates};
use crate::core::config::LipSyncConfig;
use crate::core::phoneme_map::{PhonemeMap, PhonemeMapError};
use crate::core::timeline::{Timeline, TimelineOptions};
use crate::core::transitions::{TransitionError, TransitionTable};
use crate::schema::alignment::{Alignment, AlignmentError};

pub const PHONEME_MAP_FILE: &str = "phonemap.json";
pub const TRIGGER_TEMPLATE_FILE: &str = "trigger.json";
pub const SOUND_EFFECT_TEMPLATE_FILE: &str = "sfx.json";
pub const SKELETON_TEMPLATE_FILE: &str = "animationpattern.json";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("alignment error: {0}")]
    Alignment(#[from] AlignmentError),
    #[error("phoneme map error: {0}")]
    PhonemeMap(#[from] PhonemeMapError),
    #[error("transition table error: {0}")]
    Transitions(#[from] TransitionError),
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("template `{path}`: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no {0} provided (set a data directory or supply it directly)")]
    MissingData(&'static str),
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Generates animation patterns from alignments. Built via
/// `LipSyncGenerator::builder()`.
pub struct LipSyncGenerator {
    phoneme_map: PhonemeMap,
    transitions: TransitionTable,
    templates: PatternTemplates,
    options: TimelineOptions,
    sound: String,
}

/// Builder for constructing a `LipSyncGenerator`.
pub struct LipSyncGeneratorBuilder {
    data_dir: Option<PathBuf>,
    morphs_path: Option<PathBuf>,
    options: TimelineOptions,
    sound: String,
    /// Directly provided phoneme map (for testing without files).
    phoneme_map: Option<PhonemeMap>,
    /// Directly provided transition table (for testing without files).
    transitions: Option<TransitionTable>,
    /// Directly provided templates (for testing without files).
    templates: Option<PatternTemplates>,
}

/// The result of one generation: the timeline and the document built from it.
#[derive(Debug, Clone)]
pub struct GeneratedPattern {
    pub timeline: Timeline,
    pub pattern: AssembledPattern,
}

/// What a completed run reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub spoken_words: String,
    pub output_path: PathBuf,
    pub trigger_count: usize,
}

impl LipSyncGenerator {
    pub fn builder() -> LipSyncGeneratorBuilder {
        LipSyncGeneratorBuilder {
            data_dir: None,
            morphs_path: None,
            options: TimelineOptions::default(),
            sound: String::new(),
            phoneme_map: None,
            transitions: None,
            templates: None,
        }
    }

    /// Build a generator from the data documents a configuration names.
    pub fn from_config(config: &LipSyncConfig) -> Result<LipSyncGenerator, PipelineError> {
        Self::builder()
            .data_dir(&config.data_dir)
            .morphs(&config.morphs)
            .options(config.timeline_options())
            .sound(&config.sound)
            .build()
    }

    /// Turn an alignment into a finished pattern document.
    pub fn generate(&self, alignment: &Alignment) -> Result<GeneratedPattern, PipelineError> {
        let timeline = Timeline::build(&alignment.words, &self.phoneme_map, self.options);
        if timeline.is_empty() {
            warn!("no phoneme in the alignment maps to a morph set");
        }
        debug!(
            intervals = timeline.len(),
            duration = timeline.duration(),
            "timeline built"
        );

        let pattern =
            PatternAssembler::new(&self.templates, &self.transitions).assemble(&timeline, &self.sound)?;

        Ok(GeneratedPattern { timeline, pattern })
    }
}

impl LipSyncGeneratorBuilder {
    /// Directory holding the phoneme map and pattern templates.
    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Morph pattern the transition table is read from.
    pub fn morphs(mut self, path: impl AsRef<Path>) -> Self {
        self.morphs_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn options(mut self, options: TimelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn sound(mut self, clip: &str) -> Self {
        self.sound = clip.to_string();
        self
    }

    /// Provide the phoneme map directly (for testing without files).
    pub fn with_phoneme_map(mut self, map: PhonemeMap) -> Self {
        self.phoneme_map = Some(map);
        self
    }

    /// Provide the transition table directly (for testing without files).
    pub fn with_transitions(mut self, table: TransitionTable) -> Self {
        self.transitions = Some(table);
        self
    }

    /// Provide the templates directly (for testing without files).
    pub fn with_templates(mut self, templates: PatternTemplates) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn build(self) -> Result<LipSyncGenerator, PipelineError> {
        let phoneme_map = match (self.phoneme_map, &self.data_dir) {
            (Some(map), _) => map,
            (None, Some(dir)) => PhonemeMap::load_from_json(&dir.join(PHONEME_MAP_FILE))?,
            (None, None) => return Err(PipelineError::MissingData("phoneme map")),
        };

        let transitions = match (self.transitions, &self.morphs_path) {
            (Some(table), _) => table,
            (None, Some(path)) => TransitionTable::load_from_json(path)?,
            (None, None) => return Err(PipelineError::MissingData("morph pattern")),
        };

        let templates = match (self.templates, &self.data_dir) {
            (Some(templates), _) => templates,
            (None, Some(dir)) => load_templates(dir)?,
            (None, None) => return Err(PipelineError::MissingData("pattern templates")),
        };

        debug!(
            phonemes = phoneme_map.len(),
            morph_sets = transitions.len(),
            "lip-sync data loaded"
        );

        Ok(LipSyncGenerator {
            phoneme_map,
            transitions,
            templates,
            options: self.options,
            sound: self.sound,
        })
    }
}

impl GeneratedPattern {
    /// Number of triggers made from the timeline.
    pub fn trigger_count(&self) -> usize {
        self.pattern.phoneme_triggers
    }

    /// The document as two-space-indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(&self.pattern.document)?)
    }

    /// Write the document to `path`, creating its directory if needed.
    pub fn write_to(&self, path: &Path) -> Result<(), PipelineError> {
        let serialized = self.to_json_pretty()?;
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, serialized)
        };
        write().map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the trigger, sound effect and skeleton templates from `dir`.
pub fn load_templates(dir: &Path) -> Result<PatternTemplates, PipelineError> {
    Ok(PatternTemplates {
        trigger: read_template(&dir.join(TRIGGER_TEMPLATE_FILE))?,
        sound_effect: read_template(&dir.join(SOUND_EFFECT_TEMPLATE_FILE))?,
        skeleton: read_template::<Value>(&dir.join(SKELETON_TEMPLATE_FILE))?,
    })
}

fn read_template<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PipelineError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| PipelineError::Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Run one generation end to end: load everything the configuration names,
/// build the pattern, and write it. Nothing is written if any step fails.
pub fn run(config: &LipSyncConfig) -> Result<RunSummary, PipelineError> {
    let alignment = Alignment::load_from_json(&config.input)?;
    let generator = LipSyncGenerator::from_config(config)?;
    let generated = generator.generate(&alignment)?;

    let output_path = config.output_path();
    generated.write_to(&output_path)?;
    info!(path = %output_path.display(), "pattern written");

    Ok(RunSummary {
        spoken_words: alignment.spoken_words(),
        output_path,
        trigger_count: generated.trigger_count(),
    })
}
