/// Pattern assembly: turns a timeline into the output animation-pattern document.
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::core::document::{DocumentError, IdPath};
use crate::core::timeline::Timeline;
use crate::core::transitions::TransitionTable;
use crate::schema::timing::RESET;
use crate::schema::trigger::{format_time, Trigger};

/// Seconds after the last interval at which the closing reset starts and ends.
const CLOSING_RESET_START: f64 = 0.1;
const CLOSING_RESET_END: f64 = 0.25;
/// Seconds of hold after the last interval before the pattern step ends.
const STEP_TAIL: f64 = 1.0;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no transition actions for morph set `{0}` in the morph pattern")]
    MissingTransition(String),
    #[error("sound effect template has no start action to carry the audio clip")]
    NoSoundAction,
    #[error("pattern template: {0}")]
    Document(#[from] DocumentError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the generated triggers go in the pattern skeleton.
pub fn trigger_slot_path() -> IdPath {
    IdPath::new()
        .child("atoms", "LipSyncPattern")
        .child("storables", "AnimationPattern")
}

/// Where the step's `transitionToTime` lives in the pattern skeleton.
pub fn step_path() -> IdPath {
    IdPath::new()
        .child("atoms", "LipSyncStep")
        .child("storables", "Step")
}

/// The fixed documents the output is built from.
#[derive(Debug, Clone)]
pub struct PatternTemplates {
    /// Shape of every morph trigger.
    pub trigger: Trigger,
    /// Plays the audio clip at the start of the pattern.
    pub sound_effect: Trigger,
    /// The whole output document, with empty trigger and timing slots.
    pub skeleton: Value,
}

/// The finished output document and a few facts about it.
#[derive(Debug, Clone)]
pub struct AssembledPattern {
    pub document: Value,
    /// Triggers produced from the timeline, not counting the sound effect
    /// and closing reset.
    pub phoneme_triggers: usize,
    pub duration: f64,
}

pub struct PatternAssembler<'a> {
    templates: &'a PatternTemplates,
    transitions: &'a TransitionTable,
}

impl<'a> PatternAssembler<'a> {
    pub fn new(templates: &'a PatternTemplates, transitions: &'a TransitionTable) -> Self {
        Self {
            templates,
            transitions,
        }
    }

    /// Build the output document for `timeline`.
    ///
    /// Fails without producing anything if any morph set in the timeline, or
    /// `RESET`, has no entry in the transition table.
    pub fn assemble(
        &self,
        timeline: &Timeline,
        sound_clip: &str,
    ) -> Result<AssembledPattern, AssemblyError> {
        let duration = timeline.duration();

        let mut triggers = self.morph_triggers(timeline)?;
        let phoneme_triggers = triggers.len();
        triggers.push(self.sound_effect_trigger(sound_clip)?);
        triggers.push(self.morph_trigger(
            RESET,
            duration + CLOSING_RESET_START,
            duration + CLOSING_RESET_END,
        )?);

        let mut document = self.templates.skeleton.clone();
        step_path().set_field(
            &mut document,
            "transitionToTime",
            Value::String(format_time(duration + STEP_TAIL)),
        )?;
        trigger_slot_path().set_field(&mut document, "triggers", serde_json::to_value(&triggers)?)?;

        Ok(AssembledPattern {
            document,
            phoneme_triggers,
            duration,
        })
    }

    fn morph_triggers(&self, timeline: &Timeline) -> Result<Vec<Trigger>, AssemblyError> {
        timeline
            .timings()
            .iter()
            .map(|t| self.morph_trigger(&t.morph_set, t.start, t.end))
            .collect()
    }

    fn morph_trigger(&self, morph_set: &str, start: f64, end: f64) -> Result<Trigger, AssemblyError> {
        let actions = self
            .transitions
            .get(morph_set)
            .ok_or_else(|| AssemblyError::MissingTransition(morph_set.to_string()))?;
        let trigger =
            Trigger::from_template(&self.templates.trigger, morph_set, start, end, actions.to_vec());
        debug!(
            name = %trigger.display_name,
            start = %trigger.start_time,
            end = %trigger.end_time,
            "trigger"
        );
        Ok(trigger)
    }

    fn sound_effect_trigger(&self, sound_clip: &str) -> Result<Trigger, AssemblyError> {
        let mut trigger = self.templates.sound_effect.clone();
        let action = trigger
            .extra
            .get_mut("startActions")
            .and_then(Value::as_array_mut)
            .and_then(|actions| actions.first_mut())
            .and_then(Value::as_object_mut)
            .ok_or(AssemblyError::NoSoundAction)?;
        action.insert("audioClip".to_string(), Value::String(sound_clip.to_string()));
        Ok(trigger)
    }
}
