use serde::{Deserialize, Serialize};

/// Morph set name of the synthesized return-to-idle events.
pub const RESET: &str = "RESET";

/// A time interval during which a morph set is driven on the face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphTiming {
    pub start: f64,
    pub end: f64,
    pub morph_set: String,
}

impl MorphTiming {
    pub fn new(start: f64, end: f64, morph_set: impl Into<String>) -> Self {
        Self {
            start,
            end,
            morph_set: morph_set.into(),
        }
    }

    /// A reset-to-idle interval of `duration` seconds starting at `start`.
    pub fn reset(start: f64, duration: f64) -> Self {
        Self::new(start, start + duration, RESET)
    }

    pub fn is_reset(&self) -> bool {
        self.morph_set == RESET
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
