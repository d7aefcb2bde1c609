/// Timeline construction: alignment → morph intervals → gap resets → sorted.
use tracing::{debug, trace};

use crate::core::phoneme_map::{lookup_key, PhonemeMap};
use crate::schema::alignment::Word;
use crate::schema::timing::MorphTiming;

/// Longest silence, in seconds, a mouth shape may be held before a reset.
pub const DEFAULT_MAX_PHONEME_GAP: f64 = 0.8;
/// How long, in seconds, the face takes to return to idle.
pub const DEFAULT_RESET_DURATION: f64 = 0.2;

/// Gap handling parameters for [`Timeline::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineOptions {
    pub max_phoneme_gap: f64,
    pub reset_duration: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            max_phoneme_gap: DEFAULT_MAX_PHONEME_GAP,
            reset_duration: DEFAULT_RESET_DURATION,
        }
    }
}

/// The finished, time-ordered list of morph intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    timings: Vec<MorphTiming>,
    duration: f64,
}

impl Timeline {
    /// Run every timeline stage over the aligned words.
    pub fn build(words: &[Word], phoneme_map: &PhonemeMap, options: TimelineOptions) -> Timeline {
        let timings = build_morph_timings(words, phoneme_map);
        let mut timings =
            insert_gap_resets(timings, options.max_phoneme_gap, options.reset_duration);
        sort_by_start(&mut timings);
        let duration = total_duration(&timings);
        Timeline { timings, duration }
    }

    pub fn timings(&self) -> &[MorphTiming] {
        &self.timings
    }

    /// End of the last interval to finish, or 0 for an empty timeline.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

/// Flatten words into morph intervals, in word then phone order.
///
/// Each word's phones are laid end to end from the word's start time. A phone
/// with no mapped morph set emits nothing, but still takes up its duration so
/// the phones after it keep their place.
pub fn build_morph_timings(words: &[Word], phoneme_map: &PhonemeMap) -> Vec<MorphTiming> {
    let mut timings = Vec::new();

    for word in words {
        debug!(word = word.display_text(), start = word.start, "aligning word");

        let mut offset = word.start;
        for phone in &word.phones {
            let prefix = lookup_key(&phone.phone);
            match phoneme_map.morph_set_for(&phone.phone) {
                Some(morph_set) => {
                    debug!("{} ---> {}", prefix, morph_set);
                    timings.push(MorphTiming::new(
                        offset,
                        offset + phone.duration,
                        morph_set,
                    ));
                }
                None => trace!(phone = %phone.phone, "no morph set, skipped"),
            }
            offset += phone.duration;
        }
    }

    timings
}

/// Insert a reset after every interval followed by more than `max_gap`
/// seconds of silence.
///
/// Pairs are compared in the order given, not by time. Inserted resets start
/// where the earlier interval ends and are not themselves checked.
pub fn insert_gap_resets(
    timings: Vec<MorphTiming>,
    max_gap: f64,
    reset_duration: f64,
) -> Vec<MorphTiming> {
    let mut out = Vec::with_capacity(timings.len());
    let mut iter = timings.into_iter().peekable();

    while let Some(cur) = iter.next() {
        let reset = match iter.peek() {
            Some(next) if next.start - cur.end > max_gap => {
                Some(MorphTiming::reset(cur.end, reset_duration))
            }
            _ => None,
        };
        out.push(cur);
        if let Some(reset) = reset {
            debug!(start = reset.start, end = reset.end, "inserted reset");
            out.push(reset);
        }
    }

    out
}

/// Stable sort by start time; equal starts keep their relative order.
pub fn sort_by_start(timings: &mut [MorphTiming]) {
    timings.sort_by(|a, b| a.start.total_cmp(&b.start));
}

/// Latest end time across all intervals, 0 when there are none.
pub fn total_duration(timings: &[MorphTiming]) -> f64 {
    timings.iter().map(|t| t.end).fold(0.0, f64::max)
}
