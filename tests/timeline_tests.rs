/// Timeline integration tests: real phoneme map against aligner fixtures.

use lipsync_pattern::core::phoneme_map::PhonemeMap;
use lipsync_pattern::core::timeline::{Timeline, TimelineOptions};
use lipsync_pattern::schema::alignment::Alignment;
use lipsync_pattern::schema::timing::RESET;
use std::path::Path;

fn load_fixture(name: &str) -> Alignment {
    Alignment::load_from_json(&Path::new("tests/fixtures").join(name)).unwrap()
}

fn default_map() -> PhonemeMap {
    PhonemeMap::load_from_json(Path::new("data/phonemap.json")).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn hello_there_friend_timeline() {
    let alignment = load_fixture("align.json");
    let timeline = Timeline::build(&alignment.words, &default_map(), TimelineOptions::default());

    let names: Vec<&str> = timeline
        .timings()
        .iter()
        .map(|t| t.morph_set.as_str())
        .collect();
    assert_eq!(
        names,
        ["AA", "DT", "OH", "TH", "EH", "ER", RESET, "FV", "ER", "EH", "DT", "DT"]
    );

    // "hh" has no morph set but still pushes "ah" back by its duration
    let first = &timeline.timings()[0];
    assert!(approx(first.start, 0.59));
    assert!(approx(first.end, 0.65));

    let reset = &timeline.timings()[6];
    assert!(approx(reset.start, 1.23));
    assert!(approx(reset.end, 1.43));

    assert!(approx(timeline.duration(), 2.75));
}

#[test]
fn timeline_is_ordered_and_bounded() {
    let alignment = load_fixture("align.json");
    let timeline = Timeline::build(&alignment.words, &default_map(), TimelineOptions::default());

    assert!(timeline
        .timings()
        .windows(2)
        .all(|w| w[0].start <= w[1].start));
    assert!(timeline
        .timings()
        .iter()
        .all(|t| t.end <= timeline.duration()));
}

#[test]
fn wider_gap_threshold_drops_reset() {
    let alignment = load_fixture("align.json");
    let options = TimelineOptions {
        max_phoneme_gap: 1.5,
        ..TimelineOptions::default()
    };
    let timeline = Timeline::build(&alignment.words, &default_map(), options);

    assert_eq!(timeline.len(), 11);
    assert!(timeline.timings().iter().all(|t| !t.is_reset()));
}

#[test]
fn longer_reset_duration() {
    let alignment = load_fixture("align.json");
    let options = TimelineOptions {
        reset_duration: 0.5,
        ..TimelineOptions::default()
    };
    let timeline = Timeline::build(&alignment.words, &default_map(), options);

    let reset = timeline.timings().iter().find(|t| t.is_reset()).unwrap();
    assert!(approx(reset.duration(), 0.5));
}

#[test]
fn fully_unmapped_alignment_is_empty() {
    let alignment = load_fixture("unmapped.json");
    let timeline = Timeline::build(&alignment.words, &default_map(), TimelineOptions::default());

    assert!(timeline.is_empty());
    assert_eq!(timeline.duration(), 0.0);
}

#[test]
fn rebuilding_is_deterministic() {
    let alignment = load_fixture("align.json");
    let map = default_map();
    let a = Timeline::build(&alignment.words, &map, TimelineOptions::default());
    let b = Timeline::build(&alignment.words, &map, TimelineOptions::default());
    assert_eq!(a, b);
}
