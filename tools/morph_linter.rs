/// Morph Linter: checks that a phoneme map and a morph pattern agree.
///
/// Usage: morph_linter [--data-dir <dir>] [--morphs <pattern.json>]
use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use lipsync_pattern::core::phoneme_map::PhonemeMap;
use lipsync_pattern::core::pipeline::PHONEME_MAP_FILE;
use lipsync_pattern::core::transitions::TransitionTable;
use lipsync_pattern::schema::timing::RESET;

/// Check a phoneme map against the morph pattern it will be used with
#[derive(Debug, FromArgs)]
struct Args {
    /// directory holding phonemap.json
    #[argh(option, default = "PathBuf::from(\"data\")")]
    data_dir: PathBuf,
    /// morph pattern holding one trigger per morph set
    #[argh(option, default = "PathBuf::from(\"data/morphpattern.json\")")]
    morphs: PathBuf,
}

fn main() {
    let args: Args = argh::from_env();

    let map_path = args.data_dir.join(PHONEME_MAP_FILE);
    let map = PhonemeMap::load_from_json(&map_path).unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to load phoneme map '{}': {}", map_path.display(), e);
        process::exit(1);
    });
    let transitions = TransitionTable::load_from_json(&args.morphs).unwrap_or_else(|e| {
        eprintln!(
            "ERROR: Failed to load morph pattern '{}': {}",
            args.morphs.display(),
            e
        );
        process::exit(1);
    });

    println!(
        "Loaded {} phoneme entries and {} morph sets",
        map.len(),
        transitions.len()
    );

    let (errors, warnings) = lint(&map, &transitions);

    println!("\n=== Morph Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn lint(map: &PhonemeMap, transitions: &TransitionTable) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let used = map.morph_sets();

    let mut missing: Vec<&str> = used
        .iter()
        .copied()
        .filter(|name| !transitions.contains(name))
        .collect();
    missing.sort_unstable();
    for name in missing {
        errors.push(format!(
            "morph set '{}' is mapped from a phoneme but has no trigger in the morph pattern",
            name
        ));
    }

    if !transitions.has_reset() {
        errors.push(format!(
            "morph pattern has no '{}' trigger; silences and the closing reset need it",
            RESET
        ));
    }

    let mut unused: Vec<&str> = transitions
        .names()
        .filter(|name| *name != RESET && !used.contains(name))
        .collect();
    unused.sort_unstable();
    for name in unused {
        warnings.push(format!(
            "morph set '{}' has a trigger but no phoneme maps to it",
            name
        ));
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistent_data_passes() {
        let map: PhonemeMap = [("hh", "aa"), ("iy", "ee")].into_iter().collect();
        let mut transitions = TransitionTable::new();
        transitions.insert("aa", Vec::new());
        transitions.insert("ee", Vec::new());
        transitions.insert(RESET, Vec::new());

        let (errors, warnings) = lint(&map, &transitions);
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_entries_are_errors() {
        let map: PhonemeMap = [("hh", "aa"), ("iy", "ee")].into_iter().collect();
        let mut transitions = TransitionTable::new();
        transitions.insert("aa", Vec::new());
        transitions.insert("oh", Vec::new());

        let (errors, warnings) = lint(&map, &transitions);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("'ee'"));
        assert!(errors[1].contains(RESET));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("'oh'"));
    }
}
