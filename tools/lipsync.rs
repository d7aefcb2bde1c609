/// Lipsync: generates a lip-sync animation pattern from aligner output.
///
/// Usage: lipsync [--config <file.ron>] [--input <align.json>] [--morphs <pattern.json>]
///                [--sound <clip.wav>] [--output <name.json>] [--output-dir <dir>]
///                [--data-dir <dir>] [--max-phoneme-gap <secs>] [--reset-duration <secs>]
///                [--verbose]
use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use lipsync_pattern::core::config::LipSyncConfig;
use lipsync_pattern::core::pipeline;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Generate a lip-sync animation pattern from phoneme alignment data
#[derive(Debug, FromArgs)]
struct Args {
    /// path to a RON configuration file; flags below override it
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
    /// alignment JSON produced by the forced aligner
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,
    /// morph pattern holding one trigger per morph set
    #[argh(option, short = 'm')]
    morphs: Option<PathBuf>,
    /// audio clip name the pattern should play
    #[argh(option, short = 's')]
    sound: Option<String>,
    /// output file name
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
    /// directory the output file is written to
    #[argh(option)]
    output_dir: Option<PathBuf>,
    /// directory holding the phoneme map and pattern templates
    #[argh(option)]
    data_dir: Option<PathBuf>,
    /// longest silence in seconds before the face resets to idle
    #[argh(option)]
    max_phoneme_gap: Option<f64>,
    /// seconds the face takes to reset to idle
    #[argh(option)]
    reset_duration: Option<f64>,
    /// log every word, phoneme and trigger
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl Args {
    /// Lay the command-line overrides over `config`.
    fn apply(self, mut config: LipSyncConfig) -> LipSyncConfig {
        if let Some(v) = self.input {
            config.input = v;
        }
        if let Some(v) = self.morphs {
            config.morphs = v;
        }
        if let Some(v) = self.sound {
            config.sound = v;
        }
        if let Some(v) = self.output {
            config.output = v;
        }
        if let Some(v) = self.output_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = self.max_phoneme_gap {
            config.max_phoneme_gap = v;
        }
        if let Some(v) = self.reset_duration {
            config.reset_duration = v;
        }
        config.verbose |= self.verbose;
        config
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("lipsync_pattern={level},lipsync={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let args: Args = argh::from_env();

    let base = match &args.config {
        Some(path) => LipSyncConfig::load_from_ron(path).unwrap_or_else(|e| {
            eprintln!("Error reading config '{}': {}", path.display(), e);
            process::exit(1);
        }),
        None => LipSyncConfig::default(),
    };
    let config = args.apply(base);

    init_logging(config.verbose);
    tracing::debug!(?config, "configuration");

    let summary = match pipeline::run(&config) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("lip sync generation failed: {e}");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("\nLip syncing words: {}", summary.spoken_words);
    println!("\nLip Sync Generated. Saved to file:");
    println!("    {}", summary.output_path.display());
    println!("\nAnimation created with {} triggers", summary.trigger_count);
    println!(
        "\nCopy the file to VAM/Saves/AnimationPattern/full folder (create it if it's not there)."
    );
    println!("\nIn VAM, create an animation pattern, load preset, and select this file.\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_keep_defaults() {
        let args = Args::from_args(&["lipsync"], &[]).unwrap();
        let config = args.apply(LipSyncConfig::default());
        assert_eq!(config, LipSyncConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let args = Args::from_args(
            &["lipsync"],
            &[
                "--input",
                "takes/line4.json",
                "--sound",
                "line4.wav",
                "--max-phoneme-gap",
                "1.25",
                "-v",
            ],
        )
        .unwrap();
        let base = LipSyncConfig {
            reset_duration: 0.3,
            ..LipSyncConfig::default()
        };
        let config = args.apply(base);

        assert_eq!(config.input, PathBuf::from("takes/line4.json"));
        assert_eq!(config.sound, "line4.wav");
        assert_eq!(config.max_phoneme_gap, 1.25);
        assert_eq!(config.reset_duration, 0.3);
        assert!(config.verbose);
    }

    #[test]
    fn verbose_from_config_survives() {
        let args = Args::from_args(&["lipsync"], &[]).unwrap();
        let base = LipSyncConfig {
            verbose: true,
            ..LipSyncConfig::default()
        };
        assert!(args.apply(base).verbose);
    }

    #[test]
    fn bad_number_rejected() {
        let args = Args::from_args(&["lipsync"], &["--reset-duration", "soon"]);
        assert!(args.is_err());
    }
}
