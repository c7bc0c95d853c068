//! Speechflow CLI - streaming utterance segmentation
//!
//! Reads text from stdin one chunk per line, as a token stream would deliver
//! it, and prints every utterance as soon as it is ready to speak. End of
//! input flushes whatever is still buffered.

use anyhow::{Context, Result};
use clap::Parser;
use speechflow_core::{Language, NumberLocale, SessionConfig, StreamSession, Utterance};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "speechflow")]
#[command(author = "Speechflow Contributors")]
#[command(version)]
#[command(about = "Split streamed text into speakable utterances", long_about = None)]
struct Cli {
    /// TOML session config; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Punctuation set to split on (zh, other)
    #[arg(short, long)]
    language: Option<Language>,

    /// Do not treat commas as boundaries
    #[arg(long)]
    no_comma_split: bool,

    /// Minimum estimated duration, in seconds, of a trailing utterance
    #[arg(long)]
    min_duration: Option<f64>,

    /// Seconds per duration unit
    #[arg(long)]
    unit_duration: Option<f64>,

    /// Spell digit runs as words (en, zh)
    #[arg(long)]
    spell_numbers: Option<NumberLocale>,

    /// Force a flush once this many characters are pending
    #[arg(long)]
    max_pending: Option<usize>,

    /// Keep utterances that contain only punctuation
    #[arg(long)]
    keep_punctuation: bool,

    /// Mark unterminated utterances and log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => SessionConfig::default(),
        };

        let mut segmentation = config.segmentation.clone();
        if let Some(language) = self.language {
            segmentation = segmentation.with_language(language);
        }
        if self.no_comma_split {
            segmentation = segmentation.with_comma_split(false);
        }
        if let Some(seconds) = self.min_duration {
            segmentation = segmentation.with_min_utterance_duration(seconds)?;
        }
        if let Some(seconds) = self.unit_duration {
            segmentation = segmentation.with_unit_duration(seconds)?;
        }
        config = config.with_segmentation(segmentation);

        if let Some(locale) = self.spell_numbers {
            let normalizer = config.normalizer.clone().with_spell_numbers(locale);
            config = config.with_normalizer(normalizer);
        }
        if let Some(max_chars) = self.max_pending {
            config = config.with_max_pending_chars(max_chars)?;
        }
        if self.keep_punctuation {
            config = config.with_skip_punctuation_only(false);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        format!("speechflow_core={level},speechflow={level}").into()
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render(utterance: &Utterance, verbose: bool) -> String {
    if verbose && !utterance.terminated {
        format!("{utterance} [unterminated]\n")
    } else {
        format!("{utterance}\n")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.session_config()?;
    let mut session = StreamSession::new(config)?;
    info!(session_id = %session.id(), "Reading chunks from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut chunks = 0usize;
    let mut emitted = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        chunks += 1;
        for utterance in session.push(&line) {
            stdout.write_all(render(&utterance, cli.verbose).as_bytes()).await?;
            emitted += 1;
        }
        stdout.flush().await?;
    }

    debug!(pending = session.pending(), "End of input, flushing");
    for utterance in session.finish() {
        stdout.write_all(render(&utterance, cli.verbose).as_bytes()).await?;
        emitted += 1;
    }
    stdout.flush().await?;

    info!(chunks, emitted, "Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("speechflow").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).session_config().unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_flag_overrides() {
        let cli = parse(&[
            "--language",
            "other",
            "--no-comma-split",
            "--min-duration",
            "1.5",
            "--spell-numbers",
            "en",
            "--max-pending",
            "200",
        ]);
        let config = cli.session_config().unwrap();

        assert_eq!(config.segmentation.language, Language::Other);
        assert!(!config.segmentation.comma_split);
        assert!((config.segmentation.min_utterance_duration - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.normalizer.spell_numbers, Some(NumberLocale::English));
        assert_eq!(config.max_pending_chars, Some(200));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(parse(&["--min-duration", "0"]).session_config().is_err());
        assert!(parse(&["--max-pending", "0"]).session_config().is_err());
        assert!(Cli::try_parse_from(["speechflow", "--language", "fr"]).is_err());
    }

    #[test]
    fn test_render() {
        let done = Utterance::new("你好。");
        let open = Utterance {
            text: "还没".to_string(),
            terminated: false,
        };
        assert_eq!(render(&done, true), "你好。\n");
        assert_eq!(render(&open, false), "还没\n");
        assert_eq!(render(&open, true), "还没 [unterminated]\n");
    }
}
