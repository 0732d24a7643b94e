pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod error;
pub mod matcher;
pub mod phonemes;
pub mod playback;
pub mod record;
pub mod similarity;
pub mod stats;

pub use cli::{Cli, Commands};
pub use commands::{Command, Flow, Session};
pub use config::{AppConfig, MatchConfig};
pub use corpus::{Corpus, LoadMode, LoadReport, SkippedLine};
pub use error::{ConfigError, EmptyCorpus, Error, LoadError, PlaybackError, Result};
pub use matcher::{Matcher, ScoredRecord};
pub use phonemes::{analyze, PhonemeAnalysis};
pub use playback::{ExternalPlayer, Playback, PlaybackOutcome, PlaybackPlan};
pub use record::Record;
pub use stats::{category_breakdown, render_report, stats, CategoryStats, CorpusStats};

use config::{config_path, load_config};
use std::io::{self, Write};

pub fn run(cli: Cli) -> Result<()> {
    env_logger::init();

    let path = cli.config.clone().unwrap_or_else(config_path);
    let mut config = load_config(&path)?;
    cli.apply(&mut config);

    let (corpus, report) = Corpus::load(
        &config.corpus.metadata_path,
        LoadMode::from_lenient(config.corpus.lenient),
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !report.skipped.is_empty() {
        writeln!(out, "已跳过 {} 行格式错误的记录", report.skipped.len())?;
    }

    let player = ExternalPlayer::new(config.playback.clone(), &config.corpus.audio_dir);
    let session = Session::new(&corpus, &config, player);

    match cli.command {
        None => {
            writeln!(out, "{}", render_report(&corpus, config.display.report_examples)?)?;
            session.run(io::stdin().lock(), &mut out)?;
        }
        Some(Commands::Report) => {
            writeln!(out, "{}", render_report(&corpus, config.display.report_examples)?)?;
        }
        Some(Commands::Match { query, top: Some(n) }) => {
            let matcher = Matcher::new(&corpus, config.matching);
            for candidate in matcher.rank(&query, n)? {
                writeln!(
                    out,
                    "{:.3}  {}: {}",
                    candidate.score, candidate.record.id, candidate.record.text
                )?;
            }
        }
        Some(Commands::Match { query, top: None }) => {
            let matcher = Matcher::new(&corpus, config.matching);
            match matcher.best_match(&query)? {
                Some(record) => writeln!(out, "{}: {}", record.id, record.text)?,
                None => writeln!(out, "未找到相近的样本")?,
            }
        }
        Some(Commands::Analyze { id }) => {
            session.execute(Command::Analyze(id), &mut io::empty(), &mut out)?;
        }
        Some(Commands::Stats) => {
            session.execute(Command::Stats, &mut io::empty(), &mut out)?;
        }
    }
    Ok(())
}
