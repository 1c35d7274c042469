mod command_narrator;
mod terminal;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use game_core::{CoinFlipNarrator, GameConfiguration, NarrativeService, TurnController};
use simplelog::{LevelFilter, WriteLogger};

use command_narrator::CommandNarrator;
use terminal::{TerminalInformant, TerminalSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NarratorKind {
    /// Settle fights with a coin toss, offline.
    Coin,
    /// Ask an external program, see --narrator-command.
    Command,
}

/// The English and French armies meet on an eight by eight field, and every
/// capture is a story.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for friendships (and the coin), overriding the config file
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = NarratorKind::Coin)]
    narrator: NarratorKind,
    /// Program (with arguments) that reads a prompt on stdin and writes a reply
    #[arg(long)]
    narrator_command: Option<String>,
    /// Write every turn event to this file as JSON when the game ends
    #[arg(long)]
    record: Option<PathBuf>,
    /// Write debug logs to debug.log
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.debug)?;

    let mut config = match &args.config {
        Some(path) => GameConfiguration::load(path)?,
        None => GameConfiguration::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    log::debug!("Configuration: {:?}", config);

    let narrator: Arc<dyn NarrativeService> = match args.narrator {
        NarratorKind::Coin => Arc::new(CoinFlipNarrator::new(config.seed)),
        NarratorKind::Command => {
            let command_line = args
                .narrator_command
                .as_deref()
                .context("--narrator command requires --narrator-command")?;
            Arc::new(CommandNarrator::from_command_line(command_line)?)
        },
    };

    let mut game = TurnController::new(config, narrator)?;
    let informant = TerminalInformant::new(game.session());
    game.add_informant(informant);
    game.add_sink(TerminalSink);
    let outcome = game.run();
    if let Err(error) = &outcome {
        log::error!("Game crashed: {}", error);
    }

    if let Some(path) = &args.record {
        let file = File::create(path)
            .with_context(|| format!("could not create record file {}", path.display()))?;
        serde_json::to_writer_pretty(file, game.session().event_log())?;
        log::info!("Recorded {} events to {}", game.session().event_log().len(), path.display());
    }
    outcome?;
    Ok(())
}

fn setup_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        WriteLogger::init(
            LevelFilter::Debug,
            simplelog::ConfigBuilder::new()
                .set_target_level(LevelFilter::Error)
                .build(),
            File::create("debug.log").context("could not create debug.log")?,
        )?;
    }
    Ok(())
}
