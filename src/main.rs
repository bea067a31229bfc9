use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::thread;

use clap::Parser;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};
use snake_rules::config::GameConfig;
use snake_rules::difficulty::Difficulty;
use snake_rules::game::GameEngine;
use snake_rules::score::{JsonScoreStore, NullScoreSink, ScoreSink};
use snake_rules::script::{parse_script, ScriptCommand};

/// Drives one snake session from a command script and prints the final board as JSON.
#[derive(Debug, Parser)]
#[command(name = "snake-sim", version)]
struct Cli {
    /// Name recorded with saved scores.
    #[arg(long, default_value = "player")]
    player: String,

    /// Seed for reproducible item placement.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting level (slow, medium, fast, insane); overrides the config.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Score file; defaults to the platform data directory.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Do not save the final score.
    #[arg(long = "no-save")]
    no_save: bool,

    /// Command script; read from stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Wait the difficulty's tick interval between ticks.
    #[arg(long)]
    realtime: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(difficulty) = cli.difficulty {
        config.starting_difficulty = difficulty;
    }

    let score_sink: Box<dyn ScoreSink> = if cli.no_save {
        Box::new(NullScoreSink)
    } else {
        let store = cli
            .scores
            .clone()
            .map_or_else(JsonScoreStore::at_default_location, JsonScoreStore::new);
        info!("saving scores to {}", store.path().display());
        Box::new(store)
    };

    let mut engine = match cli.seed {
        Some(seed) => GameEngine::new_with_seed(cli.player.clone(), config, score_sink, seed)?,
        None => GameEngine::new(cli.player.clone(), config, score_sink)?,
    };

    let commands = parse_script(&read_script(cli.script.as_deref())?)?;

    engine.init_game(0)?;
    run(&mut engine, &commands, cli.realtime)?;

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

fn run(
    engine: &mut GameEngine,
    commands: &[ScriptCommand],
    realtime: bool,
) -> Result<(), Box<dyn Error>> {
    for command in commands {
        match *command {
            ScriptCommand::Tick(count) => {
                for _ in 0..count {
                    if !engine.is_in_game() {
                        break;
                    }
                    tick(engine, realtime);
                }
            }
            ScriptCommand::Key(key_code) => {
                if let Err(error) = engine.set_direction(key_code) {
                    debug!("script key {key_code} rejected: {error}");
                }
            }
            ScriptCommand::Upgrade => {
                engine.upgrade_difficulty_level();
            }
            ScriptCommand::Reset => engine.init_game(0)?,
            ScriptCommand::Show => println!("{}", serde_json::to_string(&engine.snapshot())?),
        }
    }

    Ok(())
}

fn tick(engine: &mut GameEngine, realtime: bool) {
    for event in engine.prepare_next_move() {
        debug!("{event:?}");
    }

    if engine.able_to_upgrade_difficulty_level() {
        engine.upgrade_difficulty_level();
    }

    if realtime && engine.is_in_game() {
        thread::sleep(engine.difficulty().tick_interval());
    }
}

fn read_script(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script)?;
            Ok(script)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    match &cli.log_file {
        Some(path) => WriteLogger::init(cli.log_level, Config::default(), File::create(path)?)?,
        None => WriteLogger::init(cli.log_level, Config::default(), io::stderr())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use snake_rules::difficulty::Difficulty;

    use super::Cli;

    #[test]
    fn difficulty_option_parses_level_names() {
        let cli = Cli::try_parse_from(["snake-sim", "--difficulty", "Fast"])
            .expect("level name should parse");
        assert_eq!(cli.difficulty, Some(Difficulty::Fast));

        assert!(Cli::try_parse_from(["snake-sim", "--difficulty", "glacial"]).is_err());
    }

    #[test]
    fn difficulty_option_is_optional() {
        let cli = Cli::try_parse_from(["snake-sim"]).expect("defaults should parse");
        assert_eq!(cli.difficulty, None);
    }
}
