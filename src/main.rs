//! # Derelict Main Entry Point
//!
//! Headless driver: plays a session from a command script, or lets the
//! autoexplore bot play it, then prints a summary.

use clap::Parser;
use derelict::{
    AutoexploreState, DerelictResult, Difficulty, GameCompletionState, GameConfig, GameState,
    InputHandler, InputOutcome, TurnOutcome,
};
use log::{error, info, warn};
use std::path::PathBuf;

/// Command line arguments for Derelict.
#[derive(Parser, Debug)]
#[command(name = "derelict")]
#[command(about = "A turn-based roguelike aboard a derelict spaceship")]
#[command(version)]
struct Args {
    /// Random seed for deck generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty; sets the deck holding the key
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of turns to play
    #[arg(short, long, default_value_t = 2000)]
    turns: u64,

    /// File with one command per line; the bot plays when absent
    #[arg(long)]
    script: Option<PathBuf>,

    /// Print the final deck as text
    #[arg(long)]
    dump_map: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Derelict v{}", derelict::VERSION);
    if let Err(e) = run(&args) {
        error!("Session aborted: {}", e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `--log-level`.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

fn load_config(args: &Args) -> DerelictResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty);
    }
    Ok(config)
}

fn run(args: &Args) -> DerelictResult<()> {
    let config = load_config(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);

    let mut state = GameState::new(config, seed)?;
    match &args.script {
        Some(path) => run_script(&mut state, path, args.turns)?,
        None => run_autoplay(&mut state, args.turns)?,
    }

    if args.dump_map {
        println!("{}", state.snapshot().to_ascii());
    }
    print_summary(&state);
    Ok(())
}

fn run_script(state: &mut GameState, path: &PathBuf, max_turns: u64) -> DerelictResult<()> {
    let script = std::fs::read_to_string(path)?;
    let handler = InputHandler::new();

    for line in script.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
        if state.is_game_ended() || state.turn_number >= max_turns {
            break;
        }
        match handler.handle_line(line, state)? {
            InputOutcome::Action(action) => {
                if let TurnOutcome::Rejected { reason } = state.handle_player_action(action)? {
                    println!("> {}: {}", line, reason);
                }
            }
            InputOutcome::View(text) => println!("> {}\n{}", line, text),
            InputOutcome::Notice { text, color } => {
                println!("> {}: {}", line, text);
                state.message_log.add_message(text, color);
            }
            InputOutcome::Quit => break,
        }
    }
    Ok(())
}

fn run_autoplay(state: &mut GameState, max_turns: u64) -> DerelictResult<()> {
    let mut bot = AutoexploreState::new();
    let mut rejected_in_a_row = 0;

    while !state.is_game_ended() && state.turn_number < max_turns {
        let Some(action) = bot.next_action(state)? else {
            warn!("Autoexplore has nowhere left to go");
            break;
        };
        match state.handle_player_action(action)? {
            TurnOutcome::Advanced => rejected_in_a_row = 0,
            TurnOutcome::Rejected { .. } => {
                rejected_in_a_row += 1;
                if rejected_in_a_row > 10 {
                    warn!("Autoexplore is stuck");
                    break;
                }
            }
        }
    }
    Ok(())
}

fn print_summary(state: &GameState) {
    let outcome = match state.completion_state {
        GameCompletionState::Playing => "still playing",
        GameCompletionState::PlayerDied => "died",
        GameCompletionState::KeyRecovered => "recovered the key",
    };
    let status = state.status();

    println!("Seed {}: {} after {} turns", state.seed, outcome, state.turn_number);
    println!("{}  {}", status.health_bar(20), status.floor_label());
    for message in state.message_log().recent(5) {
        println!("  {}", message.full_text());
    }
    match serde_json::to_string_pretty(&state.statistics) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Could not serialize statistics: {}", e),
    }
}
