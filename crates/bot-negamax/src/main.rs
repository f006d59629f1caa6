//! Negamax bot driver.
//!
//! Runs the engine from the command line: self-play games, analysis of a
//! position reached from a FEN and a move list, and perft counts.

mod config;

use anyhow::{Context, Result};
use chess_engine::{evaluate, perft_divide, GameState, SearchConfig, Searcher};
use clap::{Args, Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bot-negamax")]
#[command(about = "Negamax chess engine driver")]
struct Cli {
    /// Configuration file (defaults to negamax.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Search overrides shared by the commands that search.
#[derive(Args, Debug, Default)]
struct SearchArgs {
    /// Search depth in plies
    #[arg(short, long)]
    depth: Option<u32>,
    /// Search root moves in parallel
    #[arg(long)]
    parallel: bool,
    /// Worker threads for the parallel root (0 = all cores)
    #[arg(long)]
    threads: Option<usize>,
}

impl SearchArgs {
    fn apply(&self, base: SearchConfig) -> SearchConfig {
        SearchConfig {
            depth: self.depth.unwrap_or(base.depth).max(1),
            parallel: self.parallel || base.parallel,
            threads: self.threads.unwrap_or(base.threads),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Let the engine play against itself
    Selfplay {
        /// Stop after this many plies
        #[arg(short, long, default_value = "200")]
        plies: usize,
        /// Starting position (defaults to the standard start)
        #[arg(short, long)]
        fen: Option<String>,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Evaluate a position and suggest a move
    Analyze {
        /// Starting position (defaults to the standard start)
        #[arg(short, long)]
        fen: Option<String>,
        /// Space-separated moves in coordinate notation, e.g. "e2e4 e7e5 e7e8n"
        #[arg(short, long, default_value = "")]
        moves: String,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Count leaf nodes of the move tree
    Perft {
        /// Depth in plies
        #[arg(short, long)]
        depth: u32,
        /// Starting position (defaults to the standard start)
        #[arg(short, long)]
        fen: Option<String>,
    },
}

fn load_state(fen: Option<&str>) -> Result<GameState> {
    match fen {
        Some(fen) => GameState::from_fen(fen).with_context(|| format!("loading FEN '{}'", fen)),
        None => Ok(GameState::new()),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn selfplay(state: &mut GameState, config: SearchConfig, plies: usize) -> Result<()> {
    let mut searcher = Searcher::new(config);
    info!(
        "self-play from {} at depth {} (parallel: {})",
        state.to_fen(),
        config.depth,
        config.parallel
    );

    for ply in 0..plies {
        let started = Instant::now();
        let result = searcher.search(state)?;
        let Some(mv) = result.best_move else {
            break;
        };
        state.apply(mv);
        println!(
            "{:>3}. {:<6} score {:>9.2}  nodes {:>8}  {:>6} ms",
            ply + 1,
            mv.to_uci(),
            result.score,
            result.nodes,
            started.elapsed().as_millis()
        );
    }

    state.legal_moves();
    let outcome = if state.is_checkmate() {
        format!("{} is checkmated", state.side_to_move())
    } else if state.is_stalemate() {
        "stalemate".to_string()
    } else {
        format!("stopped after {} plies", state.plies())
    };
    println!("{}\n{}", state, state.to_fen());
    println!("Result: {}", outcome);
    Ok(())
}

fn analyze(state: &mut GameState, config: SearchConfig, moves: &str) -> Result<()> {
    for text in moves.split_whitespace() {
        state
            .play_uci(text)
            .with_context(|| format!("playing '{}'", text))?;
    }

    println!("{}", state);
    println!("FEN:         {}", state.to_fen());
    println!("Fingerprint: {:016x}", state.fingerprint());
    println!("Evaluation:  {:+.2}", evaluate(state));

    let started = Instant::now();
    let result = Searcher::new(config).search(state)?;
    match result.best_move {
        Some(mv) => println!(
            "Best move:   {} (score {:.2}, {} nodes, {} ms)",
            mv,
            result.score,
            result.nodes,
            started.elapsed().as_millis()
        ),
        None if state.is_checkmate() => println!("Best move:   none, checkmate"),
        None => println!("Best move:   none, stalemate"),
    }
    Ok(())
}

fn perft(state: &mut GameState, depth: u32) -> Result<()> {
    let started = Instant::now();
    let divide = perft_divide(state, depth)?;
    let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
    for (mv, nodes) in &divide {
        println!("{}: {}", mv, nodes);
    }
    println!(
        "\nNodes searched: {} ({} ms)",
        total,
        started.elapsed().as_millis()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Selfplay { plies, fen, search } => {
            let mut state = load_state(fen.as_deref())?;
            selfplay(&mut state, search.apply(config.search), plies)
        }
        Commands::Analyze { fen, moves, search } => {
            let mut state = load_state(fen.as_deref())?;
            analyze(&mut state, search.apply(config.search), &moves)
        }
        Commands::Perft { depth, fen } => {
            let mut state = load_state(fen.as_deref())?;
            perft(&mut state, depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "bot-negamax",
            "analyze",
            "--moves",
            "e2e4 e7e5",
            "--depth",
            "2",
            "--parallel",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { moves, search, fen } => {
                assert_eq!(moves, "e2e4 e7e5");
                assert_eq!(search.depth, Some(2));
                assert!(search.parallel);
                assert!(fen.is_none());
            }
            _ => panic!("expected analyze"),
        }

        let cli = Cli::try_parse_from(["bot-negamax", "perft", "--depth", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Perft { depth: 3, .. }));
        assert!(Cli::try_parse_from(["bot-negamax", "perft"]).is_err());
    }

    #[test]
    fn flags_override_file_settings() {
        let base = SearchConfig {
            depth: 5,
            parallel: false,
            threads: 4,
        };
        let args = SearchArgs {
            depth: Some(2),
            parallel: true,
            threads: None,
        };
        assert_eq!(
            args.apply(base),
            SearchConfig {
                depth: 2,
                parallel: true,
                threads: 4
            }
        );
        assert_eq!(SearchArgs::default().apply(base), base);
    }

    #[test]
    fn analyze_plays_promotions_and_reports() {
        let mut state = load_state(Some("8/P6k/8/8/8/8/8/K7 w - - 0 1")).unwrap();
        let config = SearchConfig {
            depth: 1,
            parallel: false,
            threads: 0,
        };
        analyze(&mut state, config, "a7a8n").unwrap();
        assert_eq!(state.plies(), 1);

        let mut state = GameState::new();
        assert!(analyze(&mut state, config, "e2e5").is_err());
    }

    #[test]
    fn selfplay_stops_at_the_ply_limit() {
        let mut state = GameState::new();
        let config = SearchConfig {
            depth: 1,
            parallel: false,
            threads: 0,
        };
        selfplay(&mut state, config, 4).unwrap();
        assert_eq!(state.plies(), 4);
    }

    #[test]
    fn selfplay_stops_at_mate() {
        let mut state = load_state(Some("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")).unwrap();
        let config = SearchConfig {
            depth: 2,
            parallel: false,
            threads: 0,
        };
        selfplay(&mut state, config, 10).unwrap();
        assert_eq!(state.last_move().map(|m| m.to_uci()), Some("a1a8".to_string()));
        assert!(state.is_checkmate());
    }

    #[test]
    fn bad_fen_is_reported() {
        let err = load_state(Some("not a fen")).unwrap_err();
        assert!(err.to_string().contains("not a fen"));
    }
}
