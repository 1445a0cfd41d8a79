//! mcts-arena terminal front end.
//!
//! Reads commands from stdin and drives one `Session`.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mcts_arena::core::{GameState, Move};
use mcts_arena::games::GameKind;
use mcts_arena::session::{AutoplayToggle, Session, SessionConfig, Transition};

/// Play grid, territory or abduction games against an MCTS oracle
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game to start with (grid, territory, abduction)
    #[arg(short, long)]
    game: Option<GameKind>,

    /// Seed for dealing initial states
    #[arg(long)]
    seed: Option<u64>,

    /// Do not let the oracle reply after player moves
    #[arg(long)]
    no_ai: bool,
}

const HELP: &str = "\
commands:
  <move> | play <move>   play a move for the side to move
  moves                  list legal moves
  ai                     let the oracle move
  undo | redo            move through history
  auto                   toggle autoplay
  follow                 toggle oracle replies to player moves
  tree [depth]           show the last search tree
  reset                  start the current game over
  game <name>            switch game (grid, territory, abduction)
  show | help | quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(game) = cli.game {
        config.game = game;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.no_ai {
        config.ai_follows_player = false;
    }

    let session = Arc::new(Session::new(config)?);
    info!(game = %session.kind(), "arena ready");
    println!("{HELP}");
    show(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest: Vec<&str> = words.collect();

        match command {
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "show" => show(&session),
            "moves" => {
                let moves = session.current_state().legal_moves();
                let tokens: Vec<&str> = moves.iter().map(Move::as_str).collect();
                println!("{}", tokens.join("  "));
            }
            "ai" => {
                report(session.request_oracle_move().await);
                show(&session);
            }
            "undo" => {
                report(Ok(session.undo()));
                show(&session);
            }
            "redo" => {
                report(Ok(session.redo()));
                show(&session);
            }
            "auto" => match session.toggle_autoplay() {
                AutoplayToggle::Started => println!("autoplay on; 'auto' again to stop"),
                AutoplayToggle::Stopped => {
                    session.join_autoplay().await;
                    show(&session);
                }
                AutoplayToggle::Rejected(reason) => println!("rejected: {reason}"),
            },
            "follow" => {
                let enabled = session.toggle_ai_follows_player();
                println!("oracle replies {}", if enabled { "on" } else { "off" });
            }
            "tree" => {
                let depth = rest.first().and_then(|d| d.parse().ok()).unwrap_or(1);
                show_tree(&session, depth);
            }
            "reset" => {
                session.reset_game()?;
                show(&session);
            }
            "game" => match rest.first().map(|name| name.parse::<GameKind>()) {
                Some(Ok(kind)) => {
                    session.change_game(kind)?;
                    show(&session);
                }
                Some(Err(err)) => println!("{err}"),
                None => println!("usage: game <grid|territory|abduction>"),
            },
            "play" => {
                play(&session, &rest.join(" ")).await;
            }
            _ => {
                play(&session, line.trim()).await;
            }
        }
    }

    session.stop_autoplay();
    session.join_autoplay().await;
    Ok(())
}

async fn play(session: &Session, token: &str) {
    report(session.submit_player_move(&Move::from(token)).await);
    show(session);
}

fn report(result: mcts_arena::Result<Transition>) {
    match result {
        Ok(Transition::Committed { .. }) => {}
        Ok(Transition::Rejected(reason)) => println!("rejected: {reason}"),
        Err(err) => {
            warn!(error = %err, "request failed");
            println!("error: {err}");
        }
    }
}

fn show(session: &Session) {
    let snap = session.snapshot();
    let state = &snap.state;
    println!();
    println!("{} [{}/{}]", snap.kind, snap.history_index + 1, snap.history_len);
    println!("{}", state.label());
    if state.is_terminal() {
        match state.reward() {
            Ok(reward) => match reward.winner() {
                Some(team) => println!("game over: {} wins", state.team_label(team)),
                None => println!("game over: draw"),
            },
            Err(err) => println!("error: {err}"),
        }
    } else {
        println!("{} to move", state.team_label(state.current_team()));
    }
}

fn show_tree(session: &Session, depth: usize) {
    let Some(tree) = session.tree() else {
        println!("no search tree");
        return;
    };
    let stats = tree.root().stats(depth);
    print_stats(&stats, 0);
}

fn print_stats(stats: &mcts_arena::NodeStats, indent: usize) {
    let mv = stats.mv.as_ref().map_or("-", Move::as_str);
    println!(
        "{:indent$}{mv} {} visits={} rewards=[{:.2}, {:.2}]",
        "",
        stats.label,
        stats.visits,
        stats.rewards[mcts_arena::Team::A],
        stats.rewards[mcts_arena::Team::B],
        indent = indent * 2
    );
    for child in stats.children.iter().flatten() {
        print_stats(child, indent + 1);
    }
}
