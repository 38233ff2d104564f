use clap::{Parser, ValueEnum};
use game_trees::game::nim::Nim;
use game_trees::game::{self, regulation};
use game_trees::render;
use game_trees::report::Report;
use game_trees::solver::{Solver, TieBreak};

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Solves a perfect-information game by backward induction and prints its
/// subgame perfect equilibrium.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Which game to solve
    #[arg(long, value_enum, default_value_t = Example::Regulation)]
    game: Example,

    /// Action picked when a player is indifferent
    #[arg(long, value_enum, default_value_t = Rule::Lowest)]
    tie_break: Rule,

    /// Write the game tree as Graphviz DOT, equilibrium path in red
    #[arg(long)]
    dot: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Example {
    Regulation,
    Nim,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Rule {
    Lowest,
    Highest,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let (tree, title) = match args.game {
        Example::Regulation => (regulation::tree(), regulation::TITLE),
        Example::Nim => (game::expand::<Nim>(), "Nim"),
    };
    let rule = match args.tie_break {
        Rule::Lowest => TieBreak::Lowest,
        Rule::Highest => TieBreak::Highest,
    };
    log::info!("solving {} ({} nodes)", title, tree.len());
    let result = Solver::new().tie_break(rule).solve(&tree)?;
    print!("{}", Report::new(&tree, &result));
    if let Some(path) = args.dot {
        fs::write(&path, render::dot(&tree, &result, title))?;
        log::info!("saved game tree to {}", path.display());
    }
    Ok(())
}
