//! CLI for maze generation

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use anyhow::Context;
use clap::Parser;
use oshwdem_maze::{layout::ContestLayout, GoalMode};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Maze size as `COLS,ROWS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Size {
    cols: usize,
    rows: usize,
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || format!("expected two integers separated by a comma, got `{s}`");
        let (cols, rows) = s.split_once(',').ok_or_else(err)?;
        Ok(Size {
            cols: cols.trim().parse().map_err(|_| err())?,
            rows: rows.trim().parse().map_err(|_| err())?,
        })
    }
}

fn probability(s: &str) -> Result<f64, String> {
    let p: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not within 0.0..=1.0"))
    }
}

/// Maze generator for the OSHWDEM robot contest
///
/// Prints a maze, then a new one every time <enter> is pressed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze size, columns and rows separated by a comma
    #[arg(short = 'z', long, default_value = "16,16")]
    size: Size,

    /// Put the goal in the upper right corner instead of the center
    #[arg(short, long)]
    corner_goal: bool,

    /// Probability of generating straight paths (0.0 - 1.0)
    #[arg(short, long, default_value_t = 0.5, value_parser = probability)]
    straightforward: f64,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print a single maze and exit
    #[arg(long)]
    once: bool,
}

/// Generate mazes, print output
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args, "parsed arguments");

    let goal = if args.corner_goal {
        GoalMode::Corner
    } else {
        GoalMode::Center
    };
    let layout = ContestLayout::new(args.size.cols, args.size.rows, goal)?;
    let mut random = match args.seed {
        Some(state) => StdRng::seed_from_u64(state),
        None => StdRng::from_entropy(),
    };

    println!("\nOSHWDEM Maze Generator v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Algorithm: depth-first [straightforward probability {:.0}%]",
        args.straightforward * 100.0
    );

    let mut lines = io::stdin().lock().lines();
    loop {
        let maze = layout.build(&mut random, args.straightforward)?;
        info!(cols = maze.cols(), rows = maze.rows(), ?goal, "maze generated");
        print!("{maze}");

        if args.once {
            break;
        }
        match lines.next() {
            Some(line) => {
                line.context("Failed to read from stdin")?;
            }
            None => break,
        }
    }
    Ok(())
}
