//! score-estimator: estimate territory and dead stones of a Go position.
//!
//! ## Usage
//!
//! - `score-estimator` - Estimate a built-in demo position
//! - `score-estimator estimate board.txt` - Estimate a diagram or JSON request
//! - `score-estimator estimate --format json < board.json` - Read stdin, answer in JSON

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use score_estimator::constants::{DEFAULT_ITERATIONS, DEFAULT_TOLERANCE};
use score_estimator::{
    Color, Estimate, EstimateParams, Estimator, Goban, Point, RolloutStats, diagram,
};

/// Score estimator for finished Go positions
#[derive(Parser)]
#[command(name = "score-estimator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every intermediate grid to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate a position given as a text diagram or a JSON request
    Estimate {
        /// Input file; stdin when omitted
        input: Option<PathBuf>,
        /// Side to move
        #[arg(long, value_enum)]
        player: Option<Side>,
        /// Playouts per rollout pass
        #[arg(long)]
        iterations: Option<usize>,
        /// Fraction of the playouts a point must be won by
        #[arg(long)]
        tolerance: Option<f64>,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Estimate a built-in position
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    Black,
    White,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::Black => Color::Black,
            Side::White => Color::White,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Deserialize)]
struct Request {
    width: usize,
    height: usize,
    cells: Vec<i32>,
    player: Option<Color>,
    iterations: Option<usize>,
    tolerance: Option<f64>,
    seed: Option<u64>,
}

#[derive(Serialize)]
struct Response {
    width: usize,
    height: usize,
    ownership: Vec<i32>,
    dead_stones: Vec<Point>,
    stats: RolloutStats,
}

const DEMO_POSITION: &str = "
    . . . . . . . . .
    . . X X X O O . .
    . X . X O . O . .
    . X X X O O O . .
    . . X O . O X O .
    . . X O O X X O .
    . X . X O X . X O
    . . X X O O X X .
    . . . X . O . . .
";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Some(Commands::Estimate {
            input,
            player,
            iterations,
            tolerance,
            seed,
            format,
        }) => {
            let text = read_input(input.as_ref())?;
            let mut job = Job::from_input(&text)?;
            if let Some(side) = player {
                job.player = side.into();
            }
            if let Some(n) = iterations {
                job.params.iterations = n;
            }
            if let Some(t) = tolerance {
                job.params.tolerance = t;
            }
            job.seed = seed.or(job.seed);

            let estimate = job.run()?;
            match format {
                Format::Text => print_text(&job.goban, &estimate),
                Format::Json => {
                    let response = Response {
                        width: job.goban.width(),
                        height: job.goban.height(),
                        ownership: estimate.ownership.cells().to_vec(),
                        dead_stones: estimate.dead_stones,
                        stats: estimate.stats,
                    };
                    println!("{}", serde_json::to_string(&response)?);
                }
            }
        }
        Some(Commands::Demo) | None => run_demo()?,
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("score_estimator=trace")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "score_estimator=info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// A position plus everything needed to estimate it.
struct Job {
    goban: Goban,
    player: Color,
    params: EstimateParams,
    seed: Option<u64>,
}

impl Job {
    fn from_input(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            let request: Request =
                serde_json::from_str(text).context("failed to parse JSON request")?;
            let goban = Goban::from_cells(request.width, request.height, &request.cells)?;
            Ok(Self {
                goban,
                player: request.player.unwrap_or(Color::Black),
                params: EstimateParams::new(
                    request.iterations.unwrap_or(DEFAULT_ITERATIONS),
                    request.tolerance.unwrap_or(DEFAULT_TOLERANCE),
                ),
                seed: request.seed,
            })
        } else {
            let goban = diagram::parse(text).context("failed to parse board diagram")?;
            Ok(Self {
                goban,
                player: Color::Black,
                params: EstimateParams::default(),
                seed: None,
            })
        }
    }

    fn run(&self) -> Result<Estimate> {
        let mut estimator = match self.seed {
            Some(seed) => Estimator::with_seed(self.params, seed)?,
            None => Estimator::new(self.params)?,
        };
        Ok(estimator.estimate(&self.goban, self.player))
    }
}

fn print_text(goban: &Goban, estimate: &Estimate) {
    print!("{}", diagram::render(&estimate.ownership));
    let dead: Vec<String> = estimate
        .dead_stones
        .iter()
        .map(|p| p.coord(goban.height()))
        .collect();
    if dead.is_empty() {
        println!("dead: none");
    } else {
        println!("dead: {}", dead.join(" "));
    }
    let black = estimate.ownership.cells().iter().filter(|&&v| v > 0).count();
    let white = estimate.ownership.cells().iter().filter(|&&v| v < 0).count();
    println!("black {black}, white {white}");
}

fn run_demo() -> Result<()> {
    println!("score-estimator demo\n");

    let job = Job {
        goban: diagram::parse(DEMO_POSITION)?,
        player: Color::Black,
        params: EstimateParams::default(),
        seed: Some(1),
    };
    println!("=== Position ===");
    println!("{}", job.goban);

    println!(
        "=== Ownership ({} playouts per pass, tolerance {}) ===",
        job.params.iterations, job.params.tolerance
    );
    let estimate = job.run()?;
    print_text(&job.goban, &estimate);
    Ok(())
}
