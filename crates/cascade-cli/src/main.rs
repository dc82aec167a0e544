//! `cascade`: reads a classified merge board and recommends the best swap.
//!
//! ```text
//! cascade board.txt                 # search every swap
//! cascade board.json --swap 3,3 2,3 # preview one swap (1-based)
//! cascade --random 42 --json        # demo on a generated board
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cascade_core::{
    find_best_swap, simulate_swap, Board, BoardGenerator, CascadeReport, Pos, Rules, SearchOutcome, SwapMove,
};
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "cascade", version, about = "Best-swap finder for merge boards")]
struct Args {
    /// Board file: whitespace-separated rows (`A1 B2 . ?0`) or a `.json` grid.
    /// Reads stdin when omitted or `-`.
    board: Option<PathBuf>,

    /// JSON rules file; unset fields keep their defaults and the shape
    /// defaults to the board's
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Preview one swap instead of searching: `--swap 3,3 2,3`
    #[arg(long, num_args = 2, value_names = ["R1,C1", "R2,C2"], value_parser = parse_position)]
    swap: Vec<Pos>,

    /// Search a generated 6x6 board seeded with this value
    #[arg(long, conflicts_with = "board")]
    random: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log to stderr: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_position(s: &str) -> std::result::Result<Pos, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {s:?}"))?;
    let row: usize = row.trim().parse().map_err(|e| format!("bad row {row:?}: {e}"))?;
    let col: usize = col.trim().parse().map_err(|e| format!("bad column {col:?}: {e}"))?;
    Pos::from_one_based(row, col).ok_or_else(|| format!("positions are 1-based, got {s:?}"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// Input
// =============================================================================

fn read_board(path: Option<&Path>) -> Result<Board> {
    let (text, json) = match path {
        Some(path) if path != Path::new("-") => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read board from {}", path.display()))?;
            let json = path.extension().is_some_and(|ext| ext == "json");
            (text, json)
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read board from stdin")?;
            let json = text.trim_start().starts_with('[');
            (text, json)
        }
    };

    if json {
        serde_json::from_str(&text).context("failed to parse JSON board")
    } else {
        text.parse().context("failed to parse board")
    }
}

fn load_rules(path: Option<&Path>, board: &Board) -> Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::for_shape(board.shape()));
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text).context("failed to parse rules")?;
    let has_shape = value.get("shape").is_some();
    let mut rules: Rules = serde_json::from_value(value).context("failed to parse rules")?;
    if !has_shape {
        rules.shape = board.shape();
    }
    Ok(rules)
}

// =============================================================================
// Output
// =============================================================================

type OneBased = [[usize; 2]; 2];

fn one_based(mv: SwapMove) -> OneBased {
    let ((r1, c1), (r2, c2)) = mv.one_based();
    [[r1, c1], [r2, c2]]
}

#[derive(Serialize)]
struct SearchReport {
    best: Option<OneBased>,
    score: u64,
    rounds: usize,
    removed: usize,
    evaluated: usize,
    skipped: usize,
}

impl SearchReport {
    fn new(outcome: &SearchOutcome) -> Self {
        let (rounds, removed) = outcome
            .report
            .as_ref()
            .map_or((0, 0), |r| (r.rounds(), r.removed));
        Self {
            best: outcome.best.map(one_based),
            score: outcome.score,
            rounds,
            removed,
            evaluated: outcome.evaluated,
            skipped: outcome.skipped,
        }
    }
}

#[derive(Serialize)]
struct SwapReport<'a> {
    swap: OneBased,
    score: u64,
    rounds: usize,
    removed: usize,
    board: &'a Board,
}

fn search(board: &Board, rules: &Rules, json: bool) -> Result<()> {
    let outcome = find_best_swap(board, rules)?;
    info!(
        evaluated = outcome.evaluated,
        skipped = outcome.skipped,
        "search finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&SearchReport::new(&outcome))?);
        return Ok(());
    }

    println!("{board}\n");
    match outcome.best {
        Some(best) => println!("recommended swap {best}, predicted score {}", outcome.score),
        None => println!("no beneficial swap"),
    }
    Ok(())
}

fn preview(board: &Board, rules: &Rules, mv: SwapMove, json: bool) -> Result<()> {
    let (end, report): (Board, CascadeReport) =
        simulate_swap(board, mv, rules).with_context(|| format!("cannot simulate swap {mv}"))?;

    if json {
        let out = SwapReport {
            swap: one_based(mv),
            score: report.score,
            rounds: report.rounds(),
            removed: report.removed,
            board: &end,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{board}\n");
    println!(
        "swap {mv} scores {} over {} round(s), removing {} piece(s)\n",
        report.score,
        report.rounds(),
        report.removed
    );
    println!("{end}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let board = match args.random {
        Some(seed) => BoardGenerator::default()
            .generate(seed)
            .context("failed to generate board")?,
        None => read_board(args.board.as_deref())?,
    };
    let rules = load_rules(args.rules.as_deref(), &board)?;
    info!(shape = %board.shape(), pieces = board.occupied(), "board loaded");

    match args.swap.as_slice() {
        [] => search(&board, &rules, args.json),
        [a, b] => preview(&board, &rules, SwapMove::new(*a, *b), args.json),
        _ => bail!("--swap takes exactly two positions"),
    }
}
