use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pvsearch::board::cozy::ChessPosition;
use pvsearch::search::eval::MaterialEvaluator;
use pvsearch::search::{SearchParams, SearchResult, Searcher};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "pvsearch-bench", version, about = "Fixed-depth search over a set of positions")]
struct Args {
    /// FEN string or 'startpos' (repeatable)
    #[arg(long, default_value = "startpos")]
    fen: Vec<String>,

    /// Fixed search depth
    #[arg(long, default_value_t = 5)]
    depth: i32,

    /// Transposition table size in MB, per position
    #[arg(long)]
    hash_mb: Option<usize>,

    /// JSON file with search parameters (missing fields keep their defaults)
    #[arg(long)]
    params: Option<String>,

    /// Positions searched in parallel, each by its own searcher
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// One JSON object per position instead of plain text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Report {
    fen: String,
    depth: i32,
    #[serde(flatten)]
    result: SearchResult,
    qnodes: u64,
    researches: u64,
    elapsed_ms: u128,
}

fn load_params(path: Option<&str>) -> Result<SearchParams> {
    let Some(path) = path else { return Ok(SearchParams::default()); };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading params file {path}"))?;
    let params: SearchParams = serde_json::from_str(&text).with_context(|| format!("parsing params file {path}"))?;
    Ok(params)
}

fn run_one(fen: &str, depth: i32, params: SearchParams) -> Result<Report> {
    let mut pos = if fen == "startpos" {
        ChessPosition::startpos()
    } else {
        ChessPosition::from_fen(fen).with_context(|| format!("invalid FEN '{fen}'"))?
    };
    let mut searcher = Searcher::with_params(MaterialEvaluator, params)?;
    let t0 = Instant::now();
    let result = searcher.search(&mut pos, depth);
    let stats = searcher.stats();
    Ok(Report {
        fen: fen.to_string(),
        depth,
        result,
        qnodes: stats.qnodes,
        researches: stats.researches,
        elapsed_ms: t0.elapsed().as_millis(),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut params = load_params(args.params.as_deref())?;
    if let Some(mb) = args.hash_mb { params.hash_mb = mb; }
    params.validate()?;

    let bar = ProgressBar::new(args.fen.len() as u64);
    bar.set_style(ProgressStyle::with_template("{spinner} positions {pos}/{len} {elapsed_precise} {bar:40} {msg}")?);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let reports: Vec<Result<Report>> = pool.install(|| {
        args.fen
            .par_iter()
            .map(|fen| {
                let r = run_one(fen, args.depth, params);
                bar.inc(1);
                r
            })
            .collect()
    });
    bar.finish_and_clear();

    let mut total_nodes = 0u64;
    let mut total_ms = 0u128;
    for report in reports {
        let report = report?;
        total_nodes += report.result.nodes + report.qnodes;
        total_ms += report.elapsed_ms;
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "{} depth={} bestmove={} score={} nodes={} qnodes={} pv={} elapsed={}ms",
                report.fen,
                report.depth,
                report.result.bestmove.as_deref().unwrap_or("(none)"),
                report.result.score,
                report.result.nodes,
                report.qnodes,
                report.result.pv.join(" "),
                report.elapsed_ms,
            );
        }
    }
    if !args.json {
        let secs = (total_ms as f64 / 1000.0).max(f64::EPSILON);
        println!("total nodes={} nps={:.1}", total_nodes, total_nodes as f64 / secs);
    }
    Ok(())
}
