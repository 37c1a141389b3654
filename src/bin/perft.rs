use anyhow::{Context, Result};
use clap::Parser;
use pvsearch::board::cozy::ChessPosition;
use pvsearch::perft::perft;
use pvsearch::search::Position;
use rayon::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "perft", about = "Perft driver over the search's board collaborator")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let base = if args.fen == "startpos" {
        ChessPosition::startpos()
    } else {
        ChessPosition::from_fen(&args.fen).context("invalid FEN")?
    };

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build()?;
    let (nodes, dt) = pool.install(|| {
        let t0 = Instant::now();
        let nodes = if args.threads <= 1 || args.depth == 0 {
            perft(&mut base.clone(), args.depth)
        } else {
            base.legal_moves().par_iter().map(|&mv| {
                let mut pos = base.clone();
                if !pos.make_move(mv) { return 0; }
                perft(&mut pos, args.depth - 1)
            }).sum()
        };
        (nodes, t0.elapsed().as_secs_f64())
    });

    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
