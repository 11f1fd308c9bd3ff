//! Count inherent wins and losses over the traditional board.
//!
//! Prints `visited wins losses`, one line per slice plus a total. This is the
//! quick smoke-and-benchmark entry; it writes nothing.

use std::process::exit;

use pushfight_solver::board::traditional;
use pushfight_solver::driver;
use pushfight_solver::stopwatch::Stopwatch;
use pushfight_solver::visitor::InherentValueVisitor;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut slice = None;
    let mut threads = driver::default_workers();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--slice" => {
                let Some(v) = args.get(i + 1) else {
                    eprintln!("--slice requires an integer argument");
                    exit(1);
                };
                match v.parse::<u32>() {
                    Ok(s) => slice = Some(s),
                    Err(e) => {
                        eprintln!("invalid --slice {v}: {e}");
                        exit(1);
                    }
                }
                i += 2;
            }
            "--threads" => {
                let Some(v) = args.get(i + 1) else {
                    eprintln!("--threads requires an integer argument");
                    exit(1);
                };
                match v.parse::<usize>() {
                    Ok(t) if t > 0 => threads = t,
                    _ => {
                        eprintln!("invalid --threads {v}");
                        exit(1);
                    }
                }
                i += 2;
            }
            other => {
                eprintln!("Usage: census [--slice S] [--threads K]\nunknown option: {other}");
                exit(1);
            }
        }
    }

    let board = traditional();
    let watch = Stopwatch::start();
    let slices = match slice {
        Some(s) if s < board.anchorable_squares() => s..s + 1,
        Some(s) => {
            eprintln!(
                "slice {s} out of range (board has {} anchorable squares)",
                board.anchorable_squares()
            );
            exit(1);
        }
        None => 0..board.anchorable_squares(),
    };

    let (mut visited, mut wins, mut losses) = (0u64, 0u64, 0u64);
    for s in slices {
        let mut visitor = match InherentValueVisitor::new(&board) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("census: {e}");
                exit(1);
            }
        };
        if let Err(e) = driver::enumerate_slice_threaded(&board, s, &mut visitor, threads) {
            eprintln!("census: {e}");
            exit(1);
        }
        let v = visitor.visited();
        let results = visitor.into_results();
        let (w, l) = (results.win_count(), results.loss_count());
        println!("slice {s:02}: {v} {w} {l}");
        visited += v;
        wins += w;
        losses += l;
    }

    println!("{visited} {wins} {losses}");
    println!("{}", watch.elapsed());
}
