use std::path::PathBuf;
use std::process::exit;

use pushfight_solver::board::{traditional, Board};
use pushfight_solver::db::{files, writer, Value, WinLossDatabase};
use pushfight_solver::driver;
use pushfight_solver::enumerate;
use pushfight_solver::error::SolverError;
use pushfight_solver::manifest::{write_manifest, RunManifest};
use pushfight_solver::stopwatch::Stopwatch;
use pushfight_solver::visitor::{
    ClassifiedIntervals, InherentValueVisitor, OpeningProcedureVisitor, OutcountingVisitor,
};

const USAGE: &str = "Usage: solve --generation <N> --data-dir <DIR> [options]

Computes one shard of the Push Fight win/loss database.

Options:
  --generation <N>   generation to compute (0 = inherent values), or, with
                     --opening, the number of finished generations to load
  --data-dir <DIR>   where database files live; shards stage under <DIR>/tmp
  --slice <S>        anchor-square slice to compute (default: all slices)
  --subslice <T>     subslice shard (generations >= 1 only)
  --threads <K>      worker threads (default: one per logical core)
  --opening          classify opening placements against the database";

struct Options {
    generation: u32,
    data_dir: PathBuf,
    slice: Option<u32>,
    subslice: Option<u64>,
    threads: usize,
    opening: bool,
}

fn usage_error(message: &str) -> ! {
    eprintln!("{message}\n\n{USAGE}");
    exit(1);
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut generation = None;
    let mut data_dir = None;
    let mut slice = None;
    let mut subslice = None;
    let mut threads = driver::default_workers();
    let mut opening = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--generation" => {
                generation = Some(parse_value(&args, i, "--generation"));
                i += 2;
            }
            "--data-dir" => {
                let Some(v) = args.get(i + 1) else {
                    usage_error("--data-dir requires a path argument");
                };
                data_dir = Some(PathBuf::from(v));
                i += 2;
            }
            "--slice" => {
                slice = Some(parse_value(&args, i, "--slice"));
                i += 2;
            }
            "--subslice" => {
                subslice = Some(parse_value(&args, i, "--subslice"));
                i += 2;
            }
            "--threads" => {
                threads = parse_value(&args, i, "--threads");
                i += 2;
            }
            "--opening" => {
                opening = true;
                i += 1;
            }
            other => usage_error(&format!("unknown option: {other}")),
        }
    }

    let Some(generation) = generation else {
        usage_error("--generation is required");
    };
    let Some(data_dir) = data_dir else {
        usage_error("--data-dir is required");
    };
    if threads == 0 {
        usage_error("--threads must be at least 1");
    }
    Options {
        generation,
        data_dir,
        slice,
        subslice,
        threads,
        opening,
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let Some(v) = args.get(i + 1) else {
        usage_error(&format!("{flag} requires an integer argument"));
    };
    match v.parse() {
        Ok(x) => x,
        Err(_) => usage_error(&format!("invalid {flag} value: {v}")),
    }
}

fn main() {
    let opts = parse_options();
    let board = traditional();

    if let Some(s) = opts.slice {
        if s >= board.anchorable_squares() {
            usage_error(&format!(
                "--slice {s} out of range (board has {} anchorable squares)",
                board.anchorable_squares()
            ));
        }
    }
    if opts.generation == 0 && opts.subslice.is_some() && !opts.opening {
        usage_error("generation 0 shards by slice; --subslice applies to generations >= 1");
    }

    let result = if opts.opening {
        run_opening(&board, &opts)
    } else if opts.generation == 0 {
        run_generation_zero(&board, &opts)
    } else {
        run_generation(&board, &opts)
    };

    if let Err(e) = result {
        eprintln!("solve: {e}");
        exit(1);
    }
}

fn run_generation_zero(board: &Board, opts: &Options) -> Result<(), SolverError> {
    files::ensure_tmp_dir(&opts.data_dir)?;
    let slices = match opts.slice {
        Some(s) => s..s + 1,
        None => 0..board.anchorable_squares(),
    };
    for slice in slices {
        let watch = Stopwatch::start();
        let mut visitor = InherentValueVisitor::new(board)?;
        driver::enumerate_slice_threaded(board, slice, &mut visitor, opts.threads)?;
        let visited = visitor.visited();
        let results = visitor.into_results();
        persist_shard(board, opts, slice, None, visited, results, &watch)?;
    }
    Ok(())
}

fn run_generation(board: &Board, opts: &Options) -> Result<(), SolverError> {
    let Some(slice) = opts.slice else {
        usage_error("generations >= 1 require --slice");
    };
    files::ensure_tmp_dir(&opts.data_dir)?;
    let db = files::open_through_generation(&opts.data_dir, opts.generation)?;
    let subslices = match opts.subslice {
        Some(t) => t..t + 1,
        None => 0..pushfight_solver::rank::subslice_count(board),
    };
    for subslice in subslices {
        let watch = Stopwatch::start();
        let mut visitor = OutcountingVisitor::new(board, &db)?;
        enumerate::for_each_state_in_subslice(board, slice, subslice, &mut visitor)?;
        let visited = visitor.visited();
        let results = visitor.into_results();
        persist_shard(board, opts, slice, Some(subslice), visited, results, &watch)?;
    }
    Ok(())
}

fn run_opening(board: &Board, opts: &Options) -> Result<(), SolverError> {
    let watch = Stopwatch::start();
    let db = if opts.generation == 0 {
        WinLossDatabase::empty()
    } else {
        files::open_through_generation(&opts.data_dir, opts.generation)?
    };
    let mut visitor = OpeningProcedureVisitor::new(board, &db);
    enumerate::for_each_opening_state(board, &mut visitor)?;
    println!(
        "openings: {} won, {} lost, {} drawn ({} total)",
        visitor.won.len(),
        visitor.lost.len(),
        visitor.drawn.len(),
        visitor.visited()
    );
    println!("{}", watch.elapsed());
    Ok(())
}

fn persist_shard(
    board: &Board,
    opts: &Options,
    slice: u32,
    subslice: Option<u64>,
    visited: u64,
    results: ClassifiedIntervals,
    watch: &Stopwatch,
) -> Result<(), SolverError> {
    let wins = results.win_count();
    let losses = results.loss_count();

    let win_paths = files::shard_paths(&opts.data_dir, Value::Win, opts.generation, slice, subslice);
    let loss_paths =
        files::shard_paths(&opts.data_dir, Value::Loss, opts.generation, slice, subslice);
    files::refuse_existing(&win_paths)?;
    files::refuse_existing(&loss_paths)?;

    writer::write_interval_files(
        results.win_lists,
        &win_paths.tmp_starts,
        &win_paths.tmp_lengths,
    )?;
    writer::write_interval_files(
        results.loss_lists,
        &loss_paths.tmp_starts,
        &loss_paths.tmp_lengths,
    )?;
    files::promote(&win_paths)?;
    files::promote(&loss_paths)?;

    let mut manifest = RunManifest {
        board: board.name().to_string(),
        generation: opts.generation,
        slice: Some(slice),
        subslice,
        visited,
        wins,
        losses,
        wall_millis: 0,
        user_millis: 0,
        system_millis: 0,
        max_rss_kib: 0,
    };
    let report = watch.elapsed();
    manifest.set_timing(&report);
    let manifest_name = match subslice {
        None => format!("manifest-{}-{:02}.json", opts.generation, slice),
        Some(t) => format!("manifest-{}-{:02}-{:03}.json", opts.generation, slice, t),
    };
    write_manifest(&opts.data_dir.join(manifest_name), &manifest)?;

    match subslice {
        None => println!(
            "generation {} slice {:02}: {} visited, {} wins, {} losses",
            opts.generation, slice, visited, wins, losses
        ),
        Some(t) => println!(
            "generation {} slice {:02} subslice {:03}: {} visited, {} wins, {} losses",
            opts.generation, slice, t, visited, wins, losses
        ),
    }
    println!("{report}");
    Ok(())
}
