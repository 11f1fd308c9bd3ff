//! Database file naming, shard promotion, and generation loading.
//!
//! Shards write into `<data_dir>/tmp/` and are rename-promoted into
//! `<data_dir>` only after both files of every pair are written and fsynced,
//! so a crash can never leave a torn shard at its final path. Concatenating
//! per-shard files into the aggregated per-generation files is the outer
//! pipeline's job; this module only names and loads them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::db::{Value, WinLossDatabase};
use crate::error::SolverError;

/// `win-3.bin` / `loss-3.len`: one aggregated pair per generation and value.
pub fn aggregate_paths(data_dir: &Path, generation: u32, value: Value) -> (PathBuf, PathBuf) {
    let stem = format!("{}-{}", value.tag(), generation);
    (
        data_dir.join(format!("{stem}.bin")),
        data_dir.join(format!("{stem}.len")),
    )
}

/// Shard stem: `win-0-07` for a generation-0 slice shard, `win-3-07-123` for
/// a later-generation subslice shard.
pub fn shard_stem(value: Value, generation: u32, slice: u32, subslice: Option<u64>) -> String {
    match subslice {
        None => format!("{}-{}-{:02}", value.tag(), generation, slice),
        Some(sub) => format!("{}-{}-{:02}-{:03}", value.tag(), generation, slice, sub),
    }
}

/// The `tmp/` staging paths and final paths of one shard pair.
pub struct ShardPaths {
    pub tmp_starts: PathBuf,
    pub tmp_lengths: PathBuf,
    pub final_starts: PathBuf,
    pub final_lengths: PathBuf,
}

pub fn shard_paths(
    data_dir: &Path,
    value: Value,
    generation: u32,
    slice: u32,
    subslice: Option<u64>,
) -> ShardPaths {
    let stem = shard_stem(value, generation, slice, subslice);
    ShardPaths {
        tmp_starts: data_dir.join("tmp").join(format!("{stem}.bin")),
        tmp_lengths: data_dir.join("tmp").join(format!("{stem}.len")),
        final_starts: data_dir.join(format!("{stem}.bin")),
        final_lengths: data_dir.join(format!("{stem}.len")),
    }
}

/// Create `<data_dir>/tmp` if needed.
pub fn ensure_tmp_dir(data_dir: &Path) -> Result<(), SolverError> {
    let tmp = data_dir.join("tmp");
    fs::create_dir_all(&tmp).map_err(|e| SolverError::Io {
        stage: "creating",
        path: tmp.display().to_string(),
        error: e.to_string(),
    })
}

/// Refuse to clobber finished output.
pub fn refuse_existing(paths: &ShardPaths) -> Result<(), SolverError> {
    for path in [&paths.final_starts, &paths.final_lengths] {
        if path.exists() {
            return Err(SolverError::Io {
                stage: "checking",
                path: path.display().to_string(),
                error: "output file already exists".to_string(),
            });
        }
    }
    Ok(())
}

/// Rename both staged files of a shard to their final paths.
pub fn promote(paths: &ShardPaths) -> Result<(), SolverError> {
    for (tmp, fin) in [
        (&paths.tmp_starts, &paths.final_starts),
        (&paths.tmp_lengths, &paths.final_lengths),
    ] {
        fs::rename(tmp, fin).map_err(|e| SolverError::Io {
            stage: "promoting",
            path: fin.display().to_string(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Open the aggregated win/loss pairs of every generation before
/// `generation`. A generation whose files are absent refuses the run.
pub fn open_through_generation(
    data_dir: &Path,
    generation: u32,
) -> Result<WinLossDatabase, SolverError> {
    let mut triples = Vec::new();
    for gen in 0..generation {
        for value in [Value::Win, Value::Loss] {
            let (starts, lengths) = aggregate_paths(data_dir, gen, value);
            for path in [&starts, &lengths] {
                if !path.exists() {
                    return Err(SolverError::MissingGeneration {
                        generation: gen,
                        path: path.display().to_string(),
                    });
                }
            }
            triples.push((starts, lengths, value));
        }
    }
    WinLossDatabase::open(&triples)
}
