//! Persisting interval lists as paired start/length files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SolverError;
use crate::intervals::Interval;

/// Longest run one length byte can describe.
const MAX_CHUNK: u64 = 255;

/// Write interval lists as a `.bin`/`.len` pair.
///
/// Lists are first ordered by their leading start (results merged from
/// parallel workers arrive in completion order; the lists themselves cover
/// disjoint rank blocks). Intervals longer than 255 are split into chunks,
/// duplicating the start at 64 bits per chunk so the length array stays one
/// byte per record. Both files are flushed and fsynced before returning.
pub fn write_interval_files(
    mut lists: Vec<Vec<Interval>>,
    starts_path: &Path,
    lengths_path: &Path,
) -> Result<(), SolverError> {
    lists.retain(|list| !list.is_empty());
    lists.sort_unstable_by_key(|list| list[0].0);

    let mut starts = BufWriter::new(create(starts_path)?);
    let mut lengths = BufWriter::new(create(lengths_path)?);

    for list in &lists {
        for &(start, end) in list {
            let mut a = start;
            while a < end {
                let len = (end - a).min(MAX_CHUNK);
                starts
                    .write_all(&a.to_le_bytes())
                    .map_err(|e| write_error(starts_path, e))?;
                lengths
                    .write_all(&[len as u8])
                    .map_err(|e| write_error(lengths_path, e))?;
                a += len;
            }
        }
    }

    finish(starts, starts_path)?;
    finish(lengths, lengths_path)
}

fn create(path: &Path) -> Result<File, SolverError> {
    File::create(path).map_err(|e| SolverError::Io {
        stage: "creating",
        path: path.display().to_string(),
        error: e.to_string(),
    })
}

fn write_error(path: &Path, e: std::io::Error) -> SolverError {
    SolverError::Io {
        stage: "writing",
        path: path.display().to_string(),
        error: e.to_string(),
    }
}

fn finish(writer: BufWriter<File>, path: &Path) -> Result<(), SolverError> {
    let file = writer.into_inner().map_err(|e| SolverError::Io {
        stage: "flushing",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    file.sync_all().map_err(|e| SolverError::Io {
        stage: "syncing",
        path: path.display().to_string(),
        error: e.to_string(),
    })
}
