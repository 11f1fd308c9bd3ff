//! The win/loss/unknown database: an immutable on-disk sorted-interval index.
//!
//! Each classified rank set is stored as a pair of parallel files: `.bin`
//! holds the interval starts as little-endian u64s, `.len` one length byte
//! per interval (1–255; longer intervals are split by the writer). The
//! database memory-maps any number of such pairs read-only — typically the
//! aggregated win and loss files of every finished generation — and answers
//! point queries by binary search. Pairs from different generations never
//! overlap, so search order does not matter.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Advice, Mmap};

use crate::error::SolverError;

pub mod files;
pub mod writer;

/// A classified outcome stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Win,
    Loss,
}

impl Value {
    /// File-name tag for this value.
    pub fn tag(self) -> &'static str {
        match self {
            Value::Win => "win",
            Value::Loss => "loss",
        }
    }
}

/// Result of a point query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Unknown,
}

#[derive(Debug)]
struct Mapping {
    starts: Mmap,
    lengths: Mmap,
    count: usize,
    value: Value,
}

impl Mapping {
    #[inline]
    fn start_at(&self, idx: usize) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.starts[idx * 8..idx * 8 + 8]);
        u64::from_le_bytes(bytes)
    }

    #[inline]
    fn length_at(&self, idx: usize) -> u64 {
        self.lengths[idx] as u64
    }
}

/// Read-only view over any number of (starts, lengths, value) file pairs.
#[derive(Debug)]
pub struct WinLossDatabase {
    mappings: Vec<Mapping>,
}

impl WinLossDatabase {
    /// An empty database: every query answers [`Outcome::Unknown`]. This is
    /// what generation 0 runs against.
    pub fn empty() -> WinLossDatabase {
        WinLossDatabase {
            mappings: Vec::new(),
        }
    }

    /// Map the given file triples. A pair of empty files is skipped; a pair
    /// with exactly one empty file (or element counts that disagree) refuses
    /// construction.
    pub fn open(triples: &[(PathBuf, PathBuf, Value)]) -> Result<WinLossDatabase, SolverError> {
        let mut mappings = Vec::new();
        for (starts_path, lengths_path, value) in triples {
            let starts_bytes = file_size(starts_path)?;
            let lengths_bytes = file_size(lengths_path)?;
            if starts_bytes == 0 && lengths_bytes == 0 {
                continue;
            }
            if starts_bytes % 8 != 0 || starts_bytes / 8 != lengths_bytes {
                return Err(SolverError::LengthMismatch {
                    starts: starts_bytes as usize / 8,
                    lengths: lengths_bytes as usize,
                    path: starts_path.display().to_string(),
                });
            }
            let starts = map_readonly(starts_path)?;
            let lengths = map_readonly(lengths_path)?;
            mappings.push(Mapping {
                starts,
                lengths,
                count: lengths_bytes as usize,
                value: *value,
            });
        }
        Ok(WinLossDatabase { mappings })
    }

    /// Classify one rank.
    pub fn query(&self, rank: u64) -> Outcome {
        for mapping in &self.mappings {
            // Upper bound over the starts, then step back to the candidate
            // interval.
            let mut lo = 0usize;
            let mut hi = mapping.count;
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if mapping.start_at(mid) <= rank {
                    lo = mid + 1;
                } else {
                    hi = mid;
                }
            }
            if lo == 0 {
                continue;
            }
            let idx = lo - 1;
            if rank < mapping.start_at(idx) + mapping.length_at(idx) {
                return match mapping.value {
                    Value::Win => Outcome::Win,
                    Value::Loss => Outcome::Loss,
                };
            }
        }
        Outcome::Unknown
    }

    /// Number of mapped (non-empty) file pairs.
    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }
}

fn file_size(path: &Path) -> Result<u64, SolverError> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| SolverError::Io {
            stage: "inspecting",
            path: path.display().to_string(),
            error: e.to_string(),
        })
}

fn map_readonly(path: &Path) -> Result<Mmap, SolverError> {
    let file = File::open(path).map_err(|e| SolverError::Io {
        stage: "opening",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    let map = unsafe { Mmap::map(&file) }.map_err(|e| SolverError::Io {
        stage: "mapping",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    // Queries jump all over the file; advisory only, so failure is ignored.
    let _ = map.advise(Advice::Random);
    Ok(map)
}
