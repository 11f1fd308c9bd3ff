//! Per-shard run manifests.
//!
//! Every shard run leaves a small JSON record next to its interval files:
//! what was computed, how many positions classified each way, and what it
//! cost. The outer pipeline uses these to audit a distributed run without
//! reparsing the interval files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::stopwatch::Report;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub board: String,
    pub generation: u32,
    pub slice: Option<u32>,
    pub subslice: Option<u64>,
    pub visited: u64,
    pub wins: u64,
    pub losses: u64,
    pub wall_millis: u64,
    pub user_millis: u64,
    pub system_millis: u64,
    pub max_rss_kib: u64,
}

impl RunManifest {
    pub fn set_timing(&mut self, report: &Report) {
        self.wall_millis = report.wall.as_millis() as u64;
        self.user_millis = report.user.as_millis() as u64;
        self.system_millis = report.system.as_millis() as u64;
        self.max_rss_kib = report.max_rss_kib;
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<(), SolverError> {
    let file = File::create(path).map_err(|e| SolverError::Io {
        stage: "creating",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, manifest).map_err(|e| SolverError::Io {
        stage: "writing",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    writer.flush().map_err(|e| SolverError::Io {
        stage: "flushing",
        path: path.display().to_string(),
        error: e.to_string(),
    })
}

pub fn read_manifest(path: &Path) -> Result<RunManifest, SolverError> {
    let file = File::open(path).map_err(|e| SolverError::Io {
        stage: "opening",
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| SolverError::Io {
        stage: "parsing",
        path: path.display().to_string(),
        error: e.to_string(),
    })
}
