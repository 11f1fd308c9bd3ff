//! Wall-clock and resource measurement for solver runs.
//!
//! Wraps `Instant` for wall time and `getrusage(2)` for user/system CPU time,
//! peak RSS, and page-fault counts. CPU time and faults are reported as
//! deltas from the stopwatch's start; peak RSS is an absolute process-level
//! high-water mark.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
struct ResourceUsage {
    user: Duration,
    system: Duration,
    max_rss_kib: u64,
    soft_faults: u64,
    hard_faults: u64,
}

fn current_usage() -> ResourceUsage {
    let mut ru: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut ru) };
    if rc != 0 {
        return ResourceUsage::default();
    }
    ResourceUsage {
        user: timeval_duration(ru.ru_utime),
        system: timeval_duration(ru.ru_stime),
        max_rss_kib: ru.ru_maxrss as u64,
        soft_faults: ru.ru_minflt as u64,
        hard_faults: ru.ru_majflt as u64,
    }
}

fn timeval_duration(tv: libc::timeval) -> Duration {
    Duration::new(tv.tv_sec as u64, (tv.tv_usec as u32) * 1000)
}

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
    start_usage: ResourceUsage,
}

#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub wall: Duration,
    pub user: Duration,
    pub system: Duration,
    pub max_rss_kib: u64,
    pub soft_faults: u64,
    pub hard_faults: u64,
}

impl Stopwatch {
    pub fn start() -> Stopwatch {
        Stopwatch {
            start: Instant::now(),
            start_usage: current_usage(),
        }
    }

    /// Snapshot the metrics since start. Does not reset, so repeated calls
    /// measure from the same origin.
    pub fn elapsed(&self) -> Report {
        let usage = current_usage();
        Report {
            wall: self.start.elapsed(),
            user: usage.user.saturating_sub(self.start_usage.user),
            system: usage.system.saturating_sub(self.start_usage.system),
            max_rss_kib: usage.max_rss_kib,
            soft_faults: usage.soft_faults.saturating_sub(self.start_usage.soft_faults),
            hard_faults: usage.hard_faults.saturating_sub(self.start_usage.hard_faults),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wall {:.3}s user {:.3}s system {:.3}s rss {} MiB faults {} soft / {} hard",
            self.wall.as_secs_f64(),
            self.user.as_secs_f64(),
            self.system.as_secs_f64(),
            self.max_rss_kib / 1024,
            self.soft_faults,
            self.hard_faults
        )
    }
}
