//! Search statistics tracking.

use std::fmt;
use std::time::{Duration, Instant};

use log::info;

use crate::pool::PoolStats;

/// Resident set size of this process in bytes, if the platform exposes it.
#[cfg(target_os = "linux")]
pub fn process_rss() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}

/// Resident set size of this process in bytes, if the platform exposes it.
#[cfg(target_os = "macos")]
pub fn process_rss() -> Option<u64> {
    use std::mem::MaybeUninit;

    extern "C" {
        fn mach_task_self() -> u32;
        fn task_info(
            target_task: u32,
            flavor: i32,
            task_info_out: *mut libc::c_void,
            task_info_out_cnt: *mut u32,
        ) -> i32;
    }

    #[repr(C)]
    struct MachTaskBasicInfo {
        virtual_size: u64,
        resident_size: u64,
        resident_size_max: u64,
        user_time: (i32, i32),
        system_time: (i32, i32),
        policy: i32,
        suspend_count: i32,
    }

    const MACH_TASK_BASIC_INFO: i32 = 20;
    const MACH_TASK_BASIC_INFO_COUNT: u32 =
        (std::mem::size_of::<MachTaskBasicInfo>() / std::mem::size_of::<u32>()) as u32;

    let mut info = MaybeUninit::<MachTaskBasicInfo>::uninit();
    let mut count = MACH_TASK_BASIC_INFO_COUNT;
    // SAFETY: `info` is a properly sized out-buffer for MACH_TASK_BASIC_INFO
    // and `count` holds its length in natural-sized words.
    let status = unsafe {
        task_info(
            mach_task_self(),
            MACH_TASK_BASIC_INFO,
            info.as_mut_ptr() as *mut libc::c_void,
            &mut count,
        )
    };
    if status != 0 {
        return None;
    }
    // SAFETY: task_info returned KERN_SUCCESS, so the buffer is filled.
    Some(unsafe { info.assume_init() }.resident_size)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn process_rss() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}

/// Statistics collected during one search.
#[derive(Debug, Clone)]
pub struct SearchStats {
    /// Boards popped from the frontier and expanded
    pub expanded: u64,

    /// Child boards created
    pub generated: u64,

    /// Expanded boards with no legal jump
    pub dead_ends: u64,

    /// Largest frontier size seen
    pub max_frontier: usize,

    /// Fewest pegs on any generated board
    pub min_pegs: u32,

    /// Whether a one-peg board was reached
    pub solved: bool,

    /// Nodes still live in the pool when the search ended
    pub live_nodes: usize,

    /// Pool allocation counters, filled in when the search ends
    pub pool: PoolStats,

    /// Wall time of the search, filled in when the search ends
    pub elapsed: Duration,

    start_time: Instant,
    last_log_time: Instant,
    last_log_expanded: u64,
}

impl SearchStats {
    /// Fresh counters for a search starting from `root_pegs` pegs.
    pub fn new(root_pegs: u32) -> Self {
        let now = Instant::now();
        Self {
            expanded: 0,
            generated: 0,
            dead_ends: 0,
            max_frontier: 0,
            min_pegs: root_pegs,
            solved: false,
            live_nodes: 0,
            pool: PoolStats::default(),
            elapsed: Duration::ZERO,
            start_time: now,
            last_log_time: now,
            last_log_expanded: 0,
        }
    }

    /// Record a generated child with `pegs` pegs.
    #[inline]
    pub fn record_child(&mut self, pegs: u32) {
        self.generated += 1;
        self.min_pegs = self.min_pegs.min(pegs);
    }

    /// Average expansions per second, over the whole search once it has
    /// finished and since it started otherwise.
    pub fn expansions_per_sec(&self) -> f64 {
        let elapsed = if self.elapsed.is_zero() {
            self.start_time.elapsed()
        } else {
            self.elapsed
        }
        .as_secs_f64();
        if elapsed > 0.0 {
            self.expanded as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval: Duration) -> bool {
        self.last_log_time.elapsed() >= interval
    }

    /// Log progress and reset the log timer.
    pub fn log_progress(&mut self, frontier: usize, live: usize, pool: PoolStats) {
        let now = Instant::now();
        let total = self.start_time.elapsed().as_secs();

        let since_last = self.last_log_time.elapsed().as_secs_f64();
        let rate = if since_last > 0.0 {
            (self.expanded - self.last_log_expanded) as f64 / since_last
        } else {
            0.0
        };

        let mem = process_rss()
            .map(|m| format!(" mem={}", format_bytes(m)))
            .unwrap_or_default();

        info!(
            "[{:02}:{:02}:{:02}] expanded={} generated={} dead_ends={} frontier={} live={} reused={} min_pegs={} rate={:.0}/s{}",
            total / 3600,
            (total % 3600) / 60,
            total % 60,
            self.expanded,
            self.generated,
            self.dead_ends,
            frontier,
            live,
            pool.reused,
            self.min_pegs,
            rate,
            mem,
        );

        self.last_log_time = now;
        self.last_log_expanded = self.expanded;
    }

    /// Freeze timing and pool counters at the end of a search.
    pub fn finish(&mut self, solved: bool, live: usize, pool: PoolStats) {
        self.solved = solved;
        self.live_nodes = live;
        self.pool = pool;
        self.elapsed = self.start_time.elapsed();
    }
}

impl fmt::Display for SearchStats {
    /// Final summary, one counter per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solved: {}", if self.solved { "yes" } else { "no" })?;
        writeln!(f, "Boards expanded: {}", self.expanded)?;
        writeln!(f, "Boards generated: {}", self.generated)?;
        writeln!(f, "Dead ends: {}", self.dead_ends)?;
        writeln!(f, "Max frontier: {}", self.max_frontier)?;
        writeln!(f, "Fewest pegs reached: {}", self.min_pegs)?;
        writeln!(f, "Pool slots allocated: {}", self.pool.allocated)?;
        writeln!(f, "Pool slots reused: {}", self.pool.reused)?;
        writeln!(f, "Peak live boards: {}", self.pool.peak_live)?;
        write!(f, "Time: {:.3}s", self.elapsed.as_secs_f64())?;

        if !self.elapsed.is_zero() {
            write!(f, " ({:.0} boards/sec)", self.expansions_per_sec())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_record_child_tracks_min_pegs() {
        let mut stats = SearchStats::new(32);
        stats.record_child(31);
        stats.record_child(30);
        stats.record_child(31);
        assert_eq!(stats.generated, 3);
        assert_eq!(stats.min_pegs, 30);
    }

    #[test]
    fn test_summary_mentions_counters() {
        let mut stats = SearchStats::new(4);
        stats.expanded = 7;
        stats.finish(false, 0, PoolStats::default());
        let summary = stats.to_string();
        assert!(summary.contains("Solved: no"));
        assert!(summary.contains("Boards expanded: 7"));
    }

    #[test]
    fn test_expansions_per_sec_uses_frozen_elapsed() {
        let mut stats = SearchStats::new(4);
        stats.expanded = 500;
        stats.finish(true, 0, PoolStats::default());
        stats.elapsed = Duration::from_millis(250);
        assert_eq!(stats.expansions_per_sec(), 2000.0);
        assert!(stats.to_string().contains("(2000 boards/sec)"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_rss_available_on_linux() {
        assert!(process_rss().is_some_and(|rss| rss > 0));
    }
}
