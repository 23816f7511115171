// Process sampler: ranked, size-bounded process list with per-process
// CPU% and classified memory, plus the cursor for the next call.

use std::collections::HashMap;
use std::time::Instant;

use super::{EngineError, MetricsEngine};
use crate::counters::{CounterSource, ProcessSample};
use crate::cursor::{self, ProcessCursorEntry};
use crate::models::{MemorySource, ProcessEntry, ProcessList, SortKey};
use crate::rate;

/// RSS above which the costlier smaps_rollup read is attempted.
const PSS_DIRTY_THRESHOLD_KB: u64 = 20 * 1024;

#[derive(Debug, Clone)]
pub struct ProcessQuery {
    pub sort_by: SortKey,
    /// Truncate the sorted list to this size; 0 means unbounded.
    pub limit: usize,
    /// When false, the bootstrap wait is skipped entirely and every
    /// process reports CPU% = 0.
    pub enable_cpu: bool,
    pub cursor: Option<String>,
    /// Caller deadline for the bootstrap wait. A deadline that lands
    /// mid-wait skips the wait and zero-fills CPU%.
    pub deadline: Option<Instant>,
}

impl Default for ProcessQuery {
    fn default() -> Self {
        Self {
            sort_by: SortKey::Cpu,
            limit: 0,
            enable_cpu: true,
            cursor: None,
            deadline: None,
        }
    }
}

impl MetricsEngine {
    pub async fn processes(&self, query: ProcessQuery) -> Result<ProcessList, EngineError> {
        let prior: Vec<ProcessCursorEntry> = query
            .cursor
            .as_deref()
            .and_then(cursor::decode)
            .unwrap_or_default();
        // Transient PID -> (ticks, captured-at) lookup, rebuilt per call.
        let mut baseline: HashMap<i32, (f64, i64)> = prior
            .iter()
            .map(|e| (e.pid, (e.ticks, e.timestamp_ms)))
            .collect();
        let mut cpu_enabled = query.enable_cpu;

        // CPU% needs two samples. Without a cursor the first sample is
        // taken here and the warm-up waited out; with one, the cursor is
        // the first sample.
        if cpu_enabled && baseline.is_empty() {
            let first = self.blocking(|source| source.processes()).await?;
            let first_ms = cursor::now_ms();
            let mut wait = self.warmup();
            if let Some(deadline) = query.deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining < wait {
                    // Deadline lands mid-wait: skip it, zero-fill CPU%.
                    wait = std::time::Duration::ZERO;
                    cpu_enabled = false;
                }
            }
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
            baseline = first
                .iter()
                .map(|s| (s.pid, (s.cpu_time_secs, first_ms)))
                .collect();
        }

        let sort_by = query.sort_by;
        let limit = query.limit;
        self.blocking(move |source| {
            let samples = source.processes()?;
            let total_mem_bytes = source.memory().map(|m| m.total_kb * 1024).unwrap_or(0);
            let now = cursor::now_ms();

            let mut processes: Vec<ProcessEntry> = samples
                .into_iter()
                .map(|sample| {
                    let cpu_percent = if cpu_enabled {
                        baseline
                            .get(&sample.pid)
                            .map(|(ticks, ts)| {
                                rate::process_cpu_percent(
                                    *ticks,
                                    sample.cpu_time_secs,
                                    rate::elapsed_secs(*ts, now),
                                )
                            })
                            .unwrap_or(0.0)
                    } else {
                        0.0
                    };
                    build_entry(source, sample, cpu_percent, total_mem_bytes)
                })
                .collect();

            match sort_by {
                SortKey::Cpu => {
                    processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
                }
                SortKey::Memory => {
                    processes.sort_by(|a, b| b.memory_percent.total_cmp(&a.memory_percent));
                }
                SortKey::Name => processes.sort_by(|a, b| a.command.cmp(&b.command)),
                SortKey::Pid => processes.sort_by(|a, b| a.pid.cmp(&b.pid)),
            }
            if limit > 0 && processes.len() > limit {
                processes.truncate(limit);
            }

            // The next cursor carries only what survived the limit; a
            // process that fell outside it is forgotten and starts over
            // at CPU% 0 if it reappears.
            let next: Vec<ProcessCursorEntry> = processes
                .iter()
                .map(|p| ProcessCursorEntry {
                    pid: p.pid,
                    ticks: p.cpu_time_secs,
                    timestamp_ms: now,
                })
                .collect();
            Ok(ProcessList {
                processes,
                cursor: cursor::encode(&next),
            })
        })
        .await
    }
}

fn build_entry(
    source: &dyn CounterSource,
    sample: ProcessSample,
    cpu_percent: f64,
    total_mem_bytes: u64,
) -> ProcessEntry {
    let rss_kb = sample.rss_bytes / 1024;
    let rss_percent = percent_of(sample.rss_bytes, total_mem_bytes);

    let mut memory_kb = rss_kb;
    let mut memory_percent = rss_percent;
    let mut memory_calculation = MemorySource::Rss;
    let mut pss_kb = 0;
    let mut pss_percent = 0.0;

    // For larger processes, prefer the precise dirty-private figure when
    // the read succeeds; failure keeps the RSS figures.
    if rss_kb > PSS_DIRTY_THRESHOLD_KB
        && let Some(rollup) = source.smaps_rollup(sample.pid)
        && rollup.pss_dirty_kb > 0
    {
        pss_kb = rollup.pss_kb;
        pss_percent = percent_of(rollup.pss_kb * 1024, total_mem_bytes);
        memory_kb = rollup.pss_dirty_kb;
        memory_percent = percent_of(rollup.pss_dirty_kb * 1024, total_mem_bytes);
        memory_calculation = MemorySource::PssDirty;
    }

    ProcessEntry {
        pid: sample.pid,
        ppid: sample.ppid,
        username: sample.username,
        command: sample.name,
        full_command: sample.cmdline,
        cpu_percent,
        cpu_time_secs: sample.cpu_time_secs,
        memory_kb,
        memory_percent,
        memory_calculation,
        rss_kb,
        rss_percent,
        pss_kb,
        pss_percent,
    }
}

fn percent_of(bytes: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (bytes as f64 / total as f64 * 100.0) as f32
}
