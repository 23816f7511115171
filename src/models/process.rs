// Process table models

use serde::{Deserialize, Serialize};

/// How the headline memory figure of a [`ProcessEntry`] was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorySource {
    #[default]
    Rss,
    PssDirty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessEntry {
    pub pid: i32,
    pub ppid: i32,
    pub username: String,
    pub command: String,
    pub full_command: String,
    /// CPU usage in percent of one core, derived from the cursor baseline
    /// (0 when no baseline existed for this PID).
    pub cpu_percent: f64,
    /// Cumulative user+system CPU time in seconds; carried into the next
    /// cursor as this process's baseline.
    pub cpu_time_secs: f64,
    pub memory_kb: u64,
    pub memory_percent: f32,
    pub memory_calculation: MemorySource,
    pub rss_kb: u64,
    pub rss_percent: f32,
    pub pss_kb: u64,
    pub pss_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessList {
    pub processes: Vec<ProcessEntry>,
    pub cursor: String,
}

/// Sort order for the process listing. Ties are left in whatever order
/// the enumeration produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Name,
    Pid,
}
