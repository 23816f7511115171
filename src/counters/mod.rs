// Counter source boundary: one instantaneous snapshot of raw OS
// counters per call, each read independently fallible and never retried.

mod procfs;

pub use procfs::ProcfsSource;

use std::collections::BTreeMap;

use crate::models::{
    DeviceCounters, HardwareInfo, InterfaceCounters, MemoryMetrics, MountUsage, SystemStatus,
};

/// Whole-machine and per-core CPU time vectors, in seconds.
/// Component order: user, nice, system, idle, iowait, irq, softirq, steal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuTimes {
    pub total: Vec<f64>,
    pub cores: Vec<Vec<f64>>,
}

/// Rarely-changing CPU facts; the engine caches these for the process
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct CpuFacts {
    pub logical_count: u32,
    pub model: String,
    pub base_frequency_mhz: f64,
}

/// One process as enumerated at a single instant.
#[derive(Debug, Clone, Default)]
pub struct ProcessSample {
    pub pid: i32,
    pub ppid: i32,
    pub name: String,
    pub cmdline: String,
    pub username: String,
    /// Cumulative user+system CPU time in seconds.
    pub cpu_time_secs: f64,
    pub rss_bytes: u64,
}

/// Precise memory accounting for one process (from smaps_rollup), in KiB.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmapsRollup {
    pub pss_kb: u64,
    pub pss_dirty_kb: u64,
}

/// Seam between the engine and the OS. Every method captures counters at
/// the moment of the call; failures surface to the caller untouched.
pub trait CounterSource: Send + Sync {
    fn cpu_times(&self) -> anyhow::Result<CpuTimes>;
    fn cpu_facts(&self) -> anyhow::Result<CpuFacts>;
    /// Current core frequency in MHz; 0 when unknown.
    fn cpu_frequency_mhz(&self) -> f64;
    /// CPU package temperature in Celsius; 0 when no sensor is readable.
    /// Expensive; the engine caches the result for a freshness window.
    fn cpu_temperature(&self) -> f64;
    fn memory(&self) -> anyhow::Result<MemoryMetrics>;
    fn processes(&self) -> anyhow::Result<Vec<ProcessSample>>;
    /// Precise per-process memory read. `None` on any failure; the
    /// caller keeps its RSS-based figure.
    fn smaps_rollup(&self, pid: i32) -> Option<SmapsRollup>;
    fn network_counters(&self) -> anyhow::Result<BTreeMap<String, InterfaceCounters>>;
    fn disk_counters(&self) -> anyhow::Result<BTreeMap<String, DeviceCounters>>;
    fn disk_mounts(&self) -> anyhow::Result<Vec<MountUsage>>;
    fn system(&self) -> anyhow::Result<SystemStatus>;
    fn hardware(&self) -> anyhow::Result<HardwareInfo>;
}
