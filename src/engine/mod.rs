// Sampled-metrics engine: stateless per-call collectors over a counter
// source. All continuity between calls lives in caller-held cursors; the
// only shared state is two small read-mostly caches (CPU facts,
// temperature).

mod meta;
mod processes;

pub use meta::MetaParams;
pub use processes::ProcessQuery;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::counters::{CounterSource, CpuFacts};
use crate::cursor::{self, CpuCursor, DiskCursor, NetworkCursor};
use crate::models::{
    CpuMetrics, DeviceRate, DiskActivity, DiskRates, HardwareInfo, InterfaceRate, MemoryMetrics,
    ModuleList, MountUsage, NetworkLink, NetworkRates, SystemStatus,
};
use crate::rate;

/// Module names accepted by the orchestrator; `all` expands to this set.
pub const MODULES: &[&str] = &[
    "cpu",
    "memory",
    "network",
    "netrate",
    "disk",
    "diskrate",
    "diskmounts",
    "processes",
    "system",
    "hardware",
];

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Caller asked for a module that does not exist; rejected before any
    /// collection work.
    #[error("unknown module: {0}")]
    UnknownModule(String),
    /// A counter read failed. Fatal for single-domain calls; composite
    /// calls catch it per module instead.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Warm-up interval for the cursor-less process bootstrap.
    pub warmup: Duration,
    /// Freshness window of the temperature cache.
    pub temperature_ttl: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            warmup: Duration::from_millis(1000),
            temperature_ttl: Duration::from_secs(5),
        }
    }
}

pub struct MetricsEngine {
    source: Arc<dyn CounterSource>,
    warmup: Duration,
    temperature_ttl: Duration,
    cpu_facts: Arc<Mutex<Option<CpuFacts>>>,
    temperature: Arc<Mutex<Option<(Instant, f64)>>>,
}

impl MetricsEngine {
    pub fn new(source: Arc<dyn CounterSource>) -> Self {
        Self::with_options(source, EngineOptions::default())
    }

    pub fn with_options(source: Arc<dyn CounterSource>, options: EngineOptions) -> Self {
        Self {
            source,
            warmup: options.warmup,
            temperature_ttl: options.temperature_ttl,
            cpu_facts: Arc::new(Mutex::new(None)),
            temperature: Arc::new(Mutex::new(None)),
        }
    }

    pub(crate) fn warmup(&self) -> Duration {
        self.warmup
    }

    /// Run a counter read on the blocking pool (reads hit /proc and
    /// sysinfo under a mutex).
    pub(crate) async fn blocking<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CounterSource) -> anyhow::Result<T> + Send + 'static,
    {
        let source = self.source.clone();
        tokio::task::spawn_blocking(move || f(source.as_ref()))
            .await
            .map_err(|e| EngineError::Source(anyhow::anyhow!("counter task join: {}", e)))?
            .map_err(EngineError::Source)
    }

    pub fn modules(&self) -> ModuleList {
        ModuleList {
            available: MODULES.iter().map(|m| m.to_string()).collect(),
        }
    }

    pub async fn cpu(&self, cursor: Option<&str>) -> Result<CpuMetrics, EngineError> {
        let prev: Option<CpuCursor> = cursor.and_then(cursor::decode);
        let facts_cache = self.cpu_facts.clone();
        let temp_cache = self.temperature.clone();
        let temp_ttl = self.temperature_ttl;
        self.blocking(move |source| {
            let facts = {
                let mut guard = facts_cache
                    .lock()
                    .map_err(|e| anyhow::anyhow!("cpu facts lock poisoned: {}", e))?;
                match guard.as_ref() {
                    Some(facts) => facts.clone(),
                    None => {
                        let facts = source.cpu_facts()?;
                        *guard = Some(facts.clone());
                        facts
                    }
                }
            };

            let temperature = {
                let mut guard = temp_cache
                    .lock()
                    .map_err(|e| anyhow::anyhow!("temperature lock poisoned: {}", e))?;
                match *guard {
                    Some((read_at, value)) if read_at.elapsed() <= temp_ttl => value,
                    _ => {
                        let value = source.cpu_temperature();
                        *guard = Some((Instant::now(), value));
                        value
                    }
                }
            };

            // Current frequency is more useful than the cached base; fall
            // back when the current read comes up empty.
            let current_mhz = source.cpu_frequency_mhz();
            let frequency_mhz = if current_mhz > 0.0 {
                current_mhz
            } else {
                facts.base_frequency_mhz
            };

            let times = source.cpu_times()?;
            let now = cursor::now_ms();

            let mut usage_percent = 0.0;
            let mut core_usage = vec![0.0; times.cores.len()];
            if let Some(prev) = prev
                && !prev.total.is_empty()
                && prev.timestamp_ms > 0
                && rate::elapsed_secs(prev.timestamp_ms, now) > 0.0
            {
                usage_percent = rate::cpu_usage_percent(&prev.total, &times.total);
                for (i, core) in times.cores.iter().enumerate() {
                    if let Some(prev_core) = prev.cores.get(i) {
                        core_usage[i] = rate::cpu_usage_percent(prev_core, core);
                    }
                }
            }

            let next = CpuCursor {
                total: times.total.clone(),
                cores: times.cores.clone(),
                timestamp_ms: now,
            };
            Ok(CpuMetrics {
                count: facts.logical_count,
                model: facts.model,
                frequency_mhz,
                temperature,
                usage_percent,
                core_usage,
                total: times.total,
                cores: times.cores,
                cursor: cursor::encode(&next),
            })
        })
        .await
    }

    pub async fn memory(&self) -> Result<MemoryMetrics, EngineError> {
        self.blocking(|source| source.memory()).await
    }

    pub async fn network(&self) -> Result<Vec<NetworkLink>, EngineError> {
        self.blocking(|source| {
            let counters = source.network_counters()?;
            Ok(counters
                .into_iter()
                .filter(|(name, _)| matches_network_interface(name))
                .map(|(name, c)| NetworkLink {
                    name,
                    rx_bytes: c.rx_bytes,
                    tx_bytes: c.tx_bytes,
                })
                .collect())
        })
        .await
    }

    pub async fn network_rates(&self, cursor: Option<&str>) -> Result<NetworkRates, EngineError> {
        let prev: Option<NetworkCursor> = cursor.and_then(cursor::decode);
        self.blocking(move |source| {
            let mut counters = source.network_counters()?;
            counters.retain(|name, _| matches_network_interface(name));
            let now = cursor::now_ms();
            let dt = prev
                .as_ref()
                .map(|p| rate::elapsed_secs(p.timestamp_ms, now))
                .unwrap_or(0.0);

            let interfaces = counters
                .iter()
                .map(|(name, curr)| {
                    let (rx_rate, tx_rate) =
                        match prev.as_ref().and_then(|p| p.interfaces.get(name)) {
                            Some(prev_if) => (
                                rate::throughput(prev_if.rx_bytes, curr.rx_bytes, dt),
                                rate::throughput(prev_if.tx_bytes, curr.tx_bytes, dt),
                            ),
                            None => (0.0, 0.0),
                        };
                    InterfaceRate {
                        name: name.clone(),
                        rx_bytes_per_sec: rx_rate,
                        tx_bytes_per_sec: tx_rate,
                        rx_total: curr.rx_bytes,
                        tx_total: curr.tx_bytes,
                    }
                })
                .collect();

            let next = NetworkCursor {
                timestamp_ms: now,
                interfaces: counters,
            };
            Ok(NetworkRates {
                interfaces,
                cursor: cursor::encode(&next),
            })
        })
        .await
    }

    pub async fn disk(&self) -> Result<Vec<DiskActivity>, EngineError> {
        self.blocking(|source| {
            let counters = source.disk_counters()?;
            Ok(counters
                .into_iter()
                .filter(|(name, _)| matches_disk_device(name))
                .map(|(name, c)| DiskActivity {
                    name,
                    read_bytes: c.read_bytes,
                    write_bytes: c.write_bytes,
                })
                .collect())
        })
        .await
    }

    pub async fn disk_rates(&self, cursor: Option<&str>) -> Result<DiskRates, EngineError> {
        let prev: Option<DiskCursor> = cursor.and_then(cursor::decode);
        self.blocking(move |source| {
            let mut counters = source.disk_counters()?;
            counters.retain(|name, _| matches_disk_device(name));
            let now = cursor::now_ms();
            let dt = prev
                .as_ref()
                .map(|p| rate::elapsed_secs(p.timestamp_ms, now))
                .unwrap_or(0.0);

            let devices = counters
                .iter()
                .map(|(name, curr)| {
                    let (read_rate, write_rate) =
                        match prev.as_ref().and_then(|p| p.devices.get(name)) {
                            Some(prev_dev) => (
                                rate::throughput(prev_dev.read_bytes, curr.read_bytes, dt),
                                rate::throughput(prev_dev.write_bytes, curr.write_bytes, dt),
                            ),
                            None => (0.0, 0.0),
                        };
                    DeviceRate {
                        device: name.clone(),
                        read_bytes_per_sec: read_rate,
                        write_bytes_per_sec: write_rate,
                        read_total: curr.read_bytes,
                        write_total: curr.write_bytes,
                        read_ops: curr.read_ops,
                        write_ops: curr.write_ops,
                    }
                })
                .collect();

            let next = DiskCursor {
                timestamp_ms: now,
                devices: counters,
            };
            Ok(DiskRates {
                devices,
                cursor: cursor::encode(&next),
            })
        })
        .await
    }

    pub async fn disk_mounts(&self) -> Result<Vec<MountUsage>, EngineError> {
        self.blocking(|source| source.disk_mounts()).await
    }

    pub async fn system(&self) -> Result<SystemStatus, EngineError> {
        self.blocking(|source| source.system()).await
    }

    pub async fn hardware(&self) -> Result<HardwareInfo, EngineError> {
        self.blocking(|source| source.hardware()).await
    }
}

/// Physical-ish interfaces only (wifi, ethernet, container bridges);
/// loopback and virtual tunnels are noise in a utilization report.
fn matches_network_interface(name: &str) -> bool {
    const PREFIXES: &[&str] = &["wlan", "wlo", "wlp", "eth", "eno", "enp", "ens", "lxc"];
    PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Real block devices only; partitions are reported through their parent
/// where the kernel rolls them up, loop/ram devices are skipped.
fn matches_disk_device(name: &str) -> bool {
    const PREFIXES: &[&str] = &["sd", "nvme", "vd", "dm-", "mmcblk"];
    PREFIXES.iter().any(|p| name.starts_with(p))
}
