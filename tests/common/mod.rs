// Shared test helpers: a scriptable counter source.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use metricsd::counters::{CounterSource, CpuFacts, CpuTimes, ProcessSample, SmapsRollup};
use metricsd::engine::{EngineOptions, MetricsEngine};
use metricsd::models::{
    DeviceCounters, HardwareInfo, InterfaceCounters, MemoryMetrics, MountUsage, SystemStatus,
};

/// Canned stat vectors: total 950 -> 1037, busy 150 -> 187.
pub const CPU_PREV: [f64; 8] = [100.0, 0.0, 50.0, 800.0, 0.0, 0.0, 0.0, 0.0];
pub const CPU_CURR: [f64; 8] = [125.0, 0.0, 62.0, 850.0, 0.0, 0.0, 0.0, 0.0];

/// Counter source with canned data. Each `processes()` call advances
/// every process's cumulative CPU time by its per-PID step, so
/// consecutive snapshots look like live processes burning CPU.
pub struct MockSource {
    pub cpu_snapshots: Vec<CpuTimes>,
    pub processes: Vec<ProcessSample>,
    pub tick_steps: HashMap<i32, f64>,
    pub smaps: HashMap<i32, SmapsRollup>,
    pub memory: MemoryMetrics,
    pub network: BTreeMap<String, InterfaceCounters>,
    pub disks: BTreeMap<String, DeviceCounters>,
    pub fail_network: bool,
    pub fail_disk: bool,
    cpu_calls: AtomicUsize,
    process_calls: AtomicUsize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        let mut network = BTreeMap::new();
        network.insert(
            "eth0".to_string(),
            InterfaceCounters {
                rx_bytes: 1_000,
                tx_bytes: 2_000,
            },
        );
        network.insert(
            "lo".to_string(),
            InterfaceCounters {
                rx_bytes: 77,
                tx_bytes: 77,
            },
        );

        let mut disks = BTreeMap::new();
        disks.insert(
            "sda".to_string(),
            DeviceCounters {
                read_bytes: 3_000_000,
                write_bytes: 500_000,
                read_ops: 10,
                write_ops: 5,
            },
        );
        disks.insert(
            "loop0".to_string(),
            DeviceCounters {
                read_bytes: 9,
                write_bytes: 9,
                read_ops: 1,
                write_ops: 1,
            },
        );

        let processes = vec![
            process("alpha", 101, 10.0, 30 * 1024 * 1024),
            process("beta", 102, 20.0, 10 * 1024 * 1024),
            process("gamma", 103, 5.0, 50 * 1024 * 1024),
        ];
        let mut tick_steps = HashMap::new();
        tick_steps.insert(101, 0.030);
        tick_steps.insert(102, 0.020);
        tick_steps.insert(103, 0.005);

        let mut smaps = HashMap::new();
        smaps.insert(
            101,
            SmapsRollup {
                pss_kb: 18_000,
                pss_dirty_kb: 15_000,
            },
        );

        Self {
            cpu_snapshots: vec![
                CpuTimes {
                    total: CPU_PREV.to_vec(),
                    cores: vec![CPU_PREV.to_vec()],
                },
                CpuTimes {
                    total: CPU_CURR.to_vec(),
                    cores: vec![CPU_CURR.to_vec()],
                },
            ],
            processes,
            tick_steps,
            smaps,
            memory: MemoryMetrics {
                total_kb: 16_000_000,
                free_kb: 4_000_000,
                available_kb: 8_000_000,
                buffers_kb: 100_000,
                cached_kb: 2_000_000,
                shared_kb: 50_000,
                swap_total_kb: 1_000_000,
                swap_free_kb: 900_000,
            },
            network,
            disks,
            fail_network: false,
            fail_disk: false,
            cpu_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
        }
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }
}

fn process(name: &str, pid: i32, cpu_time_secs: f64, rss_bytes: u64) -> ProcessSample {
    ProcessSample {
        pid,
        ppid: 1,
        name: name.to_string(),
        cmdline: format!("/usr/bin/{}", name),
        username: "mock".to_string(),
        cpu_time_secs,
        rss_bytes,
    }
}

impl CounterSource for MockSource {
    fn cpu_times(&self) -> anyhow::Result<CpuTimes> {
        let call = self.cpu_calls.fetch_add(1, Ordering::SeqCst);
        let idx = call.min(self.cpu_snapshots.len().saturating_sub(1));
        self.cpu_snapshots
            .get(idx)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no cpu snapshots configured"))
    }

    fn cpu_facts(&self) -> anyhow::Result<CpuFacts> {
        Ok(CpuFacts {
            logical_count: 8,
            model: "Mock CPU @ 2.4GHz".to_string(),
            base_frequency_mhz: 2400.0,
        })
    }

    fn cpu_frequency_mhz(&self) -> f64 {
        3000.0
    }

    fn cpu_temperature(&self) -> f64 {
        42.0
    }

    fn memory(&self) -> anyhow::Result<MemoryMetrics> {
        Ok(self.memory.clone())
    }

    fn processes(&self) -> anyhow::Result<Vec<ProcessSample>> {
        let call = self.process_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .processes
            .iter()
            .map(|p| {
                let step = self.tick_steps.get(&p.pid).copied().unwrap_or(0.0);
                let mut sample = p.clone();
                sample.cpu_time_secs += step * call as f64;
                sample
            })
            .collect())
    }

    fn smaps_rollup(&self, pid: i32) -> Option<SmapsRollup> {
        self.smaps.get(&pid).copied()
    }

    fn network_counters(&self) -> anyhow::Result<BTreeMap<String, InterfaceCounters>> {
        if self.fail_network {
            anyhow::bail!("/proc/net/dev unreadable");
        }
        Ok(self.network.clone())
    }

    fn disk_counters(&self) -> anyhow::Result<BTreeMap<String, DeviceCounters>> {
        if self.fail_disk {
            anyhow::bail!("/proc/diskstats unreadable");
        }
        Ok(self.disks.clone())
    }

    fn disk_mounts(&self) -> anyhow::Result<Vec<MountUsage>> {
        Ok(vec![MountUsage {
            device: "/dev/sda1".to_string(),
            mount_point: "/".to_string(),
            fs_type: "ext4".to_string(),
            total_bytes: 100_000_000_000,
            used_bytes: 40_000_000_000,
            available_bytes: 60_000_000_000,
            usage_percent: 40.0,
        }])
    }

    fn system(&self) -> anyhow::Result<SystemStatus> {
        Ok(SystemStatus {
            load_avg: [0.52, 0.48, 0.41],
            process_count: self.processes.len() as u32,
            thread_count: 4 * self.processes.len() as u32,
            boot_time_secs: 1_700_000_000,
            uptime_secs: 86_400,
        })
    }

    fn hardware(&self) -> anyhow::Result<HardwareInfo> {
        Ok(HardwareInfo {
            system_vendor: "Mock Industries".to_string(),
            product_name: "Testbench 9000".to_string(),
            kernel_version: "6.6.0-mock".to_string(),
            os_name: "Mock Linux 1.0".to_string(),
            ..Default::default()
        })
    }
}

/// Engine over a fresh mock with a short warm-up so bootstrap tests stay
/// fast.
pub fn test_engine(source: MockSource) -> (Arc<MockSource>, MetricsEngine) {
    test_engine_with_warmup(source, std::time::Duration::from_millis(100))
}

pub fn test_engine_with_warmup(
    source: MockSource,
    warmup: std::time::Duration,
) -> (Arc<MockSource>, MetricsEngine) {
    let source = Arc::new(source);
    let engine = MetricsEngine::with_options(
        source.clone(),
        EngineOptions {
            warmup,
            temperature_ttl: std::time::Duration::from_secs(5),
        },
    );
    (source, engine)
}
