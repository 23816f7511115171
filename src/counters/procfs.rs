// Production counter source: sysinfo for enumeration plus targeted
// /proc and /sys reads for the tick counters sysinfo does not expose.
// Non-Linux builds degrade to zero/empty values for the /proc-backed
// reads instead of failing.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use sysinfo::{Disks, Networks, ProcessesToUpdate, System, Users};

use super::{CounterSource, CpuFacts, CpuTimes, ProcessSample, SmapsRollup};
use crate::models::{
    DeviceCounters, HardwareInfo, InterfaceCounters, MemoryMetrics, MountUsage, SystemStatus,
};
use crate::rate::CPU_TIME_COMPONENTS;

/// Linux USER_HZ; /proc tick counters divided by this give seconds.
const TICKS_PER_SEC: f64 = 100.0;

pub struct ProcfsSource {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    users: Mutex<Users>,
    temp_path: Mutex<Option<PathBuf>>,
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcfsSource {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(Disks::new_with_refreshed_list()),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            users: Mutex::new(Users::new_with_refreshed_list()),
            temp_path: Mutex::new(None),
        }
    }
}

impl CounterSource for ProcfsSource {
    fn cpu_times(&self) -> anyhow::Result<CpuTimes> {
        read_proc_stat()
    }

    fn cpu_facts(&self) -> anyhow::Result<CpuFacts> {
        let sys = self
            .sys
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
        let model = read_cpu_model()
            .or_else(|| {
                sys.cpus()
                    .first()
                    .map(|c| c.brand().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "Unknown".into());
        Ok(CpuFacts {
            logical_count: sys.cpus().len() as u32,
            model,
            base_frequency_mhz: sys.cpus().first().map(|c| c.frequency() as f64).unwrap_or(0.0),
        })
    }

    fn cpu_frequency_mhz(&self) -> f64 {
        if let Some(mhz) = read_current_frequency() {
            return mhz;
        }
        self.sys
            .lock()
            .ok()
            .and_then(|sys| sys.cpus().first().map(|c| c.frequency() as f64))
            .unwrap_or(0.0)
    }

    fn cpu_temperature(&self) -> f64 {
        // Re-use the hwmon path found on a previous scan when possible.
        if let Ok(guard) = self.temp_path.lock()
            && let Some(path) = guard.as_ref()
            && let Some(temp) = read_millidegrees(path)
        {
            return temp;
        }
        let (path, temp) = scan_hwmon_for_cpu_temp();
        if let (Ok(mut guard), Some(path)) = (self.temp_path.lock(), path) {
            *guard = Some(path);
        }
        temp
    }

    fn memory(&self) -> anyhow::Result<MemoryMetrics> {
        #[cfg(target_os = "linux")]
        {
            read_meminfo()
        }
        #[cfg(not(target_os = "linux"))]
        {
            let mut sys = self
                .sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            sys.refresh_memory();
            Ok(MemoryMetrics {
                total_kb: sys.total_memory() / 1024,
                free_kb: sys.free_memory() / 1024,
                available_kb: sys.available_memory() / 1024,
                swap_total_kb: sys.total_swap() / 1024,
                swap_free_kb: sys.free_swap() / 1024,
                ..Default::default()
            })
        }
    }

    fn processes(&self) -> anyhow::Result<Vec<ProcessSample>> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
        let users = self
            .users
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo users lock poisoned: {}", e))?;
        sys.refresh_processes(ProcessesToUpdate::All, true);

        let samples = sys
            .processes()
            .values()
            .map(|p| {
                let pid = p.pid().as_u32() as i32;
                let username = p
                    .user_id()
                    .and_then(|uid| users.get_user_by_id(uid))
                    .map(|u| u.name().to_string())
                    .unwrap_or_default();
                ProcessSample {
                    pid,
                    ppid: p.parent().map(|pp| pp.as_u32() as i32).unwrap_or(0),
                    name: p.name().to_string_lossy().into_owned(),
                    cmdline: p
                        .cmd()
                        .iter()
                        .map(|a| a.to_string_lossy())
                        .collect::<Vec<_>>()
                        .join(" "),
                    username,
                    cpu_time_secs: read_process_cpu_secs(pid),
                    rss_bytes: p.memory(),
                }
            })
            .collect();
        Ok(samples)
    }

    fn smaps_rollup(&self, pid: i32) -> Option<SmapsRollup> {
        read_smaps_rollup(pid)
    }

    fn network_counters(&self) -> anyhow::Result<BTreeMap<String, InterfaceCounters>> {
        let mut networks = self
            .networks
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
        networks.refresh(true);
        Ok(networks
            .list()
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    InterfaceCounters {
                        rx_bytes: data.total_received(),
                        tx_bytes: data.total_transmitted(),
                    },
                )
            })
            .collect())
    }

    fn disk_counters(&self) -> anyhow::Result<BTreeMap<String, DeviceCounters>> {
        read_diskstats()
    }

    fn disk_mounts(&self) -> anyhow::Result<Vec<MountUsage>> {
        let mut disks = self
            .disks
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
        disks.refresh(false);
        Ok(disks
            .list()
            .iter()
            .map(|d| {
                let total = d.total_space();
                let available = d.available_space();
                let used = total.saturating_sub(available);
                let usage_percent = if total > 0 {
                    (used as f64 / total as f64) * 100.0
                } else {
                    0.0
                };
                MountUsage {
                    device: d.name().to_string_lossy().into_owned(),
                    mount_point: d.mount_point().to_string_lossy().into_owned(),
                    fs_type: d.file_system().to_string_lossy().into_owned(),
                    total_bytes: total,
                    used_bytes: used,
                    available_bytes: available,
                    usage_percent,
                }
            })
            .collect())
    }

    fn system(&self) -> anyhow::Result<SystemStatus> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
        sys.refresh_processes(ProcessesToUpdate::All, true);
        let load = System::load_average();
        let process_count = sys.processes().len() as u32;
        let thread_count =
            thread_total(sys.processes().values().map(|p| p.tasks().map(|t| t.len())));
        Ok(SystemStatus {
            load_avg: [load.one, load.five, load.fifteen],
            process_count,
            thread_count,
            boot_time_secs: System::boot_time(),
            uptime_secs: System::uptime(),
        })
    }

    fn hardware(&self) -> anyhow::Result<HardwareInfo> {
        Ok(HardwareInfo {
            system_vendor: read_dmi("sys_vendor"),
            product_name: read_dmi("product_name"),
            board_vendor: read_dmi("board_vendor"),
            board_name: read_dmi("board_name"),
            bios_vendor: read_dmi("bios_vendor"),
            bios_version: read_dmi("bios_version"),
            bios_date: read_dmi("bios_date"),
            kernel_version: System::kernel_version().unwrap_or_default(),
            os_name: read_os_pretty_name()
                .or_else(System::long_os_version)
                .unwrap_or_default(),
        })
    }
}

/// Sum per-process task counts into a machine-wide thread count. The
/// task list already includes the thread-group leader, so it is taken
/// as-is; a process with no readable task list counts as one thread.
fn thread_total(task_counts: impl Iterator<Item = Option<usize>>) -> u32 {
    task_counts
        .map(|tasks| tasks.map_or(1, |n| n.max(1)))
        .sum::<usize>()
        .min(u32::MAX as usize) as u32
}

/// Parse /proc/stat into whole-machine and per-core time vectors
/// (seconds). Kernels may append guest fields; only the first 8 are kept.
fn read_proc_stat() -> anyhow::Result<CpuTimes> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/stat")?;
        let mut times = CpuTimes::default();
        for line in content.lines() {
            let mut fields = line.split_whitespace();
            let Some(label) = fields.next() else { continue };
            if !label.starts_with("cpu") {
                continue;
            }
            let mut vector: Vec<f64> = fields
                .take(CPU_TIME_COMPONENTS)
                .filter_map(|f| f.parse::<f64>().ok())
                .map(|v| v / TICKS_PER_SEC)
                .collect();
            vector.resize(CPU_TIME_COMPONENTS, 0.0);
            if label == "cpu" {
                times.total = vector;
            } else {
                times.cores.push(vector);
            }
        }
        anyhow::ensure!(!times.total.is_empty(), "no cpu line in /proc/stat");
        Ok(times)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Ok(CpuTimes::default())
    }
}

/// Cumulative user+system CPU seconds for one PID from /proc/<pid>/stat.
/// 0 when unreadable (process exited, permissions, non-Linux).
fn read_process_cpu_secs(pid: i32) -> f64 {
    #[cfg(target_os = "linux")]
    {
        let Ok(content) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) else {
            return 0.0;
        };
        // comm may contain spaces; fields resume after the last ')'.
        let Some(rest) = content.rfind(')').map(|i| &content[i + 1..]) else {
            return 0.0;
        };
        let fields: Vec<&str> = rest.split_whitespace().collect();
        // utime and stime are fields 14 and 15 of the full line.
        match (
            fields.get(11).and_then(|f| f.parse::<f64>().ok()),
            fields.get(12).and_then(|f| f.parse::<f64>().ok()),
        ) {
            (Some(utime), Some(stime)) => (utime + stime) / TICKS_PER_SEC,
            _ => 0.0,
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid;
        0.0
    }
}

fn read_smaps_rollup(pid: i32) -> Option<SmapsRollup> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string(format!("/proc/{}/smaps_rollup", pid)).ok()?;
        let mut rollup = SmapsRollup::default();
        let mut found_dirty = false;
        for line in content.lines() {
            if let Some(rest) = line.strip_prefix("Pss_Dirty:") {
                rollup.pss_dirty_kb = parse_kb_field(rest)?;
                found_dirty = true;
            } else if let Some(rest) = line.strip_prefix("Pss:") {
                rollup.pss_kb = parse_kb_field(rest)?;
            }
        }
        found_dirty.then_some(rollup)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid;
        None
    }
}

#[cfg(target_os = "linux")]
fn parse_kb_field(rest: &str) -> Option<u64> {
    rest.split_whitespace().next()?.parse().ok()
}

#[cfg(target_os = "linux")]
fn read_meminfo() -> anyhow::Result<MemoryMetrics> {
    let content = std::fs::read_to_string("/proc/meminfo")?;
    let mut mem = MemoryMetrics::default();
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(value) = rest.split_whitespace().next().and_then(|v| v.parse().ok()) else {
            continue;
        };
        match key {
            "MemTotal" => mem.total_kb = value,
            "MemFree" => mem.free_kb = value,
            "MemAvailable" => mem.available_kb = value,
            "Buffers" => mem.buffers_kb = value,
            "Cached" => mem.cached_kb = value,
            "Shmem" => mem.shared_kb = value,
            "SwapTotal" => mem.swap_total_kb = value,
            "SwapFree" => mem.swap_free_kb = value,
            _ => {}
        }
    }
    Ok(mem)
}

/// Per-device cumulative I/O from /proc/diskstats (sectors are 512 bytes
/// regardless of the device's logical sector size).
fn read_diskstats() -> anyhow::Result<BTreeMap<String, DeviceCounters>> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/diskstats")?;
        let mut devices = BTreeMap::new();
        for line in content.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 11 {
                continue;
            }
            let name = fields[2].to_string();
            let parse = |i: usize| fields[i].parse::<u64>().unwrap_or(0);
            devices.insert(
                name,
                DeviceCounters {
                    read_ops: parse(3),
                    read_bytes: parse(5) * 512,
                    write_ops: parse(7),
                    write_bytes: parse(9) * 512,
                },
            );
        }
        Ok(devices)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Ok(BTreeMap::new())
    }
}

/// Read first "model name" from /proc/cpuinfo. Prefer over sysinfo when
/// the brand string is empty or a placeholder.
fn read_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in content.lines() {
            if line.starts_with("model name") {
                let name = line
                    .find(": ")
                    .map(|i| line[i + 2..].trim())
                    .filter(|s| !s.is_empty())?;
                return Some(name.to_string());
            }
        }
    }
    None
}

/// Current frequency in MHz from /proc/cpuinfo, falling back to
/// scaling_cur_freq (kHz).
fn read_current_frequency() -> Option<f64> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = std::fs::read_to_string("/proc/cpuinfo") {
            for line in content.lines() {
                if line.starts_with("cpu MHz")
                    && let Some((_, value)) = line.split_once(':')
                    && let Ok(mhz) = value.trim().parse::<f64>()
                {
                    return Some(mhz);
                }
            }
        }
        let content =
            std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq")
                .ok()?;
        let khz: f64 = content.trim().parse().ok()?;
        return Some(khz / 1000.0);
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn read_millidegrees(path: &std::path::Path) -> Option<f64> {
    let content = std::fs::read_to_string(path).ok()?;
    let milli: i64 = content.trim().parse().ok()?;
    Some(milli as f64 / 1000.0)
}

/// Scan /sys/class/hwmon for a CPU temperature sensor. Returns the path
/// (for re-use on later reads) and the temperature, or 0 when nothing
/// matched.
fn scan_hwmon_for_cpu_temp() -> (Option<PathBuf>, f64) {
    #[cfg(target_os = "linux")]
    {
        const CPU_SENSORS: &[&str] = &["coretemp", "k10temp", "k8temp", "cpu_thermal", "zenpower"];
        let Ok(entries) = std::fs::read_dir("/sys/class/hwmon") else {
            return (None, 0.0);
        };
        for entry in entries.flatten() {
            let Ok(name) = std::fs::read_to_string(entry.path().join("name")) else {
                continue;
            };
            let name = name.trim();
            if !CPU_SENSORS.iter().any(|s| name.contains(s)) {
                continue;
            }
            let temp_path = entry.path().join("temp1_input");
            if let Some(temp) = read_millidegrees(&temp_path) {
                return (Some(temp_path), temp);
            }
        }
        (None, 0.0)
    }
    #[cfg(not(target_os = "linux"))]
    {
        (None, 0.0)
    }
}

fn read_dmi(name: &str) -> String {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string(format!("/sys/class/dmi/id/{}", name))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = name;
        String::new()
    }
}

/// Read OS/distro name from /etc/os-release.
fn read_os_pretty_name() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/etc/os-release").ok()?;
        for line in content.lines() {
            if line.starts_with("PRETTY_NAME=") {
                let v = line.strip_prefix("PRETTY_NAME=")?.trim_matches('"');
                return if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
            }
        }
    }
    None
}
