// System status and hardware identity models

use serde::{Deserialize, Serialize};

/// Dynamic machine-wide figures: load, process/thread counts, uptime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// 1, 5 and 15 minute load averages.
    pub load_avg: [f64; 3],
    pub process_count: u32,
    pub thread_count: u32,
    pub boot_time_secs: u64,
    pub uptime_secs: u64,
}

/// Static hardware identity from DMI plus kernel/OS strings.
/// Empty strings where the platform exposes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    pub system_vendor: String,
    pub product_name: String,
    pub board_vendor: String,
    pub board_name: String,
    pub bios_vendor: String,
    pub bios_version: String,
    pub bios_date: String,
    pub kernel_version: String,
    pub os_name: String,
}
