// CPU metrics model

use serde::{Deserialize, Serialize};

/// CPU report: cached facts, current frequency/temperature, and the
/// usage percentages derived from the caller-supplied cursor.
///
/// `total` and `cores` carry the raw 8-component time vectors
/// (user, nice, system, idle, iowait, irq, softirq, steal) in seconds;
/// they are echoed so callers can debug what the cursor was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    pub count: u32,
    pub model: String,
    pub frequency_mhz: f64,
    pub temperature: f64,
    pub usage_percent: f64,
    pub core_usage: Vec<f64>,
    pub total: Vec<f64>,
    pub cores: Vec<Vec<f64>>,
    pub cursor: String,
}
