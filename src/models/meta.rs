// Composite (multi-module) response models

use serde::{Deserialize, Serialize};

use super::{
    CpuMetrics, DiskActivity, DiskRates, HardwareInfo, MemoryMetrics, MountUsage, NetworkLink,
    NetworkRates, ProcessList, SystemStatus,
};

/// Composite result for a `meta` request. Each requested module lands in
/// its field; a module that failed to collect stays `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<Vec<NetworkLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netrate: Option<NetworkRates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<Vec<DiskActivity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diskrate: Option<DiskRates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diskmounts: Option<Vec<MountUsage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processes: Option<ProcessList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleList {
    pub available: Vec<String>,
}
