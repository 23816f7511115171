// Aggregate orchestrator: fan a request out to named module collectors
// and assemble a partial-tolerant composite. A failed module is logged
// and omitted; only an unknown module name is fatal, rejected before any
// collection begins.

use tracing::error;

use super::{EngineError, MODULES, MetricsEngine, ProcessQuery};
use crate::models::{MetaMetrics, SortKey};

#[derive(Debug, Clone)]
pub struct MetaParams {
    pub sort_by: SortKey,
    pub limit: usize,
    pub enable_cpu: bool,
    pub cpu_cursor: Option<String>,
    pub proc_cursor: Option<String>,
    pub net_cursor: Option<String>,
    pub disk_cursor: Option<String>,
}

impl Default for MetaParams {
    fn default() -> Self {
        Self {
            sort_by: SortKey::Cpu,
            limit: 0,
            enable_cpu: true,
            cpu_cursor: None,
            proc_cursor: None,
            net_cursor: None,
            disk_cursor: None,
        }
    }
}

impl MetricsEngine {
    pub async fn meta(
        &self,
        modules: &[String],
        params: MetaParams,
    ) -> Result<MetaMetrics, EngineError> {
        // Validate every name up front; no collector runs for a request
        // containing garbage.
        let mut requested: Vec<&str> = Vec::new();
        for module in modules {
            let name = module.trim().to_ascii_lowercase();
            if name == "all" {
                for known in MODULES.iter().copied() {
                    if !requested.contains(&known) {
                        requested.push(known);
                    }
                }
                continue;
            }
            match MODULES.iter().copied().find(|m| *m == name) {
                Some(known) if !requested.contains(&known) => requested.push(known),
                Some(_) => {}
                None => return Err(EngineError::UnknownModule(module.trim().to_string())),
            }
        }

        let mut meta = MetaMetrics::default();
        for module in requested {
            match module {
                "cpu" => match self.cpu(params.cpu_cursor.as_deref()).await {
                    Ok(v) => meta.cpu = Some(v),
                    Err(e) => error!("cpu module failed: {}", e),
                },
                "memory" => match self.memory().await {
                    Ok(v) => meta.memory = Some(v),
                    Err(e) => error!("memory module failed: {}", e),
                },
                "network" => match self.network().await {
                    Ok(v) => meta.network = Some(v),
                    Err(e) => error!("network module failed: {}", e),
                },
                "netrate" => match self.network_rates(params.net_cursor.as_deref()).await {
                    Ok(v) => meta.netrate = Some(v),
                    Err(e) => error!("netrate module failed: {}", e),
                },
                "disk" => match self.disk().await {
                    Ok(v) => meta.disk = Some(v),
                    Err(e) => error!("disk module failed: {}", e),
                },
                "diskrate" => match self.disk_rates(params.disk_cursor.as_deref()).await {
                    Ok(v) => meta.diskrate = Some(v),
                    Err(e) => error!("diskrate module failed: {}", e),
                },
                "diskmounts" => match self.disk_mounts().await {
                    Ok(v) => meta.diskmounts = Some(v),
                    Err(e) => error!("diskmounts module failed: {}", e),
                },
                "processes" => {
                    let query = ProcessQuery {
                        sort_by: params.sort_by,
                        limit: params.limit,
                        enable_cpu: params.enable_cpu,
                        cursor: params.proc_cursor.clone(),
                        deadline: None,
                    };
                    match self.processes(query).await {
                        Ok(v) => meta.processes = Some(v),
                        Err(e) => error!("processes module failed: {}", e),
                    }
                }
                "system" => match self.system().await {
                    Ok(v) => meta.system = Some(v),
                    Err(e) => error!("system module failed: {}", e),
                },
                "hardware" => match self.hardware().await {
                    Ok(v) => meta.hardware = Some(v),
                    Err(e) => error!("hardware module failed: {}", e),
                },
                _ => {}
            }
        }
        Ok(meta)
    }
}
