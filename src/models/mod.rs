// Wire models (JSON camelCase)

mod cpu;
mod disk;
mod memory;
mod meta;
mod network;
mod process;
mod system;

pub use cpu::CpuMetrics;
pub use disk::{DeviceCounters, DeviceRate, DiskActivity, DiskRates, MountUsage};
pub use memory::MemoryMetrics;
pub use meta::{MetaMetrics, ModuleList};
pub use network::{InterfaceCounters, InterfaceRate, NetworkLink, NetworkRates};
pub use process::{MemorySource, ProcessEntry, ProcessList, SortKey};
pub use system::{HardwareInfo, SystemStatus};
