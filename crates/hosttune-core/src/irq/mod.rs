//! IRQ-related collaborators handed to the tuner factory.
//!
//! These only read host state; none of the shipped tuners rewrite IRQ
//! placement.

mod balance;
mod cpu_masks;
mod device_info;
mod proc_file;

pub use balance::BalanceService;
pub use cpu_masks::CpuMasks;
pub use device_info::DeviceInfo;
pub use proc_file::ProcFile;

pub const PROC_INTERRUPTS_FILE: &str = "/proc/interrupts";
pub const IRQBALANCE_CONFIG_FILE: &str = "/etc/default/irqbalance";
