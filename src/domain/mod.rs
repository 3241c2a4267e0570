//! Domain models for cndev
//!
//! Value types produced by device queries. All of them are created fresh
//! per query and owned by the caller.

pub mod card;
pub mod health;
pub mod memory;
pub mod process;

pub use card::{format_serial, CardModel, IDENTIFIER_PREFIX};
pub use health::{HealthState, Utilization};
pub use memory::MemorySnapshot;
pub use process::{
    kib_to_mb, ProcessRecord, ProcessUsage, ProcessUsageEntry, PROCESS_SLOTS,
};
