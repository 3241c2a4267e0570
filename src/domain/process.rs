//! Process usage domain types
//!
//! The native layer reports a fixed number of process slots per device.
//! Unused slots carry pid 0 and are kept, so callers must skip them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of process slots in every native process report
pub const PROCESS_SLOTS: usize = 32;

/// Convert a native kilobyte reading to whole megabytes
pub fn kib_to_mb(kib: u64) -> u64 {
    kib / 1024
}

/// One slot of a process report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessUsageEntry {
    /// Process ID (0 means the slot is unused)
    pub pid: u32,
    /// Device memory used by the process, in MB
    pub memory_used_mb: u64,
}

impl ProcessUsageEntry {
    /// Check if this slot refers to a real process
    pub fn is_empty(&self) -> bool {
        self.pid == 0
    }
}

/// Process report for one device, as two parallel sequences
///
/// Both sequences always have [`PROCESS_SLOTS`] elements, including the
/// unused pid-0 slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pids: Vec<u32>,
    memory_mb: Vec<u64>,
}

impl ProcessUsage {
    /// Build a report from native slots of `(pid, memory in KiB)`
    pub fn from_native_slots(slots: &[(u32, u64); PROCESS_SLOTS]) -> Self {
        let pids = slots.iter().map(|&(pid, _)| pid).collect();
        let memory_mb = slots.iter().map(|&(_, kib)| kib_to_mb(kib)).collect();
        Self { pids, memory_mb }
    }

    /// Process IDs, one per slot
    pub fn pids(&self) -> &[u32] {
        &self.pids
    }

    /// Memory used in MB, one per slot
    pub fn memory_mb(&self) -> &[u64] {
        &self.memory_mb
    }

    /// Split into the two parallel sequences
    pub fn into_parts(self) -> (Vec<u32>, Vec<u64>) {
        (self.pids, self.memory_mb)
    }

    /// Iterate over every slot, including empty ones
    pub fn entries(&self) -> impl Iterator<Item = ProcessUsageEntry> + '_ {
        self.pids
            .iter()
            .zip(&self.memory_mb)
            .map(|(&pid, &memory_used_mb)| ProcessUsageEntry {
                pid,
                memory_used_mb,
            })
    }

    /// Iterate over slots that hold a real process
    pub fn active(&self) -> impl Iterator<Item = ProcessUsageEntry> + '_ {
        self.entries().filter(|e| !e.is_empty())
    }

    /// Number of slots holding a real process
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Total memory of all active processes in MB
    pub fn total_memory_mb(&self) -> u64 {
        self.active().map(|e| e.memory_used_mb).sum()
    }
}

/// A process attributed with its name from the host process table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Process ID
    pub pid: u32,
    /// Short process name (empty if the process already exited)
    pub name: String,
    /// Device memory used by the process, in MB
    pub memory_used_mb: u64,
}

impl ProcessRecord {
    /// Get display name (name or PID)
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Process {}", self.pid)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PID {} ({}): {} MB",
            self.pid,
            self.display_name(),
            self.memory_used_mb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots_with(active: &[(u32, u64)]) -> [(u32, u64); PROCESS_SLOTS] {
        let mut slots = [(0, 0); PROCESS_SLOTS];
        slots[..active.len()].copy_from_slice(active);
        slots
    }

    #[test]
    fn test_kib_to_mb_floors() {
        assert_eq!(kib_to_mb(2048), 2);
        assert_eq!(kib_to_mb(2047), 1);
        assert_eq!(kib_to_mb(1023), 0);
    }

    #[test]
    fn test_report_keeps_all_slots() {
        let usage = ProcessUsage::from_native_slots(&slots_with(&[(100, 2048)]));
        assert_eq!(usage.pids().len(), PROCESS_SLOTS);
        assert_eq!(usage.memory_mb().len(), PROCESS_SLOTS);
        assert_eq!(usage.pids()[0], 100);
        assert_eq!(usage.memory_mb()[0], 2);
        assert!(usage.pids()[1..].iter().all(|&pid| pid == 0));
    }

    #[test]
    fn test_active_skips_empty_slots() {
        let usage =
            ProcessUsage::from_native_slots(&slots_with(&[(100, 4096), (0, 0), (300, 10240)]));
        let active: Vec<_> = usage.active().map(|e| e.pid).collect();
        assert_eq!(active, vec![100, 300]);
        assert_eq!(usage.active_count(), 2);
        assert_eq!(usage.total_memory_mb(), 14);
        assert_eq!(usage.entries().count(), PROCESS_SLOTS);
    }

    #[test]
    fn test_into_parts() {
        let usage = ProcessUsage::from_native_slots(&slots_with(&[(7, 1024)]));
        let (pids, mems) = usage.into_parts();
        assert_eq!(pids.len(), mems.len());
        assert_eq!((pids[0], mems[0]), (7, 1));
    }

    #[test]
    fn test_record_display_name() {
        let named = ProcessRecord {
            pid: 1,
            name: "python3".to_string(),
            memory_used_mb: 10,
        };
        assert_eq!(named.display_name(), "python3");

        let exited = ProcessRecord {
            pid: 2,
            name: String::new(),
            memory_used_mb: 0,
        };
        assert_eq!(exited.display_name(), "Process 2");
        assert_eq!(exited.to_string(), "PID 2 (Process 2): 0 MB");
    }
}
