//! Process attribution
//!
//! Resolves pids reported by the device to process names through the host
//! process table. A process can exit between the device listing it and the
//! lookup, so a missing record for a real pid is not an error.

pub mod procfs;

pub use procfs::ProcFs;

use crate::domain::{ProcessRecord, ProcessUsage};
use crate::error::ProcessError;

use std::io;

/// Host process table lookup
///
/// Implementations must report a missing record as
/// [`io::ErrorKind::NotFound`] so callers can tell an exited process apart
/// from other failures.
pub trait ProcessTable: Send + Sync {
    /// Read the raw short-name record for `pid`
    fn read_name(&self, pid: u32) -> io::Result<String>;
}

/// Resolve `pid` to its short process name
///
/// Returns an empty name when a nonzero pid has no record (the process
/// already exited). Any failure for pid 0 is an error.
pub fn resolve_process_name<T: ProcessTable + ?Sized>(
    table: &T,
    pid: u32,
) -> Result<String, ProcessError> {
    match table.read_name(pid) {
        Ok(mut name) => {
            if name.ends_with('\n') {
                name.pop();
            }
            Ok(name)
        }
        Err(e) if pid == 0 => Err(ProcessError::InvalidPid(e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Process {} exited before its name was read", pid);
            Ok(String::new())
        }
        Err(e) => Err(ProcessError::Read { pid, source: e }),
    }
}

/// Attach names to the occupied slots of a process report
///
/// Empty (pid 0) slots are skipped; a failed lookup fails the whole call.
pub fn attribute_processes<T: ProcessTable + ?Sized>(
    usage: &ProcessUsage,
    table: &T,
) -> Result<Vec<ProcessRecord>, ProcessError> {
    usage
        .active()
        .map(|entry| {
            Ok(ProcessRecord {
                pid: entry.pid,
                name: resolve_process_name(table, entry.pid)?,
                memory_used_mb: entry.memory_used_mb,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PROCESS_SLOTS;
    use crate::mock::MockProcessTable;

    #[test]
    fn test_name_strips_single_newline() {
        let table = MockProcessTable::new()
            .with_process(42, "python3\n")
            .with_process(43, "twice\n\n")
            .with_process(44, "bare");

        assert_eq!(resolve_process_name(&table, 42).unwrap(), "python3");
        assert_eq!(resolve_process_name(&table, 43).unwrap(), "twice\n");
        assert_eq!(resolve_process_name(&table, 44).unwrap(), "bare");
    }

    #[test]
    fn test_exited_process_is_empty_name() {
        let table = MockProcessTable::new();
        assert_eq!(resolve_process_name(&table, 4242).unwrap(), "");
    }

    #[test]
    fn test_pid_zero_missing_is_error() {
        let table = MockProcessTable::new();
        let err = resolve_process_name(&table, 0).unwrap_err();
        assert!(matches!(err, ProcessError::InvalidPid(_)));
    }

    #[test]
    fn test_pid_zero_with_record_succeeds() {
        let table = MockProcessTable::new().with_process(0, "swapper\n");
        assert_eq!(resolve_process_name(&table, 0).unwrap(), "swapper");
    }

    #[test]
    fn test_other_failure_is_error() {
        let table = MockProcessTable::new().with_failure(7, io::ErrorKind::PermissionDenied);
        let err = resolve_process_name(&table, 7).unwrap_err();
        assert!(matches!(err, ProcessError::Read { pid: 7, .. }));
    }

    #[test]
    fn test_attribute_processes_skips_empty_slots() {
        let mut slots = [(0, 0); PROCESS_SLOTS];
        slots[0] = (100, 2048);
        slots[1] = (200, 4096);
        let usage = ProcessUsage::from_native_slots(&slots);
        let table = MockProcessTable::new().with_process(100, "train\n");

        let records = attribute_processes(&usage, &table).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "train");
        assert_eq!(records[0].memory_used_mb, 2);
        assert_eq!(records[1].name, "");
        assert_eq!(records[1].memory_used_mb, 4);
    }

    #[test]
    fn test_attribute_processes_propagates_failure() {
        let mut slots = [(0, 0); PROCESS_SLOTS];
        slots[0] = (9, 1024);
        let usage = ProcessUsage::from_native_slots(&slots);
        let table = MockProcessTable::new().with_failure(9, io::ErrorKind::PermissionDenied);
        assert!(attribute_processes(&usage, &table).is_err());
    }
}
