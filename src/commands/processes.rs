//! Processes command implementation
//!
//! Lists processes using MLU memory, with names from the host process table.

use crate::cli::args::{OutputFormat, ProcessesArgs};
use crate::cli::output::{print_output, DeviceListEntry, ProcessListOutput};
use crate::cndev::{CndevManager, NativeLibrary};
use crate::commands::select_devices;
use crate::error::Result;
use crate::process::{attribute_processes, ProcessTable};

/// Execute the processes command
pub fn run_processes<L: NativeLibrary, T: ProcessTable>(
    manager: &CndevManager<L>,
    table: &T,
    args: &ProcessesArgs,
    format: OutputFormat,
    device: Option<u32>,
) -> Result<()> {
    let handles = select_devices(manager, device)?;
    let multiple = handles.len() > 1;

    for handle in handles {
        let usage = handle.process_usage()?;
        let mut processes = attribute_processes(&usage, table)?;

        // Default: sort by memory (descending)
        processes.sort_by(|a, b| b.memory_used_mb.cmp(&a.memory_used_mb));

        let output = ProcessListOutput {
            device: DeviceListEntry::from(&handle),
            process_count: processes.len(),
            total_memory_mb: usage.total_memory_mb(),
            processes,
            slots: args.all.then(|| usage.entries().collect()),
        };

        print_output(&output, format)?;

        if multiple {
            println!(); // Separator between devices
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, ProcessError};
    use crate::mock::{MockCard, MockLibrary, MockProcessTable};

    fn args(all: bool) -> ProcessesArgs {
        ProcessesArgs {
            all,
            proc_root: None,
        }
    }

    #[test]
    fn test_run_processes() {
        let lib = MockLibrary::new(vec![MockCard::new(1)
            .with_process(100, 2048)
            .with_process(200, 4096)]);
        let manager = CndevManager::with_library(lib).unwrap();
        let table = MockProcessTable::new().with_process(100, "train\n");

        assert!(run_processes(&manager, &table, &args(true), OutputFormat::Table, None).is_ok());
    }

    #[test]
    fn test_run_processes_lookup_failure() {
        let lib = MockLibrary::new(vec![MockCard::new(1).with_process(100, 2048)]);
        let manager = CndevManager::with_library(lib).unwrap();
        let table =
            MockProcessTable::new().with_failure(100, std::io::ErrorKind::PermissionDenied);

        assert!(matches!(
            run_processes(&manager, &table, &args(false), OutputFormat::Json, None),
            Err(AppError::Process(ProcessError::Read { pid: 100, .. }))
        ));
    }
}
