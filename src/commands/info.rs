//! Info command implementation
//!
//! Shows memory and utilization for each MLU card.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceInfoOutput, DeviceListEntry};
use crate::cndev::{CndevManager, NativeLibrary};
use crate::commands::select_devices;
use crate::error::Result;

/// Execute the info command
pub fn run_info<L: NativeLibrary>(
    manager: &CndevManager<L>,
    format: OutputFormat,
    device: Option<u32>,
) -> Result<()> {
    for handle in select_devices(manager, device)? {
        let output = DeviceInfoOutput {
            device: DeviceListEntry::from(&handle),
            memory: handle.memory_snapshot()?,
            utilization: handle.utilization()?,
        };
        print_output(&output, format)?;
    }

    Ok(())
}
