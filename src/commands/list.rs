//! List command implementation
//!
//! Lists all detected MLU cards.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceList, DeviceListEntry};
use crate::cndev::{CndevManager, NativeLibrary};
use crate::commands::select_devices;
use crate::error::Result;

/// Execute the list command
pub fn run_list<L: NativeLibrary>(
    manager: &CndevManager<L>,
    format: OutputFormat,
    device: Option<u32>,
) -> Result<()> {
    let devices = select_devices(manager, device)?;

    let list = DeviceList {
        devices: devices.iter().map(DeviceListEntry::from).collect(),
    };

    print_output(&list, format)?;

    Ok(())
}
