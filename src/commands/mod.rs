//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command against
//! an initialized manager.

pub mod health;
pub mod info;
pub mod list;
pub mod processes;

pub use health::run_health;
pub use info::run_info;
pub use list::run_list;
pub use processes::run_processes;

use crate::cndev::{CndevManager, DeviceHandle, NativeLibrary};
use crate::error::{AppError, Result};

/// Resolve the targeted device, or every device when none is given
pub fn select_devices<L: NativeLibrary>(
    manager: &CndevManager<L>,
    index: Option<u32>,
) -> Result<Vec<DeviceHandle<L>>> {
    let devices = match index {
        Some(idx) => {
            let count = manager.device_count()?;
            if idx >= count {
                return Err(AppError::DeviceNotFound(format!(
                    "index {} (found {} devices)",
                    idx, count
                )));
            }
            vec![manager.device_by_index(idx)?]
        }
        None => manager.all_devices()?,
    };

    if devices.is_empty() {
        return Err(AppError::NoDevicesFound);
    }
    Ok(devices)
}
