//! Health command implementation
//!
//! Runs the blocking health check on each MLU card.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, DeviceListEntry, HealthOutput};
use crate::cndev::{CndevManager, NativeLibrary};
use crate::commands::select_devices;
use crate::error::Result;

use std::time::Duration;

/// Execute the health command
///
/// Devices are checked one after another, so the total run time is the
/// delay times the number of devices.
pub fn run_health<L: NativeLibrary>(
    manager: &CndevManager<L>,
    format: OutputFormat,
    device: Option<u32>,
    delay: Duration,
) -> Result<()> {
    for handle in select_devices(manager, device)? {
        log::debug!("Checking health of {} with {:?} delay", handle, delay);
        let state = handle.health_state(delay)?;
        if !state.is_healthy() {
            log::warn!("{} reports unhealthy state {}", handle, state.code());
        }

        let output = HealthOutput {
            device: DeviceListEntry::from(&handle),
            healthy: state.is_healthy(),
            state,
        };
        print_output(&output, format)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCard, MockLibrary};

    #[test]
    fn test_run_health() {
        let lib = MockLibrary::new(vec![MockCard::new(1), MockCard::new(2).with_health(0)]);
        let manager = CndevManager::with_library(lib).unwrap();
        assert!(run_health(&manager, OutputFormat::Compact, None, Duration::ZERO).is_ok());
    }
}
