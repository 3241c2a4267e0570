//! MLU device handle
//!
//! A [`DeviceHandle`] pairs the identity of one card with the query
//! operations that address it by native index.

use crate::cndev::traits::NativeLibrary;
use crate::domain::{
    format_serial, HealthState, MemorySnapshot, ProcessUsage, Utilization, IDENTIFIER_PREFIX,
};
use crate::error::CndevError;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Handle to one physical MLU card
///
/// The identifier and device path are derived once in [`resolve`] and
/// never recomputed, even if the native serial query would now answer
/// differently.
pub struct DeviceHandle<L: NativeLibrary> {
    identifier: String,
    index: u32,
    device_path: String,
    lib: Arc<L>,
}

/// Build a handle for the card at `index`
///
/// Cards without a burned-in serial get a freshly generated UUID, so their
/// identifier differs on every call. Either native query failing fails the
/// whole resolution.
pub fn resolve<L: NativeLibrary>(lib: &Arc<L>, index: u32) -> Result<DeviceHandle<L>, CndevError> {
    let serial = lib.card_serial(index)?;

    let mut id = format_serial(serial);
    if id == "0" {
        id = Uuid::new_v4().to_string();
        log::warn!(
            "MLU {} reports no serial number, using generated identifier {}",
            index,
            id
        );
    }
    let identifier = format!("{}{}", IDENTIFIER_PREFIX, id);

    let model = lib.card_model(index)?;
    let device_path = model.device_path(index);

    log::debug!(
        "Resolved MLU {} ({}) as {} at {}",
        index,
        model,
        identifier,
        device_path
    );

    Ok(DeviceHandle {
        identifier,
        index,
        device_path,
        lib: Arc::clone(lib),
    })
}

impl<L: NativeLibrary> DeviceHandle<L> {
    /// Stable identifier, `MLU-<serial>` or `MLU-<uuid>`
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Native enumeration index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Filesystem path of the device node
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Query card health after a settling delay
    ///
    /// Blocks for the full `delay` before the query is issued. Do not call
    /// from a context that cannot tolerate a multi-second stall.
    pub fn health_state(&self, delay: Duration) -> Result<HealthState, CndevError> {
        let code = self.lib.health(self.index, delay)?;
        Ok(HealthState::from_code(code))
    }

    /// Query physical memory usage
    pub fn memory_snapshot(&self) -> Result<MemorySnapshot, CndevError> {
        let raw = self.lib.memory_usage(self.index)?;

        let total = self.non_negative(raw.total, "total memory")?;
        let used = self.non_negative(raw.used, "used memory")?;

        MemorySnapshot::from_usage(total, used).ok_or_else(|| CndevError::InvalidReading {
            index: self.index,
            detail: format!("used memory {} exceeds total {}", used, total),
        })
    }

    /// Query board utilization
    pub fn utilization(&self) -> Result<Utilization, CndevError> {
        let raw = self.lib.utilization(self.index)?;
        let percent = u32::try_from(raw).map_err(|_| CndevError::InvalidReading {
            index: self.index,
            detail: format!("negative utilization {}", raw),
        })?;
        Ok(Utilization::new(percent))
    }

    /// Query per-process memory usage
    ///
    /// Always returns every native slot, including unused pid-0 slots.
    pub fn process_usage(&self) -> Result<ProcessUsage, CndevError> {
        let slots = self.lib.process_list(self.index)?;
        Ok(ProcessUsage::from_native_slots(&slots))
    }

    fn non_negative(&self, value: i64, what: &str) -> Result<u64, CndevError> {
        u64::try_from(value).map_err(|_| CndevError::InvalidReading {
            index: self.index,
            detail: format!("negative {} {}", what, value),
        })
    }
}

impl<L: NativeLibrary> Clone for DeviceHandle<L> {
    fn clone(&self) -> Self {
        Self {
            identifier: self.identifier.clone(),
            index: self.index,
            device_path: self.device_path.clone(),
            lib: Arc::clone(&self.lib),
        }
    }
}

impl<L: NativeLibrary> fmt::Debug for DeviceHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("identifier", &self.identifier)
            .field("index", &self.index)
            .field("device_path", &self.device_path)
            .finish()
    }
}

impl<L: NativeLibrary> fmt::Display for DeviceHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.identifier, self.device_path)
    }
}
