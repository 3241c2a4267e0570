//! CNDEV manager implementation
//!
//! Owns the process-wide library lifecycle and hands out device handles.

use crate::cndev::device::{resolve, DeviceHandle};
use crate::cndev::library::CndevLibrary;
use crate::cndev::traits::NativeLibrary;
use crate::config::LibraryConfig;
use crate::error::CndevError;

use std::sync::Arc;

/// CNDEV manager for device discovery
///
/// Initialization happens when the manager is created and release when it
/// is shut down, so each direction runs at most once per manager. Keep a
/// single manager for the lifetime of the agent.
pub struct CndevManager<L: NativeLibrary = CndevLibrary> {
    lib: Arc<L>,
    released: bool,
}

impl CndevManager<CndevLibrary> {
    /// Load the CNDEV library and initialize it
    pub fn initialize(config: &LibraryConfig) -> Result<Self, CndevError> {
        let lib = if config.paths.is_empty() {
            CndevLibrary::open_default()?
        } else {
            CndevLibrary::open(&config.paths)?
        };
        Self::with_library(lib)
    }
}

impl<L: NativeLibrary> CndevManager<L> {
    /// Initialize an already-loaded library
    ///
    /// On failure the library is released best-effort before returning.
    pub fn with_library(lib: L) -> Result<Self, CndevError> {
        if let Err(e) = lib.init() {
            if let Err(release_err) = lib.release() {
                log::debug!("Release after failed init also failed: {}", release_err);
            }
            return Err(e);
        }

        Ok(Self {
            lib: Arc::new(lib),
            released: false,
        })
    }

    /// Get a reference to the underlying library
    pub fn library(&self) -> &Arc<L> {
        &self.lib
    }

    /// Get the number of MLU cards
    pub fn device_count(&self) -> Result<u32, CndevError> {
        self.lib.device_count()
    }

    /// Resolve the device at `index`
    pub fn device_by_index(&self, index: u32) -> Result<DeviceHandle<L>, CndevError> {
        resolve(&self.lib, index)
    }

    /// Resolve every device
    pub fn all_devices(&self) -> Result<Vec<DeviceHandle<L>>, CndevError> {
        let count = self.device_count()?;
        let mut devices = Vec::with_capacity(count as usize);
        for i in 0..count {
            devices.push(self.device_by_index(i)?);
        }
        Ok(devices)
    }

    /// Find a device by identifier
    ///
    /// Only cards with a burned-in serial can be found this way, since
    /// generated identifiers change on every resolution.
    pub fn device_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<DeviceHandle<L>>, CndevError> {
        Ok(self
            .all_devices()?
            .into_iter()
            .find(|d| d.identifier() == identifier))
    }

    /// Release the library
    ///
    /// Handles created by this manager keep the library loaded, but native
    /// calls through them fail once it has been released.
    pub fn shutdown(mut self) -> Result<(), CndevError> {
        self.released = true;
        self.lib.release()
    }
}

impl<L: NativeLibrary> Drop for CndevManager<L> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        log::warn!("CNDEV manager dropped without shutdown, releasing library");
        if let Err(e) = self.lib.release() {
            log::warn!("Failed to release CNDEV library: {}", e);
        }
    }
}
