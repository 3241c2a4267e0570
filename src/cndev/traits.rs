//! Trait definition for the native capability boundary
//!
//! Abstracts over CNDEV so that tests can substitute an in-memory fake.

use crate::domain::{CardModel, PROCESS_SLOTS};
use crate::error::CndevError;

use std::time::Duration;

/// Raw physical memory reading, in bytes, as the native layer reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawMemoryUsage {
    pub total: i64,
    pub used: i64,
}

/// One native process slot: `(pid, physical memory in KiB)`
pub type RawProcessSlot = (u32, u64);

/// Native capability adapter over the CNDEV library
///
/// Every per-device call is addressed purely by the native index, so an
/// implementation must be safe to call concurrently for different indices.
/// `init` and `release` are process-global and must be sequenced by the
/// owner (see [`crate::cndev::CndevManager`]).
pub trait NativeLibrary: Send + Sync {
    /// Initialize the native library
    fn init(&self) -> Result<(), CndevError>;

    /// Release native resources
    ///
    /// Must be safe to call after a failed or partial `init`.
    fn release(&self) -> Result<(), CndevError>;

    /// Number of MLU cards visible to the driver
    fn device_count(&self) -> Result<u32, CndevError>;

    /// Card model tag
    fn card_model(&self, index: u32) -> Result<CardModel, CndevError>;

    /// Burned-in serial number (0 when the card has none)
    fn card_serial(&self, index: u32) -> Result<i64, CndevError>;

    /// Raw health code, queried immediately
    fn health_code(&self, index: u32) -> Result<i32, CndevError>;

    /// Health code after a settling delay
    ///
    /// Blocks the calling thread for the full `delay` before querying,
    /// whatever the outcome of the query.
    fn health(&self, index: u32, delay: Duration) -> Result<i32, CndevError> {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        self.health_code(index)
    }

    /// Physical memory total and used, in bytes
    fn memory_usage(&self, index: u32) -> Result<RawMemoryUsage, CndevError>;

    /// Board utilization percentage
    fn utilization(&self, index: u32) -> Result<i32, CndevError>;

    /// Fixed-capacity process report; unused slots have pid 0
    fn process_list(&self, index: u32) -> Result<[RawProcessSlot; PROCESS_SLOTS], CndevError>;
}

impl<L: NativeLibrary + ?Sized> NativeLibrary for std::sync::Arc<L> {
    fn init(&self) -> Result<(), CndevError> {
        (**self).init()
    }

    fn release(&self) -> Result<(), CndevError> {
        (**self).release()
    }

    fn device_count(&self) -> Result<u32, CndevError> {
        (**self).device_count()
    }

    fn card_model(&self, index: u32) -> Result<CardModel, CndevError> {
        (**self).card_model(index)
    }

    fn card_serial(&self, index: u32) -> Result<i64, CndevError> {
        (**self).card_serial(index)
    }

    fn health_code(&self, index: u32) -> Result<i32, CndevError> {
        (**self).health_code(index)
    }

    fn health(&self, index: u32, delay: Duration) -> Result<i32, CndevError> {
        (**self).health(index, delay)
    }

    fn memory_usage(&self, index: u32) -> Result<RawMemoryUsage, CndevError> {
        (**self).memory_usage(index)
    }

    fn utilization(&self, index: u32) -> Result<i32, CndevError> {
        (**self).utilization(index)
    }

    fn process_list(&self, index: u32) -> Result<[RawProcessSlot; PROCESS_SLOTS], CndevError> {
        (**self).process_list(index)
    }
}
