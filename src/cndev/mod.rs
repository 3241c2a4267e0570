//! CNDEV abstraction layer
//!
//! Provides trait-based abstractions over the Cambricon CNDEV library for
//! testability.

pub mod device;
pub mod ffi;
pub mod library;
pub mod manager;
pub mod traits;

pub use device::{resolve, DeviceHandle};
pub use library::{CndevLibrary, DEFAULT_LIBRARY_PATHS};
pub use manager::CndevManager;
pub use traits::{NativeLibrary, RawMemoryUsage, RawProcessSlot};
