//! cndev - CNDEV-based telemetry library for Cambricon MLU cards
//!
//! This library enumerates MLU cards, resolves a stable identity for each,
//! and retrieves health, memory, utilization and per-process memory usage
//! through Cambricon's CNDEV library.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`cndev`]: CNDEV abstraction layer and device handles
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain value types
//! - [`error`]: Error types
//! - [`process`]: Process name attribution

pub mod cli;
pub mod cndev;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod process;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use cndev::{resolve, CndevManager, DeviceHandle, NativeLibrary};
pub use error::{AppError, Result};
pub use process::{resolve_process_name, ProcFs, ProcessTable};
