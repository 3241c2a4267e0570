//! Card health and utilization readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health code reported by the native health query
///
/// The native layer reports 0 for an unhealthy card. Any other code is
/// treated as healthy; the raw value is kept for callers that know more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    code: i32,
}

impl HealthState {
    pub fn from_code(code: i32) -> Self {
        Self { code }
    }

    /// Raw native health code
    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn is_healthy(&self) -> bool {
        self.code != 0
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_healthy() {
            write!(f, "Healthy ({})", self.code)
        } else {
            write!(f, "Unhealthy ({})", self.code)
        }
    }
}

/// Board-level utilization percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Utilization(u32);

impl Utilization {
    /// Create a utilization value as reported by the device, unclamped
    pub fn new(percent: u32) -> Self {
        Self(percent)
    }

    /// Board utilization as a percentage
    pub fn board_percent(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
