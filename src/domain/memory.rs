//! Device memory domain types
//!
//! A point-in-time reading of an MLU card's physical memory. The free
//! amount is always derived from total and used, never queried.

use serde::{Deserialize, Serialize};
use std::fmt;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Physical memory reading for one device
///
/// # Examples
///
/// ```
/// use cndev::domain::MemorySnapshot;
///
/// let snapshot = MemorySnapshot::from_usage(8_000_000_000, 2_000_000_000).unwrap();
/// assert_eq!(snapshot.free_bytes(), 6_000_000_000);
/// assert_eq!(snapshot.used_bytes() + snapshot.free_bytes(), snapshot.total_bytes());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    total_bytes: u64,
    used_bytes: u64,
    free_bytes: u64,
}

impl MemorySnapshot {
    /// Build a snapshot from total and used bytes
    ///
    /// Returns `None` when `used` exceeds `total`, since no free amount
    /// would keep `free + used == total`.
    pub fn from_usage(total_bytes: u64, used_bytes: u64) -> Option<Self> {
        let free_bytes = total_bytes.checked_sub(used_bytes)?;
        Some(Self {
            total_bytes,
            used_bytes,
            free_bytes,
        })
    }

    /// Device physical memory capacity in bytes
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Used memory in bytes
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Free memory in bytes
    pub fn free_bytes(&self) -> u64 {
        self.free_bytes
    }

    /// Total memory in MB
    pub fn total_mb(&self) -> u64 {
        self.total_bytes / BYTES_PER_MB
    }

    /// Used memory in MB
    pub fn used_mb(&self) -> u64 {
        self.used_bytes / BYTES_PER_MB
    }

    /// Free memory in MB
    pub fn free_mb(&self) -> u64 {
        self.free_bytes / BYTES_PER_MB
    }

    /// Get usage ratio (0.0 - 1.0)
    pub fn usage_ratio(&self) -> f32 {
        if self.total_bytes == 0 {
            0.0
        } else {
            self.used_bytes as f32 / self.total_bytes as f32
        }
    }

    /// Get usage percentage (0 - 100)
    pub fn usage_percent(&self) -> u8 {
        (self.usage_ratio() * 100.0) as u8
    }
}

impl fmt::Display for MemorySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} MB / {} MB ({} MB free)",
            self.used_mb(),
            self.total_mb(),
            self.free_mb()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_is_derived() {
        let snapshot = MemorySnapshot::from_usage(8_000_000_000, 2_000_000_000).unwrap();
        assert_eq!(snapshot.total_bytes(), 8_000_000_000);
        assert_eq!(snapshot.used_bytes(), 2_000_000_000);
        assert_eq!(snapshot.free_bytes(), 6_000_000_000);
    }

    #[test]
    fn test_free_plus_used_is_total() {
        for (total, used) in [(0, 0), (1, 1), (4096, 1), (u64::MAX, 17)] {
            let s = MemorySnapshot::from_usage(total, used).unwrap();
            assert_eq!(s.free_bytes() + s.used_bytes(), s.total_bytes());
        }
    }

    #[test]
    fn test_used_above_total_rejected() {
        assert!(MemorySnapshot::from_usage(100, 101).is_none());
    }

    #[test]
    fn test_usage_percent() {
        let s = MemorySnapshot::from_usage(1000, 250).unwrap();
        assert_eq!(s.usage_percent(), 25);

        let empty = MemorySnapshot::from_usage(0, 0).unwrap();
        assert_eq!(empty.usage_ratio(), 0.0);
    }

    #[test]
    fn test_display() {
        let s = MemorySnapshot::from_usage(4 * BYTES_PER_MB, BYTES_PER_MB).unwrap();
        assert_eq!(s.to_string(), "1 MB / 4 MB (3 MB free)");
    }
}
