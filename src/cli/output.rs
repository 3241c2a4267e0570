//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::cndev::{DeviceHandle, NativeLibrary};
use crate::domain::{HealthState, MemorySnapshot, ProcessRecord, ProcessUsageEntry, Utilization};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    write_output(&mut stdout.lock(), data, format)
}

/// Write `data` in the selected format to `out`
pub fn write_output<W: Write, T: Serialize + TableDisplay>(
    out: &mut W,
    data: &T,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(out, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Device list entry for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListEntry {
    pub index: u32,
    pub identifier: String,
    pub path: String,
}

impl<L: NativeLibrary> From<&DeviceHandle<L>> for DeviceListEntry {
    fn from(handle: &DeviceHandle<L>) -> Self {
        Self {
            index: handle.index(),
            identifier: handle.identifier().to_string(),
            path: handle.device_path().to_string(),
        }
    }
}

impl TableDisplay for DeviceListEntry {
    fn to_table(&self) -> String {
        format!("[{}] {} ({})", self.index, self.identifier, self.path)
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.index, self.identifier)
    }
}

/// Device list for display
#[derive(Debug, Clone, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceListEntry>,
}

impl TableDisplay for DeviceList {
    fn to_table(&self) -> String {
        let mut output = format!("MLU Cards Found: {}\n\n", self.devices.len());

        for device in &self.devices {
            output.push_str(&device.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.devices
            .iter()
            .map(|d| d.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Memory and utilization of one device
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfoOutput {
    pub device: DeviceListEntry,
    pub memory: MemorySnapshot,
    pub utilization: Utilization,
}

impl TableDisplay for DeviceInfoOutput {
    fn to_table(&self) -> String {
        format!(
            "{}\n  Memory:      {} ({}% used)\n  Utilization: {}\n",
            self.device.to_table(),
            self.memory,
            self.memory.usage_percent(),
            self.utilization
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "MLU {}: {}/{} MB, {}",
            self.device.index,
            self.memory.used_mb(),
            self.memory.total_mb(),
            self.utilization
        )
    }
}

/// Health check result of one device
#[derive(Debug, Clone, Serialize)]
pub struct HealthOutput {
    pub device: DeviceListEntry,
    pub healthy: bool,
    pub state: HealthState,
}

impl TableDisplay for HealthOutput {
    fn to_table(&self) -> String {
        format!("{}\n  Health: {}\n", self.device.to_table(), self.state)
    }

    fn to_compact(&self) -> String {
        format!("MLU {}: {}", self.device.index, self.state)
    }
}

/// Process list for display
#[derive(Debug, Clone, Serialize)]
pub struct ProcessListOutput {
    pub device: DeviceListEntry,
    pub process_count: usize,
    pub total_memory_mb: u64,
    pub processes: Vec<ProcessRecord>,
    /// Raw slots, present only when empty slots were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Vec<ProcessUsageEntry>>,
}

impl TableDisplay for ProcessListOutput {
    fn to_table(&self) -> String {
        let mut output = format!("{}\n", self.device.to_table());
        output.push_str(&format!(
            "  Processes: {} (Total Memory: {} MB)\n\n",
            self.process_count, self.total_memory_mb
        ));

        if let Some(slots) = &self.slots {
            output.push_str("  Slot  PID      Memory\n");
            output.push_str("  ──────────────────────────────\n");
            for (i, slot) in slots.iter().enumerate() {
                output.push_str(&format!(
                    "  {:<5} {:<8} {} MB\n",
                    i, slot.pid, slot.memory_used_mb
                ));
            }
            output.push('\n');
        }

        if self.processes.is_empty() {
            output.push_str("  No processes running on MLU\n");
            return output;
        }

        output.push_str("  PID      Memory      Name\n");
        output.push_str("  ────────────────────────────────────────\n");

        for process in &self.processes {
            output.push_str(&format!(
                "  {:<8} {:<11} {}\n",
                process.pid,
                format!("{} MB", process.memory_used_mb),
                process.display_name()
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        if self.processes.is_empty() {
            format!("MLU {}: No processes", self.device.index)
        } else {
            format!(
                "MLU {}: {} processes, {} MB total",
                self.device.index, self.process_count, self.total_memory_mb
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DeviceListEntry {
        DeviceListEntry {
            index: 0,
            identifier: "MLU-ab".to_string(),
            path: "/dev/cambricon_dev0".to_string(),
        }
    }

    // JSON object keys must be strings, so tuple keys fail to serialize.
    #[derive(Serialize)]
    struct Unserializable {
        keys: std::collections::HashMap<(u32, u32), u32>,
    }

    impl TableDisplay for Unserializable {
        fn to_table(&self) -> String {
            "unserializable".to_string()
        }
    }

    #[test]
    fn test_json_failure_is_reported() {
        let data = Unserializable {
            keys: [((1, 2), 3)].into_iter().collect(),
        };
        let mut out = Vec::new();
        let err = write_output(&mut out, &data, OutputFormat::Json).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(out.is_empty());

        write_output(&mut out, &data, OutputFormat::Table).unwrap();
        assert_eq!(out, b"unserializable\n");
    }

    #[test]
    fn test_json_output() {
        let list = DeviceList {
            devices: vec![entry()],
        };
        let mut out = Vec::new();
        write_output(&mut out, &list, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["devices"][0]["identifier"], "MLU-ab");
    }

    #[test]
    fn test_device_list_table() {
        let list = DeviceList {
            devices: vec![entry()],
        };
        let table = list.to_table();
        assert!(table.contains("MLU Cards Found: 1"));
        assert!(table.contains("[0] MLU-ab (/dev/cambricon_dev0)"));
        assert_eq!(list.to_compact(), "0:MLU-ab");
    }

    #[test]
    fn test_info_compact() {
        let info = DeviceInfoOutput {
            device: entry(),
            memory: MemorySnapshot::from_usage(4 * 1024 * 1024, 1024 * 1024).unwrap(),
            utilization: Utilization::new(12),
        };
        assert_eq!(info.to_compact(), "MLU 0: 1/4 MB, 12%");
    }

    #[test]
    fn test_process_list_empty() {
        let output = ProcessListOutput {
            device: entry(),
            process_count: 0,
            total_memory_mb: 0,
            processes: vec![],
            slots: None,
        };
        assert!(output.to_table().contains("No processes running"));
        assert_eq!(output.to_compact(), "MLU 0: No processes");
    }

    #[test]
    fn test_process_list_json_skips_slots() {
        let output = ProcessListOutput {
            device: entry(),
            process_count: 1,
            total_memory_mb: 2,
            processes: vec![ProcessRecord {
                pid: 10,
                name: "train".to_string(),
                memory_used_mb: 2,
            }],
            slots: None,
        };
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"train\""));
        assert!(!json.contains("slots"));
    }
}
