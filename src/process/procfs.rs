//! procfs-backed process table

use crate::process::ProcessTable;

use std::io;
use std::path::{Path, PathBuf};

/// Default procfs mount point
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Process table reading `<root>/<pid>/comm`
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    /// Process table over a procfs mounted at `root`
    ///
    /// Agents running in a container usually see the host table through a
    /// bind mount such as `/host/proc`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn comm_path(&self, pid: u32) -> PathBuf {
        self.root.join(pid.to_string()).join("comm")
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcessTable for ProcFs {
    fn read_name(&self, pid: u32) -> io::Result<String> {
        // Executable names are arbitrary bytes.
        let raw = std::fs::read(self.comm_path(pid))?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}
