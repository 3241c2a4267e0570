//! Card model and device node types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every device identifier
pub const IDENTIFIER_PREFIX: &str = "MLU-";

/// Cambricon card model as reported by the native card-name query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardModel {
    Mlu100,
    Mlu270,
    Mlu220M2,
    Mlu220Edge,
    Mlu220Evb,
    Mlu220M2i,
    Mlu290,
    Mlu270X5k,
    /// A tag this crate does not know about
    Unknown(u32),
}

impl CardModel {
    /// Map a native name tag to a model
    pub fn from_raw(tag: u32) -> Self {
        match tag {
            0 => Self::Mlu100,
            1 => Self::Mlu270,
            16 => Self::Mlu220M2,
            17 => Self::Mlu220Edge,
            18 => Self::Mlu220Evb,
            19 => Self::Mlu220M2i,
            20 => Self::Mlu290,
            21 => Self::Mlu270X5k,
            other => Self::Unknown(other),
        }
    }

    /// Native name tag for this model
    pub fn raw(&self) -> u32 {
        match self {
            Self::Mlu100 => 0,
            Self::Mlu270 => 1,
            Self::Mlu220M2 => 16,
            Self::Mlu220Edge => 17,
            Self::Mlu220Evb => 18,
            Self::Mlu220M2i => 19,
            Self::Mlu290 => 20,
            Self::Mlu270X5k => 21,
            Self::Unknown(tag) => *tag,
        }
    }

    /// Legacy cards use a different device node naming scheme
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Mlu100)
    }

    /// Device node path for a card of this model at `index`
    pub fn device_path(&self, index: u32) -> String {
        if self.is_legacy() {
            format!("/dev/cambricon_c10Dev{}", index)
        } else {
            format!("/dev/cambricon_dev{}", index)
        }
    }
}

impl fmt::Display for CardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mlu100 => write!(f, "MLU100"),
            Self::Mlu270 => write!(f, "MLU270"),
            Self::Mlu220M2 => write!(f, "MLU220-M.2"),
            Self::Mlu220Edge => write!(f, "MLU220-Edge"),
            Self::Mlu220Evb => write!(f, "MLU220-EVB"),
            Self::Mlu220M2i => write!(f, "MLU220-M.2i"),
            Self::Mlu290 => write!(f, "MLU290"),
            Self::Mlu270X5k => write!(f, "MLU270-X5K"),
            Self::Unknown(tag) => write!(f, "Unknown ({})", tag),
        }
    }
}

/// Render a native serial number the way identifiers expect it
///
/// Lowercase hex of the signed value; a zero serial renders as `"0"`.
pub fn format_serial(serial: i64) -> String {
    if serial < 0 {
        format!("-{:x}", serial.unsigned_abs())
    } else {
        format!("{:x}", serial)
    }
}
