//! Touch-capable input device entity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The slave role an input device plays in the X input hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceRole {
    Pointer,
    Keyboard,
}

impl DeviceRole {
    /// Parses the role word used by the device report (`pointer` / `keyboard`).
    pub fn from_report_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("pointer") {
            Some(Self::Pointer)
        } else if word.eq_ignore_ascii_case("keyboard") {
            Some(Self::Keyboard)
        } else {
            None
        }
    }

    /// The role word as it appears in the device report.
    pub fn as_report_word(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Keyboard => "keyboard",
        }
    }
}

/// One touch-capable entry from the input device inventory.
///
/// Immutable once parsed; lives for a single enumeration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchDevice {
    /// X input device id (unique within one report).
    pub id: u32,
    /// Device name as listed in the report, trimmed.
    pub name: String,
    pub role: DeviceRole,
    /// `true` for the first pointer-role device in ascending id order.
    pub is_main: bool,
}

impl fmt::Display for TouchDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}

/// Sorts `devices` by ascending id and flags the first pointer as main.
pub(crate) fn assign_main_device(devices: &mut [TouchDevice]) {
    devices.sort_by_key(|d| d.id);
    let mut main_assigned = false;
    for device in devices.iter_mut() {
        device.is_main = device.role == DeviceRole::Pointer && !main_assigned;
        if device.is_main {
            main_assigned = true;
        }
    }
}

/// Returns the devices eligible for display mapping: pointer-role entries
/// only, in ascending id order.
pub fn mapping_candidates(devices: &[TouchDevice]) -> Vec<&TouchDevice> {
    let mut pointers: Vec<&TouchDevice> = devices
        .iter()
        .filter(|d| d.role == DeviceRole::Pointer)
        .collect();
    pointers.sort_by_key(|d| d.id);
    pointers
}

// ── Tests ─────────────────────────────────────────────────────────────────────
