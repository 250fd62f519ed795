//! Input device inventory grammar (`xinput list` output).
//!
//! ```text
//! ⎡ Virtual core pointer                          id=2    [master pointer  (3)]
//! ⎜   ↳ Virtual core XTEST pointer                id=4    [slave  pointer  (2)]
//! ⎜   ↳ ILITEK ILITEK-TOUCH                       id=10   [slave  pointer  (2)]
//! ⎣ Virtual core keyboard                         id=3    [master keyboard (2)]
//!     ↳ ILITEK ILITEK-TOUCH                       id=11   [slave  keyboard (3)]
//!     ↳ eGalax Inc. eGalaxTouch EXC3000 Pen       id=12   [floating slave]
//! ```
//!
//! A device line carries the `↳` tree marker, the device name, an `id=N`
//! field, and a bracketed role.  Only `[slave pointer ...]` and
//! `[slave keyboard ...]` entries are recognised; master and floating devices
//! are ignored even when their name matches.

use std::collections::HashMap;

use tracing::debug;

use super::ReportError;
use crate::domain::device::{assign_main_device, DeviceRole, TouchDevice};

const TREE_MARKER: char = '↳';
const ID_FIELD: &str = "id=";
const SLAVE: &str = "slave";

/// Default case-insensitive name token identifying touch digitizers.
pub const DEFAULT_TOUCH_TOKEN: &str = "touch";

/// Decides which device names are of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFilter {
    /// Names containing the token, compared case-insensitively.
    TouchToken(String),
    /// Exactly this name, compared case-insensitively.
    Named(String),
}

impl DeviceFilter {
    /// Returns `true` when `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self {
            Self::TouchToken(token) => name.contains(&token.to_lowercase()),
            Self::Named(wanted) => name == wanted.to_lowercase(),
        }
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::TouchToken(DEFAULT_TOUCH_TOKEN.to_string())
    }
}

/// Parses touch-capable pointer and keyboard entries, ordered by ascending id.
///
/// # Errors
///
/// See [`parse_devices_matching`].
pub fn parse_touch_devices(report: &str) -> Result<Vec<TouchDevice>, ReportError> {
    parse_devices_matching(report, &DeviceFilter::default())
}

/// Parses pointer and keyboard entries whose name passes `filter`, ordered by
/// ascending id, with the first pointer flagged as main.
///
/// # Errors
///
/// Returns [`ReportError::InvalidNumber`] for a matching entry whose id is not
/// a valid number, and [`ReportError::DuplicateDeviceId`] if two matching
/// entries share an id.
pub fn parse_devices_matching(
    report: &str,
    filter: &DeviceFilter,
) -> Result<Vec<TouchDevice>, ReportError> {
    let mut devices = Vec::new();
    let mut seen: HashMap<u32, usize> = HashMap::new();

    for (index, line) in report.lines().enumerate() {
        let line_no = index + 1;
        let Some(device) = parse_device_line(line, line_no, filter)? else {
            continue;
        };
        if seen.insert(device.id, line_no).is_some() {
            return Err(ReportError::DuplicateDeviceId {
                line: line_no,
                id: device.id,
            });
        }
        debug!(line = line_no, role = device.role.as_report_word(), "matched device {device}");
        devices.push(device);
    }

    assign_main_device(&mut devices);
    Ok(devices)
}

fn parse_device_line(
    line: &str,
    line_no: usize,
    filter: &DeviceFilter,
) -> Result<Option<TouchDevice>, ReportError> {
    let Some((_, entry)) = line.split_once(TREE_MARKER) else {
        return Ok(None);
    };
    let Some(id_start) = find_id_field(entry) else {
        return Ok(None);
    };

    let name = entry[..id_start].trim();
    if !filter.matches(name) {
        return Ok(None);
    }

    let after_id = &entry[id_start + ID_FIELD.len()..];
    let id_end = after_id.find(char::is_whitespace).unwrap_or(after_id.len());
    let (id_token, tail) = after_id.split_at(id_end);

    let Some(role) = parse_slave_role(tail) else {
        debug!(line = line_no, "device {name:?} is not a pointer/keyboard slave; skipped");
        return Ok(None);
    };
    let id = id_token.parse().map_err(|_| ReportError::InvalidNumber {
        line: line_no,
        token: id_token.to_string(),
    })?;

    Ok(Some(TouchDevice {
        id,
        name: name.to_string(),
        role,
        is_main: false,
    }))
}

/// Byte offset of the last `id=` that starts a whitespace-separated field.
fn find_id_field(entry: &str) -> Option<usize> {
    entry
        .rmatch_indices(ID_FIELD)
        .map(|(i, _)| i)
        .find(|&i| entry[..i].ends_with(char::is_whitespace))
}

/// Reads `[slave pointer ...]` / `[slave keyboard ...]`.
fn parse_slave_role(tail: &str) -> Option<DeviceRole> {
    let bracketed = tail.trim_start().strip_prefix('[')?;
    let mut words = bracketed.split_whitespace();
    if words.next()? != SLAVE {
        return None;
    }
    DeviceRole::from_report_word(words.next()?.trim_end_matches(']'))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::device::mapping_candidates;

    const INVENTORY: &str = "\
⎡ Virtual core pointer                    \tid=2\t[master pointer  (3)]
⎜   ↳ Virtual core XTEST pointer              \tid=4\t[slave  pointer  (2)]
⎜   ↳ Logitech USB Optical Mouse              \tid=9\t[slave  pointer  (2)]
⎜   ↳ ILITEK ILITEK-TOUCH                     \tid=14\t[slave  pointer  (2)]
⎜   ↳ eGalax Inc. eGalaxTouch EXC3000         \tid=10\t[slave  pointer  (2)]
⎣ Virtual core keyboard                   \tid=3\t[master keyboard (2)]
    ↳ Virtual core XTEST keyboard             \tid=5\t[slave  keyboard (3)]
    ↳ ILITEK ILITEK-TOUCH                     \tid=15\t[slave  keyboard (3)]
∼ Wacom Touch Pad                             \tid=20\t[floating slave]
    ↳ Goodix Touchscreen Pen                  \tid=21\t[floating slave]
";

    #[test]
    fn test_parse_touch_devices_orders_by_ascending_id() {
        // Act
        let devices = parse_touch_devices(INVENTORY).expect("parse");

        // Assert
        let ids: Vec<u32> = devices.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![10, 14, 15]);
    }

    #[test]
    fn test_parse_touch_devices_reads_names_and_roles() {
        let devices = parse_touch_devices(INVENTORY).expect("parse");

        assert_eq!(devices[0].name, "eGalax Inc. eGalaxTouch EXC3000");
        assert_eq!(devices[0].role, DeviceRole::Pointer);
        assert_eq!(devices[2].name, "ILITEK ILITEK-TOUCH");
        assert_eq!(devices[2].role, DeviceRole::Keyboard);
    }

    #[test]
    fn test_parse_touch_devices_flags_first_pointer_as_main() {
        let devices = parse_touch_devices(INVENTORY).expect("parse");

        let mains: Vec<bool> = devices.iter().map(|d| d.is_main).collect();
        assert_eq!(mains, vec![true, false, false]);
    }

    #[test]
    fn test_parse_touch_devices_ignores_floating_and_non_touch_entries() {
        let devices = parse_touch_devices(INVENTORY).expect("parse");
        assert!(devices.iter().all(|d| d.id != 20 && d.id != 21 && d.id != 9));
    }

    #[test]
    fn test_keyboard_only_touch_entry_has_no_mapping_candidates() {
        // Arrange
        let report = "    ↳ ILITEK ILITEK-TOUCH    id=11   [slave  keyboard (3)]\n";

        // Act
        let devices = parse_touch_devices(report).expect("parse");

        // Assert
        assert_eq!(devices.len(), 1);
        assert!(!devices[0].is_main);
        assert!(mapping_candidates(&devices).is_empty());
    }

    #[test]
    fn test_parse_touch_devices_empty_report_yields_no_devices() {
        assert!(parse_touch_devices("").expect("parse").is_empty());
    }

    #[test]
    fn test_parse_touch_devices_token_match_is_case_insensitive() {
        let report = "\
    ↳ ELAN TOUCHSCREEN    id=7   [slave  pointer  (2)]
    ↳ elan touchpad       id=8   [slave  pointer  (2)]
";
        let devices = parse_touch_devices(report).expect("parse");
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn test_parse_touch_devices_malformed_id_is_fatal() {
        let report = "    ↳ ILITEK ILITEK-TOUCH    id=1x   [slave  pointer  (2)]\n";
        assert_eq!(
            parse_touch_devices(report),
            Err(ReportError::InvalidNumber {
                line: 1,
                token: "1x".to_string()
            })
        );
    }

    #[test]
    fn test_parse_touch_devices_duplicate_id_is_fatal() {
        let report = "\
    ↳ Touch A    id=10   [slave  pointer  (2)]
    ↳ Touch B    id=10   [slave  pointer  (2)]
";
        assert_eq!(
            parse_touch_devices(report),
            Err(ReportError::DuplicateDeviceId { line: 2, id: 10 })
        );
    }

    #[test]
    fn test_malformed_id_on_non_matching_line_is_ignored() {
        let report = "    ↳ Logitech Mouse    id=zz   [slave  pointer  (2)]\n";
        assert!(parse_touch_devices(report).expect("parse").is_empty());
    }

    #[test]
    fn test_name_containing_id_text_uses_trailing_id_field() {
        let report = "    ↳ Touch uid=3 Panel    id=17   [slave  pointer  (2)]\n";
        let devices = parse_touch_devices(report).expect("parse");
        assert_eq!(devices[0].id, 17);
        assert_eq!(devices[0].name, "Touch uid=3 Panel");
    }

    #[test]
    fn test_named_filter_matches_exact_name_regardless_of_token() {
        let filter = DeviceFilter::Named("wacom intuos pen".to_string());
        let report = "\
    ↳ Wacom Intuos Pen       id=12   [slave  pointer  (2)]
    ↳ Wacom Intuos Pen Pad   id=13   [slave  pointer  (2)]
";
        let devices = parse_devices_matching(report, &filter).expect("parse");
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, 12);
        assert!(devices[0].is_main);
    }
}
