//! Touch display selection.
//!
//! The deployment this heuristic was written for pairs a portrait main
//! monitor with a secondary landscape touch panel, so "the landscape one" is
//! the touch target.  When several displays are landscape the first in report
//! order wins; there is deliberately no tie-break on position or the
//! `primary` flag.

use thiserror::Error;
use tracing::{debug, warn};

use super::display::DisplayRecord;

/// Minimum number of connected displays for auto-detection.
pub const MIN_DISPLAYS: usize = 2;

/// Errors that can occur when choosing the touch display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Fewer than [`MIN_DISPLAYS`] outputs are connected.
    #[error("not enough displays detected: found {found}, need at least {MIN_DISPLAYS}")]
    NotEnoughDisplays { found: usize },

    /// No connected output is wider than it is tall.
    #[error("no landscape display detected")]
    NoLandscapeDisplay,

    /// A configured target output is not among the connected outputs.
    #[error("output {port} is not connected")]
    UnknownOutput { port: String },
}

/// Chooses the touch target among `displays` using the landscape heuristic.
///
/// # Errors
///
/// Returns [`SelectionError::NotEnoughDisplays`] for fewer than two records
/// and [`SelectionError::NoLandscapeDisplay`] when none is landscape.
pub fn select_touch_display(displays: &[DisplayRecord]) -> Result<&DisplayRecord, SelectionError> {
    if displays.len() < MIN_DISPLAYS {
        return Err(SelectionError::NotEnoughDisplays {
            found: displays.len(),
        });
    }

    let mut landscape = displays.iter().filter(|d| d.is_landscape());
    let selected = landscape.next().ok_or(SelectionError::NoLandscapeDisplay)?;

    let others: Vec<&str> = landscape.map(|d| d.port.as_str()).collect();
    if !others.is_empty() {
        warn!(
            selected = %selected.port,
            ignored = ?others,
            "multiple landscape displays; using the first in report order"
        );
    }
    debug!("selected touch display {selected}");
    Ok(selected)
}

/// Looks up a display by port name, bypassing the landscape heuristic.
///
/// # Errors
///
/// Returns [`SelectionError::UnknownOutput`] if no record has that port.
pub fn find_display<'a>(
    displays: &'a [DisplayRecord],
    port: &str,
) -> Result<&'a DisplayRecord, SelectionError> {
    displays
        .iter()
        .find(|d| d.port == port)
        .ok_or_else(|| SelectionError::UnknownOutput {
            port: port.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
