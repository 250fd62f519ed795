//! # touchmap-core
//!
//! Shared library for touchmap containing the display and input-device
//! report grammar, the touch-display selection heuristic, and the coordinate
//! transformation matrix calculator.
//!
//! This crate has zero dependencies on process spawning, file I/O, or the X
//! server.  Everything here operates on text that someone else produced.
//!
//! # Architecture overview (for beginners)
//!
//! A touch panel attached to a multi-monitor X11 desktop reports coordinates
//! in its own native range.  Left alone, the X server stretches that range
//! across the *whole* virtual screen, so touching the panel's left edge moves
//! the cursor to the left edge of a different monitor.  Fixing that takes
//! three pieces of knowledge:
//!
//! - **`report::xrandr`** – Where each connected monitor lives inside the
//!   virtual screen (`HDMI-1 connected 1920x1080+1920+0`), and how large the
//!   virtual screen is (`current 3840 x 1080`).
//!
//! - **`report::xinput`** – Which input devices are touch digitizers and what
//!   their X device ids are.
//!
//! - **`domain`** – Pure decision logic: pick the touch monitor, then build
//!   the 3×3 matrix that squeezes the digitizer's range onto just that
//!   monitor's rectangle.

pub mod domain;
pub mod report;

// Re-export the most-used types at the crate root so callers can write
// `touchmap_core::DisplayRecord` instead of the full module path.
pub use domain::device::{mapping_candidates, DeviceRole, TouchDevice};
pub use domain::display::{DisplayRecord, Geometry, Orientation, VirtualScreen};
pub use domain::selection::{find_display, select_touch_display, SelectionError};
pub use domain::transform::{compute_transform, TransformError, TransformMatrix};
pub use report::xinput::{
    parse_devices_matching, parse_touch_devices, DeviceFilter, DEFAULT_TOUCH_TOKEN,
};
pub use report::xrandr::{parse_displays, parse_geometry, parse_screen_size};
pub use report::ReportError;
