//! Connected display and virtual screen domain entities.
//!
//! The X server lays every active output out inside one large "virtual
//! screen".  Each [`DisplayRecord`] is a rectangle inside that space: its
//! top-left corner is at (`x`, `y`) and it spans `width` × `height` pixels.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::transform::{compute_transform, TransformError, TransformMatrix};

/// The rotation shape carried by a display report line.
///
/// Only the two shapes the report grammar distinguishes are modelled.  For
/// [`Orientation::Left`] the report already lists the rotated (swapped)
/// width and height, so the numbers are stored exactly as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Normal,
    Left,
}

/// A `WxH+X+Y` geometry token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// One connected, active output from the display topology report.
///
/// Immutable once parsed; lives for a single detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// Output port name, e.g. `HDMI-1` or `DP-2`.
    pub port: String,
    /// Width in pixels, as reported.
    pub width: u32,
    /// Height in pixels, as reported.
    pub height: u32,
    /// X offset of the top-left corner inside the virtual screen.
    pub x: i32,
    /// Y offset of the top-left corner inside the virtual screen.
    pub y: i32,
    /// Whether the report flagged this output as `primary`.
    #[serde(default)]
    pub primary: bool,
    /// Rotation shape of the report line.
    #[serde(default)]
    pub orientation: Orientation,
}

impl DisplayRecord {
    /// Creates a non-primary, normally oriented record from a port and geometry.
    pub fn new(port: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            port: port.into(),
            width: geometry.width,
            height: geometry.height,
            x: geometry.x,
            y: geometry.y,
            primary: false,
            orientation: Orientation::Normal,
        }
    }

    /// Returns `true` when the display is wider than it is tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }


    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}x{} at +{}+{}",
            self.port, self.width, self.height, self.x, self.y
        )
    }
}

/// The total addressable area spanning all connected outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualScreen {
    pub width: u32,
    pub height: u32,
}

impl VirtualScreen {
    /// Creates a virtual screen of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Computes the virtual screen as the bounding box of `displays`,
    /// anchored at the origin.
    ///
    /// Returns `None` for an empty slice.
    pub fn bounding(displays: &[DisplayRecord]) -> Option<Self> {
        let right = displays.iter().map(DisplayRecord::right).max()?;
        let bottom = displays.iter().map(DisplayRecord::bottom).max()?;
        Some(Self {
            width: clamp_extent(right),
            height: clamp_extent(bottom),
        })
    }

    /// Computes the coordinate transform that confines a digitizer to `target`.
    ///
    /// # Errors
    ///
    /// See [`compute_transform`].
    pub fn transform_for(&self, target: &DisplayRecord) -> Result<TransformMatrix, TransformError> {
        compute_transform(target, f64::from(self.width), f64::from(self.height))
    }
}

impl fmt::Display for VirtualScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn clamp_extent(extent: i64) -> u32 {
    u32::try_from(extent.max(0)).unwrap_or(u32::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
