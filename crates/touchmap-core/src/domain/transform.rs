//! Coordinate transformation matrix calculation.
//!
//! The X input subsystem multiplies every absolute touch coordinate
//! (normalized to `0.0..=1.0` over the whole virtual screen) by a 3×3 affine
//! matrix.  Confining a digitizer to one monitor means scaling its range down
//! to that monitor's share of the virtual screen and shifting it to the
//! monitor's offset:
//!
//! ```text
//! ┌ scale_x   0       offset_x ┐
//! │ 0         scale_y offset_y │
//! └ 0         0       1        ┘
//! ```
//!
//! A sign error or swapped axis here silently breaks the touchscreen, so this
//! module is kept pure: identical inputs always produce bit-identical output.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::display::DisplayRecord;

/// Errors produced by the matrix calculator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransformError {
    /// The virtual screen has a zero, negative, or non-finite dimension.
    #[error("degenerate virtual screen {width}x{height}: both dimensions must be positive")]
    DegenerateScreen { width: f64, height: f64 },

    /// The target display has a zero dimension, which would collapse the
    /// digitizer onto a line.
    #[error("degenerate target display {port}: width and height must be non-zero")]
    DegenerateDisplay { port: String },
}

/// Normalized scale/offset transform confining a digitizer to one display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl TransformMatrix {
    /// Returns the nine matrix entries in row-major order.
    pub fn rows(&self) -> [f64; 9] {
        [
            self.scale_x,
            0.0,
            self.offset_x,
            0.0,
            self.scale_y,
            self.offset_y,
            0.0,
            0.0,
            1.0,
        ]
    }
}

impl fmt::Display for TransformMatrix {
    /// Renders the row-major property value, e.g. `0.5 0 0.5 0 1 0 0 0 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        for (i, value) in rows.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Computes the transform that maps a digitizer onto `target` inside a
/// virtual screen of `total_width` × `total_height` pixels.
///
/// # Errors
///
/// Returns [`TransformError::DegenerateScreen`] if either total dimension is
/// not a positive finite number, and [`TransformError::DegenerateDisplay`] if
/// the target has a zero width or height.
pub fn compute_transform(
    target: &DisplayRecord,
    total_width: f64,
    total_height: f64,
) -> Result<TransformMatrix, TransformError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(total_width) || !valid(total_height) {
        return Err(TransformError::DegenerateScreen {
            width: total_width,
            height: total_height,
        });
    }
    if target.width == 0 || target.height == 0 {
        return Err(TransformError::DegenerateDisplay {
            port: target.port.clone(),
        });
    }

    Ok(TransformMatrix {
        scale_x: f64::from(target.width) / total_width,
        scale_y: f64::from(target.height) / total_height,
        offset_x: f64::from(target.x) / total_width,
        offset_y: f64::from(target.y) / total_height,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
