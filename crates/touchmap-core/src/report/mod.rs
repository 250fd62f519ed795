//! Text report grammar for the display and input-device tools.
//!
//! Both tools print human-oriented text rather than a structured format, so
//! each parser tokenizes line by line and recognises only the shapes it needs.
//! Lines that do not describe something of interest are skipped; lines that
//! *do* but carry a malformed number fail the whole parse, since a silently
//! dropped display or device would produce a wrong mapping.
//!
//! - **`xrandr`** – connected outputs, their geometry, and the virtual screen
//!   size.
//! - **`xinput`** – touch-capable slave devices and their ids.

pub mod xinput;
pub mod xrandr;

use thiserror::Error;

/// Errors produced while parsing a tool report.
///
/// Every variant carries the 1-based line number of the offending line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A `WxH+X+Y` token does not have that shape.
    #[error("line {line}: malformed geometry token {token:?}")]
    MalformedGeometry { line: usize, token: String },

    /// A numeric field is not a valid number or does not fit its type.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },

    /// Two device entries share the same id.
    #[error("line {line}: duplicate device id {id}")]
    DuplicateDeviceId { line: usize, id: u32 },
}
