//! Domain entities for touchmap.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies.  Nothing in here spawns a process or reads a file; the report
//! text arrives already captured, and the resulting matrix leaves as a plain
//! value.
//!
//! - **`display`** – A connected monitor and the virtual screen it lives in.
//! - **`device`** – A touch-capable input device from the inventory report.
//! - **`selection`** – The landscape heuristic that picks the touch monitor.
//! - **`transform`** – The normalized scale/offset matrix calculation.

pub mod device;
pub mod display;
pub mod selection;
pub mod transform;
