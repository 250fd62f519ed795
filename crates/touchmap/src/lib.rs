//! touchmap library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does touchmap do? (for beginners)
//!
//! On an X11 desktop with several monitors, a touchscreen's digitizer is by
//! default stretched across the whole virtual screen.  touchmap fixes that in
//! one pass:
//!
//! 1. Asks `xrandr` which outputs are connected and where they sit.
//! 2. Picks the touch monitor: the landscape one, or the configured output.
//! 3. Asks `xinput` which input devices look like touch digitizers.
//! 4. For each pointer-role digitizer, binds it to that output and writes a
//!    coordinate transformation matrix confining it to the monitor's
//!    rectangle.
//!
//! A failure while detecting stops the pass before any device is touched.  A
//! failure on one device is reported and the remaining devices are still
//! mapped.

/// Application layer: detection and mapping use cases, and the gateway port.
pub mod application;

/// Infrastructure layer: external tool gateways and configuration storage.
pub mod infrastructure;
