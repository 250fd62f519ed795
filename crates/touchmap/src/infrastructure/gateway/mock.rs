//! Mock command gateway for tests.
//!
//! # Why a mock gateway?
//!
//! The real gateway spawns `xrandr` and `xinput`, which:
//!
//! - Need a running X server and real hardware.
//! - Actually rewire the test machine's touchscreen.
//! - Produce output that differs from one machine to the next.
//!
//! `MockGateway` replaces all of that with canned report text and in-memory
//! recording.  Each property write is pushed into a `Mutex<Vec<...>>` so test
//! assertions can inspect exactly what was written and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let gateway = Arc::new(MockGateway::portrait_with_touch_panel());
//! let mut use_case = MapTouchUseCase::new(gateway.clone(), DetectionOptions::default());
//!
//! use_case.run().unwrap();
//!
//! assert_eq!(gateway.writes().len(), 2);
//! ```
//!
//! # Injected failures
//!
//! [`MockGateway::with_missing_device`] makes every write to that id fail
//! with `DeviceNotFound`; [`MockGateway::with_unavailable_query`] makes that
//! report fail with `ExternalToolUnavailable`.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::application::gateway::{CommandGateway, DeviceProperty, GatewayError, ReportQuery};

/// Portrait main display on the left, landscape touch panel to its right.
pub const PORTRAIT_WITH_PANEL_TOPOLOGY: &str = "\
Screen 0: minimum 320 x 200, current 3000 x 1920, maximum 16384 x 16384
DP-1 connected primary 1080x1920+0+0 left (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  59.94    50.00
HDMI-1 connected 1920x1080+1080+0 (normal left inverted right x axis y axis) 476mm x 268mm
   1920x1080     60.00*+  50.00    59.94
HDMI-2 disconnected (normal left inverted right x axis y axis)
";

/// One touch panel exposing a pointer and a keyboard interface.
pub const TOUCH_PANEL_INVENTORY: &str = "\
⎡ Virtual core pointer                    \tid=2\t[master pointer  (3)]
⎜   ↳ Virtual core XTEST pointer              \tid=4\t[slave  pointer  (2)]
⎜   ↳ ILITEK ILITEK-TOUCH                     \tid=10\t[slave  pointer  (2)]
⎣ Virtual core keyboard                   \tid=3\t[master keyboard (2)]
    ↳ Virtual core XTEST keyboard             \tid=5\t[slave  keyboard (3)]
    ↳ ILITEK ILITEK-TOUCH                     \tid=11\t[slave  keyboard (3)]
";

/// A gateway that serves fixed reports and records writes.
///
/// All records are stored in `Mutex` fields so tests can share the gateway
/// across threads (e.g., when wrapping it in an `Arc`).
#[derive(Debug, Default)]
pub struct MockGateway {
    display_report: String,
    device_report: String,
    unavailable: HashSet<ReportQuery>,
    missing_devices: HashSet<u32>,
    queries: Mutex<Vec<ReportQuery>>,
    writes: Mutex<Vec<(u32, DeviceProperty)>>,
}

impl MockGateway {
    /// Creates a gateway serving the given display and device reports.
    pub fn new(display_report: impl Into<String>, device_report: impl Into<String>) -> Self {
        Self {
            display_report: display_report.into(),
            device_report: device_report.into(),
            ..Self::default()
        }
    }

    /// A portrait monitor plus a 1920x1080 touch panel with device id 10.
    pub fn portrait_with_touch_panel() -> Self {
        Self::new(PORTRAIT_WITH_PANEL_TOPOLOGY, TOUCH_PANEL_INVENTORY)
    }

    /// Makes every write to `device_id` fail with `DeviceNotFound`.
    pub fn with_missing_device(mut self, device_id: u32) -> Self {
        self.missing_devices.insert(device_id);
        self
    }

    /// Makes `query` fail with `ExternalToolUnavailable`.
    pub fn with_unavailable_query(mut self, query: ReportQuery) -> Self {
        self.unavailable.insert(query);
        self
    }

    /// Returns a copy of every successful write, in order.
    pub fn writes(&self) -> Vec<(u32, DeviceProperty)> {
        self.writes
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    /// Returns a copy of every query served or refused, in order.
    pub fn queries(&self) -> Vec<ReportQuery> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl CommandGateway for MockGateway {
    fn query(&self, query: ReportQuery) -> Result<String, GatewayError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query);
        }
        if self.unavailable.contains(&query) {
            return Err(GatewayError::ExternalToolUnavailable {
                tool: match query {
                    ReportQuery::DisplayTopology => "xrandr".to_string(),
                    ReportQuery::InputDevices => "xinput".to_string(),
                },
                reason: "mock: tool unavailable".to_string(),
            });
        }
        Ok(match query {
            ReportQuery::DisplayTopology => self.display_report.clone(),
            ReportQuery::InputDevices => self.device_report.clone(),
        })
    }

    fn apply_device_property(
        &self,
        device_id: u32,
        property: &DeviceProperty,
    ) -> Result<(), GatewayError> {
        if self.missing_devices.contains(&device_id) {
            return Err(GatewayError::DeviceNotFound { device_id });
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((device_id, property.clone()));
        }
        Ok(())
    }
}
