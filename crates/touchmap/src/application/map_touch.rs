//! MapTouchUseCase: one complete detect-and-map pass.
//!
//! The pass moves through a fixed sequence of states:
//!
//! ```text
//! Idle ──► DisplaysDetected ──► DevicesDetected ──► MappedDevice* ──► Done
//!   │              │                    │
//!   └──────────────┴────────────────────┴──► Failed(reason)
//! ```
//!
//! A detection failure aborts the pass before any device is touched.  Once
//! devices are known, each one is mapped independently: a failure on one
//! device is recorded in its [`DeviceOutcome`] and the pass moves on to the
//! next.  Within a single device, the coordinate transform is only written
//! after the output binding succeeded.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use touchmap_core::{
    mapping_candidates, DisplayRecord, TouchDevice, TransformError, TransformMatrix, VirtualScreen,
};

use super::detect::{detect_devices, detect_displays, DetectionError, DetectionOptions};
use super::gateway::{CommandGateway, DeviceProperty, GatewayError};

/// Why mapping a single device failed.
#[derive(Debug, Error)]
pub enum MappingError {
    /// No matrix could be computed for the target display.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Binding the device to the output failed; no transform was written.
    #[error("mapping device {device_id} to output {port} failed: {source}")]
    MapToOutput {
        device_id: u32,
        port: String,
        #[source]
        source: GatewayError,
    },

    /// Writing the coordinate transformation matrix failed.
    #[error("writing the transform for device {device_id} failed: {source}")]
    WriteTransform {
        device_id: u32,
        #[source]
        source: GatewayError,
    },
}

/// Progress of a mapping pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassState {
    Idle,
    DisplaysDetected,
    DevicesDetected,
    /// The device with this id has been attempted (successfully or not).
    MappedDevice { device_id: u32 },
    Done,
    Failed(String),
}

/// What happened to one device.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub device: TouchDevice,
    /// The matrix that was written, or why the device was left alone.
    pub result: Result<TransformMatrix, MappingError>,
}

impl DeviceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of a finished pass.
#[derive(Debug)]
pub struct MappingReport {
    pub target: DisplayRecord,
    pub screen: VirtualScreen,
    /// Every matching device, keyboard-role entries included.
    pub devices: Vec<TouchDevice>,
    /// One outcome per pointer-role device, in ascending id order.
    pub outcomes: Vec<DeviceOutcome>,
}

impl MappingReport {
    /// Returns `true` when every attempted device was mapped.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(DeviceOutcome::is_success)
    }

    /// Iterates over the devices that could not be mapped.
    pub fn failures(&self) -> impl Iterator<Item = &DeviceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// The Map Touch use case.
///
/// Owns the gateway for the duration of the pass.  A use case instance runs
/// at most once; build a new one for the next pass.
pub struct MapTouchUseCase {
    gateway: Arc<dyn CommandGateway>,
    options: DetectionOptions,
    state: PassState,
}

impl MapTouchUseCase {
    /// Creates an idle pass over `gateway`.
    pub fn new(gateway: Arc<dyn CommandGateway>, options: DetectionOptions) -> Self {
        Self {
            gateway,
            options,
            state: PassState::Idle,
        }
    }

    /// Returns the current pass state.
    pub fn state(&self) -> &PassState {
        &self.state
    }

    /// Runs detection and maps every pointer-role touch device onto the
    /// chosen display.
    ///
    /// Per-device failures do not make this return `Err`; inspect
    /// [`MappingReport::outcomes`].
    ///
    /// # Errors
    ///
    /// Returns [`DetectionError`] if detection fails, or
    /// [`DetectionError::AlreadyRun`] if this pass is not idle.
    pub fn run(&mut self) -> Result<MappingReport, DetectionError> {
        if self.state != PassState::Idle {
            warn!(state = ?self.state, "mapping pass already ran");
            return Err(DetectionError::AlreadyRun);
        }

        let displays = match detect_displays(self.gateway.as_ref(), &self.options) {
            Ok(displays) => displays,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = PassState::DisplaysDetected;

        let devices = match detect_devices(self.gateway.as_ref(), &self.options) {
            Ok(devices) => devices,
            Err(e) => return Err(self.fail(e)),
        };
        self.state = PassState::DevicesDetected;

        let mut outcomes = Vec::new();
        for device in mapping_candidates(&devices) {
            let result = self.map_device(device, &displays.target, displays.screen);
            match &result {
                Ok(matrix) => info!(
                    output = %displays.target.port,
                    "mapped {device} with transform [{matrix}]"
                ),
                Err(e) => error!("failed to map {device}: {e}"),
            }
            outcomes.push(DeviceOutcome {
                device: device.clone(),
                result,
            });
            self.state = PassState::MappedDevice {
                device_id: device.id,
            };
        }

        self.state = PassState::Done;
        Ok(MappingReport {
            target: displays.target,
            screen: displays.screen,
            devices,
            outcomes,
        })
    }

    fn map_device(
        &self,
        device: &TouchDevice,
        target: &DisplayRecord,
        screen: VirtualScreen,
    ) -> Result<TransformMatrix, MappingError> {
        let matrix = screen.transform_for(target)?;

        self.gateway
            .apply_device_property(device.id, &DeviceProperty::MapToOutput(target.port.clone()))
            .map_err(|source| MappingError::MapToOutput {
                device_id: device.id,
                port: target.port.clone(),
                source,
            })?;

        self.gateway
            .apply_device_property(device.id, &DeviceProperty::CoordinateTransform(matrix))
            .map_err(|source| MappingError::WriteTransform {
                device_id: device.id,
                source,
            })?;

        Ok(matrix)
    }

    fn fail(&mut self, err: DetectionError) -> DetectionError {
        error!("{}", err.notification());
        self.state = PassState::Failed(err.to_string());
        err
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
