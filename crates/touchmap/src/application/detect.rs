//! Detection: turns the two tool reports into a touch target and the devices
//! that should be mapped onto it.
//!
//! Detection is split into a display phase and a device phase so the mapping
//! pass can record progress between them.  Nothing here writes to a device.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use touchmap_core::{
    find_display, mapping_candidates, parse_devices_matching, parse_displays, parse_screen_size,
    select_touch_display, DeviceFilter, DisplayRecord, ReportError, SelectionError, TouchDevice,
    VirtualScreen,
};

use super::gateway::{CommandGateway, GatewayError, ReportQuery};

/// Error type for the detection phases.
///
/// Every variant aborts the whole pass: without a target display or a device
/// there is nothing meaningful to map.
#[derive(Debug, Error)]
pub enum DetectionError {
    /// The tool that produces a report could not be run.
    #[error("failed to query {query}: {source}")]
    Query {
        query: ReportQuery,
        #[source]
        source: GatewayError,
    },

    /// A report line of interest carried malformed data.
    #[error("malformed {query} report: {source}")]
    Report {
        query: ReportQuery,
        #[source]
        source: ReportError,
    },

    /// No usable touch display among the connected outputs.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The inventory contains no pointer-role device passing the filter.
    #[error("no touch device found")]
    NoTouchDeviceFound,

    /// [`MapTouchUseCase::run`](super::map_touch::MapTouchUseCase::run) was
    /// called a second time.
    #[error("the mapping pass has already run")]
    AlreadyRun,
}

/// The phase a [`DetectionError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionPhase {
    Displays,
    Devices,
    Pass,
}

impl DetectionError {
    /// Returns the phase that failed.
    pub fn phase(&self) -> DetectionPhase {
        match self {
            Self::Query { query, .. } | Self::Report { query, .. } => match query {
                ReportQuery::DisplayTopology => DetectionPhase::Displays,
                ReportQuery::InputDevices => DetectionPhase::Devices,
            },
            Self::Selection(_) => DetectionPhase::Displays,
            Self::NoTouchDeviceFound => DetectionPhase::Devices,
            Self::AlreadyRun => DetectionPhase::Pass,
        }
    }

    /// The single human-readable notification shown to the user.
    pub fn notification(&self) -> String {
        match self.phase() {
            DetectionPhase::Displays => {
                format!("Failed to detect a valid display configuration: {self}")
            }
            DetectionPhase::Devices => format!("Failed to detect touch input devices: {self}"),
            DetectionPhase::Pass => format!("Touch mapping not attempted: {self}"),
        }
    }
}

/// Knobs that override the automatic choices.
#[derive(Debug, Clone, Default)]
pub struct DetectionOptions {
    /// Map onto this output instead of applying the landscape heuristic.
    pub target_output: Option<String>,
    /// Which device names count as touch digitizers.
    pub device_filter: DeviceFilter,
    /// Use this virtual screen size instead of the reported one.
    pub screen_override: Option<VirtualScreen>,
}

/// Where the virtual screen size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSource {
    /// The `current W x H` field of the display report.
    Report,
    /// Configuration or command line.
    Override,
    /// Bounding box of the connected outputs; the report had no size line.
    BoundingBox,
}

impl fmt::Display for ScreenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report => f.write_str("reported"),
            Self::Override => f.write_str("override"),
            Self::BoundingBox => f.write_str("bounding box"),
        }
    }
}

/// Result of the display phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayDetection {
    /// Every connected output in report order.
    pub displays: Vec<DisplayRecord>,
    /// The output touches should land on.
    pub target: DisplayRecord,
    pub screen: VirtualScreen,
    pub screen_source: ScreenSource,
}

/// Result of both detection phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    #[serde(flatten)]
    pub displays: DisplayDetection,
    /// Matching devices in ascending id order, keyboard-role entries included.
    pub devices: Vec<TouchDevice>,
}

/// Runs the display phase: query the topology, parse it, choose the target
/// and resolve the virtual screen size.
///
/// # Errors
///
/// Returns [`DetectionError`] if the report cannot be obtained or parsed, or
/// if no target display can be chosen.
pub fn detect_displays(
    gateway: &dyn CommandGateway,
    options: &DetectionOptions,
) -> Result<DisplayDetection, DetectionError> {
    let query = ReportQuery::DisplayTopology;
    let report = gateway
        .query(query)
        .map_err(|source| DetectionError::Query { query, source })?;
    let displays =
        parse_displays(&report).map_err(|source| DetectionError::Report { query, source })?;

    for record in &displays {
        debug!("connected display {record}");
    }
    info!(count = displays.len(), "detected connected displays");

    let target = match options.target_output.as_deref() {
        Some(port) => {
            info!(port, "using configured target output");
            find_display(&displays, port)?
        }
        None => select_touch_display(&displays)?,
    }
    .clone();
    info!("touch display: {target}");

    let (screen, screen_source) = match options.screen_override {
        Some(screen) => (screen, ScreenSource::Override),
        None => match parse_screen_size(&report)
            .map_err(|source| DetectionError::Report { query, source })?
        {
            Some(screen) => (screen, ScreenSource::Report),
            None => {
                let screen = VirtualScreen::bounding(&displays).ok_or(
                    SelectionError::NotEnoughDisplays {
                        found: displays.len(),
                    },
                )?;
                warn!(%screen, "display report has no screen size; using the bounding box");
                (screen, ScreenSource::BoundingBox)
            }
        },
    };
    info!(%screen, source = %screen_source, "virtual screen size");

    Ok(DisplayDetection {
        displays,
        target,
        screen,
        screen_source,
    })
}

/// Runs the device phase: query the inventory and keep the entries passing
/// the configured filter.
///
/// # Errors
///
/// Returns [`DetectionError::NoTouchDeviceFound`] when no pointer-role entry
/// matches, or another [`DetectionError`] if the report cannot be obtained or
/// parsed.
pub fn detect_devices(
    gateway: &dyn CommandGateway,
    options: &DetectionOptions,
) -> Result<Vec<TouchDevice>, DetectionError> {
    let query = ReportQuery::InputDevices;
    let report = gateway
        .query(query)
        .map_err(|source| DetectionError::Query { query, source })?;
    let devices = parse_devices_matching(&report, &options.device_filter)
        .map_err(|source| DetectionError::Report { query, source })?;

    for device in &devices {
        info!(
            role = device.role.as_report_word(),
            main = device.is_main,
            "found touch device {device}"
        );
    }
    if mapping_candidates(&devices).is_empty() {
        error!(filter = ?options.device_filter, "no touch device found");
        return Err(DetectionError::NoTouchDeviceFound);
    }
    Ok(devices)
}

/// Runs both phases without touching any device.
///
/// # Errors
///
/// See [`detect_displays`] and [`detect_devices`].
pub fn detect(
    gateway: &dyn CommandGateway,
    options: &DetectionOptions,
) -> Result<Detection, DetectionError> {
    let displays = detect_displays(gateway, options)?;
    let devices = detect_devices(gateway, options)?;
    Ok(Detection { displays, devices })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
