//! CommandGateway: the boundary to the display and input-device tools.
//!
//! The use cases never build command lines.  They ask for a report by
//! [`ReportQuery`] and write device properties by [`DeviceProperty`]; the
//! infrastructure layer decides which program and which arguments that means.

use std::fmt;

use thiserror::Error;
use touchmap_core::TransformMatrix;

/// Name of the X input property holding a device's coordinate transform.
pub const TRANSFORM_PROPERTY: &str = "Coordinate Transformation Matrix";

/// Error type for gateway operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The external tool could not be started or could not reach the display
    /// server.
    #[error("{tool} is unavailable: {reason}")]
    ExternalToolUnavailable { tool: String, reason: String },

    /// The input subsystem does not know the device id.
    #[error("device {device_id} not found")]
    DeviceNotFound { device_id: u32 },

    /// The tool ran but exited unsuccessfully for another reason.
    #[error("{tool} failed ({status}): {stderr}")]
    CommandFailed {
        tool: String,
        status: String,
        stderr: String,
    },
}

/// The text reports the core consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportQuery {
    /// Connected outputs and the virtual screen size.
    DisplayTopology,
    /// The input device inventory.
    InputDevices,
}

impl fmt::Display for ReportQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayTopology => f.write_str("display topology"),
            Self::InputDevices => f.write_str("input devices"),
        }
    }
}

/// A property write applied to one input device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceProperty {
    /// Bind the device to the named output.
    MapToOutput(String),
    /// Replace the device's coordinate transformation matrix.
    CoordinateTransform(TransformMatrix),
}

impl DeviceProperty {
    /// Short name of the property, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MapToOutput(_) => "output",
            Self::CoordinateTransform(_) => TRANSFORM_PROPERTY,
        }
    }

    /// The value as the input tool expects it.
    pub fn value(&self) -> String {
        match self {
            Self::MapToOutput(port) => port.clone(),
            Self::CoordinateTransform(matrix) => matrix.to_string(),
        }
    }
}

/// Side-effecting boundary to the display and input subsystem.
///
/// Calls block until the external tool returns; there is no internal
/// timeout.  Failures are returned, never retried.
#[cfg_attr(test, mockall::automock)]
pub trait CommandGateway: Send + Sync {
    /// Runs the query and returns the tool's textual output.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ExternalToolUnavailable`] if the tool cannot be
    /// run, or [`GatewayError::CommandFailed`] if it exits unsuccessfully.
    fn query(&self, query: ReportQuery) -> Result<String, GatewayError>;

    /// Writes one property on one device.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DeviceNotFound`] if the device id is unknown,
    /// or another [`GatewayError`] if the tool fails.
    fn apply_device_property(
        &self,
        device_id: u32,
        property: &DeviceProperty,
    ) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_property_renders_row_major_value() {
        let property = DeviceProperty::CoordinateTransform(TransformMatrix {
            scale_x: 0.5,
            scale_y: 1.0,
            offset_x: 0.5,
            offset_y: 0.0,
        });

        assert_eq!(property.name(), "Coordinate Transformation Matrix");
        assert_eq!(property.value(), "0.5 0 0.5 0 1 0 0 0 1");
    }

    #[test]
    fn test_map_to_output_value_is_port_name() {
        let property = DeviceProperty::MapToOutput("HDMI-1".to_string());
        assert_eq!(property.name(), "output");
        assert_eq!(property.value(), "HDMI-1");
    }
}
