//! Shell command gateway: runs `xrandr` and `xinput`.
//!
//! Every invocation is built as an argument vector and spawned directly, never
//! through a shell, so port and device names are passed through verbatim.
//!
//! | Operation                          | Command line                                               |
//! |------------------------------------|------------------------------------------------------------|
//! | `query(DisplayTopology)`           | `xrandr --query`                                           |
//! | `query(InputDevices)`              | `xinput list`                                              |
//! | `MapToOutput(port)`                | `xinput map-to-output ID PORT`                             |
//! | `CoordinateTransform(m)`           | `xinput set-prop ID "Coordinate Transformation Matrix" m…` |
//!
//! Both tools print their complaints on stderr and exit with status 1, so the
//! error kind is recovered from the stderr text.

use std::process::Command;

use tracing::{debug, trace};

use crate::application::gateway::{
    CommandGateway, DeviceProperty, GatewayError, ReportQuery, TRANSFORM_PROPERTY,
};

/// `xinput` message for an id it does not know.
const UNKNOWN_DEVICE_MARKER: &str = "unable to find device";

/// Messages printed when the X server cannot be reached.
const NO_DISPLAY_MARKERS: [&str; 2] = ["can't open display", "unable to connect to x server"];

/// Program names or paths for the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub xrandr: String,
    pub xinput: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            xrandr: "xrandr".to_string(),
            xinput: "xinput".to_string(),
        }
    }
}

/// Gateway backed by the real X11 command-line tools.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandGateway {
    tools: ToolPaths,
}

impl ShellCommandGateway {
    pub fn new(tools: ToolPaths) -> Self {
        Self { tools }
    }

    fn run(&self, tool: &str, args: &[String]) -> Result<String, GatewayError> {
        debug!(tool, ?args, "running external tool");

        let output = Command::new(tool).args(args).output().map_err(|e| {
            GatewayError::ExternalToolUnavailable {
                tool: tool.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(classify_failure(tool, output.status.to_string(), stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(tool, bytes = stdout.len(), "tool output received");
        Ok(stdout)
    }
}

impl CommandGateway for ShellCommandGateway {
    fn query(&self, query: ReportQuery) -> Result<String, GatewayError> {
        match query {
            ReportQuery::DisplayTopology => self.run(&self.tools.xrandr, &["--query".to_string()]),
            ReportQuery::InputDevices => self.run(&self.tools.xinput, &["list".to_string()]),
        }
    }

    fn apply_device_property(
        &self,
        device_id: u32,
        property: &DeviceProperty,
    ) -> Result<(), GatewayError> {
        let args = property_args(device_id, property);
        self.run(&self.tools.xinput, &args)
            .map(|_| ())
            .map_err(|e| match e {
                GatewayError::CommandFailed { ref stderr, .. }
                    if stderr.to_lowercase().contains(UNKNOWN_DEVICE_MARKER) =>
                {
                    GatewayError::DeviceNotFound { device_id }
                }
                other => other,
            })
    }
}

/// Builds the `xinput` argument vector for one property write.
fn property_args(device_id: u32, property: &DeviceProperty) -> Vec<String> {
    match property {
        DeviceProperty::MapToOutput(port) => vec![
            "map-to-output".to_string(),
            device_id.to_string(),
            port.clone(),
        ],
        DeviceProperty::CoordinateTransform(matrix) => {
            let mut args = vec![
                "set-prop".to_string(),
                device_id.to_string(),
                TRANSFORM_PROPERTY.to_string(),
            ];
            args.extend(matrix.rows().iter().map(f64::to_string));
            args
        }
    }
}

fn classify_failure(tool: &str, status: String, stderr: String) -> GatewayError {
    let lowered = stderr.to_lowercase();
    if NO_DISPLAY_MARKERS.iter().any(|m| lowered.contains(m)) {
        return GatewayError::ExternalToolUnavailable {
            tool: tool.to_string(),
            reason: stderr,
        };
    }
    GatewayError::CommandFailed {
        tool: tool.to_string(),
        status,
        stderr,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
