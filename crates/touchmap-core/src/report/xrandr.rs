//! Display topology report grammar (`xrandr` query output).
//!
//! Shapes recognised:
//!
//! ```text
//! Screen 0: minimum 320 x 200, current 3000 x 1920, maximum 16384 x 16384
//! DP-1 connected primary 1080x1920+0+0 left (normal left inverted right x axis y axis) 527mm x 296mm
//! HDMI-1 connected 1920x1080+1080+0 (normal left inverted right x axis y axis) 344mm x 194mm
//! HDMI-2 disconnected (normal left inverted right x axis y axis)
//!    1920x1080     60.00*+  50.00    59.94
//! ```
//!
//! An output line is `PORT connected [primary] WxH+X+Y [left] ...`.  For the
//! `left` shape the report already lists the rotated width and height, so the
//! numbers are kept as reported.  An output that is connected but has no
//! geometry token (no active mode) yields no record.

use tracing::debug;

use super::ReportError;
use crate::domain::display::{DisplayRecord, Geometry, Orientation, VirtualScreen};

const CONNECTED: &str = "connected";
const PRIMARY: &str = "primary";
const LEFT: &str = "left";
const CURRENT: &str = "current";

/// Parses every connected, active output in report order.
///
/// # Errors
///
/// Returns [`ReportError`] if a geometry token on a connected output line is
/// malformed or a number overflows.
pub fn parse_displays(report: &str) -> Result<Vec<DisplayRecord>, ReportError> {
    let mut displays = Vec::new();
    for (index, line) in report.lines().enumerate() {
        if let Some(record) = parse_output_line(line, index + 1)? {
            debug!("matched output {record}");
            displays.push(record);
        }
    }
    Ok(displays)
}

/// Parses the `current W x H` phrase giving the virtual screen size.
///
/// Returns `Ok(None)` when no such phrase is present.
///
/// # Errors
///
/// Returns [`ReportError`] if the phrase is present but its numbers are
/// malformed.
pub fn parse_screen_size(report: &str) -> Result<Option<VirtualScreen>, ReportError> {
    for (index, line) in report.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        for window in tokens.windows(4) {
            if window[0] != CURRENT || !starts_with_digit(window[1]) {
                continue;
            }
            if window[2] != "x" {
                return Err(ReportError::MalformedGeometry {
                    line: line_no,
                    token: window[1..].join(" "),
                });
            }
            let width = parse_number(window[1], line_no)?;
            let height = parse_number(window[3].trim_end_matches(','), line_no)?;
            return Ok(Some(VirtualScreen::new(width, height)));
        }
    }
    Ok(None)
}

/// Parses a standalone `WxH+X+Y` token.
///
/// Errors are reported against line 1.
///
/// # Errors
///
/// Returns [`ReportError::MalformedGeometry`] for a token of the wrong shape
/// and [`ReportError::InvalidNumber`] for a bad number.
pub fn parse_geometry(token: &str) -> Result<Geometry, ReportError> {
    parse_geometry_at(token, 1)
}

fn parse_output_line(line: &str, line_no: usize) -> Result<Option<DisplayRecord>, ReportError> {
    let mut tokens = line.split_whitespace();
    let Some(port) = tokens.next() else {
        return Ok(None);
    };
    if tokens.next() != Some(CONNECTED) {
        return Ok(None);
    }

    let mut next = tokens.next();
    let primary = next == Some(PRIMARY);
    if primary {
        next = tokens.next();
    }

    let Some(geometry_token) = next.filter(|t| starts_with_digit(t)) else {
        debug!(line = line_no, "output {port} connected without an active mode; skipped");
        return Ok(None);
    };
    let geometry = parse_geometry_at(geometry_token, line_no)?;
    let orientation = if tokens.next() == Some(LEFT) {
        Orientation::Left
    } else {
        Orientation::Normal
    };

    Ok(Some(DisplayRecord {
        port: port.to_string(),
        width: geometry.width,
        height: geometry.height,
        x: geometry.x,
        y: geometry.y,
        primary,
        orientation,
    }))
}

fn parse_geometry_at(token: &str, line_no: usize) -> Result<Geometry, ReportError> {
    let malformed = || ReportError::MalformedGeometry {
        line: line_no,
        token: token.to_string(),
    };

    let mut parts = token.split('+');
    let size = parts.next().ok_or_else(malformed)?;
    let x = parts.next().ok_or_else(malformed)?;
    let y = parts.next().ok_or_else(malformed)?;
    if parts.next().is_some() {
        return Err(malformed());
    }
    let (width, height) = size.split_once('x').ok_or_else(malformed)?;

    Ok(Geometry {
        width: parse_number(width, line_no)?,
        height: parse_number(height, line_no)?,
        x: parse_number(x, line_no)?,
        y: parse_number(y, line_no)?,
    })
}

fn parse_number<T: std::str::FromStr>(token: &str, line_no: usize) -> Result<T, ReportError> {
    token.parse().map_err(|_| ReportError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    })
}

fn starts_with_digit(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PORTRAIT_PLUS_PANEL: &str = "\
Screen 0: minimum 320 x 200, current 3000 x 1920, maximum 16384 x 16384
DP-1 connected primary 1080x1920+0+0 left (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  50.00    59.94
HDMI-1 connected 1920x1080+1080+0 (normal left inverted right x axis y axis) 344mm x 194mm
   1920x1080     60.00*+
HDMI-2 disconnected (normal left inverted right x axis y axis)
DP-2 connected (normal left inverted right x axis y axis)
";

    // ── parse_displays ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_displays_reads_connected_outputs_in_report_order() {
        // Act
        let displays = parse_displays(PORTRAIT_PLUS_PANEL).expect("parse");

        // Assert
        let ports: Vec<&str> = displays.iter().map(|d| d.port.as_str()).collect();
        assert_eq!(ports, vec!["DP-1", "HDMI-1"]);
    }

    #[test]
    fn test_parse_displays_keeps_left_rotated_dimensions_as_reported() {
        let displays = parse_displays(PORTRAIT_PLUS_PANEL).expect("parse");

        let rotated = &displays[0];
        assert_eq!((rotated.width, rotated.height), (1080, 1920));
        assert_eq!(rotated.orientation, Orientation::Left);
        assert!(rotated.primary);
        assert!(!rotated.is_landscape());
    }

    fn record(port: &str, width: u32, height: u32, x: i32, y: i32) -> DisplayRecord {
        DisplayRecord::new(port, Geometry { width, height, x, y })
    }

    #[test]
    fn test_parse_displays_line_shapes() {
        // (line, expected record or None)
        let cases: Vec<(&str, Option<DisplayRecord>)> = vec![
            (
                "HDMI-1 connected 1920x1080+1920+0 (normal left) 0mm x 0mm",
                Some(record("HDMI-1", 1920, 1080, 1920, 0)),
            ),
            (
                "eDP-1 connected primary 2560x1440+0+0 (normal left) 309mm x 174mm",
                Some(DisplayRecord {
                    primary: true,
                    ..record("eDP-1", 2560, 1440, 0, 0)
                }),
            ),
            (
                "DP-3 connected 1200x1920+2560+0 left (normal left) 0mm x 0mm",
                Some(DisplayRecord {
                    orientation: Orientation::Left,
                    ..record("DP-3", 1200, 1920, 2560, 0)
                }),
            ),
            (
                "DP-4 connected 1920x1080+0+1080 right (normal left) 0mm x 0mm",
                Some(record("DP-4", 1920, 1080, 0, 1080)),
            ),
            ("HDMI-2 disconnected (normal left inverted right x axis y axis)", None),
            ("DP-2 connected (normal left inverted right x axis y axis)", None),
            ("DP-2 connected primary (normal left inverted right x axis y axis)", None),
            ("   1920x1080     60.00*+  50.00", None),
            ("Screen 0: minimum 320 x 200, current 3840 x 1080", None),
            ("", None),
        ];

        for (line, expected) in cases {
            let parsed = parse_displays(line).expect("parse");
            assert_eq!(parsed.into_iter().next(), expected, "line: {line:?}");
        }
    }

    #[test]
    fn test_parse_displays_empty_report_yields_no_records() {
        assert!(parse_displays("").expect("parse").is_empty());
    }

    #[test]
    fn test_parse_displays_malformed_number_fails_whole_parse() {
        let report = "HDMI-1 connected 1920x1080+0+0\nDP-1 connected 19a0x1080+1920+0\n";

        let result = parse_displays(report);

        assert_eq!(
            result,
            Err(ReportError::InvalidNumber {
                line: 2,
                token: "19a0".to_string()
            })
        );
    }

    #[test]
    fn test_parse_displays_overflowing_width_fails() {
        let result = parse_displays("HDMI-1 connected 99999999999x1080+0+0");
        assert!(matches!(result, Err(ReportError::InvalidNumber { line: 1, .. })));
    }

    #[test]
    fn test_parse_displays_geometry_without_offsets_is_malformed() {
        let result = parse_displays("HDMI-1 connected 1920x1080 (normal)");
        assert_eq!(
            result,
            Err(ReportError::MalformedGeometry {
                line: 1,
                token: "1920x1080".to_string()
            })
        );
    }

    // ── parse_geometry ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_geometry_accepts_negative_offsets() {
        let geometry = parse_geometry("1920x1080+-1920+0").expect("parse");
        assert_eq!(
            geometry,
            Geometry {
                width: 1920,
                height: 1080,
                x: -1920,
                y: 0
            }
        );
    }

    #[test]
    fn test_parse_geometry_rejects_bad_shapes() {
        for token in ["1920x1080", "1920+0+0", "1920x1080+0+0+0", "1920x1080+0"] {
            assert!(
                matches!(
                    parse_geometry(token),
                    Err(ReportError::MalformedGeometry { .. })
                ),
                "token: {token}"
            );
        }
        assert!(matches!(
            parse_geometry("1920x+0+0"),
            Err(ReportError::InvalidNumber { .. })
        ));
    }

    // ── parse_screen_size ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_screen_size_reads_current_dimensions() {
        let screen = parse_screen_size(PORTRAIT_PLUS_PANEL).expect("parse");
        assert_eq!(screen, Some(VirtualScreen::new(3000, 1920)));
    }

    #[test]
    fn test_parse_screen_size_absent_returns_none() {
        let report = "HDMI-1 connected 1920x1080+0+0\n";
        assert_eq!(parse_screen_size(report).expect("parse"), None);
    }

    #[test]
    fn test_parse_screen_size_malformed_number_is_fatal() {
        let report = "Screen 0: minimum 320 x 200, current 3840 x 10q0, maximum 16384 x 16384";
        assert_eq!(
            parse_screen_size(report),
            Err(ReportError::InvalidNumber {
                line: 1,
                token: "10q0".to_string()
            })
        );
    }
}
