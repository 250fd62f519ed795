//! Property tests for the report grammar and the selection heuristic.
//!
//! Reports are synthesised from known records in the same shape the display
//! and device tools print, then parsed back through the public API.

use proptest::prelude::*;
use touchmap_core::{
    compute_transform, mapping_candidates, parse_displays, parse_screen_size,
    parse_touch_devices, select_touch_display, DeviceRole, DisplayRecord, Orientation,
    SelectionError, TouchDevice, VirtualScreen,
};

// ── Report builders ───────────────────────────────────────────────────────────

fn format_display_report(screen: VirtualScreen, displays: &[DisplayRecord]) -> String {
    let mut report = format!(
        "Screen 0: minimum 320 x 200, current {} x {}, maximum 16384 x 16384\n",
        screen.width, screen.height
    );
    for d in displays {
        let primary = if d.primary { "primary " } else { "" };
        let rotation = match d.orientation {
            Orientation::Normal => "",
            Orientation::Left => "left ",
        };
        report.push_str(&format!(
            "{} connected {primary}{}x{}+{}+{} {rotation}(normal left inverted right x axis y axis) 527mm x 296mm\n",
            d.port, d.width, d.height, d.x, d.y
        ));
        report.push_str(&format!("   {}x{}     60.00*+  59.94\n", d.width, d.height));
    }
    report.push_str("HDMI-9 disconnected (normal left inverted right x axis y axis)\n");
    report
}

fn format_device_report(devices: &[TouchDevice]) -> String {
    let mut report = String::from(
        "⎡ Virtual core pointer                    \tid=2\t[master pointer  (3)]\n\
         ⎜   ↳ Virtual core XTEST pointer              \tid=4\t[slave  pointer  (2)]\n",
    );
    for d in devices {
        let (marker, parent) = match d.role {
            DeviceRole::Pointer => ("⎜   ↳", 2),
            DeviceRole::Keyboard => ("    ↳", 3),
        };
        report.push_str(&format!(
            "{marker} {:<40}\tid={}\t[slave  {:<8} ({parent})]\n",
            d.name,
            d.id,
            d.role.as_report_word()
        ));
    }
    report
}

// ── Strategies ────────────────────────────────────────────────────────────────

prop_compose! {
    fn portrait_display(index: usize)(
        short in 480u32..2160,
        extra in 1u32..1200,
        x in 0i32..8000,
        y in 0i32..4000,
        left in any::<bool>(),
    ) -> DisplayRecord {
        DisplayRecord {
            port: format!("DP-{index}"),
            width: short,
            height: short + extra,
            x,
            y,
            primary: false,
            orientation: if left { Orientation::Left } else { Orientation::Normal },
        }
    }
}

prop_compose! {
    fn landscape_display()(
        short in 480u32..2160,
        extra in 1u32..1600,
        x in 0i32..8000,
        y in 0i32..4000,
        primary in any::<bool>(),
    ) -> DisplayRecord {
        DisplayRecord {
            port: "HDMI-1".to_string(),
            width: short + extra,
            height: short,
            x,
            y,
            primary,
            orientation: Orientation::Normal,
        }
    }
}

fn portrait_displays(max: usize) -> impl Strategy<Value = Vec<DisplayRecord>> {
    (1..=max).prop_flat_map(|n| {
        (0..n)
            .map(portrait_display)
            .collect::<Vec<_>>()
    })
}

prop_compose! {
    fn device_list()(
        specs in prop::collection::btree_map(5u32..400, any::<bool>(), 0..6)
    ) -> Vec<TouchDevice> {
        let mut main_assigned = false;
        specs
            .into_iter()
            .map(|(id, is_pointer)| {
                let role = if is_pointer { DeviceRole::Pointer } else { DeviceRole::Keyboard };
                let is_main = is_pointer && !main_assigned;
                main_assigned |= is_main;
                TouchDevice { id, name: format!("Vendor {id} TouchScreen"), role, is_main }
            })
            .collect()
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    /// The single landscape display is chosen wherever it sits in the report.
    #[test]
    fn test_select_finds_single_landscape_display_at_any_position(
        portraits in portrait_displays(4),
        landscape in landscape_display(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut displays = portraits;
        let at = position.index(displays.len() + 1);
        displays.insert(at, landscape.clone());

        let selected = select_touch_display(&displays);

        prop_assert_eq!(selected, Ok(&landscape));
    }

    /// Reports without any landscape display never select one.
    #[test]
    fn test_select_rejects_all_portrait_reports(portraits in portrait_displays(4)) {
        let expected = if portraits.len() < 2 {
            SelectionError::NotEnoughDisplays { found: portraits.len() }
        } else {
            SelectionError::NoLandscapeDisplay
        };
        prop_assert_eq!(select_touch_display(&portraits), Err(expected));
    }

    /// Formatting displays into a report and parsing it reproduces them.
    #[test]
    fn test_display_report_round_trip(
        portraits in portrait_displays(3),
        landscape in landscape_display(),
        width in 1u32..20000,
        height in 1u32..20000,
    ) {
        let mut displays = portraits;
        displays.push(landscape);
        let screen = VirtualScreen::new(width, height);
        let report = format_display_report(screen, &displays);

        prop_assert_eq!(parse_displays(&report).expect("parse"), displays);
        prop_assert_eq!(parse_screen_size(&report).expect("parse"), Some(screen));
    }

    /// Formatting devices into a report and parsing it reproduces them.
    #[test]
    fn test_device_report_round_trip(devices in device_list()) {
        let report = format_device_report(&devices);
        prop_assert_eq!(parse_touch_devices(&report).expect("parse"), devices);
    }

    /// The matrix calculator is a pure function of its inputs.
    #[test]
    fn test_compute_transform_is_bit_identical_across_calls(
        target in landscape_display(),
        width in 1.0f64..20000.0,
        height in 1.0f64..20000.0,
    ) {
        let a = compute_transform(&target, width, height).expect("valid");
        let b = compute_transform(&target, width, height).expect("valid");
        prop_assert_eq!(a.rows().map(f64::to_bits), b.rows().map(f64::to_bits));
        prop_assert!(a.scale_x > 0.0 && a.scale_y > 0.0);
    }
}

// ── Fixed scenarios ───────────────────────────────────────────────────────────

#[test]
fn test_end_to_end_detection_for_portrait_plus_landscape_panel() {
    // Arrange
    let displays = vec![
        DisplayRecord {
            port: "DP-1".to_string(),
            width: 1080,
            height: 1920,
            x: 0,
            y: 0,
            primary: true,
            orientation: Orientation::Left,
        },
        DisplayRecord {
            port: "HDMI-1".to_string(),
            width: 1920,
            height: 1080,
            x: 1080,
            y: 0,
            primary: false,
            orientation: Orientation::Normal,
        },
    ];
    let report = format_display_report(VirtualScreen::new(3000, 1920), &displays);

    // Act
    let parsed = parse_displays(&report).expect("parse");
    let target = select_touch_display(&parsed).expect("select");
    let screen = parse_screen_size(&report).expect("parse").expect("present");
    let matrix = screen.transform_for(target).expect("transform");

    // Assert
    assert_eq!(target.port, "HDMI-1");
    assert_eq!(matrix.to_string(), "0.64 0 0.36 0 0.5625 0 0 0 1");
}

#[test]
fn test_keyboard_role_touch_entry_is_parsed_but_not_mapped() {
    let devices = vec![TouchDevice {
        id: 11,
        name: "ILITEK ILITEK-TOUCH".to_string(),
        role: DeviceRole::Keyboard,
        is_main: false,
    }];
    let parsed = parse_touch_devices(&format_device_report(&devices)).expect("parse");

    assert_eq!(parsed, devices);
    assert!(mapping_candidates(&parsed).is_empty());
}
