// Battery icon geometry and display text layout

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{CornerRadii, CornerRadiiBuilder, Rectangle};

use crate::models::{AlarmState, ChargeState, OnlineState, StatusFacets, UpsSnapshot};

/// Gap between the icon and the text column, in pixels.
const TEXT_MARGIN: i32 = 10;
/// Vertical gap between text lines.
const TEXT_SPACING: i32 = 4;
/// Height of the display font (FONT_10X20).
const FONT_HEIGHT: i32 = 20;

/// Fixed geometry of the segmented battery icon. The defaults describe a
/// 50x116 icon inside a 3 px margin, sized to the 122 px short edge of the
/// 2.13" panel in landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGeometry {
    /// Outer margin around the icon.
    pub margin: i32,
    /// Casing outline thickness.
    pub line_thickness: u32,
    /// Corner radius of the casing and the contact tab.
    pub corner_radius: u32,
    /// Gap between the casing and the charge segments, and between segments.
    pub spacing: i32,
    /// Casing width.
    pub body_width: i32,
    /// Casing height, below the contact tab.
    pub body_height: i32,
    /// Horizontal inset of the contact tab from each casing edge.
    pub tab_inset: i32,
    pub tab_height: i32,
    pub segment_count: u32,
    pub segment_height: i32,
}

impl Default for IconGeometry {
    fn default() -> Self {
        Self {
            margin: 3,
            line_thickness: 2,
            corner_radius: 5,
            spacing: 2,
            body_width: 50,
            body_height: 106,
            tab_inset: 10,
            tab_height: 10,
            segment_count: 5,
            segment_height: 18,
        }
    }
}

/// Number of filled charge segments: floor(charge/100 * count), clamped to
/// [0, count]. 100% fills all segments, 0% fills none, 75% of 5 fills 3.
pub fn filled_segments(charge_percent: f64, segment_count: u32) -> u32 {
    let pct = charge_percent.clamp(0.0, 100.0);
    (((pct / 100.0) * f64::from(segment_count)).floor() as u32).min(segment_count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeStyle {
    Filled,
    Outlined { stroke: u32 },
}

/// One drawing instruction. Coordinates are canvas pixels; nothing here
/// depends on the rendering surface or the panel driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    RoundedRect {
        rect: Rectangle,
        radii: CornerRadii,
        style: ShapeStyle,
    },
    Rect {
        rect: Rectangle,
        style: ShapeStyle,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub origin: Point,
    pub text: String,
}

/// Declarative output of the layout pass: shapes first, then text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub shapes: Vec<Shape>,
    pub lines: Vec<TextLine>,
}

/// Status line: `Online` / `Offline` / `Unknown`, suffixed with the active
/// alarm if any.
pub fn status_line(facets: &StatusFacets) -> String {
    let mut text = match facets.online {
        OnlineState::Online => String::from("Online"),
        OnlineState::Offline => String::from("Offline"),
        OnlineState::Unknown => String::from("Unknown"),
    };
    match facets.alarm {
        AlarmState::LowVoltage => text.push_str(" (Low Voltage)"),
        AlarmState::LowBattery => text.push_str(" (Low Battery)"),
        AlarmState::None => {}
    }
    text
}

/// Battery line: `<charge>%` plus the charge direction. A missing charge
/// value renders as `N/A%`.
pub fn battery_line(charge_percent: Option<f64>, facets: &StatusFacets) -> String {
    let charge = match charge_percent {
        Some(pct) => format!("{pct}"),
        None => String::from("N/A"),
    };
    match facets.charge {
        ChargeState::Charging => format!("{charge}% Charging"),
        ChargeState::Discharging => format!("{charge}% Discharging"),
        ChargeState::None => format!("{charge}%"),
    }
}

/// Remaining runtime in whole minutes, rounded half-up: (secs + 30) / 60.
/// Ties go up, so 90 s is 2 mins and 150 s is 3 mins.
pub fn remaining_line(runtime_secs: Option<u64>) -> String {
    match runtime_secs {
        Some(secs) => format!("Remaining: {} mins", (secs + 30) / 60),
        None => String::from("Remaining: N/A mins"),
    }
}

pub fn load_line(load_watts: Option<f64>) -> String {
    match load_watts {
        Some(load) => format!("Load: {load}W"),
        None => String::from("Load: N/AW"),
    }
}

/// Host uptime as `H:MM:SS`, hours unbounded, fractional seconds dropped.
pub fn uptime_line(uptime_secs: u64) -> String {
    format!(
        "Up: {}:{:02}:{:02}",
        uptime_secs / 3600,
        (uptime_secs % 3600) / 60,
        uptime_secs % 60
    )
}

/// Computes the full render plan for one snapshot: contact tab, casing,
/// filled charge segments (bottom-up), and the five text lines.
///
/// A missing charge value still draws a valid icon with zero segments
/// filled.
pub fn compute_layout(
    snapshot: &UpsSnapshot,
    facets: &StatusFacets,
    geometry: &IconGeometry,
) -> RenderPlan {
    let g = geometry;
    let m = g.margin;
    let thickness = g.line_thickness as i32;
    let corner = Size::new(g.corner_radius, g.corner_radius);

    let mut shapes = Vec::new();

    // Top contact tab, rounded on its top corners only.
    shapes.push(Shape::RoundedRect {
        rect: Rectangle::with_corners(
            Point::new(m + g.tab_inset, m),
            Point::new(m + g.body_width - g.tab_inset, m + g.tab_height),
        ),
        radii: CornerRadiiBuilder::new()
            .top_left(corner)
            .top_right(corner)
            .build(),
        style: ShapeStyle::Filled,
    });

    // Casing outline.
    shapes.push(Shape::RoundedRect {
        rect: Rectangle::with_corners(
            Point::new(m, m + g.tab_height),
            Point::new(m + g.body_width, m + g.tab_height + g.body_height),
        ),
        radii: CornerRadiiBuilder::new().all(corner).build(),
        style: ShapeStyle::Outlined {
            stroke: g.line_thickness,
        },
    });

    // Charge segments, filled from the bottom band upward.
    let seg_left = m + thickness + g.spacing;
    let seg_right = m + g.body_width - thickness - g.spacing;
    let seg_top = m + g.tab_height + thickness;
    let seg_base = seg_top + (g.segment_height + g.spacing) * g.segment_count as i32;
    let filled = filled_segments(
        snapshot.ups.battery_charge_percent.unwrap_or(0.0),
        g.segment_count,
    );
    for i in 0..filled as i32 {
        let bottom = seg_base - i * (g.segment_height + g.spacing);
        shapes.push(Shape::Rect {
            rect: Rectangle::with_corners(
                Point::new(seg_left, bottom - g.segment_height),
                Point::new(seg_right, bottom),
            ),
            style: ShapeStyle::Filled,
        });
    }

    let text_x = (2 * m) + g.body_width + TEXT_MARGIN;
    let line_height = FONT_HEIGHT + TEXT_SPACING;
    let lines = [
        status_line(facets),
        battery_line(snapshot.ups.battery_charge_percent, facets),
        remaining_line(snapshot.ups.battery_runtime_secs),
        load_line(snapshot.ups.load_watts),
        uptime_line(snapshot.uptime_secs),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, text)| TextLine {
        origin: Point::new(text_x, i as i32 * line_height),
        text,
    })
    .collect();

    RenderPlan { shapes, lines }
}
