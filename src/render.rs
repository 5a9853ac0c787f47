// Replays a RenderPlan onto an embedded-graphics draw target

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    PrimitiveStyle, PrimitiveStyleBuilder, RoundedRectangle, StrokeAlignment,
};
use embedded_graphics::text::{Baseline, Text};

use crate::layout::{RenderPlan, Shape, ShapeStyle};

fn primitive_style(style: ShapeStyle) -> PrimitiveStyle<BinaryColor> {
    match style {
        ShapeStyle::Filled => PrimitiveStyle::with_fill(BinaryColor::On),
        // Outlines grow inward so the icon keeps its nominal footprint.
        ShapeStyle::Outlined { stroke } => PrimitiveStyleBuilder::new()
            .stroke_color(BinaryColor::On)
            .stroke_width(stroke)
            .stroke_alignment(StrokeAlignment::Inside)
            .build(),
    }
}

/// Draws every shape and text line of the plan. The target's rotation (if
/// any) is the target's own concern; the plan is in canvas coordinates.
pub fn draw<D>(plan: &RenderPlan, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for shape in &plan.shapes {
        match *shape {
            Shape::RoundedRect { rect, radii, style } => {
                RoundedRectangle::new(rect, radii)
                    .into_styled(primitive_style(style))
                    .draw(target)?;
            }
            Shape::Rect { rect, style } => {
                rect.into_styled(primitive_style(style)).draw(target)?;
            }
        }
    }

    let text_style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    for line in &plan.lines {
        Text::with_baseline(&line.text, line.origin, text_style, Baseline::Top).draw(target)?;
    }
    Ok(())
}
