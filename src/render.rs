//! Draws a clock-tree frame onto an immediate-mode vector surface

use crate::colors::{Palette, Rgba};
use crate::config::ClockConfig;
use crate::geometry::Frame;

/// How new paint combines with what is already on the surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
    /// New paint goes on top
    SourceOver,
    /// New paint goes behind existing paint
    DestinationOver,
}

/// Minimal 2D canvas: one current path, stroke/fill state, compositing mode
pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn set_composite(&mut self, mode: Composite);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_color(&mut self, color: Rgba);
    fn set_fill_color(&mut self, color: Rgba);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

pub fn line_width_at(config: &ClockConfig, depth: usize) -> f64 {
    config.start_line_width * config.width_factor.powi(depth as i32)
}

/// Stroke opacity; the root level comes out above 1.0 on purpose
pub fn opacity_at(config: &ClockConfig, depth: usize) -> f64 {
    config.luminance_factor.powi(depth as i32 - 1)
}

/// Paint `frame` so the finest level sits on top and the background sits
/// under everything.
pub fn render<S: Surface>(frame: &Frame, config: &ClockConfig, palette: &Palette, surface: &mut S) {
    surface.clear();
    surface.set_composite(Composite::DestinationOver);

    // Draw-under: whatever is painted first stays in front
    for (depth, hands) in frame.depths().rev() {
        if hands.is_empty() {
            continue;
        }
        surface.set_line_width(line_width_at(config, depth));
        surface.set_stroke_color(palette.foreground.with_alpha(opacity_at(config, depth)));
        surface.begin_path();
        for hand in hands {
            surface.move_to(hand.start_x, hand.start_y);
            surface.line_to(hand.end_x, hand.end_y);
        }
        surface.stroke();
    }

    let (width, height) = surface.size();
    surface.set_fill_color(palette.background);
    surface.fill_rect(0.0, 0.0, width, height);
}
