//! The drawing surface a field renders onto.
//!
//! [`Surface`] is the immediate-mode seam between the field and a host: a
//! browser canvas 2D context, a CPU raster buffer, or the [`RecordingSurface`]
//! defined here, which keeps a log of every call for inspection.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Immediate-mode 2D drawing target.
///
/// The trait is object-safe so hosts can hold a `Box<dyn Surface>`.
/// Drawing composites with normal (src-over) alpha blending in call order.
pub trait Surface {
    /// Resizes the backing store. Like an HTML canvas, this discards its contents.
    fn resize(&mut self, width: u32, height: u32);

    /// Current backing size in pixels.
    fn size(&self) -> (u32, u32);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Strokes a 1-unit line segment.
    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba);

    /// Fills a disc.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Clear,
    Line { from: DVec2, to: DVec2, color: Rgba },
    Circle { center: DVec2, radius: f64, color: Rgba },
}

impl DrawCommand {
    /// Lines and circles; clears and resizes are not draws.
    pub fn is_draw(&self) -> bool {
        matches!(self, DrawCommand::Line { .. } | DrawCommand::Circle { .. })
    }
}

/// A surface that draws nothing and records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// An empty log for a surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every call recorded so far, oldest first.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the log, returning the drained calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Lines and circles recorded so far, ignoring clears and resizes.
    pub fn draw_calls(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Calls issued after the most recent clear or resize, i.e. what is visible now.
    pub fn visible(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear | DrawCommand::Resize { .. }))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    fn blue(alpha: f64) -> Rgba {
        Srgb::from_u8(156, 217, 249).with_alpha(alpha)
    }

    #[test]
    fn surface_trait_is_object_safe() {
        let mut surface: Box<dyn Surface> = Box::new(RecordingSurface::new(8, 4));
        surface.clear();
        assert_eq!(surface.size(), (8, 4));
    }

    #[test]
    fn records_calls_in_order() {
        let mut s = RecordingSurface::new(10, 10);
        s.clear();
        s.stroke_line(DVec2::ZERO, DVec2::ONE, blue(0.3));
        s.fill_circle(DVec2::ONE, 2.5, blue(0.6));
        assert_eq!(s.commands().len(), 3);
        assert_eq!(s.commands()[0], DrawCommand::Clear);
        assert!(matches!(s.commands()[1], DrawCommand::Line { .. }));
        assert!(matches!(s.commands()[2], DrawCommand::Circle { radius, .. } if radius == 2.5));
        assert_eq!(s.draw_calls(), 2);
    }

    #[test]
    fn resize_updates_size_and_hides_previous_draws() {
        let mut s = RecordingSurface::new(10, 10);
        s.fill_circle(DVec2::ONE, 1.0, blue(0.1));
        s.resize(20, 30);
        assert_eq!(s.size(), (20, 30));
        assert!(s.visible().is_empty());
    }

    #[test]
    fn visible_starts_after_last_clear() {
        let mut s = RecordingSurface::new(10, 10);
        s.fill_circle(DVec2::ONE, 1.0, blue(0.1));
        s.clear();
        s.stroke_line(DVec2::ZERO, DVec2::ONE, blue(0.02));
        assert_eq!(s.visible().len(), 1);
    }

    #[test]
    fn take_drains_the_log() {
        let mut s = RecordingSurface::new(1, 1);
        s.clear();
        assert_eq!(s.take().len(), 1);
        assert!(s.commands().is_empty());
    }

    #[test]
    fn draw_command_serializes_with_op_tag() {
        let cmd = DrawCommand::Circle {
            center: DVec2::new(1.0, 2.0),
            radius: 3.0,
            color: blue(0.6),
        };
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["op"], "circle");
        assert_eq!(v["radius"], 3.0);
        assert_eq!(v["color"]["color"], "#9cd9f9");
    }
}
