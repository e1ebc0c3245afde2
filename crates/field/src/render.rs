//! The per-frame render pass.

use glam::DVec2;
use plexus_core::{distance_squared, Surface};
use serde::Serialize;
use tracing::trace;

use crate::activation::Tier;
use crate::field::Field;

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStatus {
    /// Surface cleared and redrawn.
    Drawn,
    /// Animation suspended; surface untouched, next frame still requested.
    Suspended,
    /// Loop stopped; no further frames should be requested.
    Stopped,
}

impl FrameStatus {
    /// Whether the host should request another frame.
    pub fn reschedule(self) -> bool {
        self != FrameStatus::Stopped
    }
}

/// Draw calls issued by one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub lines: usize,
    pub markers: usize,
}

impl FrameStats {
    /// Lines plus markers.
    pub fn draw_calls(&self) -> usize {
        self.lines + self.markers
    }
}

/// Frame loop state: running until stopped, counting drawn frames.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    running: bool,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// A running loop with no frames drawn.
    pub fn new() -> Self {
        Self {
            running: true,
            frames: 0,
        }
    }

    /// False once [`stop`](Self::stop) was called.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stops the loop for good; every later frame reports [`FrameStatus::Stopped`].
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Frames that actually drew.
    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// Runs one frame. While suspended nothing touches the surface.
    pub fn frame(
        &mut self,
        field: &mut Field,
        target: DVec2,
        animating: bool,
        surface: &mut dyn Surface,
    ) -> (FrameStatus, FrameStats) {
        if !self.running {
            return (FrameStatus::Stopped, FrameStats::default());
        }
        if !animating {
            return (FrameStatus::Suspended, FrameStats::default());
        }
        surface.clear();
        let stats = draw_field(field, target, surface);
        self.frames += 1;
        trace!(frame = self.frames, lines = stats.lines, markers = stats.markers, "frame drawn");
        (FrameStatus::Drawn, stats)
    }
}

/// Updates every point's tier from its distance to `target` and draws it.
///
/// Points are visited in field order. An active point strokes a line to each
/// of its neighbors at the point's alpha, then its marker is filled at the
/// marker's alpha. Inactive points issue no calls.
pub fn draw_field(field: &mut Field, target: DVec2, surface: &mut dyn Surface) -> FrameStats {
    let color = field.color();
    let mut stats = FrameStats::default();
    for i in 0..field.len() {
        {
            let point = &mut field.points_mut()[i];
            let tier = Tier::from_distance_squared(distance_squared(target, point.position()));
            point.active = tier.line_alpha();
            point.marker.active = tier.marker_alpha();
        }

        let points = field.points();
        let point = &points[i];
        if point.active != 0.0 {
            let stroke = color.with_alpha(point.active);
            for &j in point.closest() {
                surface.stroke_line(point.position(), points[j].position(), stroke);
                stats.lines += 1;
            }
        }
        if point.marker.draw(point.position(), surface) {
            stats.markers += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use plexus_core::{DrawCommand, FieldConfig, RecordingSurface, Xorshift64};

    fn field() -> Field {
        let config = FieldConfig::new(1000.0, 1000.0, 11);
        Field::generate(&config, &mut Xorshift64::new(11)).unwrap()
    }

    #[test]
    fn target_on_a_point_activates_it_fully() {
        let mut field = field();
        let target = field.points()[0].position();
        let mut surface = RecordingSurface::new(1000, 1000);
        draw_field(&mut field, target, &mut surface);

        let p = &field.points()[0];
        assert_eq!(p.active, 0.3);
        assert_eq!(p.marker.active, 0.6);

        let lines_from_p: Vec<_> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to, color } if *from == p.position() => Some((*to, color.alpha)),
                _ => None,
            })
            .collect();
        assert_eq!(lines_from_p.len(), p.closest().len());
        for (&j, (to, alpha)) in p.closest().iter().zip(&lines_from_p) {
            assert_eq!(*to, field.points()[j].position());
            assert_eq!(*alpha, 0.3);
        }
    }

    #[test]
    fn distant_target_draws_nothing() {
        let mut field = field();
        let mut surface = RecordingSurface::new(1000, 1000);
        let stats = draw_field(&mut field, DVec2::new(-10_000.0, -10_000.0), &mut surface);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(surface.draw_calls(), 0);
        assert!(field.points().iter().all(|p| p.active == 0.0 && p.marker.active == 0.0));
    }

    #[test]
    fn draw_calls_match_active_points() {
        let mut field = field();
        let mut surface = RecordingSurface::new(1000, 1000);
        let stats = draw_field(&mut field, DVec2::new(500.0, 500.0), &mut surface);
        let active = field.points().iter().filter(|p| p.active != 0.0);
        let expected_lines: usize = active.clone().map(|p| p.closest().len()).sum();
        assert_eq!(stats.lines, expected_lines);
        assert_eq!(stats.markers, active.count());
        assert_eq!(surface.draw_calls(), stats.draw_calls());
    }

    #[test]
    fn every_drawn_alpha_matches_the_tier_of_its_point() {
        let mut field = field();
        let target = DVec2::new(300.0, 700.0);
        let mut surface = RecordingSurface::new(1000, 1000);
        draw_field(&mut field, target, &mut surface);
        for cmd in surface.commands() {
            if let DrawCommand::Circle { center, color, .. } = cmd {
                let tier = Tier::from_distance_squared(distance_squared(target, *center));
                assert_eq!(color.alpha, tier.marker_alpha());
                assert_ne!(color.alpha, 0.0);
            }
        }
    }

    #[test]
    fn frame_clears_before_drawing() {
        let mut field = field();
        let mut surface = RecordingSurface::new(1000, 1000);
        let mut render = RenderLoop::new();
        let (status, _) = render.frame(&mut field, DVec2::new(500.0, 500.0), true, &mut surface);
        assert_eq!(status, FrameStatus::Drawn);
        assert_eq!(surface.commands()[0], DrawCommand::Clear);
        assert_eq!(render.frames_drawn(), 1);
    }

    #[test]
    fn suspended_frames_leave_surface_untouched_but_reschedule() {
        let mut field = field();
        let mut surface = RecordingSurface::new(1000, 1000);
        let mut render = RenderLoop::new();
        for _ in 0..5 {
            let (status, stats) = render.frame(&mut field, DVec2::ZERO, false, &mut surface);
            assert_eq!(status, FrameStatus::Suspended);
            assert!(status.reschedule());
            assert_eq!(stats.draw_calls(), 0);
        }
        assert!(surface.commands().is_empty());
        assert_eq!(render.frames_drawn(), 0);
    }

    #[test]
    fn stopped_loop_does_nothing_and_does_not_reschedule() {
        let mut field = field();
        let mut surface = RecordingSurface::new(1000, 1000);
        let mut render = RenderLoop::new();
        render.stop();
        let (status, _) = render.frame(&mut field, DVec2::new(500.0, 500.0), true, &mut surface);
        assert_eq!(status, FrameStatus::Stopped);
        assert!(!status.reschedule());
        assert!(surface.commands().is_empty());
    }
}
