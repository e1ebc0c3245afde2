//! The interaction target and the suspend flag.
//!
//! [`InteractionTracker`] is the single writer of both; the render loop only
//! reads them between frames.

use glam::DVec2;
use plexus_core::Viewport;

/// What the host device can do, supplied at mount.
///
/// Touch-primary devices get no pointer-move tracking: dragging a finger
/// does not move the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputCapability {
    pub touch: bool,
}

/// Current interaction target and whether frames should draw.
///
/// Written only by input handlers, read by the render loop between frames.
/// Resizes do not touch it: without a pointer the target stays at the center
/// of the surface as it was at mount.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionTracker {
    default_target: DVec2,
    pointer: Option<DVec2>,
    animating: bool,
}

impl InteractionTracker {
    /// Target starts at the viewport center with animation enabled.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            default_target: viewport.center(),
            pointer: None,
            animating: true,
        }
    }

    /// The last pointer position, or the mount-time surface center if none was seen.
    pub fn target(&self) -> DVec2 {
        self.pointer.unwrap_or(self.default_target)
    }

    /// Whether any pointer position has been recorded.
    pub fn has_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    /// False while the page is scrolled past the surface.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Records a page-relative pointer position.
    pub fn pointer_moved(&mut self, position: DVec2) {
        self.pointer = Some(position);
    }

    /// Animation runs while the page is scrolled no further than one surface height.
    ///
    /// Returns whether the flag changed.
    pub fn scrolled(&mut self, offset_y: f64, surface_height: f64) -> bool {
        let animating = offset_y <= surface_height;
        let changed = animating != self.animating;
        self.animating = animating;
        changed
    }
}
