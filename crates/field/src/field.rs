//! Point set generation and the fixed nearest-neighbor graph.
//!
//! A field is a flat `Vec<Point>`. Each point's `closest` list holds indices
//! into that vector, so the vector is the sole owner of every point and the
//! neighbor graph carries no ownership.

use glam::DVec2;
use plexus_core::{distance_squared, FieldConfig, PlexusError, Srgb, Surface, Viewport, Xorshift64};
use serde::Serialize;
use tracing::debug;

/// The drawable disc owned by a [`Point`].
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    radius: f64,
    color: Srgb,
    /// Fill alpha in [0, 1], mirrored from the owner's tier each frame.
    pub active: f64,
}

impl Marker {
    /// An inactive marker of the given radius and hue.
    pub fn new(radius: f64, color: Srgb) -> Self {
        Self {
            radius,
            color,
            active: 0.0,
        }
    }

    /// Disc radius in surface units.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Fill hue; alpha comes from `active`.
    pub fn color(&self) -> Srgb {
        self.color
    }

    /// Fills the disc at `center`, the owner's current position.
    ///
    /// An inactive marker issues no draw call. Returns whether it drew.
    pub fn draw(&self, center: DVec2, surface: &mut dyn Surface) -> bool {
        if self.active == 0.0 {
            return false;
        }
        surface.fill_circle(center, self.radius, self.color.with_alpha(self.active));
        true
    }
}

/// One node of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub(crate) position: DVec2,
    origin: DVec2,
    closest: Vec<usize>,
    /// Line alpha in [0, 1], recomputed every drawn frame.
    pub active: f64,
    pub marker: Marker,
}

impl Point {
    /// Current position, moved by the motion scheduler.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// The anchor all drift is centered on. Never changes after generation.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Indices of the nearest points at generation time, nearest first.
    pub fn closest(&self) -> &[usize] {
        &self.closest
    }
}

/// Summary numbers for a generated field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub points: usize,
    pub links: usize,
    pub mean_link_length: f64,
}

/// The generated points of one mounted instance.
///
/// Points keep their index for the field's whole life, so neighbor lists
/// stay valid. Only positions and activation change after generation.
#[derive(Debug, Clone)]
pub struct Field {
    viewport: Viewport,
    color: Srgb,
    points: Vec<Point>,
}

impl Field {
    /// Scatters one jittered point per grid cell, links neighbors, then sizes markers.
    ///
    /// A zero width or height yields an empty field. Random draws happen in a
    /// fixed order (all positions, then all radii) so a seed fully determines the result.
    pub fn generate(config: &FieldConfig, rng: &mut Xorshift64) -> Result<Self, PlexusError> {
        let viewport = config.viewport()?;
        let positions = jittered_grid(viewport, config.grid_divisions, rng);
        let neighbors = nearest_neighbors(&positions, config.neighbors);

        let radii: Vec<f64> = (0..positions.len())
            .map(|_| config.radius_min + rng.next_f64() * config.radius_spread)
            .collect();

        let points = positions
            .into_iter()
            .zip(neighbors)
            .zip(radii)
            .map(|((position, closest), radius)| Point {
                position,
                origin: position,
                closest,
                active: 0.0,
                marker: Marker::new(radius, config.color),
            })
            .collect();
        let field = Self {
            viewport,
            color: config.color,
            points,
        };

        debug!(
            points = field.points.len(),
            neighbors = config.neighbors,
            width = viewport.width,
            height = viewport.height,
            "field generated"
        );
        Ok(field)
    }

    /// All points in generation order, which is also draw order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut [Point] {
        &mut self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a field generated on a zero-sized surface.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Surface size the field was generated for. Resizes do not change it.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Hue shared by links and markers.
    pub fn color(&self) -> Srgb {
        self.color
    }

    /// Counts links and their mean current length.
    pub fn stats(&self) -> FieldStats {
        let (links, total) = self
            .points
            .iter()
            .flat_map(|p| p.closest.iter().map(move |&j| (p.position, j)))
            .fold((0usize, 0.0f64), |(n, sum), (from, j)| {
                (n + 1, sum + from.distance(self.points[j].position))
            });
        FieldStats {
            points: self.points.len(),
            links,
            mean_link_length: if links == 0 { 0.0 } else { total / links as f64 },
        }
    }
}

/// One uniformly jittered position per cell of a `divisions × divisions` grid.
///
/// Cells are visited column by column (x outer, y inner). Cell origins come
/// from the index, not an accumulated step, so the count is exact.
pub fn jittered_grid(viewport: Viewport, divisions: usize, rng: &mut Xorshift64) -> Vec<DVec2> {
    if viewport.is_empty() || divisions == 0 {
        return Vec::new();
    }
    let step_x = viewport.width / divisions as f64;
    let step_y = viewport.height / divisions as f64;
    let mut positions = Vec::with_capacity(divisions * divisions);
    for col in 0..divisions {
        let x0 = col as f64 * step_x;
        for row in 0..divisions {
            let y0 = row as f64 * step_y;
            let x = x0 + rng.next_f64() * step_x;
            let y = y0 + rng.next_f64() * step_y;
            positions.push(DVec2::new(x, y));
        }
    }
    positions
}

/// The `k` nearest other positions for every position, nearest first.
///
/// Each candidate list is kept sorted while scanning; a new candidate is
/// inserted after every equal-distance entry, so ties go to the earlier index.
/// Identity is by index: coincident positions still never list themselves.
pub fn nearest_neighbors(positions: &[DVec2], k: usize) -> Vec<Vec<usize>> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let mut ranked: Vec<(f64, usize)> = Vec::with_capacity(k + 1);
            for (j, &q) in positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                let d = distance_squared(p, q);
                let slot = ranked.partition_point(|&(ranked_d, _)| ranked_d <= d);
                if slot < k {
                    ranked.insert(slot, (d, j));
                    ranked.truncate(k);
                }
            }
            ranked.into_iter().map(|(_, j)| j).collect()
        })
        .collect()
}
