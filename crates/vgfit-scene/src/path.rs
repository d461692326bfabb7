// this_file: crates/vgfit-scene/src/path.rs

//! Filled open Bezier paths: boundary queries and inside tests.
//!
//! Paths are chains of cubic segments sharing endpoints. They are open in
//! the sense that the last point is not required to return to the first,
//! but fills treat them as implicitly closed by a straight segment from
//! the last point back to the first, so winding numbers and boundary
//! distances are always well-defined.

use crate::bezier::{distance_to_segment_with_t, segment_ray_crossings, CubicSegment};
use crate::scene::FillRule;
use crate::vec2::Vec2;
use serde::{Deserialize, Serialize};
use vgfit_core::{Error, Result};

/// Which boundary element is closest to a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryElement {
    /// Cubic segment `index` at parameter `t`
    Segment { index: usize, t: f32 },
    /// The implicit closing segment (last point to first) at parameter `t`
    Closing { t: f32 },
}

/// Result of a closest-boundary query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestBoundary {
    pub distance: f32,
    pub element: BoundaryElement,
    pub point: Vec2,
}

/// Control polygon of a filled path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    points: Vec<Vec2>,
}

impl PathGeometry {
    /// Build a path from control points; requires `3 * k + 1` points.
    pub fn new(points: Vec<Vec2>) -> Result<Self> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(Error::config(format!(
                "path needs 3k+1 control points (k >= 1), got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vec2] {
        &mut self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn num_segments(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    /// Cubic segment `index` (shares endpoints with its neighbors).
    pub fn segment(&self, index: usize) -> CubicSegment {
        let base = index * 3;
        CubicSegment::new(
            self.points[base],
            self.points[base + 1],
            self.points[base + 2],
            self.points[base + 3],
        )
    }

    pub fn segments(&self) -> impl Iterator<Item = CubicSegment> + '_ {
        (0..self.num_segments()).map(|i| self.segment(i))
    }

    /// Endpoints of the implicit closing segment.
    pub fn closing_segment(&self) -> (Vec2, Vec2) {
        (self.points[self.points.len() - 1], self.points[0])
    }

    /// Validate the control-point count (used after deserialization).
    pub fn validate(&self) -> Result<()> {
        if self.points.len() < 4 || (self.points.len() - 1) % 3 != 0 {
            return Err(Error::config(format!(
                "path has invalid control-point count {}",
                self.points.len()
            )));
        }
        Ok(())
    }

    /// Axis-aligned bounding box of the filled region.
    pub fn bounding_box(&self) -> (Vec2, Vec2) {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for seg in self.segments() {
            let (lo, hi) = seg.bounding_box();
            min = min.min(lo);
            max = max.max(hi);
        }
        // The closing segment is straight; its endpoints already bound it.
        (min, max)
    }

    /// Nonzero winding number and even-odd parity of `p`.
    pub fn winding(&self, p: Vec2) -> (i32, bool) {
        let mut winding = 0;
        let mut parity = false;
        for seg in self.segments() {
            seg.ray_crossings(p, &mut winding, &mut parity);
        }
        let (last, first) = self.closing_segment();
        segment_ray_crossings(p, last, first, &mut winding, &mut parity);
        (winding, parity)
    }

    /// Whether `p` lies inside the filled region under `rule`.
    pub fn contains(&self, p: Vec2, rule: FillRule) -> bool {
        let (winding, parity) = self.winding(p);
        match rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => parity,
        }
    }

    /// Closest point on the boundary (segments plus implicit closure).
    pub fn closest_boundary(&self, p: Vec2) -> ClosestBoundary {
        let mut best = {
            let (last, first) = self.closing_segment();
            let (distance, t) = distance_to_segment_with_t(p, last, first);
            ClosestBoundary {
                distance,
                element: BoundaryElement::Closing { t },
                point: last + (first - last) * t,
            }
        };

        for (index, seg) in self.segments().enumerate() {
            let (distance, t) = seg.closest_point(p);
            if distance < best.distance {
                best = ClosestBoundary {
                    distance,
                    element: BoundaryElement::Segment { index, t },
                    point: seg.eval(t),
                };
            }
        }
        best
    }

    /// Signed distance to the boundary: negative inside the fill.
    pub fn signed_distance(&self, p: Vec2, rule: FillRule) -> (f32, ClosestBoundary) {
        let closest = self.closest_boundary(p);
        let sd = if self.contains(p, rule) {
            -closest.distance
        } else {
            closest.distance
        };
        (sd, closest)
    }
}
