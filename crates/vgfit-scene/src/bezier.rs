// this_file: crates/vgfit-scene/src/bezier.rs

//! Cubic Bezier evaluation, closest-point queries, and polynomial solvers.

use crate::vec2::Vec2;
use kurbo::Shape as _;

/// Coarse polyline resolution used to seed closest-point searches.
const COARSE_STEPS: u32 = 8;
/// Newton refinement iterations for closest-point queries.
const NEWTON_ITERS: u32 = 3;

/// Cubic Bernstein basis at `t`.
pub fn bernstein(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t]
}

/// One cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicSegment {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Point on the curve at parameter `t`.
    pub fn eval(&self, t: f32) -> Vec2 {
        let [b0, b1, b2, b3] = bernstein(t);
        self.p0 * b0 + self.p1 * b1 + self.p2 * b2 + self.p3 * b3
    }

    /// First derivative at `t`.
    pub fn deriv(&self, t: f32) -> Vec2 {
        let s = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * s * s)
            + (self.p2 - self.p1) * (6.0 * s * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    /// Second derivative at `t`.
    pub fn second_deriv(&self, t: f32) -> Vec2 {
        let s = 1.0 - t;
        (self.p2 - self.p1 * 2.0 + self.p0) * (6.0 * s) + (self.p3 - self.p2 * 2.0 + self.p1) * (6.0 * t)
    }

    fn to_kurbo(self) -> kurbo::CubicBez {
        let pt = |v: Vec2| kurbo::Point::new(v.x as f64, v.y as f64);
        kurbo::CubicBez::new(pt(self.p0), pt(self.p1), pt(self.p2), pt(self.p3))
    }

    /// Tight axis-aligned bounding box of the curve.
    pub fn bounding_box(&self) -> (Vec2, Vec2) {
        let rect = self.to_kurbo().bounding_box();
        (
            Vec2::new(rect.x0 as f32, rect.y0 as f32),
            Vec2::new(rect.x1 as f32, rect.y1 as f32),
        )
    }

    /// Distance from `p` to the curve and the parameter of the closest point.
    ///
    /// Seeds with a coarse polyline walk, then refines with Newton steps on
    /// the stationarity condition `(q(t) - p) . q'(t) = 0`.
    pub fn closest_point(&self, p: Vec2) -> (f32, f32) {
        let mut best_dist = self.p0.distance(p);
        let mut best_t = 0.0f32;

        let inv = 1.0 / COARSE_STEPS as f32;
        let mut prev = self.p0;
        let mut prev_t = 0.0f32;
        for i in 1..=COARSE_STEPS {
            let t = i as f32 * inv;
            let point = self.eval(t);
            let (dist, seg_t) = distance_to_segment_with_t(p, prev, point);
            if dist < best_dist {
                best_dist = dist;
                best_t = prev_t + seg_t * (t - prev_t);
            }
            prev = point;
            prev_t = t;
        }

        let mut t = best_t;
        for _ in 0..NEWTON_ITERS {
            let q = self.eval(t);
            let dq = self.deriv(t);
            let f = (q - p).dot(dq);
            let df = dq.length_squared() + (q - p).dot(self.second_deriv(t));
            if df.abs() < 1e-10 {
                break;
            }
            t = (t - f / df).clamp(0.0, 1.0);
        }
        let refined = self.eval(t).distance(p);
        if refined < best_dist {
            (refined, t)
        } else {
            (best_dist, best_t)
        }
    }

    /// Accumulate horizontal-ray crossings at `p` into winding and parity.
    ///
    /// Roots of `y(t) = p.y` with `x(t) > p.x` contribute the sign of
    /// `y'(t)` to the nonzero winding and flip the even-odd parity.
    pub fn ray_crossings(&self, p: Vec2, winding: &mut i32, parity: &mut bool) {
        let a = -self.p0.y + 3.0 * self.p1.y - 3.0 * self.p2.y + self.p3.y;
        let b = 3.0 * self.p0.y - 6.0 * self.p1.y + 3.0 * self.p2.y;
        let c = -3.0 * self.p0.y + 3.0 * self.p1.y;
        let d = self.p0.y - p.y;

        let (count, roots) = solve_cubic(a, b, c, d);
        for &t in roots.iter().take(count) {
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            if self.eval(t).x > p.x {
                let dy = 3.0 * a * t * t + 2.0 * b * t + c;
                *winding += if dy > 0.0 { 1 } else { -1 };
                *parity = !*parity;
            }
        }
    }
}

/// Distance from `p` to segment `ab` and the clamped projection parameter.
pub fn distance_to_segment_with_t(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let v = b - a;
    let w = p - a;
    let c1 = v.dot(w);
    let c2 = v.length_squared();
    let t = if c2 > 0.0 && c1 > 0.0 {
        (c1 / c2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let proj = a + v * t;
    (p.distance(proj), t)
}

/// Accumulate horizontal-ray crossings of segment `ab` at `p`.
pub fn segment_ray_crossings(p: Vec2, a: Vec2, b: Vec2, winding: &mut i32, parity: &mut bool) {
    let a_below = a.y <= p.y;
    let b_below = b.y <= p.y;
    if a_below != b_below {
        let t = (p.y - a.y) / (b.y - a.y);
        let x_int = a.x + t * (b.x - a.x);
        if x_int > p.x {
            *winding += if b.y > a.y { 1 } else { -1 };
            *parity = !*parity;
        }
    }
}

/// Real roots of `a t^2 + b t + c = 0`, smallest first.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> (usize, [f32; 3]) {
    let mut roots = [0.0f32; 3];
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return (0, roots);
        }
        roots[0] = -c / b;
        return (1, roots);
    }
    let discrim = b * b - 4.0 * a * c;
    if discrim < 0.0 {
        return (0, roots);
    }
    let root = discrim.sqrt();
    let q = if b < 0.0 {
        -0.5 * (b - root)
    } else {
        -0.5 * (b + root)
    };
    let (t0, t1) = if q.abs() < 1e-12 {
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };
    roots[0] = t0.min(t1);
    roots[1] = t0.max(t1);
    (2, roots)
}

/// Real roots of `a t^3 + b t^2 + c t + d = 0` (Cardano, trigonometric branch).
pub fn solve_cubic(a: f32, b: f32, c: f32, d: f32) -> (usize, [f32; 3]) {
    if a.abs() < 1e-6 {
        return solve_quadratic(b, c, d);
    }

    let bb = b / a;
    let cc = c / a;
    let dd = d / a;

    let q = (bb * bb - 3.0 * cc) / 9.0;
    let r = (2.0 * bb * bb * bb - 9.0 * bb * cc + 27.0 * dd) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let third = 1.0 / 3.0;

    let mut roots = [0.0f32; 3];
    if r2 < q3 {
        let theta = (r / q3.sqrt()).acos();
        let sqrt_q = q.sqrt();
        let tau = 2.0 * std::f32::consts::PI;
        roots[0] = -2.0 * sqrt_q * (theta * third).cos() - bb * third;
        roots[1] = -2.0 * sqrt_q * ((theta + tau) * third).cos() - bb * third;
        roots[2] = -2.0 * sqrt_q * ((theta - tau) * third).cos() - bb * third;
        (3, roots)
    } else {
        let a_root = if r > 0.0 {
            -cbrt(r + (r2 - q3).sqrt())
        } else {
            cbrt(-r + (r2 - q3).sqrt())
        };
        let b_root = if a_root.abs() > 1e-6 { q / a_root } else { 0.0 };
        roots[0] = (a_root + b_root) - bb * third;
        (1, roots)
    }
}

fn cbrt(x: f32) -> f32 {
    if x > 0.0 {
        x.powf(1.0 / 3.0)
    } else if x < 0.0 {
        -(-x).powf(1.0 / 3.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_like() -> CubicSegment {
        // Control points on the x axis: the curve is the segment [0, 3] x {0}.
        CubicSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        )
    }

    #[test]
    fn test_eval_endpoints() {
        let seg = line_like();
        assert_eq!(seg.eval(0.0), seg.p0);
        assert_eq!(seg.eval(1.0), seg.p3);
    }

    #[test]
    fn test_bernstein_partition_of_unity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let sum: f32 = bernstein(t).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_closest_point_on_straight_curve() {
        let seg = line_like();
        let (dist, t) = seg.closest_point(Vec2::new(1.5, 2.0));
        assert_relative_eq!(dist, 2.0, epsilon = 1e-3);
        let q = seg.eval(t);
        assert_relative_eq!(q.x, 1.5, epsilon = 1e-2);
    }

    #[test]
    fn test_closest_point_past_endpoint() {
        let seg = line_like();
        let (dist, t) = seg.closest_point(Vec2::new(5.0, 0.0));
        assert_relative_eq!(dist, 2.0, epsilon = 1e-3);
        assert_relative_eq!(t, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_closest_point_degenerate_segment() {
        let p = Vec2::new(2.0, 2.0);
        let seg = CubicSegment::new(p, p, p, p);
        let (dist, _) = seg.closest_point(Vec2::new(2.0, 5.0));
        assert_relative_eq!(dist, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_solve_quadratic_roots() {
        // (t - 1)(t - 3) = t^2 - 4t + 3
        let (count, roots) = solve_quadratic(1.0, -4.0, 3.0);
        assert_eq!(count, 2);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-4);
        assert_relative_eq!(roots[1], 3.0, epsilon = 1e-4);

        let (count, _) = solve_quadratic(1.0, 0.0, 1.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_solve_cubic_three_roots() {
        // (t - 1)(t - 2)(t - 3) = t^3 - 6t^2 + 11t - 6
        let (count, mut roots) = solve_cubic(1.0, -6.0, 11.0, -6.0);
        assert_eq!(count, 3);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-3);
        assert_relative_eq!(roots[1], 2.0, epsilon = 1e-3);
        assert_relative_eq!(roots[2], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_solve_cubic_single_root() {
        // t^3 - 1 has a single real root at 1.
        let (count, roots) = solve_cubic(1.0, 0.0, 0.0, -1.0);
        assert_eq!(count, 1);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_crossings_updown() {
        // Vertical-ish curve crossing y = 0.5 once, to the right of x = 0.
        let seg = CubicSegment::new(
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.33),
            Vec2::new(1.0, 0.66),
            Vec2::new(1.0, 1.0),
        );
        let mut winding = 0;
        let mut parity = false;
        seg.ray_crossings(Vec2::new(0.0, 0.5), &mut winding, &mut parity);
        assert_eq!(winding, 1);
        assert!(parity);

        // Same curve, probe to the right: no crossing.
        let mut winding = 0;
        let mut parity = false;
        seg.ray_crossings(Vec2::new(2.0, 0.5), &mut winding, &mut parity);
        assert_eq!(winding, 0);
        assert!(!parity);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let (dist, t) = distance_to_segment_with_t(Vec2::new(2.0, 3.0), a, b);
        assert_relative_eq!(dist, 3.0);
        assert_relative_eq!(t, 0.5);

        let (dist, t) = distance_to_segment_with_t(Vec2::new(-2.0, 0.0), a, b);
        assert_relative_eq!(dist, 2.0);
        assert_relative_eq!(t, 0.0);
    }

    #[test]
    fn test_segment_ray_crossings_direction() {
        let mut winding = 0;
        let mut parity = false;
        segment_ray_crossings(
            Vec2::new(0.0, 0.5),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            &mut winding,
            &mut parity,
        );
        assert_eq!(winding, 1);

        segment_ray_crossings(
            Vec2::new(0.0, 0.5),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            &mut winding,
            &mut parity,
        );
        assert_eq!(winding, 0);
        assert!(!parity);
    }

    #[test]
    fn test_bounding_box_contains_curve() {
        let seg = CubicSegment::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(4.0, -4.0),
            Vec2::new(6.0, 0.0),
        );
        let (min, max) = seg.bounding_box();
        for i in 0..=20 {
            let q = seg.eval(i as f32 / 20.0);
            assert!(q.x >= min.x - 1e-4 && q.x <= max.x + 1e-4);
            assert!(q.y >= min.y - 1e-4 && q.y <= max.y + 1e-4);
        }
    }
}
