use bytemuck::{Pod, Zeroable};

use crate::coords::{PixelStep, Vec2};

/// Half of the antialiasing band around each corner arc, in pixels.
pub const AA_HALF_WIDTH: f32 = 0.5;

/// Fraction of the pixel at `p` covered by the rounded clip region.
///
/// `bounds` is `[left, top, right, bottom]` in the same units as `p`.
/// Points on the bounding edges count as inside. The corner used for a point
/// is chosen with the radius of its own band (top or bottom), never the
/// larger of the two.
///
/// Returns a value in `[0, 1]`; inside the antialiasing band the result is a
/// linear ramp `outer - distance`.
pub fn rounded_rect_coverage(p: Vec2, bounds: [f32; 4], top_radius: f32, bottom_radius: f32) -> f32 {
    let [left, top, right, bottom] = bounds;

    if p.x < left || p.x > right || p.y < top || p.y > bottom {
        return 0.0;
    }

    let (radius, center_y) = if p.y < top + top_radius {
        (top_radius, top + top_radius)
    } else if p.y > bottom - bottom_radius {
        (bottom_radius, bottom - bottom_radius)
    } else {
        return 1.0;
    };

    let center_x = if p.x < left + radius {
        left + radius
    } else if p.x > right - radius {
        right - radius
    } else {
        return 1.0;
    };

    let dist_squared = (p - Vec2::new(center_x, center_y)).length_squared();

    let outer = radius + AA_HALF_WIDTH;
    if dist_squared >= outer * outer {
        return 0.0;
    }

    let inner = radius - AA_HALF_WIDTH;
    if dist_squared <= inner * inner {
        return 1.0;
    }

    outer - dist_squared.sqrt()
}

/// Parameter block consumed by the clip program.
///
/// Layout matches the WGSL `ClipUniforms` struct (48 bytes, 16-byte aligned):
///
///  offset  0  bounds         vec4<f32>
///  offset 16  pixel_step     vec2<f32>
///  offset 24  top_radius     f32
///  offset 28  bottom_radius  f32
///  offset 32  skip           i32
///  offset 36  _pad           [i32; 3]
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ClipUniforms {
    pub bounds: [f32; 4],
    pub pixel_step: [f32; 2],
    pub top_radius: f32,
    pub bottom_radius: f32,
    pub skip: i32,
    pub _pad: [i32; 3],
}

impl ClipUniforms {
    #[inline]
    pub fn is_skipping(&self) -> bool {
        self.skip != 0
    }
}

/// CPU reference of the clip program's fragment stage.
///
/// `uv` is the normalised texture coordinate and `sample` the (premultiplied)
/// colour read from the source texture there. When the bypass flag is set the
/// sample is returned untouched; otherwise every channel is scaled by the
/// coverage at `uv / pixel_step`.
pub fn shade(uv: Vec2, sample: [f32; 4], uniforms: &ClipUniforms) -> [f32; 4] {
    if uniforms.is_skipping() {
        return sample;
    }

    let p = PixelStep(Vec2::from(uniforms.pixel_step)).to_pixels(uv);
    let alpha = rounded_rect_coverage(p, uniforms.bounds, uniforms.top_radius, uniforms.bottom_radius);

    sample.map(|c| c * alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn cov(x: f32, y: f32, bounds: [f32; 4], top: f32, bottom: f32) -> f32 {
        rounded_rect_coverage(Vec2::new(x, y), bounds, top, bottom)
    }

    // ── interior / exterior ───────────────────────────────────────────────

    #[test]
    fn interior_away_from_corners_is_fully_covered() {
        let b = [0.0, 0.0, 200.0, 100.0];
        for &(x, y) in &[(100.0, 50.0), (11.0, 50.0), (189.0, 50.0), (100.0, 0.5), (100.0, 99.5)] {
            assert_eq!(cov(x, y, b, 10.0, 10.0), 1.0, "({x}, {y})");
        }
    }

    #[test]
    fn outside_bounding_box_is_clipped() {
        let b = [10.0, 10.0, 110.0, 60.0];
        for &(x, y) in &[(9.9, 30.0), (110.1, 30.0), (50.0, 9.9), (50.0, 60.1), (-100.0, -100.0)] {
            assert_eq!(cov(x, y, b, 0.0, 0.0), 0.0, "({x}, {y})");
            assert_eq!(cov(x, y, b, 12.0, 4.0), 0.0, "({x}, {y})");
        }
    }

    #[test]
    fn deep_inside_corner_circle_is_fully_covered() {
        let b = [0.0, 0.0, 100.0, 100.0];
        // 2px from the top-left corner centre (10, 10): well within inner radius 9.5.
        assert_eq!(cov(8.0, 10.0 - 0.1, b, 10.0, 10.0), 1.0);
    }

    // ── antialiasing band ─────────────────────────────────────────────────

    #[test]
    fn band_is_open_interval_and_monotonic() {
        let b = [0.0, 0.0, 100.0, 100.0];
        let r = 10.0;
        let centre = Vec2::new(10.0, 10.0);
        // Walk outward along the diagonal towards the top-left corner.
        let dir = Vec2::new(-1.0, -1.0) * (1.0 / 2f32.sqrt());

        let mut prev = f32::INFINITY;
        let mut d = r - 0.45;
        while d < r + 0.5 {
            let p = centre + dir * d;
            let c = rounded_rect_coverage(p, b, r, r);
            assert!(c > 0.0 && c < 1.0, "distance {d}: coverage {c}");
            assert!(c < prev, "not decreasing at distance {d}");
            prev = c;
            d += 0.1;
        }
    }

    #[test]
    fn ramp_is_continuous_at_inner_and_outer_radius() {
        let b = [0.0, 0.0, 100.0, 100.0];
        let r = 10.0;
        let centre = Vec2::new(10.0, 10.0);
        let dir = Vec2::new(-1.0, -1.0) * (1.0 / 2f32.sqrt());
        let at = |d: f32| rounded_rect_coverage(centre + dir * d, b, r, r);

        let inner = r - 0.5;
        assert_eq!(at(inner - 1e-2), 1.0);
        assert!((at(inner + 1e-2) - 1.0).abs() < 2e-2);

        let outer = r + 0.5;
        assert_eq!(at(outer + 1e-2), 0.0);
        assert!(at(outer - 1e-2) < 2e-2);
    }

    #[test]
    fn ramp_value_is_outer_minus_distance() {
        let b = [0.0, 0.0, 100.0, 100.0];
        let c = cov(9.0, 10.0 - 9.9, b, 10.0, 10.0);
        let d = (1.0f32 + 9.9 * 9.9).sqrt();
        assert!((c - (10.5 - d)).abs() < EPS, "{c}");
    }

    #[test]
    fn corner_column_edge_is_not_rounded() {
        // x == left + r sits on the column boundary, not inside the corner.
        assert_eq!(cov(10.0, 0.0, [0.0, 0.0, 100.0, 100.0], 10.0, 10.0), 1.0);
    }

    // ── square corners ────────────────────────────────────────────────────

    #[test]
    fn zero_radii_degenerate_to_rectangle_indicator() {
        let b = [0.0, 0.0, 50.0, 30.0];
        let mut y = -1.0;
        while y <= 31.0 {
            let mut x = -1.0;
            while x <= 51.0 {
                let c = cov(x, y, b, 0.0, 0.0);
                let inside = x >= 0.0 && x <= 50.0 && y >= 0.0 && y <= 30.0;
                assert_eq!(c, if inside { 1.0 } else { 0.0 }, "({x}, {y})");
                assert!(!c.is_nan());
                x += 0.5;
            }
            y += 0.5;
        }
    }

    // ── asymmetric radii ──────────────────────────────────────────────────

    #[test]
    fn bottom_corners_stay_square_when_bottom_radius_is_zero() {
        let b = [0.0, 0.0, 200.0, 100.0];
        assert_eq!(cov(0.0, 100.0, b, 20.0, 0.0), 1.0);
        assert_eq!(cov(200.0, 100.0, b, 20.0, 0.0), 1.0);
        assert_eq!(cov(0.0, 100.5, b, 20.0, 0.0), 0.0);
        assert_eq!(cov(-0.5, 100.0, b, 20.0, 0.0), 0.0);
        // The top corners are still rounded.
        assert_eq!(cov(0.0, 0.0, b, 20.0, 0.0), 0.0);
    }

    #[test]
    fn corner_column_follows_the_band_radius() {
        // A shared max(top, bottom) column would clip this pixel against a
        // 20px-wide column even though the top radius is only 4.
        let b = [0.0, 0.0, 200.0, 100.0];
        assert_eq!(cov(10.0, 0.5, b, 4.0, 20.0), 1.0);
        assert_eq!(cov(190.0, 0.5, b, 4.0, 20.0), 1.0);
        // Same column in the bottom band does fall in the 20px corner.
        assert_eq!(cov(1.0, 99.5, b, 4.0, 20.0), 0.0);
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn reference_rectangle() {
        let b = [0.0, 0.0, 100.0, 50.0];
        assert_eq!(cov(50.0, 25.0, b, 10.0, 5.0), 1.0);
        // (0, 0) is √200 ≈ 14.1 from (10, 10), beyond the 10.5 outer radius.
        assert_eq!(cov(0.0, 0.0, b, 10.0, 5.0), 0.0);
        // Bottom-left corner centre is (5, 45).
        assert_eq!(cov(0.0, 50.0, b, 10.0, 5.0), 0.0);
        assert_eq!(cov(5.0, 44.0, b, 10.0, 5.0), 1.0);
    }

    // ── shade ─────────────────────────────────────────────────────────────

    fn uniforms(skip: i32) -> ClipUniforms {
        ClipUniforms {
            bounds: [0.0, 0.0, 100.0, 50.0],
            pixel_step: [1.0 / 100.0, 1.0 / 50.0],
            top_radius: 10.0,
            bottom_radius: 5.0,
            skip,
            _pad: [0; 3],
        }
    }

    #[test]
    fn shade_scales_every_channel_by_coverage() {
        let sample = [0.5, 0.25, 1.0, 1.0];
        assert_eq!(shade(Vec2::new(0.5, 0.5), sample, &uniforms(0)), sample);
        assert_eq!(shade(Vec2::new(0.0, 0.0), sample, &uniforms(0)), [0.0; 4]);
    }

    #[test]
    fn shade_bypass_returns_sample_untouched() {
        let sample = [0.5, 0.25, 1.0, 1.0];
        assert_eq!(shade(Vec2::new(0.0, 0.0), sample, &uniforms(1)), sample);
        // Even far outside the bounds.
        assert_eq!(shade(Vec2::new(3.0, -2.0), sample, &uniforms(1)), sample);
    }

    #[test]
    fn uniform_block_is_48_bytes() {
        assert_eq!(std::mem::size_of::<ClipUniforms>(), 48);
    }
}
