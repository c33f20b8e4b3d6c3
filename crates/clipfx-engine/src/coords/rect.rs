use super::{Padding, Vec2};

/// Axis-aligned rectangle in caller pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Builds a rect from `[left, top, right, bottom]`.
    #[inline]
    pub fn from_edges([left, top, right, bottom]: [f32; 4]) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    /// `[left, top, right, bottom]`, the layout of the `bounds` uniform.
    #[inline]
    pub fn edges(self) -> [f32; 4] {
        let max = self.max();
        [self.origin.x, self.origin.y, max.x, max.y]
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Closed containment: `[min, max]` on both axes.
    ///
    /// Matches the clip kernel, which keeps pixels lying exactly on an edge.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.x <= max.x && p.y >= self.origin.y && p.y <= max.y
    }

    /// Shrinks the rect by `padding`.
    ///
    /// Not clamped: padding larger than the rect yields a negative size.
    #[inline]
    pub fn inset(self, padding: Padding) -> Self {
        Rect::new(
            self.origin.x + padding.left,
            self.origin.y + padding.top,
            self.size.x - padding.horizontal(),
            self.size.y - padding.vertical(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── edges ─────────────────────────────────────────────────────────────

    #[test]
    fn edges_are_left_top_right_bottom() {
        assert_eq!(r(10.0, 20.0, 100.0, 50.0).edges(), [10.0, 20.0, 110.0, 70.0]);
    }

    #[test]
    fn from_edges_inverts_edges() {
        let rect = r(3.0, 4.0, 30.0, 40.0);
        assert_eq!(Rect::from_edges(rect.edges()), rect);
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn contains_both_edges_inclusive() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn contains_outside() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(-0.5, 5.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(5.0, 10.5)));
    }

    // ── inset ─────────────────────────────────────────────────────────────

    #[test]
    fn inset_applies_each_side() {
        let padded = r(0.0, 0.0, 200.0, 100.0).inset(Padding::new(10.0, 20.0, 5.0, 15.0));
        assert_eq!(padded, r(10.0, 5.0, 170.0, 80.0));
    }

    #[test]
    fn inset_does_not_clamp() {
        let padded = r(0.0, 0.0, 10.0, 10.0).inset(Padding::all(8.0));
        assert_eq!(padded.size, Vec2::new(-6.0, -6.0));
        assert!(padded.is_empty());
    }
}
