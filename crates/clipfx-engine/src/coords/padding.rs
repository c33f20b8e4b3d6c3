/// Per-side inset applied to caller bounds before clipping.
///
/// The wire order used by window managers is `[left, right, top, bottom]`;
/// the `From` impls follow it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    #[inline]
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Same inset on every side.
    #[inline]
    pub const fn all(p: f32) -> Self {
        Self { left: p, right: p, top: p, bottom: p }
    }

    /// No inset.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    #[inline]
    pub fn horizontal(self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}

impl From<[f32; 4]> for Padding {
    #[inline]
    fn from([left, right, top, bottom]: [f32; 4]) -> Self {
        Self::new(left, right, top, bottom)
    }
}

impl From<[i32; 4]> for Padding {
    #[inline]
    fn from([left, right, top, bottom]: [i32; 4]) -> Self {
        Self::new(left as f32, right as f32, top as f32, bottom as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_is_left_right_top_bottom() {
        let p = Padding::from([1, 2, 3, 4]);
        assert_eq!(p, Padding::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(p.horizontal(), 3.0);
        assert_eq!(p.vertical(), 7.0);
    }
}
