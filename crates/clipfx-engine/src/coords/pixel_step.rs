use super::Vec2;

/// Conversion factor from normalised texture coordinates to pixels.
///
/// Holds `(1 / width, 1 / height)` of the actor the texture was rendered from.
/// A zero dimension yields an infinite step; that is passed through as-is.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PixelStep(pub Vec2);

impl PixelStep {
    #[inline]
    pub fn from_size(size: Vec2) -> Self {
        Self(Vec2::new(1.0 / size.x, 1.0 / size.y))
    }

    /// Maps a texture coordinate in `[0, 1]²` to pixel space.
    #[inline]
    pub fn to_pixels(self, uv: Vec2) -> Vec2 {
        uv / self.0
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 2] {
        self.0.to_array()
    }
}
