use crate::coords::Vec2;

/// Host object an effect is attached to.
///
/// The effect only observes it: it holds a `Weak` reference and asks for the
/// current size whenever bounds are updated.
pub trait Actor {
    /// Current allocation size in pixels.
    fn size(&self) -> Vec2;
}
