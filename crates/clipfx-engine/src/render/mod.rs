//! Render context handed to effects when they draw.
//!
//! Convention:
//! - the effect draws with `LoadOp::Load`, compositing over whatever the
//!   target already holds
//! - destination rects are in target pixels (top-left origin, +Y down)

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
