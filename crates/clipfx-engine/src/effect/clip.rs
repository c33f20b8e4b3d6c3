use std::rc::{Rc, Weak};

use super::Actor;
use crate::coords::{Padding, PixelStep, Rect};
use crate::error::ClipError;
use crate::prefs::CornerRadiusSource;
use crate::program::{shared_template, ClipLocations, ParameterState};
use crate::render::{RenderCtx, RenderTarget};

/// Lifecycle position of a [`ClipEffect`]. The bypass flag is tracked
/// separately, see [`ClipEffect::is_skipping`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EffectState {
    Unattached,
    Attached,
    HasBounds,
    /// Still attached, but the actor has been dropped.
    ActorDropped,
    Disposed,
}

/// Clips an actor's offscreen texture to a rectangle with rounded top and
/// bottom corners.
///
/// Typical frame:
/// 1. [`set_bounds`](Self::set_bounds) (or [`skip`](Self::skip)) when the
///    window geometry changes
/// 2. [`pre_paint`](Self::pre_paint) before the offscreen texture is drawn
/// 3. [`paint`](Self::paint) to composite the texture through the clip
pub struct ClipEffect {
    params: Option<ParameterState>,
    locations: ClipLocations,
    actor: Option<Weak<dyn Actor>>,
    prefs: Rc<dyn CornerRadiusSource>,
    bounds: Rect,
    has_bounds: bool,
}

impl ClipEffect {
    /// Creates an unattached effect with its own copy of the shared program.
    ///
    /// Fails only when the shared program cannot be built, in which case no
    /// clip effect can work in this process.
    pub fn new(prefs: Rc<dyn CornerRadiusSource>) -> Result<Self, ClipError> {
        let template = shared_template()
            .inspect_err(|e| log::error!("clip program unavailable: {e}"))?;

        Ok(Self {
            locations: template.locations(),
            params: Some(template.instantiate()),
            actor: None,
            prefs,
            bounds: Rect::default(),
            has_bounds: false,
        })
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Starts observing `actor`. Replaces any previous actor.
    pub fn attach<A: Actor + 'static>(&mut self, actor: &Rc<A>) {
        let weak: Weak<A> = Rc::downgrade(actor);
        self.actor = Some(weak);
    }

    /// Stops observing the actor. Parameters are kept.
    pub fn detach(&mut self) {
        self.actor = None;
    }

    /// Releases the parameter state and forgets the actor.
    ///
    /// Every later operation fails with [`ClipError::Disposed`]. The shared
    /// program is not affected. Calling it twice is harmless.
    pub fn dispose(&mut self) {
        if self.params.take().is_some() {
            log::debug!("clip effect disposed");
        }
        self.actor = None;
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.actor.as_ref().is_some_and(|a| a.strong_count() > 0)
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.params.is_none()
    }

    pub fn state(&self) -> EffectState {
        if self.is_disposed() {
            EffectState::Disposed
        } else if self.actor.is_none() {
            EffectState::Unattached
        } else if !self.is_attached() {
            EffectState::ActorDropped
        } else if self.has_bounds {
            EffectState::HasBounds
        } else {
            EffectState::Attached
        }
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Sets the clip rectangle to `rect` shrunk by `padding`
    /// (`[left, right, top, bottom]`).
    ///
    /// Also reads the current corner radii from the preference source,
    /// recomputes the pixel step from the actor's size and clears bypass.
    /// Degenerate input (negative spans, zero-sized actor) is passed through
    /// unchecked.
    pub fn set_bounds(&mut self, rect: Rect, padding: impl Into<Padding>) -> Result<(), ClipError> {
        let loc = self.locations;
        let top_radius = self.prefs.top_corner_radius();
        let bottom_radius = self.prefs.bottom_corner_radius();

        let (params, actor) = self.checked("set_bounds")?;

        let bounds = rect.inset(padding.into());
        let pixel_step = PixelStep::from_size(actor.size());

        params.set_uniform_float(loc.bounds, &bounds.edges())?;
        params.set_uniform_1f(loc.top_radius, top_radius)?;
        params.set_uniform_1f(loc.bottom_radius, bottom_radius)?;
        params.set_uniform_float(loc.pixel_step, &pixel_step.to_array())?;
        params.set_uniform_1i(loc.skip, 0)?;

        self.bounds = bounds;
        self.has_bounds = true;
        Ok(())
    }

    /// Turns clipping off until the next [`set_bounds`](Self::set_bounds).
    pub fn skip(&mut self) -> Result<(), ClipError> {
        let loc = self.locations;
        let (params, _) = self.checked("skip")?;
        params.set_uniform_1i(loc.skip, 1)
    }

    /// Last clip rectangle, in caller space after padding. Zero before the
    /// first [`set_bounds`](Self::set_bounds).
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_skipping(&self) -> bool {
        self.params
            .as_ref()
            .and_then(|p| p.uniform_i32(self.locations.skip))
            .is_some_and(|skip| skip != 0)
    }

    // ── painting ──────────────────────────────────────────────────────────

    /// Pre-draw hook, run every frame before the offscreen texture is drawn.
    ///
    /// Forces linear sampling: nearest would show stair steps along the
    /// analytic edge. Returns whether painting should go ahead.
    pub fn pre_paint(&mut self) -> bool {
        let Some(params) = self.params.as_mut() else {
            return false;
        };
        params.set_layer_filters(wgpu::FilterMode::Linear, wgpu::FilterMode::Linear);
        self.is_attached()
    }

    /// Composites `source` into `dest` (target pixels) through the clip.
    ///
    /// Returns `Ok(false)` when nothing was recorded (invalid viewport).
    pub fn paint(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: &wgpu::TextureView,
        dest: Rect,
    ) -> Result<bool, ClipError> {
        let (params, _) = self.checked("paint")?;
        Ok(params.draw(ctx, target, source, dest))
    }

    #[inline]
    pub fn params(&self) -> Option<&ParameterState> {
        self.params.as_ref()
    }

    #[inline]
    pub(crate) fn params_mut(&mut self) -> Option<&mut ParameterState> {
        self.params.as_mut()
    }

    // ── private helpers ────────────────────────────────────────────────────

    /// Precondition guard: live parameter state and a live actor.
    fn checked(&mut self, op: &str) -> Result<(&mut ParameterState, Rc<dyn Actor>), ClipError> {
        let result = match (self.params.as_mut(), self.actor.as_ref()) {
            (None, _) => Err(ClipError::Disposed),
            (Some(_), None) => Err(ClipError::NotAttached),
            (Some(params), Some(actor)) => match actor.upgrade() {
                Some(actor) => Ok((params, actor)),
                None => Err(ClipError::ActorDropped),
            },
        };
        if let Err(e) = &result {
            log::warn!("clip effect {op} ignored: {e}");
        }
        result
    }
}
