//! Corner radius preferences.
//!
//! The effect reads radii through [`CornerRadiusSource`] on every bounds
//! update and never caches them, so a host can change its preference at any
//! time and the next update picks it up.

use std::cell::Cell;

/// Where the effect gets its corner radii from.
pub trait CornerRadiusSource {
    fn top_corner_radius(&self) -> f32;
    fn bottom_corner_radius(&self) -> f32;
}

pub const TOP_RADIUS_ENV: &str = "CLIPFX_TOP_CORNER_RADIUS";
pub const BOTTOM_RADIUS_ENV: &str = "CLIPFX_BOTTOM_CORNER_RADIUS";

/// In-process radius preferences, adjustable at runtime.
///
/// Radii are sanitised on write: negative or non-finite values become 0.
#[derive(Debug)]
pub struct CornerPrefs {
    top: Cell<f32>,
    bottom: Cell<f32>,
}

impl Default for CornerPrefs {
    fn default() -> Self {
        Self::new(8.0, 8.0)
    }
}

impl CornerPrefs {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self {
            top: Cell::new(sanitize(top)),
            bottom: Cell::new(sanitize(bottom)),
        }
    }

    /// Defaults overridden by `CLIPFX_TOP_CORNER_RADIUS` /
    /// `CLIPFX_BOTTOM_CORNER_RADIUS` when they hold a number.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self::new(
            env_radius(TOP_RADIUS_ENV).unwrap_or(defaults.top.get()),
            env_radius(BOTTOM_RADIUS_ENV).unwrap_or(defaults.bottom.get()),
        )
    }

    pub fn set_top_corner_radius(&self, radius: f32) {
        self.top.set(sanitize(radius));
    }

    pub fn set_bottom_corner_radius(&self, radius: f32) {
        self.bottom.set(sanitize(radius));
    }
}

impl CornerRadiusSource for CornerPrefs {
    #[inline]
    fn top_corner_radius(&self) -> f32 {
        self.top.get()
    }

    #[inline]
    fn bottom_corner_radius(&self) -> f32 {
        self.bottom.get()
    }
}

fn sanitize(radius: f32) -> f32 {
    if radius.is_finite() && radius >= 0.0 {
        radius
    } else {
        log::debug!("corner radius {radius} replaced with 0");
        0.0
    }
}

fn env_radius(key: &str) -> Option<f32> {
    let raw = std::env::var(key).ok()?;
    parse_radius(key, &raw)
}

fn parse_radius(key: &str, raw: &str) -> Option<f32> {
    match raw.trim().parse::<f32>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_are_visible_immediately() {
        let prefs = CornerPrefs::new(4.0, 2.0);
        assert_eq!(prefs.top_corner_radius(), 4.0);
        prefs.set_top_corner_radius(16.0);
        prefs.set_bottom_corner_radius(0.0);
        assert_eq!(prefs.top_corner_radius(), 16.0);
        assert_eq!(prefs.bottom_corner_radius(), 0.0);
    }

    #[test]
    fn invalid_radii_become_zero() {
        let prefs = CornerPrefs::new(-3.0, f32::NAN);
        assert_eq!(prefs.top_corner_radius(), 0.0);
        assert_eq!(prefs.bottom_corner_radius(), 0.0);
        prefs.set_top_corner_radius(f32::INFINITY);
        assert_eq!(prefs.top_corner_radius(), 0.0);
    }

    #[test]
    fn parse_radius_accepts_numbers_only() {
        assert_eq!(parse_radius("K", " 12.5 "), Some(12.5));
        assert_eq!(parse_radius("K", "twelve"), None);
    }
}
