use std::mem::offset_of;

use crate::error::ClipError;
use crate::kernel::ClipUniforms;

/// Scalar type of a program parameter.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec4,
    Int,
}

impl UniformKind {
    #[inline]
    pub const fn components(self) -> usize {
        match self {
            UniformKind::Float | UniformKind::Int => 1,
            UniformKind::Vec2 => 2,
            UniformKind::Vec4 => 4,
        }
    }
}

/// Resolved slot of a named parameter inside the uniform block.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformLocation {
    pub offset: usize,
    pub kind: UniformKind,
}

/// Name → slot table for a program's parameter block.
///
/// Built once per template; parameter states address slots by
/// [`UniformLocation`] and never look names up again.
#[derive(Debug, Clone)]
pub struct UniformTable {
    entries: Vec<(&'static str, UniformLocation)>,
    size: usize,
}

impl UniformTable {
    /// Table describing [`ClipUniforms`].
    pub fn clip() -> Self {
        let slot = |offset, kind| UniformLocation { offset, kind };
        Self {
            entries: vec![
                ("bounds", slot(offset_of!(ClipUniforms, bounds), UniformKind::Vec4)),
                ("pixel_step", slot(offset_of!(ClipUniforms, pixel_step), UniformKind::Vec2)),
                ("top_radius", slot(offset_of!(ClipUniforms, top_radius), UniformKind::Float)),
                ("bottom_radius", slot(offset_of!(ClipUniforms, bottom_radius), UniformKind::Float)),
                ("skip", slot(offset_of!(ClipUniforms, skip), UniformKind::Int)),
            ],
            size: std::mem::size_of::<ClipUniforms>(),
        }
    }

    #[inline]
    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, loc)| *loc)
    }

    /// Size of the whole block in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, UniformLocation)> + '_ {
        self.entries.iter().copied()
    }
}

/// Locations of the clip program's parameters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClipLocations {
    pub bounds: UniformLocation,
    pub top_radius: UniformLocation,
    pub bottom_radius: UniformLocation,
    pub pixel_step: UniformLocation,
    pub skip: UniformLocation,
}

impl ClipLocations {
    pub fn resolve(table: &UniformTable) -> Result<Self, ClipError> {
        let get = |name: &'static str| table.location(name).ok_or(ClipError::MissingUniform(name));
        Ok(Self {
            bounds: get("bounds")?,
            top_radius: get("top_radius")?,
            bottom_radius: get("bottom_radius")?,
            pixel_step: get("pixel_step")?,
            skip: get("skip")?,
        })
    }
}
