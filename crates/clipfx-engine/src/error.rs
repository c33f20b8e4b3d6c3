use std::fmt;

use crate::program::UniformKind;

/// Errors reported by the clip effect and its program.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipError {
    /// A bounds, bypass or paint call was made before an actor was attached.
    NotAttached,
    /// The attached actor was dropped while the effect still observed it.
    ActorDropped,
    /// The effect was disposed; its parameter state is gone.
    Disposed,
    /// The program does not declare a parameter with this name.
    MissingUniform(&'static str),
    /// A parameter write did not match the declared type.
    UniformMismatch {
        offset: usize,
        expected: UniformKind,
        components: usize,
    },
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipError::NotAttached => write!(f, "clip effect is not attached to an actor"),
            ClipError::ActorDropped => write!(f, "clip effect actor no longer exists"),
            ClipError::Disposed => write!(f, "clip effect has been disposed"),
            ClipError::MissingUniform(name) => {
                write!(f, "clip program has no uniform named `{name}`")
            }
            ClipError::UniformMismatch { offset, expected, components } => write!(
                f,
                "uniform at offset {offset} is {expected:?} ({} components), got {components}",
                expected.components()
            ),
        }
    }
}

impl std::error::Error for ClipError {}
