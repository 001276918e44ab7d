use core::fmt;

/// Failures surfaced by the scene graph and the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GfxError {
    /// The allocator refused a request or a child container is full.
    ResourceExhausted,
    /// A handle is stale or a child is not present in its parent.
    NotFound,
    /// Coordinates or a computed frame fall outside what is representable.
    InvalidGeometry,
    /// The requested link would give a surface two parents or form a cycle.
    InvalidHierarchy,
    /// The adapter cannot provide the requested video mode.
    UnsupportedMode(u16),
    /// Neither a linear framebuffer nor a bank window is available.
    NoFramebuffer,
}

impl GfxError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GfxError::ResourceExhausted => "resource exhausted",
            GfxError::NotFound => "not found",
            GfxError::InvalidGeometry => "invalid geometry",
            GfxError::InvalidHierarchy => "invalid hierarchy",
            GfxError::UnsupportedMode(_) => "unsupported video mode",
            GfxError::NoFramebuffer => "no framebuffer",
        }
    }
}

impl fmt::Display for GfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GfxError::UnsupportedMode(mode) => write!(f, "unsupported video mode {:#x}", mode),
            other => f.write_str(other.as_str()),
        }
    }
}

pub type Result<T> = core::result::Result<T, GfxError>;

impl From<alloc::collections::TryReserveError> for GfxError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        GfxError::ResourceExhausted
    }
}
