//! Seam between the refresh tick and whatever paints the scene.
use embedded_graphics::mono_font::MonoFont;

use crate::devices::framebuffer::Canvas;
use crate::ui::scene::Scene;
use crate::ui::surface::WindowId;

/// Everything a compositor may touch during one tick.
pub struct DrawContext<'s, 'a> {
    pub scene: &'s mut Scene<'a>,
    pub root: WindowId,
    pub canvas: &'s mut Canvas,
    pub font: &'static MonoFont<'static>,
}

/// Paints dirty parts of the scene into the backing canvas.
pub trait Compositor {
    /// Returns whether anything was drawn, i.e. whether the canvas has to be
    /// copied to the hardware.
    fn compose(&mut self, ctx: DrawContext<'_, '_>) -> bool;
}

/// Result of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The quit key was read; graphics are torn down.
    Quit,
    /// A previous frame is still being drawn; nothing happened.
    Busy,
    /// The compositor found nothing to draw.
    Unchanged,
    /// The canvas was copied to the hardware.
    Presented,
}

impl RefreshOutcome {
    pub fn is_quit(self) -> bool {
        self == RefreshOutcome::Quit
    }
}
