//! Full-tree repaint compositor.
//!
//! Walks the scene from the root window, translating each frame by its
//! parent's absolute origin, and paints into the canvas with
//! `embedded_graphics`. Any dirt at all repaints everything.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};

use crate::devices::display::{Compositor, DrawContext};
use crate::devices::framebuffer::{Canvas, Color};
use crate::error::Result;
use crate::ui::scene::Scene;
use crate::ui::surface::{Surface, SurfaceId};

#[derive(Debug, Default)]
pub struct SceneCompositor {
    frames: u64,
}

impl SceneCompositor {
    pub const fn new() -> Self {
        Self { frames: 0 }
    }

    /// Frames painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn paint(
        scene: &Scene<'_>,
        id: SurfaceId,
        origin: Point,
        canvas: &mut Canvas,
        font: &MonoFont<'_>,
    ) -> Result<()> {
        let surface = scene.surface(id)?;
        let area = surface.frame().translate(origin);

        match surface {
            Surface::Window(window) => {
                canvas.fill_rect(area, window.border_color());
                for child in surface.children() {
                    Self::paint(scene, child, area.top_left, canvas, font)?;
                }
            }
            Surface::View(view) => {
                canvas.fill_rect(area, view.background_color());
                let images = view.images().iter().map(|i| i.id());
                let labels = view.labels().iter().map(|l| l.id());
                let subviews = view.subviews().iter().map(|v| v.id());
                for child in images.chain(labels).chain(subviews) {
                    Self::paint(scene, child, area.top_left, canvas, font)?;
                }
            }
            Surface::Label(label) => {
                let style = MonoTextStyle::new(font, label.text_color().to_rgb888());
                Text::with_baseline(label.text(), area.top_left, style, Baseline::Top)
                    .draw(&mut canvas.clipped(&area))
                    .ok();
            }
            Surface::Image(image) => {
                let pixels = image
                    .bitmap()
                    .iter()
                    .map(|&pixel| Color::from_hex(pixel).to_rgb888());
                canvas.clipped(&area).fill_contiguous(&area, pixels).ok();
            }
        }
        Ok(())
    }
}

/// Clears the redraw flag on `root` and everything beneath it.
///
/// Runs on every frame, so it walks the tree without allocating.
fn clear_tree(scene: &mut Scene<'_>, root: SurfaceId) -> Result<usize> {
    scene.clear_needs_redraw(root)?;
    let mut cleared = 1;
    for nth in 0.. {
        let child = scene.surface(root)?.children().nth(nth);
        let Some(child) = child else {
            break;
        };
        cleared += clear_tree(scene, child)?;
    }
    Ok(cleared)
}

impl Compositor for SceneCompositor {
    fn compose(&mut self, ctx: DrawContext<'_, '_>) -> bool {
        let root = ctx.root.id();
        match ctx.scene.needs_redraw(root) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(err) => {
                log::warn!("compositor: root window unavailable: {}", err);
                return false;
            }
        }

        let painted = Self::paint(ctx.scene, root, Point::zero(), ctx.canvas, ctx.font)
            .and_then(|()| clear_tree(ctx.scene, root));
        match painted {
            Ok(surfaces) => {
                self.frames += 1;
                log::trace!("compositor: frame {} painted {} surfaces", self.frames, surfaces);
            }
            // A partially painted canvas is still newer than the hardware.
            Err(err) => log::warn!("compositor: repaint aborted: {}", err),
        }
        true
    }
}
