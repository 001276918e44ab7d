//! Demo desktop and the graphics session driven by the refresh timer.
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use gfx::devices::display::{BootAdapter, RefreshOutcome, Screen};
use gfx::devices::drivers::Ps2Keyboard;
use gfx::devices::framebuffer::Color;
use gfx::timer::TimerControl;
use gfx::ui::{Palette, SceneCompositor, ViewId};

const LOGO_SIZE: usize = 32;

/// Diagonal blue-to-orange gradient, `0x00RRGGBB`.
static LOGO: [u32; LOGO_SIZE * LOGO_SIZE] = gradient();

const fn gradient() -> [u32; LOGO_SIZE * LOGO_SIZE] {
    let mut pixels = [0; LOGO_SIZE * LOGO_SIZE];
    let mut i = 0;
    while i < pixels.len() {
        let t = ((i % LOGO_SIZE + i / LOGO_SIZE) * 255 / (2 * (LOGO_SIZE - 1))) as u32;
        pixels[i] = (t << 16) | ((t / 2) << 8) | (255 - t);
        i += 1;
    }
    pixels
}

/// Refresh ticks between two heartbeat color flips.
const HEARTBEAT_TICKS: u64 = 6;

/// Everything the refresh callback needs between ticks.
pub struct Session<'fb> {
    pub screen: Screen<'static>,
    pub adapter: BootAdapter<'fb>,
    pub keyboard: Ps2Keyboard<'static>,
    pub compositor: SceneCompositor,
    heartbeat: ViewId,
    ticks: u64,
    finished: bool,
}

impl<'fb> Session<'fb> {
    /// Populates the root window and wraps everything into a session.
    pub fn new(
        mut screen: Screen<'static>,
        adapter: BootAdapter<'fb>,
        keyboard: Ps2Keyboard<'static>,
    ) -> gfx::Result<Self> {
        let heartbeat = build(&mut screen)?;
        Ok(Self {
            screen,
            adapter,
            keyboard,
            compositor: SceneCompositor::new(),
            heartbeat,
            ticks: 0,
            finished: false,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

fn build(screen: &mut Screen<'static>) -> gfx::Result<ViewId> {
    let palette = Palette::dark_modern();
    let (scene, root) = screen.parts_mut();

    let desktop = scene.window(root)?.content_view();
    scene.set_background_color(desktop, palette.view_background)?;

    let window = scene.create_window(Rectangle::new(Point::new(64, 64), Size::new(480, 240)))?;
    scene.set_title(window, "gfx-kernel")?;
    scene.add_subwindow(root, window)?;
    let body = scene.window(window)?.content_view();
    scene.set_background_color(body, palette.content_background)?;

    let greeting = scene.create_label(
        Rectangle::new(Point::new(12, 12), Size::new(440, 13)),
        "Scene graph online. Press q to leave graphics mode.",
    )?;
    scene.set_text_color(greeting, palette.label_text)?;
    scene.add_sublabel(body, greeting)?;

    let side = LOGO_SIZE as u32;
    let logo = scene.create_image(Rectangle::new(Point::new(12, 40), Size::new(side, side)), &LOGO)?;
    scene.add_subimage(body, logo)?;

    let heartbeat = scene.create_view(Rectangle::new(
        Point::new(12 + side as i32 + 12, 40),
        Size::new(16, 16),
    ))?;
    scene.set_background_color(heartbeat, palette.window_border)?;
    scene.add_subview(body, heartbeat)?;

    Ok(heartbeat)
}

/// Periodic refresh callback registered with the kernel timers.
pub fn refresh_tick(session: &mut Session<'_>) -> TimerControl {
    session.ticks += 1;
    if session.ticks % HEARTBEAT_TICKS == 0 {
        let color = if (session.ticks / HEARTBEAT_TICKS) % 2 == 0 {
            Palette::dark_modern().window_border
        } else {
            Color::RED
        };
        if let Err(err) = session
            .screen
            .scene_mut()
            .set_background_color(session.heartbeat, color)
        {
            log::warn!("desktop: heartbeat update failed: {}", err);
        }
    }

    let outcome = session.screen.refresh(
        &mut session.adapter,
        &mut session.keyboard,
        &mut session.compositor,
    );
    match outcome {
        Ok(RefreshOutcome::Quit) => {
            session.finished = true;
            TimerControl::Cancel
        }
        Ok(_) => TimerControl::Continue,
        Err(err) => {
            log::error!("desktop: refresh failed: {}", err);
            TimerControl::Continue
        }
    }
}
