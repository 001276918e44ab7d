//! # Display Driver
//!
//! Negotiates a graphics mode with a [`VideoAdapter`], owns the off-screen
//! [`Canvas`] and the scene rooted at a full-screen window, and copies the
//! canvas to video memory when a refresh tick finds something redrawn.
//!
//! ## Modules
//!
//! - `adapter`: the hardware trait and the interrupt-masking guard
//! - `bank`: memoized bank selection for adapters without a linear framebuffer
//! - `boot`: adapter backed by the boot loader's framebuffer and DISPI ports
//! - `refresh`: the compositor seam and the refresh outcome
//!
//! ## Refresh tick
//!
//! ```text
//! keys pending? ──'q'──▶ teardown ─▶ Quit
//!      │
//!      ▼
//! finished drawing? ──no──▶ Busy
//!      │
//!      ▼
//! compose ──false──▶ Unchanged
//!      │
//!     true
//!      ▼
//! write_screen ─▶ Presented
//! ```

pub mod adapter;
pub mod bank;
#[cfg(target_os = "none")]
pub mod boot;
pub mod refresh;

pub use adapter::{ControllerInfo, CriticalSection, ModeInfo, VideoAdapter};
pub use bank::BankSwitcher;
#[cfg(target_os = "none")]
pub use boot::BootAdapter;
pub use refresh::{Compositor, DrawContext, RefreshOutcome};

use embedded_graphics::mono_font::{ascii::FONT_8X13, MonoFont};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{DisplayConfig, SceneConfig};
use crate::devices::framebuffer::{Canvas, Color};
use crate::devices::input::KeySource;
use crate::error::{GfxError, Result};
use crate::timer::{self, TimerControl, TimerHandle, Timers};
use crate::ui::scene::Scene;
use crate::ui::surface::WindowId;

/// Graphics session: negotiated mode, backing canvas and the scene drawn
/// into it.
pub struct Screen<'a> {
    mode: ModeInfo,
    config: DisplayConfig,
    canvas: Canvas,
    scene: Scene<'a>,
    window: WindowId,
    font: &'static MonoFont<'static>,
    callback: Option<TimerHandle>,
    finished_drawing: bool,
    banks: BankSwitcher,
    active: bool,
}

impl<'a> Screen<'a> {
    /// Enters graphics mode and builds the full-screen root window.
    ///
    /// Negotiation runs with interrupts masked. An unsupported target mode
    /// falls back to the adapter's native mode.
    pub fn switch_to_graphics<A: VideoAdapter + ?Sized>(
        adapter: &mut A,
        config: &DisplayConfig,
        scene_config: SceneConfig,
    ) -> Result<Self> {
        let mode = {
            let mut hardware = CriticalSection::enter(adapter);
            negotiate(&mut *hardware, config.mode)?
        };
        log::info!(
            "display: mode {:#x}, {}x{}x{}, pitch {}, {}",
            mode.mode,
            mode.width,
            mode.height,
            mode.depth,
            mode.pitch,
            if mode.linear { "linear" } else { "banked" }
        );

        Self::build(mode, config, scene_config).inspect_err(|err| {
            log::error!("display: setup after mode switch failed: {}", err);
            adapter.restore_text_mode();
        })
    }

    fn build(mode: ModeInfo, config: &DisplayConfig, scene_config: SceneConfig) -> Result<Self> {
        let canvas = Canvas::new(mode.width, mode.height, mode.depth, mode.order)?;
        let size = Size::new(
            u32::try_from(mode.width).map_err(|_| GfxError::InvalidGeometry)?,
            u32::try_from(mode.height).map_err(|_| GfxError::InvalidGeometry)?,
        );

        let mut scene = Scene::with_config(scene_config);
        let window = scene.create_window(Rectangle::new(Point::zero(), size))?;

        // The root window is the desktop: no title bar, no border.
        let (title, content) = {
            let root = scene.window(window)?;
            (root.title_view(), root.content_view())
        };
        scene.set_frame(title, Rectangle::zero())?;
        scene.set_frame(content, Rectangle::new(Point::zero(), size))?;
        scene.set_border_width(window, 0)?;

        Ok(Self {
            mode,
            config: *config,
            canvas,
            scene,
            window,
            font: &FONT_8X13,
            callback: None,
            finished_drawing: true,
            banks: BankSwitcher::new(),
            active: true,
        })
    }

    pub fn mode(&self) -> &ModeInfo {
        &self.mode
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scene(&self) -> &Scene<'a> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<'a> {
        &mut self.scene
    }

    /// Root window covering the whole screen.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Scene and root window together, for building the desktop.
    pub fn parts_mut(&mut self) -> (&mut Scene<'a>, WindowId) {
        (&mut self.scene, self.window)
    }

    pub fn font(&self) -> &'static MonoFont<'static> {
        self.font
    }

    pub fn set_font(&mut self, font: &'static MonoFont<'static>) {
        self.font = font;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn callback(&self) -> Option<TimerHandle> {
        self.callback
    }

    pub fn finished_drawing(&self) -> bool {
        self.finished_drawing
    }

    /// Lets an external drawer hold off the refresh tick while it works on
    /// the canvas.
    pub fn set_finished_drawing(&mut self, finished: bool) {
        self.finished_drawing = finished;
    }

    pub fn putpixel(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        self.canvas.putpixel(x, y, color)
    }

    /// # Safety
    ///
    /// `x` and `y` must lie inside the negotiated resolution.
    pub unsafe fn putpixel_unchecked(&mut self, x: usize, y: usize, color: Color) {
        self.canvas.putpixel_unchecked(x, y, color)
    }

    /// Selects a video memory bank unless it is already selected. Returns
    /// whether the hardware was touched.
    pub fn set_bank<A: VideoAdapter + ?Sized>(&mut self, adapter: &mut A, bank: u16) -> bool {
        self.banks.set_bank(adapter, bank)
    }

    /// Registers the recurring refresh callback and records its handle.
    /// A previously registered callback is cancelled.
    pub fn setup_refresh<C>(
        &mut self,
        timers: &mut Timers<C>,
        callback: fn(&mut C) -> TimerControl,
        period: u64,
    ) -> Result<TimerHandle> {
        if let Some(previous) = self.callback.take() {
            timers.cancel(previous).ok();
        }
        let handle = timers.register_periodic(callback, period, true, timer::ticks())?;
        log::debug!(
            "display: refresh every {} ticks ({} Hz timer)",
            period,
            self.config.timer_hz
        );
        self.callback = Some(handle);
        Ok(handle)
    }

    /// One refresh tick.
    pub fn refresh<A, K, C>(
        &mut self,
        adapter: &mut A,
        keys: &mut K,
        compositor: &mut C,
    ) -> Result<RefreshOutcome>
    where
        A: VideoAdapter + ?Sized,
        K: KeySource + ?Sized,
        C: Compositor + ?Sized,
    {
        if !self.active {
            return Ok(RefreshOutcome::Quit);
        }

        while keys.has_pending_key() {
            match keys.read_key() {
                Some(key) if key == self.config.quit_key => {
                    log::info!("display: quit key pressed");
                    self.teardown(adapter);
                    return Ok(RefreshOutcome::Quit);
                }
                // Releases and modifiers decode to nothing.
                Some(_) | None => {}
            }
        }

        if !self.finished_drawing {
            return Ok(RefreshOutcome::Busy);
        }

        self.finished_drawing = false;
        let drew = compositor.compose(DrawContext {
            scene: &mut self.scene,
            root: self.window,
            canvas: &mut self.canvas,
            font: self.font,
        });
        let outcome = if drew {
            self.write_screen(adapter).map(|()| RefreshOutcome::Presented)
        } else {
            Ok(RefreshOutcome::Unchanged)
        };
        self.finished_drawing = true;
        outcome
    }

    /// Copies the canvas to video memory: row by row through the linear
    /// framebuffer, or bank by bank through the bank window.
    pub fn write_screen<A: VideoAdapter + ?Sized>(&mut self, adapter: &mut A) -> Result<()> {
        let pitch = self.mode.pitch.max(self.canvas.stride());

        if let Some(framebuffer) = adapter.linear_framebuffer() {
            for y in 0..self.canvas.height() {
                let row = self.canvas.row(y);
                let start = y * pitch;
                let Some(target) = framebuffer.get_mut(start..start + row.len()) else {
                    break;
                };
                target.copy_from_slice(row);
            }
            return Ok(());
        }

        if adapter.bank_window().is_none() {
            return Err(GfxError::NoFramebuffer);
        }
        let bank_size = self.config.bank_size;
        if bank_size == 0 {
            return Err(GfxError::InvalidGeometry);
        }
        for y in 0..self.canvas.height() {
            let row = self.canvas.row(y);
            let mut written = 0;
            while written < row.len() {
                let address = y * pitch + written;
                let within = address % bank_size;
                let len = (row.len() - written).min(bank_size - within);
                let bank = u16::try_from(address / bank_size).map_err(|_| GfxError::InvalidGeometry)?;

                self.banks.set_bank(adapter, bank);
                let window = adapter.bank_window().ok_or(GfxError::NoFramebuffer)?;
                window
                    .get_mut(within..within + len)
                    .ok_or(GfxError::InvalidGeometry)?
                    .copy_from_slice(&row[written..written + len]);
                written += len;
            }
        }
        Ok(())
    }

    /// Frees the backing buffer and hands the display back to text mode.
    pub fn teardown<A: VideoAdapter + ?Sized>(&mut self, adapter: &mut A) {
        if !self.active {
            return;
        }
        self.canvas.release();
        adapter.restore_text_mode();
        self.banks.invalidate();
        self.callback = None;
        self.active = false;
    }
}

fn negotiate<A: VideoAdapter + ?Sized>(adapter: &mut A, target: u16) -> Result<ModeInfo> {
    let controller = adapter.controller_info()?;
    if !controller.is_valid() {
        log::error!("display: bad controller signature {:?}", controller.signature);
        return Err(GfxError::UnsupportedMode(target));
    }
    log::debug!(
        "display: VBE {}.{}, {} KiB video memory",
        controller.version >> 8,
        controller.version & 0xFF,
        controller.total_memory_kb
    );

    let mode = match adapter.mode_info(target) {
        Ok(mode) => mode,
        Err(GfxError::UnsupportedMode(_)) => {
            let native = adapter.native_mode()?;
            log::warn!(
                "display: mode {:#x} unavailable, staying in native mode {:#x}",
                target,
                native.mode
            );
            native
        }
        Err(err) => return Err(err),
    };
    if !matches!(mode.depth, 24 | 32) {
        return Err(GfxError::UnsupportedMode(mode.mode));
    }

    adapter.set_mode(mode.mode, mode.linear)?;
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::framebuffer::ChannelOrder;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;
    use test_log::test;

    const SMALL: u16 = 0x4000;

    fn small_mode(linear: bool) -> ModeInfo {
        ModeInfo {
            mode: SMALL,
            width: 8,
            height: 4,
            depth: 24,
            pitch: 32,
            base: 0xFD00_0000,
            linear,
            order: ChannelOrder::Bgr,
        }
    }

    struct MockAdapter {
        signature: [u8; 4],
        modes: Vec<ModeInfo>,
        native: ModeInfo,
        set_modes: Vec<(u16, bool)>,
        bank_selects: Vec<u16>,
        current_bank: usize,
        bank_size: usize,
        vram: Vec<u8>,
        linear: bool,
        framebuffer_requests: usize,
        interrupts_enabled: bool,
        text_mode: bool,
    }

    impl MockAdapter {
        fn new(mode: ModeInfo) -> Self {
            Self {
                signature: *b"VESA",
                modes: vec![mode],
                native: mode,
                set_modes: Vec::new(),
                bank_selects: Vec::new(),
                current_bank: 0,
                bank_size: 16,
                vram: vec![0; mode.pitch * mode.height],
                linear: mode.linear,
                framebuffer_requests: 0,
                interrupts_enabled: true,
                text_mode: true,
            }
        }
    }

    impl VideoAdapter for MockAdapter {
        fn controller_info(&mut self) -> Result<ControllerInfo> {
            assert!(!self.interrupts_enabled);
            Ok(ControllerInfo {
                signature: self.signature,
                version: 0x0300,
                total_memory_kb: 16 * 1024,
            })
        }

        fn mode_info(&mut self, mode: u16) -> Result<ModeInfo> {
            self.modes
                .iter()
                .copied()
                .find(|m| m.mode == mode)
                .ok_or(GfxError::UnsupportedMode(mode))
        }

        fn native_mode(&mut self) -> Result<ModeInfo> {
            Ok(self.native)
        }

        fn set_mode(&mut self, mode: u16, linear: bool) -> Result<()> {
            self.set_modes.push((mode, linear));
            self.text_mode = false;
            Ok(())
        }

        fn select_bank(&mut self, bank: u16) {
            self.bank_selects.push(bank);
            self.current_bank = usize::from(bank);
        }

        fn linear_framebuffer(&mut self) -> Option<&mut [u8]> {
            self.framebuffer_requests += 1;
            self.linear.then_some(self.vram.as_mut_slice())
        }

        fn bank_window(&mut self) -> Option<&mut [u8]> {
            if self.linear {
                return None;
            }
            let start = (self.current_bank * self.bank_size).min(self.vram.len());
            let end = (start + self.bank_size).min(self.vram.len());
            Some(&mut self.vram[start..end])
        }

        fn restore_text_mode(&mut self) {
            self.text_mode = true;
        }

        fn disable_interrupts(&mut self) -> bool {
            core::mem::replace(&mut self.interrupts_enabled, false)
        }

        fn restore_interrupts(&mut self, were_enabled: bool) {
            self.interrupts_enabled = were_enabled;
        }
    }

    struct Keys(VecDeque<char>);

    impl KeySource for Keys {
        fn has_pending_key(&mut self) -> bool {
            !self.0.is_empty()
        }

        fn read_key(&mut self) -> Option<char> {
            self.0.pop_front()
        }
    }

    fn no_keys() -> Keys {
        Keys(VecDeque::new())
    }

    struct Recorder {
        calls: usize,
        draw: bool,
    }

    impl Compositor for Recorder {
        fn compose(&mut self, ctx: DrawContext<'_, '_>) -> bool {
            self.calls += 1;
            if self.draw {
                ctx.canvas.putpixel(0, 1, Color::new(10, 20, 30)).ok();
            }
            self.draw
        }
    }

    fn config(mode: u16) -> DisplayConfig {
        DisplayConfig {
            mode,
            bank_size: 16,
            ..DisplayConfig::default()
        }
    }

    fn open(adapter: &mut MockAdapter) -> Screen<'static> {
        Screen::switch_to_graphics(adapter, &config(SMALL), SceneConfig::default()).unwrap()
    }

    #[test]
    fn negotiation_sets_the_requested_linear_mode() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let screen = open(&mut adapter);

        assert_eq!(adapter.set_modes, vec![(SMALL, true)]);
        assert!(adapter.interrupts_enabled);
        assert_eq!(screen.canvas().width(), 8);
        assert_eq!(screen.canvas().bytes_per_pixel(), 3);
        assert!(screen.finished_drawing());
    }

    #[test]
    fn default_mode_is_1024x768x24() {
        let vesa = ModeInfo {
            mode: crate::config::MODE_1024X768X24,
            width: 1024,
            height: 768,
            depth: 24,
            pitch: 3072,
            base: 0xE000_0000,
            linear: true,
            order: ChannelOrder::Bgr,
        };
        let mut adapter = MockAdapter::new(vesa);
        let screen =
            Screen::switch_to_graphics(&mut adapter, &DisplayConfig::default(), SceneConfig::default())
                .unwrap();
        assert_eq!(screen.mode().mode, 0x118);
        assert_eq!(screen.canvas().as_bytes().len(), 1024 * 768 * 3);
    }

    #[test]
    fn unsupported_mode_falls_back_to_native() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let screen = Screen::switch_to_graphics(&mut adapter, &config(0x118), SceneConfig::default())
            .unwrap();

        assert_eq!(screen.mode().mode, SMALL);
        assert_eq!(adapter.set_modes, vec![(SMALL, true)]);
    }

    #[test]
    fn critical_section_is_released_on_failure() {
        let mut adapter = MockAdapter::new(small_mode(true));
        adapter.signature = *b"NOPE";
        let result = Screen::switch_to_graphics(&mut adapter, &config(SMALL), SceneConfig::default());

        assert_eq!(result.err(), Some(GfxError::UnsupportedMode(SMALL)));
        assert!(adapter.interrupts_enabled);
        assert!(adapter.set_modes.is_empty());
    }

    #[test]
    fn shallow_depths_are_rejected() {
        let mut adapter = MockAdapter::new(ModeInfo {
            depth: 16,
            ..small_mode(true)
        });
        let result = Screen::switch_to_graphics(&mut adapter, &config(SMALL), SceneConfig::default());

        assert_eq!(result.err(), Some(GfxError::UnsupportedMode(SMALL)));
        assert!(adapter.interrupts_enabled);
    }

    #[test]
    fn root_window_is_a_borderless_desktop() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let screen = open(&mut adapter);
        let scene = screen.scene();
        let root = scene.window(screen.window()).unwrap();

        assert_eq!(root.border_width(), 0);
        assert_eq!(scene.frame(root.title_view()), Ok(Rectangle::zero()));
        assert_eq!(
            scene.frame(root.content_view()),
            Ok(Rectangle::new(Point::zero(), Size::new(8, 4)))
        );
        assert!(scene.needs_redraw(screen.window()).unwrap());
    }

    #[test]
    fn repeated_bank_selection_touches_hardware_once() {
        let mut adapter = MockAdapter::new(small_mode(false));
        let mut screen = open(&mut adapter);

        assert!(screen.set_bank(&mut adapter, 3));
        assert!(!screen.set_bank(&mut adapter, 3));
        assert_eq!(adapter.bank_selects, vec![3]);
    }

    #[test]
    fn busy_tick_does_nothing() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: true };
        screen.set_finished_drawing(false);

        let outcome = screen.refresh(&mut adapter, &mut no_keys(), &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Busy));
        assert_eq!(compositor.calls, 0);
        assert_eq!(adapter.framebuffer_requests, 0);
    }

    #[test]
    fn clean_scene_skips_the_hardware() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: false };

        let outcome = screen.refresh(&mut adapter, &mut no_keys(), &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Unchanged));
        assert_eq!(compositor.calls, 1);
        assert_eq!(adapter.framebuffer_requests, 0);
        assert!(screen.finished_drawing());
    }

    #[test]
    fn drawn_frame_is_copied_honoring_pitch() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: true };

        let outcome = screen.refresh(&mut adapter, &mut no_keys(), &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Presented));
        // pixel (0, 1) lands at the start of the second 32-byte hardware row
        assert_eq!(&adapter.vram[32..35], &[30, 20, 10]);
        assert!(adapter.vram[24..32].iter().all(|&b| b == 0));
    }

    #[test]
    fn banked_copy_walks_every_bank() {
        let mut adapter = MockAdapter::new(small_mode(false));
        let mut screen = open(&mut adapter);
        screen.putpixel(7, 3, Color::new(1, 2, 3)).unwrap();

        screen.write_screen(&mut adapter).unwrap();
        // 4 rows, 32-byte pitch, 16-byte banks
        assert_eq!(adapter.bank_selects, (0..8).collect::<Vec<u16>>());
        let offset = 3 * 32 + 7 * 3;
        assert_eq!(&adapter.vram[offset..offset + 3], &[3, 2, 1]);
    }

    #[test]
    fn zero_bank_size_is_rejected() {
        let mut adapter = MockAdapter::new(small_mode(false));
        let config = DisplayConfig {
            bank_size: 0,
            ..config(SMALL)
        };
        let mut screen =
            Screen::switch_to_graphics(&mut adapter, &config, SceneConfig::default()).unwrap();

        assert_eq!(screen.write_screen(&mut adapter), Err(GfxError::InvalidGeometry));
        assert!(adapter.bank_selects.is_empty());
    }

    #[test]
    fn missing_framebuffer_is_reported() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);

        struct Blind;
        impl VideoAdapter for Blind {
            fn controller_info(&mut self) -> Result<ControllerInfo> {
                Err(GfxError::NotFound)
            }
            fn mode_info(&mut self, mode: u16) -> Result<ModeInfo> {
                Err(GfxError::UnsupportedMode(mode))
            }
            fn native_mode(&mut self) -> Result<ModeInfo> {
                Err(GfxError::NoFramebuffer)
            }
            fn set_mode(&mut self, _: u16, _: bool) -> Result<()> {
                Ok(())
            }
            fn select_bank(&mut self, _: u16) {}
            fn linear_framebuffer(&mut self) -> Option<&mut [u8]> {
                None
            }
            fn bank_window(&mut self) -> Option<&mut [u8]> {
                None
            }
            fn restore_text_mode(&mut self) {}
            fn disable_interrupts(&mut self) -> bool {
                false
            }
            fn restore_interrupts(&mut self, _: bool) {}
        }

        assert_eq!(screen.write_screen(&mut Blind), Err(GfxError::NoFramebuffer));
    }

    #[test]
    fn quit_key_tears_down() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: true };
        let mut keys = Keys(VecDeque::from(['x', 'q', 'y']));

        let outcome = screen.refresh(&mut adapter, &mut keys, &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Quit));
        assert_eq!(compositor.calls, 0);
        assert!(adapter.text_mode);
        assert!(!screen.is_active());
        assert!(screen.canvas().is_released());
        assert_eq!(
            screen.refresh(&mut adapter, &mut no_keys(), &mut compositor),
            Ok(RefreshOutcome::Quit)
        );
    }

    #[test]
    fn other_keys_are_drained() {
        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: false };
        let mut keys = Keys(VecDeque::from(['a', 'b']));

        let outcome = screen.refresh(&mut adapter, &mut keys, &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Unchanged));
        assert!(keys.0.is_empty());
    }

    #[test]
    fn quit_key_behind_a_silent_read_is_seen() {
        // Each entry is one read; `None` stands for a key release.
        struct Decoded(VecDeque<Option<char>>);

        impl KeySource for Decoded {
            fn has_pending_key(&mut self) -> bool {
                !self.0.is_empty()
            }

            fn read_key(&mut self) -> Option<char> {
                self.0.pop_front().flatten()
            }
        }

        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut compositor = Recorder { calls: 0, draw: true };
        let mut keys = Decoded(VecDeque::from([Some('a'), None, Some('q')]));

        let outcome = screen.refresh(&mut adapter, &mut keys, &mut compositor);
        assert_eq!(outcome, Ok(RefreshOutcome::Quit));
        assert_eq!(compositor.calls, 0);
        assert!(adapter.text_mode);
    }

    #[test]
    fn setup_refresh_records_the_handle() {
        fn tick(_: &mut u32) -> TimerControl {
            TimerControl::Continue
        }

        let mut adapter = MockAdapter::new(small_mode(true));
        let mut screen = open(&mut adapter);
        let mut timers: Timers<u32> = Timers::new().unwrap();

        let first = screen.setup_refresh(&mut timers, tick, 83).unwrap();
        assert_eq!(screen.callback(), Some(first));
        let second = screen.setup_refresh(&mut timers, tick, 83).unwrap();
        assert!(!timers.is_registered(first));
        assert!(timers.is_registered(second));
    }
}
