//! Compile-time defaults for the display driver and the scene graph.
//!
//! Both configs are plain values; the kernel uses the defaults, tests build
//! their own to shrink capacities or pick other modes.

use embedded_graphics::prelude::Point;

use crate::ui::theme::Palette;

/// VBE mode number for 1024x768 at 24 bits per pixel.
pub const MODE_1024X768X24: u16 = 0x118;

/// Size of one bank window on adapters without a linear framebuffer.
pub const BANK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Mode requested during negotiation.
    pub mode: u16,
    /// Refresh callback period, in timer ticks.
    pub refresh_period: u64,
    /// PIT frequency the refresh period is expressed against.
    pub timer_hz: u32,
    /// Keystroke that tears the graphics session down.
    pub quit_key: char,
    pub bank_size: usize,
}

impl DisplayConfig {
    pub const fn vesa_1024x768() -> Self {
        Self {
            mode: MODE_1024X768X24,
            refresh_period: 83,
            timer_hz: 1000,
            quit_key: 'q',
            bank_size: BANK_SIZE,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::vesa_1024x768()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    /// Fixed capacity of every child container.
    pub child_capacity: usize,
    /// Height of a window's title bar.
    pub title_height: u32,
    /// Offset of the title label inside the title bar.
    pub title_inset: Point,
    pub default_title: &'static str,
    pub border_width: u32,
    pub palette: Palette,
}

impl SceneConfig {
    pub const fn standard() -> Self {
        Self {
            child_capacity: 64,
            title_height: 20,
            title_inset: Point::new(15, 5),
            default_title: "Window",
            border_width: 1,
            palette: Palette::development(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::standard()
    }
}
