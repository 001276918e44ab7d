use crate::devices::framebuffer::color::Color;

/// Default colors handed to freshly created surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Unstyled views; loud on purpose so they stand out.
    pub view_background: Color,
    pub window_border: Color,
    pub title_text: Color,
    pub content_background: Color,
    pub label_text: Color,
}

impl Palette {
    /// Palette used during bring-up
    pub const fn development() -> Self {
        Self {
            view_background: Color::GREEN,
            window_border: Color::BLUE,
            title_text: Color::WHITE,
            content_background: Color::WHITE,
            label_text: Color::BLACK,
        }
    }

    /// Darker palette for the demo desktop
    pub const fn dark_modern() -> Self {
        Self {
            view_background: Color::from_hex(0x1E1E1E),
            window_border: Color::from_hex(0x2196F3),
            title_text: Color::from_hex(0xFFFFFF),
            content_background: Color::from_hex(0x121212),
            label_text: Color::from_hex(0xB0B0B0),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::development()
    }
}
