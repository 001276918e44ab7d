//! Hardware seam for mode negotiation and framebuffer access.
use core::ops::{Deref, DerefMut};

use crate::devices::framebuffer::ChannelOrder;
use crate::error::Result;

/// Controller identification returned by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerInfo {
    pub signature: [u8; 4],
    /// BCD version, `0x0300` for VBE 3.0.
    pub version: u16,
    pub total_memory_kb: u32,
}

impl ControllerInfo {
    pub const SIGNATURE: [u8; 4] = *b"VESA";

    pub fn is_valid(&self) -> bool {
        self.signature == Self::SIGNATURE
    }
}

/// Geometry and layout of one video mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: u16,
    pub width: usize,
    pub height: usize,
    /// Bits per pixel.
    pub depth: u8,
    /// Bytes between the starts of two hardware rows.
    pub pitch: usize,
    /// Kernel address of the linear framebuffer, 0 when the mode has none.
    pub base: u64,
    pub linear: bool,
    pub order: ChannelOrder,
}

impl ModeInfo {
    pub fn bytes_per_pixel(&self) -> usize {
        usize::from(self.depth / 8)
    }
}

/// Display controller operations the screen driver relies on.
///
/// The kernel implements this over the boot framebuffer and the DISPI
/// registers; tests use recording mocks.
pub trait VideoAdapter {
    fn controller_info(&mut self) -> Result<ControllerInfo>;

    fn mode_info(&mut self, mode: u16) -> Result<ModeInfo>;

    /// Mode the adapter was left in by the boot loader.
    fn native_mode(&mut self) -> Result<ModeInfo>;

    fn set_mode(&mut self, mode: u16, linear: bool) -> Result<()>;

    fn select_bank(&mut self, bank: u16);

    fn linear_framebuffer(&mut self) -> Option<&mut [u8]>;

    /// The 64 KiB window the selected bank is mapped at.
    fn bank_window(&mut self) -> Option<&mut [u8]>;

    fn restore_text_mode(&mut self);

    /// Masks interrupts, returning whether they were enabled before.
    fn disable_interrupts(&mut self) -> bool;

    fn restore_interrupts(&mut self, were_enabled: bool);
}

/// Interrupts stay masked while this guard lives; dropping it restores the
/// previous state on every exit path.
pub struct CriticalSection<'d, A: VideoAdapter + ?Sized> {
    adapter: &'d mut A,
    were_enabled: bool,
}

impl<'d, A: VideoAdapter + ?Sized> CriticalSection<'d, A> {
    pub fn enter(adapter: &'d mut A) -> Self {
        let were_enabled = adapter.disable_interrupts();
        Self {
            adapter,
            were_enabled,
        }
    }
}

impl<A: VideoAdapter + ?Sized> Deref for CriticalSection<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.adapter
    }
}

impl<A: VideoAdapter + ?Sized> DerefMut for CriticalSection<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.adapter
    }
}

impl<A: VideoAdapter + ?Sized> Drop for CriticalSection<'_, A> {
    fn drop(&mut self) {
        self.adapter.restore_interrupts(self.were_enabled);
    }
}
