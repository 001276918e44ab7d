//! Video adapter over the boot loader's framebuffer.
//!
//! The boot loader leaves the display in a linear graphics mode and maps its
//! framebuffer for us. On Bochs and QEMU the DISPI registers behind ports
//! `0x1CE`/`0x1CF` can then switch to the VBE modes in [`KNOWN_MODES`] as
//! long as they fit in the mapped memory. Without DISPI only the native
//! mode is available.
use bootloader_api::info::{FrameBuffer, FrameBufferInfo, PixelFormat};
use x86_64::instructions::interrupts;
use x86_64::instructions::port::Port;

use crate::devices::display::adapter::{ControllerInfo, ModeInfo, VideoAdapter};
use crate::devices::framebuffer::ChannelOrder;
use crate::error::{GfxError, Result};

/// Pseudo mode number for the mode the boot loader set up.
pub const NATIVE_MODE: u16 = 0xFFFF;

/// VBE modes DISPI can emulate: number, width, height, depth.
pub const KNOWN_MODES: [(u16, usize, usize, u8); 4] = [
    (0x112, 640, 480, 24),
    (0x115, 800, 600, 24),
    (0x118, 1024, 768, 24),
    (0x11B, 1280, 1024, 24),
];

const DISPI_INDEX_PORT: u16 = 0x1CE;
const DISPI_DATA_PORT: u16 = 0x1CF;

const DISPI_ID: u16 = 0;
const DISPI_XRES: u16 = 1;
const DISPI_YRES: u16 = 2;
const DISPI_BPP: u16 = 3;
const DISPI_ENABLE: u16 = 4;
const DISPI_BANK: u16 = 5;
const DISPI_VIDEO_MEMORY_64K: u16 = 0xA;

const DISPI_ID_MIN: u16 = 0xB0C0;
const DISPI_ID_MAX: u16 = 0xB0C5;
const DISPI_ENABLED: u16 = 0x01;
const DISPI_LFB_ENABLED: u16 = 0x40;

/// Physical address of the legacy 64 KiB bank window.
const BANK_WINDOW_PHYS: u64 = 0xA0000;
const BANK_WINDOW_SIZE: usize = 64 * 1024;

pub struct BootAdapter<'fb> {
    framebuffer: &'fb mut [u8],
    native: FrameBufferInfo,
    bank_window: Option<&'fb mut [u8]>,
    index: Port<u16>,
    data: Port<u16>,
    dispi: bool,
    current: Option<ModeInfo>,
}

impl<'fb> BootAdapter<'fb> {
    /// Wraps the boot framebuffer. `physical_memory_offset` is where the boot
    /// loader mapped all of physical memory; it gives access to the bank
    /// window.
    pub fn new(framebuffer: &'fb mut FrameBuffer, physical_memory_offset: Option<u64>) -> Self {
        let native = framebuffer.info();
        let bank_window = physical_memory_offset.map(|offset| {
            let start = (offset + BANK_WINDOW_PHYS) as *mut u8;
            // SAFETY: the boot loader maps all physical memory at `offset`,
            // and nothing else in the kernel touches the legacy window.
            unsafe { core::slice::from_raw_parts_mut(start, BANK_WINDOW_SIZE) }
        });

        let mut adapter = Self {
            framebuffer: framebuffer.buffer_mut(),
            native,
            bank_window,
            index: Port::new(DISPI_INDEX_PORT),
            data: Port::new(DISPI_DATA_PORT),
            dispi: false,
            current: None,
        };
        let id = adapter.read_register(DISPI_ID);
        adapter.dispi = (DISPI_ID_MIN..=DISPI_ID_MAX).contains(&id);
        log::debug!(
            "display: boot framebuffer {}x{}, {} bytes/pixel, DISPI {}",
            native.width,
            native.height,
            native.bytes_per_pixel,
            if adapter.dispi { "present" } else { "absent" }
        );
        adapter
    }

    fn read_register(&mut self, register: u16) -> u16 {
        // SAFETY: DISPI ports are side-effect free to read; on machines
        // without DISPI the read returns garbage that fails the ID check.
        unsafe {
            self.index.write(register);
            self.data.read()
        }
    }

    fn write_register(&mut self, register: u16, value: u16) {
        // SAFETY: only called once DISPI has been detected.
        unsafe {
            self.index.write(register);
            self.data.write(value);
        }
    }

    fn base(&self) -> u64 {
        self.framebuffer.as_ptr() as u64
    }

    fn native_info(&self) -> Result<ModeInfo> {
        let order = match self.native.pixel_format {
            PixelFormat::Rgb => ChannelOrder::Rgb,
            PixelFormat::Bgr => ChannelOrder::Bgr,
            _ => return Err(GfxError::UnsupportedMode(NATIVE_MODE)),
        };
        let depth = u8::try_from(self.native.bytes_per_pixel * 8)
            .map_err(|_| GfxError::UnsupportedMode(NATIVE_MODE))?;
        Ok(ModeInfo {
            mode: NATIVE_MODE,
            width: self.native.width,
            height: self.native.height,
            depth,
            pitch: self.native.stride * self.native.bytes_per_pixel,
            base: self.base(),
            linear: true,
            order,
        })
    }
}

impl VideoAdapter for BootAdapter<'_> {
    fn controller_info(&mut self) -> Result<ControllerInfo> {
        let total_memory_kb = if self.dispi {
            u32::from(self.read_register(DISPI_VIDEO_MEMORY_64K)) * 64
        } else {
            u32::try_from(self.framebuffer.len() / 1024).unwrap_or(u32::MAX)
        };
        Ok(ControllerInfo {
            signature: ControllerInfo::SIGNATURE,
            version: 0x0300,
            total_memory_kb,
        })
    }

    fn mode_info(&mut self, mode: u16) -> Result<ModeInfo> {
        if mode == NATIVE_MODE {
            return self.native_info();
        }
        let &(mode, width, height, depth) = KNOWN_MODES
            .iter()
            .find(|known| known.0 == mode)
            .ok_or(GfxError::UnsupportedMode(mode))?;

        let pitch = width * usize::from(depth / 8);
        if !self.dispi || pitch * height > self.framebuffer.len() {
            return Err(GfxError::UnsupportedMode(mode));
        }
        Ok(ModeInfo {
            mode,
            width,
            height,
            depth,
            pitch,
            base: self.base(),
            linear: true,
            order: ChannelOrder::Bgr,
        })
    }

    fn native_mode(&mut self) -> Result<ModeInfo> {
        self.native_info()
    }

    fn set_mode(&mut self, mode: u16, linear: bool) -> Result<()> {
        let info = self.mode_info(mode)?;
        if mode != NATIVE_MODE {
            let width = u16::try_from(info.width).map_err(|_| GfxError::UnsupportedMode(mode))?;
            let height = u16::try_from(info.height).map_err(|_| GfxError::UnsupportedMode(mode))?;
            let enable = if linear {
                DISPI_ENABLED | DISPI_LFB_ENABLED
            } else {
                DISPI_ENABLED
            };

            self.write_register(DISPI_ENABLE, 0);
            self.write_register(DISPI_XRES, width);
            self.write_register(DISPI_YRES, height);
            self.write_register(DISPI_BPP, u16::from(info.depth));
            self.write_register(DISPI_ENABLE, enable);
        }
        self.current = Some(ModeInfo { linear, ..info });
        Ok(())
    }

    fn select_bank(&mut self, bank: u16) {
        if self.dispi {
            self.write_register(DISPI_BANK, bank);
        }
    }

    fn linear_framebuffer(&mut self) -> Option<&mut [u8]> {
        match self.current {
            Some(mode) if mode.linear => Some(&mut *self.framebuffer),
            _ => None,
        }
    }

    fn bank_window(&mut self) -> Option<&mut [u8]> {
        self.bank_window.as_deref_mut()
    }

    /// The boot loader never hands us a text console, so "text mode" is the
    /// native graphics mode it started in.
    fn restore_text_mode(&mut self) {
        if self.dispi && self.current.is_some_and(|mode| mode.mode != NATIVE_MODE) {
            self.write_register(DISPI_ENABLE, 0);
            if let Ok(native) = self.native_info() {
                let width = u16::try_from(native.width).unwrap_or(u16::MAX);
                let height = u16::try_from(native.height).unwrap_or(u16::MAX);
                self.write_register(DISPI_XRES, width);
                self.write_register(DISPI_YRES, height);
                self.write_register(DISPI_BPP, u16::from(native.depth));
                self.write_register(DISPI_ENABLE, DISPI_ENABLED | DISPI_LFB_ENABLED);
            }
        }
        self.current = None;
    }

    fn disable_interrupts(&mut self) -> bool {
        let were_enabled = interrupts::are_enabled();
        interrupts::disable();
        were_enabled
    }

    fn restore_interrupts(&mut self, were_enabled: bool) {
        if were_enabled {
            interrupts::enable();
        }
    }
}
