//! # Programmable Interrupt Controller (8259 PIC)
//!
//! IRQ 0-15 are remapped past the CPU exception vectors:
//! - PIC 1: vectors 32-39 (IRQ 0-7)
//! - PIC 2: vectors 40-47 (IRQ 8-15)
//!
//! Every line starts masked; the kernel unmasks the timer and the keyboard
//! once their handlers are installed.
use pic8259::ChainedPics;
use spin::Mutex;

pub const PIC_1_OFFSET: u8 = 32;
pub const PIC_2_OFFSET: u8 = 40;

pub static PICS: Mutex<ChainedPics> =
    Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) });

/// Vector numbers the CPU sees for the IRQs we handle.
#[derive(Debug, Clone, Copy)]
#[repr(u8)]
pub enum InterruptIndex {
    Timer = PIC_1_OFFSET,
    Keyboard = PIC_1_OFFSET + 1,
}

impl InterruptIndex {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn irq(self) -> u8 {
        self.as_u8() - PIC_1_OFFSET
    }
}

/// Clears the mask bit of each listed IRQ line.
pub fn unmask(lines: &[InterruptIndex]) {
    let mut pics = PICS.lock();
    // SAFETY: reading and writing the mask registers has no other effect.
    unsafe {
        let [mut primary, mut secondary] = pics.read_masks();
        for line in lines {
            match line.irq() {
                irq @ 0..=7 => primary &= !(1 << irq),
                irq => secondary &= !(1 << (irq - 8)),
            }
        }
        pics.write_masks(primary, secondary);
    }
}

pub fn end_of_interrupt(index: InterruptIndex) {
    // SAFETY: only called at the end of the matching handler.
    unsafe { PICS.lock().notify_end_of_interrupt(index.as_u8()) };
}
