//! # Interrupt Handling Module
//!
//! - **GDT**: Global Descriptor Table with a TSS for the double-fault stack
//! - **IDT**: exception handlers plus the two IRQs the display core needs
//! - **PIC**: 8259 remapping, masking and EOI
//! - **PIT**: channel 0 programmed as the system tick source
//!
//! ## Interrupt Vector Layout
//!
//! | Vector | Type            | Handler                    |
//! |--------|-----------------|----------------------------|
//! | 0-31   | CPU Exceptions  | divide, page fault, etc.   |
//! | 32     | Timer (IRQ0)    | timer_interrupt_handler    |
//! | 33     | Keyboard (IRQ1) | keyboard_interrupt_handler |

use crate::interrupts::{interrupts::init_idt, pic::PICS};

pub mod gdt;
pub mod interrupts;
pub mod pic;
pub mod pit;

pub fn init() {
    gdt::init();
    init_idt();
    // SAFETY: called once, before interrupts are enabled.
    unsafe { PICS.lock().initialize() };
}
