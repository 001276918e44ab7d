//! # Interrupt Descriptor Table and Handlers
//!
//! | Exception              | Action                        |
//! |------------------------|-------------------------------|
//! | Breakpoint (#BP)       | Log, continue                 |
//! | Page Fault (#PF)       | Log the faulting address, panic |
//! | Divide Error (#DE)     | Panic                         |
//! | Invalid Opcode (#UD)   | Panic                         |
//! | General Protection     | Panic with error code         |
//! | Double Fault (#DF)     | Panic (uses IST stack)        |
//!
//! The two hardware handlers do the minimum: IRQ0 advances the tick counter,
//! IRQ1 queues the raw scancode. Everything else happens in the main loop.
use gfx::devices::drivers::SCANCODES;
use spin::Lazy;
use x86_64::instructions::port::Port;
use x86_64::structures::idt::{InterruptDescriptorTable, InterruptStackFrame, PageFaultErrorCode};

use crate::interrupts::gdt;
use crate::interrupts::pic::{end_of_interrupt, InterruptIndex};

const PS2_DATA_PORT: u16 = 0x60;

static IDT: Lazy<InterruptDescriptorTable> = Lazy::new(|| {
    let mut idt = InterruptDescriptorTable::new();

    idt.breakpoint.set_handler_fn(breakpoint_handler);
    idt.page_fault.set_handler_fn(page_fault_handler);
    idt.divide_error.set_handler_fn(divide_error_handler);
    idt.invalid_opcode.set_handler_fn(invalid_opcode_handler);
    idt.general_protection_fault
        .set_handler_fn(general_protection_fault_handler);
    // SAFETY: the IST index refers to the stack set up in the TSS.
    unsafe {
        idt.double_fault
            .set_handler_fn(double_fault_handler)
            .set_stack_index(gdt::DOUBLE_FAULT_IST_INDEX);
    }

    idt[InterruptIndex::Timer.as_u8()].set_handler_fn(timer_interrupt_handler);
    idt[InterruptIndex::Keyboard.as_u8()].set_handler_fn(keyboard_interrupt_handler);

    idt
});

pub fn init_idt() {
    IDT.load();
}

extern "x86-interrupt" fn breakpoint_handler(stack_frame: InterruptStackFrame) {
    log::warn!("EXCEPTION: BREAKPOINT\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn divide_error_handler(stack_frame: InterruptStackFrame) {
    panic!("EXCEPTION: DIVIDE BY ZERO\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn invalid_opcode_handler(stack_frame: InterruptStackFrame) {
    panic!("EXCEPTION: INVALID OPCODE\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn general_protection_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) {
    panic!(
        "EXCEPTION: GENERAL PROTECTION FAULT (error code: {})\n{:#?}",
        error_code, stack_frame
    );
}

extern "x86-interrupt" fn double_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: u64,
) -> ! {
    panic!("EXCEPTION: DOUBLE FAULT (code {})\n{:#?}", error_code, stack_frame);
}

extern "x86-interrupt" fn page_fault_handler(
    stack_frame: InterruptStackFrame,
    error_code: PageFaultErrorCode,
) {
    use x86_64::registers::control::Cr2;

    log::error!("EXCEPTION: PAGE FAULT at {:?} ({:?})", Cr2::read(), error_code);
    panic!("page fault\n{:#?}", stack_frame);
}

extern "x86-interrupt" fn timer_interrupt_handler(_stack_frame: InterruptStackFrame) {
    gfx::timer::tick();
    end_of_interrupt(InterruptIndex::Timer);
}

extern "x86-interrupt" fn keyboard_interrupt_handler(_stack_frame: InterruptStackFrame) {
    let mut port = Port::<u8>::new(PS2_DATA_PORT);
    // SAFETY: reading the PS/2 data port acknowledges the byte.
    let scancode = unsafe { port.read() };
    // A full queue drops the scancode; the main loop is behind anyway.
    SCANCODES.push(scancode);
    end_of_interrupt(InterruptIndex::Keyboard);
}
