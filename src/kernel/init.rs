/// Kernel initialization phases
use gfx::config::DisplayConfig;
use gfx::println;

use crate::interrupts::{self, pic, pit};
use crate::kernel::status::{register_component, update_component_status, InitStatus};

pub const INTERRUPTS: &str = "Interrupt System";
pub const TIMER: &str = "System Timer";
pub const INPUT: &str = "Input Devices";
pub const DISPLAY: &str = "Display System";

/// Brings up everything the display session depends on: descriptor tables,
/// the PIC, the PIT tick and the keyboard line. Interrupts are enabled on
/// success.
pub fn init_kernel(config: &DisplayConfig) -> Result<(), &'static str> {
    for name in [INTERRUPTS, TIMER, INPUT, DISPLAY] {
        register_component(name)?;
    }
    println!("== gfx-kernel initialization ==");

    init_phase(INTERRUPTS, || {
        interrupts::init();
        Ok(())
    })?;
    init_phase(TIMER, || init_timer(config.timer_hz))?;
    init_phase(INPUT, || {
        pic::unmask(&[pic::InterruptIndex::Keyboard]);
        Ok(())
    })?;

    x86_64::instructions::interrupts::enable();
    Ok(())
}

/// Runs one named phase, tracking its status and logging the outcome.
pub fn init_phase<T>(
    name: &'static str,
    init: impl FnOnce() -> Result<T, &'static str>,
) -> Result<T, &'static str> {
    update_component_status(name, InitStatus::InProgress);
    log::info!("initializing {}...", name);

    match init() {
        Ok(value) => {
            update_component_status(name, InitStatus::Completed);
            log::info!("  {} ready", name);
            Ok(value)
        }
        Err(err) => {
            update_component_status(name, InitStatus::Failed(err));
            log::error!("  {} failed: {}", name, err);
            Err(err)
        }
    }
}

fn init_timer(hz: u32) -> Result<(), &'static str> {
    if hz == 0 {
        return Err("timer frequency must be non-zero");
    }
    let divisor = pit::set_frequency(hz);
    log::debug!("PIT divisor {} for {} Hz", divisor, hz);
    pic::unmask(&[pic::InterruptIndex::Timer]);
    Ok(())
}
