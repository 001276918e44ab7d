#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]
#![cfg_attr(target_os = "none", feature(abi_x86_interrupt))]

#[cfg(target_os = "none")]
extern crate alloc;
#[cfg(target_os = "none")]
extern crate rlibc;

#[cfg(target_os = "none")]
mod desktop;
#[cfg(target_os = "none")]
mod interrupts;
#[cfg(target_os = "none")]
mod kernel;
#[cfg(target_os = "none")]
mod memory;

#[cfg(target_os = "none")]
use bootloader_api::{
    config::{BootloaderConfig, Mapping},
    entry_point, BootInfo,
};
#[cfg(target_os = "none")]
use gfx::{
    config::{DisplayConfig, SceneConfig},
    devices::{
        display::{BootAdapter, Screen},
        drivers::{Ps2Keyboard, SCANCODES},
    },
    timer::{self, Timers},
};

#[cfg(target_os = "none")]
pub static BOOTLOADER_CONFIG: BootloaderConfig = {
    let mut config = BootloaderConfig::new_default();
    // The bank window is reached through the physical memory mapping.
    config.mappings.physical_memory = Some(Mapping::Dynamic);
    config.kernel_stack_size = 256 * 1024;
    config.frame_buffer.minimum_framebuffer_width = Some(1024);
    config.frame_buffer.minimum_framebuffer_height = Some(768);
    config
};

#[cfg(target_os = "none")]
entry_point!(kernel_main, config = &BOOTLOADER_CONFIG);

#[cfg(target_os = "none")]
fn kernel_main(boot_info: &'static mut BootInfo) -> ! {
    if gfx::logger::init(log::LevelFilter::Info).is_err() {
        halt_loop();
    }
    log::info!("gfx-kernel {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = memory::init_heap() {
        log::error!("failed to init heap: {}", err);
        halt_loop();
    }
    memory::memory_stats(boot_info);

    let config = DisplayConfig::default();
    if let Err(err) = kernel::init_kernel(&config) {
        log::error!("kernel initialization failed: {}", err);
        halt_loop();
    }

    let physical_memory_offset = boot_info.physical_memory_offset.as_ref().copied();
    let Some(framebuffer) = boot_info.framebuffer.as_mut() else {
        log::error!("boot loader provided no framebuffer");
        halt_loop();
    };
    let mut adapter = BootAdapter::new(framebuffer, physical_memory_offset);

    let session = kernel::init_phase(kernel::init::DISPLAY, || {
        let screen = Screen::switch_to_graphics(&mut adapter, &config, SceneConfig::standard())
            .map_err(|err| err.as_str())?;
        desktop::Session::new(screen, adapter, Ps2Keyboard::new(&SCANCODES))
            .map_err(|err| err.as_str())
    });
    let mut session = match session {
        Ok(session) => session,
        Err(_) => halt_loop(),
    };
    kernel::status::report();
    if kernel::status::all_components_ready() {
        log::info!("heap in use after boot: {} KiB", memory::heap_used() / 1024);
    }

    let mut timers = match Timers::new() {
        Ok(timers) => timers,
        Err(err) => {
            log::error!("timer table: {}", err);
            halt_loop();
        }
    };
    if let Err(err) =
        session
            .screen
            .setup_refresh(&mut timers, desktop::refresh_tick, config.refresh_period)
    {
        log::error!("cannot schedule refresh: {}", err);
        halt_loop();
    }

    // First frame now rather than one period from now.
    desktop::refresh_tick(&mut session);
    while !session.is_finished() {
        timers.run_due(timer::ticks(), &mut session);
        x86_64::instructions::hlt();
    }

    log::info!("graphics session closed");
    halt_loop()
}

#[cfg(target_os = "none")]
fn halt_loop() -> ! {
    loop {
        x86_64::instructions::hlt();
    }
}

#[cfg(target_os = "none")]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    gfx::println!("PANIC: {} | {:?}", info.message(), info.location());
    x86_64::instructions::interrupts::disable();
    halt_loop()
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("gfx-kernel runs on bare metal; build it for an x86_64-unknown-none target");
}
