//! 8253/8254 PIT channel 0 as a periodic IRQ0 source.
use x86_64::instructions::port::Port;

const PIT_COMMAND: u16 = 0x43;
const PIT_CHANNEL_0: u16 = 0x40;
const PIT_INPUT_HZ: u32 = 1_193_182;
/// Channel 0, low/high byte access, mode 2 (rate generator), binary.
const PIT_MODE_RATE_GENERATOR: u8 = 0x36;

/// Programs channel 0 to fire `hz` times per second and returns the divisor
/// actually loaded.
pub fn set_frequency(hz: u32) -> u16 {
    let divisor = (PIT_INPUT_HZ / hz.max(1)).clamp(1, u32::from(u16::MAX)) as u16;
    let [low, high] = divisor.to_le_bytes();

    let mut command = Port::<u8>::new(PIT_COMMAND);
    let mut channel = Port::<u8>::new(PIT_CHANNEL_0);
    // SAFETY: fixed PIT ports, programmed before IRQ0 is unmasked.
    unsafe {
        command.write(PIT_MODE_RATE_GENERATOR);
        channel.write(low);
        channel.write(high);
    }
    divisor
}
