use crate::devices::display::adapter::VideoAdapter;

/// Remembers the bank last selected on the hardware so repeated selections
/// of the same bank cost nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BankSwitcher {
    current: Option<u16>,
}

impl BankSwitcher {
    pub const fn new() -> Self {
        Self { current: None }
    }

    pub fn current(&self) -> Option<u16> {
        self.current
    }

    /// Selects `bank`, returning whether the hardware was touched.
    pub fn set_bank<A: VideoAdapter + ?Sized>(&mut self, adapter: &mut A, bank: u16) -> bool {
        if self.current == Some(bank) {
            return false;
        }
        adapter.select_bank(bank);
        self.current = Some(bank);
        true
    }

    /// Forgets the memo, e.g. after a mode switch reset the hardware.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
