//! System tick counter and periodic callbacks.
//!
//! The PIT interrupt only advances [`TICKS`]. Callbacks registered in a
//! [`Timers`] table run from the kernel main loop through [`Timers::run_due`],
//! never in interrupt context, so they are free to take locks and allocate.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GfxError, Result};

/// Default number of callback slots.
pub const MAX_CALLBACKS: usize = 16;

static TICKS: AtomicU64 = AtomicU64::new(0);

/// Advances the global tick counter; called from the timer interrupt.
pub fn tick() -> u64 {
    TICKS.fetch_add(1, Ordering::Relaxed) + 1
}

pub fn ticks() -> u64 {
    TICKS.load(Ordering::Relaxed)
}

/// What a callback wants done with its registration after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerControl {
    Continue,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    slot: usize,
    generation: u32,
}

struct Entry<C> {
    callback: fn(&mut C) -> TimerControl,
    period: u64,
    repeating: bool,
    deadline: u64,
}

struct Slot<C> {
    generation: u32,
    entry: Option<Entry<C>>,
}

/// Fixed-size table of tick-based callbacks over a context `C`.
///
/// The context is handed to each callback when it fires, which replaces the
/// untyped context pointer a C-style timer API would carry.
pub struct Timers<C> {
    slots: Vec<Slot<C>>,
}

impl<C> Timers<C> {
    pub fn new() -> Result<Self> {
        Self::with_capacity(MAX_CALLBACKS)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.extend((0..capacity).map(|_| Slot {
            generation: 0,
            entry: None,
        }));
        Ok(Self { slots })
    }

    /// Registers `callback` to fire `period` ticks after `now` (a period of
    /// zero is treated as one tick).
    pub fn register_periodic(
        &mut self,
        callback: fn(&mut C) -> TimerControl,
        period: u64,
        repeating: bool,
        now: u64,
    ) -> Result<TimerHandle> {
        let period = period.max(1);
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.entry.is_none())
            .ok_or(GfxError::ResourceExhausted)?;

        slot.entry = Some(Entry {
            callback,
            period,
            repeating,
            deadline: now.saturating_add(period),
        });
        log::debug!("timer: slot {} armed, period {} ticks", index, period);

        Ok(TimerHandle {
            slot: index,
            generation: slot.generation,
        })
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> Result<()> {
        let slot = self.live_slot(handle).ok_or(GfxError::NotFound)?;
        Self::vacate(slot);
        Ok(())
    }

    pub fn is_registered(&self, handle: TimerHandle) -> bool {
        self.slots
            .get(handle.slot)
            .is_some_and(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    /// Runs every callback whose deadline is at or before `now`, once each.
    /// Repeating callbacks are re-armed one period after `now`; one-shots and
    /// callbacks returning [`TimerControl::Cancel`] are dropped.
    pub fn run_due(&mut self, now: u64, ctx: &mut C) -> usize {
        let mut fired = 0;
        for slot in self.slots.iter_mut() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            if entry.deadline > now {
                continue;
            }

            fired += 1;
            let control = (entry.callback)(ctx);
            if entry.repeating && control == TimerControl::Continue {
                entry.deadline = now.saturating_add(entry.period);
            } else {
                Self::vacate(slot);
            }
        }
        fired
    }

    fn live_slot(&mut self, handle: TimerHandle) -> Option<&mut Slot<C>> {
        self.slots
            .get_mut(handle.slot)
            .filter(|slot| slot.generation == handle.generation && slot.entry.is_some())
    }

    fn vacate(slot: &mut Slot<C>) {
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
    }
}
