//! PS/2 keyboard: scancode queue fed from IRQ1 and a set-1 decoder.
use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::devices::input::KeySource;

const BUFFER_SIZE: usize = 256;

/// Single-producer single-consumer ring of raw scancodes.
///
/// The interrupt handler is the only producer and the refresh tick the only
/// consumer, so neither side ever takes a lock.
pub struct ScancodeQueue {
    slots: [AtomicU8; BUFFER_SIZE],
    head: AtomicUsize,
    tail: AtomicUsize,
}

/// Queue shared between the IRQ1 handler and the kernel main loop.
pub static SCANCODES: ScancodeQueue = ScancodeQueue::new();

impl ScancodeQueue {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU8::new(0) }; BUFFER_SIZE],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Enqueues a scancode; returns `false` and drops it when the ring is full.
    pub fn push(&self, scancode: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % BUFFER_SIZE;
        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }
        self.slots[head].store(scancode, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let scancode = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % BUFFER_SIZE, Ordering::Release);
        Some(scancode)
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }
}

impl Default for ScancodeQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub character: char,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

const EXTENDED_PREFIX: u8 = 0xE0;
const RELEASE_BIT: u8 = 0x80;
const LEFT_SHIFT: u8 = 0x2A;
const RIGHT_SHIFT: u8 = 0x36;
const CTRL: u8 = 0x1D;
const ALT: u8 = 0x38;

// Set-1 make codes 0x02..=0x35, unshifted and shifted. NUL marks keys
// without a printable character.
const PLAIN: &[u8; 0x34] = b"1234567890-=\x08\tqwertyuiop[]\n\0asdfghjkl;'`\0\\zxcvbnm,./";
const SHIFTED: &[u8; 0x34] = b"!@#$%^&*()_+\x08\tQWERTYUIOP{}\n\0ASDFGHJKL:\"~\0|ZXCVBNM<>?";
const FIRST_MAPPED: u8 = 0x02;
const SPACE: u8 = 0x39;

/// Translates set-1 scancodes into key events, tracking modifier state.
pub struct ScancodeDecoder {
    extended: bool,
    shift: bool,
    ctrl: bool,
    alt: bool,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        Self {
            extended: false,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }

    pub fn process_scancode(&mut self, scancode: u8) -> Option<KeyEvent> {
        if scancode == EXTENDED_PREFIX {
            self.extended = true;
            return None;
        }

        let released = scancode & RELEASE_BIT != 0;
        let code = scancode & !RELEASE_BIT;
        let extended = core::mem::replace(&mut self.extended, false);

        match code {
            LEFT_SHIFT | RIGHT_SHIFT => self.shift = !released,
            CTRL => self.ctrl = !released,
            ALT => self.alt = !released,
            _ if released || extended => {}
            _ => {
                return self.character(code).map(|character| KeyEvent {
                    character,
                    ctrl: self.ctrl,
                    alt: self.alt,
                    shift: self.shift,
                })
            }
        }
        None
    }

    fn character(&self, code: u8) -> Option<char> {
        if code == SPACE {
            return Some(' ');
        }
        let table = if self.shift { SHIFTED } else { PLAIN };
        let index = usize::from(code.checked_sub(FIRST_MAPPED)?);
        match table.get(index) {
            Some(0) | None => None,
            Some(&byte) => Some(byte as char),
        }
    }
}

impl Default for ScancodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Keyboard as seen by the refresh loop: drains a scancode queue through a
/// decoder.
pub struct Ps2Keyboard<'q> {
    queue: &'q ScancodeQueue,
    decoder: ScancodeDecoder,
}

impl<'q> Ps2Keyboard<'q> {
    pub const fn new(queue: &'q ScancodeQueue) -> Self {
        Self {
            queue,
            decoder: ScancodeDecoder::new(),
        }
    }

    /// Next full key event, skipping scancodes that decode to nothing.
    pub fn next_event(&mut self) -> Option<KeyEvent> {
        while let Some(scancode) = self.queue.pop() {
            if let Some(event) = self.decoder.process_scancode(scancode) {
                return Some(event);
            }
        }
        None
    }
}

impl KeySource for Ps2Keyboard<'_> {
    fn has_pending_key(&mut self) -> bool {
        !self.queue.is_empty()
    }

    fn read_key(&mut self) -> Option<char> {
        self.next_event().map(|event| event.character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo_and_drops_when_full() {
        let queue = ScancodeQueue::new();
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);

        for i in 0..BUFFER_SIZE - 1 {
            assert!(queue.push(i as u8));
        }
        assert!(!queue.push(0xFF));
        assert_eq!(queue.pop(), Some(0));
    }

    #[test]
    fn decodes_letters_digits_and_shift() {
        let mut decoder = ScancodeDecoder::new();
        assert_eq!(decoder.process_scancode(0x10).map(|e| e.character), Some('q'));
        assert_eq!(decoder.process_scancode(0x02).map(|e| e.character), Some('1'));
        assert_eq!(decoder.process_scancode(0x39).map(|e| e.character), Some(' '));

        assert_eq!(decoder.process_scancode(LEFT_SHIFT), None);
        let upper = decoder.process_scancode(0x10).unwrap();
        assert_eq!(upper.character, 'Q');
        assert!(upper.shift);
        assert_eq!(decoder.process_scancode(0x02).map(|e| e.character), Some('!'));
        assert_eq!(decoder.process_scancode(LEFT_SHIFT | RELEASE_BIT), None);
        assert_eq!(decoder.process_scancode(0x35).map(|e| e.character), Some('/'));
    }

    #[test]
    fn releases_modifiers_and_extended_keys_yield_nothing() {
        let mut decoder = ScancodeDecoder::new();
        assert_eq!(decoder.process_scancode(0x10 | RELEASE_BIT), None);
        assert_eq!(decoder.process_scancode(EXTENDED_PREFIX), None);
        assert_eq!(decoder.process_scancode(0x1C), None);
        assert_eq!(decoder.process_scancode(0x1C).map(|e| e.character), Some('\n'));
        assert_eq!(decoder.process_scancode(0x1D), None);
        assert!(decoder.process_scancode(0x2E).unwrap().ctrl);
    }

    #[test]
    fn keyboard_skips_undecodable_scancodes() {
        let queue = ScancodeQueue::new();
        queue.push(0x10 | RELEASE_BIT);
        queue.push(0x10);
        let mut keyboard = Ps2Keyboard::new(&queue);

        assert!(keyboard.has_pending_key());
        assert_eq!(keyboard.read_key(), Some('q'));
        assert!(!keyboard.has_pending_key());
        assert_eq!(keyboard.read_key(), None);
    }
}
