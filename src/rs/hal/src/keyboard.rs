use strum_macros::{EnumIter, IntoStaticStr};
use strum::IntoEnumIterator;

/// Keys the loader reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Enter,
    Escape,
    F11,
    F12,
    RightCtrl,
    RightShift,
    AltGr,
}

impl Key {
    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

pub trait Keyboard {
    /// Drain pending scan codes into the key state.
    fn poll(&mut self) {}

    fn is_down(&self, key: Key) -> bool;
}

/// Turns the polled key state into press events.
#[derive(Debug, Default, Clone)]
pub struct KeyTracker {
    down: u32,
    pending_press: u32,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update<K: Keyboard + ?Sized>(&mut self, keyboard: &mut K) {
        keyboard.poll();
        let mut down = 0u32;
        for key in Key::iter() {
            if keyboard.is_down(key) {
                down |= key.bit();
            }
        }
        self.pending_press |= down & !self.down;
        self.down = down;
    }

    /// Check for a pending press of `key` and clear it.
    pub fn poke(&mut self, key: Key) -> bool {
        let pressed = self.pending_press & key.bit() != 0;
        self.pending_press &= !key.bit();
        pressed
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down & key.bit() != 0
    }

    pub fn any_pressed(&self) -> bool {
        self.pending_press != 0
    }

    /// Drop presses that were not handled.
    pub fn clear_presses(&mut self) {
        self.pending_press = 0;
    }
}
