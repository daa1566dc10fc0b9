use strum_macros::IntoStaticStr;

use crate::status::StatusRegister;
use crate::traits::*;

/// Option backed by a bit-range of the `StatusRegister`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitOption {
    pub shift: u8,
    pub mask: u32,
    /// Number of values the option cycles through.
    pub count: u32,
    /// Value read from the status register when the row was built.
    pub value: u32,
}

impl BitOption {
    /// Mask covering bits `low..=high`, if that is a valid range of a `u32`.
    pub fn mask_for(low: u8, high: u8) -> Option<u32> {
        if high < low || high > 31 {
            return None;
        }
        Some(u32::MAX >> (31 - (high - low)))
    }

    pub fn read(status: &StatusRegister, shift: u8, mask: u32, count: u32) -> Self {
        Self {
            shift,
            mask,
            count,
            value: status.bits(shift, mask),
        }
    }

    /// The option advanced by one value, wrapping at `count`.
    pub fn next(&self) -> Self {
        Self {
            value: (self.value + 1) % self.count.max(1),
            ..*self
        }
    }

    pub fn write(&self, status: &mut StatusRegister) {
        status.set_bits(self.shift, self.mask, self.value);
    }
}

/// Scroll steps of the directory listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Scroll {
    LineUp,
    PageUp,
    LineDown,
    PageDown,
}

impl Scroll {
    pub const PAGE: usize = 16;
}

/// Everything selecting a row can do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    /// Enter the directory browser.
    Load,
    /// Load the n-th listed file.
    SelectRom(usize),
    /// Descend into the n-th listed directory.
    SelectDir(usize),
    ScrollRoms(Scroll),
    Submenu(u8),
    Back,
    Toggle(BitOption),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EntryKind {
    #[default]
    Null,
    Callback(Action),
    Cycle(BitOption),
    Toggle(BitOption),
    Submenu(u8),
}

/// One row of a menu page.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MenuEntry {
    pub label: LabelString,
    pub kind: EntryKind,
}

impl MenuEntry {
    pub fn null() -> Self {
        Self::default()
    }

    /// Entry labelled with `label`, truncated to the label capacity.
    pub fn new(label: &str, kind: EntryKind) -> Self {
        let mut s = LabelString::new();
        push_truncated(&mut s, label);
        Self { label: s, kind }
    }

    pub fn back() -> Self {
        Self::new("Back", EntryKind::Submenu(0))
    }

    pub fn is_selectable(&self) -> bool {
        self.kind != EntryKind::Null
    }

    pub fn action(&self) -> Action {
        match self.kind {
            EntryKind::Null => Action::None,
            EntryKind::Callback(action) => action,
            EntryKind::Cycle(option) | EntryKind::Toggle(option) => Action::Toggle(option),
            EntryKind::Submenu(0) => Action::Back,
            EntryKind::Submenu(page) => Action::Submenu(page),
        }
    }
}

/// Append as much of `text` as fits. Returns false if anything was dropped.
pub fn push_truncated<const N: usize>(s: &mut heapless::String<N>, text: &str) -> bool {
    for c in text.chars() {
        if s.push(c).is_err() {
            return false;
        }
    }
    true
}
