use crate::entry::MenuEntry;
use crate::traits::*;

/// One screen of menu rows. Rebuilding a page replaces all of its rows.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MenuPage {
    rows: [MenuEntry; MENU_ROWS],
}

impl MenuPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.blank_from(0);
    }

    pub fn blank_from(&mut self, row: usize) {
        for entry in self.rows.iter_mut().skip(row) {
            *entry = MenuEntry::null();
        }
    }

    /// Replace `row`. Rows past the end are ignored.
    pub fn set(&mut self, row: usize, entry: MenuEntry) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = entry;
        }
    }

    pub fn set_back(&mut self) {
        self.rows[BACK_ROW] = MenuEntry::back();
    }

    pub fn entry(&self, row: usize) -> &MenuEntry {
        &self.rows[row]
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.rows
    }

    /// Number of non-blank content rows.
    pub fn populated(&self) -> usize {
        self.rows[..CONTENT_ROWS].iter().filter(|e| e.is_selectable()).count()
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.rows.iter().position(MenuEntry::is_selectable)
    }

    pub fn next_selectable(&self, from: usize) -> Option<usize> {
        (from + 1..MENU_ROWS).find(|n| self.rows[*n].is_selectable())
    }

    pub fn prev_selectable(&self, from: usize) -> Option<usize> {
        (0..from.min(MENU_ROWS)).rev().find(|n| self.rows[*n].is_selectable())
    }
}
