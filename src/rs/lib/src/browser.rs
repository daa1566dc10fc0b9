//! Paged listing of the working directory, shown as menu rows.

use log::{debug, info};

use opts::*;
use romloader_hal::storage::{DirEntry, LongName, StorageVolume};

use crate::confstr::Extensions;

/// Marks directory rows.
pub const DIR_GLYPH: char = '>';

#[derive(Debug, Default, Clone)]
pub struct DirectoryBrowser {
    scroll_offset: usize,
    extensions: Extensions,
}

impl DirectoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Only list files with one of `extensions`. An empty filter lists every
    /// file.
    pub fn set_extensions(&mut self, extensions: &Extensions) {
        self.extensions = extensions.clone();
    }

    pub fn accepts(&self, entry: &DirEntry) -> bool {
        if entry.is_empty() || entry.short_name.as_str() == "." {
            return false;
        }
        if entry.is_dir || self.extensions.is_empty() {
            return true;
        }
        let ext = entry.extension();
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Fill `page` with the accepted entries from the `scroll_offset`-th on.
    /// Returns the number of rows listed.
    pub fn list<V: StorageVolume>(&self, volume: &mut V, page: &mut MenuPage) -> usize {
        page.clear();
        let mut accepted = 0usize;
        let mut row = 0usize;
        let mut slot = 0usize;
        while row < CONTENT_ROWS {
            let Some(entry) = volume.next_entry(slot) else {
                break;
            };
            slot += 1;
            if !self.accepts(&entry) {
                continue;
            }
            accepted += 1;
            if accepted <= self.scroll_offset {
                continue;
            }
            let name = volume.long_name(&entry);
            page.set(row, Self::row(&entry, &name, row));
            row += 1;
        }
        page.set_back();
        debug!("browser: {} rows from offset {}", row, self.scroll_offset);
        row
    }

    fn row(entry: &DirEntry, name: &str, index: usize) -> MenuEntry {
        let mut label = LabelString::new();
        let action = if entry.is_dir {
            label.push(DIR_GLYPH).ok();
            Action::SelectDir(index)
        } else {
            Action::SelectRom(index)
        };
        push_truncated(&mut label, name);
        MenuEntry { label, kind: EntryKind::Callback(action) }
    }

    /// Move the listing window. The caller re-lists afterwards.
    pub fn scroll(&mut self, by: Scroll) {
        self.scroll_offset = match by {
            Scroll::LineUp => self.scroll_offset.saturating_sub(1),
            Scroll::PageUp => self.scroll_offset.saturating_sub(Scroll::PAGE),
            // Past-the-end offsets are fine, the listing comes out blank.
            Scroll::LineDown => self.scroll_offset.saturating_add(1),
            Scroll::PageDown => self.scroll_offset.saturating_add(Scroll::PAGE),
        };
        debug!("browser: scroll {} to {}", <&'static str>::from(by), self.scroll_offset);
    }

    /// Entry shown in row `index` of the current listing, with its long name.
    pub fn resolve<V: StorageVolume>(&self, volume: &mut V, index: usize)
        -> Option<(DirEntry, LongName)> {
        if index >= CONTENT_ROWS {
            return None;
        }
        let target = self.scroll_offset + index;
        let mut accepted = 0usize;
        let mut slot = 0usize;
        loop {
            let entry = volume.next_entry(slot)?;
            slot += 1;
            if !self.accepts(&entry) {
                continue;
            }
            if accepted == target {
                let name = volume.long_name(&entry);
                return Some((entry, name));
            }
            accepted += 1;
        }
    }

    /// Change into the directory listed in row `index`.
    pub fn enter<V: StorageVolume>(&mut self, volume: &mut V, index: usize) -> bool {
        match self.resolve(volume, index) {
            Some((entry, name)) if entry.is_dir => {
                info!("browser: enter {}", name);
                volume.change_directory(&entry);
                self.scroll_offset = 0;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use crate::confstr::Extension;
    use romloader_hal::dummy::{MemEntry, MemVolume};

    fn exts(list: &[&str]) -> Extensions {
        list.iter().map(|e| Extension::from_str(e).unwrap()).collect()
    }

    fn volume() -> MemVolume {
        MemVolume::new(vec![
            MemEntry::dir(".", vec![]),
            MemEntry::file("ALPHA.ROM", "Alpha Centauri.rom", vec![1; 100]),
            MemEntry::empty(),
            MemEntry::dir("GAMES", vec![
                MemEntry::file("PONG.BIN", "Pong.bin", vec![2; 10]),
            ]),
            MemEntry::file("README.TXT", "", vec![3; 10]),
            MemEntry::file("B.BIN", "", vec![4; 10]),
        ])
    }

    fn many_files(n: usize) -> MemVolume {
        MemVolume::new((0..n).map(|i| {
            let name = format!("F{:02}.ROM", i);
            MemEntry::file(&name, "", vec![0; 4])
        }).collect())
    }

    fn labels(page: &MenuPage) -> Vec<&str> {
        page.entries().iter().map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn test_list_filters_entries() {
        let mut vol = volume();
        let mut browser = DirectoryBrowser::new();
        browser.set_extensions(&exts(&["bin", "rom"]));
        let mut page = MenuPage::new();
        assert_eq!(browser.list(&mut vol, &mut page), 3);
        assert_eq!(labels(&page), ["Alpha Centauri.rom", ">GAMES", "B.BIN", "", "", "", "", "Back"]);
        assert_eq!(page.entry(0).action(), Action::SelectRom(0));
        assert_eq!(page.entry(1).action(), Action::SelectDir(1));
        assert_eq!(page.entry(2).action(), Action::SelectRom(2));
        assert_eq!(page.entry(BACK_ROW).action(), Action::Back);

        browser.set_extensions(&Extensions::new());
        assert_eq!(browser.list(&mut vol, &mut page), 4);
        assert_eq!(page.entry(2).label.as_str(), "README.TXT");
    }

    #[test]
    fn test_scroll_clamps_at_zero() {
        let mut vol = many_files(20);
        let mut browser = DirectoryBrowser::new();
        let mut page = MenuPage::new();
        assert_eq!(browser.list(&mut vol, &mut page), CONTENT_ROWS);

        browser.scroll(Scroll::PageDown);
        assert_eq!(browser.list(&mut vol, &mut page), 4);
        assert_eq!(page.entry(0).label.as_str(), "F16.ROM");
        assert_eq!(page.entry(4).kind, EntryKind::Null);

        browser.scroll(Scroll::PageDown);
        assert_eq!(browser.scroll_offset(), 32);
        assert_eq!(browser.list(&mut vol, &mut page), 0);
        assert_eq!(page.entry(BACK_ROW).action(), Action::Back);

        browser.scroll(Scroll::PageUp);
        browser.scroll(Scroll::PageUp);
        assert_eq!(browser.scroll_offset(), 0);
        browser.scroll(Scroll::LineDown);
        browser.scroll(Scroll::LineDown);
        browser.scroll(Scroll::PageUp);
        assert_eq!(browser.scroll_offset(), 0);
        browser.scroll(Scroll::LineUp);
        assert_eq!(browser.scroll_offset(), 0);
    }

    #[test]
    fn test_resolve_follows_offset() {
        let mut vol = many_files(10);
        let mut browser = DirectoryBrowser::new();
        browser.scroll(Scroll::LineDown);
        browser.scroll(Scroll::LineDown);
        let (entry, name) = browser.resolve(&mut vol, 3).unwrap();
        assert_eq!(entry.short_name.as_str(), "F05.ROM");
        assert_eq!(name.as_str(), "F05.ROM");
        assert!(browser.resolve(&mut vol, 8).is_none());
        assert!(browser.resolve(&mut vol, BACK_ROW).is_none());
    }

    #[test]
    fn test_enter_and_leave_directory() {
        let mut vol = volume();
        let mut browser = DirectoryBrowser::new();
        browser.set_extensions(&exts(&["BIN", "ROM"]));
        let mut page = MenuPage::new();

        assert!(!browser.enter(&mut vol, 0));
        browser.scroll(Scroll::LineDown);
        assert!(browser.enter(&mut vol, 0));
        assert_eq!(vol.depth(), 1);
        assert_eq!(browser.scroll_offset(), 0);

        assert_eq!(browser.list(&mut vol, &mut page), 2);
        assert_eq!(labels(&page)[..2], [">..", "Pong.bin"]);
        assert!(browser.enter(&mut vol, 0));
        assert_eq!(vol.depth(), 0);
    }
}
