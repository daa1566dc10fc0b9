#![cfg_attr(not(test), no_std)]

mod traits;
mod status;
mod entry;
mod page;

pub use crate::traits::*;
pub use crate::status::*;
pub use crate::entry::*;
pub use crate::page::*;

/// Which page is currently shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Root,
    Page(u8),
    Browser,
}

impl Screen {
    /// Descriptor page this screen is decoded from, if any.
    pub fn descriptor_page(self) -> Option<u8> {
        match self {
            Screen::Root => Some(0),
            Screen::Page(n) => Some(n),
            Screen::Browser => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MenuTracker {
    pub selected: usize,
    pub screen: Screen,
}

#[cfg(test)]
mod tests {
    use log::info;
    use super::*;

    struct TestMenu {
        tracker: MenuTracker,
        page: MenuPage,
    }

    impl Menu for TestMenu {
        fn selected(&self) -> usize {
            self.tracker.selected
        }

        fn set_selected(&mut self, row: usize) {
            self.tracker.selected = row;
        }

        fn page(&self) -> &MenuPage {
            &self.page
        }
    }

    fn test_menu() -> TestMenu {
        let mut page = MenuPage::new();
        page.set(0, MenuEntry::new("Load", EntryKind::Callback(Action::Load)));
        page.set(2, MenuEntry::new("Scanlines: Off", EntryKind::Toggle(BitOption {
            shift: 0, mask: 1, count: 2, value: 0
        })));
        page.set_back();
        TestMenu { tracker: MenuTracker::default(), page }
    }

    #[test]
    fn test_navigation() {
        env_logger::init();
        let mut menu = test_menu();
        for entry in menu.page().entries() {
            info!("\t{:?}: {}", entry.kind, entry.label);
        }
        assert!(!menu.row_up());
        assert!(menu.row_down());
        assert_eq!(menu.selected(), 2);
        menu.consume_rows(4);
        assert_eq!(menu.selected(), BACK_ROW);
        assert!(!menu.row_down());
        menu.consume_rows(-1);
        assert_eq!(menu.selected(), 2);
    }

    #[test]
    fn test_clamp_after_rebuild() {
        let mut menu = test_menu();
        menu.set_selected(5);
        menu.clamp_selection();
        assert_eq!(menu.selected(), 2);
        menu.page.clear();
        menu.clamp_selection();
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_screen_pages() {
        assert_eq!(Screen::default().descriptor_page(), Some(0));
        assert_eq!(Screen::Page(3).descriptor_page(), Some(3));
        assert_eq!(Screen::Browser.descriptor_page(), None);
    }
}
