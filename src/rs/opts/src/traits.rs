use heapless::String;

use crate::page::MenuPage;

/// Rows of one menu page, including the reserved back row.
pub const MENU_ROWS:    usize = 8;
/// Rows filled from the descriptor or the directory listing.
pub const CONTENT_ROWS: usize = MENU_ROWS - 1;
/// Row forced to "Back" on every page except the root.
pub const BACK_ROW:     usize = MENU_ROWS - 1;
pub const MAX_LABEL:    usize = 32;

pub type LabelString = String<MAX_LABEL>;

/// Something that shows one `MenuPage` with a selected row.
pub trait Menu {
    fn selected(&self) -> usize;
    fn set_selected(&mut self, row: usize);
    fn page(&self) -> &MenuPage;
}

pub trait MenuNavigation {
    /// Move to the previous selectable row. False if there is none.
    fn row_up(&mut self) -> bool;
    /// Move to the next selectable row. False if there is none.
    fn row_down(&mut self) -> bool;
    /// Put the selection back onto a selectable row after a rebuild.
    fn clamp_selection(&mut self);
    fn consume_rows(&mut self, rows: i8);
}

impl<T> MenuNavigation for T
where
    T: Menu,
{
    fn row_up(&mut self) -> bool {
        match self.page().prev_selectable(self.selected()) {
            Some(row) => {
                self.set_selected(row);
                true
            }
            None => false,
        }
    }

    fn row_down(&mut self) -> bool {
        match self.page().next_selectable(self.selected()) {
            Some(row) => {
                self.set_selected(row);
                true
            }
            None => false,
        }
    }

    fn clamp_selection(&mut self) {
        let page = self.page();
        let selected = self.selected();
        if selected < MENU_ROWS && page.entry(selected).is_selectable() {
            return;
        }
        let row = page.prev_selectable(selected.min(MENU_ROWS))
            .or_else(|| page.first_selectable())
            .unwrap_or(0);
        self.set_selected(row);
    }

    fn consume_rows(&mut self, rows: i8) {
        if rows >= 1 {
            for _ in 0..rows {
                self.row_down();
            }
        }
        if rows <= -1 {
            for _ in rows..0 {
                self.row_up();
            }
        }
    }
}
