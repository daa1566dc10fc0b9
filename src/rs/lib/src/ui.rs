// Poll the keyboard, walk the menu and act on the selected rows.
//
// The current page is always rebuilt from its source (the core's descriptor
// or the working directory) after anything that could change it, so the
// rows never hold stale option values.
//

use log::{debug, info, warn};

use opts::*;
use romloader_hal::keyboard::{Key, KeyTracker, Keyboard};
use romloader_hal::spi::SerialChannel;
use romloader_hal::storage::StorageVolume;

use crate::browser::DirectoryBrowser;
use crate::confstr::{self, CoreName, Extensions};
use crate::transfer::{self, TransferError};
use crate::userio::{self, Joystick};

pub const MSG_LOADED: &str = "ROM LOADED";

pub struct Ui<S, V, K>
where
    S: SerialChannel,
    V: StorageVolume,
    K: Keyboard,
{
    pub spi: S,
    pub volume: V,
    pub keyboard: K,
    pub status: StatusRegister,
    keys: KeyTracker,
    page: MenuPage,
    tracker: MenuTracker,
    browser: DirectoryBrowser,
    core_name: CoreName,
    highest_page: u8,
    osd_visible: bool,
    joystick_port: Option<u8>,
    joystick: Joystick,
    message: Option<&'static str>,
}

impl<S, V, K> Menu for Ui<S, V, K>
where
    S: SerialChannel,
    V: StorageVolume,
    K: Keyboard,
{
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

impl<S, V, K> Ui<S, V, K>
where
    S: SerialChannel,
    V: StorageVolume,
    K: Keyboard,
{
    /// Read the core name and build the root page.
    pub fn new(mut spi: S, volume: V, keyboard: K) -> Self {
        let core_name = confstr::read_core_name(&mut spi);
        info!("ui: core '{}'", core_name);
        let mut ui = Self {
            spi,
            volume,
            keyboard,
            status: StatusRegister::default(),
            keys: KeyTracker::new(),
            page: MenuPage::new(),
            tracker: MenuTracker::default(),
            browser: DirectoryBrowser::new(),
            core_name,
            highest_page: 0,
            osd_visible: true,
            joystick_port: None,
            joystick: Joystick::empty(),
            message: None,
        };
        ui.show(Screen::Root);
        ui
    }

    /// Forward the arrow and modifier keys to joystick `port` while the OSD
    /// is hidden.
    pub fn enable_joystick(&mut self, port: u8) {
        self.joystick_port = Some(port);
    }

    pub fn screen(&self) -> Screen {
        self.tracker.screen
    }

    pub fn title(&self) -> &str {
        &self.core_name
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    pub fn osd_visible(&self) -> bool {
        self.osd_visible
    }

    pub fn highest_page(&self) -> u8 {
        self.highest_page
    }

    pub fn browser(&self) -> &DirectoryBrowser {
        &self.browser
    }

    pub fn show(&mut self, screen: Screen) {
        info!("ui: show {:?}", screen);
        self.tracker.screen = screen;
        self.tracker.selected = 0;
        self.rebuild();
    }

    /// Rebuild the rows of the current screen from their source.
    pub fn rebuild(&mut self) {
        match self.tracker.screen.descriptor_page() {
            Some(n) => {
                let mut extensions = Extensions::new();
                self.highest_page = confstr::decode(&mut self.spi, n, &mut self.page,
                                                    &self.status, &mut extensions);
                if n == 0 {
                    self.browser.set_extensions(&extensions);
                }
            }
            None => {
                self.browser.list(&mut self.volume, &mut self.page);
            }
        }
        self.clamp_selection();
    }

    /// Poll the keyboard and handle new presses. Returns true if the OSD
    /// should be redrawn.
    pub fn update(&mut self) -> bool {
        self.keys.update(&mut self.keyboard);

        if self.keys.poke(Key::F12) {
            self.osd_visible = !self.osd_visible;
            info!("ui: osd {}", if self.osd_visible { "on" } else { "off" });
            self.keys.clear_presses();
            if self.osd_visible {
                self.send_joystick(Joystick::empty());
            }
            return true;
        }

        if self.keys.poke(Key::F11) {
            if let Err(e) = self.autoload() {
                warn!("ui: reload failed: {:?}", e);
            }
            self.keys.clear_presses();
            return self.osd_visible;
        }

        if !self.osd_visible {
            let state = userio::joystick_from_keys(&self.keys);
            self.send_joystick(state);
            self.keys.clear_presses();
            return false;
        }

        if !self.keys.any_pressed() {
            return false;
        }
        self.message = None;

        let in_browser = self.tracker.screen == Screen::Browser;
        if self.keys.poke(Key::Up) {
            self.move_up();
        }
        if self.keys.poke(Key::Down) {
            self.move_down();
        }
        if in_browser && (self.keys.poke(Key::Left) || self.keys.poke(Key::PageUp)) {
            self.dispatch(Action::ScrollRoms(Scroll::PageUp));
        }
        if in_browser && (self.keys.poke(Key::Right) || self.keys.poke(Key::PageDown)) {
            self.dispatch(Action::ScrollRoms(Scroll::PageDown));
        }
        if self.keys.poke(Key::Enter) {
            self.select();
        }
        if self.keys.poke(Key::Escape) {
            self.dispatch(Action::Back);
        }
        self.keys.clear_presses();
        true
    }

    fn send_joystick(&mut self, state: Joystick) {
        let Some(port) = self.joystick_port else {
            return;
        };
        if state != self.joystick {
            self.joystick = state;
            userio::push_joystick(&mut self.spi, port, state);
        }
    }

    fn move_up(&mut self) {
        let in_browser = self.tracker.screen == Screen::Browser;
        if in_browser && self.selected() == 0 && self.browser.scroll_offset() > 0 {
            self.dispatch(Action::ScrollRoms(Scroll::LineUp));
        } else {
            self.row_up();
        }
    }

    fn move_down(&mut self) {
        let in_browser = self.tracker.screen == Screen::Browser;
        let listed = self.page.populated();
        if in_browser && listed == CONTENT_ROWS && self.selected() + 1 == listed {
            self.dispatch(Action::ScrollRoms(Scroll::LineDown));
        } else {
            self.row_down();
        }
    }

    /// Act on the selected row.
    pub fn select(&mut self) {
        let action = self.page.entry(self.selected()).action();
        self.dispatch(action);
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("ui: dispatch {:?}", action);
        match action {
            Action::None => {}
            Action::Load => {
                self.browser.reset();
                self.show(Screen::Browser);
            }
            Action::SelectRom(index) => {
                if let Some((entry, name)) = self.browser.resolve(&mut self.volume, index) {
                    info!("ui: selected {}", name);
                    self.message = Some(self.load_rom(&entry.short_name));
                    self.show(Screen::Root);
                }
            }
            Action::SelectDir(index) => {
                if self.browser.enter(&mut self.volume, index) {
                    self.tracker.selected = 0;
                    self.rebuild();
                }
            }
            Action::ScrollRoms(by) => {
                self.browser.scroll(by);
                self.rebuild();
            }
            Action::Submenu(page) => self.show(Screen::Page(page)),
            Action::Back => self.show(Screen::Root),
            Action::Toggle(option) => {
                option.next().write(&mut self.status);
                userio::push_status(&mut self.spi, &self.status);
                self.rebuild();
            }
        }
    }

    /// Load `file` from the working directory. Returns the text for the
    /// status line.
    pub fn load_rom(&mut self, file: &str) -> &'static str {
        match transfer::load(&mut self.spi, &mut self.volume, file) {
            Ok(size) => {
                info!("ui: loaded {} ({} bytes)", file, size);
                MSG_LOADED
            }
            Err(e) => {
                warn!("ui: loading {} failed: {:?}", file, e);
                e.into()
            }
        }
    }

    /// Load the core's default ROM (`NAME.ROM`) from the working directory.
    pub fn autoload(&mut self) -> Result<u32, TransferError> {
        let name = confstr::default_rom_name(&self.core_name)
            .ok_or(TransferError::FileNotFound)?;
        info!("ui: autoload {}", name);
        let result = transfer::load(&mut self.spi, &mut self.volume, &name);
        self.message = Some(match result {
            Ok(_) => MSG_LOADED,
            Err(e) => e.into(),
        });
        result
    }
}
