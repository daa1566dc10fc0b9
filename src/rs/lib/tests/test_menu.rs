use std::sync::Once;

use opts::*;
use romloader_hal::constants::*;
use romloader_hal::dummy::{HeldKeys, MemEntry, MemVolume, ScriptedChannel};
use romloader_hal::keyboard::Key;
use romloader_hal::spi::Channel;
use romloader_lib::ui::{Ui, MSG_LOADED};

static INIT: Once = Once::new();

fn setup_logger() {
    INIT.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}

const CONF: &str = "SAMCOUPE;ROM;Fbin,rom,;P1,Video;P2,Audio;O3,Ignored,Off,On;\
                    P10,Scanlines,Off,On;P123,Colour,PAL,NTSC,Mono;P24,Stereo,Off,On;";

type TestUi = Ui<ScriptedChannel, MemVolume, HeldKeys>;

fn volume() -> MemVolume {
    MemVolume::new(vec![
        MemEntry::file("GAME.ROM", "Some Game.rom", vec![0x5a; 1000]),
        MemEntry::file("NOTES.TXT", "", vec![0; 10]),
        MemEntry::dir("DEMOS", vec![
            MemEntry::file("DEMO1.BIN", "First Demo.bin", vec![0xa5; 3000]),
        ]),
    ])
}

fn ui() -> TestUi {
    setup_logger();
    Ui::new(ScriptedChannel::new(CONF), volume(), HeldKeys::default())
}

fn press(ui: &mut TestUi, key: Key) {
    ui.keyboard.hold(key);
    ui.update();
    ui.keyboard.release_all();
    ui.update();
}

fn labels(ui: &TestUi) -> Vec<String> {
    ui.page().entries().iter().map(|e| e.label.as_str().to_string()).collect()
}

#[test]
fn test_submenu_and_back_restore_root() {
    let mut ui = ui();
    let root = ui.page().clone();
    assert_eq!(ui.highest_page(), 2);

    ui.dispatch(Action::Submenu(1));
    assert_eq!(ui.screen(), Screen::Page(1));
    assert_eq!(labels(&ui), ["Scanlines: Off", "Colour: PAL", "", "", "", "", "", "Back"]);

    press(&mut ui, Key::Down);
    press(&mut ui, Key::Down);
    assert_eq!(ui.selected(), BACK_ROW);
    press(&mut ui, Key::Enter);
    assert_eq!(ui.screen(), Screen::Root);
    assert_eq!(ui.page(), &root);
}

#[test]
fn test_cycle_option_wraps_around() {
    let mut ui = ui();
    ui.dispatch(Action::Submenu(1));
    press(&mut ui, Key::Down);
    let before = ui.status;

    press(&mut ui, Key::Enter);
    assert_eq!(ui.page().entry(1).label.as_str(), "Colour: NTSC");
    assert_eq!(ui.status.raw(), 0x4);
    assert_eq!(ui.selected(), 1);

    press(&mut ui, Key::Enter);
    assert_eq!(ui.page().entry(1).label.as_str(), "Colour: Mono");
    press(&mut ui, Key::Enter);
    assert_eq!(ui.page().entry(1).label.as_str(), "Colour: PAL");
    assert_eq!(ui.status, before);
    assert_eq!(ui.spi.count_commands(Channel::Control, &[CMD_SET_STATUS]), 3);
}

#[test]
fn test_toggle_keeps_other_bits() {
    let mut ui = ui();
    ui.status = StatusRegister::new(0x8);
    ui.dispatch(Action::Submenu(1));
    press(&mut ui, Key::Enter);
    assert_eq!(ui.status.raw(), 0x9);
    assert_eq!(labels(&ui)[..2], ["Scanlines: On", "Colour: Mono"]);
    let last = ui.spi.on(Channel::Control).last().unwrap();
    assert_eq!(last.sent, [CMD_SET_STATUS, 0x09, 0, 0, 0]);
}

#[test]
fn test_load_from_browser() {
    let mut ui = ui();
    press(&mut ui, Key::Enter);
    assert_eq!(ui.screen(), Screen::Browser);
    assert_eq!(labels(&ui), ["Some Game.rom", ">DEMOS", "", "", "", "", "", "Back"]);

    ui.spi.clear_log();
    press(&mut ui, Key::Enter);
    assert_eq!(ui.screen(), Screen::Root);
    assert_eq!(ui.message(), Some(MSG_LOADED));
    assert_eq!(ui.spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_BEGIN]), 1);
    assert_eq!(ui.spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_END]), 1);
    let sent: usize = ui.spi.on(Channel::FastData).map(|t| t.sent.len() - 1).sum();
    assert_eq!(sent, 1000);
    assert!(!ui.spi.overlapped);

    // Any key clears the status line.
    press(&mut ui, Key::Down);
    assert_eq!(ui.message(), None);
}

#[test]
fn test_load_from_subdirectory() {
    let mut ui = ui();
    ui.dispatch(Action::Load);
    ui.dispatch(Action::SelectDir(1));
    assert_eq!(ui.volume.depth(), 1);
    assert_eq!(labels(&ui)[..2], [">..", "First Demo.bin"]);

    press(&mut ui, Key::Down);
    press(&mut ui, Key::Enter);
    assert_eq!(ui.screen(), Screen::Root);
    assert_eq!(ui.message(), Some(MSG_LOADED));
    assert_eq!(ui.spi.on(Channel::FastData).count(), 6);
}

#[test]
fn test_read_error_reported() {
    let mut ui = ui();
    ui.volume.fail_sector = Some(0);
    ui.dispatch(Action::Load);
    ui.dispatch(Action::SelectRom(0));
    assert_eq!(ui.screen(), Screen::Root);
    assert_eq!(ui.message(), Some("READ-ERROR"));
    assert_eq!(ui.spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_END]), 0);
}

#[test]
fn test_escape_leaves_browser() {
    let mut ui = ui();
    ui.dispatch(Action::Load);
    press(&mut ui, Key::Escape);
    assert_eq!(ui.screen(), Screen::Root);
    assert_eq!(ui.selected(), 0);
}
