//! Local state mirrored to the core: the option status word and the
//! keyboard-emulated joystick.

use bitflags::bitflags;
use log::debug;

use opts::StatusRegister;
use romloader_hal::constants::{CMD_JOYSTICK0_EXT, CMD_SET_STATUS};
use romloader_hal::keyboard::{Key, KeyTracker};
use romloader_hal::spi::{Channel, SerialChannel};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Joystick: u32 {
        const RIGHT = 1 << 0;
        const LEFT  = 1 << 1;
        const DOWN  = 1 << 2;
        const UP    = 1 << 3;
        const BTN1  = 1 << 4;
        const BTN2  = 1 << 5;
        const BTN3  = 1 << 6;
        const BTN4  = 1 << 7;
    }
}

const KEY_MAP: [(Key, Joystick); 8] = [
    (Key::Up,         Joystick::UP),
    (Key::Down,       Joystick::DOWN),
    (Key::Left,       Joystick::LEFT),
    (Key::Right,      Joystick::RIGHT),
    (Key::RightCtrl,  Joystick::BTN1),
    (Key::RightShift, Joystick::BTN2),
    (Key::AltGr,      Joystick::BTN3),
    (Key::Enter,      Joystick::BTN4),
];

pub fn joystick_from_keys(keys: &KeyTracker) -> Joystick {
    KEY_MAP.iter()
        .filter(|(key, _)| keys.is_down(*key))
        .fold(Joystick::empty(), |state, (_, bit)| state | *bit)
}

pub fn push_status<S: SerialChannel>(spi: &mut S, status: &StatusRegister) {
    let raw = status.raw().to_le_bytes();
    spi.command(Channel::Control, &[CMD_SET_STATUS, raw[0], raw[1], raw[2], raw[3]]);
    debug!("userio: status {:#010x}", status.raw());
}

pub fn push_joystick<S: SerialChannel>(spi: &mut S, port: u8, state: Joystick) {
    let raw = state.bits().to_le_bytes();
    spi.command(Channel::Control,
                &[CMD_JOYSTICK0_EXT + port, raw[0], raw[1], raw[2], raw[3]]);
}
