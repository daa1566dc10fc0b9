//! `Keyboard` over the platform's PS/2 scan-code decoder.

use romloader_hal::keyboard::{Key, Keyboard};

extern "C" {
    fn PS2Init();
    fn HandlePS2RawCodes();
    fn TestKey(code: i32) -> i32;
}

fn scan_code(key: Key) -> i32 {
    match key {
        Key::Up         => 0xf5,
        Key::Down       => 0xf2,
        Key::Left       => 0xeb,
        Key::Right      => 0xf4,
        Key::PageUp     => 0xfd,
        Key::PageDown   => 0xfa,
        Key::Enter      => 0x5a,
        Key::Escape     => 0x76,
        Key::F11        => 0x78,
        Key::F12        => 0x07,
        Key::RightCtrl  => 0x94,
        Key::RightShift => 0x59,
        Key::AltGr      => 0x91,
    }
}

pub struct Ps2Keyboard {
    _private: (),
}

impl Ps2Keyboard {
    pub fn init() -> Self {
        unsafe { PS2Init() };
        Self { _private: () }
    }
}

impl Keyboard for Ps2Keyboard {
    fn poll(&mut self) {
        unsafe { HandlePS2RawCodes() };
    }

    fn is_down(&self, key: Key) -> bool {
        unsafe { TestKey(scan_code(key)) != 0 }
    }
}
