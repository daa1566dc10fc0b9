#![cfg_attr(not(test), no_std)]
#![allow(clippy::must_use_candidate)]

// modules
pub mod constants;
pub mod keyboard;
pub mod osd;
pub mod serial;
pub mod spi;
pub mod storage;

#[cfg(any(test, feature = "std"))]
pub mod dummy;

#[macro_use]
extern crate bitflags;

pub use heapless;
pub use embedded_graphics;

#[cfg(test)]
mod tests {
    use super::*;
    use spi::{Channel, SerialChannel, Speed};

    use std::sync::Once;

    static INIT: Once = Once::new();

    pub fn setup_logger() {
      INIT.call_once(env_logger::init);
    }

    #[test]
    fn test_command_is_one_bracket() {
        setup_logger();
        let mut spi = dummy::ScriptedChannel::new("");
        spi.command(Channel::Control, &[constants::CMD_FILE_TX, constants::FILE_TX_BEGIN]);
        assert!(!spi.is_selected());
        assert_eq!(spi.log.len(), 1);
        assert_eq!(spi.log[0].speed, Speed::Slow);
        assert_eq!(spi.log[0].sent, [constants::CMD_FILE_TX, constants::FILE_TX_BEGIN]);
        log::info!("control transaction: {:02X?}", spi.log[0].sent);
    }
}
