#![no_std]

pub use romloader_hal as hal;

use hal::constants::*;

hal::impl_serial! {
    Serial0: UART_BASE,
}

hal::impl_spi! {
    Spi0: SPI_BASE,
}

hal::impl_osd! {
    Osd0: OSD_BASE, OSD_CTRL,
}

pub mod handlers;
pub mod fat;
pub mod ps2;
