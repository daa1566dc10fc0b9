//! Memory map of the loader SoC and the command set spoken to the core
//! over the hardware SPI channels.

pub const UART_BASE: usize = 0xFFFF_FFC0;
pub const SPI_BASE:  usize = 0xFFFF_FFD0;
pub const OSD_BASE:  usize = 0xFFFF_D000;
pub const OSD_CTRL:  usize = 0xFFFF_FFE0;

/// Clocked out whenever only the reply byte is of interest.
pub const SPI_FILLER: u8 = 0xff;

pub const CMD_GET_CONFIG_STRING: u8 = 0x14;
pub const CMD_SET_STATUS:        u8 = 0x1e;
pub const CMD_FILE_TX:           u8 = 0x53;
pub const CMD_FILE_TX_DATA:      u8 = 0x54;
pub const CMD_JOYSTICK0_EXT:     u8 = 0x60;

/// Argument of `CMD_FILE_TX` opening a transfer.
pub const FILE_TX_BEGIN: u8 = 0xff;
/// Argument of `CMD_FILE_TX` closing a transfer.
pub const FILE_TX_END:   u8 = 0x00;
