#![cfg_attr(not(test), no_std)]

pub mod confstr;
pub mod browser;
pub mod transfer;
pub mod userio;
pub mod ui;
pub mod draw;
