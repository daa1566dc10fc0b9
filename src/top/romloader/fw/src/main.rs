#![no_std]
#![no_main]

use log::{info, warn};
use panic_halt as _;
use riscv_rt::entry;

use romloader_fw::*;
use romloader_fw::fat::FatVolume;
use romloader_fw::ps2::Ps2Keyboard;
use romloader_lib::draw::draw_menu;
use romloader_lib::ui::Ui;

#[entry]
fn main() -> ! {
    let serial = unsafe { Serial0::summon() };
    handlers::logger_init(serial);

    info!("Hello from the ROM loader!");

    let spi = unsafe { Spi0::summon() };
    let mut osd = unsafe { Osd0::summon() };
    let keyboard = Ps2Keyboard::init();
    let volume = FatVolume::mount();
    let have_card = volume.is_mounted();

    let mut ui = Ui::new(spi, volume, keyboard);

    if cfg!(feature = "joystick") {
        ui.enable_joystick(0);
    }

    if cfg!(feature = "autoload") && have_card {
        match ui.autoload() {
            Ok(size) => info!("autoload: sent {} bytes", size),
            Err(e) => warn!("autoload: {:?}", e),
        }
    }

    osd.set_visible(ui.osd_visible());
    draw_menu(&mut osd, &ui, ui.title(), ui.message()).ok();

    loop {
        if ui.update() {
            osd.set_visible(ui.osd_visible());
            if ui.osd_visible() {
                draw_menu(&mut osd, &ui, ui.title(), ui.message()).ok();
            }
        }
    }
}
