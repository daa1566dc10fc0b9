use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
    prelude::*,
};

use opts::Menu;

pub use romloader_hal::osd::{OSD_HEIGHT, OSD_WIDTH};

pub const LINE_HEIGHT: i32 = 10;

/// Top of the first menu row, below the title line and its rule.
const ROWS_Y: i32 = LINE_HEIGHT + 2;

/// Draw the title line (or the status message, if any) followed by the menu
/// rows, with the selected row inverted.
pub fn draw_menu<D, M>(d: &mut D, menu: &M, title: &str,
                       message: Option<&str>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
    M: Menu,
{
    let font = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let font_selected = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::Off)
        .build();

    d.clear(BinaryColor::Off)?;

    Text::with_baseline(
        message.unwrap_or(title),
        Point::new(2, 0),
        font,
        Baseline::Top,
    ).draw(d)?;

    Line::new(Point::new(0, LINE_HEIGHT), Point::new(OSD_WIDTH as i32 - 1, LINE_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(d)?;

    for (n, entry) in menu.page().entries().iter().enumerate() {
        let y = ROWS_Y + LINE_HEIGHT * n as i32;
        let style = if n == menu.selected() && entry.is_selectable() {
            Rectangle::new(Point::new(0, y), Size::new(OSD_WIDTH, LINE_HEIGHT as u32))
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(d)?;
            font_selected
        } else {
            font
        };
        Text::with_baseline(&entry.label, Point::new(2, y), style, Baseline::Top).draw(d)?;
    }

    Ok(())
}
