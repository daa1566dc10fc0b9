//! Monochrome on-screen display overlaid on the core's video output.
//!
//! The framebuffer is 1bpp, one byte per 8 horizontal pixels, MSB leftmost.

pub const OSD_WIDTH:  u32 = 256;
pub const OSD_HEIGHT: u32 = 96;
pub const OSD_STRIDE: usize = (OSD_WIDTH / 8) as usize;

/// Control register bit that shows the overlay.
pub const OSD_CTRL_VISIBLE: u32 = 1 << 0;

#[macro_export]
macro_rules! impl_osd {
    ($(
        $OSDX:ident: $FB:expr, $CTRL:expr,
    )+) => {
        $(
            pub struct $OSDX {
                fb: usize,
                ctrl: usize,
            }

            impl $OSDX {
                /// # Safety
                /// Only one instance may drive the OSD at a time.
                pub unsafe fn summon() -> Self {
                    Self { fb: $FB, ctrl: $CTRL }
                }

                pub fn set_visible(&mut self, visible: bool) {
                    let bits = if visible { $crate::osd::OSD_CTRL_VISIBLE } else { 0 };
                    unsafe { (self.ctrl as *mut u32).write_volatile(bits) }
                }
            }

            impl $crate::embedded_graphics::prelude::OriginDimensions for $OSDX {
                fn size(&self) -> $crate::embedded_graphics::prelude::Size {
                    $crate::embedded_graphics::prelude::Size::new(
                        $crate::osd::OSD_WIDTH, $crate::osd::OSD_HEIGHT)
                }
            }

            impl $crate::embedded_graphics::prelude::DrawTarget for $OSDX {
                type Color = $crate::embedded_graphics::pixelcolor::BinaryColor;
                type Error = core::convert::Infallible;

                fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
                where
                    I: IntoIterator<Item = $crate::embedded_graphics::Pixel<Self::Color>>,
                {
                    for $crate::embedded_graphics::Pixel(coord, color) in pixels.into_iter() {
                        if let Ok((x, y)) = <(u32, u32)>::try_from(coord) {
                            if x < $crate::osd::OSD_WIDTH && y < $crate::osd::OSD_HEIGHT {
                                let px = (self.fb + y as usize * $crate::osd::OSD_STRIDE
                                          + (x / 8) as usize) as *mut u8;
                                let bit = 0x80u8 >> (x % 8);
                                unsafe {
                                    let v = px.read_volatile();
                                    px.write_volatile(if color.is_on() { v | bit } else { v & !bit });
                                }
                            }
                        }
                    }
                    Ok(())
                }
            }
        )+
    }
}
