/// Bit of the UART data register that reads high while the transmitter
/// can accept another byte.
pub const UART_TX_READY: u32 = 1 << 8;

#[macro_export]
macro_rules! impl_serial {
    ($(
        $SERIALX:ident: $BASE:expr,
    )+) => {
        $(
            #[derive(Debug)]
            pub struct $SERIALX {
                base: usize,
            }

            impl $SERIALX {
                /// # Safety
                /// Only one instance may drive the UART registers at a time.
                pub unsafe fn summon() -> Self {
                    Self { base: $BASE }
                }

                pub fn write_byte(&mut self, byte: u8) {
                    let reg = self.base as *mut u32;
                    unsafe {
                        while reg.read_volatile() & $crate::serial::UART_TX_READY == 0 {}
                        reg.write_volatile(byte as u32);
                    }
                }
            }

            impl core::fmt::Write for $SERIALX {
                fn write_str(&mut self, s: &str) -> core::fmt::Result {
                    for byte in s.bytes() {
                        if byte == b'\n' {
                            self.write_byte(b'\r');
                        }
                        self.write_byte(byte);
                    }
                    Ok(())
                }
            }
        )+
    }
}
