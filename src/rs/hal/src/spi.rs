use strum_macros::IntoStaticStr;

bitflags! {
    /// Bits of the SPI chip-select register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChipSelect: u32 {
        const SDCARD = 1 << 0;
        const FPGA   = 1 << 1;
        const CONF   = 1 << 2;
        const SNIFF  = 1 << 3;
        const FAST   = 1 << 8;
    }
}

/// Logical channels multiplexed over the one physical SPI bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Channel {
    /// Descriptor (config string) readout.
    Config,
    /// Short commands to the core.
    Control,
    /// Bulk ROM data.
    FastData,
    /// Core echoes what it received, used by the verify pass.
    Sniff,
}

impl Channel {
    pub fn chip_select(self) -> ChipSelect {
        match self {
            Channel::Config => ChipSelect::CONF,
            Channel::Control | Channel::FastData => ChipSelect::FPGA,
            Channel::Sniff => ChipSelect::FPGA | ChipSelect::SNIFF,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    Slow,
    Fast,
}

/// Byte-at-a-time access to the hardware channels.
///
/// Callers bracket every logical transaction with `select`/`deselect`.
/// At most one channel is selected at any time.
pub trait SerialChannel {
    fn select(&mut self, channel: Channel, speed: Speed);
    fn exchange(&mut self, byte: u8) -> u8;
    fn deselect(&mut self, channel: Channel);

    /// Send `bytes` as one complete transaction on `channel`.
    fn command(&mut self, channel: Channel, bytes: &[u8]) {
        self.select(channel, Speed::Slow);
        for byte in bytes {
            self.exchange(*byte);
        }
        self.deselect(channel);
    }
}

impl<T: SerialChannel + ?Sized> SerialChannel for &mut T {
    fn select(&mut self, channel: Channel, speed: Speed) {
        (**self).select(channel, speed)
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        (**self).exchange(byte)
    }

    fn deselect(&mut self, channel: Channel) {
        (**self).deselect(channel)
    }
}

#[macro_export]
macro_rules! impl_spi {
    ($(
        $SPIX:ident: $BASE:expr,
    )+) => {
        $(
            #[derive(Debug)]
            pub struct $SPIX {
                base: usize,
            }

            impl $SPIX {
                const REG_DATA: usize = 0x0;
                const REG_CS:   usize = 0x4;

                /// # Safety
                /// Only one instance may drive the SPI registers at a time.
                pub unsafe fn summon() -> Self {
                    Self { base: $BASE }
                }

                fn cs(&self) -> $crate::spi::ChipSelect {
                    let bits = unsafe {
                        ((self.base + Self::REG_CS) as *const u32).read_volatile()
                    };
                    $crate::spi::ChipSelect::from_bits_truncate(bits)
                }

                fn set_cs(&mut self, cs: $crate::spi::ChipSelect) {
                    unsafe {
                        ((self.base + Self::REG_CS) as *mut u32).write_volatile(cs.bits())
                    }
                }
            }

            impl $crate::spi::SerialChannel for $SPIX {
                fn select(&mut self, channel: $crate::spi::Channel, speed: $crate::spi::Speed) {
                    let mut cs = channel.chip_select();
                    if speed == $crate::spi::Speed::Fast {
                        cs |= $crate::spi::ChipSelect::FAST;
                    }
                    self.set_cs(cs);
                }

                fn exchange(&mut self, byte: u8) -> u8 {
                    // Writes stall the CPU until the byte has been shifted out.
                    unsafe {
                        let data = (self.base + Self::REG_DATA) as *mut u32;
                        data.write_volatile(byte as u32);
                        data.read_volatile() as u8
                    }
                }

                fn deselect(&mut self, channel: $crate::spi::Channel) {
                    let cs = self.cs() - channel.chip_select() - $crate::spi::ChipSelect::FAST;
                    self.set_cs(cs);
                }
            }
        )+
    }
}
