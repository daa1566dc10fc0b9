/// Live value of every menu-exposed hardware option, packed into one word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusRegister(u32);

impl StatusRegister {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn bits(&self, shift: u8, mask: u32) -> u32 {
        (self.0 >> shift) & mask
    }

    pub fn set_bits(&mut self, shift: u8, mask: u32, value: u32) {
        self.0 = (self.0 & !(mask << shift)) | ((value & mask) << shift);
    }
}
