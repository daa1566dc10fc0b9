//! Contract of the removable-storage filesystem driver.

use heapless::String;

pub const SECTOR_SIZE: usize = 512;

pub const SHORT_NAME_LEN: usize = 12;
pub const LONG_NAME_LEN:  usize = 64;

pub type ShortName = String<SHORT_NAME_LEN>;
pub type LongName = String<LONG_NAME_LEN>;

/// One slot of the working directory. A slot with an empty short name is
/// unused (deleted or never allocated) and carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirEntry {
    /// Dotted 8.3 name, e.g. `GAME.ROM`.
    pub short_name: ShortName,
    pub is_dir: bool,
    pub size: u32,
    /// Position of this slot in the directory walk.
    pub slot: usize,
}

impl DirEntry {
    pub fn is_empty(&self) -> bool {
        self.short_name.is_empty()
    }

    /// The part of the short name after the last dot, or "".
    pub fn extension(&self) -> &str {
        match self.short_name.rfind('.') {
            Some(0) | None => "",
            Some(n) => &self.short_name[n + 1..],
        }
    }
}

/// Position of an open file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileHandle {
    pub size: u32,
    /// Index of the current sector within the file.
    pub sector: u32,
    pub cluster: u32,
    pub start_cluster: u32,
}

impl FileHandle {
    pub fn sectors(&self) -> u32 {
        self.size.div_ceil(SECTOR_SIZE as u32)
    }
}

pub trait StorageVolume {
    type Error: core::fmt::Debug;

    /// Slot `index` of the working directory, `None` past the last slot.
    fn next_entry(&mut self, index: usize) -> Option<DirEntry>;

    /// Long name of `entry`, falling back to its short name.
    ///
    /// Returned by value: the driver's own long-name buffer is reused by
    /// every later directory or file operation.
    fn long_name(&mut self, entry: &DirEntry) -> LongName;

    fn open(&mut self, name: &str) -> Option<FileHandle>;

    /// Read the current sector of `file` into `buf`.
    fn read_sector(&mut self, file: &mut FileHandle, buf: &mut [u8; SECTOR_SIZE])
        -> Result<(), Self::Error>;

    fn advance_sector(&mut self, file: &mut FileHandle);

    fn change_directory(&mut self, entry: &DirEntry);
}
