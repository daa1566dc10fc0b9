//! `StorageVolume` over the platform's minimal FAT driver.
//!
//! The driver keeps one working directory and one long-name buffer, both
//! global. Entries are addressed by their position in the directory walk, so
//! anything that needs the driver's raw entry again walks back to it.

use log::{info, warn};

use romloader_hal::storage::*;

const ATTR_VOLUME:    u8 = 0x08;
const ATTR_DIRECTORY: u8 = 0x10;
const SLOT_DELETED:   u8 = 0xe5;
const LONG_NAME_BUF:  usize = 260;

#[repr(C)]
#[allow(dead_code)]
pub struct RawDirEntry {
    name: [u8; 11],
    attributes: u8,
    lower_case: u8,
    create_time_ms: u8,
    create_time: u16,
    create_date: u16,
    access_date: u16,
    high_cluster: u16,
    modify_time: u16,
    modify_date: u16,
    start_cluster: u16,
    file_size: u32,
}

const _: () = assert!(core::mem::size_of::<RawDirEntry>() == 32);

#[repr(C)]
#[derive(Default)]
struct RawFile {
    sector: u32,
    cluster: u32,
    size: u32,
    start_cluster: u32,
}

impl From<&FileHandle> for RawFile {
    fn from(file: &FileHandle) -> Self {
        Self {
            sector: file.sector,
            cluster: file.cluster,
            size: file.size,
            start_cluster: file.start_cluster,
        }
    }
}

impl RawFile {
    fn store(&self, file: &mut FileHandle) {
        file.sector = self.sector;
        file.cluster = self.cluster;
        file.size = self.size;
        file.start_cluster = self.start_cluster;
    }
}

extern "C" {
    fn spi_init() -> i32;
    fn FindDrive() -> i32;
    fn FileOpen(file: *mut RawFile, name: *const u8) -> i32;
    fn FileRead(file: *mut RawFile, buffer: *mut u8) -> i32;
    fn FileNextSector(file: *mut RawFile) -> i32;
    fn NextDirEntry(index: i32) -> *mut RawDirEntry;
    fn ChangeDirectory(entry: *mut RawDirEntry);
    static longfilename: [u8; LONG_NAME_BUF];
}

impl RawDirEntry {
    fn is_unused(&self) -> bool {
        self.name[0] == 0 || self.name[0] == SLOT_DELETED ||
            self.attributes & ATTR_VOLUME != 0
    }

    /// Dotted form of the space-padded 8.3 name.
    fn short_name(&self) -> ShortName {
        let mut name = ShortName::new();
        if self.is_unused() {
            return name;
        }
        let (base, ext) = self.name.split_at(8);
        for c in base.iter().take_while(|c| **c != b' ') {
            name.push(*c as char).ok();
        }
        if ext[0] != b' ' {
            name.push('.').ok();
            for c in ext.iter().take_while(|c| **c != b' ') {
                name.push(*c as char).ok();
            }
        }
        name
    }
}

/// `GAME.ROM` to the on-disk `GAME    ROM`.
fn padded_name(name: &str) -> Option<[u8; 12]> {
    let mut raw = [b' '; 12];
    raw[11] = 0;
    let (base, ext) = name.rsplit_once('.').unwrap_or((name, ""));
    if base.is_empty() || base.len() > 8 || ext.len() > 3 {
        return None;
    }
    for (dst, src) in raw[..8].iter_mut().zip(base.bytes()) {
        *dst = src.to_ascii_uppercase();
    }
    for (dst, src) in raw[8..11].iter_mut().zip(ext.bytes()) {
        *dst = src.to_ascii_uppercase();
    }
    Some(raw)
}

#[derive(Debug, Clone, Copy)]
pub struct SectorReadFailed;

/// Without a card every directory is empty and no file opens.
pub struct FatVolume {
    mounted: bool,
}

impl FatVolume {
    /// Bring up the card and find the first FAT partition.
    pub fn mount() -> Self {
        let mounted = unsafe { spi_init() != 0 && FindDrive() != 0 };
        info!("fat: sd card {}", if mounted { "found" } else { "missing" });
        Self { mounted }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn raw_entry(&mut self, index: usize) -> Option<&mut RawDirEntry> {
        if !self.mounted {
            return None;
        }
        unsafe { NextDirEntry(index as i32).as_mut() }
    }
}

impl StorageVolume for FatVolume {
    type Error = SectorReadFailed;

    fn next_entry(&mut self, index: usize) -> Option<DirEntry> {
        let raw = self.raw_entry(index)?;
        Some(DirEntry {
            short_name: raw.short_name(),
            is_dir: raw.attributes & ATTR_DIRECTORY != 0,
            size: raw.file_size,
            slot: index,
        })
    }

    fn long_name(&mut self, entry: &DirEntry) -> LongName {
        let mut name = LongName::new();
        if self.raw_entry(entry.slot).is_some() {
            let buf = unsafe { &*core::ptr::addr_of!(longfilename) };
            for c in buf.iter().take_while(|c| **c != 0) {
                if name.push(*c as char).is_err() {
                    break;
                }
            }
        }
        if name.is_empty() {
            name.push_str(&entry.short_name).ok();
        }
        name
    }

    fn open(&mut self, name: &str) -> Option<FileHandle> {
        if !self.mounted {
            return None;
        }
        let Some(raw_name) = padded_name(name) else {
            warn!("fat: '{}' is not an 8.3 name", name);
            return None;
        };
        let mut raw = RawFile::default();
        if unsafe { FileOpen(&mut raw, raw_name.as_ptr()) } == 0 {
            return None;
        }
        let mut file = FileHandle::default();
        raw.store(&mut file);
        Some(file)
    }

    fn read_sector(&mut self, file: &mut FileHandle, buf: &mut [u8; SECTOR_SIZE])
        -> Result<(), SectorReadFailed> {
        let mut raw = RawFile::from(&*file);
        let ok = unsafe { FileRead(&mut raw, buf.as_mut_ptr()) } != 0;
        raw.store(file);
        if ok { Ok(()) } else { Err(SectorReadFailed) }
    }

    fn advance_sector(&mut self, file: &mut FileHandle) {
        let mut raw = RawFile::from(&*file);
        unsafe { FileNextSector(&mut raw) };
        raw.store(file);
    }

    fn change_directory(&mut self, entry: &DirEntry) {
        if let Some(raw) = self.raw_entry(entry.slot) {
            if raw.attributes & ATTR_DIRECTORY != 0 {
                unsafe { ChangeDirectory(raw) };
            }
        }
    }
}
