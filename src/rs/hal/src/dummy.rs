//! In-memory collaborators for host-side testing.
//!
//! `ScriptedChannel` plays the part of the core behind the SPI bus: it serves
//! a descriptor string on the config channel and records every transaction.
//! `MemVolume` is a small directory tree standing in for the SD card.
//! `HeldKeys` is a keyboard whose keys are held down by the test.

extern crate std;

use std::string::String as StdString;
use std::vec::Vec;
use core::str::FromStr;

use crate::constants::*;
use crate::keyboard::{Key, Keyboard};
use crate::spi::{Channel, SerialChannel, Speed};
use crate::storage::*;

/// One select..deselect bracket as seen by the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub channel: Channel,
    pub speed: Speed,
    pub sent: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ScriptedChannel {
    config: Vec<u8>,
    config_pos: Option<usize>,
    current: Option<Transaction>,
    /// Completed transactions, oldest first.
    pub log: Vec<Transaction>,
    /// Set if a channel was selected while another one was still open.
    pub overlapped: bool,
    /// Reply to every exchange outside the config readout.
    pub reply: u8,
}

impl ScriptedChannel {
    pub fn new(config: &str) -> Self {
        Self {
            config: config.as_bytes().to_vec(),
            reply: SPI_FILLER,
            ..Default::default()
        }
    }

    pub fn set_config(&mut self, config: &str) {
        self.config = config.as_bytes().to_vec();
    }

    pub fn is_selected(&self) -> bool {
        self.current.is_some()
    }

    pub fn on(&self, channel: Channel) -> impl Iterator<Item = &Transaction> {
        self.log.iter().filter(move |t| t.channel == channel)
    }

    /// Number of transactions whose bytes start with `prefix`.
    pub fn count_commands(&self, channel: Channel, prefix: &[u8]) -> usize {
        self.on(channel).filter(|t| t.sent.starts_with(prefix)).count()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl SerialChannel for ScriptedChannel {
    fn select(&mut self, channel: Channel, speed: Speed) {
        if self.current.is_some() {
            self.overlapped = true;
        }
        self.current = Some(Transaction { channel, speed, sent: Vec::new() });
        self.config_pos = None;
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        let Some(current) = self.current.as_mut() else {
            return self.reply;
        };
        current.sent.push(byte);
        if current.channel != Channel::Config {
            return self.reply;
        }
        match self.config_pos {
            None => {
                if byte == CMD_GET_CONFIG_STRING {
                    self.config_pos = Some(0);
                }
                0
            }
            Some(pos) => {
                self.config_pos = Some(pos + 1);
                self.config.get(pos).copied().unwrap_or(0)
            }
        }
    }

    fn deselect(&mut self, _channel: Channel) {
        if let Some(t) = self.current.take() {
            self.log.push(t);
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemEntry {
    pub short_name: StdString,
    pub long_name: StdString,
    pub is_dir: bool,
    pub data: Vec<u8>,
    pub children: Vec<MemEntry>,
}

impl MemEntry {
    pub fn file(short_name: &str, long_name: &str, data: Vec<u8>) -> Self {
        Self {
            short_name: short_name.into(),
            long_name: long_name.into(),
            data,
            ..Default::default()
        }
    }

    pub fn dir(short_name: &str, children: Vec<MemEntry>) -> Self {
        Self {
            short_name: short_name.into(),
            is_dir: true,
            children,
            ..Default::default()
        }
    }

    /// An unused directory slot.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemError {
    Read,
}

#[derive(Debug, Default)]
pub struct MemVolume {
    root: Vec<MemEntry>,
    cwd: Vec<usize>,
    /// Make the read of this sector index fail.
    pub fail_sector: Option<u32>,
    pub sectors_read: usize,
}

impl MemVolume {
    pub fn new(root: Vec<MemEntry>) -> Self {
        Self { root, ..Default::default() }
    }

    pub fn depth(&self) -> usize {
        self.cwd.len()
    }

    fn dir(&self) -> &Vec<MemEntry> {
        let mut dir = &self.root;
        for n in &self.cwd {
            dir = &dir[*n].children;
        }
        dir
    }

    /// Slots of the working directory; subdirectories start with `..`.
    fn slot(&self, index: usize) -> Option<(Option<usize>, MemEntry)> {
        if self.cwd.is_empty() {
            self.dir().get(index).map(|e| (Some(index), e.clone()))
        } else if index == 0 {
            Some((None, MemEntry::dir("..", Vec::new())))
        } else {
            self.dir().get(index - 1).map(|e| (Some(index - 1), e.clone()))
        }
    }

    fn find(&self, name: &str) -> Option<&MemEntry> {
        self.dir().iter().find(|e| {
            !e.is_dir && !e.short_name.is_empty() &&
                (e.short_name.eq_ignore_ascii_case(name) || e.long_name == name)
        })
    }

    fn file_data(&self, file: &FileHandle) -> &[u8] {
        &self.dir()[file.start_cluster as usize].data
    }
}

impl StorageVolume for MemVolume {
    type Error = MemError;

    fn next_entry(&mut self, index: usize) -> Option<DirEntry> {
        let (_, e) = self.slot(index)?;
        Some(DirEntry {
            short_name: ShortName::from_str(&e.short_name).unwrap_or_default(),
            is_dir: e.is_dir,
            size: e.data.len() as u32,
            slot: index,
        })
    }

    fn long_name(&mut self, entry: &DirEntry) -> LongName {
        let name = match self.slot(entry.slot) {
            Some((_, e)) if !e.long_name.is_empty() => e.long_name,
            _ => entry.short_name.as_str().into(),
        };
        let mut long = LongName::new();
        for c in name.chars() {
            if long.push(c).is_err() {
                break;
            }
        }
        long
    }

    fn open(&mut self, name: &str) -> Option<FileHandle> {
        let entry = self.find(name)?;
        let n = self.dir().iter().position(|e| core::ptr::eq(e, entry))?;
        Some(FileHandle {
            size: entry.data.len() as u32,
            sector: 0,
            cluster: n as u32,
            start_cluster: n as u32,
        })
    }

    fn read_sector(&mut self, file: &mut FileHandle, buf: &mut [u8; SECTOR_SIZE])
        -> Result<(), MemError> {
        if self.fail_sector == Some(file.sector) {
            return Err(MemError::Read);
        }
        let data = self.file_data(file);
        let start = file.sector as usize * SECTOR_SIZE;
        if start >= data.len() {
            return Err(MemError::Read);
        }
        let end = (start + SECTOR_SIZE).min(data.len());
        buf.fill(0);
        buf[..end - start].copy_from_slice(&data[start..end]);
        self.sectors_read += 1;
        Ok(())
    }

    fn advance_sector(&mut self, file: &mut FileHandle) {
        file.sector += 1;
    }

    fn change_directory(&mut self, entry: &DirEntry) {
        match self.slot(entry.slot) {
            Some((None, _)) => {
                self.cwd.pop();
            }
            Some((Some(n), e)) if e.is_dir => {
                self.cwd.push(n);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Default)]
pub struct HeldKeys {
    held: Vec<Key>,
}

impl HeldKeys {
    pub fn hold(&mut self, key: Key) {
        if !self.held.contains(&key) {
            self.held.push(key);
        }
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl Keyboard for HeldKeys {
    fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    fn volume() -> MemVolume {
        MemVolume::new(vec![
            MemEntry::file("A.ROM", "Alpha.rom", vec![1u8; 600]),
            MemEntry::empty(),
            MemEntry::dir("GAMES", vec![
                MemEntry::file("B.BIN", "", vec![2u8; 10]),
            ]),
        ])
    }

    #[test]
    fn test_scripted_config_readout() {
        let mut spi = ScriptedChannel::new("AB");
        spi.select(Channel::Config, Speed::Slow);
        assert_eq!(spi.exchange(CMD_GET_CONFIG_STRING), 0);
        assert_eq!(spi.exchange(SPI_FILLER), b'A');
        assert_eq!(spi.exchange(SPI_FILLER), b'B');
        assert_eq!(spi.exchange(SPI_FILLER), 0);
        spi.deselect(Channel::Config);
        assert!(!spi.overlapped);
        assert_eq!(spi.on(Channel::Config).count(), 1);
    }

    #[test]
    fn test_mem_volume_walk() {
        let mut vol = volume();
        assert!(vol.next_entry(1).unwrap().is_empty());
        assert!(vol.next_entry(3).is_none());
        let games = vol.next_entry(2).unwrap();
        vol.change_directory(&games);
        assert_eq!(vol.depth(), 1);
        let up = vol.next_entry(0).unwrap();
        assert_eq!(up.short_name.as_str(), "..");
        let b = vol.next_entry(1).unwrap();
        assert_eq!(vol.long_name(&b).as_str(), "B.BIN");
        vol.change_directory(&up);
        assert_eq!(vol.depth(), 0);
    }

    #[test]
    fn test_mem_volume_read() {
        let mut vol = volume();
        let mut file = vol.open("Alpha.rom").unwrap();
        let mut buf = [0u8; SECTOR_SIZE];
        vol.read_sector(&mut file, &mut buf).unwrap();
        vol.advance_sector(&mut file);
        vol.read_sector(&mut file, &mut buf).unwrap();
        assert_eq!(buf[87], 1);
        assert_eq!(buf[88], 0);
        vol.advance_sector(&mut file);
        assert_eq!(vol.read_sector(&mut file, &mut buf), Err(MemError::Read));
        assert!(vol.open("missing.rom").is_none());
    }
}
