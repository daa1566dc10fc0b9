//! Decoder for the descriptor ("config string") streamed by the core.
//!
//! The descriptor is read live, one byte per SPI exchange, with no length
//! prefix. A page is therefore rebuilt from scratch by a single pass over the
//! whole stream: records belonging to other pages are consumed to stay in
//! sync but never materialized.
//!
//! Layout: `NAME;EXTS;` followed by directive records, each starting with a
//! one-character tag and ending in `;`. Fields inside a record are separated
//! by `,`. A 0 byte ends the stream.
//!
//! - `Fbin,rom,;`: file selector (page 0 only): extensions + "Load" row.
//! - `P1,Video;`: submenu link to page 1 (page 0 only).
//! - `P2<lo>[<hi>],Label,Value0,Value1,...;`: option on page 2 backed by
//!   status bits `lo..=hi`.

use core::cmp::max;
use heapless::{String, Vec};
use log::{debug, info, warn};

use opts::*;
use romloader_hal::constants::{CMD_GET_CONFIG_STRING, SPI_FILLER};
use romloader_hal::spi::{Channel, SerialChannel, Speed};
use romloader_hal::storage::ShortName;

pub const MAX_EXTENSIONS:    usize = 8;
pub const MAX_EXTENSION_LEN: usize = 4;
pub const CORE_NAME_LEN:     usize = 16;

pub type Extension = String<MAX_EXTENSION_LEN>;
pub type Extensions = Vec<Extension, MAX_EXTENSIONS>;
pub type CoreName = String<CORE_NAME_LEN>;

pub trait ConfigStream {
    /// Next byte of the descriptor, 0 once it is exhausted.
    fn next_byte(&mut self) -> u8;
}

/// Descriptor read over the config channel. The channel stays selected for
/// the lifetime of the stream and is released on drop.
pub struct SpiConfigStream<'a, S: SerialChannel> {
    spi: &'a mut S,
    exhausted: bool,
}

impl<'a, S: SerialChannel> SpiConfigStream<'a, S> {
    pub fn open(spi: &'a mut S) -> Self {
        spi.select(Channel::Config, Speed::Slow);
        spi.exchange(CMD_GET_CONFIG_STRING);
        Self { spi, exhausted: false }
    }
}

impl<S: SerialChannel> ConfigStream for SpiConfigStream<'_, S> {
    fn next_byte(&mut self) -> u8 {
        if self.exhausted {
            return 0;
        }
        let c = self.spi.exchange(SPI_FILLER);
        if c == 0 {
            self.exhausted = true;
        }
        c
    }
}

impl<S: SerialChannel> Drop for SpiConfigStream<'_, S> {
    fn drop(&mut self) {
        self.spi.deselect(Channel::Config);
    }
}

/// Descriptor held in memory.
pub struct SliceStream<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl ConfigStream for SliceStream<'_> {
    fn next_byte(&mut self) -> u8 {
        let c = self.bytes.get(self.pos).copied().unwrap_or(0);
        if c != 0 {
            self.pos += 1;
        }
        c
    }
}

/// Base-36 style digit: `'0'..'9'` are 0-9, anything else counts from `'A'`.
pub fn digit(c: u8) -> u8 {
    if c.is_ascii_digit() {
        c - b'0'
    } else {
        c.wrapping_add(10).wrapping_sub(b'A')
    }
}

fn is_separator(c: u8) -> bool {
    matches!(c, b',' | b';' | 0)
}

struct Tokenizer<'s, C: ConfigStream + ?Sized> {
    stream: &'s mut C,
    last: u8,
}

impl<'s, C: ConfigStream + ?Sized> Tokenizer<'s, C> {
    fn new(stream: &'s mut C) -> Self {
        Self { stream, last: 0 }
    }

    fn next(&mut self) -> u8 {
        self.last = self.stream.next_byte();
        self.last
    }

    /// Consume the rest of the current record, up to and including `;`.
    fn finish_record(&mut self) {
        while !matches!(self.last, b';' | 0) {
            self.next();
        }
    }

    fn skip_record(&mut self) {
        self.next();
        self.finish_record();
    }

    /// Copy up to the next separator into `out`, truncating. Returns the
    /// separator.
    fn copy_segment<const N: usize>(&mut self, out: &mut String<N>) -> u8 {
        loop {
            let c = self.next();
            if is_separator(c) {
                return c;
            }
            out.push(c as char).ok();
        }
    }

    fn skip_segment(&mut self) -> u8 {
        loop {
            let c = self.next();
            if is_separator(c) {
                return c;
            }
        }
    }

    /// Copy the rest of the record, commas included, into `out`.
    fn copy_record<const N: usize>(&mut self, out: &mut String<N>) {
        loop {
            let c = self.next();
            if matches!(c, b';' | 0) {
                return;
            }
            out.push(c as char).ok();
        }
    }

    fn file_selector(&mut self, extensions: &mut Extensions) -> MenuEntry {
        extensions.clear();
        loop {
            let mut ext = Extension::new();
            let term = self.copy_segment(&mut ext);
            if ext.is_empty() {
                break;
            }
            if extensions.push(ext).is_err() {
                warn!("confstr: too many extensions, ignoring the rest");
            }
            if term != b',' {
                break;
            }
        }
        self.finish_record();
        MenuEntry::new("Load", EntryKind::Callback(Action::Load))
    }

    fn page_directive(&mut self, target: u8, status: &StatusRegister,
                      highest: &mut u8) -> Option<MenuEntry> {
        let c = self.next();
        if is_separator(c) {
            self.finish_record();
            return None;
        }
        let page = digit(c);
        *highest = max(*highest, page);

        let c = self.next();
        if is_separator(c) {
            // No bit range: a submenu link, only shown on the root page.
            if target != 0 {
                self.finish_record();
                return None;
            }
            let mut label = LabelString::new();
            if c == b',' {
                self.copy_record(&mut label);
            }
            return Some(MenuEntry { label, kind: EntryKind::Submenu(page) });
        }

        if page != target {
            self.finish_record();
            return None;
        }

        let low = digit(c);
        let high = if is_separator(self.next()) {
            low
        } else {
            let high = digit(self.last);
            self.next();
            high
        };
        if self.last != b',' {
            warn!("confstr: malformed option on page {}, skipped", page);
            self.finish_record();
            return None;
        }
        let Some(mask) = BitOption::mask_for(low, high) else {
            warn!("confstr: invalid bit range {}..={} on page {}, skipped", low, high, page);
            self.finish_record();
            return None;
        };

        let value = status.bits(low, mask);
        let mut label = LabelString::new();
        let mut term = self.copy_segment(&mut label);
        let mut count = 0u32;
        while term == b',' {
            if count == value {
                push_truncated(&mut label, ": ");
                term = self.copy_segment(&mut label);
            } else {
                term = self.skip_segment();
            }
            count += 1;
        }
        if count == 0 {
            count = mask.saturating_add(1);
        }

        let option = BitOption { shift: low, mask, count, value };
        let kind = if count == 2 {
            EntryKind::Toggle(option)
        } else {
            EntryKind::Cycle(option)
        };
        Some(MenuEntry { label, kind })
    }
}

/// Build `target` page from one pass over `stream`.
///
/// Fills at most `CONTENT_ROWS` rows, blanks the rest and, on any page but
/// the root, puts "Back" in the last row. The root page also refreshes
/// `extensions` from the file-selector directive. Returns the highest page
/// number seen while reading.
pub fn decode_page<C: ConfigStream + ?Sized>(stream: &mut C, target: u8, page: &mut MenuPage,
                                             status: &StatusRegister,
                                             extensions: &mut Extensions) -> u8 {
    let mut tok = Tokenizer::new(stream);
    page.clear();

    // Core name and extension list are positional.
    tok.skip_record();
    tok.skip_record();

    let mut row = 0usize;
    let mut highest = 0u8;
    while row < CONTENT_ROWS {
        let entry = match tok.next() {
            0 => break,
            b';' => None,
            b'F' if target == 0 => Some(tok.file_selector(extensions)),
            b'P' => tok.page_directive(target, status, &mut highest),
            tag => {
                debug!("confstr: skip directive '{}'", tag as char);
                tok.finish_record();
                None
            }
        };
        if let Some(entry) = entry {
            page.set(row, entry);
            row += 1;
        }
    }

    page.blank_from(row);
    if target != 0 {
        page.set_back();
    }
    highest
}

/// Decode page `target` straight from the core.
pub fn decode<S: SerialChannel>(spi: &mut S, target: u8, page: &mut MenuPage,
                                status: &StatusRegister, extensions: &mut Extensions) -> u8 {
    let highest = {
        let mut stream = SpiConfigStream::open(spi);
        decode_page(&mut stream, target, page, status, extensions)
    };
    info!("confstr: page {} has {} rows (highest page {})", target, page.populated(), highest);
    highest
}

/// First positional field of the descriptor.
pub fn core_name<C: ConfigStream + ?Sized>(stream: &mut C) -> CoreName {
    let mut tok = Tokenizer::new(stream);
    let mut name = CoreName::new();
    tok.copy_segment(&mut name);
    name
}

pub fn read_core_name<S: SerialChannel>(spi: &mut S) -> CoreName {
    let mut stream = SpiConfigStream::open(spi);
    core_name(&mut stream)
}

/// File the core loads by default: the core name as an 8.3 short name with a
/// `ROM` extension. Names longer than 8 characters get the `~1` alias form.
pub fn default_rom_name(core: &str) -> Option<ShortName> {
    let base = core.trim();
    if base.is_empty() {
        return None;
    }
    let mut name = ShortName::new();
    let n = base.chars().count();
    let keep = if n > 8 { 6 } else { n };
    for c in base.chars().take(keep) {
        name.push(c.to_ascii_uppercase()).ok()?;
    }
    if n > 8 {
        name.push_str("~1").ok()?;
    }
    name.push_str(".ROM").ok()?;
    Some(name)
}
