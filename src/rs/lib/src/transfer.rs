//! ROM upload to the core.
//!
//! A transfer is bracketed by `CMD_FILE_TX` begin/end on the control channel.
//! In between, every sector goes out on the fast data channel, then a verify
//! pass clocks the whole image back through the sniff channel.

use log::{debug, info, warn};
use strum_macros::IntoStaticStr;

use romloader_hal::constants::*;
use romloader_hal::spi::{Channel, SerialChannel, Speed};
use romloader_hal::storage::{FileHandle, StorageVolume, SECTOR_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE")]
pub enum TransferError {
    FileNotFound,
    ReadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Verifying,
}

pub struct RomTransfer {
    file: FileHandle,
    remaining: u32,
    phase: Phase,
}

impl RomTransfer {
    pub fn open<V: StorageVolume>(volume: &mut V, name: &str) -> Result<Self, TransferError> {
        let file = volume.open(name).ok_or(TransferError::FileNotFound)?;
        Ok(Self {
            remaining: file.size,
            file,
            phase: Phase::Idle,
        })
    }

    pub fn size(&self) -> u32 {
        self.file.size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Send every sector of the file. On a read error the transfer is left
    /// open: no end command is sent.
    pub fn upload<S, V>(&mut self, spi: &mut S, volume: &mut V) -> Result<(), TransferError>
    where
        S: SerialChannel,
        V: StorageVolume,
    {
        self.phase = Phase::Uploading;
        spi.command(Channel::Control, &[CMD_FILE_TX, FILE_TX_BEGIN]);

        let mut buf = [0u8; SECTOR_SIZE];
        while self.remaining > 0 {
            if let Err(e) = volume.read_sector(&mut self.file, &mut buf) {
                warn!("transfer: read of sector {} failed: {:?}", self.file.sector, e);
                self.phase = Phase::Idle;
                return Err(TransferError::ReadError);
            }
            let n = (self.remaining as usize).min(SECTOR_SIZE);
            spi.select(Channel::FastData, Speed::Fast);
            spi.exchange(CMD_FILE_TX_DATA);
            for byte in &buf[..n] {
                spi.exchange(*byte);
            }
            spi.deselect(Channel::FastData);
            self.remaining -= n as u32;
            debug!("transfer: sector {} ({} bytes, {} left)", self.file.sector, n, self.remaining);
            volume.advance_sector(&mut self.file);
        }
        Ok(())
    }

    /// Clock the image back through the sniff channel and close the transfer.
    /// Returns the two check bytes the core appends.
    pub fn verify<S: SerialChannel>(&mut self, spi: &mut S) -> [u8; 2] {
        self.phase = Phase::Verifying;
        spi.select(Channel::Sniff, Speed::Fast);
        spi.exchange(CMD_FILE_TX_DATA);
        for _ in 0..self.file.size {
            spi.exchange(SPI_FILLER);
        }
        let check = [spi.exchange(SPI_FILLER), spi.exchange(SPI_FILLER)];
        spi.deselect(Channel::Sniff);
        spi.command(Channel::Control, &[CMD_FILE_TX, FILE_TX_END]);
        // TODO: compare against a checksum once the core reports one.
        info!("transfer: verify check {:02x}{:02x}", check[0], check[1]);
        self.phase = Phase::Idle;
        check
    }
}

/// Upload `name` from the working directory and verify it. Returns the
/// number of bytes sent.
pub fn load<S, V>(spi: &mut S, volume: &mut V, name: &str) -> Result<u32, TransferError>
where
    S: SerialChannel,
    V: StorageVolume,
{
    let mut transfer = RomTransfer::open(volume, name).map_err(|e| {
        warn!("transfer: {} not found", name);
        e
    })?;
    info!("transfer: loading {} ({} bytes)", name, transfer.size());
    transfer.upload(spi, volume)?;
    transfer.verify(spi);
    Ok(transfer.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use romloader_hal::dummy::{MemEntry, MemVolume, ScriptedChannel};

    fn image(len: usize) -> Vec<u8> {
        (0..len).map(|n| (n % 251) as u8).collect()
    }

    fn volume(len: usize) -> MemVolume {
        MemVolume::new(vec![MemEntry::file("GAME.ROM", "Game.rom", image(len))])
    }

    #[test]
    fn test_load_sends_every_sector() {
        let mut spi = ScriptedChannel::new("");
        let mut vol = volume(1000);
        assert_eq!(load(&mut spi, &mut vol, "game.rom"), Ok(1000));

        let channels: Vec<Channel> = spi.log.iter().map(|t| t.channel).collect();
        assert_eq!(channels, [Channel::Control, Channel::FastData, Channel::FastData,
                              Channel::Sniff, Channel::Control]);
        assert_eq!(spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_BEGIN]), 1);
        assert_eq!(spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_END]), 1);

        let data: Vec<&Vec<u8>> = spi.on(Channel::FastData).map(|t| &t.sent).collect();
        assert_eq!(data[0].len(), 1 + 512);
        assert_eq!(data[1].len(), 1 + 488);
        assert_eq!(data[0][0], CMD_FILE_TX_DATA);
        let sent: Vec<u8> = data.iter().flat_map(|d| d[1..].iter().copied()).collect();
        assert_eq!(sent, image(1000));
        assert!(spi.on(Channel::FastData).all(|t| t.speed == Speed::Fast));

        let sniff = spi.on(Channel::Sniff).next().unwrap();
        assert_eq!(sniff.sent.len(), 1 + 1000 + 2);
        assert!(!spi.overlapped);
        assert!(!spi.is_selected());
    }

    #[test]
    fn test_missing_file_sends_nothing() {
        let mut spi = ScriptedChannel::new("");
        let mut vol = volume(10);
        assert_eq!(load(&mut spi, &mut vol, "OTHER.ROM"), Err(TransferError::FileNotFound));
        assert!(spi.log.is_empty());
    }

    #[test]
    fn test_read_error_leaves_transfer_open() {
        let mut spi = ScriptedChannel::new("");
        let mut vol = volume(2000);
        vol.fail_sector = Some(1);
        assert_eq!(load(&mut spi, &mut vol, "GAME.ROM"), Err(TransferError::ReadError));
        assert_eq!(spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_BEGIN]), 1);
        assert_eq!(spi.count_commands(Channel::Control, &[CMD_FILE_TX, FILE_TX_END]), 0);
        assert_eq!(spi.on(Channel::FastData).count(), 1);
        assert_eq!(spi.on(Channel::Sniff).count(), 0);
        assert!(!spi.is_selected());
    }

    #[test]
    fn test_phases() {
        let mut spi = ScriptedChannel::new("");
        let mut vol = volume(0);
        let mut transfer = RomTransfer::open(&mut vol, "Game.rom").unwrap();
        assert_eq!(transfer.phase(), Phase::Idle);
        transfer.upload(&mut spi, &mut vol).unwrap();
        assert_eq!(transfer.phase(), Phase::Uploading);
        assert_eq!(transfer.verify(&mut spi), [SPI_FILLER, SPI_FILLER]);
        assert_eq!(transfer.phase(), Phase::Idle);
        assert_eq!(vol.sectors_read, 0);
    }

    #[test]
    fn test_error_names() {
        let name: &'static str = TransferError::ReadError.into();
        assert_eq!(name, "READ-ERROR");
        let name: &'static str = TransferError::FileNotFound.into();
        assert_eq!(name, "FILE-NOT-FOUND");
    }
}
