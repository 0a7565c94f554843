//! Config file in two alternating flash blocks
//!
//! Each block starts with a header (magic, payload length, sequence number,
//! payload checksum) followed by the JSON payload. A write always targets the
//! block that does not hold the newest copy, so an interrupted erase or write
//! leaves the previous copy loadable.

use alloc::vec;
use alloc::vec::Vec;

use embedded_storage::nor_flash::NorFlash;
use log::debug;

use crate::domain::error::StorageError;
use crate::domain::ports::ConfigStore;

/// Size of one slot. Must be a multiple of the flash erase size.
pub const FLASH_BLOCK_SIZE: u32 = 4096;
/// Flash span used by both slots
pub const FLASH_STORE_SIZE: u32 = 2 * FLASH_BLOCK_SIZE;

const MAGIC_HEADER: u16 = 0xBEEF;
const HEADER_SIZE: usize = 12;

/// Largest payload that fits one slot
pub const MAX_CONFIG_SIZE: usize = FLASH_BLOCK_SIZE as usize - HEADER_SIZE;

#[derive(Debug, Clone, Copy)]
struct SlotHeader {
    len: u16,
    sequence: u32,
    checksum: u32,
}

impl SlotHeader {
    fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.len.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.sequence.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    fn decode(bytes: &[u8; HEADER_SIZE]) -> Option<Self> {
        if u16::from_le_bytes([bytes[0], bytes[1]]) != MAGIC_HEADER {
            return None;
        }
        Some(Self {
            len: u16::from_le_bytes([bytes[2], bytes[3]]),
            sequence: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            checksum: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// FNV-1a
fn checksum(data: &[u8]) -> u32 {
    data.iter().fold(0x811c_9dc5, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// Whether sequence `a` was written after `b`, across wrap-around
#[allow(clippy::cast_possible_wrap)]
fn is_newer(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) > 0
}

struct SlotCopy {
    slot: u32,
    sequence: u32,
    data: Vec<u8>,
}

/// [`ConfigStore`] over two flash blocks starting at `base`
pub struct FlashConfigStore<F> {
    flash: F,
    base: u32,
}

impl<F: NorFlash> FlashConfigStore<F> {
    pub fn new(flash: F, base: u32) -> Self {
        Self { flash, base }
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn slot_addr(&self, slot: u32) -> u32 {
        self.base + slot * FLASH_BLOCK_SIZE
    }

    /// Complete copy held by `slot`, if any
    #[allow(clippy::cast_possible_truncation)]
    fn read_slot(&mut self, slot: u32) -> Result<Option<SlotCopy>, StorageError> {
        let addr = self.slot_addr(slot);
        let mut raw = [0u8; HEADER_SIZE];
        self.flash
            .read(addr, &mut raw)
            .map_err(|_| StorageError::DriverError)?;

        let Some(header) = SlotHeader::decode(&raw) else {
            return Ok(None);
        };
        let len = usize::from(header.len);
        if len > MAX_CONFIG_SIZE {
            return Ok(None);
        }

        let mut data = vec![0u8; len.next_multiple_of(F::READ_SIZE)];
        self.flash
            .read(addr + HEADER_SIZE as u32, &mut data)
            .map_err(|_| StorageError::DriverError)?;
        data.truncate(len);

        if checksum(&data) != header.checksum {
            debug!("storage: slot {} holds a torn write", slot);
            return Ok(None);
        }
        Ok(Some(SlotCopy {
            slot,
            sequence: header.sequence,
            data,
        }))
    }

    fn newest(&mut self) -> Result<Option<SlotCopy>, StorageError> {
        let first = self.read_slot(0)?;
        let second = self.read_slot(1)?;
        Ok(match (first, second) {
            (Some(a), Some(b)) if is_newer(b.sequence, a.sequence) => Some(b),
            (Some(a), _) => Some(a),
            (None, b) => b,
        })
    }
}

impl<F: NorFlash> ConfigStore for FlashConfigStore<F> {
    async fn load(&mut self) -> Result<Vec<u8>, StorageError> {
        let copy = self.newest()?.ok_or(StorageError::InvalidMagicHeader)?;
        debug!(
            "storage: loaded slot {}, sequence {}",
            copy.slot, copy.sequence
        );
        Ok(copy.data)
    }

    async fn store(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_CONFIG_SIZE {
            return Err(StorageError::TooLarge);
        }
        let len = u16::try_from(data.len()).map_err(|_| StorageError::TooLarge)?;

        let (slot, sequence) = match self.newest()? {
            Some(copy) => (1 - copy.slot, copy.sequence.wrapping_add(1)),
            None => (0, 1),
        };
        let header = SlotHeader {
            len,
            sequence,
            checksum: checksum(data),
        };

        let padded = (HEADER_SIZE + data.len()).next_multiple_of(F::WRITE_SIZE);
        let mut block = vec![0xFFu8; padded];
        block[..HEADER_SIZE].copy_from_slice(&header.encode());
        block[HEADER_SIZE..HEADER_SIZE + data.len()].copy_from_slice(data);

        let addr = self.slot_addr(slot);
        self.flash
            .erase(addr, addr + FLASH_BLOCK_SIZE)
            .map_err(|_| StorageError::DriverError)?;
        self.flash
            .write(addr, &block)
            .map_err(|_| StorageError::DriverError)?;

        debug!("storage: wrote slot {}, sequence {}", slot, sequence);
        Ok(())
    }
}
