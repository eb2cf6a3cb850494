use crate::calculate_offsets;

use super::layout::{
    FREE_SPACE_START_OFFSET, FREE_SPACE_START_SIZE, PAGE_HEADER_SIZE, PAGE_ID_OFFSET, PAGE_ID_SIZE,
    PAGE_SIZE, SLOT_ACTIVE_OFFSET, SLOT_ACTIVE_SIZE, SLOT_COUNT_OFFSET, SLOT_COUNT_SIZE,
    SLOT_ENTRY_SIZE, SLOT_LENGTH_OFFSET, SLOT_LENGTH_SIZE, SLOT_OFFSET_OFFSET, SLOT_OFFSET_SIZE,
};

/// One entry of a page's slot directory.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlotEntry {
    offset: u16,
    length: u16,
    active: bool,
}

impl SlotEntry {
    fn to_bytes(self) -> [u8; SLOT_ENTRY_SIZE] {
        let mut raw = [0x0; SLOT_ENTRY_SIZE];

        let (start, end) = calculate_offsets!(SLOT_ACTIVE_OFFSET, SLOT_ACTIVE_SIZE);
        raw[start..end].clone_from_slice(&[self.active as u8]);

        let (start, end) = calculate_offsets!(SLOT_LENGTH_OFFSET, SLOT_LENGTH_SIZE);
        raw[start..end].clone_from_slice(&self.length.to_le_bytes());

        let (start, end) = calculate_offsets!(SLOT_OFFSET_OFFSET, SLOT_OFFSET_SIZE);
        raw[start..end].clone_from_slice(&self.offset.to_le_bytes());

        raw
    }

    fn from_bytes(raw: &[u8]) -> Self {
        let (start, end) = calculate_offsets!(SLOT_ACTIVE_OFFSET, SLOT_ACTIVE_SIZE);
        let active = raw[start..end][0] != 0;

        let (start, end) = calculate_offsets!(SLOT_LENGTH_OFFSET, SLOT_LENGTH_SIZE);
        let length = u16::from_le_bytes(
            raw[start..end]
                .try_into()
                .expect("slot length is two bytes"),
        );

        let (start, end) = calculate_offsets!(SLOT_OFFSET_OFFSET, SLOT_OFFSET_SIZE);
        let offset = u16::from_le_bytes(
            raw[start..end]
                .try_into()
                .expect("slot offset is two bytes"),
        );

        Self {
            offset,
            length,
            active,
        }
    }
}

/// On-disk structure for storing raw record bytes.
///
/// Records grow forward from the 64-byte header; the slot directory
/// grows backward from the end of the page. Deleting only tombstones a
/// slot, so space is reclaimed exclusively by the whole-table rewrite.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: u32,
    slots: Vec<SlotEntry>,
    free_start: u16,
    data: [u8; PAGE_SIZE],
}

impl Page {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            slots: Vec::new(),
            free_start: PAGE_HEADER_SIZE as u16,
            data: [0x0; PAGE_SIZE],
        }
    }

    pub fn slot_count(&self) -> u16 {
        self.slots.len() as u16
    }

    /// Bytes still available between the data region and the slot directory.
    pub fn free_space(&self) -> usize {
        let used = self.free_start as usize + self.slots.len() * SLOT_ENTRY_SIZE;
        PAGE_SIZE.saturating_sub(used)
    }

    /// Copies record bytes into the data region and returns the new slot id.
    ///
    /// Returns `None` when the record plus one slot entry no longer fit.
    pub fn insert_raw_record(&mut self, bytes: &[u8]) -> Option<u16> {
        if self.free_space() < bytes.len() + SLOT_ENTRY_SIZE {
            return None;
        }

        let start = self.free_start as usize;
        self.data[start..start + bytes.len()].clone_from_slice(bytes);

        self.slots.push(SlotEntry {
            offset: self.free_start,
            length: bytes.len() as u16,
            active: true,
        });
        self.free_start += bytes.len() as u16;

        Some((self.slots.len() - 1) as u16)
    }

    /// Marks a slot inactive. The record bytes stay in place.
    pub fn delete_slot(&mut self, slot_id: u16) -> bool {
        match self.slots.get_mut(slot_id as usize) {
            Some(slot) if slot.active => {
                slot.active = false;
                true
            }
            _ => false,
        }
    }

    /// Reads the bytes behind an active slot.
    pub fn read_raw_record(&self, slot_id: u16) -> Option<Vec<u8>> {
        let slot = self.slots.get(slot_id as usize)?;
        if !slot.active {
            return None;
        }

        let start = slot.offset as usize;
        let end = start + slot.length as usize;
        if end > PAGE_SIZE {
            return None;
        }

        Some(self.data[start..end].to_vec())
    }

    /// Produces the exact 8192-byte on-disk image of the page.
    pub fn to_bytes(&self) -> [u8; PAGE_SIZE] {
        let mut buffer = [0x0; PAGE_SIZE];

        let (start, end) = calculate_offsets!(PAGE_ID_OFFSET, PAGE_ID_SIZE);
        buffer[start..end].clone_from_slice(&self.id.to_le_bytes());

        let (start, end) = calculate_offsets!(SLOT_COUNT_OFFSET, SLOT_COUNT_SIZE);
        buffer[start..end].clone_from_slice(&self.slot_count().to_le_bytes());

        let (start, end) = calculate_offsets!(FREE_SPACE_START_OFFSET, FREE_SPACE_START_SIZE);
        buffer[start..end].clone_from_slice(&self.free_start.to_le_bytes());

        let data_end = self.free_start as usize;
        buffer[PAGE_HEADER_SIZE..data_end].clone_from_slice(&self.data[PAGE_HEADER_SIZE..data_end]);

        // Directory is written back-to-front: the highest slot id sits
        // at the very end of the page.
        let mut pos = PAGE_SIZE;
        for slot in self.slots.iter().rev() {
            pos -= SLOT_ENTRY_SIZE;
            buffer[pos..pos + SLOT_ENTRY_SIZE].clone_from_slice(&slot.to_bytes());
        }

        buffer
    }

    /// Reconstructs a page from its on-disk image.
    pub fn from_bytes(buffer: &[u8; PAGE_SIZE]) -> Self {
        let (start, end) = calculate_offsets!(PAGE_ID_OFFSET, PAGE_ID_SIZE);
        let id = u32::from_le_bytes(buffer[start..end].try_into().expect("page id is four bytes"));

        let (start, end) = calculate_offsets!(SLOT_COUNT_OFFSET, SLOT_COUNT_SIZE);
        let slot_count = u16::from_le_bytes(
            buffer[start..end]
                .try_into()
                .expect("slot count is two bytes"),
        );

        let (start, end) = calculate_offsets!(FREE_SPACE_START_OFFSET, FREE_SPACE_START_SIZE);
        let free_start = u16::from_le_bytes(
            buffer[start..end]
                .try_into()
                .expect("free space start is two bytes"),
        );
        // A corrupt header must not break the free space arithmetic.
        let free_start = free_start.clamp(PAGE_HEADER_SIZE as u16, PAGE_SIZE as u16);

        let mut slots = Vec::with_capacity(slot_count as usize);
        let mut pos = PAGE_SIZE;
        for _ in 0..slot_count {
            if pos < SLOT_ENTRY_SIZE {
                break;
            }
            pos -= SLOT_ENTRY_SIZE;
            slots.push(SlotEntry::from_bytes(&buffer[pos..pos + SLOT_ENTRY_SIZE]));
        }
        slots.reverse();

        Self {
            id,
            slots,
            free_start,
            data: *buffer,
        }
    }
}
