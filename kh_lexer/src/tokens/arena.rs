//! Caller-owned record storage
//!
//! [`TokenBuffer`] is an append-only array of fixed-stride [`TokenRecord`]s
//! with a capacity expressed in bytes. The scanner only appends inside the
//! reserved capacity; growing the storage is always the caller's move,
//! typically in response to a `BufferExhausted` scan outcome.

use super::iter::RecordId;
use super::token::TokenRecord;

/// Bytes occupied by one record in the storage.
pub const RECORD_STRIDE: usize = std::mem::size_of::<TokenRecord>();

/// The next record would not fit in the storage.
///
/// Not a lexical error: the caller grows the storage and resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record storage exhausted: {write_offset} of {capacity} bytes used")]
pub struct ArenaExhausted {
    pub write_offset: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TokenBuffer {
    records: Vec<TokenRecord>,
    /// Capacity in bytes
    capacity: usize,
}

impl TokenBuffer {
    /// Storage of `bytes` bytes. Anything short of a whole record stride is
    /// unusable, so a buffer smaller than [`RECORD_STRIDE`] is exhausted
    /// before its first record.
    pub fn with_capacity_bytes(bytes: usize) -> Self {
        Self {
            records: Vec::with_capacity(bytes / RECORD_STRIDE),
            capacity: bytes,
        }
    }

    /// Storage for exactly `count` records
    pub fn with_capacity_records(count: usize) -> Self {
        Self::with_capacity_bytes(count.saturating_mul(RECORD_STRIDE))
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of whole records the capacity holds
    pub fn record_capacity(&self) -> usize {
        self.capacity / RECORD_STRIDE
    }

    /// Bytes already written
    pub fn write_offset(&self) -> usize {
        self.records.len() * RECORD_STRIDE
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that still fit before exhaustion
    pub fn remaining_records(&self) -> usize {
        self.record_capacity() - self.records.len()
    }

    /// Grow the storage to `bytes` bytes. Committed records and their ids
    /// are preserved; requests at or below the current capacity are ignored.
    pub fn grow_to_bytes(&mut self, bytes: usize) {
        if bytes <= self.capacity {
            return;
        }
        let target = bytes / RECORD_STRIDE;
        self.records
            .reserve_exact(target.saturating_sub(self.records.len()));
        self.capacity = bytes;
    }

    /// Grow the storage to hold `count` records
    pub fn grow_to_records(&mut self, count: usize) {
        self.grow_to_bytes(count.saturating_mul(RECORD_STRIDE));
    }

    /// Claim the next record slot.
    ///
    /// Fails when `write_offset + RECORD_STRIDE > capacity`.
    pub fn acquire(&mut self) -> Result<Slot<'_>, ArenaExhausted> {
        let write_offset = self.write_offset();
        if write_offset + RECORD_STRIDE > self.capacity {
            return Err(ArenaExhausted {
                write_offset,
                capacity: self.capacity,
            });
        }
        Ok(Slot {
            records: &mut self.records,
        })
    }

    /// All committed records, in lexeme order
    pub fn records(&self) -> &[TokenRecord] {
        &self.records
    }

    /// Take the committed records, releasing the storage
    pub fn into_records(self) -> Vec<TokenRecord> {
        self.records
    }
}

/// A claimed, not yet written record slot.
#[must_use = "a claimed slot must be filled with a record"]
#[derive(Debug)]
pub struct Slot<'a> {
    records: &'a mut Vec<TokenRecord>,
}

impl Slot<'_> {
    /// Id the record will receive once filled
    pub fn id(&self) -> RecordId {
        RecordId::new(self.records.len())
    }

    /// Write the record, committing the write offset
    pub fn fill(self, record: TokenRecord) -> RecordId {
        let id = self.id();
        debug_assert!(
            self.records.len() < self.records.capacity(),
            "slot fill must not reallocate the storage"
        );
        self.records.push(record);
        id
    }
}
