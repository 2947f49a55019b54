//! Forward traversal over committed records
//!
//! Records are addressed by [`RecordId`], an index into the storage, so ids
//! stay valid when the caller grows the storage between scan calls.

use super::arena::TokenBuffer;
use super::token::TokenRecord;
use serde::{Deserialize, Serialize};

/// Index of a committed record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(usize);

impl RecordId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl TokenBuffer {
    /// First committed record, `None` if nothing was committed
    pub fn first(&self) -> Option<RecordId> {
        (!self.is_empty()).then_some(RecordId(0))
    }

    /// Record following `current`, `None` if `current` is the last one
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self, current: RecordId) -> Option<RecordId> {
        let next = current.0 + 1;
        (next < self.len()).then_some(RecordId(next))
    }

    pub fn get(&self, id: RecordId) -> Option<&TokenRecord> {
        self.records().get(id.0)
    }

    pub fn iter(&self) -> Records<'_> {
        Records {
            buffer: self,
            cursor: self.first(),
        }
    }
}

/// Iterator over committed records, driven by `first`/`next`
#[derive(Debug, Clone)]
pub struct Records<'a> {
    buffer: &'a TokenBuffer,
    cursor: Option<RecordId>,
}

impl<'a> Iterator for Records<'a> {
    type Item = (RecordId, &'a TokenRecord);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let record = self.buffer.get(id)?;
        self.cursor = self.buffer.next(id);
        Some((id, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .cursor
            .map_or(0, |id| self.buffer.len().saturating_sub(id.0));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Records<'_> {}

impl<'a> IntoIterator for &'a TokenBuffer {
    type Item = (RecordId, &'a TokenRecord);
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenValue;
    use crate::utils::Position;

    fn filled(values: &[u64]) -> TokenBuffer {
        let mut buffer = TokenBuffer::with_capacity_records(values.len());
        for &v in values {
            buffer
                .acquire()
                .unwrap()
                .fill(TokenRecord::new(TokenValue::U64(v), Position::start()));
        }
        buffer
    }

    #[test]
    fn test_empty_buffer_has_no_first() {
        let buffer = TokenBuffer::with_capacity_records(4);
        assert_eq!(buffer.first(), None);
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn test_first_next_walk() {
        let buffer = filled(&[1, 2, 3]);
        let first = buffer.first().unwrap();
        let second = buffer.next(first).unwrap();
        let third = buffer.next(second).unwrap();
        assert_eq!(buffer.get(third).and_then(|r| r.as_u64()), Some(3));
        assert_eq!(buffer.next(third), None);
    }

    #[test]
    fn test_iterator_matches_walk() {
        let buffer = filled(&[7, 8]);
        let values: Vec<u64> = buffer.iter().filter_map(|(_, r)| r.as_u64()).collect();
        assert_eq!(values, vec![7, 8]);
        assert_eq!(buffer.iter().len(), 2);
    }

    #[test]
    fn test_ids_survive_growth() {
        let mut buffer = filled(&[5]);
        let first = buffer.first().unwrap();
        buffer.grow_to_records(64);
        assert_eq!(buffer.get(first).and_then(|r| r.as_u64()), Some(5));
    }
}
