use std::collections::VecDeque;

use crate::model::record::RawRecord;

/// Recent raw lines for the inspector pane. Inserting at capacity evicts the
/// oldest entry.
#[derive(Debug)]
pub struct RawRecordHistory {
    entries: VecDeque<RawRecord>,
    capacity: usize,
}

impl RawRecordHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn append(&mut self, record: RawRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(record);
    }

    pub fn get(&self, idx: usize) -> Option<&RawRecord> {
        self.entries.get(idx)
    }

    pub fn field_count(&self, idx: usize) -> usize {
        self.entries.get(idx).map_or(0, |r| r.sorted_labels.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
