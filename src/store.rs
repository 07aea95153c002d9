use super::types::{Record, Year};

/// Every record seen so far. Lookups binary search on `year`, so `finalize_ordering` has
/// to run after the last insert and before the first lookup.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    ordered: bool,
}

impl RecordStore {
    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
        self.ordered = false;
    }

    /// Stable sort by year, so records sharing a year stay in insertion order. Safe to call
    /// again; an already-ordered store is left alone.
    pub fn finalize_ordering(&mut self) {
        if !self.ordered {
            self.records.sort_by_key(|record| record.year);
            self.ordered = true;
        }
    }

    /// All records with `low <= year <= high`, in ascending year order. An inverted range
    /// gives an empty slice.
    pub fn range_lookup(&self, low: Year, high: Year) -> &[Record] {
        debug_assert!(self.ordered, "range lookup on an unordered store");

        let start = self.records.partition_point(|record| record.year < low);
        let end = self.records.partition_point(|record| record.year <= high);

        if start < end {
            &self.records[start..end]
        } else {
            &[]
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
