//! Accumulated list results
//!
//! [`ResultStore`] holds the records of the current fetch cycle plus the
//! separately-managed count. Indexed lookup and the [`Cursor`] view are
//! independent: moving a cursor never changes what `get` returns.

use crate::api::normalize::Record;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    /// `None` until the first fetch cycle starts
    records: Option<Vec<Record>>,
    count: Option<u64>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle: records become an empty set; the count is kept
    pub fn reset(&mut self) {
        self.records = Some(Vec::new());
    }

    /// Append a record; indices continue from the last one
    pub fn append(&mut self, record: Record) {
        self.records.get_or_insert_with(Vec::new).push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.get_or_insert_with(Vec::new).extend(records);
    }

    /// Record at `index`, `None` if the list is unfilled or the index is out of range
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.as_ref().and_then(|records| records.get(index))
    }

    /// All records, `None` before any fetch
    pub fn all(&self) -> Option<&[Record]> {
        self.records.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn set_count(&mut self, count: Option<u64>) {
        self.count = count;
    }

    /// Text of one field of one record
    pub fn field(&self, index: usize, name: &str) -> Option<&str> {
        self.get(index).and_then(|record| record.text(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.all().unwrap_or_default().iter()
    }

    /// A fresh cursor positioned on the first record
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            records: self.all().unwrap_or_default(),
            position: 0,
        }
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Sequential view over a store with its own position
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    records: &'a [Record],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn current(&self) -> Option<&'a Record> {
        self.records.get(self.position)
    }

    pub fn key(&self) -> usize {
        self.position
    }

    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// False once the cursor has moved past the last record
    pub fn valid(&self) -> bool {
        self.position < self.records.len()
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record::new().with("ReportId", id)
    }

    #[test]
    fn test_unfilled_store() {
        let store = ResultStore::new();

        assert!(store.all().is_none());
        assert!(store.get(0).is_none());
        assert_eq!(store.count(), None);
        assert!(!store.cursor().valid());
    }

    #[test]
    fn test_indices_are_stable_across_appends() {
        let mut store = ResultStore::new();
        store.reset();
        store.extend([record("a")]);
        store.extend([record("b"), record("c")]);

        assert_eq!(store.field(0, "ReportId"), Some("a"));
        assert_eq!(store.field(1, "ReportId"), Some("b"));
        assert_eq!(store.field(2, "ReportId"), Some("c"));
        assert!(store.get(99).is_none());
    }

    #[test]
    fn test_reset_keeps_count() {
        let mut store = ResultStore::new();
        store.append(record("a"));
        store.set_count(Some(12));
        store.reset();

        assert_eq!(store.all(), Some(&[][..]));
        assert_eq!(store.count(), Some(12));
    }

    #[test]
    fn test_cursor_protocol() {
        let mut store = ResultStore::new();
        store.extend([record("a"), record("b")]);

        let mut cursor = store.cursor();
        assert!(cursor.valid());
        assert_eq!(cursor.key(), 0);
        assert_eq!(cursor.current().and_then(|r| r.text("ReportId")), Some("a"));

        cursor.advance();
        assert_eq!(cursor.key(), 1);
        assert_eq!(cursor.current().and_then(|r| r.text("ReportId")), Some("b"));

        cursor.advance();
        assert!(!cursor.valid());
        assert!(cursor.current().is_none());

        cursor.rewind();
        assert_eq!(cursor.key(), 0);
        assert!(cursor.valid());

        // indexed access is unaffected by the cursor
        assert_eq!(store.field(1, "ReportId"), Some("b"));
    }

    #[test]
    fn test_iteration() {
        let mut store = ResultStore::new();
        store.extend([record("a"), record("b")]);

        let ids: Vec<_> = (&store).into_iter().filter_map(|r| r.text("ReportId")).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
