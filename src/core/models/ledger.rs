//! Append-only ledger of analyzed programs

use super::ProgramRecord;
use std::collections::BTreeSet;

/// Ordered sequence of [`ProgramRecord`]s.
///
/// Records keep insertion order and are never edited in place. The only way to
/// remove records is [`Ledger::clear`], which a session calls on a confirmed reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    records: Vec<ProgramRecord>,
}

impl Ledger {
    /// Empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record at the end
    pub fn append(&mut self, record: ProgramRecord) {
        crate::debug!("Ledger append: {} (#{})", record.name, self.records.len() + 1);
        self.records.push(record);
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, ProgramRecord> {
        self.records.iter()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no program has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given name (names are not unique)
    #[must_use]
    pub fn first_named(&self, name: &str) -> Option<&ProgramRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Distinct program names, sorted
    #[must_use]
    pub fn program_names(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ProgramRecord;
    type IntoIter = std::slice::Iter<'a, ProgramRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
