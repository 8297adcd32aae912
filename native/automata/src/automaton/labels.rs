//! Interning of state and symbol labels to dense indices.

use indexmap::IndexSet;

/// Bidirectional label table. The index of a label is its position of first
/// insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    labels: IndexSet<String>,
}

impl Labels {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a label and return its index. Duplicates keep their first index.
    pub fn intern(&mut self, label: &str) -> u32 {
        if let Some(idx) = self.labels.get_index_of(label) {
            return idx as u32;
        }
        let (idx, _) = self.labels.insert_full(label.to_string());
        idx as u32
    }

    /// Get the index of a label, if interned.
    pub fn get(&self, label: &str) -> Option<u32> {
        self.labels.get_index_of(label).map(|idx| idx as u32)
    }

    /// Get the label at an index.
    ///
    /// Indices only come from this table, so a miss is a bug in the caller.
    pub fn label(&self, idx: u32) -> &str {
        self.labels
            .get_index(idx as usize)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("label index {idx} out of bounds"))
    }

    /// Get the number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over labels in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for Labels {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for label in iter {
            labels.intern(label);
        }
        labels
    }
}
