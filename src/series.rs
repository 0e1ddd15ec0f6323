use std::ops::Index;

/// Append-only sequence of per-bar values.
///
/// Every processed bar appends exactly one slot, so index `i` always refers
/// to the `i`-th bar fed into the engine. Undefined slots (warm-up, inactive
/// plot) are stored as `None` rather than being skipped, keeping all output
/// series of one engine aligned by index.
///
/// Slots are never rewritten once pushed.
#[derive(PartialEq, Clone, Debug)]
pub struct Series<T> {
    values: Vec<T>,
}

impl<T> Series<T> {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub(crate) fn push(&mut self, value: T) {
        self.values.push(value);
    }

    /// Number of slots, one per processed bar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no bar has been processed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Slot at bar index `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    /// Slot of the most recent bar, or `None` on an empty series.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// Iterator over all slots, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }
}

impl<T> Default for Series<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Series<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<'a, T> IntoIterator for &'a Series<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
