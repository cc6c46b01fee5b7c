use crate::myers::Edit;

/// A contiguous block of changes with its surrounding context.
///
/// `old_start` and `new_start` are 0-based positions of the first line the
/// hunk covers on each side. Within one replacement run, deletions come
/// before insertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    pub old_start: usize,
    pub new_start: usize,
    pub changes: Vec<Edit<T>>,
}

impl<T> Hunk<T> {
    pub fn new(old_start: usize, new_start: usize) -> Self {
        Hunk {
            old_start,
            new_start,
            changes: vec![],
        }
    }

    /// Lines the hunk reads from the old side.
    pub fn old_len(&self) -> usize {
        self.changes
            .iter()
            .filter(|e| !matches!(e, Edit::Insert(_)))
            .count()
    }

    /// Lines the hunk produces on the new side.
    pub fn new_len(&self) -> usize {
        self.changes
            .iter()
            .filter(|e| !matches!(e, Edit::Delete(_)))
            .count()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Hunk<U> {
        Hunk {
            old_start: self.old_start,
            new_start: self.new_start,
            changes: self.changes.into_iter().map(|e| e.map(&mut f)).collect(),
        }
    }
}
