/// A single command of an edit script.
///
/// `Keep` holds the element as it appears in the old sequence and in the new
/// one. The two can differ when equality was decided on transformed lines,
/// and both are `None` for lines a parsed patch never spelled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Keep(Option<T>, Option<T>),
    Insert(T),
    Delete(T),
}

impl<T> Edit<T> {
    /// A `Keep` with both sides present.
    pub fn keep(old: T, new: T) -> Self {
        Edit::Keep(Some(old), Some(new))
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Edit::Keep(..))
    }

    /// Borrowing view of the command.
    pub fn as_ref(&self) -> Edit<&T> {
        match self {
            Edit::Keep(old, new) => Edit::Keep(old.as_ref(), new.as_ref()),
            Edit::Insert(el) => Edit::Insert(el),
            Edit::Delete(el) => Edit::Delete(el),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Edit<U> {
        match self {
            Edit::Keep(old, new) => Edit::Keep(old.map(&mut f), new.map(&mut f)),
            Edit::Insert(el) => Edit::Insert(f(el)),
            Edit::Delete(el) => Edit::Delete(f(el)),
        }
    }
}

/// Maximal diagonal run of matching elements, `start..end` on the old side
/// and `start - diag..end - diag` on the new side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Snake {
    pub start: usize,
    pub end: usize,
    pub diag: isize,
}

impl Snake {
    pub fn new_start(&self) -> usize {
        (self.start as isize - self.diag) as usize
    }

    pub fn new_end(&self) -> usize {
        (self.end as isize - self.diag) as usize
    }
}

/// Index-level output of the comparator, materialized into an edit script
/// once the elements behind the indices are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Keep(usize, usize),
    Insert(usize),
    Delete(usize),
}
