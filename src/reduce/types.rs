/// Occurrence tally for one distinct transformed value.
///
/// Only classes seen on both sides get a `code` and take part in the
/// reduced comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EquivalenceClass {
    pub count_old: usize,
    pub count_new: usize,
    pub code: Option<usize>,
}

impl EquivalenceClass {
    pub fn is_shared(&self) -> bool {
        self.count_old > 0 && self.count_new > 0
    }
}

/// One side of the reduced problem: the class codes of the surviving
/// elements and, for each, its position in the original sequence.
#[derive(Debug, Default)]
pub(crate) struct Reduced {
    pub codes: Vec<usize>,
    pub positions: Vec<usize>,
}

impl Reduced {
    pub fn push(&mut self, code: usize, position: usize) {
        self.codes.push(code);
        self.positions.push(position);
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}
