use crate::myers;
use crate::reduce;
use crate::script::EditScript;
use crate::transform::Transform;
use std::borrow::Cow;
use tracing::debug;

/// Combined input size from which [`diff_with`] switches to the reducer.
pub const DEFAULT_REDUCE_THRESHOLD: usize = 256;

/// How two line sequences are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    pub transform: Transform,
    /// Inputs with at least this many lines in total go through the
    /// equivalence-class reducer. `None` always compares directly.
    pub reduce_threshold: Option<usize>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            transform: Transform::IDENTITY,
            reduce_threshold: Some(DEFAULT_REDUCE_THRESHOLD),
        }
    }
}

impl DiffOptions {
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn reduce_threshold(mut self, threshold: Option<usize>) -> Self {
        self.reduce_threshold = threshold;
        self
    }

    fn reduces(&self, total: usize) -> bool {
        self.reduce_threshold.is_some_and(|t| total >= t)
    }
}

/// Diffs two line sequences under `options`.
///
/// Lines are compared after `options.transform`; the script holds the
/// original lines.
pub fn diff_with<T>(old: &[T], new: &[T], options: &DiffOptions) -> EditScript<T>
where
    T: AsRef<str> + Clone,
{
    let transform = options.transform;
    let total = old.len() + new.len();

    if options.reduces(total) {
        debug!(old = old.len(), new = new.len(), "diffing through equivalence classes");
        return reduce::diff_reduced(old, new, |line| transform.apply(line.as_ref()));
    }

    if transform.is_identity() {
        debug!(old = old.len(), new = new.len(), "diffing directly");
        myers::diff_by(old, new, |a, b| a.as_ref() == b.as_ref())
    } else {
        debug!(old = old.len(), new = new.len(), ?transform, "diffing transformed lines");
        let old_keys: Vec<Cow<'_, str>> = old.iter().map(|l| transform.apply(l.as_ref())).collect();
        let new_keys: Vec<Cow<'_, str>> = new.iter().map(|l| transform.apply(l.as_ref())).collect();
        myers::diff_keyed(old, new, &old_keys, &new_keys)
    }
}

/// Splits both texts into lines, terminators included, and diffs them under
/// `options`.
pub fn diff_text<'a>(old: &'a str, new: &'a str, options: &DiffOptions) -> EditScript<&'a str> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    diff_with(&old_lines, &new_lines, options)
}

/// Lines of `text`, each keeping its `\n`. A final line without one is kept
/// as is.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}
