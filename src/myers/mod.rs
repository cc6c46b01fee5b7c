pub mod types;
pub use types::*;

use crate::script::EditScript;
use tracing::trace;

/// Linear-space Myers comparator over two index ranges.
///
/// Elements are never touched directly: `equate(i, j)` answers whether
/// element `i` of the old sequence equals element `j` of the new one, which
/// lets the same search run over raw elements, transformed keys or
/// equivalence-class codes. The two frontier arrays are sized once for the
/// whole comparison and reused by every recursive split.
pub(crate) struct SequencesComparator<E> {
    old_len: usize,
    new_len: usize,
    equate: E,
    down: Vec<isize>,
    up: Vec<isize>,
}

impl<E: Fn(usize, usize) -> bool> SequencesComparator<E> {
    pub fn new(old_len: usize, new_len: usize, equate: E) -> Self {
        let size = old_len + new_len + 2;
        SequencesComparator {
            old_len,
            new_len,
            equate,
            down: vec![0; size],
            up: vec![0; size],
        }
    }

    /// Runs the comparison and returns the index-level script.
    pub fn steps(mut self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.old_len.max(self.new_len));
        self.build_script(0, self.old_len, 0, self.new_len, &mut steps);
        steps
    }

    fn equal(&self, i: isize, j: isize) -> bool {
        (self.equate)(i as usize, j as usize)
    }

    fn build_script(
        &mut self,
        mut start1: usize,
        end1: usize,
        mut start2: usize,
        end2: usize,
        steps: &mut Vec<Step>,
    ) {
        while start1 < end1 && start2 < end2 && (self.equate)(start1, start2) {
            steps.push(Step::Keep(start1, start2));
            start1 += 1;
            start2 += 1;
        }

        // the suffix is found back to front but must be emitted last
        let mut suffix = 0;
        while start1 < end1 - suffix
            && start2 < end2 - suffix
            && (self.equate)(end1 - suffix - 1, end2 - suffix - 1)
        {
            suffix += 1;
        }
        let end1 = end1 - suffix;
        let end2 = end2 - suffix;

        if start1 == end1 {
            steps.extend((start2..end2).map(Step::Insert));
        } else if start2 == end2 {
            steps.extend((start1..end1).map(Step::Delete));
        } else {
            match self.middle_snake(start1, end1, start2, end2) {
                Some(snake)
                    if !(snake.start == end1 && snake.diag == end1 as isize - end2 as isize)
                        && !(snake.end == start1
                            && snake.diag == start1 as isize - start2 as isize) =>
                {
                    trace!(?snake, start1, end1, start2, end2, "split on middle snake");
                    self.build_script(start1, snake.start, start2, snake.new_start(), steps);
                    steps.extend((snake.start..snake.end).map(|i| {
                        Step::Keep(i, (i as isize - snake.diag) as usize)
                    }));
                    self.build_script(snake.end, end1, snake.new_end(), end2, steps);
                }
                _ => self.linear_merge(start1, end1, start2, end2, steps),
            }
        }

        steps.extend((0..suffix).map(|i| Step::Keep(end1 + i, end2 + i)));
    }

    /// Walks both ranges directly, shrinking whichever range is larger when
    /// the current elements differ.
    fn linear_merge(
        &self,
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
        steps: &mut Vec<Step>,
    ) {
        let prefer_delete = end1 - start1 > end2 - start2;
        let (mut i, mut j) = (start1, start2);
        while i < end1 || j < end2 {
            if i < end1 && j < end2 && (self.equate)(i, j) {
                steps.push(Step::Keep(i, j));
                i += 1;
                j += 1;
            } else if i < end1 && (j >= end2 || prefer_delete) {
                steps.push(Step::Delete(i));
                i += 1;
            } else {
                steps.push(Step::Insert(j));
                j += 1;
            }
        }
    }

    /// Finds the snake where the forward and backward frontiers first meet.
    ///
    /// Diagonal `k` holds the points with `x - start1 == y - start2 + k`.
    /// `down[k + offset]` is the furthest `x` reached from the top-left
    /// corner, `up[k + offset - delta]` the smallest `x` reached from the
    /// bottom-right one. When `delta` is odd the overlap is checked after
    /// each forward extension, otherwise after each backward one.
    fn middle_snake(
        &mut self,
        start1: usize,
        end1: usize,
        start2: usize,
        end2: usize,
    ) -> Option<Snake> {
        let m = (end1 - start1) as isize;
        let n = (end2 - start2) as isize;
        if m == 0 || n == 0 {
            return None;
        }
        let (s1, e1, s2, e2) = (
            start1 as isize,
            end1 as isize,
            start2 as isize,
            end2 as isize,
        );

        let delta = m - n;
        let sum = n + m;
        let odd = delta % 2 != 0;
        let offset = (if sum % 2 == 0 { sum } else { sum + 1 }) / 2;
        let at = |i: isize| i as usize;

        self.down[at(1 + offset)] = s1;
        self.up[at(1 + offset)] = e1 + 1;

        for d in 0..=offset {
            let mut k = -d;
            while k <= d {
                let i = at(k + offset);
                self.down[i] = if k == -d || (k != d && self.down[i - 1] < self.down[i + 1]) {
                    self.down[i + 1]
                } else {
                    self.down[i - 1] + 1
                };

                let mut x = self.down[i];
                let mut y = x - s1 + s2 - k;
                while x < e1 && y < e2 && self.equal(x, y) {
                    x += 1;
                    y += 1;
                    self.down[i] = x;
                }

                if odd
                    && delta - d <= k
                    && k <= delta + d
                    && self.up[at(k + offset - delta)] <= self.down[i]
                {
                    let start = self.up[at(k + offset - delta)];
                    return Some(self.build_snake(start, k + s1 - s2, e1, e2));
                }
                k += 2;
            }

            let mut k = delta - d;
            while k <= delta + d {
                let i = at(k + offset - delta);
                self.up[i] = if k == delta - d
                    || (k != delta + d && self.up[i + 1] <= self.up[i - 1])
                {
                    self.up[i + 1] - 1
                } else {
                    self.up[i - 1]
                };

                let mut x = self.up[i] - 1;
                let mut y = x - s1 + s2 - k;
                while x >= s1 && y >= s2 && self.equal(x, y) {
                    self.up[i] = x;
                    x -= 1;
                    y -= 1;
                }

                if !odd && -d <= k && k <= d && self.up[i] <= self.down[at(k + offset)] {
                    return Some(self.build_snake(self.up[i], k + s1 - s2, e1, e2));
                }
                k += 2;
            }
        }

        None
    }

    fn build_snake(&self, start: isize, diag: isize, end1: isize, end2: isize) -> Snake {
        let mut end = start;
        while end - diag < end2 && end < end1 && self.equal(end, end - diag) {
            end += 1;
        }
        Snake {
            start: start as usize,
            end: end as usize,
            diag,
        }
    }
}

fn materialize<T: Clone>(old: &[T], new: &[T], steps: Vec<Step>) -> EditScript<T> {
    let mut script = EditScript::with_capacity(steps.len());
    for step in steps {
        match step {
            Step::Keep(i, j) => script.append_keep(Some(old[i].clone()), Some(new[j].clone())),
            Step::Insert(j) => script.append_insert(new[j].clone()),
            Step::Delete(i) => script.append_delete(old[i].clone()),
        }
    }
    script
}

/// Computes the shortest edit script between two sequences using Myers'
/// divide-and-conquer search.
///
/// # Examples
///
/// ```
/// use linediff::myers::{diff, Edit};
///
/// let old = vec![1, 2, 3];
/// let new = vec![1, 3, 4];
/// let result = diff(&old, &new);
/// assert_eq!(result.commands(), &[
///     Edit::keep(1, 1),
///     Edit::Delete(2),
///     Edit::keep(3, 3),
///     Edit::Insert(4),
/// ]);
/// ```
pub fn diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> EditScript<T> {
    diff_by(old, new, |a, b| a == b)
}

/// Like [`diff`], deciding equality with `eq`. The old element is always
/// passed first.
pub fn diff_by<T, F>(old: &[T], new: &[T], eq: F) -> EditScript<T>
where
    T: Clone,
    F: Fn(&T, &T) -> bool,
{
    let steps = SequencesComparator::new(old.len(), new.len(), |i, j| eq(&old[i], &new[j])).steps();
    materialize(old, new, steps)
}

/// Compares `old_keys` against `new_keys` and emits the elements of `old`
/// and `new` found at the same positions.
///
/// # Panics
///
/// Panics if a key slice and its element slice differ in length.
pub fn diff_keyed<T, K>(old: &[T], new: &[T], old_keys: &[K], new_keys: &[K]) -> EditScript<T>
where
    T: Clone,
    K: PartialEq,
{
    assert_eq!(old.len(), old_keys.len(), "old keys out of step with elements");
    assert_eq!(new.len(), new_keys.len(), "new keys out of step with elements");
    let steps =
        SequencesComparator::new(old.len(), new.len(), |i, j| old_keys[i] == new_keys[j]).steps();
    materialize(old, new, steps)
}

/// Splits both texts into lines, terminators included, and diffs them.
pub fn diff_lines<'a>(old: &'a str, new: &'a str) -> EditScript<&'a str> {
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    diff(&old_lines, &new_lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn counts<T>(script: &EditScript<T>) -> (usize, usize, usize) {
        let deletes = script.iter().filter(|c| matches!(c, Edit::Delete(_))).count();
        let keeps = script.iter().filter(|c| c.is_keep()).count();
        let inserts = script.iter().filter(|c| matches!(c, Edit::Insert(_))).count();
        (deletes, keeps, inserts)
    }

    fn lcs_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
        let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for i in (0..a.len()).rev() {
            for j in (0..b.len()).rev() {
                table[i][j] = if a[i] == b[j] {
                    table[i + 1][j + 1] + 1
                } else {
                    table[i + 1][j].max(table[i][j + 1])
                };
            }
        }
        table[0][0]
    }

    proptest! {
        #[test]
        fn test_length_invariant(old: Vec<u8>, new: Vec<u8>) {
            let result = diff(&old, &new);
            let (deletes, equals, inserts) = counts(&result);
            prop_assert_eq!(old.len(), deletes + equals);
            prop_assert_eq!(new.len(), inserts + equals);
            prop_assert_eq!(result.common_length(), equals);
            prop_assert_eq!(result.modification_count(), deletes + inserts);
            prop_assert_eq!(result.common_length() + result.modification_count(), result.len());
        }

        #[test]
        fn test_reconstructs_both_sides(
            old in prop::collection::vec(0u8..5, 0..40),
            new in prop::collection::vec(0u8..5, 0..40),
        ) {
            let result = diff(&old, &new);
            let rebuilt_old: Vec<u8> =
                result.old_sequence().unwrap().into_iter().copied().collect();
            let rebuilt_new: Vec<u8> =
                result.new_sequence().unwrap().into_iter().copied().collect();
            prop_assert_eq!(rebuilt_old, old);
            prop_assert_eq!(rebuilt_new, new);
        }

        #[test]
        fn test_minimal_against_brute_force(
            old in prop::collection::vec(0u8..3, 0..=8),
            new in prop::collection::vec(0u8..3, 0..=8),
        ) {
            let result = diff(&old, &new);
            prop_assert_eq!(result.common_length(), lcs_len(&old, &new));
        }

        #[test]
        fn test_idempotency(els: Vec<u8>) {
            let result = diff(&els, &els);
            let expected: Vec<Edit<u8>> = els.iter().map(|e| Edit::keep(*e, *e)).collect();
            prop_assert_eq!(result.modification_count(), 0);
            prop_assert_eq!(result.common_length(), els.len());
            prop_assert_eq!(result.commands(), expected.as_slice());
        }

        #[test]
        fn test_new_empty(els: Vec<u8>) {
            let result = diff(&els, &[]);
            let expected: Vec<Edit<u8>> = els.iter().map(|e| Edit::Delete(*e)).collect();
            prop_assert_eq!(result.commands(), expected.as_slice());
        }

        #[test]
        fn test_old_empty(els: Vec<u8>) {
            let result = diff(&[], &els);
            let expected: Vec<Edit<u8>> = els.iter().map(|e| Edit::Insert(*e)).collect();
            prop_assert_eq!(result.commands(), expected.as_slice());
        }

        #[test]
        fn test_symmetry(old: Vec<u8>, new: Vec<u8>) {
            let (deletes, equals, inserts) = counts(&diff(&old, &new));
            let (deletes_2, equals_2, inserts_2) = counts(&diff(&new, &old));

            prop_assert_eq!(equals, equals_2);
            prop_assert_eq!(inserts, deletes_2);
            prop_assert_eq!(deletes, inserts_2);
        }
    }

    #[test]
    fn test_diff_lines() {
        let old = "hello\nworld\nfoo";
        let new = "hello\nrust\nfoo";
        let result = diff_lines(old, new);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep("hello\n", "hello\n"),
                Edit::Insert("rust\n"),
                Edit::Delete("world\n"),
                Edit::keep("foo", "foo"),
            ]
        );
    }

    #[test]
    fn test_simple_diff() {
        let old = vec!["a", "b", "c"];
        let new = vec!["a", "x", "c"];
        let result = diff(&old, &new);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep("a", "a"),
                Edit::Insert("x"),
                Edit::Delete("b"),
                Edit::keep("c", "c"),
            ]
        );
        assert_eq!(result.common_length(), 2);
        assert_eq!(result.modification_count(), 2);
    }

    #[test]
    fn test_completely_different() {
        let old = vec!["a", "b", "c"];
        let new = vec!["x", "y", "z"];
        let result = diff(&old, &new);
        assert_eq!(
            result.commands(),
            &[
                Edit::Insert("x"),
                Edit::Insert("y"),
                Edit::Insert("z"),
                Edit::Delete("a"),
                Edit::Delete("b"),
                Edit::Delete("c"),
            ]
        )
    }

    #[test]
    fn test_single_element_different() {
        let result = diff(&["a"], &["b"]);
        assert_eq!(result.commands(), &[Edit::Insert("b"), Edit::Delete("a")]);
    }

    #[test]
    fn test_duplicates() {
        let old = vec!["a", "a", "b"];
        let new = vec!["a", "b", "b"];
        let result = diff(&old, &new);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep("a", "a"),
                Edit::Insert("b"),
                Edit::Delete("a"),
                Edit::keep("b", "b"),
            ]
        );
    }

    #[test]
    fn test_insertion_in_middle() {
        let result = diff(&["a", "c"], &["a", "b", "c"]);
        assert_eq!(
            result.commands(),
            &[Edit::keep("a", "a"), Edit::Insert("b"), Edit::keep("c", "c")]
        );
    }

    #[test]
    fn test_interleaved_changes() {
        let old: Vec<char> = "abcabba".chars().collect();
        let new: Vec<char> = "cbabac".chars().collect();
        let result = diff(&old, &new);
        assert_eq!(
            result.commands(),
            &[
                Edit::Insert('c'),
                Edit::Delete('a'),
                Edit::keep('b', 'b'),
                Edit::Delete('c'),
                Edit::keep('a', 'a'),
                Edit::keep('b', 'b'),
                Edit::Delete('b'),
                Edit::keep('a', 'a'),
                Edit::Insert('c'),
            ]
        );
    }

    #[test]
    fn test_equality_sees_old_element_first() {
        let old = vec![10, 20, 30];
        let new = vec![1, 2, 3];
        // only holds one way round
        let result = diff_by(&old, &new, |a, b| *a == *b * 10);
        assert_eq!(result.common_length(), 3);
        assert_eq!(result.commands()[0], Edit::keep(10, 1));
    }

    #[test]
    fn test_keyed_emits_original_elements() {
        let old = vec!["A\n", "b\n"];
        let new = vec!["a\n", "B\n", "c\n"];
        let old_keys: Vec<String> = old.iter().map(|l| l.to_lowercase()).collect();
        let new_keys: Vec<String> = new.iter().map(|l| l.to_lowercase()).collect();
        let result = diff_keyed(&old, &new, &old_keys, &new_keys);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep("A\n", "a\n"),
                Edit::keep("b\n", "B\n"),
                Edit::Insert("c\n"),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "out of step")]
    fn test_keyed_length_mismatch_panics() {
        let _ = diff_keyed(&["a"], &["a"], &["a", "b"], &["a"]);
    }

    #[test]
    fn test_linear_merge_prefers_larger_side() {
        let comparator = SequencesComparator::new(3, 1, |i, j| i == 2 && j == 0);
        let mut steps = vec![];
        comparator.linear_merge(0, 3, 0, 1, &mut steps);
        assert_eq!(
            steps,
            vec![Step::Delete(0), Step::Delete(1), Step::Keep(2, 0)]
        );

        let comparator = SequencesComparator::new(1, 2, |_, _| false);
        let mut steps = vec![];
        comparator.linear_merge(0, 1, 0, 2, &mut steps);
        assert_eq!(
            steps,
            vec![Step::Insert(0), Step::Insert(1), Step::Delete(0)]
        );
    }
}
