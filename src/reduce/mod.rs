//! Equivalence-class reduction in front of the Myers comparator.
//!
//! Elements whose transformed value never occurs on the other side can only
//! ever be deleted or inserted, so they are left out of the search. The
//! comparator runs over the codes of the shared classes, and its script is
//! widened back to the original elements afterwards, with the left-out
//! elements flushed as deletions or insertions in sequence order.

mod types;

use types::*;

use crate::myers::{SequencesComparator, Step};
use crate::script::EditScript;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Diffs `old` against `new` comparing `key(element)` instead of the
/// elements, searching only over elements whose key occurs in both
/// sequences.
///
/// The common prefix and suffix are matched before any reduction, as the
/// direct comparator does. The script always has the shortest length. When
/// every shared line occurs once per side, in the same order, it has the
/// same replacement runs as [`crate::myers::diff`]; repeated shared lines
/// may be aligned differently.
///
/// # Examples
///
/// ```
/// use linediff::reduce::diff_reduced;
///
/// let old = vec!["a\n", "only-old\n", "b\n"];
/// let new = vec!["only-new\n", "a\n", "b\n"];
/// let script = diff_reduced(&old, &new, |line| *line);
/// assert_eq!(script.common_length(), 2);
/// assert_eq!(script.modification_count(), 2);
/// ```
pub fn diff_reduced<'a, T, K, F>(old: &'a [T], new: &'a [T], key: F) -> EditScript<T>
where
    T: Clone,
    K: Hash + Eq,
    F: Fn(&'a T) -> K,
{
    let old_keys: Vec<K> = old.iter().map(&key).collect();
    let new_keys: Vec<K> = new.iter().map(&key).collect();

    let prefix = old_keys
        .iter()
        .zip(&new_keys)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old_keys[prefix..]
        .iter()
        .rev()
        .zip(new_keys[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_end = old.len() - suffix;
    let new_end = new.len() - suffix;
    let old_middle = &old_keys[prefix..old_end];
    let new_middle = &new_keys[prefix..new_end];

    let mut classes: HashMap<&K, EquivalenceClass> = HashMap::new();
    for k in old_middle {
        classes.entry(k).or_default().count_old += 1;
    }
    for k in new_middle {
        classes.entry(k).or_default().count_new += 1;
    }

    let mut next_code = 0;
    let mut reduced_old = Reduced::default();
    for (position, k) in old_middle.iter().enumerate() {
        let Some(class) = classes.get_mut(k).filter(|class| class.is_shared()) else {
            continue;
        };
        let code = *class.code.get_or_insert_with(|| {
            next_code += 1;
            next_code - 1
        });
        reduced_old.push(code, prefix + position);
    }

    let mut reduced_new = Reduced::default();
    for (position, k) in new_middle.iter().enumerate() {
        if let Some(code) = classes.get(k).and_then(|class| class.code) {
            reduced_new.push(code, prefix + position);
        }
    }

    debug!(
        old = old.len(),
        new = new.len(),
        prefix,
        suffix,
        classes = classes.len(),
        shared = next_code,
        reduced_old = reduced_old.len(),
        reduced_new = reduced_new.len(),
        "reduced comparison"
    );

    let steps = SequencesComparator::new(reduced_old.len(), reduced_new.len(), |i, j| {
        reduced_old.codes[i] == reduced_new.codes[j]
    })
    .steps();

    let mut expander = Expander {
        old,
        new,
        next_old: 0,
        next_new: 0,
        script: EditScript::with_capacity(old.len() + new.len()),
    };
    expander.keep_through(prefix);
    for step in steps {
        match step {
            Step::Keep(i, j) => {
                let (i, j) = (reduced_old.positions[i], reduced_new.positions[j]);
                expander.flush_old(i);
                expander.flush_new(j);
                expander.keep_through(1);
            }
            Step::Delete(i) => {
                let i = reduced_old.positions[i];
                expander.flush_old(i);
                expander.script.append_delete(old[i].clone());
                expander.next_old = i + 1;
            }
            Step::Insert(j) => {
                let j = reduced_new.positions[j];
                expander.flush_new(j);
                expander.script.append_insert(new[j].clone());
                expander.next_new = j + 1;
            }
        }
    }
    expander.flush_old(old_end);
    expander.flush_new(new_end);
    expander.keep_through(suffix);
    expander.script
}

/// Replays the reduced script over the original sequences.
struct Expander<'a, T> {
    old: &'a [T],
    new: &'a [T],
    next_old: usize,
    next_new: usize,
    script: EditScript<T>,
}

impl<T: Clone> Expander<'_, T> {
    /// Keeps the next `count` elements of both sides.
    fn keep_through(&mut self, count: usize) {
        let (old, new) = (self.old, self.new);
        for (o, n) in old[self.next_old..][..count]
            .iter()
            .zip(&new[self.next_new..][..count])
        {
            self.script.append_keep(Some(o.clone()), Some(n.clone()));
        }
        self.next_old += count;
        self.next_new += count;
    }

    /// Deletes the left-out old elements before `until`.
    fn flush_old(&mut self, until: usize) {
        let old = self.old;
        for el in &old[self.next_old..until] {
            self.script.append_delete(el.clone());
        }
        self.next_old = until;
    }

    /// Inserts the left-out new elements before `until`.
    fn flush_new(&mut self, until: usize) {
        let new = self.new;
        for el in &new[self.next_new..until] {
            self.script.append_insert(el.clone());
        }
        self.next_new = until;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::myers::{diff, Edit};
    use crate::script::ReplacementsHandler;
    use proptest::prelude::*;
    use std::convert::Infallible;

    type Run<T> = (usize, Vec<T>, Vec<T>);

    #[derive(Default)]
    struct Runs<T> {
        runs: Vec<Run<T>>,
    }

    impl<'a, T: Clone> ReplacementsHandler<'a, T> for Runs<T> {
        type Error = Infallible;

        fn handle_replacement(
            &mut self,
            skipped: usize,
            deleted: &[&'a T],
            inserted: &[&'a T],
        ) -> Result<(), Infallible> {
            let deleted = deleted.iter().map(|el| (*el).clone()).collect();
            let inserted = inserted.iter().map(|el| (*el).clone()).collect();
            self.runs.push((skipped, deleted, inserted));
            Ok(())
        }

        fn handle_keep(
            &mut self,
            _old: Option<&'a T>,
            _new: Option<&'a T>,
        ) -> Result<(), Infallible> {
            Ok(())
        }
    }

    fn runs<T: Clone>(script: &EditScript<T>) -> Vec<Run<T>> {
        script.replacements(Runs { runs: Vec::new() }).unwrap().runs
    }

    /// Edits a sequence of distinct lines on both sides: each base line may be
    /// dropped from either side, and lines unique to one side may be added in
    /// front of it.
    fn edited_pair(plan: &[(u8, u8)]) -> (Vec<u32>, Vec<u32>) {
        let mut old = vec![];
        let mut new = vec![];
        for (i, &(on_old, on_new)) in plan.iter().enumerate() {
            let i = i as u32;
            if on_old == 0 {
                old.push(1000 + i);
            }
            if on_old != 1 {
                old.push(i);
            }
            if on_new == 0 {
                new.push(2000 + i);
            }
            if on_new != 1 {
                new.push(i);
            }
        }
        (old, new)
    }

    #[test]
    fn test_single_replacement() {
        let old = vec!["a\n", "b\n", "c\n"];
        let new = vec!["a\n", "x\n", "c\n"];
        let result = diff_reduced(&old, &new, |l| *l);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep("a\n", "a\n"),
                Edit::Delete("b\n"),
                Edit::Insert("x\n"),
                Edit::keep("c\n", "c\n"),
            ]
        );
    }

    #[test]
    fn test_unique_elements_interleave() {
        let old = vec!['a', 'b', 'q'];
        let new = vec!['z', 'a', 'b'];
        let result = diff_reduced(&old, &new, |c| *c);
        assert_eq!(
            result.commands(),
            &[
                Edit::Insert('z'),
                Edit::keep('a', 'a'),
                Edit::keep('b', 'b'),
                Edit::Delete('q'),
            ]
        );
    }

    #[test]
    fn test_disjoint_inputs() {
        let old = vec![1, 2, 3];
        let new = vec![4, 5];
        let result = diff_reduced(&old, &new, |n| *n);
        assert_eq!(
            result.commands(),
            &[
                Edit::Delete(1),
                Edit::Delete(2),
                Edit::Delete(3),
                Edit::Insert(4),
                Edit::Insert(5),
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        let result = diff_reduced::<u8, u8, _>(&[], &[], |n| *n);
        assert!(result.is_empty());
    }

    #[test]
    fn test_key_decides_equality_elements_stay_original() {
        let old = vec!["Foo\n".to_string(), "bar\n".to_string()];
        let new = vec!["foo\n".to_string(), "BAZ\n".to_string()];
        let result = diff_reduced(&old, &new, |l| l.to_lowercase());
        assert_eq!(result.common_length(), 1);
        assert_eq!(
            result.commands()[0],
            Edit::keep("Foo\n".to_string(), "foo\n".to_string())
        );
    }

    #[test]
    fn test_suffix_matched_before_reduction() {
        let old = vec![2];
        let new = vec![4, 2, 2];
        let reduced = diff_reduced(&old, &new, |n| *n);
        assert_eq!(runs(&reduced), vec![(0, vec![], vec![4, 2])]);
        assert_eq!(runs(&reduced), runs(&diff(&old, &new)));
    }

    #[test]
    fn test_prefix_and_suffix_surround_middle() {
        let old = vec![1, 2];
        let new = vec![1, 4, 2, 2];
        let result = diff_reduced(&old, &new, |n| *n);
        assert_eq!(
            result.commands(),
            &[
                Edit::keep(1, 1),
                Edit::Insert(4),
                Edit::Insert(2),
                Edit::keep(2, 2),
            ]
        );
    }

    proptest! {
        #[test]
        fn test_same_runs_as_direct_on_distinct_lines(
            plan in prop::collection::vec((0u8..6, 0u8..6), 0..30),
        ) {
            let (old, new) = edited_pair(&plan);
            let direct = diff(&old, &new);
            let reduced = diff_reduced(&old, &new, |n| *n);
            prop_assert_eq!(runs(&reduced), runs(&direct));
        }

        #[test]
        fn test_same_cost_as_direct(
            old in prop::collection::vec(0u8..8, 0..40),
            new in prop::collection::vec(0u8..12, 0..40),
        ) {
            let direct = diff(&old, &new);
            let reduced = diff_reduced(&old, &new, |n| *n);
            prop_assert_eq!(reduced.common_length(), direct.common_length());
            prop_assert_eq!(reduced.modification_count(), direct.modification_count());
            prop_assert_eq!(reduced.insert_count(), direct.insert_count());
        }

        #[test]
        fn test_reconstructs_both_sides(
            old in prop::collection::vec(0u8..8, 0..40),
            new in prop::collection::vec(0u8..12, 0..40),
        ) {
            let reduced = diff_reduced(&old, &new, |n| *n);
            let rebuilt_old: Vec<u8> =
                reduced.old_sequence().unwrap().into_iter().copied().collect();
            let rebuilt_new: Vec<u8> =
                reduced.new_sequence().unwrap().into_iter().copied().collect();
            prop_assert_eq!(rebuilt_old, old);
            prop_assert_eq!(rebuilt_new, new);
        }
    }
}
