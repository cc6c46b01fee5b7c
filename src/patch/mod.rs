mod types;
pub use types::*;

use crate::error::{Error, Result};
use crate::myers::Edit;
use crate::script::{EditScript, Inverted, ReplacementsFinder, ReplacementsHandler};
use std::collections::VecDeque;
use std::convert::Infallible;
use tracing::debug;

/// Groups replacement runs into hunks carrying up to `context` kept lines on
/// either side.
struct HunkBuilder<'a, T> {
    context: usize,
    old_line: usize,
    new_line: usize,
    current: Option<Hunk<&'a T>>,
    trailing_equal_count: usize,
    context_buffer: VecDeque<Edit<&'a T>>,
    hunks: Vec<Hunk<&'a T>>,
}

impl<'a, T> HunkBuilder<'a, T> {
    fn new(context: usize) -> Self {
        HunkBuilder {
            context,
            old_line: 0,
            new_line: 0,
            current: None,
            trailing_equal_count: 0,
            context_buffer: VecDeque::with_capacity(context + 1),
            hunks: vec![],
        }
    }

    fn finish(mut self) -> Vec<Hunk<&'a T>> {
        if let Some(c) = self.current.take() {
            self.hunks.push(c);
        }
        self.hunks
    }
}

impl<'a, T> ReplacementsHandler<'a, T> for HunkBuilder<'a, T> {
    type Error = Infallible;

    fn handle_replacement(
        &mut self,
        _skipped: usize,
        deleted: &[&'a T],
        inserted: &[&'a T],
    ) -> std::result::Result<(), Infallible> {
        let hunk = self.current.get_or_insert_with(|| {
            let leading = self.context_buffer.len();
            Hunk::new(self.old_line - leading, self.new_line - leading)
        });
        // an open hunk absorbs the whole gap, which is at most 2 * context
        hunk.changes.extend(self.context_buffer.drain(..));
        hunk.changes.extend(deleted.iter().map(|e| Edit::Delete(*e)));
        hunk.changes.extend(inserted.iter().map(|e| Edit::Insert(*e)));

        self.trailing_equal_count = 0;
        self.old_line += deleted.len();
        self.new_line += inserted.len();
        Ok(())
    }

    fn handle_keep(
        &mut self,
        old: Option<&'a T>,
        new: Option<&'a T>,
    ) -> std::result::Result<(), Infallible> {
        match self.current {
            Some(ref mut c) if self.trailing_equal_count < self.context => {
                c.changes.push(Edit::Keep(old, new));
                self.trailing_equal_count += 1;
            }
            _ => {
                self.context_buffer.push_back(Edit::Keep(old, new));
                if self.context_buffer.len() > self.context {
                    if let Some(c) = self.current.take() {
                        self.hunks.push(c);
                    }
                    self.context_buffer.pop_front();
                }
            }
        }
        self.old_line += 1;
        self.new_line += 1;
        Ok(())
    }
}

/// Splits a script into hunks with `context` lines of context.
///
/// Runs separated by at most `2 * context` kept lines end up in the same
/// hunk. A script without changes has no hunks.
pub fn hunks<T>(script: &EditScript<T>, context: usize) -> Vec<Hunk<&T>> {
    match script.replacements(HunkBuilder::new(context)) {
        Ok(builder) => builder.finish(),
        Err(never) => match never {},
    }
}

/// Replays a script against the lines of the file being patched.
struct Replay<'a, T> {
    original: &'a [T],
    position: usize,
    output: Vec<&'a str>,
}

impl<'a, T: AsRef<str>> Replay<'a, T> {
    fn new(original: &'a [T]) -> Self {
        Replay {
            original,
            position: 0,
            output: Vec::with_capacity(original.len()),
        }
    }

    /// Consumes the next original line, checking it against `expected`.
    fn take(&mut self, expected: Option<&str>) -> Result<&'a str> {
        let original = self.original;
        let line = self.position + 1;
        match (original.get(self.position), expected) {
            (None, Some(expected)) => Err(Error::HunkFailed {
                line,
                reason: format!("expected {expected:?}, found end of file"),
            }),
            (None, None) => Err(Error::HunkFailed {
                line,
                reason: "file ends before the patch does".to_string(),
            }),
            (Some(found), Some(expected)) if found.as_ref() != expected => {
                Err(Error::HunkFailed {
                    line,
                    reason: format!("expected {expected:?}, found {:?}", found.as_ref()),
                })
            }
            (Some(found), _) => {
                self.position += 1;
                Ok(found.as_ref())
            }
        }
    }

    fn finish(mut self) -> Vec<&'a str> {
        let original = self.original;
        self.output
            .extend(original[self.position..].iter().map(AsRef::as_ref));
        self.output
    }
}

impl<'a, T, U> ReplacementsHandler<'a, U> for Replay<'a, T>
where
    T: AsRef<str>,
    U: AsRef<str>,
{
    type Error = Error;

    fn handle_replacement(
        &mut self,
        _skipped: usize,
        deleted: &[&'a U],
        inserted: &[&'a U],
    ) -> Result<()> {
        for el in deleted {
            self.take(Some(el.as_ref()))?;
        }
        for el in inserted {
            self.output.push((*el).as_ref());
        }
        Ok(())
    }

    fn handle_keep(&mut self, old: Option<&'a U>, _new: Option<&'a U>) -> Result<()> {
        let line = self.take(old.map(AsRef::as_ref))?;
        self.output.push(line);
        Ok(())
    }
}

/// Applies `script` to `original`.
///
/// Kept lines the script spells out and every deleted line must match the
/// file; kept lines without content are copied unchecked. Lines past the end
/// of the script are copied through. The first mismatch aborts the whole
/// application with [`Error::HunkFailed`].
pub fn apply<'a, T, U>(original: &'a [T], script: &'a EditScript<U>) -> Result<Vec<&'a str>>
where
    T: AsRef<str>,
    U: AsRef<str>,
{
    let replay = script.replacements(Replay::new(original))?;
    debug!(
        input = original.len(),
        output = replay.output.len(),
        "patch applied"
    );
    Ok(replay.finish())
}

/// Applies `script` backwards, turning its new side back into its old side.
pub fn apply_reverse<'a, T, U>(original: &'a [T], script: &'a EditScript<U>) -> Result<Vec<&'a str>>
where
    T: AsRef<str>,
    U: AsRef<str>,
{
    let mut inverted = Inverted(ReplacementsFinder::new(Replay::new(original)));
    script.accept(&mut inverted)?;
    let replay = inverted.into_inner().into_handler();
    debug!(
        input = original.len(),
        output = replay.output.len(),
        "patch applied in reverse"
    );
    Ok(replay.finish())
}
