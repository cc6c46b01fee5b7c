use super::CommandVisitor;
use std::mem;

/// Consumer of coalesced replacement runs.
///
/// `handle_replacement` receives one maximal run of deletions and insertions
/// found between two kept elements, together with the number of keeps seen
/// since the previous run. `handle_keep` follows for the kept element that
/// closed the run, and for every other kept element.
pub trait ReplacementsHandler<'a, T> {
    type Error;

    fn handle_replacement(
        &mut self,
        skipped: usize,
        deleted: &[&'a T],
        inserted: &[&'a T],
    ) -> Result<(), Self::Error>;

    fn handle_keep(&mut self, old: Option<&'a T>, new: Option<&'a T>) -> Result<(), Self::Error>;
}

enum RunState<'a, T> {
    Idle,
    Buffering {
        deleted: Vec<&'a T>,
        inserted: Vec<&'a T>,
    },
}

/// Visitor adapter grouping consecutive inserts and deletes into single
/// replacement events for a [`ReplacementsHandler`].
pub struct ReplacementsFinder<'a, T, H> {
    handler: H,
    skipped: usize,
    state: RunState<'a, T>,
}

impl<'a, T, H: ReplacementsHandler<'a, T>> ReplacementsFinder<'a, T, H> {
    pub fn new(handler: H) -> Self {
        ReplacementsFinder {
            handler,
            skipped: 0,
            state: RunState::Idle,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Delivers the pending run, if any. Returns whether one was delivered.
    fn flush(&mut self) -> Result<bool, H::Error> {
        match mem::replace(&mut self.state, RunState::Idle) {
            RunState::Idle => Ok(false),
            RunState::Buffering { deleted, inserted } => {
                self.handler
                    .handle_replacement(self.skipped, &deleted, &inserted)?;
                Ok(true)
            }
        }
    }
}

impl<'a, T, H: ReplacementsHandler<'a, T>> CommandVisitor<'a, T> for ReplacementsFinder<'a, T, H> {
    type Error = H::Error;

    fn visit_start(&mut self) -> Result<(), Self::Error> {
        self.skipped = 0;
        self.state = RunState::Idle;
        Ok(())
    }

    fn visit_keep(&mut self, old: Option<&'a T>, new: Option<&'a T>) -> Result<(), Self::Error> {
        if self.flush()? {
            self.skipped = 1;
        } else {
            self.skipped += 1;
        }
        self.handler.handle_keep(old, new)
    }

    fn visit_insert(&mut self, element: &'a T) -> Result<(), Self::Error> {
        match &mut self.state {
            RunState::Buffering { inserted, .. } => inserted.push(element),
            RunState::Idle => {
                self.state = RunState::Buffering {
                    deleted: vec![],
                    inserted: vec![element],
                }
            }
        }
        Ok(())
    }

    fn visit_delete(&mut self, element: &'a T) -> Result<(), Self::Error> {
        match &mut self.state {
            RunState::Buffering { deleted, .. } => deleted.push(element),
            RunState::Idle => {
                self.state = RunState::Buffering {
                    deleted: vec![element],
                    inserted: vec![],
                }
            }
        }
        Ok(())
    }

    fn visit_end(&mut self) -> Result<(), Self::Error> {
        self.flush().map(|_| ())
    }
}
