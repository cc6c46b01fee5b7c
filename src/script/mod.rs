mod replacements;

pub use replacements::*;

use crate::myers::Edit;

/// Ordered keep/insert/delete commands transforming one sequence into another.
///
/// Scripts are built once, by a comparison or by parsing a patch, and are
/// read-only afterwards: traversals borrow the script and never leave state
/// behind in it, so any number of visitors may walk it in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript<T> {
    commands: Vec<Edit<T>>,
    common_length: usize,
    insert_count: usize,
    delete_count: usize,
}

/// Receives the commands of an [`EditScript`] one at a time.
///
/// Traversal stops at the first callback returning an error.
pub trait CommandVisitor<'a, T> {
    type Error;

    fn visit_start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_keep(&mut self, old: Option<&'a T>, new: Option<&'a T>) -> Result<(), Self::Error>;

    fn visit_insert(&mut self, element: &'a T) -> Result<(), Self::Error>;

    fn visit_delete(&mut self, element: &'a T) -> Result<(), Self::Error>;

    fn visit_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EditScript<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        EditScript {
            commands: Vec::with_capacity(capacity),
            common_length: 0,
            insert_count: 0,
            delete_count: 0,
        }
    }

    pub(crate) fn append_keep(&mut self, old: Option<T>, new: Option<T>) {
        self.common_length += 1;
        self.commands.push(Edit::Keep(old, new));
    }

    pub(crate) fn append_insert(&mut self, element: T) {
        self.insert_count += 1;
        self.commands.push(Edit::Insert(element));
    }

    pub(crate) fn append_delete(&mut self, element: T) {
        self.delete_count += 1;
        self.commands.push(Edit::Delete(element));
    }

    pub(crate) fn append(&mut self, edit: Edit<T>) {
        match edit {
            Edit::Keep(old, new) => self.append_keep(old, new),
            Edit::Insert(el) => self.append_insert(el),
            Edit::Delete(el) => self.append_delete(el),
        }
    }

    /// Number of `Keep` commands, i.e. the length of the common subsequence.
    pub fn common_length(&self) -> usize {
        self.common_length
    }

    /// Number of `Insert` and `Delete` commands.
    pub fn modification_count(&self) -> usize {
        self.insert_count + self.delete_count
    }

    pub fn insert_count(&self) -> usize {
        self.insert_count
    }

    pub fn delete_count(&self) -> usize {
        self.delete_count
    }

    /// Length of the sequence the script starts from.
    pub fn old_len(&self) -> usize {
        self.common_length + self.delete_count
    }

    /// Length of the sequence the script produces.
    pub fn new_len(&self) -> usize {
        self.common_length + self.insert_count
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.modification_count() > 0
    }

    pub fn commands(&self) -> &[Edit<T>] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edit<T>> {
        self.commands.iter()
    }

    /// Walks the commands in creation order.
    pub fn accept<'a, V>(&'a self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: CommandVisitor<'a, T>,
    {
        visitor.visit_start()?;
        for command in &self.commands {
            dispatch(command, visitor)?;
        }
        visitor.visit_end()
    }

    /// Walks the commands in reverse creation order.
    pub fn accept_reverse<'a, V>(&'a self, visitor: &mut V) -> Result<(), V::Error>
    where
        V: CommandVisitor<'a, T>,
    {
        visitor.visit_start()?;
        for command in self.commands.iter().rev() {
            dispatch(command, visitor)?;
        }
        visitor.visit_end()
    }

    /// Runs `handler` over the replacement runs of a forward traversal and
    /// hands it back.
    pub fn replacements<'a, H>(&'a self, handler: H) -> Result<H, H::Error>
    where
        H: ReplacementsHandler<'a, T>,
    {
        let mut finder = ReplacementsFinder::new(handler);
        self.accept(&mut finder)?;
        Ok(finder.into_handler())
    }

    /// Same as [`EditScript::replacements`], walking the script backwards.
    pub fn replacements_reverse<'a, H>(&'a self, handler: H) -> Result<H, H::Error>
    where
        H: ReplacementsHandler<'a, T>,
    {
        let mut finder = ReplacementsFinder::new(handler);
        self.accept_reverse(&mut finder)?;
        Ok(finder.into_handler())
    }

    /// Rebuilds the sequence the script produces, taking kept elements from
    /// the new side and falling back to the old one.
    pub fn new_sequence(&self) -> Option<Vec<&T>> {
        self.commands
            .iter()
            .filter_map(|edit| match edit {
                Edit::Keep(old, new) => Some(new.as_ref().or(old.as_ref())),
                Edit::Insert(el) => Some(Some(el)),
                Edit::Delete(_) => None,
            })
            .collect()
    }

    /// Rebuilds the sequence the script starts from.
    pub fn old_sequence(&self) -> Option<Vec<&T>> {
        self.commands
            .iter()
            .filter_map(|edit| match edit {
                Edit::Keep(old, new) => Some(old.as_ref().or(new.as_ref())),
                Edit::Delete(el) => Some(Some(el)),
                Edit::Insert(_) => None,
            })
            .collect()
    }
}

fn dispatch<'a, T, V>(command: &'a Edit<T>, visitor: &mut V) -> Result<(), V::Error>
where
    V: CommandVisitor<'a, T>,
{
    match command {
        Edit::Keep(old, new) => visitor.visit_keep(old.as_ref(), new.as_ref()),
        Edit::Insert(el) => visitor.visit_insert(el),
        Edit::Delete(el) => visitor.visit_delete(el),
    }
}

impl<T> FromIterator<Edit<T>> for EditScript<T> {
    fn from_iter<I: IntoIterator<Item = Edit<T>>>(iter: I) -> Self {
        let mut script = EditScript::new();
        for edit in iter {
            script.append(edit);
        }
        script
    }
}

impl<'s, T> IntoIterator for &'s EditScript<T> {
    type Item = &'s Edit<T>;
    type IntoIter = std::slice::Iter<'s, Edit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// Presents a script as its inverse to the wrapped visitor: inserts become
/// deletes and the other way round, and the two sides of a keep swap.
#[derive(Debug)]
pub struct Inverted<V>(pub V);

impl<V> Inverted<V> {
    pub fn into_inner(self) -> V {
        self.0
    }
}

impl<'a, T, V: CommandVisitor<'a, T>> CommandVisitor<'a, T> for Inverted<V> {
    type Error = V::Error;

    fn visit_start(&mut self) -> Result<(), Self::Error> {
        self.0.visit_start()
    }

    fn visit_keep(&mut self, old: Option<&'a T>, new: Option<&'a T>) -> Result<(), Self::Error> {
        self.0.visit_keep(new, old)
    }

    fn visit_insert(&mut self, element: &'a T) -> Result<(), Self::Error> {
        self.0.visit_delete(element)
    }

    fn visit_delete(&mut self, element: &'a T) -> Result<(), Self::Error> {
        self.0.visit_insert(element)
    }

    fn visit_end(&mut self) -> Result<(), Self::Error> {
        self.0.visit_end()
    }
}
