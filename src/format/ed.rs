use crate::error::{Error, Result};
use crate::script::{EditScript, ReplacementsHandler};
use std::io::Write;

/// Walks the script backwards so that every command addresses lines that
/// earlier commands have not shifted yet.
struct Ed<'w, W> {
    out: &'w mut W,
    // old lines ahead of the current position
    old_line: usize,
}

impl<W: Write> Ed<'_, W> {
    fn write_text<'a, T>(&mut self, lines: impl Iterator<Item = &'a T>) -> Result<()>
    where
        T: AsRef<str> + 'a,
    {
        let mut inserting = true;
        for line in lines {
            let line = line.as_ref();
            if !inserting {
                writeln!(self.out, "a")?;
                inserting = true;
            }
            if line.trim_end_matches(['\n', '\r']) == "." {
                // a lone dot would end the text; write it doubled and fix it up
                write!(self.out, "..\n.\ns/.//\n")?;
                inserting = false;
            } else if line.ends_with('\n') {
                write!(self.out, "{line}")?;
            } else {
                writeln!(self.out, "{line}")?;
            }
        }
        if inserting {
            writeln!(self.out, ".")?;
        }
        Ok(())
    }
}

impl<'a, W: Write, T: AsRef<str>> ReplacementsHandler<'a, T> for Ed<'_, W> {
    type Error = Error;

    fn handle_replacement(
        &mut self,
        _skipped: usize,
        deleted: &[&'a T],
        inserted: &[&'a T],
    ) -> Result<()> {
        let last = self.old_line;
        let first = last + 1 - deleted.len();
        match deleted.len() {
            0 => writeln!(self.out, "{last}a")?,
            1 => writeln!(self.out, "{last}{}", if inserted.is_empty() { 'd' } else { 'c' })?,
            _ => writeln!(
                self.out,
                "{first},{last}{}",
                if inserted.is_empty() { 'd' } else { 'c' }
            )?,
        }
        if !inserted.is_empty() {
            // the reverse walk hands inserted lines over last first
            self.write_text(inserted.iter().rev().copied())?;
        }
        self.old_line -= deleted.len();
        Ok(())
    }

    fn handle_keep(&mut self, _old: Option<&'a T>, _new: Option<&'a T>) -> Result<()> {
        self.old_line -= 1;
        Ok(())
    }
}

/// Writes an `ed` script turning the old side of `script` into the new one.
///
/// Commands come last change first, so line numbers always refer to the
/// original file.
pub fn write_ed<W, T>(out: &mut W, script: &EditScript<T>) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    script.replacements_reverse(Ed {
        out,
        old_line: script.old_len(),
    })?;
    Ok(())
}
