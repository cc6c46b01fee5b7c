use crate::error::{Error, Result};
use crate::script::{EditScript, ReplacementsHandler};
use crate::serialization::write_line;
use std::io::Write;

struct Classic<'w, W> {
    out: &'w mut W,
    old_line: usize,
    new_line: usize,
}

// an empty range names the line it follows
fn range(start: usize, len: usize) -> String {
    match len {
        0 => start.to_string(),
        1 => (start + 1).to_string(),
        _ => format!("{},{}", start + 1, start + len),
    }
}

impl<'a, 'w, W: Write, T: AsRef<str>> ReplacementsHandler<'a, T> for Classic<'w, W> {
    type Error = Error;

    fn handle_replacement(
        &mut self,
        _skipped: usize,
        deleted: &[&'a T],
        inserted: &[&'a T],
    ) -> Result<()> {
        let old = range(self.old_line, deleted.len());
        let new = range(self.new_line, inserted.len());
        let command = match (deleted.is_empty(), inserted.is_empty()) {
            (true, _) => 'a',
            (_, true) => 'd',
            _ => 'c',
        };
        writeln!(self.out, "{old}{command}{new}")?;

        for line in deleted {
            write_line(self.out, "< ", line.as_ref())?;
        }
        if !deleted.is_empty() && !inserted.is_empty() {
            writeln!(self.out, "---")?;
        }
        for line in inserted {
            write_line(self.out, "> ", line.as_ref())?;
        }

        self.old_line += deleted.len();
        self.new_line += inserted.len();
        Ok(())
    }

    fn handle_keep(&mut self, _old: Option<&'a T>, _new: Option<&'a T>) -> Result<()> {
        self.old_line += 1;
        self.new_line += 1;
        Ok(())
    }
}

/// Writes `script` in the normal `diff` format: one `a`, `d` or `c` command
/// per replacement run, old lines prefixed `< `, new lines `> `.
pub fn write_classic<W, T>(out: &mut W, script: &EditScript<T>) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    script.replacements(Classic {
        out,
        old_line: 0,
        new_line: 0,
    })?;
    Ok(())
}
