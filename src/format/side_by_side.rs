use crate::error::{Error, Result};
use crate::script::{EditScript, ReplacementsHandler};
use std::io::Write;

const TAB_STOP: usize = 8;

struct SideBySide<'w, W> {
    out: &'w mut W,
    column: usize,
}

impl<W: Write> SideBySide<'_, W> {
    fn row(&mut self, left: &str, marker: char, right: &str) -> Result<()> {
        let row = format!(
            "{:<width$} {marker} {}",
            fit(left, self.column),
            fit(right, self.column),
            width = self.column
        );
        writeln!(self.out, "{}", row.trim_end())?;
        Ok(())
    }
}

/// Line without its terminator, tabs expanded, cut to `column` characters.
fn fit(line: &str, column: usize) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut out = String::with_capacity(column);
    let mut width = 0;
    for c in line.chars() {
        if width >= column {
            break;
        }
        if c == '\t' {
            let next = (width / TAB_STOP + 1) * TAB_STOP;
            while width < next.min(column) {
                out.push(' ');
                width += 1;
            }
        } else {
            out.push(c);
            width += 1;
        }
    }
    out
}

impl<'a, W: Write, T: AsRef<str>> ReplacementsHandler<'a, T> for SideBySide<'_, W> {
    type Error = Error;

    fn handle_replacement(
        &mut self,
        _skipped: usize,
        deleted: &[&'a T],
        inserted: &[&'a T],
    ) -> Result<()> {
        let paired = deleted.len().min(inserted.len());
        for (old, new) in deleted.iter().zip(inserted) {
            self.row(old.as_ref(), '|', new.as_ref())?;
        }
        for old in &deleted[paired..] {
            self.row(old.as_ref(), '<', "")?;
        }
        for new in &inserted[paired..] {
            self.row("", '>', new.as_ref())?;
        }
        Ok(())
    }

    fn handle_keep(&mut self, old: Option<&'a T>, new: Option<&'a T>) -> Result<()> {
        let left = old.or(new).ok_or(Error::MissingContent)?;
        let right = new.or(old).ok_or(Error::MissingContent)?;
        self.row(left.as_ref(), ' ', right.as_ref())
    }
}

/// Writes both sides in two columns of `(width - 3) / 2` characters
/// separated by a gutter marker: ` ` for kept lines, `|` for a changed pair,
/// `<` and `>` for lines present on one side only.
pub fn write_side_by_side<W, T>(out: &mut W, script: &EditScript<T>, width: usize) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    script.replacements(SideBySide {
        out,
        column: width.saturating_sub(3) / 2,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff_text, DiffOptions};

    fn render(old: &str, new: &str, width: usize) -> String {
        let script = diff_text(old, new, &DiffOptions::default());
        let mut out = vec![];
        write_side_by_side(&mut out, &script, width).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_rows() {
        let out = render("a\nb\nc\nd\n", "a\nB\nd\ne\n", 13);
        let expected = [
            "a       a\n",
            "b     | B\n",
            "c     <\n",
            "d       d\n",
            "      > e\n",
        ];
        assert_eq!(out, expected.concat());
    }

    #[test]
    fn test_truncates_to_column() {
        assert_eq!(render("abcdefgh\n", "abcdefgh\n", 11), "abcd   abcd\n");
    }

    #[test]
    fn test_fit_expands_tabs() {
        assert_eq!(fit("a\tb\n", 20), "a       b");
        assert_eq!(fit("\tb", 4), "    ");
        assert_eq!(fit("xy\r\n", 20), "xy");
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(render("", "", 130), "");
    }
}
