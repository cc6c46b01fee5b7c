use crate::error::{Error, Result};
use crate::myers::Edit;
use crate::patch::Hunk;
use crate::script::EditScript;
use std::io::Write;
use std::iter::Peekable;
use std::str::FromStr;
use tracing::warn;

pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// A single-file unified diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub hunks: Vec<Hunk<String>>,
}

/// Writes `line` after `prefix`, marking a missing final newline.
pub fn write_line<W: Write>(out: &mut W, prefix: &str, line: &str) -> Result<()> {
    write!(out, "{prefix}{line}")?;
    if !line.ends_with('\n') {
        writeln!(out)?;
        writeln!(out, "{NO_NEWLINE_MARKER}")?;
    }
    Ok(())
}

pub fn write_header<W: Write>(out: &mut W, old_name: &str, new_name: &str) -> Result<()> {
    writeln!(out, "--- {old_name}")?;
    writeln!(out, "+++ {new_name}")?;
    Ok(())
}

// "@@ -l,s" numbering: an empty range names the line before it
fn hunk_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{start},0"),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

pub fn write_hunk<W: Write, T: AsRef<str>>(out: &mut W, hunk: &Hunk<T>) -> Result<()> {
    writeln!(
        out,
        "@@ -{} +{} @@",
        hunk_range(hunk.old_start, hunk.old_len()),
        hunk_range(hunk.new_start, hunk.new_len())
    )?;
    for change in &hunk.changes {
        match change {
            Edit::Keep(old, new) => {
                let line = old.as_ref().or(new.as_ref()).ok_or(Error::MissingContent)?;
                write_line(out, " ", line.as_ref())?;
            }
            Edit::Delete(line) => write_line(out, "-", line.as_ref())?,
            Edit::Insert(line) => write_line(out, "+", line.as_ref())?,
        }
    }
    Ok(())
}

impl Patch {
    /// Parses a unified diff for one file.
    ///
    /// Lines ahead of the `---` header, such as a `diff` command line, are
    /// skipped, and so are blank lines outside hunks. Anything else that is
    /// not part of a hunk is an error.
    pub fn parse(text: &str) -> Result<Patch> {
        let mut lines = text
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .peekable();
        let mut patch = Patch::default();

        while let Some(&(n, line)) = lines.peek() {
            if line.starts_with("@@") {
                break;
            }
            lines.next();
            if let Some(name) = line.strip_prefix("--- ") {
                patch.old_name = Some(file_name(name));
                match lines.next() {
                    Some((_, line)) if line.starts_with("+++ ") => {
                        patch.new_name = Some(file_name(&line[4..]));
                    }
                    _ => return Err(Error::malformed(n + 1, "expected '+++' header")),
                }
                break;
            }
        }

        while let Some((n, line)) = lines.next() {
            // editors and mailers leave blank lines behind the last hunk
            if line.trim().is_empty() {
                continue;
            }
            let header = parse_hunk_header(line.trim_end()).ok_or_else(|| {
                Error::malformed(n, format!("bad hunk header {:?}", line.trim_end()))
            })?;
            patch.hunks.push(parse_hunk_body(header, &mut lines, n)?);
        }

        Ok(patch)
    }

    /// Writes the patch back out as unified diff text. A patch without
    /// hunks writes nothing.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.hunks.is_empty() {
            return Ok(());
        }
        write_header(
            out,
            self.old_name.as_deref().unwrap_or("old"),
            self.new_name.as_deref().unwrap_or("new"),
        )?;
        for hunk in &self.hunks {
            write_hunk(out, hunk)?;
        }
        Ok(())
    }

    /// Rebuilds the edit script the patch describes.
    ///
    /// Lines between hunks become `Keep(None, None)`; nothing is recorded for
    /// lines after the last hunk.
    pub fn to_script(&self) -> Result<EditScript<&str>> {
        let mut script = EditScript::new();
        let mut old_line = 0;
        let mut new_line = 0;

        for (i, hunk) in self.hunks.iter().enumerate() {
            if hunk.old_start < old_line {
                return Err(Error::HunksOutOfOrder { index: i + 1 });
            }
            let gap = hunk.old_start - old_line;
            for _ in 0..gap {
                script.append_keep(None, None);
            }
            old_line += gap;
            new_line += gap;
            if hunk.new_start != new_line {
                warn!(
                    hunk = i + 1,
                    expected = new_line + 1,
                    found = hunk.new_start + 1,
                    "hunk new-side start disagrees with the hunks before it"
                );
            }

            for change in &hunk.changes {
                match change {
                    Edit::Keep(..) => {
                        old_line += 1;
                        new_line += 1;
                    }
                    Edit::Delete(_) => old_line += 1,
                    Edit::Insert(_) => new_line += 1,
                }
                script.append(change.as_ref().map(String::as_str));
            }
        }

        Ok(script)
    }
}

impl FromStr for Patch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Patch::parse(s)
    }
}

fn file_name(header: &str) -> String {
    let header = header.trim_end_matches(['\n', '\r']);
    // a tab separates the name from an optional timestamp
    header.split('\t').next().unwrap_or(header).to_string()
}

struct HunkHeader {
    old_start: usize,
    old_len: usize,
    new_start: usize,
    new_len: usize,
}

fn parse_hunk_header(s: &str) -> Option<HunkHeader> {
    // s = "@@ -1,4 +1,4 @@ optional section"
    let rest = s.strip_prefix("@@ -")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(" +")?;
    let (old_start, old_len) = parse_range(old)?;
    let (new_start, new_len) = parse_range(new)?;
    Some(HunkHeader {
        old_start,
        old_len,
        new_start,
        new_len,
    })
}

fn parse_range(s: &str) -> Option<(usize, usize)> {
    let (start, len) = match s.split_once(',') {
        Some((start, len)) => (start.parse::<usize>().ok()?, len.parse::<usize>().ok()?),
        None => (s.parse::<usize>().ok()?, 1),
    };
    if len == 0 {
        Some((start, 0))
    } else {
        Some((start.checked_sub(1)?, len))
    }
}

fn parse_hunk_body<'t, I>(
    header: HunkHeader,
    lines: &mut Peekable<I>,
    header_line: usize,
) -> Result<Hunk<String>>
where
    I: Iterator<Item = (usize, &'t str)>,
{
    let mut hunk = Hunk::new(header.old_start, header.new_start);
    let mut old_left = header.old_len;
    let mut new_left = header.new_len;

    while old_left > 0 || new_left > 0 {
        let Some((n, line)) = lines.next() else {
            return Err(Error::malformed(
                header_line,
                format!("hunk ends early, missing {old_left} old and {new_left} new lines"),
            ));
        };
        let (kind, content) = match line.as_bytes()[0] {
            b'\\' => {
                strip_final_newline(&mut hunk);
                continue;
            }
            // some tools drop the space of an empty context line
            b'\n' | b'\r' => (b' ', line),
            b' ' | b'-' | b'+' => (line.as_bytes()[0], &line[1..]),
            _ => return Err(Error::malformed(n, format!("unexpected line {:?}", line.trim_end()))),
        };
        let content = content.to_string();
        match kind {
            b' ' if old_left > 0 && new_left > 0 => {
                old_left -= 1;
                new_left -= 1;
                hunk.changes.push(Edit::keep(content.clone(), content));
            }
            b'-' if old_left > 0 => {
                old_left -= 1;
                hunk.changes.push(Edit::Delete(content));
            }
            b'+' if new_left > 0 => {
                new_left -= 1;
                hunk.changes.push(Edit::Insert(content));
            }
            _ => return Err(Error::malformed(n, "hunk has more lines than its header counts")),
        }
    }

    if let Some((_, line)) = lines.peek() {
        if line.starts_with('\\') {
            lines.next();
            strip_final_newline(&mut hunk);
        }
    }

    Ok(hunk)
}

fn strip_final_newline(hunk: &mut Hunk<String>) {
    let last = match hunk.changes.last_mut() {
        Some(Edit::Keep(old, new)) => {
            if let Some(new) = new {
                if new.ends_with('\n') {
                    new.pop();
                }
            }
            old.as_mut()
        }
        Some(Edit::Delete(line)) | Some(Edit::Insert(line)) => Some(line),
        None => None,
    };
    if let Some(line) = last {
        if line.ends_with('\n') {
            line.pop();
        }
    }
}
