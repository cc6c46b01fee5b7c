mod classic;
mod ed;
mod side_by_side;
mod unified;

pub use classic::write_classic;
pub use ed::write_ed;
pub use side_by_side::write_side_by_side;
pub use unified::write_unified;

use crate::error::Result;
use crate::script::EditScript;
use std::io::Write;
use tracing::debug;

/// Output styles for a finished edit script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Unified,
    /// The default output of POSIX `diff`.
    Classic,
    SideBySide,
    /// Commands for `ed` turning the old file into the new one.
    Ed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Kept lines shown around each unified hunk.
    pub context: usize,
    /// Total line width of side-by-side output.
    pub width: usize,
    pub old_label: String,
    pub new_label: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            context: 3,
            width: 130,
            old_label: "old".to_string(),
            new_label: "new".to_string(),
        }
    }
}

impl FormatOptions {
    pub fn context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn labels(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_label = old.into();
        self.new_label = new.into();
        self
    }
}

/// Renders `script` to `out` in the chosen format.
///
/// ```
/// use linediff::diff::{diff_text, DiffOptions};
/// use linediff::format::{write_diff, Format, FormatOptions};
///
/// let script = diff_text("a\nb\n", "a\nc\n", &DiffOptions::default());
/// let mut out = vec![];
/// write_diff(&mut out, &script, Format::Classic, &FormatOptions::default()).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "2c2\n< b\n---\n> c\n");
/// ```
pub fn write_diff<W, T>(
    out: &mut W,
    script: &EditScript<T>,
    format: Format,
    options: &FormatOptions,
) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    debug!(?format, commands = script.len(), "rendering diff");
    match format {
        Format::Unified => write_unified(out, script, options),
        Format::Classic => write_classic(out, script),
        Format::SideBySide => write_side_by_side(out, script, options.width),
        Format::Ed => write_ed(out, script),
    }
}
