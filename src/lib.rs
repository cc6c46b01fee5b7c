//! Line-oriented diffing and patching.
//!
//! Sequences are compared with Myers' O(ND) middle-snake algorithm, optionally
//! after an equivalence-class reduction that drops lines unique to one side.
//! The result is an [`EditScript`] that can be walked by visitors, grouped
//! into replacement runs, rendered in several diff formats and applied back
//! to a file.
//!
//! ```
//! use linediff::{apply, diff_text, DiffOptions};
//!
//! let old = "one\ntwo\nthree\n";
//! let new = "one\n2\nthree\n";
//! let script = diff_text(old, new, &DiffOptions::default());
//! assert_eq!(script.modification_count(), 2);
//!
//! let lines = linediff::diff::split_lines(old);
//! assert_eq!(apply(&lines, &script).unwrap().concat(), new);
//! ```

pub mod diff;
pub mod error;
pub mod format;
pub mod myers;
pub mod patch;
pub mod reduce;
pub mod script;
pub mod serialization;
pub mod transform;

pub use diff::{diff_text, diff_with, DiffOptions};
pub use error::{Error, Result};
pub use format::{write_diff, Format, FormatOptions};
pub use myers::Edit;
pub use patch::{apply, apply_reverse, hunks, Hunk};
pub use script::{CommandVisitor, EditScript, Inverted, ReplacementsHandler};
pub use serialization::Patch;
pub use transform::{Transform, Whitespace};
