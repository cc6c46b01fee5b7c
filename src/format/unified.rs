use super::FormatOptions;
use crate::error::Result;
use crate::patch::hunks;
use crate::script::EditScript;
use crate::serialization::{write_header, write_hunk};
use std::io::Write;

/// Writes `script` as a unified diff. Nothing is written when the script has
/// no changes.
pub fn write_unified<W, T>(
    out: &mut W,
    script: &EditScript<T>,
    options: &FormatOptions,
) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
{
    let hunks = hunks(script, options.context);
    if hunks.is_empty() {
        return Ok(());
    }
    write_header(out, &options.old_label, &options.new_label)?;
    for hunk in &hunks {
        write_hunk(out, hunk)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff_text, DiffOptions};
    use crate::error::Error;
    use crate::myers::Edit;

    fn render(old: &str, new: &str, options: &FormatOptions) -> String {
        let script = diff_text(old, new, &DiffOptions::default());
        let mut out = vec![];
        write_unified(&mut out, &script, options).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_single_change() {
        let out = render(
            "a\nb\nc\n",
            "a\nx\nc\n",
            &FormatOptions::default().labels("a.txt", "b.txt"),
        );
        assert_eq!(out, "--- a.txt\n+++ b.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+x\n c\n");
    }

    #[test]
    fn test_identical_inputs_write_nothing() {
        assert_eq!(render("a\nb\n", "a\nb\n", &FormatOptions::default()), "");
    }

    #[test]
    fn test_from_empty() {
        let out = render("", "a\n", &FormatOptions::default());
        assert_eq!(out, "--- old\n+++ new\n@@ -0,0 +1 @@\n+a\n");
    }

    #[test]
    fn test_missing_final_newline() {
        let out = render("a\n", "a", &FormatOptions::default().context(0));
        assert_eq!(
            out,
            "--- old\n+++ new\n@@ -1 +1 @@\n-a\n+a\n\\ No newline at end of file\n"
        );
    }

    #[test]
    fn test_context_limits_hunk() {
        let old = "1\n2\n3\n4\n5\n6\n7\n";
        let new = "1\n2\n3\nX\n5\n6\n7\n";
        let out = render(old, new, &FormatOptions::default().context(1));
        assert_eq!(out, "--- old\n+++ new\n@@ -3,3 +3,3 @@\n 3\n-4\n+X\n 5\n");
    }

    #[test]
    fn test_contentless_keep_is_an_error() {
        let script: EditScript<&str> = vec![Edit::Keep(None, None), Edit::Insert("x\n")]
            .into_iter()
            .collect();
        let err = write_unified(&mut vec![], &script, &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingContent));
    }
}
