use std::borrow::Cow;

/// How whitespace takes part in line equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Whitespace {
    #[default]
    Exact,
    /// Any run of whitespace compares equal to a single space, and trailing
    /// whitespace (the line terminator included) is ignored.
    IgnoreChange,
    /// Whitespace is ignored entirely.
    IgnoreAll,
}

/// Normalization applied to lines before they are compared.
///
/// Only equality is affected: edit scripts always carry the lines as they
/// were read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Transform {
    pub whitespace: Whitespace,
    pub ignore_case: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        whitespace: Whitespace::Exact,
        ignore_case: false,
    };

    pub fn whitespace(mut self, whitespace: Whitespace) -> Self {
        self.whitespace = whitespace;
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Normalized form of `line`, borrowed when nothing had to change.
    ///
    /// ```
    /// use linediff::transform::{Transform, Whitespace};
    ///
    /// let t = Transform::default().whitespace(Whitespace::IgnoreChange);
    /// assert_eq!(t.apply("a \t b  \n"), t.apply("a b\n"));
    /// ```
    pub fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let line = match self.whitespace {
            Whitespace::Exact => Cow::Borrowed(line),
            Whitespace::IgnoreChange => collapse_whitespace(line),
            Whitespace::IgnoreAll => {
                if line.chars().any(char::is_whitespace) {
                    Cow::Owned(line.chars().filter(|c| !c.is_whitespace()).collect())
                } else {
                    Cow::Borrowed(line)
                }
            }
        };
        if self.ignore_case && line.chars().any(char::is_uppercase) {
            Cow::Owned(line.to_lowercase())
        } else {
            line
        }
    }
}

fn collapse_whitespace(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim_end();
    let already_collapsed = !trimmed
        .chars()
        .zip(trimmed.chars().skip(1))
        .any(|(a, b)| a.is_whitespace() && b.is_whitespace())
        && !trimmed.chars().any(|c| c.is_whitespace() && c != ' ');
    if already_collapsed {
        return Cow::Borrowed(trimmed);
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut in_space = false;
    for c in trimmed.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_borrows() {
        let t = Transform::IDENTITY;
        assert!(t.is_identity());
        assert!(matches!(t.apply("abc\n"), Cow::Borrowed("abc\n")));
    }

    #[test]
    fn test_ignore_change() {
        let t = Transform::default().whitespace(Whitespace::IgnoreChange);
        assert_eq!(t.apply("  a\t\tb  \n"), " a b");
        assert_eq!(t.apply("a b\n"), "a b");
        assert_eq!(t.apply("a b"), "a b");
        assert_ne!(t.apply("ab\n"), t.apply("a b\n"));
    }

    #[test]
    fn test_ignore_all() {
        let t = Transform::default().whitespace(Whitespace::IgnoreAll);
        assert_eq!(t.apply(" a \t b \r\n"), "ab");
        assert_eq!(t.apply("ab"), "ab");
    }

    #[test]
    fn test_ignore_case() {
        let t = Transform::default().ignore_case(true);
        assert!(!t.is_identity());
        assert_eq!(t.apply("Hello World\n"), "hello world\n");
        assert!(matches!(t.apply("quiet\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_combined() {
        let t = Transform::default()
            .whitespace(Whitespace::IgnoreChange)
            .ignore_case(true);
        assert_eq!(t.apply("FOO   Bar \n"), t.apply("foo bar\n"));
    }
}
