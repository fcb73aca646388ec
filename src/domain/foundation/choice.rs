//! Closed-choice vocabularies answered by label.

/// Trait for enums whose values are offered to the user as a fixed option list.
///
/// Answers are opaque labels: they are trimmed and compared case-insensitively
/// against [`ClosedChoice::label`]. A label that matches nothing is `None`,
/// which callers treat as a validation failure.
pub trait ClosedChoice: Sized + Copy + PartialEq + 'static {
    /// Every member, in the order they are offered.
    const ALL: &'static [Self];

    /// The label shown to the user and accepted back as an answer.
    fn label(&self) -> &'static str;

    /// Resolves an answer to a member.
    fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.label().eq_ignore_ascii_case(raw))
    }

    /// The option list to put on a prompt.
    fn labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.label().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Colour {
        Red,
        DarkBlue,
    }

    impl ClosedChoice for Colour {
        const ALL: &'static [Self] = &[Colour::Red, Colour::DarkBlue];

        fn label(&self) -> &'static str {
            match self {
                Colour::Red => "Red",
                Colour::DarkBlue => "Dark Blue",
            }
        }
    }

    #[test]
    fn from_label_ignores_case_and_whitespace() {
        assert_eq!(Colour::from_label("  dark blue "), Some(Colour::DarkBlue));
        assert_eq!(Colour::from_label("RED"), Some(Colour::Red));
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(Colour::from_label("green"), None);
        assert_eq!(Colour::from_label(""), None);
    }

    #[test]
    fn labels_follow_declaration_order() {
        assert_eq!(Colour::labels(), vec!["Red".to_string(), "Dark Blue".to_string()]);
    }
}
