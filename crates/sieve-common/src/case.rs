//! Name case policy.

/// How tag, attribute and namespace names are compared.
///
/// HTML names are ASCII case-insensitive, so the default folds them to
/// lowercase at parse time. `Preserve` keeps the source spelling and makes
/// every name comparison exact, which suits XML-like input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Lowercase ASCII letters in names.
    #[default]
    Fold,
    /// Keep names exactly as written.
    Preserve,
}

impl CaseMode {
    /// Apply this policy to a name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Fold => name.to_ascii_lowercase(),
            Self::Preserve => name.to_string(),
        }
    }

    /// Compare two names under this policy.
    #[must_use]
    pub fn names_equal(self, left: &str, right: &str) -> bool {
        match self {
            Self::Fold => left.eq_ignore_ascii_case(right),
            Self::Preserve => left == right,
        }
    }

    /// Whether names are compared exactly.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Preserve)
    }
}
