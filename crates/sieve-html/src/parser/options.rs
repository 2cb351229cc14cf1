use sieve_common::CaseMode;

/// Elements that never have children. Their start tag closes them.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose body is read verbatim up to the matching end tag.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Case policy for tag, attribute and namespace names.
    pub case: CaseMode,
    /// Close [`VOID_ELEMENTS`] right after their start tag.
    pub void_elements: bool,
    /// Read the body of [`RAW_TEXT_ELEMENTS`] as a single data run.
    pub raw_text_elements: bool,
}

impl ParserOptions {
    /// Keep the original case of names and compare them exactly.
    #[must_use]
    pub const fn with_case_sensitive(mut self) -> Self {
        self.case = CaseMode::Preserve;
        self
    }

    /// Treat void elements like any other element.
    #[must_use]
    pub const fn without_void_elements(mut self) -> Self {
        self.void_elements = false;
        self
    }

    /// Parse `script`/`style` bodies as markup.
    #[must_use]
    pub const fn without_raw_text_elements(mut self) -> Self {
        self.raw_text_elements = false;
        self
    }

    pub(crate) fn is_void(&self, name: &str) -> bool {
        self.void_elements && VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
    }

    pub(crate) fn is_raw_text(&self, name: &str) -> bool {
        self.raw_text_elements && RAW_TEXT_ELEMENTS.iter().any(|r| r.eq_ignore_ascii_case(name))
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            case: CaseMode::Fold,
            void_elements: true,
            raw_text_elements: true,
        }
    }
}
