//! Placeholder substitution for request templates.
//!
//! Templates reference fields as `{{ .Name }}`. Substitution is a single pass
//! over the template text, so a substituted value is never itself scanned for
//! placeholders. Unknown fields render as the empty string.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Source of named values for [`render`].
pub trait Fields {
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// Fill every `{{ .Name }}` placeholder in `template` from `fields`.
pub fn render<F: Fields + ?Sized>(template: &str, fields: &F) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            fields.field(&caps[1]).map(Cow::into_owned).unwrap_or_default()
        })
        .into_owned()
}
