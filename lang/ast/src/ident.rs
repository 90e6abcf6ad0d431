use std::fmt;

use derivative::Derivative;
use watling_lang_miette_util::Span;

use crate::HasSpan;

/// The separator between the segments of a namespace path
pub const NAMESPACE_SEPARATOR: char = '\\';

/// A plain identifier, e.g. the name of a declared function or class
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Ident {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl Ident {
    pub fn from_string(id: &str) -> Self {
        Ident { span: None, id: id.to_owned() }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for Ident {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

/// A possibly namespace-qualified name
///
/// Examples: `sum`, `Core\i64_load` (relative), `\Wasm\Core\Macro` (fully qualified).
#[derive(Debug, Clone, Derivative)]
#[derivative(Eq, PartialEq, Hash)]
pub struct Name {
    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    pub span: Option<Span>,
    pub id: String,
}

impl Name {
    pub fn from_string(id: &str) -> Self {
        Name { span: None, id: id.to_owned() }
    }

    /// Whether the name starts with a namespace separator
    pub fn is_fully_qualified(&self) -> bool {
        self.id.starts_with(NAMESPACE_SEPARATOR)
    }

    /// Whether the name contains a namespace separator anywhere
    pub fn is_qualified(&self) -> bool {
        self.id.contains(NAMESPACE_SEPARATOR)
    }

    /// The name without a leading namespace separator
    pub fn path(&self) -> &str {
        self.id.trim_start_matches(NAMESPACE_SEPARATOR)
    }

    /// The segment after the last namespace separator
    pub fn last_segment(&self) -> &str {
        split_last_segment(self.path()).1
    }

    /// The namespace part of the path, if any
    ///
    /// `Wasm\Core\Macro` has namespace part `Wasm\Core`, `sum` has none.
    pub fn namespace_part(&self) -> Option<&str> {
        split_last_segment(self.path()).0
    }
}

/// Split a namespace path into its namespace part and its last segment
pub fn split_last_segment(path: &str) -> (Option<&str>, &str) {
    match path.rfind(NAMESPACE_SEPARATOR) {
        Some(idx) => (Some(&path[..idx]), &path[idx + 1..]),
        None => (None, path),
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl HasSpan for Name {
    fn span(&self) -> Option<Span> {
        self.span
    }
}

impl From<Ident> for Name {
    fn from(ident: Ident) -> Self {
        Name { span: ident.span, id: ident.id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_segments() {
        let name = Name::from_string("\\Wasm\\Core\\Macro");
        assert!(name.is_fully_qualified());
        assert_eq!(name.path(), "Wasm\\Core\\Macro");
        assert_eq!(name.last_segment(), "Macro");
        assert_eq!(name.namespace_part(), Some("Wasm\\Core"));
    }

    #[test]
    fn unqualified_name_has_no_namespace_part() {
        let name = Name::from_string("sum");
        assert!(!name.is_qualified());
        assert_eq!(name.last_segment(), "sum");
        assert_eq!(name.namespace_part(), None);
    }

    #[test]
    fn equality_ignores_spans() {
        let lhs = Name { span: Some(Span::new(0, 3)), id: "sum".to_owned() };
        assert_eq!(lhs, Name::from_string("sum"));
    }
}
