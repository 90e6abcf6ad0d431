use watling_lang_miette_util::Span;

/// Trait for syntactic entities which have a source-code span.
///
/// Nodes produced by the parser always carry a span; nodes built by hand
/// (e.g. in tests) may omit it.
pub trait HasSpan {
    /// Return the source code span of the entity.
    fn span(&self) -> Option<Span>;
}

impl HasSpan for Option<Span> {
    fn span(&self) -> Option<Span> {
        *self
    }
}
