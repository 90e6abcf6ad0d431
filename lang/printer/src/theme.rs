use pretty::DocAllocator;

use super::types::*;

pub trait ThemeExt<'a> {
    fn keyword(&'a self, text: &'a str) -> Builder<'a>;
    fn ident(&'a self, text: &'a str) -> Builder<'a>;
    fn typ(&'a self, text: &'a str) -> Builder<'a>;
    fn string(&'a self, text: &'a str) -> Builder<'a>;
    fn number(&'a self, text: &'a str) -> Builder<'a>;
}

impl<'a> ThemeExt<'a> for Alloc<'a> {
    fn keyword(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Keyword)
    }

    fn ident(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Identifier)
    }

    fn typ(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Type)
    }

    fn string(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::String)
    }

    fn number(&'a self, text: &'a str) -> Builder<'a> {
        self.text(text).annotate(Anno::Number)
    }
}
