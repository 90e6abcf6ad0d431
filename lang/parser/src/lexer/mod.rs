use std::fmt;

use logos::{Logos, SpannedIter};

#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexicalError {
    #[default]
    InvalidToken,
    InvalidNumber,
    UnterminatedComment,
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexicalError::InvalidToken => write!(f, "Invalid token"),
            LexicalError::InvalidNumber => write!(f, "Number literal out of range"),
            LexicalError::UnterminatedComment => write!(f, "Unterminated block comment"),
        }
    }
}

/// A lexical error together with the byte range it occurred at
#[derive(Debug, Clone, PartialEq)]
pub struct LexerError {
    pub kind: LexicalError,
    pub start: usize,
    pub end: usize,
}

#[derive(Logos, Clone, Debug, PartialEq)]
#[logos(error = LexicalError)]
#[logos(skip r"\s+")]
#[logos(skip r"//[^\n\r]*")]
#[logos(skip(r"/\*", block_comment))]
#[logos(skip r"#([^\[\n\r][^\n\r]*)?")]
//              ^^^^^^^^^^^^^^^^^^^^
// Shell style comments. A `#` directly followed by `[` opens an attribute instead.
pub enum Token {
    // Tags
    //
    //
    #[token("<?php")]
    OpenTag,
    #[token("?>")]
    CloseTag,

    // Keywords
    //
    //
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("namespace")]
    Namespace,
    #[token("use")]
    Use,
    #[token("as")]
    As,
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("implements")]
    Implements,
    #[token("const")]
    Const,
    #[token("include")]
    Include,
    #[token("include_once")]
    IncludeOnce,
    #[token("require")]
    Require,
    #[token("require_once")]
    RequireOnce,

    // Modifiers
    //
    //
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("static")]
    Static,
    #[token("readonly")]
    Readonly,
    #[token("final")]
    Final,
    #[token("abstract")]
    Abstract,

    // Parens, Braces and Brackets
    //
    //
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("#[")]
    AttrOpen,

    // Symbols
    //
    //
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    QuestionMark,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    // Names
    //
    //
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    /// A name containing at least one namespace separator, e.g. `Wasm\Core` or `\strlen`
    #[regex(r"\\[a-zA-Z_][a-zA-Z0-9_]*(\\[a-zA-Z_][a-zA-Z0-9_]*)*", |lex| lex.slice().to_string())]
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(\\[a-zA-Z_][a-zA-Z0-9_]*)+", |lex| lex.slice().to_string())]
    QualifiedName(String),
    /// A variable; the `$` sigil is dropped
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Variable(String),

    // Literals
    //
    //
    #[regex(r"[0-9]+", |lex| parse_int(lex.slice(), 10))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| parse_int(&lex.slice()[2..], 16))]
    #[regex(r"0[bB][01]+", |lex| parse_int(&lex.slice()[2..], 2))]
    /// The magnitude of an integer literal; signs are applied by the parser
    IntLit(u64),
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| parse_float(lex.slice()))]
    FloatLit(f64),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape_double(strip_quotes(lex.slice())))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unescape_single(strip_quotes(lex.slice())))]
    StrLit(String),
}

fn parse_int(digits: &str, radix: u32) -> Result<u64, LexicalError> {
    u64::from_str_radix(digits, radix).map_err(|_| LexicalError::InvalidNumber)
}

/// Skip to the end of a `/* .. */` comment
fn block_comment(lex: &mut logos::Lexer<'_, Token>) -> Result<(), LexicalError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexicalError::UnterminatedComment)
        }
    }
}

fn parse_float(s: &str) -> Result<f64, LexicalError> {
    s.parse().map_err(|_| LexicalError::InvalidNumber)
}

fn strip_quotes(s: &str) -> &str {
    &s[1..s.len() - 1]
}

/// Resolve the escapes of a double quoted string
///
/// Unknown escape sequences are kept verbatim, including the backslash.
fn unescape_double(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('$') => out.push('$'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Resolve the escapes of a single quoted string; only `\'` and `\\` are escapes
fn unescape_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some('\'')) | ('\\', Some('\\')) => {
                out.extend(chars.next());
            }
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Token::OpenTag => "<?php",
            Token::CloseTag => "?>",
            Token::Function => "function",
            Token::Return => "return",
            Token::Namespace => "namespace",
            Token::Use => "use",
            Token::As => "as",
            Token::Class => "class",
            Token::Extends => "extends",
            Token::Implements => "implements",
            Token::Const => "const",
            Token::Include => "include",
            Token::IncludeOnce => "include_once",
            Token::Require => "require",
            Token::RequireOnce => "require_once",
            Token::Public => "public",
            Token::Protected => "protected",
            Token::Private => "private",
            Token::Static => "static",
            Token::Readonly => "readonly",
            Token::Final => "final",
            Token::Abstract => "abstract",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::AttrOpen => "#[",
            Token::Semicolon => ";",
            Token::Comma => ",",
            Token::Colon => ":",
            Token::QuestionMark => "?",
            Token::Eq => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Ident(s) | Token::QualifiedName(s) => return write!(f, "{s}"),
            Token::Variable(s) => return write!(f, "${s}"),
            Token::IntLit(n) => return write!(f, "{n}"),
            Token::FloatLit(n) => return write!(f, "{n:?}"),
            Token::StrLit(s) => return write!(f, "{s:?}"),
        };
        write!(f, "{s}")
    }
}

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

pub struct Lexer<'input> {
    // instead of an iterator over characters, we have a token iterator
    token_stream: SpannedIter<'input, Token>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        // the Token::lexer() method is provided by the Logos trait
        Self { token_stream: Token::lexer(input).spanned() }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Spanned<Token, usize, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.token_stream.next().map(|(token, span)| match token {
            Ok(token) => Ok((span.start, token, span.end)),
            Err(kind) => Err(LexerError { kind, start: span.start, end: span.end }),
        })
    }
}

#[cfg(test)]
mod lexer_tests {
    use super::{Lexer, LexicalError, Token};

    fn tokens(s: &str) -> Vec<Token> {
        Lexer::new(s).map(|tok| tok.unwrap().1).collect()
    }

    #[test]
    fn open_tag_and_variable() {
        assert_eq!(
            tokens("<?php $x = 1;"),
            vec![
                Token::OpenTag,
                Token::Variable("x".to_string()),
                Token::Eq,
                Token::IntLit(1),
                Token::Semicolon
            ]
        )
    }

    #[test]
    fn keyword_beats_ident() {
        assert_eq!(tokens("function functions"), vec![
            Token::Function,
            Token::Ident("functions".to_string())
        ])
    }

    #[test]
    fn qualified_names() {
        assert_eq!(tokens(r"Wasm\Core \strlen"), vec![
            Token::QualifiedName(r"Wasm\Core".to_string()),
            Token::QualifiedName(r"\strlen".to_string())
        ])
    }

    #[test]
    fn number_literals() {
        assert_eq!(tokens("42 0x1F 0b101 1.5 2e3"), vec![
            Token::IntLit(42),
            Token::IntLit(31),
            Token::IntLit(5),
            Token::FloatLit(1.5),
            Token::FloatLit(2000.0)
        ])
    }

    #[test]
    fn int_overflow() {
        let mut lexer = Lexer::new("99999999999999999999");
        assert_eq!(lexer.next().unwrap().unwrap_err().kind, LexicalError::InvalidNumber)
    }

    #[test]
    fn int_magnitudes_use_the_full_unsigned_range() {
        assert_eq!(tokens("9223372036854775808 0xFFFFFFFFFFFFFFFF"), vec![
            Token::IntLit(9223372036854775808),
            Token::IntLit(u64::MAX)
        ])
    }

    #[test]
    fn string_lit_escapes() {
        assert_eq!(tokens(r#""a\nb" 'it\'s' '\n'"#), vec![
            Token::StrLit("a\nb".to_string()),
            Token::StrLit("it's".to_string()),
            Token::StrLit("\\n".to_string())
        ])
    }

    #[test]
    fn comments_are_skipped() {
        let src = "// line\n# shell\n/* block\n * comment */ #[WasmExport]";
        assert_eq!(tokens(src), vec![
            Token::AttrOpen,
            Token::Ident("WasmExport".to_string()),
            Token::RBracket
        ])
    }

    #[test]
    fn block_comments() {
        let src = "/** doc\n * @param int $a */ /* a * b */ /**/ $x /* $y */";
        assert_eq!(tokens(src), vec![Token::Variable("x".to_string())])
    }

    #[test]
    fn unterminated_block_comment() {
        let mut lexer = Lexer::new("$x /* open");
        assert_eq!(lexer.next().unwrap().unwrap().1, Token::Variable("x".to_string()));
        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.kind, LexicalError::UnterminatedComment);
        assert_eq!(err.end, 10)
    }

    #[test]
    fn invalid_token_has_location() {
        let mut lexer = Lexer::new("  @");
        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!((err.kind, err.start, err.end), (LexicalError::InvalidToken, 2, 3))
    }
}
