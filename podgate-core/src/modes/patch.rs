//! Detection of deletions in patch payloads.
//!
//! A patch that only inserts needs `append`; one that also deletes needs
//! `write`. The body is tokenized rather than searched so that comments,
//! string literals, IRIs and variable names that happen to contain the
//! keyword do not count.

use std::collections::HashMap;

/// Namespace of the Solid terms vocabulary.
const SOLID_NS: &str = "http://www.w3.org/ns/solid/terms#";

/// The patch languages we can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLanguage {
    /// `application/sparql-update`
    SparqlUpdate,
    /// `text/n3`
    N3Patch,
}

impl PatchLanguage {
    /// The patch language of a media type, if it is one we know.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        match media_type {
            "application/sparql-update" => Some(Self::SparqlUpdate),
            "text/n3" => Some(Self::N3Patch),
            _ => None,
        }
    }
}

/// Whether a patch body removes data.
///
/// Bodies in a language we cannot inspect are assumed to delete, so the
/// stricter `write` mode is required for them.
pub fn patch_deletes(media_type: Option<&str>, body: &str) -> bool {
    if body.trim().is_empty() {
        return false;
    }

    match media_type.and_then(PatchLanguage::from_media_type) {
        Some(PatchLanguage::SparqlUpdate) => sparql_update_deletes(body),
        Some(PatchLanguage::N3Patch) => n3_patch_deletes(body),
        None => true,
    }
}

/// Whether a SPARQL Update contains a `DELETE` operation
/// (`DELETE DATA`, `DELETE WHERE` or `DELETE { } ... WHERE`).
pub fn sparql_update_deletes(body: &str) -> bool {
    Lexer::new(body).any(|token| matches!(token, Token::Word(w) if w.eq_ignore_ascii_case("DELETE")))
}

/// Whether an N3 Patch has a non-empty `solid:deletes` formula.
pub fn n3_patch_deletes(body: &str) -> bool {
    let tokens: Vec<Token<'_>> = Lexer::new(body).collect();

    let mut prefixes: HashMap<&str, &str> = HashMap::new();
    for (i, token) in tokens.iter().enumerate() {
        let Token::Word(keyword) = token else {
            continue;
        };
        if !keyword.eq_ignore_ascii_case("@prefix") && !keyword.eq_ignore_ascii_case("prefix") {
            continue;
        }
        if let (Some(Token::Word(name)), Some(Token::Iri(iri))) = (tokens.get(i + 1), tokens.get(i + 2)) {
            if let Some(prefix) = name.strip_suffix(':') {
                prefixes.insert(prefix, *iri);
            }
        }
    }

    let is_deletes = |token: &Token<'_>| match token {
        Token::Iri(iri) => iri.strip_prefix(SOLID_NS) == Some("deletes"),
        Token::Word(word) => match word.split_once(':') {
            Some((prefix, "deletes")) => match prefixes.get(prefix) {
                Some(namespace) => *namespace == SOLID_NS,
                None => prefix == "solid",
            },
            _ => false,
        },
        _ => false,
    };

    tokens.iter().enumerate().any(|(i, token)| {
        is_deletes(token)
            && !matches!(
                (tokens.get(i + 1), tokens.get(i + 2)),
                (Some(Token::Punct('{')), Some(Token::Punct('}')))
            )
    })
}

/// Lexical token shared by SPARQL and N3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    /// Keyword, prefixed name, variable or number
    Word(&'a str),
    /// `<...>` IRI reference, without the brackets
    Iri(&'a str),
    /// String literal, contents dropped
    Literal,
    Punct(char),
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '?' | '$' | '@')
    }

    /// Length of the string literal at the start of `rest`, delimiters included.
    fn string_len(rest: &str, quote: char) -> usize {
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let delimiter = if rest.starts_with(&triple) {
            triple.as_str()
        } else {
            &rest[..quote.len_utf8()]
        };

        let start = delimiter.len();
        let mut chars = rest[start..].char_indices();
        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                chars.next();
                continue;
            }
            if rest[start + i..].starts_with(delimiter) {
                return start + i + delimiter.len();
            }
        }
        rest.len()
    }

    /// Length of the word at the start of `rest`. Dots are only part of a
    /// word when followed by another word character (`ex:a.b` but not the
    /// statement terminator in `ex:a .`).
    fn word_len(rest: &str) -> usize {
        let mut chars = rest.char_indices().peekable();
        let mut end = 0;
        while let Some((i, c)) = chars.next() {
            let continues = Self::is_word_char(c)
                || (c == '.'
                    && end > 0
                    && chars.peek().is_some_and(|(_, next)| Self::is_word_char(*next)));
            if !continues {
                break;
            }
            end = i + c.len_utf8();
        }
        end
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let src = self.src;
        loop {
            let rest = &src[self.pos..];
            let c = rest.chars().next()?;

            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }

            if c == '#' {
                self.pos += rest.find('\n').map_or(rest.len(), |i| i + 1);
                continue;
            }

            if c == '<' {
                // An IRI reference cannot contain whitespace; otherwise this
                // is a comparison operator.
                let inner = &rest[1..];
                if let Some(end) = inner.find(|ch: char| ch == '>' || ch.is_whitespace()) {
                    if inner[end..].starts_with('>') {
                        self.pos += end + 2;
                        return Some(Token::Iri(&inner[..end]));
                    }
                }
                self.pos += 1;
                return Some(Token::Punct('<'));
            }

            if c == '"' || c == '\'' {
                self.pos += Self::string_len(rest, c);
                return Some(Token::Literal);
            }

            if Self::is_word_char(c) {
                let len = Self::word_len(rest);
                self.pos += len;
                return Some(Token::Word(&rest[..len]));
            }

            self.pos += c.len_utf8();
            return Some(Token::Punct(c));
        }
    }
}
