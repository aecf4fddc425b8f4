//! Tokenizer for DDL statements.
//!
//! Produces identifiers/keywords, quoted identifiers, string and numeric
//! literals and punctuation, with byte offsets into the source. Comments
//! (`--`, `/* */`, and `#` for MySQL) are skipped. Quoting rules follow
//! the source dialect:
//! - MySQL: backslash escapes inside string literals
//! - SQL Server and SQLite: `[bracketed]` identifiers
//! - PostgreSQL: `[` and `]` are array punctuation

use crate::dialect::Dialect;
use crate::error::{Result, TranslateError};
use crate::quote::escape_identifier;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unquoted identifier or keyword, as written
    Word(String),
    /// Quoted identifier, quotes removed
    Quoted { name: String, quote: char },
    /// String literal, unescaped; `prefix` is `N`, `E`, `B` or `X` when present
    Str { value: String, prefix: Option<char> },
    Number(String),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Dot,
    DoubleColon,
    Symbol(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Uppercased text of an unquoted word
    pub fn keyword(&self) -> Option<String> {
        match &self.kind {
            TokenKind::Word(w) => Some(w.to_ascii_uppercase()),
            _ => None,
        }
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(kw))
    }

    /// Name of an identifier token (bare word or quoted)
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            TokenKind::Quoted { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Tokenize `sql` using the quoting rules of `dialect`.
pub fn tokenize(sql: &str, dialect: Dialect) -> Result<Vec<Token>> {
    Lexer::new(sql, dialect).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    dialect: Dialect,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            dialect,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(b) = self.peek_at(0) {
            let start = self.pos;
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                b'-' if self.peek_at(1) == Some(b'-') => self.skip_line(),
                b'#' if self.dialect == Dialect::MySql => self.skip_line(),
                b'/' if self.peek_at(1) == Some(b'*') => self.skip_block_comment()?,
                b'\'' => {
                    let value = self.string_literal(self.dialect.backslash_escapes())?;
                    tokens.push(self.token(TokenKind::Str { value, prefix: None }, start));
                }
                b'`' => {
                    let name = self.delimited(b'`', b'`')?;
                    tokens.push(self.token(TokenKind::Quoted { name, quote: '`' }, start));
                }
                b'"' => {
                    let name = self.delimited(b'"', b'"')?;
                    tokens.push(self.token(TokenKind::Quoted { name, quote: '"' }, start));
                }
                b'[' if self.dialect != Dialect::Postgres => {
                    let name = self.delimited(b'[', b']')?;
                    tokens.push(self.token(TokenKind::Quoted { name, quote: '[' }, start));
                }
                b'(' => tokens.push(self.single(TokenKind::LParen)),
                b')' => tokens.push(self.single(TokenKind::RParen)),
                b',' => tokens.push(self.single(TokenKind::Comma)),
                b';' => tokens.push(self.single(TokenKind::Semicolon)),
                b':' if self.peek_at(1) == Some(b':') => {
                    self.pos += 2;
                    tokens.push(self.token(TokenKind::DoubleColon, start));
                }
                b'.' if !self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                    tokens.push(self.single(TokenKind::Dot))
                }
                b'0'..=b'9' | b'.' => {
                    let number = self.number();
                    tokens.push(self.token(TokenKind::Number(number), start));
                }
                _ if is_ident_start(b) => {
                    // N'...', E'...', B'...', X'...'
                    if self.peek_at(1) == Some(b'\'') && matches!(b, b'N' | b'n' | b'E' | b'e' | b'B' | b'b' | b'X' | b'x') {
                        self.pos += 1;
                        let escapes = self.dialect.backslash_escapes()
                            || (self.dialect == Dialect::Postgres && matches!(b, b'E' | b'e'));
                        let value = self.string_literal(escapes)?;
                        let prefix = Some(b.to_ascii_uppercase() as char);
                        tokens.push(self.token(TokenKind::Str { value, prefix }, start));
                    } else {
                        let word = self.word();
                        tokens.push(self.token(TokenKind::Word(word), start));
                    }
                }
                _ => {
                    let symbol = self.symbol();
                    tokens.push(self.token(TokenKind::Symbol(symbol), start));
                }
            }
        }

        Ok(tokens)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.token(kind, start)
    }

    fn skip_line(&mut self) {
        while let Some(b) = self.peek_at(0) {
            self.pos += 1;
            if b == b'\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek_at(1) == Some(b'/') {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(TranslateError::malformed(format!(
            "unterminated block comment at byte {}",
            start
        )))
    }

    /// Read a `'...'` literal starting at the current quote.
    fn string_literal(&mut self, backslash_escapes: bool) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut run_start = self.pos;

        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' if backslash_escapes => {
                    value.push_str(&self.src[run_start..self.pos]);
                    let escaped = self.peek_at(1).ok_or_else(|| unterminated("string", start))?;
                    value.push(match escaped {
                        b'n' => '\n',
                        b'r' => '\r',
                        b't' => '\t',
                        b'0' => '\0',
                        b'Z' => '\x1a',
                        _ => {
                            // Multi-byte chars are copied through the run below
                            if escaped.is_ascii() {
                                escaped as char
                            } else {
                                self.pos += 1;
                                run_start = self.pos;
                                continue;
                            }
                        }
                    });
                    self.pos += 2;
                    run_start = self.pos;
                }
                b'\'' if self.peek_at(1) == Some(b'\'') => {
                    value.push_str(&self.src[run_start..=self.pos]);
                    self.pos += 2;
                    run_start = self.pos;
                }
                b'\'' => {
                    value.push_str(&self.src[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(value);
                }
                _ => self.pos += 1,
            }
        }

        Err(unterminated("string", start))
    }

    /// Read a quoted identifier; a doubled closing quote is an escaped quote.
    fn delimited(&mut self, open: u8, close: u8) -> Result<String> {
        let start = self.pos;
        debug_assert_eq!(self.bytes[self.pos], open);
        self.pos += 1;
        let mut name = String::new();
        let mut run_start = self.pos;

        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == close {
                if self.peek_at(1) == Some(close) {
                    name.push_str(&self.src[run_start..=self.pos]);
                    self.pos += 2;
                    run_start = self.pos;
                    continue;
                }
                name.push_str(&self.src[run_start..self.pos]);
                self.pos += 1;
                return Ok(name);
            }
            self.pos += 1;
        }

        Err(unterminated("quoted identifier", start))
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        let mut seen_exp = false;
        while let Some(b) = self.peek_at(0) {
            let sign_after_exp = matches!(b, b'+' | b'-')
                && seen_exp
                && matches!(self.bytes[self.pos - 1], b'e' | b'E');
            if b.is_ascii_digit() || b == b'.' || sign_after_exp {
                self.pos += 1;
            } else if matches!(b, b'e' | b'E') && !seen_exp {
                seen_exp = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn word(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek_at(0) {
            if is_ident_continue(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_string()
    }

    fn symbol(&mut self) -> String {
        const PAIRS: &[&str] = &["<=", ">=", "<>", "!=", "||", "->>", "->"];
        let rest = &self.src[self.pos..];
        for pair in PAIRS {
            if rest.starts_with(pair) {
                self.pos += pair.len();
                return (*pair).to_string();
            }
        }
        let ch = rest.chars().next().unwrap_or(' ');
        self.pos += ch.len_utf8();
        ch.to_string()
    }
}

fn unterminated(what: &str, start: usize) -> TranslateError {
    TranslateError::malformed(format!("unterminated {} starting at byte {}", what, start))
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b == b'@' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Keywords that keep a space before a following `(`
const SPACED_BEFORE_PAREN: &[&str] = &[
    "AND", "OR", "NOT", "IN", "IS", "CHECK", "KEY", "EXISTS", "VALUES", "AS", "ON", "REFERENCES",
    "UNIQUE", "THEN", "ELSE", "WHEN", "CASE", "BETWEEN", "LIKE", "STORED", "VIRTUAL",
];

/// Render a token run for `target`, requoting identifiers and string
/// literals along the way.
pub fn render_tokens(tokens: &[Token], target: Dialect) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for tok in tokens {
        if let Some(p) = prev {
            if needs_space(p, tok) {
                out.push(' ');
            }
        }
        match &tok.kind {
            TokenKind::Word(w) => out.push_str(w),
            TokenKind::Quoted { name, .. } => out.push_str(&escape_identifier(name, target)),
            TokenKind::Str { value, prefix } => {
                out.push_str(&render_string_literal(value, *prefix, target))
            }
            TokenKind::Number(n) => out.push_str(n),
            TokenKind::LParen => out.push('('),
            TokenKind::RParen => out.push(')'),
            TokenKind::Comma => out.push(','),
            TokenKind::Semicolon => out.push(';'),
            TokenKind::Dot => out.push('.'),
            TokenKind::DoubleColon => out.push_str("::"),
            TokenKind::Symbol(s) => out.push_str(s),
        }
        prev = Some(tok);
    }

    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    match (&prev.kind, &next.kind) {
        (_, TokenKind::RParen | TokenKind::Comma | TokenKind::Dot | TokenKind::DoubleColon) => {
            false
        }
        (TokenKind::LParen | TokenKind::Dot | TokenKind::DoubleColon, _) => false,
        (TokenKind::Word(w), TokenKind::LParen) => SPACED_BEFORE_PAREN
            .iter()
            .any(|kw| w.eq_ignore_ascii_case(kw)),
        (TokenKind::Symbol(s), TokenKind::Number(_)) if s == "-" || s == "+" => {
            // Keep a unary sign glued to its number, `x - 1` stays spaced
            prev.end != next.start
        }
        _ => true,
    }
}

/// Render a string literal for `target`.
///
/// Embedded quotes are doubled. MySQL additionally needs backslashes
/// doubled and gets line breaks as `\n`/`\r` escapes; PostgreSQL text with
/// a line break becomes an `E'...'` escape string. SQLite and SQL Server
/// keep line breaks literally. The national `N` prefix only survives on
/// SQL Server.
pub fn render_string_literal(value: &str, prefix: Option<char>, target: Dialect) -> String {
    let has_break = value.contains(['\n', '\r']);
    let prefix = match (prefix, target) {
        (Some('N'), Dialect::SqlServer) => "N",
        (Some('X'), _) => "X",
        (Some('B'), Dialect::MySql | Dialect::Postgres) => "B",
        (_, Dialect::Postgres) if has_break => "E",
        _ => "",
    };
    let escaped = match target {
        Dialect::MySql => backslash_escape(value, true),
        Dialect::Postgres if prefix == "E" => backslash_escape(value, false),
        _ => value.replace('\'', "''"),
    };
    format!("{}'{}'", prefix, escaped)
}

/// Escape for a backslash-aware literal. `\0` and `\Z` are MySQL only.
fn backslash_escape(value: &str, mysql: bool) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' if mysql => out.push_str("\\0"),
            '\x1a' if mysql => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str, dialect: Dialect) -> Vec<TokenKind> {
        tokenize(sql, dialect)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        let k = kinds("CREATE TABLE t (a DECIMAL(10,2))", Dialect::MySql);
        assert_eq!(k[0], TokenKind::Word("CREATE".into()));
        assert_eq!(k[3], TokenKind::LParen);
        assert_eq!(k[6], TokenKind::LParen);
        assert_eq!(k[7], TokenKind::Number("10".into()));
        assert_eq!(k[8], TokenKind::Comma);
        assert_eq!(k.len(), 12);
    }

    #[test]
    fn test_mysql_backslash_escape() {
        let k = kinds(r"'it\'s'", Dialect::MySql);
        assert_eq!(
            k,
            vec![TokenKind::Str {
                value: "it's".into(),
                prefix: None
            }]
        );
    }

    #[test]
    fn test_postgres_backslash_is_literal() {
        let k = kinds(r"'C:\' , x", Dialect::Postgres);
        assert_eq!(
            k[0],
            TokenKind::Str {
                value: "C:\\".into(),
                prefix: None
            }
        );
        assert_eq!(k[1], TokenKind::Comma);
    }

    #[test]
    fn test_doubled_quote() {
        let k = kinds("'a''b'", Dialect::Sqlite);
        assert_eq!(
            k[0],
            TokenKind::Str {
                value: "a'b".into(),
                prefix: None
            }
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let k = kinds("`a` \"b\" [c d]", Dialect::SqlServer);
        assert_eq!(k[0], TokenKind::Quoted { name: "a".into(), quote: '`' });
        assert_eq!(k[1], TokenKind::Quoted { name: "b".into(), quote: '"' });
        assert_eq!(k[2], TokenKind::Quoted { name: "c d".into(), quote: '[' });
    }

    #[test]
    fn test_postgres_array_brackets() {
        let k = kinds("integer[]", Dialect::Postgres);
        assert_eq!(k[1], TokenKind::Symbol("[".into()));
        assert_eq!(k[2], TokenKind::Symbol("]".into()));
    }

    #[test]
    fn test_comments_skipped() {
        let k = kinds("a -- x ( \n /* ( */ b # c\n", Dialect::MySql);
        assert_eq!(
            k,
            vec![TokenKind::Word("a".into()), TokenKind::Word("b".into())]
        );
    }

    #[test]
    fn test_national_string_prefix() {
        let k = kinds("N'abc'", Dialect::SqlServer);
        assert_eq!(
            k[0],
            TokenKind::Str {
                value: "abc".into(),
                prefix: Some('N')
            }
        );
    }

    #[test]
    fn test_cast_and_numbers() {
        let k = kinds("'x'::text -1.5e3", Dialect::Postgres);
        assert_eq!(k[1], TokenKind::DoubleColon);
        assert_eq!(k[3], TokenKind::Symbol("-".into()));
        assert_eq!(k[4], TokenKind::Number("1.5e3".into()));
    }

    #[test]
    fn test_unterminated_string_is_malformed() {
        assert!(matches!(
            tokenize("DEFAULT 'abc", Dialect::MySql),
            Err(TranslateError::MalformedStatement(_))
        ));
        assert!(tokenize("`abc", Dialect::MySql).is_err());
        assert!(tokenize("/* abc", Dialect::MySql).is_err());
    }

    #[test]
    fn test_render_tokens_spacing_and_quotes() {
        let toks = tokenize("length(`name`) > 0 AND `qty` IN (1,2)", Dialect::MySql).unwrap();
        assert_eq!(
            render_tokens(&toks, Dialect::Postgres),
            "length(\"name\") > 0 AND \"qty\" IN (1, 2)"
        );
    }

    #[test]
    fn test_render_string_literal() {
        assert_eq!(render_string_literal("it's", None, Dialect::Postgres), "'it''s'");
        assert_eq!(render_string_literal("a\\b", None, Dialect::MySql), "'a\\\\b'");
        assert_eq!(render_string_literal("x", Some('N'), Dialect::SqlServer), "N'x'");
        assert_eq!(render_string_literal("x", Some('N'), Dialect::MySql), "'x'");
    }

    #[test]
    fn test_render_string_literal_line_breaks() {
        let value = "x\n-- y\n\nz\\";
        assert_eq!(
            render_string_literal(value, None, Dialect::MySql),
            "'x\\n-- y\\n\\nz\\\\'"
        );
        assert_eq!(
            render_string_literal(value, None, Dialect::Postgres),
            "E'x\\n-- y\\n\\nz\\\\'"
        );
        assert_eq!(render_string_literal(value, None, Dialect::Sqlite), "'x\n-- y\n\nz\\'");
        assert_eq!(
            render_string_literal("it's\r\n", Some('N'), Dialect::SqlServer),
            "N'it''s\r\n'"
        );
        // Without a line break PostgreSQL keeps a standard string
        assert_eq!(render_string_literal("a\\b", None, Dialect::Postgres), "'a\\b'");
    }

    #[test]
    fn test_escaped_literal_tokenizes_back() {
        let value = "x\n-- y\n\n'z'\\";
        for dialect in [Dialect::MySql, Dialect::Postgres, Dialect::Sqlite, Dialect::SqlServer] {
            let sql = render_string_literal(value, None, dialect);
            match &tokenize(&sql, dialect).unwrap()[0].kind {
                TokenKind::Str { value: got, .. } => assert_eq!(got, value, "{dialect}"),
                other => panic!("expected string for {dialect}, got {other:?}"),
            }
        }
    }
}
