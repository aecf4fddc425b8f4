//! Recursive-descent parser for `CREATE TABLE` statements.
//!
//! The statement is located first (`CREATE TABLE [IF NOT EXISTS] name (`
//! up to the balanced closing paren), the body is split into clauses on
//! depth-0 commas, and each clause is classified as a column definition or
//! a table-level constraint.

use super::ast::*;
use super::lexer::{tokenize, Token, TokenKind};
use crate::dialect::Dialect;
use crate::error::{Result, TranslateError};

/// Location of the parenthesized column section within a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSection {
    pub table_name: String,
    pub if_not_exists: bool,
    /// Byte offset just after the opening paren
    pub start: usize,
    /// Byte offset of the balanced closing paren
    pub end: usize,
}

/// Words that start a column option, so they never extend a type name
const OPTION_KEYWORDS: &[&str] = &[
    "NOT",
    "NULL",
    "DEFAULT",
    "PRIMARY",
    "UNIQUE",
    "REFERENCES",
    "CHECK",
    "CONSTRAINT",
    "COLLATE",
    "COMMENT",
    "AUTO_INCREMENT",
    "AUTOINCREMENT",
    "IDENTITY",
    "GENERATED",
    "ON",
    "KEY",
    "CHARSET",
    "AS",
];

const REFERENTIAL_ACTIONS: &[&str] = &["CASCADE", "RESTRICT", "NO", "SET"];

fn is_option_keyword(word: &str) -> bool {
    OPTION_KEYWORDS.iter().any(|kw| word.eq_ignore_ascii_case(kw))
}

/// Find the table name and the byte range of the column section.
pub fn locate_column_section(sql: &str, dialect: Dialect) -> Result<ColumnSection> {
    let tokens = tokenize(sql, dialect)?;
    locate(&tokens).map(|(section, _)| section)
}

fn locate(tokens: &[Token]) -> Result<(ColumnSection, usize)> {
    let mut cur = Cursor::new(tokens);

    if !cur.eat_keyword("CREATE") || !cur.eat_keyword("TABLE") {
        return Err(TranslateError::malformed(
            "statement does not start with CREATE TABLE",
        ));
    }
    let if_not_exists = cur.eat_keywords(&["IF", "NOT", "EXISTS"]);
    let table_name = cur.qualified_name()?;

    let open = cur.pos;
    match cur.peek().map(|t| &t.kind) {
        Some(TokenKind::LParen) => {}
        _ => {
            return Err(TranslateError::malformed(format!(
                "expected '(' after table name {}",
                table_name
            )))
        }
    }
    let close = matching_close(tokens, open).ok_or_else(|| {
        TranslateError::malformed(format!(
            "unbalanced parentheses in CREATE TABLE {}",
            table_name
        ))
    })?;

    let section = ColumnSection {
        table_name,
        if_not_exists,
        start: tokens[open].end,
        end: tokens[close].start,
    };
    Ok((section, close))
}

/// Split a column section on commas at parenthesis depth 0.
///
/// Commas inside parens, string literals or quoted identifiers never split.
/// Empty clauses are dropped.
pub fn split_clauses(section: &str, dialect: Dialect) -> Result<Vec<String>> {
    let tokens = tokenize(section, dialect)?;
    let mut clauses = Vec::new();
    let mut depth: i32 = 0;
    let mut clause_start = 0;

    for tok in &tokens {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth -= 1,
            TokenKind::Comma if depth == 0 => {
                push_clause(&mut clauses, &section[clause_start..tok.start]);
                clause_start = tok.end;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TranslateError::malformed(
            "unbalanced parentheses in column section",
        ));
    }
    push_clause(&mut clauses, &section[clause_start..]);

    Ok(clauses)
}

fn push_clause(clauses: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        clauses.push(trimmed.to_string());
    }
}

/// Classify one clause as a table-level constraint or a column definition.
///
/// Constraint keywords are checked first, so an unquoted `KEY` or `INDEX`
/// at the start of a clause is always a constraint.
pub fn classify_clause(clause: &str, dialect: Dialect) -> Result<Clause> {
    let tokens = tokenize(clause, dialect)?;
    if tokens.is_empty() {
        return Err(TranslateError::malformed("empty clause"));
    }
    let mut cur = Cursor::with_source(&tokens, clause, dialect);

    if starts_constraint(&cur) {
        parse_constraint(&mut cur).map(Clause::Constraint)
    } else {
        parse_column(&mut cur).map(Clause::Column)
    }
}

/// Parse a complete `CREATE TABLE` statement.
pub fn parse_create_table(sql: &str, dialect: Dialect) -> Result<ParsedStatement> {
    let tokens = tokenize(sql, dialect)?;
    let (section, close) = locate(&tokens)?;

    let mut columns = Vec::new();
    let mut constraints = Vec::new();
    for clause in split_clauses(&sql[section.start..section.end], dialect)? {
        // A clause can be nothing but a comment
        if tokenize(&clause, dialect)?.is_empty() {
            continue;
        }
        match classify_clause(&clause, dialect)? {
            Clause::Column(c) => columns.push(c),
            Clause::Constraint(c) => constraints.push(c),
        }
    }

    if columns.is_empty() {
        return Err(TranslateError::malformed(format!(
            "CREATE TABLE {} has no column definitions",
            section.table_name
        )));
    }

    Ok(ParsedStatement {
        if_not_exists: section.if_not_exists,
        table_name: section.table_name,
        columns,
        constraints,
        table_comment: table_comment(&tokens[close + 1..]),
    })
}

/// `COMMENT [=] '...'` among the trailing table options
fn table_comment(trailing: &[Token]) -> Option<String> {
    let idx = trailing.iter().position(|t| t.is_keyword("COMMENT"))?;
    trailing[idx + 1..]
        .iter()
        .find_map(|t| match &t.kind {
            TokenKind::Str { value, .. } => Some(Some(value.clone())),
            TokenKind::Symbol(s) if s == "=" => None,
            _ => Some(None),
        })
        .flatten()
}

fn starts_constraint(cur: &Cursor) -> bool {
    let Some(first) = cur.peek().and_then(Token::keyword) else {
        return false;
    };
    match first.as_str() {
        "CONSTRAINT" | "UNIQUE" | "CHECK" | "INDEX" | "KEY" | "FULLTEXT" | "SPATIAL" => true,
        "PRIMARY" | "FOREIGN" => cur.peek_nth(1).is_some_and(|t| t.is_keyword("KEY")),
        _ => false,
    }
}

fn parse_column(cur: &mut Cursor) -> Result<ColumnClause> {
    let name = cur.ident("column name")?;
    let ty = parse_type(cur)?;
    let options = parse_column_options(cur)?;

    Ok(ColumnClause {
        name,
        raw_type: ty.raw,
        base_type: ty.base,
        type_params: ty.params,
        type_modifiers: ty.modifiers,
        is_array: ty.array,
        options,
    })
}

#[derive(Debug, Default)]
struct TypeSpec {
    raw: String,
    base: String,
    params: Option<String>,
    modifiers: Vec<String>,
    array: bool,
}

fn parse_type(cur: &mut Cursor) -> Result<TypeSpec> {
    let Some(first) = cur.peek() else {
        return Ok(TypeSpec::default());
    };
    let first_word = match &first.kind {
        TokenKind::Word(w) if !is_option_keyword(w) => w.to_ascii_lowercase(),
        // SQL Server scripts bracket-quote type names: [int], [nvarchar](50)
        TokenKind::Quoted { name, quote: '[' } => name.to_ascii_lowercase(),
        _ => return Ok(TypeSpec::default()),
    };
    let start = first.start;
    let mut end = first.end;
    cur.advance();

    let mut words = vec![first_word];
    let mut spec = TypeSpec::default();

    loop {
        let Some(tok) = cur.peek() else { break };
        match &tok.kind {
            TokenKind::LParen if spec.params.is_none() && !spec.array => {
                let (open, close) = cur.group()?;
                spec.params = Some(compact_params(&cur.tokens[open + 1..close]));
                end = cur.tokens[close].end;
            }
            TokenKind::Word(w) if continues_type(&words, &w.to_ascii_lowercase()) => {
                words.push(w.to_ascii_lowercase());
                end = tok.end;
                cur.advance();
            }
            TokenKind::Symbol(s) if s == "[" => {
                cur.advance();
                while let Some(t) = cur.next() {
                    if matches!(&t.kind, TokenKind::Symbol(s) if s == "]") {
                        end = t.end;
                        break;
                    }
                }
                spec.array = true;
            }
            _ => break,
        }
    }

    let (modifiers, base): (Vec<String>, Vec<String>) = words
        .into_iter()
        .partition(|w| matches!(w.as_str(), "unsigned" | "signed" | "zerofill"));
    spec.base = base.join(" ");
    spec.modifiers = modifiers;
    spec.raw = cur
        .source(start, end)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    Ok(spec)
}

/// Whether `next` extends a multi-word type such as `double precision`
/// or `timestamp with time zone`
fn continues_type(words: &[String], next: &str) -> bool {
    let first = words.first().map(String::as_str).unwrap_or("");
    let last = words.last().map(String::as_str).unwrap_or("");
    match next {
        "unsigned" | "signed" | "zerofill" => true,
        "precision" => last == "double",
        "varying" => matches!(last, "character" | "char" | "bit"),
        "character" | "char" => last == "national",
        "with" | "without" => words.len() == 1 && matches!(first, "time" | "timestamp"),
        "time" => matches!(last, "with" | "without"),
        "zone" => last == "time" && words.len() > 1,
        _ => false,
    }
}

/// Render type parameters without whitespace: `10, 2` -> `10,2`
fn compact_params(tokens: &[Token]) -> String {
    let mut out = String::new();
    for tok in tokens {
        match &tok.kind {
            TokenKind::Word(w) => {
                if out.ends_with(|c: char| c.is_ascii_alphanumeric()) {
                    out.push(' ');
                }
                out.push_str(w);
            }
            TokenKind::Number(n) => out.push_str(n),
            TokenKind::Str { value, .. } => {
                out.push('\'');
                out.push_str(&value.replace('\'', "''"));
                out.push('\'');
            }
            TokenKind::Quoted { name, .. } => out.push_str(name),
            TokenKind::Comma => out.push(','),
            TokenKind::LParen => out.push('('),
            TokenKind::RParen => out.push(')'),
            TokenKind::Symbol(s) => out.push_str(s),
            TokenKind::Dot => out.push('.'),
            TokenKind::DoubleColon => out.push_str("::"),
            TokenKind::Semicolon => {}
        }
    }
    out
}

fn parse_column_options(cur: &mut Cursor) -> Result<Vec<ColumnOption>> {
    let mut options: Vec<ColumnOption> = Vec::new();

    while let Some(tok) = cur.peek() {
        let kw = tok.keyword();
        let option = match kw.as_deref() {
            Some("NOT") if cur.peek_nth(1).is_some_and(|t| t.is_keyword("NULL")) => {
                cur.advance_by(2);
                ColumnOption::NotNull
            }
            Some("NULL") => {
                cur.advance();
                ColumnOption::Null
            }
            Some("DEFAULT") => {
                cur.advance();
                ColumnOption::Default(parse_default(cur)?)
            }
            Some("AUTO_INCREMENT") | Some("AUTOINCREMENT") => {
                cur.advance();
                ColumnOption::AutoIncrement
            }
            Some("IDENTITY") => {
                cur.advance();
                parse_identity(cur)?
            }
            Some("GENERATED") => parse_generated(cur)?,
            Some("PRIMARY") if cur.peek_nth(1).is_some_and(|t| t.is_keyword("KEY")) => {
                cur.advance_by(2);
                cur.skip_keywords(&["ASC", "DESC", "CLUSTERED", "NONCLUSTERED"]);
                ColumnOption::PrimaryKey
            }
            Some("KEY") => {
                cur.advance();
                ColumnOption::PrimaryKey
            }
            Some("UNIQUE") => {
                cur.advance();
                cur.skip_keywords(&["KEY", "CLUSTERED", "NONCLUSTERED"]);
                ColumnOption::Unique
            }
            Some("ON") if cur.peek_nth(1).is_some_and(|t| t.is_keyword("UPDATE")) => {
                parse_on_update(cur)?
            }
            Some("ON") if cur.peek_nth(1).is_some_and(|t| t.is_keyword("CONFLICT")) => {
                // SQLite conflict clause, no counterpart elsewhere
                cur.advance_by(3);
                continue;
            }
            Some("COMMENT") => {
                cur.advance();
                cur.eat_symbol("=");
                match cur.next().map(|t| &t.kind) {
                    Some(TokenKind::Str { value, .. }) => ColumnOption::Comment(value.clone()),
                    _ => return Err(TranslateError::malformed("COMMENT without a string")),
                }
            }
            Some("REFERENCES") => ColumnOption::References(parse_reference(cur)?),
            Some("CHECK") => {
                cur.advance();
                let (open, close) = cur.group()?;
                ColumnOption::Check(cur.tokens[open + 1..close].to_vec())
            }
            Some("CONSTRAINT") => {
                // Inline constraint names are not carried over
                cur.advance();
                if cur.peek().is_some_and(|t| {
                    t.ident().is_some() && !t.keyword().is_some_and(|k| is_option_keyword(&k))
                }) {
                    cur.advance();
                }
                continue;
            }
            Some("COLLATE") => {
                cur.advance();
                ColumnOption::Collate(cur.word_or_string("collation")?)
            }
            Some("CHARACTER") if cur.peek_nth(1).is_some_and(|t| t.is_keyword("SET")) => {
                cur.advance_by(2);
                ColumnOption::CharacterSet(cur.word_or_string("character set")?)
            }
            Some("CHARSET") => {
                cur.advance();
                ColumnOption::CharacterSet(cur.word_or_string("character set")?)
            }
            _ => {
                let start = cur.pos;
                cur.advance();
                if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
                    cur.group()?;
                }
                let tokens = cur.tokens[start..cur.pos].to_vec();
                if let Some(ColumnOption::Other(prev)) = options.last_mut() {
                    prev.extend(tokens);
                    continue;
                }
                ColumnOption::Other(tokens)
            }
        };
        options.push(option);
    }

    Ok(options)
}

fn parse_identity(cur: &mut Cursor) -> Result<ColumnOption> {
    let mut seed = "1".to_string();
    let mut increment = "1".to_string();
    if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
        let (open, close) = cur.group()?;
        let numbers: Vec<String> = cur.tokens[open + 1..close]
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Number(n) => Some(n.clone()),
                _ => None,
            })
            .collect();
        if let [s, i] = numbers.as_slice() {
            seed = s.clone();
            increment = i.clone();
        }
    }
    Ok(ColumnOption::Identity { seed, increment })
}

/// `GENERATED {ALWAYS | BY DEFAULT} AS IDENTITY [(...)]` is an
/// auto-increment column; a generated expression column is kept as-is.
fn parse_generated(cur: &mut Cursor) -> Result<ColumnOption> {
    let start = cur.pos;
    cur.advance();
    if !cur.eat_keyword("ALWAYS") {
        cur.eat_keywords(&["BY", "DEFAULT"]);
    }
    if cur.eat_keywords(&["AS", "IDENTITY"]) {
        if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
            cur.group()?;
        }
        return Ok(ColumnOption::AutoIncrement);
    }
    cur.eat_keyword("AS");
    if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
        cur.group()?;
    }
    cur.skip_keywords(&["STORED", "VIRTUAL", "PERSISTED"]);
    Ok(ColumnOption::Other(cur.tokens[start..cur.pos].to_vec()))
}

fn parse_on_update(cur: &mut Cursor) -> Result<ColumnOption> {
    let start = cur.pos;
    cur.advance_by(2);
    let is_now = cur.peek().and_then(Token::keyword).is_some_and(|k| {
        matches!(
            k.as_str(),
            "CURRENT_TIMESTAMP" | "NOW" | "LOCALTIMESTAMP" | "GETDATE" | "SYSDATETIME"
        )
    });
    cur.advance();
    if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
        cur.group()?;
    }
    if is_now {
        Ok(ColumnOption::OnUpdateCurrentTimestamp)
    } else {
        Ok(ColumnOption::Other(cur.tokens[start..cur.pos].to_vec()))
    }
}

fn parse_default(cur: &mut Cursor) -> Result<DefaultValue> {
    let start = cur.pos;
    let first = cur
        .next()
        .ok_or_else(|| TranslateError::malformed("DEFAULT without a value"))?;

    match &first.kind {
        TokenKind::Word(_) | TokenKind::Quoted { .. } => {
            if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
                cur.group()?;
            }
        }
        TokenKind::LParen => {
            cur.pos = start;
            cur.group()?;
        }
        TokenKind::Symbol(s) if s == "-" || s == "+" => {
            if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::Number(_))) {
                cur.advance();
            }
        }
        _ => {}
    }

    // PostgreSQL casts: 'x'::character varying, 0::smallint
    while matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::DoubleColon)) {
        cur.advance();
        skip_cast_type(cur)?;
    }

    let expr = strip_casts(&cur.tokens[start..cur.pos]);
    Ok(classify_default(&expr, cur.dialect))
}

fn skip_cast_type(cur: &mut Cursor) -> Result<()> {
    while let Some(tok) = cur.peek() {
        match &tok.kind {
            TokenKind::Word(w) if !is_option_keyword(w) => cur.advance(),
            TokenKind::Quoted { .. } => cur.advance(),
            TokenKind::LParen => {
                cur.group()?;
            }
            TokenKind::Symbol(s) if s == "[" || s == "]" => cur.advance(),
            _ => break,
        }
    }
    Ok(())
}

/// Drop `::type` casts from a token run
fn strip_casts(tokens: &[Token]) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::DoubleColon {
            i += 1;
            while i < tokens.len() {
                match &tokens[i].kind {
                    TokenKind::Word(_) | TokenKind::Quoted { .. } => i += 1,
                    TokenKind::Symbol(s) if s == "[" || s == "]" => i += 1,
                    TokenKind::LParen => match matching_close(tokens, i) {
                        Some(close) => i = close + 1,
                        None => break,
                    },
                    _ => break,
                }
            }
            continue;
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

fn classify_default(tokens: &[Token], dialect: Dialect) -> DefaultValue {
    match tokens {
        [tok] => match &tok.kind {
            TokenKind::Str { value, prefix } => DefaultValue::Str {
                value: value.clone(),
                prefix: *prefix,
            },
            // MySQL reads "..." as a string literal
            TokenKind::Quoted { name, quote: '"' } if dialect == Dialect::MySql => {
                DefaultValue::Str {
                    value: name.clone(),
                    prefix: None,
                }
            }
            TokenKind::Number(n) => DefaultValue::Number(n.clone()),
            TokenKind::Word(w) if w.eq_ignore_ascii_case("NULL") => DefaultValue::Null,
            TokenKind::Word(w) => DefaultValue::Keyword(w.to_ascii_uppercase()),
            _ => DefaultValue::Expr(tokens.to_vec()),
        },
        [sign, num] => match (&sign.kind, &num.kind) {
            (TokenKind::Symbol(s), TokenKind::Number(n)) if s == "-" => {
                DefaultValue::Number(format!("-{}", n))
            }
            (TokenKind::Symbol(s), TokenKind::Number(n)) if s == "+" => {
                DefaultValue::Number(n.clone())
            }
            _ => DefaultValue::Expr(tokens.to_vec()),
        },
        // SQL Server wraps defaults in parens: ((0)), (getdate()), (N'x')
        [first, .., last]
            if first.kind == TokenKind::LParen
                && last.kind == TokenKind::RParen
                && matching_close(tokens, 0) == Some(tokens.len() - 1) =>
        {
            classify_default(&tokens[1..tokens.len() - 1], dialect)
        }
        [] => DefaultValue::Null,
        _ => DefaultValue::Expr(tokens.to_vec()),
    }
}

fn parse_reference(cur: &mut Cursor) -> Result<Reference> {
    cur.advance();
    let table = cur.qualified_name()?;
    let columns = if matches!(cur.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
        cur.ident_list()?
    } else {
        Vec::new()
    };

    let mut reference = Reference {
        table,
        columns,
        on_delete: None,
        on_update: None,
    };

    loop {
        let is_action_clause = cur.peek().is_some_and(|t| t.is_keyword("ON"))
            && cur.peek_nth(2).is_some_and(|t| {
                REFERENTIAL_ACTIONS.iter().any(|a| t.is_keyword(a))
            });
        if is_action_clause {
            cur.advance();
            let event = cur.next().and_then(Token::keyword);
            let action = parse_action(cur);
            match event.as_deref() {
                Some("DELETE") => reference.on_delete = Some(action),
                Some("UPDATE") => reference.on_update = Some(action),
                _ => {}
            }
        } else if cur.eat_keyword("MATCH") {
            cur.advance();
        } else if cur.eat_keyword("DEFERRABLE") || cur.eat_keywords(&["NOT", "DEFERRABLE"]) {
        } else if cur.eat_keyword("INITIALLY") {
            cur.advance();
        } else {
            break;
        }
    }

    Ok(reference)
}

fn parse_action(cur: &mut Cursor) -> String {
    let first = cur.next().and_then(Token::keyword).unwrap_or_default();
    match first.as_str() {
        "NO" | "SET" => {
            let second = cur.next().and_then(Token::keyword).unwrap_or_default();
            format!("{} {}", first, second)
        }
        _ => first,
    }
}

fn parse_constraint(cur: &mut Cursor) -> Result<ConstraintClause> {
    let mut name = None;
    if cur.eat_keyword("CONSTRAINT") {
        let named = cur.peek().is_some_and(|t| {
            t.ident().is_some()
                && !["PRIMARY", "UNIQUE", "FOREIGN", "CHECK"]
                    .iter()
                    .any(|k| t.is_keyword(k))
        });
        if named {
            name = Some(cur.ident("constraint name")?);
        }
    }

    let kw = cur.peek().and_then(Token::keyword).unwrap_or_default();
    let kind = match kw.as_str() {
        "PRIMARY" => {
            cur.advance_by(2);
            cur.skip_keywords(&["CLUSTERED", "NONCLUSTERED"]);
            skip_using(cur);
            ConstraintKind::PrimaryKey(cur.index_columns()?)
        }
        "UNIQUE" => {
            cur.advance();
            cur.skip_keywords(&["KEY", "INDEX", "CLUSTERED", "NONCLUSTERED"]);
            let index_name = optional_index_name(cur)?;
            name = name.or(index_name);
            skip_using(cur);
            ConstraintKind::Unique(cur.index_columns()?)
        }
        "FOREIGN" => {
            cur.advance_by(2);
            let index_name = optional_index_name(cur)?;
            name = name.or(index_name);
            let columns = cur.ident_list()?;
            if !cur.peek().is_some_and(|t| t.is_keyword("REFERENCES")) {
                return Err(TranslateError::malformed("FOREIGN KEY without REFERENCES"));
            }
            ConstraintKind::ForeignKey {
                columns,
                reference: parse_reference(cur)?,
            }
        }
        "CHECK" => {
            cur.advance();
            let (open, close) = cur.group()?;
            ConstraintKind::Check(cur.tokens[open + 1..close].to_vec())
        }
        "KEY" | "INDEX" | "FULLTEXT" | "SPATIAL" => {
            cur.advance();
            let kind = match kw.as_str() {
                "FULLTEXT" => IndexKind::Fulltext,
                "SPATIAL" => IndexKind::Spatial,
                _ => IndexKind::Plain,
            };
            if kind != IndexKind::Plain {
                cur.skip_keywords(&["KEY", "INDEX"]);
            }
            name = optional_index_name(cur)?;
            skip_using(cur);
            ConstraintKind::Index {
                kind,
                columns: cur.index_columns()?,
            }
        }
        _ => {
            return Err(TranslateError::malformed(format!(
                "unrecognized table constraint near {:?}",
                cur.remaining_source()
            )))
        }
    };

    Ok(ConstraintClause { name, kind })
}

fn optional_index_name(cur: &mut Cursor) -> Result<Option<String>> {
    let named = cur
        .peek()
        .is_some_and(|t| t.ident().is_some() && !t.is_keyword("USING"));
    if named {
        cur.ident("index name").map(Some)
    } else {
        Ok(None)
    }
}

fn skip_using(cur: &mut Cursor) {
    if cur.eat_keyword("USING") {
        cur.advance();
    }
}

/// Index of the `)` matching the `(` at `open`
pub(crate) fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    src: &'a str,
    dialect: Dialect,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self::with_source(tokens, "", Dialect::MySql)
    }

    fn with_source(tokens: &'a [Token], src: &'a str, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            src,
            dialect,
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    fn advance(&mut self) {
        self.advance_by(1);
    }

    fn advance_by(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(kw)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a keyword sequence only if all of it matches
    fn eat_keywords(&mut self, kws: &[&str]) -> bool {
        let matched = kws
            .iter()
            .enumerate()
            .all(|(i, kw)| self.peek_nth(i).is_some_and(|t| t.is_keyword(kw)));
        if matched {
            self.pos += kws.len();
        }
        matched
    }

    fn skip_keywords(&mut self, kws: &[&str]) {
        while self
            .peek()
            .is_some_and(|t| kws.iter().any(|kw| t.is_keyword(kw)))
        {
            self.pos += 1;
        }
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Symbol(s)) if s == symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        match self.peek().and_then(Token::ident) {
            Some(name) => {
                self.pos += 1;
                Ok(name.to_string())
            }
            None => Err(TranslateError::malformed(format!("expected {}", what))),
        }
    }

    /// `schema.table` or `db.schema.table`; only the last part is kept
    fn qualified_name(&mut self) -> Result<String> {
        let mut name = self.ident("table name")?;
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Dot)) {
            self.pos += 1;
            name = self.ident("table name")?;
        }
        if name.is_empty() {
            return Err(TranslateError::malformed("empty table name"));
        }
        Ok(name)
    }

    fn word_or_string(&mut self, what: &str) -> Result<String> {
        match self.next().map(|t| &t.kind) {
            Some(TokenKind::Word(w)) => Ok(w.clone()),
            Some(TokenKind::Quoted { name, .. }) => Ok(name.clone()),
            Some(TokenKind::Str { value, .. }) => Ok(value.clone()),
            _ => Err(TranslateError::malformed(format!("expected {}", what))),
        }
    }

    /// Consume a balanced `( ... )` group, returning the paren indices
    fn group(&mut self) -> Result<(usize, usize)> {
        let open = self.pos;
        if !matches!(self.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
            return Err(TranslateError::malformed(format!(
                "expected '(' near {:?}",
                self.remaining_source()
            )));
        }
        let close = matching_close(self.tokens, open)
            .ok_or_else(|| TranslateError::malformed("unbalanced parentheses"))?;
        self.pos = close + 1;
        Ok((open, close))
    }

    /// `(a, b, c)` as plain names
    fn ident_list(&mut self) -> Result<Vec<String>> {
        Ok(self
            .index_columns()?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// `(name(10) DESC, other)` as index columns
    fn index_columns(&mut self) -> Result<Vec<IndexColumn>> {
        let (open, close) = self.group()?;
        let mut columns = Vec::new();
        for part in split_top_level(&self.tokens[open + 1..close]) {
            let Some(first) = part.first() else { continue };
            let name = match first.ident() {
                Some(n) => n.to_string(),
                None => super::lexer::render_tokens(part, self.dialect),
            };
            let mut column = IndexColumn {
                name,
                length: None,
                order: None,
            };
            for (i, tok) in part.iter().enumerate().skip(1) {
                match &tok.kind {
                    TokenKind::Number(n) if i == 2 => column.length = Some(n.clone()),
                    TokenKind::Word(w)
                        if w.eq_ignore_ascii_case("ASC") || w.eq_ignore_ascii_case("DESC") =>
                    {
                        column.order = Some(w.to_ascii_uppercase())
                    }
                    _ => {}
                }
            }
            columns.push(column);
        }
        if columns.is_empty() {
            return Err(TranslateError::malformed("empty column list"));
        }
        Ok(columns)
    }

    fn source(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or("")
    }

    fn remaining_source(&self) -> &'a str {
        match self.peek() {
            Some(t) => self.src.get(t.start..).unwrap_or(""),
            None => "",
        }
    }
}

/// Split a token run on depth-0 commas
fn split_top_level(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth -= 1,
            TokenKind::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}
