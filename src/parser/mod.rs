pub mod ast;
pub mod create_table;
pub mod lexer;

#[cfg(test)]
mod edge_case_tests;

pub use ast::*;
pub use create_table::{
    classify_clause, locate_column_section, parse_create_table, split_clauses, ColumnSection,
};

use crate::dialect::Dialect;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::io::{BufRead, BufReader, Read};

pub const SMALL_BUFFER_SIZE: usize = 64 * 1024;
pub const MEDIUM_BUFFER_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Unknown,
    CreateTable,
    Insert,
    CreateIndex,
    AlterTable,
    DropTable,
}

impl StatementType {
    pub fn label(self) -> &'static str {
        match self {
            StatementType::Unknown => "statement",
            StatementType::CreateTable => "CREATE TABLE",
            StatementType::Insert => "INSERT",
            StatementType::CreateIndex => "CREATE INDEX",
            StatementType::AlterTable => "ALTER TABLE",
            StatementType::DropTable => "DROP TABLE",
        }
    }
}

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:[`"\[]?[^\s`"\]\[(.]+[`"\]]?\.)*[`"\[]?([^\s`"\]\[(;]+)"#)
        .unwrap()
});

static INSERT_INTO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^INSERT\s+INTO\s+[`"\[]?([^\s`"\]\[(]+)"#).unwrap());

static CREATE_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bON\s+[`"\[]?([^\s`"\]\[(;]+)"#).unwrap());

static ALTER_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^ALTER\s+TABLE\s+[`"\[]?([^\s`"\];]+)"#).unwrap());

static DROP_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^DROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?[`"\[]?([^\s`"\];]+)"#).unwrap()
});

/// Streaming statement reader for SQL scripts.
///
/// Splits on `;` outside string literals, quoted identifiers and comments.
/// Backslash escapes inside strings are only honored for MySQL input.
pub struct Parser<R: Read> {
    reader: BufReader<R>,
    stmt_buffer: Vec<u8>,
    dialect: Dialect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Quoted(u8),
    LineComment,
    BlockComment,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R, buffer_size: usize) -> Self {
        Self::with_dialect(reader, buffer_size, Dialect::MySql)
    }

    pub fn with_dialect(reader: R, buffer_size: usize, dialect: Dialect) -> Self {
        Self {
            reader: BufReader::with_capacity(buffer_size, reader),
            stmt_buffer: Vec::with_capacity(32 * 1024),
            dialect,
        }
    }

    pub fn read_statement(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        self.stmt_buffer.clear();

        let backslash_escapes = self.dialect.backslash_escapes();
        let mut state = ScanState::Code;
        let mut escaped = false;
        // Last byte seen, carried across buffer refills
        let mut prev: u8 = 0;

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                if self.stmt_buffer.is_empty() {
                    return Ok(None);
                }
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            let mut consumed = 0;
            let mut found_terminator = false;

            for (i, &b) in buf.iter().enumerate() {
                if escaped {
                    escaped = false;
                    prev = 0;
                    continue;
                }

                match state {
                    ScanState::Quoted(q) => {
                        if b == b'\\' && backslash_escapes && q == b'\'' {
                            escaped = true;
                        } else if b == q {
                            state = ScanState::Code;
                        }
                    }
                    ScanState::LineComment => {
                        if b == b'\n' {
                            state = ScanState::Code;
                        }
                    }
                    ScanState::BlockComment => {
                        if prev == b'*' && b == b'/' {
                            state = ScanState::Code;
                            prev = 0;
                            continue;
                        }
                    }
                    ScanState::Code => match b {
                        b'\'' | b'"' | b'`' => state = ScanState::Quoted(b),
                        b'[' if self.dialect == Dialect::SqlServer => {
                            state = ScanState::Quoted(b']')
                        }
                        b'-' if prev == b'-' => state = ScanState::LineComment,
                        b'#' if self.dialect == Dialect::MySql => {
                            state = ScanState::LineComment
                        }
                        b'*' if prev == b'/' => {
                            state = ScanState::BlockComment;
                            prev = 0;
                            continue;
                        }
                        b';' => {
                            self.stmt_buffer.extend_from_slice(&buf[..=i]);
                            consumed = i + 1;
                            found_terminator = true;
                            break;
                        }
                        _ => {}
                    },
                }
                prev = b;
            }

            if found_terminator {
                self.reader.consume(consumed);
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            self.stmt_buffer.extend_from_slice(buf);
            let len = buf.len();
            self.reader.consume(len);
        }
    }

    /// Classify a statement and extract the table it targets.
    pub fn parse_statement(stmt: &[u8]) -> (StatementType, String) {
        let stmt = skip_leading_comments(stmt);

        if stmt.len() < 6 {
            return (StatementType::Unknown, String::new());
        }

        let patterns: [(&Lazy<Regex>, StatementType); 5] = [
            (&CREATE_TABLE_RE, StatementType::CreateTable),
            (&INSERT_INTO_RE, StatementType::Insert),
            (&ALTER_TABLE_RE, StatementType::AlterTable),
            (&DROP_TABLE_RE, StatementType::DropTable),
            (&CREATE_INDEX_RE, StatementType::CreateIndex),
        ];

        let upper_prefix: Vec<u8> = stmt
            .iter()
            .take(24)
            .map(|b| b.to_ascii_uppercase())
            .collect();
        let is_create_index = upper_prefix.starts_with(b"CREATE INDEX")
            || upper_prefix.starts_with(b"CREATE UNIQUE INDEX");

        for (re, typ) in patterns {
            if typ == StatementType::CreateIndex && !is_create_index {
                continue;
            }
            if let Some(m) = re.captures(stmt).and_then(|caps| caps.get(1)) {
                return (typ, String::from_utf8_lossy(m.as_bytes()).into_owned());
            }
        }

        (StatementType::Unknown, String::new())
    }
}

/// Skip whitespace and `--`/`/* */` comments at the start of a statement
pub fn skip_leading_comments(mut data: &[u8]) -> &[u8] {
    loop {
        data = trim_ascii_start(data);
        if data.starts_with(b"--") {
            match data.iter().position(|&b| b == b'\n') {
                Some(pos) => data = &data[pos + 1..],
                None => return &[],
            }
        } else if data.starts_with(b"/*") {
            match data.windows(2).skip(2).position(|w| w == b"*/") {
                Some(pos) => data = &data[pos + 4..],
                None => return &[],
            }
        } else {
            return data;
        }
    }
}

#[inline]
fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .unwrap_or(data.len());
    &data[start..]
}

pub fn determine_buffer_size(file_size: u64) -> usize {
    if file_size > 1024 * 1024 * 1024 {
        MEDIUM_BUFFER_SIZE
    } else {
        SMALL_BUFFER_SIZE
    }
}
