//! Line-level cleanup of generated SQL.
//!
//! Everything here is idempotent: running a pass twice gives the same
//! result as running it once.

use once_cell::sync::Lazy;
use regex::Regex;

/// Type keywords that take a parenthesized parameter list
static RE_TYPE_SPACE_PAREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(VARCHAR|NVARCHAR|CHAR|NCHAR|CHARACTER\s+VARYING|CHARACTER|VARBINARY|BINARY|DECIMAL|NUMERIC|FLOAT|DOUBLE|REAL|INT|INTEGER|TINYINT|SMALLINT|MEDIUMINT|BIGINT|BIT|ENUM|SET|DATETIME|DATETIME2|TIMESTAMP|TIME|DATETIMEOFFSET)\s+\(",
    )
    .unwrap()
});

static RE_SPACE_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+,").unwrap());

/// Remove whitespace between a type keyword and its opening paren.
///
/// `VARCHAR (255)` becomes `VARCHAR(255)`.
pub fn trim_column_type(sql: &str) -> String {
    RE_TYPE_SPACE_PAREN.replace_all(sql, "${1}(").to_string()
}

/// Clean a single line: drop a trailing `--` comment, remove whitespace
/// before commas and trim trailing whitespace.
pub fn fix_line(line: &str) -> String {
    let line = line.trim_end_matches('\r');
    let code = match find_outside_quotes(line, "--") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let code = collapse_space_before_comma(code);
    code.trim_end().to_string()
}

/// Clean a whole script: strip block comments, fix each line and drop
/// blank lines. Line endings become `\n`.
///
/// A newline inside quoted text does not end a line, so string literals
/// and quoted identifiers spanning several lines come through untouched.
pub fn fix_lines(sql: &str) -> String {
    let without_blocks = strip_block_comments(sql);
    split_lines_outside_quotes(&without_blocks)
        .into_iter()
        .map(fix_line)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `/* ... */` outside quoted text with a single space.
///
/// An unterminated block comment swallows the rest of the input.
pub fn strip_block_comments(sql: &str) -> String {
    let mut result = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            result.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
                result.push(' ');
            }
            _ => {
                quote = closing_quote(c);
                result.push(c);
            }
        }
    }
    result
}

/// Closing character for a quote that opens with `c`
fn closing_quote(c: char) -> Option<char> {
    match c {
        '\'' | '"' | '`' => Some(c),
        '[' => Some(']'),
        _ => None,
    }
}

fn split_lines_outside_quotes(sql: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut quote: Option<char> = None;
    let mut line_start = 0;

    for (i, c) in sql.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None if c == '\n' => {
                lines.push(&sql[line_start..i]);
                line_start = i + 1;
            }
            None => quote = closing_quote(c),
        }
    }
    lines.push(&sql[line_start..]);
    lines
}

fn collapse_space_before_comma(code: &str) -> String {
    if !code.contains(',') {
        return code.to_string();
    }
    // Only rewrite the segments that sit outside quoted text
    let mut result = String::with_capacity(code.len());
    let mut segment = String::new();
    let mut quote: Option<char> = None;

    for c in code.chars() {
        match quote {
            Some(q) => {
                result.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match closing_quote(c) {
                Some(close) => {
                    result.push_str(&RE_SPACE_BEFORE_COMMA.replace_all(&segment, ","));
                    segment.clear();
                    quote = Some(close);
                    result.push(c);
                }
                None => segment.push(c),
            },
        }
    }
    result.push_str(&RE_SPACE_BEFORE_COMMA.replace_all(&segment, ","));
    result
}

fn find_outside_quotes(line: &str, needle: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None if line[i..].starts_with(needle) => return Some(i),
            None => quote = closing_quote(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_column_type() {
        assert_eq!(trim_column_type("VARCHAR (255)"), "VARCHAR(255)");
        assert_eq!(trim_column_type("decimal  (10, 2)"), "decimal(10, 2)");
        assert_eq!(
            trim_column_type("CHARACTER VARYING (50)"),
            "CHARACTER VARYING(50)"
        );
        assert_eq!(trim_column_type("name TEXT (x)"), "name TEXT (x)");
    }

    #[test]
    fn test_fix_line_strips_comment() {
        assert_eq!(fix_line("  id INT, -- the key"), "  id INT,");
        assert_eq!(fix_line("x DEFAULT '--not' ,"), "x DEFAULT '--not',");
    }

    #[test]
    fn test_fix_lines_drops_blank_and_block_comments() {
        let sql = "CREATE TABLE t (\r\n\r\n  /* note */\r\n  id INT ,\n  b INT /* x */\n);";
        assert_eq!(fix_lines(sql), "CREATE TABLE t (\n  id INT,\n  b INT\n);");
    }

    #[test]
    fn test_fix_lines_keeps_comment_markers_in_strings() {
        let sql = "a DEFAULT '/* keep */'";
        assert_eq!(fix_lines(sql), sql);
    }

    #[test]
    fn test_fix_lines_keeps_multiline_literal() {
        let sql = "CREATE TABLE t (\n    note TEXT DEFAULT 'x  \n-- y\n\nz' ,\n    b INT\n);";
        assert_eq!(
            fix_lines(sql),
            "CREATE TABLE t (\n    note TEXT DEFAULT 'x  \n-- y\n\nz',\n    b INT\n);"
        );
    }

    #[test]
    fn test_bracket_identifiers_are_quoted_text() {
        let sql = "CREATE TABLE [a/*x] (\n    [b */ --c] INT ,\n    [d\n\ne] INT\n);";
        assert_eq!(
            fix_lines(sql),
            "CREATE TABLE [a/*x] (\n    [b */ --c] INT,\n    [d\n\ne] INT\n);"
        );
        assert_eq!(strip_block_comments("[a/*x] /* y */ [b*/]"), "[a/*x]   [b*/]");
    }

    #[test]
    fn test_fix_lines_idempotent() {
        let inputs = [
            "a ,b -- c\n\n/* d */ e ,",
            "x / /**/* y",
            "'unterminated -- x",
            "",
            "line1\r\nline2 \t\n",
            "a DEFAULT 'x\n\n-- y ,'\n\nb",
            "[open\n -- never closed",
        ];
        for input in inputs {
            let once = fix_lines(input);
            assert_eq!(fix_lines(&once), once, "input: {input:?}");
        }
    }
}
