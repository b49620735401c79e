//! # Column Metadata Scan
//!
//! Derives column names, declared types, and type affinities from an
//! object's stored `CREATE TABLE` text. This is deliberately not a SQL
//! parser: the text between the outermost parentheses is split on commas
//! and each piece read as `name [type...]`, which is exactly enough for
//! the straightforward DDL the schema table stores. Constraint clauses
//! that contain commas of their own (composite keys, CHECK expressions)
//! produce extra entries the caller can ignore.
//!
//! ## Affinity Rules
//!
//! The declared type maps to an affinity by substring match, in order:
//!
//! | Declared type contains        | Affinity |
//! |-------------------------------|----------|
//! | INT                           | INTEGER  |
//! | CHAR, CLOB, TEXT              | TEXT     |
//! | REAL, FLOA, DOUB              | REAL     |
//! | BLOB, or no declared type     | BLOB     |
//! | anything else                 | NUMERIC  |

/// Recommended storage class for a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Text,
    Numeric,
    Integer,
    Real,
    Blob,
}

/// One column scanned from a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub decl_type: String,
    pub affinity: Affinity,
}

/// Table-level options trailing the column list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub without_rowid: bool,
    pub strict: bool,
}

/// Scans column definitions from the text between the outermost
/// parentheses. Returns an empty list when there are none (for example an
/// index's SQL, or the NULL sql of an automatic index).
pub fn parse_columns(sql: &str) -> Vec<Column> {
    let sql = sql.replace('\n', " ");
    let (Some(open), Some(close)) = (sql.find('('), sql.rfind(')')) else {
        return Vec::new();
    };
    if open + 1 > close {
        return Vec::new();
    }

    sql[open + 1..close]
        .split(',')
        .filter_map(|part| {
            let mut words = part.trim().split_whitespace();
            let name = words.next()?.trim_matches(|c| c == '"' || c == '`');
            if name.is_empty() {
                return None;
            }
            let decl_type = words.next().unwrap_or("").to_string();
            Some(Column {
                name: name.to_string(),
                affinity: affinity_of(&decl_type),
                decl_type,
            })
        })
        .collect()
}

/// Scans the text after the closing parenthesis for table options.
pub fn table_options(sql: &str) -> TableOptions {
    let tail = match sql.rfind(')') {
        Some(close) => sql[close + 1..].to_ascii_uppercase(),
        None => return TableOptions::default(),
    };
    TableOptions {
        without_rowid: tail.contains("WITHOUT ROWID"),
        strict: tail.contains("STRICT"),
    }
}

fn affinity_of(decl_type: &str) -> Affinity {
    let ty = decl_type.to_ascii_uppercase();
    if ty.contains("INT") {
        Affinity::Integer
    } else if ty.contains("CHAR") || ty.contains("CLOB") || ty.contains("TEXT") {
        Affinity::Text
    } else if ty.contains("REAL") || ty.contains("FLOA") || ty.contains("DOUB") {
        Affinity::Real
    } else if ty.contains("BLOB") || ty.is_empty() {
        Affinity::Blob
    } else {
        Affinity::Numeric
    }
}
