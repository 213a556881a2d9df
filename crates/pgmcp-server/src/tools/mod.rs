//! Tools that run user-supplied SQL.
//!
//! Every tool runs inside a read-only transaction with a local statement
//! timeout, and the transaction is always rolled back.

pub mod metadata;
pub mod query;

use std::time::Duration;

use sqlx::{Connection, PgConnection, Postgres, Transaction};

pub use metadata::{collect_metadata, group_keys, FieldMetadata, LogicalType, QueryMetadata};
pub use query::{explain, run_query};

/// Trim trailing comments, whitespace and a final semicolon so the statement
/// can be embedded as a subquery.
///
/// Quoted strings, quoted identifiers and dollar-quoted bodies are skipped, so
/// a `;` or `--` inside them is kept.
pub fn strip_statement(sql: &str) -> &str {
    let bytes = sql.as_bytes();
    let mut end = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                i = find_from(sql, i + 2, "\n").unwrap_or(bytes.len());
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_block_comment(bytes, i);
                continue;
            }
            quote @ (b'\'' | b'"') => {
                i = find_byte(bytes, i + 1, quote).map_or(bytes.len(), |close| close + 1);
                end = i;
                continue;
            }
            b'$' => {
                if let Some(tag_len) = dollar_tag_len(&bytes[i..]) {
                    let tag = &sql[i..i + tag_len];
                    i = find_from(sql, i + tag_len, tag).map_or(bytes.len(), |close| close + tag_len);
                    end = i;
                    continue;
                }
                end = i + 1;
            }
            b if !b.is_ascii_whitespace() => end = i + 1,
            _ => {}
        }
        i += 1;
    }

    let code = sql[..end].trim();
    match code.strip_suffix(';') {
        // Comments may sit before the semicolon too.
        Some(rest) => strip_statement(rest),
        None => code,
    }
}

/// Embed a statement as a subquery aliased `alias`.
///
/// The closing parenthesis goes on its own line so a trailing line comment
/// in `sql` cannot swallow it.
pub(crate) fn subquery(sql: &str, alias: &str) -> String {
    format!("({sql}\n) AS {alias}")
}

fn find_from(sql: &str, from: usize, needle: &str) -> Option<usize> {
    sql.get(from..)?.find(needle).map(|pos| from + pos)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|pos| from + pos)
}

/// Index just past a (possibly nested) block comment starting at `start`.
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Length of a `$tag$` opener at the start of `bytes`, if any. `$1` style
/// parameters are not tags.
fn dollar_tag_len(bytes: &[u8]) -> Option<usize> {
    let close = bytes[1..].iter().position(|&b| b == b'$')? + 1;
    let tag = &bytes[1..close];
    let valid = tag.first().map_or(true, |b| !b.is_ascii_digit())
        && tag.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_');
    valid.then_some(close + 1)
}

/// Open a read-only transaction with a local statement timeout.
pub(crate) async fn read_only(
    conn: &mut PgConnection,
    statement_timeout: Duration,
) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
    let mut tx = conn.begin().await?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "SET LOCAL statement_timeout = {}",
        statement_timeout.as_millis()
    ))
    .execute(&mut *tx)
    .await?;
    Ok(tx)
}
