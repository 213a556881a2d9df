//! SQL identifier quoting.
//!
//! Catalog queries take names as bound parameters; only statements that must
//! splice a name into the SQL text (exact row counts, per-column statistics)
//! go through these helpers.

use crate::error::{Error, Result};

/// Quote a single identifier the way `quote_ident` does, unconditionally.
///
/// Embedded double quotes are doubled. NUL bytes cannot appear in a
/// PostgreSQL identifier and are rejected.
pub fn quote_identifier(ident: &str) -> Result<String> {
    if ident.is_empty() || ident.contains('\0') {
        return Err(Error::InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
}

/// Build a schema-qualified, quoted relation name.
pub fn qualified_name(schema: &str, relation: &str) -> Result<String> {
    Ok(format!(
        "{}.{}",
        quote_identifier(schema)?,
        quote_identifier(relation)?
    ))
}
