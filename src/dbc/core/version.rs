use crate::dbc::core::strings::collect_all_quoted;
use crate::dbc::types::database::Database;

/// Decode a `VERSION "..."` line into the database version string.
pub(crate) fn decode(db: &mut Database, line: &str) {
    if let Some(version) = collect_all_quoted(line).into_iter().next() {
        db.version = version;
    }
}
