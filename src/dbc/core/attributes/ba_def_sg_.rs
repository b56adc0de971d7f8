use crate::dbc::types::{database::Database, errors::ParseError};

/// Decode a `BA_DEF_ SG_` attribute definition line.
///
/// Only `GenSigStartValue` carries behaviour; its min/max become the
/// database-wide bounds for signal initial values:
/// `BA_DEF_ SG_ "GenSigStartValue" INT 0 65535;`
/// Every other signal attribute definition is tolerated and ignored.
pub(crate) fn decode(db: &mut Database, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut parts = line.split_ascii_whitespace();

    // "BA_DEF_" "SG_"
    match (parts.next(), parts.next()) {
        (Some("BA_DEF_"), Some("SG_")) => {}
        _ => return Ok(()),
    }

    // attribute name token, e.g. "\"GenSigStartValue\""
    let name: &str = match parts.next() {
        Some(tok) => tok.trim_matches('"'),
        None => return Ok(()),
    };
    if name != "GenSigStartValue" {
        return Ok(());
    }

    let malformed = || ParseError::MalformedLine {
        keyword: "BA_DEF_",
        line: line.to_string(),
    };

    // value type token (INT/FLOAT/...), then the attribute bounds
    parts.next().ok_or_else(malformed)?;
    db.global_initial_min = parts
        .next()
        .and_then(|tok| tok.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    db.global_initial_max = parts
        .next()
        .and_then(|tok| tok.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    Ok(())
}
