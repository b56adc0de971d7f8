use crate::dbc::types::{database::Database, errors::ParseError};

/// Decode a `BA_DEF_DEF_` attribute default line.
///
/// Only `GenSigStartValue` carries behaviour; its value is the raw initial
/// value used for every signal without one of its own:
/// `BA_DEF_DEF_  "GenSigStartValue" 0;`
pub(crate) fn decode(db: &mut Database, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut parts = line.split_ascii_whitespace();

    match parts.next() {
        Some("BA_DEF_DEF_") => {}
        _ => return Ok(()),
    }

    let name: &str = match parts.next() {
        Some(tok) => tok.trim_matches('"'),
        None => return Ok(()),
    };
    if name != "GenSigStartValue" {
        return Ok(());
    }

    db.global_initial_value = parts
        .next()
        .and_then(|tok| tok.parse::<f64>().ok())
        .ok_or_else(|| ParseError::MalformedLine {
            keyword: "BA_DEF_DEF_",
            line: line.to_string(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_default() {
        let mut db: Database = Database::default();
        decode(&mut db, r#"BA_DEF_DEF_  "GenSigStartValue" 12.5;"#).unwrap();
        assert_eq!(db.global_initial_value, 12.5);
    }

    #[test]
    fn test_other_defaults_ignored() {
        let mut db: Database = Database::default();
        decode(&mut db, r#"BA_DEF_DEF_  "GenMsgCycleTime" 100;"#).unwrap();
        assert_eq!(db.global_initial_value, 0.0);
    }
}
