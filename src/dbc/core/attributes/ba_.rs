use crate::dbc::core::strings::{collect_all_quoted, parse_uint};
use crate::dbc::types::{
    database::{BusType, Database, SignalKey},
    errors::ParseError,
};

/// Decode a `BA_` attribute value line.
///
/// Two attributes carry behaviour:
/// - `BA_ "BusType" "CAN FD";` selects the frame format of the database.
/// - `BA_ "GenSigStartValue" SG_ <MsgID> <SignalName> <value>;` assigns a
///   signal's raw initial value.
/// Every other attribute value is tolerated and ignored.
pub(crate) fn decode(db: &mut Database, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut parts = line.split_ascii_whitespace();

    match parts.next() {
        Some("BA_") => {}
        _ => return Ok(()),
    }

    let name: &str = match parts.next() {
        Some(tok) => tok.trim_matches('"'),
        None => return Ok(()),
    };

    match name {
        "BusType" => decode_bus_type(db, line),
        "GenSigStartValue" => decode_initial_value(db, line, parts),
        _ => Ok(()),
    }
}

fn decode_bus_type(db: &mut Database, line: &str) -> Result<(), ParseError> {
    // the value is a quoted string and may contain a space ("CAN FD")
    let quoted: Vec<String> = collect_all_quoted(line);
    let token: &str = quoted.get(1).map(String::as_str).unwrap_or("");
    db.bus_type = match token {
        "CAN" => BusType::Can,
        "CAN FD" | "CAN-FD" => BusType::CanFd,
        "" => BusType::Unknown,
        other => {
            return Err(ParseError::UnknownBusType {
                token: other.to_string(),
            });
        }
    };
    Ok(())
}

fn decode_initial_value<'a>(
    db: &mut Database,
    line: &str,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<(), ParseError> {
    // only the SG_ object form assigns initial values
    match parts.next() {
        Some("SG_") => {}
        _ => return Ok(()),
    }

    let malformed = || ParseError::MalformedLine {
        keyword: "BA_",
        line: line.to_string(),
    };

    let message_id: u32 = parts
        .next()
        .and_then(parse_uint)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(malformed)?;
    let signal_name: &str = parts.next().ok_or_else(malformed)?;
    let value: f64 = parts
        .next()
        .and_then(|tok| tok.parse::<f64>().ok())
        .ok_or_else(malformed)?;

    let msg = db
        .get_message_by_id(message_id)
        .ok_or(ParseError::UnknownMessage { id: message_id })?;
    let sig_key: SignalKey =
        msg.get_sig_key_by_name(db, signal_name)
            .ok_or_else(|| ParseError::UnknownSignal {
                name: signal_name.to_string(),
            })?;
    if let Some(sig) = db.get_sig_by_key_mut(sig_key) {
        sig.initial_value = Some(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::core::sg_;

    fn db_with_signal() -> Database {
        let mut db: Database = Database::default();
        let key = db.add_message("EngineData", 100, 8, "ECM").unwrap();
        sg_::decode(
            &mut db,
            key,
            r#"SG_ EngineSpeed : 0|16@1+ (0.25,0) [0|8000] "rpm" Vector__XXX"#,
        )
        .unwrap();
        db
    }

    #[test]
    fn test_bus_type_values() {
        let mut db: Database = Database::default();
        assert_eq!(db.bus_type, BusType::Unset);

        decode(&mut db, r#"BA_ "BusType" "CAN";"#).unwrap();
        assert_eq!(db.bus_type, BusType::Can);

        decode(&mut db, r#"BA_ "BusType" "CAN FD";"#).unwrap();
        assert_eq!(db.bus_type, BusType::CanFd);

        decode(&mut db, r#"BA_ "BusType" "";"#).unwrap();
        assert_eq!(db.bus_type, BusType::Unknown);

        let err = decode(&mut db, r#"BA_ "BusType" "LIN";"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownBusType { token } if token == "LIN"));
    }

    #[test]
    fn test_signal_initial_value() {
        let mut db = db_with_signal();
        decode(&mut db, r#"BA_ "GenSigStartValue" SG_ 100 EngineSpeed 800;"#).unwrap();
        let msg = db.get_message_by_id(100).unwrap();
        assert_eq!(msg.signals(&db).next().unwrap().initial_value, Some(800.0));
    }

    #[test]
    fn test_explicit_zero_is_present() {
        let mut db = db_with_signal();
        decode(&mut db, r#"BA_ "GenSigStartValue" SG_ 100 EngineSpeed 0;"#).unwrap();
        let msg = db.get_message_by_id(100).unwrap();
        assert_eq!(msg.signals(&db).next().unwrap().initial_value, Some(0.0));
    }

    #[test]
    fn test_unknown_targets() {
        let mut db = db_with_signal();
        let err = decode(&mut db, r#"BA_ "GenSigStartValue" SG_ 999 EngineSpeed 0;"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownMessage { id: 999 }));

        let err = decode(&mut db, r#"BA_ "GenSigStartValue" SG_ 100 Nope 0;"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownSignal { .. }));
    }

    #[test]
    fn test_unrelated_attributes_ignored() {
        let mut db = db_with_signal();
        decode(&mut db, r#"BA_ "DBName" "Powertrain";"#).unwrap();
        decode(&mut db, r#"BA_ "GenMsgCycleTime" BO_ 100 10;"#).unwrap();
        assert_eq!(db.bus_type, BusType::Unset);
    }
}
