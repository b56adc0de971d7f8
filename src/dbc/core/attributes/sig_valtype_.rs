use crate::dbc::core::strings::parse_uint;
use crate::dbc::types::{
    database::{Database, SignalKey},
    errors::ParseError,
    signal::ValueType,
};

/// Decode a `SIG_VALTYPE_` line assigning floating-point encodings to a
/// signal that was already parsed from its `SG_` line.
///
/// Shape: `SIG_VALTYPE_ <MsgID> <SignalName> : <Value>;`
/// where `<Value>` is `1` (IEEE float, 32-bit) or `2` (IEEE double, 64-bit).
pub(crate) fn decode(db: &mut Database, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut parts = line.split_ascii_whitespace();

    let malformed = || ParseError::MalformedLine {
        keyword: "SIG_VALTYPE_",
        line: line.to_string(),
    };

    // 1) "SIG_VALTYPE_"
    match parts.next() {
        Some("SIG_VALTYPE_") => {}
        _ => return Err(malformed()),
    }

    // 2) message id and signal name
    let message_id: u32 = parts
        .next()
        .and_then(parse_uint)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(malformed)?;
    let signal_name: &str = parts.next().ok_or_else(malformed)?;

    // 3) ":" delimiter
    match parts.next() {
        Some(":") => {}
        _ => return Err(malformed()),
    }

    // 4) the type identifier
    let identifier: &str = parts.next().ok_or_else(malformed)?;
    let value_type: ValueType = match identifier {
        "1" => ValueType::IeeeFloat,
        "2" => ValueType::IeeeDouble,
        other => {
            return Err(ParseError::ValueTypeIdentifierUnrecognised {
                signal: signal_name.to_string(),
                token: other.to_string(),
            });
        }
    };

    // 5) the signal must already exist; SIG_VALTYPE_ refines, never creates
    let msg = db
        .get_message_by_id(message_id)
        .ok_or(ParseError::UnknownMessage { id: message_id })?;
    let sig_key: SignalKey =
        msg.get_sig_key_by_name(db, signal_name)
            .ok_or_else(|| ParseError::UnknownSignal {
                name: signal_name.to_string(),
            })?;
    if let Some(sig) = db.get_sig_by_key_mut(sig_key) {
        sig.value_type = value_type;
    }
    Ok(())
}
