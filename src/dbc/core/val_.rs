use crate::dbc::types::{
    database::{Database, SignalKey},
    errors::ParseError,
};

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedLine {
        keyword: "VAL_",
        line: line.trim().to_string(),
    }
}

/// Parse a `VAL_` line that defines value descriptions for a signal:
/// `VAL_ <MessageID> <SignalName> <value> "<desc>" ... ;`
///
/// A message id of 0 (or a non-numeric first token) marks an environment
/// variable value description, which is tolerated and ignored.
pub(crate) fn decode(db: &mut Database, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut it = it_after_keyword(line)?;

    // 1) message id; 0 => environment variable
    let Some(message_id) = it
        .next()
        .and_then(super::strings::parse_uint)
        .and_then(|v| u32::try_from(v).ok())
    else {
        return Ok(());
    };
    if message_id == 0 {
        return Ok(());
    }

    // 2) signal lookup within that message
    let signal_name: &str = it.next().ok_or_else(|| malformed(line))?;
    let msg = db
        .get_message_by_id(message_id)
        .ok_or(ParseError::UnknownMessage { id: message_id })?;
    let sig_key: SignalKey =
        msg.get_sig_key_by_name(db, signal_name)
            .ok_or_else(|| ParseError::UnknownSignal {
                name: signal_name.to_string(),
            })?;

    // 3) collect (value, quoted description) pairs up to end of line
    let mut pairs: Vec<(f64, String)> = Vec::new();
    while let Some(value_tok) = it.next() {
        if value_tok == ";" {
            break;
        }
        let value: f64 = value_tok.parse().map_err(|_| malformed(line))?;

        let mut desc: String = it.next().ok_or_else(|| malformed(line))?.to_string();
        if !desc.starts_with('"') {
            return Err(malformed(line));
        }
        while desc.len() < 2 || !desc.ends_with('"') {
            match it.next() {
                Some(tok) => {
                    desc.push(' ');
                    desc.push_str(tok);
                }
                None => return Err(malformed(line)),
            }
        }
        let desc: String = desc.trim_matches('"').to_string();

        if pairs.iter().any(|&(v, _)| v == value) {
            return Err(ParseError::DuplicateValueDescription {
                signal: signal_name.to_string(),
                value,
            });
        }
        pairs.push((value, desc));
    }

    // 4) merge into the signal, keeping keys unique across repeated VAL_ lines
    let sig = db
        .get_sig_by_key_mut(sig_key)
        .ok_or_else(|| ParseError::UnknownSignal {
            name: signal_name.to_string(),
        })?;
    for (value, desc) in pairs {
        if sig.value_descriptions.iter().any(|&(v, _)| v == value) {
            return Err(ParseError::DuplicateValueDescription {
                signal: sig.name.clone(),
                value,
            });
        }
        sig.value_descriptions.push((value, desc));
    }
    Ok(())
}

fn it_after_keyword(line: &str) -> Result<std::str::SplitAsciiWhitespace<'_>, ParseError> {
    let mut it = line.split_ascii_whitespace();
    match it.next() {
        Some("VAL_") => Ok(it),
        _ => Err(malformed(line)),
    }
}
