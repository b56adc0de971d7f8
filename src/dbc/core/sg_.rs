use crate::dbc::core::message_layout;
use crate::dbc::types::{
    database::{Database, MessageKey},
    errors::ParseError,
    signal::{ByteOrder, Signal, SignalKind, ValueType},
};

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedLine {
        keyword: "SG_",
        line: line.trim().to_string(),
    }
}

/// Decode a `SG_` line belonging to the message being parsed.
/// Format:
/// SG_ <name> : <start_bit>|<signal_size>@<order><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers...>
///
/// A token other than `:` after the name is a multiplexer tag (`M`, `mX`);
/// multiplexed signals are rejected.
pub(crate) fn decode(db: &mut Database, msg_key: MessageKey, line: &str) -> Result<(), ParseError> {
    let line: &str = line.trim().trim_end_matches(';');
    let mut it = line.split_ascii_whitespace();

    // 1) "SG_" <name>
    match it.next() {
        Some("SG_") => {}
        _ => return Err(malformed(line)),
    }
    let name: String = it.next().ok_or_else(|| malformed(line))?.to_string();

    // 2) the ":" delimiter; anything else marks a multiplexer or multiplexed
    // signal, which this parser does not support
    match it.next() {
        Some(":") => {}
        Some(_) => return Err(ParseError::MultiplexedSignalUnsupported { name }),
        None => return Err(malformed(line)),
    }

    // 3) placement: "<start>|<size>@<order><sign>", e.g. "39|16@0+"
    let bit_info: &str = it.next().ok_or_else(|| malformed(line))?;
    let (pos_len, order_sign) = bit_info.split_once('@').ok_or_else(|| malformed(line))?;
    let (start_tok, size_tok) = pos_len.split_once('|').ok_or_else(|| malformed(line))?;
    let start_bit: u16 = super::strings::parse_uint(start_tok)
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| malformed(line))?;
    let signal_size: u16 = super::strings::parse_uint(size_tok)
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| malformed(line))?;

    let mut order_chars = order_sign.chars();
    let byte_order: ByteOrder = match order_chars.next() {
        Some('0') => ByteOrder::Motorola,
        Some('1') => ByteOrder::Intel,
        other => {
            return Err(ParseError::ByteOrderUnrecognised {
                signal: name,
                token: other.map(String::from).unwrap_or_default(),
            });
        }
    };
    let value_type: ValueType = match order_chars.next() {
        Some('+') => ValueType::Unsigned,
        Some('-') => ValueType::Signed,
        other => {
            return Err(ParseError::ValueTypeUnrecognised {
                signal: name,
                token: other.map(String::from).unwrap_or_default(),
            });
        }
    };

    // 4) "(factor,offset)", possibly split across tokens; gather until ')'
    let mut paren: String = it.next().ok_or_else(|| malformed(line))?.to_string();
    while !paren.ends_with(')') {
        match it.next() {
            Some(tok) => {
                paren.push(' ');
                paren.push_str(tok);
            }
            None => return Err(malformed(line)),
        }
    }
    let inner: &str = paren.trim_start_matches('(').trim_end_matches(')');
    let (factor_tok, offset_tok) = inner.split_once(',').ok_or_else(|| malformed(line))?;
    let factor: f64 = factor_tok.trim().parse().map_err(|_| malformed(line))?;
    let offset: f64 = offset_tok.trim().parse().map_err(|_| malformed(line))?;

    // 5) "[min|max]", same gathering
    let mut bounds: String = it.next().ok_or_else(|| malformed(line))?.to_string();
    while !bounds.ends_with(']') {
        match it.next() {
            Some(tok) => {
                bounds.push(' ');
                bounds.push_str(tok);
            }
            None => return Err(malformed(line)),
        }
    }
    let inner: &str = bounds.trim_start_matches('[').trim_end_matches(']');
    let (min_tok, max_tok) = inner.split_once('|').ok_or_else(|| malformed(line))?;
    let min: f64 = min_tok.trim().parse().map_err(|_| malformed(line))?;
    let max: f64 = max_tok.trim().parse().map_err(|_| malformed(line))?;

    // 6) quoted unit, possibly containing spaces
    let mut unit_acc: String = it.next().ok_or_else(|| malformed(line))?.to_string();
    if !unit_acc.starts_with('"') {
        return Err(malformed(line));
    }
    while unit_acc.len() < 2 || !unit_acc.ends_with('"') {
        match it.next() {
            Some(tok) => {
                unit_acc.push(' ');
                unit_acc.push_str(tok);
            }
            None => return Err(malformed(line)),
        }
    }
    let unit: String = unit_acc.trim_matches('"').to_string();

    // 7) receivers; Vector__XXX is the DBC spelling of "no receiver"
    let mut receivers: Vec<String> = Vec::new();
    if let Some(recv) = it.next()
        && recv != "Vector__XXX"
    {
        receivers.extend(
            recv.split(',')
                .map(|node| node.trim())
                .filter(|node| !node.is_empty())
                .map(String::from),
        );
    }

    let message_size: u16 = db
        .get_message_by_key(msg_key)
        .map(|msg| msg.message_size)
        .unwrap_or(0);
    message_layout::check_signal_fits(&name, message_size, start_bit, signal_size, byte_order)?;

    db.add_signal(
        msg_key,
        Signal {
            name,
            start_bit,
            signal_size,
            byte_order,
            value_type,
            factor,
            offset,
            min,
            max,
            unit,
            receivers,
            initial_value: None,
            value_descriptions: Vec::new(),
            signal_kind: SignalKind::Normal,
        },
    )?;
    Ok(())
}
