use crate::dbc::core::sg_;
use crate::dbc::types::{
    database::{Database, MessageKey},
    errors::ParseError,
    message::MAX_MSG_LEN_CAN_FD,
};

fn malformed(line: &str) -> ParseError {
    ParseError::MalformedLine {
        keyword: "BO_",
        line: line.trim().to_string(),
    }
}

/// Decode a `BO_` line plus the `SG_` block that follows it.
///
/// Accepts both the old format `BO_ 123 NAME: 8 Node` and the new one
/// `BO_ 123 NAME : 8 Node`. `lines[*i]` must be the `BO_` line; on return
/// `*i` points at the last `SG_` line consumed, so a one-line lookahead
/// replaces the stream rewind of classic DBC readers.
pub(crate) fn decode(db: &mut Database, lines: &[String], i: &mut usize) -> Result<(), ParseError> {
    let line: &str = lines[*i].trim();

    // Strip leading "BO_"
    let after: &str = line.trim_start_matches("BO_").trim();

    // 1) ID (first token)
    let mut split_once = after.splitn(2, char::is_whitespace);
    let id_str: &str = split_once.next().unwrap_or("");
    let rest: &str = split_once.next().unwrap_or("").trim();
    let id: u32 = super::strings::parse_uint(id_str)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| malformed(line))?;

    // 2) NAME (everything up to the first ':')
    let colon_pos: usize = rest.find(':').ok_or_else(|| malformed(line))?;
    let name: String = rest[..colon_pos].trim().trim_end_matches(':').to_string();
    if name.is_empty() {
        return Err(malformed(line));
    }

    // 3) After ':' -> <size> <sender?>
    let mut it = rest[colon_pos + 1..].trim().split_ascii_whitespace();
    let size_tok: &str = it.next().ok_or_else(|| malformed(line))?;
    let message_size: u16 = super::strings::parse_uint(size_tok)
        .and_then(|v| u16::try_from(v).ok())
        .filter(|&size| size <= MAX_MSG_LEN_CAN_FD)
        .ok_or_else(|| malformed(line))?;
    let sender: &str = it.next().unwrap_or("").trim_end_matches(';');

    let msg_key: MessageKey = db.add_message(&name, id, message_size, sender)?;

    // 4) greedily consume the signals of this message; any other token ends
    // the block and is re-examined by the top-level dispatcher
    while *i + 1 < lines.len() {
        let next: &str = lines[*i + 1].trim_start();
        if next.split_ascii_whitespace().next() != Some("SG_") {
            break;
        }
        *i += 1;
        sg_::decode(db, msg_key, next)?;
    }
    Ok(())
}
