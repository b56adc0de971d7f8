// Token helpers shared by the DBC line decoders.

// --- helper: collect strings within "" ---
pub(crate) fn collect_all_quoted(s: &str) -> Vec<String> {
    let bytes: &[u8] = s.as_bytes();
    let mut out: Vec<String> = Vec::new();
    let mut i: usize = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'"' {
            i += 1; // skip opening quote
            let start = i;
            while i < bytes.len() && bytes[i] != b'"' {
                i += 1;
            }
            if i < bytes.len() {
                out.push(s[start..i].to_string());
                i += 1; // skip closing quote
                continue;
            } else {
                break; // unclosed quotes
            }
        }
        i += 1;
    }

    out
}

/// Parse an unsigned integer literal: decimal, `0x...` hexadecimal, or
/// `0...` octal.
pub(crate) fn parse_uint(token: &str) -> Option<u64> {
    let t: &str = token.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if t.len() > 1 && t.starts_with('0') && t.bytes().all(|b| b.is_ascii_digit() && b < b'8')
    {
        u64::from_str_radix(&t[1..], 8).ok()
    } else {
        t.parse::<u64>().ok()
    }
}
