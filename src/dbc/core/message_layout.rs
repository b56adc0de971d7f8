use crate::dbc::types::errors::ParseError;
use crate::dbc::types::signal::{ByteOrder, sequential_index};

/// Verify that (start_bit, signal_size) fits within the frame defined by the
/// message size.
///
/// DBC assumptions:
/// - Intel: the field occupies bits [start, start + size - 1] on a linear
///   0..(8*bytes-1) plane.
/// - Motorola: map the DBC start bit to its sequential index, then the field
///   advances forward in sequential space: [seq, seq + size - 1].
pub(crate) fn check_signal_fits(
    signal: &str,
    message_size: u16,
    start_bit: u16,
    signal_size: u16,
    byte_order: ByteOrder,
) -> Result<(), ParseError> {
    let out_of_frame = || ParseError::SignalOutOfFrame {
        signal: signal.to_string(),
        start_bit,
        signal_size,
        dlc: message_size,
    };

    if signal_size == 0 || signal_size > 64 || start_bit > 511 {
        return Err(out_of_frame());
    }
    let total_bits: usize = message_size as usize * 8;

    let start: usize = match byte_order {
        ByteOrder::Intel => start_bit as usize,
        ByteOrder::Motorola => sequential_index(start_bit),
    };
    let end: usize = start + signal_size as usize - 1;
    if end >= total_bits {
        return Err(out_of_frame());
    }
    Ok(())
}
