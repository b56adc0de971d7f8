use std::io;
use thiserror::Error;

/// Errors produced while parsing a `.dbc` file.
///
/// The parser is fail-fast: the first structural defect aborts the load and
/// carries enough context (message/signal name, bad token, line content) to
/// locate it in the file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Malformed {keyword} line: {line}")]
    MalformedLine { keyword: &'static str, line: String },
    #[error("Message '{name}' has a duplicate")]
    DuplicateMessage { name: String },
    #[error("Signal '{name}' has duplicates in the same message")]
    DuplicateSignal { name: String },
    #[error("Duplicated value description {value} for signal '{signal}'")]
    DuplicateValueDescription { signal: String, value: f64 },
    #[error("Cannot find message (ID: {id}) in CAN database")]
    UnknownMessage { id: u32 },
    #[error("Cannot find signal '{name}' in CAN database")]
    UnknownSignal { name: String },
    #[error("Unable to parse byte order of signal '{signal}': '{token}'")]
    ByteOrderUnrecognised { signal: String, token: String },
    #[error("Unable to parse value type of signal '{signal}': '{token}'")]
    ValueTypeUnrecognised { signal: String, token: String },
    #[error("Undefined signal value type identifier for signal '{signal}': '{token}'")]
    ValueTypeIdentifierUnrecognised { signal: String, token: String },
    #[error("Signal '{name}' is not a normal signal. Multiplexed signals are not supported")]
    MultiplexedSignalUnsupported { name: String },
    #[error(
        "Signal '{signal}' does not fit its frame: start bit {start_bit}, size {signal_size}, dlc {dlc}"
    )]
    SignalOutOfFrame {
        signal: String,
        start_bit: u16,
        signal_size: u16,
        dlc: u16,
    },
    #[error("Initial value {value} of signal '{signal}' is outside [{min}, {max}]")]
    InconsistentInitialValue {
        signal: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Unknown bus type: '{token}'")]
    UnknownBusType { token: String },
}

/// Errors returned by decode/encode operations on a parsed
/// [`Database`](crate::dbc::types::database::Database).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("No message with ID {id} in CAN database")]
    UnknownMessage { id: u32 },
    #[error("No signal named '{name}' in the message")]
    UnknownSignal { name: String },
    #[error("Payload length mismatch: DBC declares {expected} bytes, got {actual}")]
    LengthMismatch { expected: u16, actual: u16 },
}
