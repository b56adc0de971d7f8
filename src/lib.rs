//! # can_codec
//!
//! Rust utilities for parsing **DBC** CAN databases and for encoding and
//! decoding CAN / CAN FD frame payloads against them.
//!
//! ## Highlights
//! - **DBC parser**: load CAN databases from `.dbc` into a SlotMap-backed
//!   [`Database`](crate::dbc::types::database::Database).
//! - **Stable keys**: Messages/Signals use SlotMap keys that remain valid across reordering.
//! - **Payload codec**: bit-exact signal packing and extraction for Intel and
//!   Motorola (forward MSB) layouts, including signed and IEEE-754 signals.
//! - **Fail-fast parsing**: structural defects surface as typed
//!   [`ParseError`](crate::dbc::types::errors::ParseError)s carrying the offending line.
//! - **Recoverable encoding**: out-of-range values fall back to signal initial
//!   values with a `tracing` diagnostic instead of aborting the frame.
//!

pub mod dbc;

pub use crate::dbc::parse::from_file;
pub use crate::dbc::types::database::{BusType, Database, MessageKey, SignalKey};
pub use crate::dbc::types::errors::{CodecError, ParseError};
pub use crate::dbc::types::message::Message;
pub use crate::dbc::types::signal::{ByteOrder, Signal, SignalKind, ValueType};
