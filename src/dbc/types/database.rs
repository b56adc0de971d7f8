//! Database model (SlotMap-backed).
//!
//! This module defines the in-memory **CAN database** built by the DBC
//! parser. Storage uses **SlotMap** arenas with **stable keys**:
//! [`MessageKey`], [`SignalKey`]. Public iteration follows the insertion
//! order of `BO_` lines via `iter_messages()`.
//!
//! After `parse` returns the database is read-only; `decode`/`encode` only
//! touch caller-supplied buffers and may run concurrently from several
//! threads.

use serde::Serialize;
use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;
use std::fmt;

use crate::dbc::types::{
    errors::{CodecError, ParseError},
    message::Message,
    signal::{ByteOrder, Signal, ValueType},
};

// --- Stable keys (SlotMap) ---
new_key_type! { pub struct MessageKey; }
new_key_type! { pub struct SignalKey; }

/// In-memory representation of a CAN database (DBC).
///
/// Holds the bus type, the `GenSigStartValue` globals, the arenas of
/// messages/signals (SlotMaps with stable keys), the order vector that
/// preserves `BO_` declaration order, and the id lookup map.
#[derive(Default, Clone, Debug, Serialize)]
pub struct Database {
    /// Version string (from the `VERSION` line).
    pub version: String,
    /// Bus type declared by `BA_ "BusType"`.
    pub bus_type: BusType,

    // --- GenSigStartValue globals ---
    /// Default raw initial value (`BA_DEF_DEF_ "GenSigStartValue"`).
    pub global_initial_value: f64,
    /// Lower bound of the attribute (`BA_DEF_ SG_ "GenSigStartValue"`).
    pub global_initial_min: f64,
    /// Upper bound of the attribute (`BA_DEF_ SG_ "GenSigStartValue"`).
    pub global_initial_max: f64,

    // --- Main storage (stable-key maps) ---
    pub messages: SlotMap<MessageKey, Message>,
    pub signals: SlotMap<SignalKey, Signal>,

    // --- Order "view" ---
    pub messages_order: Vec<MessageKey>,

    // --- Lookup ---
    pub(crate) msg_key_by_id: HashMap<u32, MessageKey>,
}

impl Database {
    // ------------- Messages ------------
    /// Adds a message and indexes its id. Message ids are unique within a
    /// database; a duplicate fails parsing.
    pub(crate) fn add_message(
        &mut self,
        name: &str,
        id: u32,
        message_size: u16,
        sender: &str,
    ) -> Result<MessageKey, ParseError> {
        if self.msg_key_by_id.contains_key(&id) {
            return Err(ParseError::DuplicateMessage {
                name: name.to_string(),
            });
        }

        let msg_key: MessageKey = self.messages.insert(Message {
            id,
            name: name.to_string(),
            message_size,
            sender: sender.to_string(),
            signals: Vec::new(),
        });
        self.messages_order.push(msg_key);
        self.msg_key_by_id.insert(id, msg_key);
        Ok(msg_key)
    }

    pub fn get_msg_key_by_id(&self, id: u32) -> Option<MessageKey> {
        self.msg_key_by_id.get(&id).copied()
    }

    pub fn get_message_by_key(&self, key: MessageKey) -> Option<&Message> {
        self.messages.get(key)
    }

    pub fn get_message_by_key_mut(&mut self, key: MessageKey) -> Option<&mut Message> {
        self.messages.get_mut(key)
    }

    /// Returns a `&Message` given the numeric CAN ID.
    pub fn get_message_by_id(&self, id: u32) -> Option<&Message> {
        let key: MessageKey = self.get_msg_key_by_id(id)?;
        self.get_message_by_key(key)
    }

    /// Iterate messages following `BO_` declaration order.
    pub fn iter_messages(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages_order
            .iter()
            .filter_map(|&key| self.messages.get(key))
    }

    // -------------- Signals ------------
    /// Adds a signal to `msg_key`. Signal names are unique within their
    /// message; a duplicate fails parsing.
    pub(crate) fn add_signal(
        &mut self,
        msg_key: MessageKey,
        sig: Signal,
    ) -> Result<SignalKey, ParseError> {
        if let Some(msg) = self.messages.get(msg_key)
            && msg.get_sig_key_by_name(self, &sig.name).is_some()
        {
            return Err(ParseError::DuplicateSignal { name: sig.name });
        }

        let sig_key: SignalKey = self.signals.insert(sig);
        if let Some(msg) = self.messages.get_mut(msg_key) {
            msg.signals.push(sig_key);
        }
        Ok(sig_key)
    }

    pub fn get_sig_by_key(&self, key: SignalKey) -> Option<&Signal> {
        self.signals.get(key)
    }

    pub fn get_sig_by_key_mut(&mut self, key: SignalKey) -> Option<&mut Signal> {
        self.signals.get_mut(key)
    }

    // -------------- Codec entry points ------------
    /// Decodes all signals of message `msg_id` from `payload`.
    ///
    /// `dlc` is the payload length of the received frame and must match the
    /// size declared in the DBC.
    pub fn decode(
        &self,
        msg_id: u32,
        payload: &[u8],
        dlc: u16,
    ) -> Result<HashMap<String, f64>, CodecError> {
        let msg: &Message = self
            .get_message_by_id(msg_id)
            .ok_or(CodecError::UnknownMessage { id: msg_id })?;
        msg.decode(self, payload, dlc)
    }

    /// Decodes a single named signal of message `msg_id`.
    pub fn decode_signal(
        &self,
        msg_id: u32,
        payload: &[u8],
        dlc: u16,
        name: &str,
    ) -> Result<f64, CodecError> {
        let values: HashMap<String, f64> = self.decode(msg_id, payload, dlc)?;
        values
            .get(name)
            .copied()
            .ok_or_else(|| CodecError::UnknownSignal {
                name: name.to_string(),
            })
    }

    /// Encodes `assignments` into `buffer` for message `msg_id` and returns
    /// the DLC declared in the DBC.
    pub fn encode(
        &self,
        msg_id: u32,
        assignments: &[(String, f64)],
        buffer: &mut [u8],
    ) -> Result<u16, CodecError> {
        let msg: &Message = self
            .get_message_by_id(msg_id)
            .ok_or(CodecError::UnknownMessage { id: msg_id })?;
        msg.encode(self, assignments, buffer)
    }

    /// Human-readable dump of every message and signal.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    // -------------- Validation ------------
    /// Post-parse range validation of initial values.
    ///
    /// A signal's own initial value must lie inside its `[min, max]`. When a
    /// signal has none and the attribute declared a non-degenerate global
    /// range, the global default is checked against the signal's range
    /// instead.
    pub(crate) fn consistency_check(&self) -> Result<(), ParseError> {
        let global_range_declared: bool =
            !(self.global_initial_min == 0.0 && self.global_initial_max == 0.0);

        if global_range_declared
            && !(self.global_initial_value >= self.global_initial_min
                && self.global_initial_value <= self.global_initial_max)
        {
            tracing::warn!(
                value = self.global_initial_value,
                min = self.global_initial_min,
                max = self.global_initial_max,
                "default signal initial value is not within its min and max range"
            );
        }

        for msg in self.iter_messages() {
            for sig in msg.signals(self) {
                match sig.initial_value {
                    Some(value) => {
                        if !(value >= sig.min && value <= sig.max) {
                            return Err(ParseError::InconsistentInitialValue {
                                signal: sig.name.clone(),
                                value,
                                min: sig.min,
                                max: sig.max,
                            });
                        }
                    }
                    None => {
                        if global_range_declared
                            && !(self.global_initial_value >= sig.min
                                && self.global_initial_value <= sig.max)
                        {
                            return Err(ParseError::InconsistentInitialValue {
                                signal: sig.name.clone(),
                                value: self.global_initial_value,
                                min: sig.min,
                                max: sig.max,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Clear the database.
    pub fn clear(&mut self) {
        *self = Database::default();
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.messages.is_empty() {
            return writeln!(f, "Empty library. Load and parse a DBC file first.");
        }
        for msg in self.iter_messages() {
            writeln!(f, "-------------------------------")?;
            writeln!(f, "<Message> {} {}", msg.name, msg.id)?;
            for sig in msg.signals(self) {
                writeln!(f, "<Signal> {}  {},{}", sig.name, sig.start_bit, sig.signal_size)?;
                writeln!(f, "\t\t({}, {})", sig.factor, sig.offset)?;
                writeln!(f, "\t\t[{}|{}]", sig.min, sig.max)?;
                let order: &str = match sig.byte_order {
                    ByteOrder::Intel => "INTEL",
                    ByteOrder::Motorola => "MOTO",
                };
                writeln!(f, "\t\t{order}")?;
                let value_type: &str = match sig.value_type {
                    ValueType::Unsigned => "UNSIGNED",
                    ValueType::Signed => "SIGNED",
                    ValueType::IeeeFloat => "IEEE FLOAT",
                    ValueType::IeeeDouble => "IEEE DOUBLE",
                };
                writeln!(f, "\t\t{value_type}")?;
                if !sig.unit.is_empty() {
                    writeln!(f, "\t\t{}", sig.unit)?;
                }
                if let Some(initial) = sig.initial_value {
                    writeln!(f, "\t\t{initial}")?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "-------------------------------")
    }
}

/// Bus type declared by the `BA_ "BusType"` attribute.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum BusType {
    /// No `BA_ "BusType"` line was seen.
    #[default]
    Unset,
    /// The attribute was present with an empty value.
    Unknown,
    Can,
    CanFd,
}

impl BusType {
    /// Returns a user-friendly string (e.g., `"CAN"`, `"CAN FD"`).
    pub fn to_str(&self) -> &'static str {
        match self {
            BusType::Unset => "Unset",
            BusType::Unknown => "Unknown",
            BusType::Can => "CAN",
            BusType::CanFd => "CAN FD",
        }
    }
}
