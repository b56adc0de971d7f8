use serde::Serialize;
use std::collections::HashMap;

use crate::dbc::types::{
    database::{Database, SignalKey},
    errors::CodecError,
    signal::Signal,
};

/// Longest payload of a classic CAN frame, in bytes.
pub const MAX_MSG_LEN_CAN: u16 = 8;
/// Longest payload of a CAN FD frame, in bytes.
pub const MAX_MSG_LEN_CAN_FD: u16 = 64;

/// CAN message defined in the database.
///
/// Maintains the numeric ID, the `name`, payload length (`message_size`),
/// the sending node and the list of composing signals. Decoding and
/// encoding of whole payloads is orchestrated here, one signal at a time.
#[derive(Default, Clone, PartialEq, Debug, Serialize)]
pub struct Message {
    /// Numeric CAN ID (base 10).
    pub id: u32,
    /// Message name (trailing colon from old-format DBCs stripped).
    pub name: String,
    /// Payload length in bytes. 0..=8 for CAN, 0..=64 for CAN FD.
    pub message_size: u16,
    /// Name of the transmitting node.
    pub sender: String,
    /// Signals that belong to this message, in declaration order.
    pub signals: Vec<SignalKey>,
}

impl Message {
    /// Convenience iterator over the [`Signal`]s belonging to this message.
    pub fn signals<'a>(&'a self, db: &'a Database) -> impl Iterator<Item = &'a Signal> + 'a {
        self.signals.iter().filter_map(move |&key| db.get_sig_by_key(key))
    }

    /// Looks up a signal of this message by name.
    pub fn get_sig_key_by_name(&self, db: &Database, name: &str) -> Option<SignalKey> {
        self.signals.iter().copied().find(|&key| {
            db.get_sig_by_key(key)
                .is_some_and(|sig| sig.name == name)
        })
    }

    /// Decodes every signal of this message from `payload`.
    ///
    /// `dlc` must match the payload length declared in the DBC; on success
    /// the result maps signal names to physical values.
    pub fn decode(
        &self,
        db: &Database,
        payload: &[u8],
        dlc: u16,
    ) -> Result<HashMap<String, f64>, CodecError> {
        if dlc != self.message_size {
            return Err(CodecError::LengthMismatch {
                expected: self.message_size,
                actual: dlc,
            });
        }
        let mut values: HashMap<String, f64> = HashMap::with_capacity(self.signals.len());
        for sig in self.signals(db) {
            values.insert(sig.name.clone(), sig.decode(payload));
        }
        Ok(values)
    }

    /// Encodes `assignments` (signal name, physical value) into `buffer`.
    ///
    /// Signals without an assignment encode their initial value, falling
    /// back to the database-wide default. Assigned values whose raw integer
    /// falls outside `[min, max]` are replaced by the initial value as well,
    /// with a diagnostic; the call itself never fails for range.
    ///
    /// Returns the DLC declared in the DBC. When `buffer` is shorter than
    /// that, the payload is truncated (with a diagnostic) but the declared
    /// DLC is still returned.
    pub fn encode(
        &self,
        db: &Database,
        assignments: &[(String, f64)],
        buffer: &mut [u8],
    ) -> Result<u16, CodecError> {
        // Validate all assignment names before touching the buffer.
        for (name, _) in assignments {
            if self.get_sig_key_by_name(db, name).is_none() {
                return Err(CodecError::UnknownSignal { name: name.clone() });
            }
        }

        // Merge the per-signal passes in a zeroed full-size window first,
        // so a short caller buffer only truncates and never corrupts.
        let mut scratch = [0u8; MAX_MSG_LEN_CAN_FD as usize];
        for sig in self.signals(db) {
            let supplied: Option<f64> = assignments
                .iter()
                .find(|(name, _)| name == &sig.name)
                .map(|&(_, value)| value);

            let physical: f64 = match supplied {
                Some(value) => {
                    let raw: i64 = sig.raw_int(value);
                    if (raw as f64) < sig.min || (raw as f64) > sig.max {
                        tracing::warn!(
                            signal = %sig.name,
                            value,
                            min = sig.min,
                            max = sig.max,
                            "value out of range, encoding the signal's initial value instead"
                        );
                        sig.initial_physical(db.global_initial_value)
                    } else {
                        value
                    }
                }
                None => sig.initial_physical(db.global_initial_value),
            };
            sig.encode(physical, &mut scratch);
        }

        let size: usize = self.message_size as usize;
        if buffer.len() < size {
            tracing::warn!(
                message_name = %self.name,
                capacity = buffer.len(),
                message_size = size,
                "output buffer shorter than the declared message size, payload truncated"
            );
        }
        let n: usize = buffer.len().min(size);
        buffer[..n].copy_from_slice(&scratch[..n]);
        Ok(self.message_size)
    }
}
