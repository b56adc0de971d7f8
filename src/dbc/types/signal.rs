use serde::Serialize;

use crate::dbc::core::bitops::{bit_index, pack754, unpack754};

/// Definition of a signal within a CAN message (DBC).
///
/// Describes position/bit-length, byte order, value type, scaling
/// (factor/offset), valid range, unit of measure, value descriptions and
/// receiver nodes. The codec lives here too: [`Signal::decode`] extracts the
/// physical value from a payload, [`Signal::encode`] ORs the packed bits of a
/// physical value into one.
#[derive(Default, Clone, PartialEq, Debug, Serialize)]
pub struct Signal {
    /// Signal name (unique within its message).
    pub name: String,
    /// Start bit in the payload, interpreted per `byte_order`.
    pub start_bit: u16,
    /// Bit length (1..=64).
    pub signal_size: u16,
    /// Byte order.
    pub byte_order: ByteOrder,
    /// Value type. IEEE variants are assigned later by a `SIG_VALTYPE_` line.
    pub value_type: ValueType,
    /// Scaling factor.
    pub factor: f64,
    /// Scaling offset.
    pub offset: f64,
    /// Minimum physical value.
    pub min: f64,
    /// Maximum physical value.
    pub max: f64,
    /// Unit of measure (may be empty).
    pub unit: String,
    /// Receiver node names. `Vector__XXX` in the DBC means none.
    pub receivers: Vec<String>,
    /// Raw value substituted on encode when the caller supplies none.
    /// `None` falls back to the database-wide default.
    pub initial_value: Option<f64>,
    /// Raw-value-to-text mapping (`VAL_` lines). Keys are unique.
    pub value_descriptions: Vec<(f64, String)>,
    /// Signal kind. Multiplexed signals are rejected at parse time.
    pub signal_kind: SignalKind,
}

impl Signal {
    /// Decodes the physical value of this signal from `payload`.
    ///
    /// Bit positions refer to a window aligned to the payload start; bytes
    /// beyond `payload.len()` read as zero.
    pub fn decode(&self, payload: &[u8]) -> f64 {
        let raw: u64 = match self.byte_order {
            ByteOrder::Intel => self.extract_intel(payload),
            ByteOrder::Motorola => self.extract_motorola(payload),
        };
        let value: f64 = match self.value_type {
            ValueType::Unsigned => raw as f64,
            ValueType::Signed => self.sign_extend(raw) as f64,
            ValueType::IeeeFloat => unpack754(raw, 32, 8),
            ValueType::IeeeDouble => unpack754(raw, 64, 11),
        };
        value * self.factor + self.offset
    }

    /// Encodes `physical` and ORs the packed bits into `payload`.
    ///
    /// The caller is responsible for zeroing the buffer before the
    /// per-signal passes are merged.
    pub fn encode(&self, physical: f64, payload: &mut [u8]) {
        let raw: u64 = self.raw_bits(physical);
        match self.byte_order {
            ByteOrder::Intel => self.place_intel(raw, payload),
            ByteOrder::Motorola => self.place_motorola(raw, payload),
        }
    }

    /// Reverse linear conversion: raw bit pattern for a physical value.
    ///
    /// Integer value types truncate toward zero; IEEE types pack the full
    /// `f64` quotient.
    pub(crate) fn raw_bits(&self, physical: f64) -> u64 {
        let quotient: f64 = (physical - self.offset) / self.factor;
        match self.value_type {
            ValueType::IeeeFloat => pack754(quotient, 32, 8),
            ValueType::IeeeDouble => pack754(quotient, 64, 11),
            _ => (quotient as i64) as u64,
        }
    }

    /// Raw integer used by the encode range check.
    pub(crate) fn raw_int(&self, physical: f64) -> i64 {
        ((physical - self.offset) / self.factor) as i64
    }

    /// Physical rendering of the stored raw initial value (or `global` when
    /// absent): `raw * factor + offset`.
    pub(crate) fn initial_physical(&self, global: f64) -> f64 {
        self.initial_value.unwrap_or(global) * self.factor + self.offset
    }

    fn extract_intel(&self, payload: &[u8]) -> u64 {
        let start: usize = self.start_bit as usize;
        let len: usize = self.signal_size as usize;

        // Fast path: the whole field lives in the first 64-bit word.
        if start + len <= 64 {
            let mut word = [0u8; 8];
            let n: usize = payload.len().min(8);
            word[..n].copy_from_slice(&payload[..n]);
            let w: u64 = u64::from_le_bytes(word);
            let mask: u64 = if len == 64 { u64::MAX } else { (1u64 << len) - 1 };
            return (w >> start) & mask;
        }

        // CAN FD placements beyond the first word: walk the payload byte-wise.
        let mut raw: u64 = 0;
        for i in 0..len {
            let bit: usize = start + i;
            let byte: usize = bit / 8;
            if byte < payload.len() && (payload[byte] >> (bit % 8)) & 1 == 1 {
                raw |= 1u64 << i;
            }
        }
        raw
    }

    fn extract_motorola(&self, payload: &[u8]) -> u64 {
        // DBC numbers bits LSB=0..MSB=7 inside a byte; the start bit is the
        // MSB of the field and traversal crosses byte boundaries MSB-first.
        let seq: usize = sequential_index(self.start_bit);
        let len: usize = self.signal_size as usize;

        let mut raw: u64 = 0;
        for i in 0..len {
            let cur: usize = seq + i;
            let byte: usize = cur / 8;
            if byte < payload.len() && (payload[byte] >> (7 - cur % 8)) & 1 == 1 {
                raw |= 1u64 << (len - 1 - i);
            }
        }
        raw
    }

    fn place_intel(&self, raw: u64, payload: &mut [u8]) {
        let start: usize = self.start_bit as usize;
        for i in 0..self.signal_size as usize {
            if (raw >> i) & 1 == 1 {
                let bit: usize = start + i;
                let byte: usize = bit / 8;
                if byte < payload.len() {
                    payload[byte] |= 1 << (bit % 8);
                }
            }
        }
    }

    fn place_motorola(&self, raw: u64, payload: &mut [u8]) {
        let seq: usize = sequential_index(self.start_bit);
        let len: usize = self.signal_size as usize;
        for i in 0..len {
            if (raw >> (len - 1 - i)) & 1 == 1 {
                let cur: usize = seq + i;
                let byte: usize = cur / 8;
                if byte < payload.len() {
                    payload[byte] |= 1 << (7 - cur % 8);
                }
            }
        }
    }

    /// Two's-complement sign extension of an `signal_size`-bit raw value.
    fn sign_extend(&self, raw: u64) -> i64 {
        let n: u16 = self.signal_size.min(64);
        if n == 0 || n == 64 {
            return raw as i64;
        }
        if raw & (1u64 << (n - 1)) != 0 {
            (raw | !((1u64 << n) - 1)) as i64
        } else {
            raw as i64
        }
    }
}

/// Translate a Motorola forward-MSB start bit into its sequential index:
/// same byte, bit counted MSB-first.
#[inline]
pub(crate) fn sequential_index(start_bit: u16) -> usize {
    let s: usize = start_bit as usize;
    bit_index(s / 8, 7 - s % 8)
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum ByteOrder {
    #[default]
    Motorola, // @0
    Intel, // @1
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum ValueType {
    #[default]
    Unsigned, // +
    Signed,     // -
    IeeeFloat,  // SIG_VALTYPE_ = 1
    IeeeDouble, // SIG_VALTYPE_ = 2
}

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum SignalKind {
    #[default]
    Normal,
    Multiplexed,
}
