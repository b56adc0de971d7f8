//! # dbc
//!
//! Parsing and payload-codec utilities for **DBC** CAN database files.
//! Use `dbc::parse::from_file(...)` to build a SlotMap-backed `Database`,
//! then `Database::decode` / `Database::encode` to work on frame payloads.
//! Supporting line decoders live under `dbc::core`.

pub(crate) mod core;
pub mod parse;
pub mod types;
