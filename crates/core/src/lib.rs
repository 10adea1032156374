//! Transport-independent building blocks of the channel relay.
//!
//! Nothing in here performs I/O: channel naming, connection identity and the
//! per-connection lifecycle state machine are plain data and pure functions
//! so the server crate can drive them from whatever socket type it uses.

pub mod channel;
pub mod lifecycle;
pub mod types;
